//! In-memory fake backend client and resolver — stand in for real HTTP
//! provider clients so end-to-end tests exercise the routing/fallback path
//! without any network traffic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use router_core::{
    BackendClient, BackendClientError, ClientResolver, GenerateOptions, GenerateResult, Provider,
    estimate_tokens,
};

/// A `BackendClient` that fails its first `fail_count` calls, then succeeds
/// with a canned response for every call after that.
pub struct FakeBackendClient {
    provider: Provider,
    model_name: String,
    response_content: String,
    fail_count: AtomicU32,
    call_count: AtomicU32,
}

impl FakeBackendClient {
    pub fn new(provider: Provider, model_name: impl Into<String>) -> Self {
        Self::with_response(provider, model_name, "generated response")
    }

    pub fn with_response(
        provider: Provider,
        model_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model_name: model_name.into(),
            response_content: content.into(),
            fail_count: AtomicU32::new(0),
            call_count: AtomicU32::new(0),
        }
    }

    pub fn failing(provider: Provider, model_name: impl Into<String>, fail_count: u32) -> Self {
        Self {
            provider,
            model_name: model_name.into(),
            response_content: "generated response".to_owned(),
            fail_count: AtomicU32::new(fail_count),
            call_count: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BackendClient for FakeBackendClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerateOptions,
    ) -> Result<GenerateResult, BackendClientError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        let remaining = self.fail_count.load(Ordering::Relaxed);
        if remaining > 0 {
            self.fail_count.fetch_sub(1, Ordering::Relaxed);
            return Err(BackendClientError::Upstream {
                provider: self.provider,
                message: "fake backend intentional failure".to_owned(),
            });
        }

        Ok(GenerateResult {
            content: self.response_content.clone(),
            input_tokens: estimate_tokens(prompt),
            output_tokens: 20,
            cost_usd: Some(0.001),
            latency_ms: 10,
        })
    }
}

/// Resolves model keys to fakes registered ahead of time. Mirrors
/// `router-providers::ClientPool`'s dual-keyed lookup, except fakes are
/// registered directly rather than built lazily from provider config.
#[derive(Default)]
pub struct FakeResolver {
    clients: Mutex<HashMap<String, Arc<dyn BackendClient>>>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, key: &str, client: Arc<dyn BackendClient>) {
        self.clients.lock().unwrap().insert(key.to_owned(), client);
    }
}

#[async_trait]
impl ClientResolver for FakeResolver {
    async fn resolve(&self, key: &str) -> Option<Arc<dyn BackendClient>> {
        self.clients.lock().unwrap().get(key).cloned()
    }
}
