//! Shared helpers used by every provider client.

use async_trait::async_trait;
use router_core::{BackendClient, BackendClientError, GenerateOptions, GenerateResult, Provider};

/// `⌈len(text) / 4⌉` — used only when a provider's response does not report
/// its own token usage (HuggingFace's inference API never does).
pub fn estimate_tokens(text: &str) -> u64 {
    (text.len() as u64).div_ceil(4)
}

pub fn map_reqwest_error(error: &reqwest::Error, provider: Provider, timeout_ms: u64) -> BackendClientError {
    if error.is_timeout() {
        BackendClientError::Timeout { provider, timeout_ms }
    } else {
        BackendClientError::Upstream { provider, message: error.to_string() }
    }
}

/// Stand-in backend used where the binary needs *some* `BackendClient` but
/// no provider happens to be configured for that role (most notably the
/// model classifier's designated backend). Every call fails immediately
/// with [`BackendClientError::Unauthorized`], which the hybrid classifier
/// and router service both already treat as an ordinary degrade-and-
/// continue signal — this never blocks routing, it just means the model
/// classifier/static fallback are never actually reachable until a
/// credential is configured.
pub struct NullClient {
    provider: Provider,
    model_name: String,
}

impl NullClient {
    pub fn new(provider: Provider, model_name: impl Into<String>) -> Self {
        Self { provider, model_name: model_name.into() }
    }
}

#[async_trait]
impl BackendClient for NullClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(
        &self,
        _prompt: &str,
        _options: &GenerateOptions,
    ) -> Result<GenerateResult, BackendClientError> {
        Err(BackendClientError::Unauthorized { provider: self.provider })
    }

    async fn is_available(&self) -> bool {
        false
    }
}
