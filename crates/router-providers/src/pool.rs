//! Lazily populated, dual-keyed backend client pool.
//!
//! Backed by a `DashMap` for concurrent provider-keyed state:
//! `entry(...).or_insert_with` resolves a race between two first-uses of the
//! same model so only one client survives. Populated under both the model's
//! stable `key` and its `provider_model_name`, matching the router's
//! "client cache keyed by two names" design note.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use router_config::ProvidersConfig;
use router_core::{BackendClient, ClientResolver, ModelDescriptor, ModelRegistry, Provider};

use crate::anthropic::AnthropicClient;
use crate::google::GoogleClient;
use crate::huggingface::HuggingFaceClient;
use crate::openai::OpenAiClient;

pub struct ClientPool {
    registry: Arc<ModelRegistry>,
    providers: Arc<ProvidersConfig>,
    clients: DashMap<String, Arc<dyn BackendClient>>,
}

impl ClientPool {
    pub fn new(registry: Arc<ModelRegistry>, providers: Arc<ProvidersConfig>) -> Self {
        Self { registry, providers, clients: DashMap::new() }
    }

    /// Construct the one client this descriptor needs. Returns `None` if its
    /// provider has no configured credential — absence disables the model
    /// rather than producing a broken client.
    fn build_client(&self, descriptor: &ModelDescriptor) -> Option<Arc<dyn BackendClient>> {
        if !self.providers.is_configured(descriptor.provider) {
            return None;
        }

        let config = self.providers.get(descriptor.provider)?;
        let base_url = self.providers.base_url(descriptor.provider);
        let api_key = config.api_key.clone();
        let model_name = descriptor.provider_model_name.clone();

        let client: Arc<dyn BackendClient> = match descriptor.provider {
            Provider::Openai => Arc::new(OpenAiClient::new(base_url, api_key, model_name)),
            Provider::Anthropic => Arc::new(AnthropicClient::new(base_url, api_key, model_name)),
            Provider::Google => Arc::new(GoogleClient::new(base_url, api_key, model_name)),
            Provider::Huggingface => Arc::new(HuggingFaceClient::new(base_url, api_key, model_name)),
        };

        Some(client)
    }
}

#[async_trait]
impl ClientResolver for ClientPool {
    async fn resolve(&self, key: &str) -> Option<Arc<dyn BackendClient>> {
        if let Some(existing) = self.clients.get(key) {
            return Some(Arc::clone(&existing));
        }

        let Some(entry) = self.registry.find_by_key_or_provider_name(key) else {
            tracing::debug!(model_key = key, "resolve on unknown key");
            return None;
        };
        let descriptor = entry.descriptor.clone();
        let Some(client) = self.build_client(&descriptor) else {
            tracing::debug!(model_key = key, provider = %descriptor.provider, "no configured credential for provider");
            return None;
        };

        self.clients.entry(descriptor.key.clone()).or_insert_with(|| Arc::clone(&client));
        self.clients.entry(descriptor.provider_model_name.clone()).or_insert_with(|| Arc::clone(&client));

        Some(client)
    }
}
