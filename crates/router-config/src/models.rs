//! `[[models]]` entries and their conversion into `router_core::ModelDescriptor`.

use std::collections::HashMap;

use router_core::{Category, ModelDescriptor, Provider};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub key: String,
    pub provider_model_name: String,
    pub provider: Provider,
    pub context_window_tokens: u32,
    pub price_input_per_million: f64,
    pub price_output_per_million: f64,
    pub latency_p50_seconds: f64,
    #[serde(default)]
    pub quality_prior_by_category: HashMap<Category, f64>,
}

impl ModelConfig {
    pub fn into_descriptor(self) -> ModelDescriptor {
        ModelDescriptor {
            key: self.key,
            provider_model_name: self.provider_model_name,
            provider: self.provider,
            context_window_tokens: self.context_window_tokens,
            price_input_per_million: self.price_input_per_million,
            price_output_per_million: self.price_output_per_million,
            latency_p50_seconds: self.latency_p50_seconds,
            quality_prior_by_category: self.quality_prior_by_category,
        }
    }
}

pub fn validate_models(models: &[ModelConfig]) -> anyhow::Result<()> {
    let mut keys = std::collections::HashSet::new();
    let mut provider_names = std::collections::HashSet::new();

    for model in models {
        if model.context_window_tokens == 0 {
            anyhow::bail!("model '{}' must have a positive context_window_tokens", model.key);
        }
        if model.price_input_per_million < 0.0 || model.price_output_per_million < 0.0 {
            anyhow::bail!("model '{}' prices must be non-negative", model.key);
        }
        if model.latency_p50_seconds <= 0.0 {
            anyhow::bail!("model '{}' latency_p50_seconds must be positive", model.key);
        }
        if !keys.insert(model.key.clone()) {
            anyhow::bail!("duplicate model key: `{}`", model.key);
        }
        if !provider_names.insert(model.provider_model_name.clone()) {
            anyhow::bail!("duplicate model provider_model_name: `{}`", model.provider_model_name);
        }
    }

    Ok(())
}
