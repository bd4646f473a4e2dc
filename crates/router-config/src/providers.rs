//! `[providers.*]` tables: one optional credential block per backend
//! provider. A provider with no table (or an empty `api_key`) is simply
//! absent from the pool — its models are never resolvable candidates, not a
//! fatal config error.

use router_core::Provider;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_owned()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com/v1".to_owned()
}

fn default_google_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_owned()
}

fn default_huggingface_base_url() -> String {
    "https://api-inference.huggingface.co".to_owned()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    pub api_key: SecretString,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: Option<ProviderConfig>,
    #[serde(default)]
    pub anthropic: Option<ProviderConfig>,
    #[serde(default)]
    pub google: Option<ProviderConfig>,
    #[serde(default)]
    pub huggingface: Option<ProviderConfig>,
}

impl ProvidersConfig {
    pub fn get(&self, provider: Provider) -> Option<&ProviderConfig> {
        match provider {
            Provider::Openai => self.openai.as_ref(),
            Provider::Anthropic => self.anthropic.as_ref(),
            Provider::Google => self.google.as_ref(),
            Provider::Huggingface => self.huggingface.as_ref(),
        }
    }

    /// Whether a usable (non-empty api_key) credential exists for `provider`.
    pub fn is_configured(&self, provider: Provider) -> bool {
        self.get(provider).is_some_and(|p| !p.api_key.expose_secret().is_empty())
    }

    pub fn base_url(&self, provider: Provider) -> String {
        let configured = self.get(provider).and_then(|p| p.base_url.clone());
        configured.unwrap_or_else(|| match provider {
            Provider::Openai => default_openai_base_url(),
            Provider::Anthropic => default_anthropic_base_url(),
            Provider::Google => default_google_base_url(),
            Provider::Huggingface => default_huggingface_base_url(),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for provider in
            [Provider::Openai, Provider::Anthropic, Provider::Google, Provider::Huggingface]
        {
            if let Some(config) = self.get(provider) {
                if config.api_key.expose_secret().is_empty() {
                    anyhow::bail!("providers.{provider} api_key must not be empty when configured");
                }
            }
        }
        Ok(())
    }
}
