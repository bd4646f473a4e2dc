//! The backend-client contract the router depends on but does not
//! implement. Concrete HTTP-speaking implementations live in the
//! `router-providers` crate; `router-core` only declares the trait so the
//! classifiers and router service can depend on it without pulling in
//! `reqwest`.

use async_trait::async_trait;

use crate::model::Provider;

/// Generation parameters for one `generate` call. Mirrors the per-category
/// defaults the router service computes plus a few pass-through knobs the
/// backend-client contract allows but the core never sets itself.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_ms: u64,
    pub system_prompt: Option<String>,
    pub top_p: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub stop_sequences: Vec<String>,
    pub json_mode: bool,
}

impl GenerateOptions {
    pub fn new(max_tokens: u32, temperature: f64, timeout_ms: u64) -> Self {
        Self {
            max_tokens,
            temperature,
            timeout_ms,
            system_prompt: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            stop_sequences: Vec::new(),
            json_mode: false,
        }
    }
}

/// Result of one successful `generate` call.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub content: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost_usd: Option<f64>,
    pub latency_ms: u64,
}

/// Errors a backend client can raise. All map to
/// [`crate::error::RouterError::Backend`] at the call site — the router
/// service does not distinguish between them beyond logging, since every
/// one triggers the same mark-unavailable + fallback policy.
#[derive(Debug, thiserror::Error)]
pub enum BackendClientError {
    #[error("request to {provider} timed out after {timeout_ms}ms")]
    Timeout { provider: Provider, timeout_ms: u64 },
    #[error("{provider} returned an error: {message}")]
    Upstream { provider: Provider, message: String },
    #[error("{provider} returned an empty reply")]
    EmptyReply { provider: Provider },
    #[error("missing or invalid credential for {provider}")]
    Unauthorized { provider: Provider },
}

/// A uniform wrapper around one remote LLM provider's HTTP API for one
/// specific model. One instance per model key, cached by the pool in
/// `router-providers`.
#[async_trait]
pub trait BackendClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// The provider-native wire name this client sends on every request.
    fn model_name(&self) -> &str;

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GenerateResult, BackendClientError>;

    /// Lightweight health check. Defaults to `true` — most providers expose
    /// no dedicated probe cheaper than a real request, so the default
    /// assumes health until a real `generate` call proves otherwise.
    async fn is_available(&self) -> bool {
        true
    }
}
