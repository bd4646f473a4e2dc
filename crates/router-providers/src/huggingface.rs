//! HuggingFace Inference API client. The API reports no token usage, so
//! both directions always fall back to the character-based estimate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use router_core::{BackendClient, BackendClientError, GenerateOptions, GenerateResult, Provider};

use crate::common::{estimate_tokens, map_reqwest_error};

#[derive(Serialize)]
struct Parameters {
    max_new_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Sequence(Vec<GeneratedText>),
    Single(GeneratedText),
}

pub struct HuggingFaceClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model_name: String,
}

impl HuggingFaceClient {
    pub fn new(base_url: String, api_key: SecretString, model_name: String) -> Self {
        Self { client: Client::new(), base_url, api_key, model_name }
    }

    fn inference_url(&self) -> String {
        format!("{}/models/{}", self.base_url.trim_end_matches('/'), self.model_name)
    }
}

#[async_trait]
impl BackendClient for HuggingFaceClient {
    fn provider(&self) -> Provider {
        Provider::Huggingface
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GenerateResult, BackendClientError> {
        let body = InferenceRequest {
            inputs: prompt,
            parameters: Parameters { max_new_tokens: options.max_tokens, temperature: options.temperature },
        };

        let started = Instant::now();
        let response = self
            .client
            .post(self.inference_url())
            .bearer_auth(self.api_key.expose_secret())
            .timeout(Duration::from_millis(options.timeout_ms))
            .json(&body)
            .send()
            .await
            .map_err(|e| map_reqwest_error(&e, Provider::Huggingface, options.timeout_ms))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BackendClientError::Upstream {
                provider: Provider::Huggingface,
                message: format!("{status}: {text}"),
            });
        }

        let parsed: InferenceResponse = response.json().await.map_err(|e| BackendClientError::Upstream {
            provider: Provider::Huggingface,
            message: format!("invalid response body: {e}"),
        })?;

        let content = match parsed {
            InferenceResponse::Sequence(mut items) => {
                if items.is_empty() { String::new() } else { items.remove(0).generated_text }
            }
            InferenceResponse::Single(item) => item.generated_text,
        };

        if content.is_empty() {
            return Err(BackendClientError::EmptyReply { provider: Provider::Huggingface });
        }

        let input_tokens = estimate_tokens(prompt);
        let output_tokens = estimate_tokens(&content);

        Ok(GenerateResult {
            content,
            input_tokens,
            output_tokens,
            cost_usd: None,
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }
}
