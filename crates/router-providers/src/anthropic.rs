//! Anthropic Messages API client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use router_core::{BackendClient, BackendClientError, GenerateOptions, GenerateResult, Provider};

use crate::common::{estimate_tokens, map_reqwest_error};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

pub struct AnthropicClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model_name: String,
}

impl AnthropicClient {
    pub fn new(base_url: String, api_key: SecretString, model_name: String) -> Self {
        Self { client: Client::new(), base_url, api_key, model_name }
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl BackendClient for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GenerateResult, BackendClientError> {
        let body = MessagesRequest {
            model: &self.model_name,
            messages: vec![AnthropicMessage { role: "user", content: prompt }],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            system: options.system_prompt.as_deref(),
        };

        let started = Instant::now();
        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .timeout(Duration::from_millis(options.timeout_ms))
            .json(&body)
            .send()
            .await
            .map_err(|e| map_reqwest_error(&e, Provider::Anthropic, options.timeout_ms))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BackendClientError::Upstream {
                provider: Provider::Anthropic,
                message: format!("{status}: {text}"),
            });
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| BackendClientError::Upstream {
            provider: Provider::Anthropic,
            message: format!("invalid response body: {e}"),
        })?;

        let content = parsed.content.into_iter().map(|b| b.text).collect::<String>();
        if content.is_empty() {
            return Err(BackendClientError::EmptyReply { provider: Provider::Anthropic });
        }

        let (input_tokens, output_tokens) = parsed
            .usage
            .map(|u| (u.input_tokens, u.output_tokens))
            .unwrap_or_else(|| (estimate_tokens(prompt), estimate_tokens(&content)));

        Ok(GenerateResult {
            content,
            input_tokens,
            output_tokens,
            cost_usd: None,
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }
}
