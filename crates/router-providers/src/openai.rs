//! OpenAI-compatible chat-completions client, built against the router's
//! minimal non-streaming `generate()` contract (no header rules, no
//! request-context key forwarding, no streaming).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use router_core::{BackendClient, BackendClientError, GenerateOptions, GenerateResult, Provider};

use crate::common::{estimate_tokens, map_reqwest_error};

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model_name: String,
}

impl OpenAiClient {
    pub fn new(base_url: String, api_key: SecretString, model_name: String) -> Self {
        Self { client: Client::new(), base_url, api_key, model_name }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl BackendClient for OpenAiClient {
    fn provider(&self) -> Provider {
        Provider::Openai
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GenerateResult, BackendClientError> {
        let mut messages = Vec::new();
        if let Some(system) = &options.system_prompt {
            messages.push(ChatMessage { role: "system", content: system });
        }
        messages.push(ChatMessage { role: "user", content: prompt });

        let body = ChatRequest {
            model: &self.model_name,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose_secret())
            .timeout(Duration::from_millis(options.timeout_ms))
            .json(&body)
            .send()
            .await
            .map_err(|e| map_reqwest_error(&e, Provider::Openai, options.timeout_ms))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BackendClientError::Upstream {
                provider: Provider::Openai,
                message: format!("{status}: {text}"),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| BackendClientError::Upstream {
            provider: Provider::Openai,
            message: format!("invalid response body: {e}"),
        })?;

        let content = parsed.choices.into_iter().next().map(|c| c.message.content).unwrap_or_default();
        if content.is_empty() {
            return Err(BackendClientError::EmptyReply { provider: Provider::Openai });
        }

        let (input_tokens, output_tokens) = parsed
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
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
