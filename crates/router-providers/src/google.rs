//! Gemini `generateContent` client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use router_core::{BackendClient, BackendClientError, GenerateOptions, GenerateResult, Provider};

use crate::common::{estimate_tokens, map_reqwest_error};

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt_token_count: u64,
    #[serde(rename = "candidatesTokenCount")]
    candidates_token_count: u64,
}

pub struct GoogleClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model_name: String,
}

impl GoogleClient {
    pub fn new(base_url: String, api_key: SecretString, model_name: String) -> Self {
        Self { client: Client::new(), base_url, api_key, model_name }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model_name,
            self.api_key.expose_secret()
        )
    }
}

#[async_trait]
impl BackendClient for GoogleClient {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GenerateResult, BackendClientError> {
        let body = GenerateContentRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_tokens,
            },
        };

        let started = Instant::now();
        let response = self
            .client
            .post(self.generate_url())
            .timeout(Duration::from_millis(options.timeout_ms))
            .json(&body)
            .send()
            .await
            .map_err(|e| map_reqwest_error(&e, Provider::Google, options.timeout_ms))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BackendClientError::Upstream {
                provider: Provider::Google,
                message: format!("{status}: {text}"),
            });
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|e| BackendClientError::Upstream {
                provider: Provider::Google,
                message: format!("invalid response body: {e}"),
            })?;

        let content = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(BackendClientError::EmptyReply { provider: Provider::Google });
        }

        let (input_tokens, output_tokens) = parsed
            .usage_metadata
            .map(|u| (u.prompt_token_count, u.candidates_token_count))
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
