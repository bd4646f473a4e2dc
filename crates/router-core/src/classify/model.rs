//! Model-backed classifier: dispatches a classification prompt to a
//! designated classifier backend and parses a structured JSON reply.

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;

use crate::backend::{BackendClient, GenerateOptions};
use crate::category::Category;
use crate::error::RouterError;

/// Default classifier backend key, used unless the caller configures a
/// different one.
pub const DEFAULT_CLASSIFIER_KEY: &str = "gpt-4o-mini";

const CLASSIFIER_MAX_TOKENS: u32 = 200;
const CLASSIFIER_TEMPERATURE: f64 = 0.1;
const CLASSIFIER_TIMEOUT_MS: u64 = 10_000;

const SYSTEM_PROMPT: &str = "You are a prompt classification expert. Classify the user's prompt \
into exactly one category and respond with JSON only.";

#[derive(Debug, Clone)]
pub struct ModelClassificationResult {
    pub category: Category,
    pub confidence: f64,
    pub method: &'static str,
    pub model_used: String,
    pub latency_ms: u64,
    pub reasoning: String,
    pub raw_response: String,
}

#[derive(Debug, Deserialize)]
struct ClassifierReply {
    category: String,
    confidence: f64,
    reasoning: String,
}

pub struct ModelClassifier {
    backend: Arc<dyn BackendClient>,
    classifier_key: String,
}

impl ModelClassifier {
    pub fn new(backend: Arc<dyn BackendClient>, classifier_key: impl Into<String>) -> Self {
        Self { backend, classifier_key: classifier_key.into() }
    }

    /// Find the first balanced `{...}` block in `s`, tracking string
    /// literals so a brace inside quoted reasoning text doesn't close the
    /// object early or get mistaken for the end of it.
    fn first_json_object(s: &str) -> Option<&str> {
        let start = s.find('{')?;
        let mut depth: i32 = 0;
        let mut in_string = false;
        let mut escaped = false;

        for (i, c) in s.char_indices().skip(start) {
            if in_string {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    in_string = false;
                }
                continue;
            }

            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&s[start..i + c.len_utf8()]);
                    }
                }
                _ => {}
            }
        }

        None
    }

    fn user_prompt(prompt: &str) -> String {
        format!(
            "Classify the following prompt into exactly one of: CODE, SUMMARIZE, QA, CREATIVE.\n\n\
             Respond with JSON only, matching this schema:\n\
             {{\"category\": \"CODE|SUMMARIZE|QA|CREATIVE\", \"confidence\": 0.0-1.0, \"reasoning\": \"...\"}}\n\n\
             Prompt:\n{prompt}"
        )
    }

    /// Parse a raw classifier reply. Never fails: on any parse/validation
    /// error this returns `Unknown` at confidence 0.1 with the error folded
    /// into `reasoning` — only transport failures are reported as an `Err`
    /// from [`Self::classify_async`].
    fn parse_reply(raw: &str, model_used: &str, latency_ms: u64) -> ModelClassificationResult {
        let trimmed = raw.trim();
        let Some(block) = Self::first_json_object(trimmed) else {
            return Self::unparseable(raw, model_used, latency_ms, "no JSON object found in reply");
        };

        let reply: ClassifierReply = match serde_json::from_str(block) {
            Ok(reply) => reply,
            Err(e) => {
                return Self::unparseable(raw, model_used, latency_ms, &format!("invalid JSON: {e}"));
            }
        };

        ModelClassificationResult {
            category: Category::parse_lenient(&reply.category),
            confidence: reply.confidence.clamp(0.0, 1.0),
            method: "model",
            model_used: model_used.to_owned(),
            latency_ms,
            reasoning: reply.reasoning,
            raw_response: raw.to_owned(),
        }
    }

    fn unparseable(
        raw: &str,
        model_used: &str,
        latency_ms: u64,
        error: &str,
    ) -> ModelClassificationResult {
        ModelClassificationResult {
            category: Category::Unknown,
            confidence: 0.1,
            method: "model",
            model_used: model_used.to_owned(),
            latency_ms,
            reasoning: format!("failed to parse classifier reply: {error}"),
            raw_response: raw.to_owned(),
        }
    }

    /// Dispatch the classification prompt. Returns `Err` only on a
    /// transport-level failure of the underlying backend call — the caller
    /// (the hybrid classifier) is responsible for degrading gracefully on
    /// that error.
    pub async fn classify_async(
        &self,
        prompt: &str,
    ) -> Result<ModelClassificationResult, RouterError> {
        let mut options = GenerateOptions::new(
            CLASSIFIER_MAX_TOKENS,
            CLASSIFIER_TEMPERATURE,
            CLASSIFIER_TIMEOUT_MS,
        );
        options.system_prompt = Some(SYSTEM_PROMPT.to_owned());

        let started = Instant::now();
        let result = self
            .backend
            .generate(&Self::user_prompt(prompt), &options)
            .await
            .map_err(|e| RouterError::Classification(e.to_string()))?;
        let latency_ms = started.elapsed().as_millis() as u64;

        Ok(Self::parse_reply(&result.content, &self.classifier_key, latency_ms))
    }
}
