//! Request/response bodies for the three public operations. Field casing
//! is `camelCase` throughout response bodies, matching `estimatedCostUsd`-
//! style names a browser front-end consumes directly.

use router_core::Preset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    pub model_name: String,
    pub provider: router_core::Provider,
    pub is_available: bool,
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ModelsAction {
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsActionResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub prompt: Option<serde_json::Value>,
    #[serde(default)]
    pub priority_preset: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl RouteRequest {
    /// Validate and resolve `prompt` to a string: 400 if missing or
    /// non-string.
    pub fn prompt_str(&self) -> Result<&str, &'static str> {
        match &self.prompt {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Ok(s.as_str()),
            Some(serde_json::Value::String(_)) => Err("prompt must be a non-empty string"),
            Some(_) => Err("prompt must be a string"),
            None => Err("prompt is required"),
        }
    }

    /// Resolve `priorityPreset`, defaulting to `fallback` when absent and
    /// rejecting unknown labels.
    pub fn resolve_preset(&self, fallback: Preset) -> Result<Preset, String> {
        match &self.priority_preset {
            None => Ok(fallback),
            Some(label) => Preset::parse_lenient(label)
                .ok_or_else(|| format!("unknown priorityPreset: `{label}`")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}
