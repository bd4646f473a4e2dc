//! Model descriptors: the immutable (except `available`) facts the routing
//! engine scores candidates against.

use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer};

use crate::category::Category;

/// `provider` is spelled lowercase in TOML config (`provider = "openai"`)
/// but spelled `OPENAI`/`ANTHROPIC`/`GOOGLE`/`HUGGINGFACE` on the wire — so
/// `Deserialize` is derived with `rename_all = "lowercase"` and `Serialize`
/// is hand-written against [`Provider::as_str`] instead of matching case
/// conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Openai,
    Anthropic,
    Google,
    Huggingface,
}

impl Provider {
    pub const fn as_str(self) -> &'static str {
        match self {
            Provider::Openai => "OPENAI",
            Provider::Anthropic => "ANTHROPIC",
            Provider::Google => "GOOGLE",
            Provider::Huggingface => "HUGGINGFACE",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Provider {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The static facts about one routable model. `available` is intentionally
/// not a field here — the registry wraps every descriptor in an
/// [`crate::registry::ModelEntry`] that holds the mutable availability flag
/// separately, so this type stays `Clone`-cheap and immutable.
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    pub key: String,
    pub provider_model_name: String,
    pub provider: Provider,
    pub context_window_tokens: u32,
    pub price_input_per_million: f64,
    pub price_output_per_million: f64,
    pub latency_p50_seconds: f64,
    pub quality_prior_by_category: HashMap<Category, f64>,
}

impl ModelDescriptor {
    /// Quality prior for `category`; missing entries default to 0.5.
    pub fn quality_prior(&self, category: Category) -> f64 {
        self.quality_prior_by_category.get(&category).copied().unwrap_or(0.5)
    }

    /// Whether this model declares any quality prior for `category` — the
    /// capability filter in the routing engine's candidate step.
    ///
    /// `Unknown` is never a key any model declares explicitly (the
    /// classifier only ever emits it as a fallback, never a target label),
    /// so treating it as unsupported would make every `UNKNOWN`-classified
    /// prompt fail with `NoCandidateModels`. `quality_prior` already treats
    /// the category space as total (missing entries default to 0.5); the
    /// capability filter honors that for `Unknown` specifically rather than
    /// requiring an explicit prior no model could ever list.
    pub fn supports_category(&self, category: Category) -> bool {
        category == Category::Unknown || self.quality_prior_by_category.contains_key(&category)
    }

    pub fn latency_ms(&self) -> f64 {
        1000.0 * self.latency_p50_seconds
    }

    pub fn throughput_tps(&self) -> f64 {
        (1000.0 / self.latency_p50_seconds).round()
    }

    pub fn price_input_per_1k(&self) -> f64 {
        self.price_input_per_million / 1000.0
    }

    pub fn price_output_per_1k(&self) -> f64 {
        self.price_output_per_million / 1000.0
    }

    /// `"claude"` or `"gpt-5"` in the key — the premium-tier string match
    /// the scoring function special-cases. A deliberate substring match
    /// rather than an explicit `tier` field.
    pub fn is_premium_tier(&self) -> bool {
        let key = self.key.to_ascii_lowercase();
        key.contains("claude") || key.contains("gpt-5")
    }

    pub fn estimate_cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        (input_tokens as f64 / 1_000_000.0) * self.price_input_per_million
            + (output_tokens as f64 / 1_000_000.0) * self.price_output_per_million
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ModelDescriptor {
        ModelDescriptor {
            key: "claude-3-7-sonnet-20250219".into(),
            provider_model_name: "claude-3-7-sonnet-20250219".into(),
            provider: Provider::Anthropic,
            context_window_tokens: 200_000,
            price_input_per_million: 3.0,
            price_output_per_million: 15.0,
            latency_p50_seconds: 1.2,
            quality_prior_by_category: HashMap::from([(Category::Code, 0.98)]),
        }
    }

    #[test]
    fn provider_serializes_screaming_snake_case_but_deserializes_lowercase() {
        let json = serde_json::to_string(&Provider::Huggingface).unwrap();
        assert_eq!(json, "\"HUGGINGFACE\"");
        let parsed: Provider = serde_json::from_str("\"huggingface\"").unwrap();
        assert_eq!(parsed, Provider::Huggingface);
    }

    #[test]
    fn missing_quality_prior_defaults_to_half() {
        let d = descriptor();
        assert_eq!(d.quality_prior(Category::Creative), 0.5);
        assert_eq!(d.quality_prior(Category::Code), 0.98);
    }

    #[test]
    fn unknown_category_is_always_supported() {
        let d = descriptor();
        assert!(d.supports_category(Category::Unknown));
        assert!(d.supports_category(Category::Code));
        assert!(!d.supports_category(Category::Creative));
    }

    #[test]
    fn premium_tier_matches_substrings() {
        assert!(descriptor().is_premium_tier());
        let mut gpt5 = descriptor();
        gpt5.key = "gpt-5".into();
        assert!(gpt5.is_premium_tier());
        let mut mini = descriptor();
        mini.key = "gpt-4o-mini".into();
        assert!(!mini.is_premium_tier());
    }

    #[test]
    fn derived_fields() {
        let d = descriptor();
        assert_eq!(d.latency_ms(), 1200.0);
        assert!((d.throughput_tps() - (1000.0 / 1.2).round()).abs() < f64::EPSILON);
    }
}
