//! Router service: end-to-end orchestration — classify, route, invoke,
//! observe, fall back, truncate, log.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Serialize;

use crate::analytics::{Analytics, Metrics, RequestLogEntry};
use crate::backend::{BackendClient, BackendClientError, GenerateOptions};
use crate::category::{Category, category_profile};
use crate::classify::{ClassificationMethod, HybridClassifier};
use crate::error::RouterError;
use crate::preset::Preset;
use crate::routing::{RoutingDecision, RoutingEngine, estimate_tokens};

/// Well-known key always used for the single fallback attempt, regardless
/// of the original category.
pub const STATIC_FALLBACK_KEY: &str = "gpt-4o-mini";
const STATIC_FALLBACK_TEMPERATURE: f64 = 0.7;
/// Assumed per-1k-token cost for the static fallback when its own client
/// does not report usage-based pricing.
const STATIC_FALLBACK_ASSUMED_COST_PER_1K: f64 = 0.00015;
/// Truncation length, in characters.
const TRUNCATION_LIMIT: usize = 3000;
const TRUNCATION_CUT_FLOOR_RATIO: f64 = 0.8;

/// Resolves a model key to a live backend client. Implemented by the
/// lazily populated, dual-keyed client pool in `router-providers`; kept as
/// a trait here so `router-core` never depends on `reqwest`.
#[async_trait]
pub trait ClientResolver: Send + Sync {
    async fn resolve(&self, key: &str) -> Option<Arc<dyn BackendClient>>;
}

#[derive(Debug, Clone, Copy)]
pub struct RouterServiceConfig {
    /// Clamped to [5000, 120000] by the configuration layer; the service
    /// itself does not re-validate.
    pub request_timeout_ms: u64,
}

impl Default for RouterServiceConfig {
    fn default() -> Self {
        Self { request_timeout_ms: 30_000 }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterResponse {
    pub text: String,
    pub model_used: String,
    pub category: Category,
    pub classification_confidence: f64,
    pub decision: RoutingDecision,
    pub actual_cost_usd: f64,
    pub actual_latency_ms: u64,
    pub cost_savings_usd: f64,
    pub timestamp: u64,
    pub was_truncated: bool,
}

pub struct RouterService {
    hybrid: HybridClassifier,
    engine: RoutingEngine,
    resolver: Arc<dyn ClientResolver>,
    analytics: Analytics,
    config: RouterServiceConfig,
}

impl RouterService {
    pub fn new(
        hybrid: HybridClassifier,
        engine: RoutingEngine,
        resolver: Arc<dyn ClientResolver>,
        config: RouterServiceConfig,
    ) -> Self {
        Self { hybrid, engine, resolver, analytics: Analytics::new(), config }
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    pub fn routing_engine(&self) -> &RoutingEngine {
        &self.engine
    }

    pub async fn route_prompt(
        &self,
        prompt: &str,
        preset: Preset,
        user_id: Option<String>,
        session_id: Option<String>,
    ) -> Result<RouterResponse, RouterError> {
        if prompt.is_empty() {
            return Err(RouterError::Input("prompt must be a non-empty string".to_owned()));
        }

        let start = Instant::now();

        let classification = self.hybrid.classify(prompt).await;
        let category = classification.category;
        let classification_confidence = classification.confidence;
        let classification_method = classification.method;

        let decision = self.engine.route(category, preset, estimate_tokens(prompt))?;

        let (temperature, max_tokens) = generation_defaults(category);
        let options =
            GenerateOptions::new(max_tokens, temperature, self.config.request_timeout_ms);

        let primary_outcome = match self.resolver.resolve(&decision.selected_key).await {
            Some(client) => client.generate(prompt, &options).await,
            None => Err(BackendClientError::Unauthorized { provider: decision.provider }),
        };

        match primary_outcome {
            Ok(result) => {
                let actual_cost_usd = actual_cost(
                    self.engine.registry().find(&decision.selected_key),
                    result.input_tokens,
                    result.output_tokens,
                );
                let (text, was_truncated) = truncate(&result.content);
                let actual_latency_ms = start.elapsed().as_millis() as u64;
                let cost_savings_usd = self.cost_savings(category, actual_cost_usd);

                let response = RouterResponse {
                    text,
                    model_used: decision.selected_key.clone(),
                    category,
                    classification_confidence,
                    decision: decision.clone(),
                    actual_cost_usd,
                    actual_latency_ms,
                    cost_savings_usd,
                    timestamp: now_millis(),
                    was_truncated,
                };

                self.log_outcome(
                    prompt,
                    &response,
                    classification_method.as_str(),
                    preset,
                    user_id,
                    session_id,
                    None,
                );

                Ok(response)
            }
            Err(primary_error) => {
                self.engine.mark_model_unavailable(&decision.selected_key);
                self.invoke_static_fallback(
                    prompt,
                    category,
                    preset,
                    classification_confidence,
                    classification_method.as_str(),
                    &decision,
                    primary_error,
                    start,
                    user_id,
                    session_id,
                )
                .await
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn invoke_static_fallback(
        &self,
        prompt: &str,
        category: Category,
        preset: Preset,
        classification_confidence: f64,
        classification_method: &str,
        original_decision: &RoutingDecision,
        primary_error: BackendClientError,
        start: Instant,
        user_id: Option<String>,
        session_id: Option<String>,
    ) -> Result<RouterResponse, RouterError> {
        let (_, max_tokens) = generation_defaults(category);
        let options = GenerateOptions::new(
            max_tokens,
            STATIC_FALLBACK_TEMPERATURE,
            self.config.request_timeout_ms,
        );

        let fallback_outcome = match self.resolver.resolve(STATIC_FALLBACK_KEY).await {
            Some(client) => client.generate(prompt, &options).await,
            None => Err(BackendClientError::Unauthorized { provider: original_decision.provider }),
        };

        match fallback_outcome {
            Ok(result) => {
                let input_tokens = result.input_tokens;
                let output_tokens = result.output_tokens;
                let assumed_cost = STATIC_FALLBACK_ASSUMED_COST_PER_1K
                    * (input_tokens + output_tokens) as f64
                    / 1000.0;
                let actual_cost_usd = result.cost_usd.unwrap_or(assumed_cost);
                let (text, was_truncated) = truncate(&result.content);
                let actual_latency_ms = start.elapsed().as_millis() as u64;
                let cost_savings_usd = self.cost_savings(category, actual_cost_usd);

                let mut decision = original_decision.clone();
                decision.selected_key = STATIC_FALLBACK_KEY.to_owned();

                let response = RouterResponse {
                    text,
                    model_used: STATIC_FALLBACK_KEY.to_owned(),
                    category,
                    classification_confidence,
                    decision,
                    actual_cost_usd,
                    actual_latency_ms,
                    cost_savings_usd,
                    timestamp: now_millis(),
                    was_truncated,
                };

                self.log_outcome(
                    prompt,
                    &response,
                    classification_method,
                    preset,
                    user_id,
                    session_id,
                    None,
                );

                Ok(response)
            }
            Err(fallback_error) => {
                let message = format!(
                    "primary model {} failed ({primary_error}); static fallback {} also failed ({fallback_error})",
                    original_decision.selected_key, STATIC_FALLBACK_KEY
                );
                self.log_failure(
                    prompt,
                    category,
                    &original_decision.selected_key,
                    classification_method,
                    classification_confidence,
                    preset,
                    user_id,
                    session_id,
                    &message,
                );
                Err(RouterError::FallbackExhausted { original_error: primary_error.to_string() })
            }
        }
    }

    fn cost_savings(&self, category: Category, actual_cost_usd: f64) -> f64 {
        let most_expensive = self
            .engine
            .registry()
            .iter()
            .filter(|e| e.descriptor.supports_category(category))
            .max_by(|a, b| {
                a.descriptor.price_input_per_million.total_cmp(&b.descriptor.price_input_per_million)
            });

        let Some(most_expensive) = most_expensive else {
            return 0.0;
        };

        let max_cost = most_expensive.descriptor.price_input_per_1k();
        (max_cost - actual_cost_usd).max(0.0)
    }

    #[allow(clippy::too_many_arguments)]
    fn log_outcome(
        &self,
        prompt: &str,
        response: &RouterResponse,
        classification_method: &str,
        preset: Preset,
        user_id: Option<String>,
        session_id: Option<String>,
        error: Option<String>,
    ) {
        let quality_score = self
            .engine
            .registry()
            .find(&response.model_used)
            .map(|e| e.descriptor.quality_prior(response.category))
            .unwrap_or(0.5);

        self.analytics.record(RequestLogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            prompt: prompt.to_owned(),
            category: response.category,
            selected_key: response.model_used.clone(),
            provider: response.decision.provider.to_string(),
            cost_usd: response.actual_cost_usd,
            latency_ms: response.actual_latency_ms as f64,
            quality_score,
            classification_method: classification_method.to_owned(),
            classification_confidence: response.classification_confidence,
            preset: preset_label(preset),
            timestamp: response.timestamp,
            user_id,
            session_id,
            error,
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn log_failure(
        &self,
        prompt: &str,
        category: Category,
        attempted_key: &str,
        classification_method: &str,
        classification_confidence: f64,
        preset: Preset,
        user_id: Option<String>,
        session_id: Option<String>,
        error: &str,
    ) {
        self.analytics.record(RequestLogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            prompt: prompt.to_owned(),
            category,
            selected_key: attempted_key.to_owned(),
            provider: String::new(),
            cost_usd: 0.0,
            latency_ms: 0.0,
            quality_score: 0.0,
            classification_method: classification_method.to_owned(),
            classification_confidence,
            preset: preset_label(preset),
            timestamp: now_millis(),
            user_id,
            session_id,
            error: Some(error.to_owned()),
        });
    }

    pub fn recent_logs(&self, n: usize) -> Vec<RequestLogEntry> {
        self.analytics.recent_logs(n)
    }

    pub fn metrics(&self) -> Metrics {
        self.analytics.metrics()
    }

    pub fn reset_metrics(&self) {
        self.analytics.reset_metrics();
    }
}

fn preset_label(preset: Preset) -> String {
    match preset {
        Preset::Balanced => "BALANCED",
        Preset::Quality => "QUALITY",
        Preset::Cost => "COST",
        Preset::Latency => "LATENCY",
    }
    .to_owned()
}

fn now_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

/// Per-category generation defaults, adjusted upward when the category's
/// reference profile suggests a larger typical output.
pub fn generation_defaults(category: Category) -> (f64, u32) {
    let (temperature, baseline_max_tokens) = match category {
        Category::Code => (0.1, 2000),
        Category::Summarize => (0.3, 1500),
        Category::Qa => (0.2, 2000),
        Category::Creative => (0.8, 2500),
        Category::MathReasoning => (0.1, 3000),
        Category::Unknown => (0.5, 1500),
    };

    let profile = category_profile(category);
    let max_tokens = if profile.estimated_output_tokens > baseline_max_tokens {
        (2 * baseline_max_tokens).max(1500)
    } else {
        baseline_max_tokens
    };

    (temperature, max_tokens)
}

/// `inputTokens`/`outputTokens` are derived from character counts only when
/// the backend does not report its own usage — callers should prefer
/// `result.input_tokens`/`output_tokens` directly, which is what this
/// function is given.
fn actual_cost(
    descriptor: Option<&Arc<crate::registry::ModelEntry>>,
    input_tokens: u64,
    output_tokens: u64,
) -> f64 {
    descriptor.map_or(0.0, |entry| entry.descriptor.estimate_cost(input_tokens, output_tokens))
}

/// Sentence-aware truncation. Returns `(text, was_truncated)`.
pub fn truncate(text: &str) -> (String, bool) {
    if text.len() <= TRUNCATION_LIMIT {
        return (text.to_owned(), false);
    }

    // TRUNCATION_LIMIT is a byte offset; a multibyte UTF-8 character can
    // straddle it, so back off to the nearest char boundary before slicing.
    let mut boundary = TRUNCATION_LIMIT;
    while !text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    let window = &text[..boundary];
    let last_period = window.rfind('.');
    let last_newline = window.rfind('\n');
    let cut = last_period.into_iter().chain(last_newline).max();

    match cut {
        Some(cut) if (cut as f64) > TRUNCATION_CUT_FLOOR_RATIO * TRUNCATION_LIMIT as f64 => {
            let mut truncated = text[..=cut].to_owned();
            truncated.push('\u{2026}');
            (truncated, true)
        }
        _ => (text.to_owned(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_defaults_match_the_category_table() {
        assert_eq!(generation_defaults(Category::Code), (0.1, 2000));
        // Summarize and MathReasoning's profiles estimate more output than
        // the baseline budgets for, so both come back doubled below.
        assert_eq!(generation_defaults(Category::Summarize), (0.3, 3000));
        assert_eq!(generation_defaults(Category::Qa), (0.2, 2000));
        assert_eq!(generation_defaults(Category::Creative), (0.8, 2500));
        assert_eq!(generation_defaults(Category::MathReasoning), (0.1, 6000));
        assert_eq!(generation_defaults(Category::Unknown), (0.5, 1500));
    }

    #[test]
    fn generation_defaults_doubles_baseline_when_profile_suggests_more_output() {
        // Summarize's profile (2000) exceeds its baseline (1500): the
        // override kicks in and doubles the baseline rather than using it
        // directly.
        let profile = category_profile(Category::Summarize);
        assert!(profile.estimated_output_tokens > 1500);
        let (_, max_tokens) = generation_defaults(Category::Summarize);
        assert_eq!(max_tokens, 3000);

        // MathReasoning's profile (3500) exceeds its baseline (3000) too.
        let profile = category_profile(Category::MathReasoning);
        assert!(profile.estimated_output_tokens > 3000);
        let (_, max_tokens) = generation_defaults(Category::MathReasoning);
        assert_eq!(max_tokens, 6000);
    }

    #[test]
    fn short_text_is_returned_verbatim() {
        let (text, truncated) = truncate("short reply");
        assert_eq!(text, "short reply");
        assert!(!truncated);
    }

    #[test]
    fn long_text_truncates_at_sentence_boundary() {
        let mut text = "a".repeat(2900);
        text.push_str(". This sentence pushes past the limit and keeps going");
        text.push_str(&"b".repeat(200));
        let (truncated, was_truncated) = truncate(&text);
        assert!(was_truncated);
        assert!(truncated.ends_with('\u{2026}'));
        assert!(truncated.len() <= TRUNCATION_LIMIT + 1 + '\u{2026}'.len_utf8());
    }

    #[test]
    fn period_at_index_zero_is_not_a_valid_cut() {
        // The only period sits at position 0; 0 is never > 0.8*L, so the
        // full text is returned untruncated.
        let mut text = ".".to_owned();
        text.push_str(&"a".repeat(3200));
        let (result, was_truncated) = truncate(&text);
        assert!(!was_truncated);
        assert_eq!(result, text);
    }

    #[test]
    fn multibyte_char_straddling_the_limit_does_not_panic() {
        // The 3-byte '€' starts at byte 2999, so byte 3000 falls mid-character.
        let mut text = "a".repeat(2999);
        text.push('€');
        text.push_str(". trailing sentence after the cut point");
        text.push_str(&"b".repeat(100));

        let (result, _) = truncate(&text);
        assert!(result.is_char_boundary(result.len()));
    }

    #[test]
    fn no_cut_candidate_returns_full_text() {
        let text = "a".repeat(3100);
        let (result, was_truncated) = truncate(&text);
        assert!(!was_truncated);
        assert_eq!(result, text);
    }
}
