//! Routing engine: filters the registry by capability/context/availability,
//! scores survivors under the chosen preset's weights, and returns a
//! decision with a ranked alternatives list and a single fallback.

use std::sync::Arc;

use serde::Serialize;

use crate::category::Category;
use crate::error::RouterError;
use crate::model::Provider;
use crate::preset::{Preset, PriorityWeights};
use crate::registry::{ModelEntry, ModelRegistry, RegistrySnapshot};

/// `min(0.1, ...)` context-window bonus only kicks in past this many
/// estimated input tokens.
const CONTEXT_BONUS_TOKEN_THRESHOLD: f64 = 1000.0;
const CONTEXT_BONUS_CAP: f64 = 0.1;
const CONTEXT_BONUS_DIVISOR: f64 = 10_000.0;
const THROUGHPUT_BONUS_WEIGHT: f64 = 0.05;
/// Reasoning mentions the selected model's context window once it clears
/// this size.
const NOTABLE_CONTEXT_WINDOW_TOKENS: u32 = 100_000;
const MAX_ALTERNATIVES: usize = 4;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub key: String,
    pub score: f64,
    pub reason: String,
    pub provider: Provider,
    pub quality_score: f64,
    pub cost_per_1k_tokens: f64,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    pub selected_key: String,
    pub provider: Provider,
    pub category: Category,
    pub fallback_key: Option<String>,
    pub reasoning: String,
    pub confidence: f64,
    pub estimated_cost_usd: f64,
    pub estimated_latency_ms: f64,
    pub score: f64,
    #[serde(skip)]
    pub priority_weights: PriorityWeights,
    pub alternatives: Vec<Alternative>,
}

struct Scored {
    entry: Arc<ModelEntry>,
    score: f64,
    quality_score: f64,
    cost_score: f64,
}

/// `⌈len(prompt) / 4⌉` — the router-wide token estimation heuristic used
/// both for candidate filtering here and for input-token accounting in the
/// router service.
pub fn estimate_tokens(prompt: &str) -> u64 {
    (prompt.len() as u64).div_ceil(4)
}

pub struct RoutingEngine {
    registry: Arc<ModelRegistry>,
}

impl RoutingEngine {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn mark_model_unavailable(&self, key: &str) {
        self.registry.mark_unavailable(key);
    }

    pub fn reset_all_availability(&self) {
        self.registry.reset_all();
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Route a prompt already reduced to `(category, estimated_tokens)`.
    pub fn route(
        &self,
        category: Category,
        preset: Preset,
        estimated_tokens: u64,
    ) -> Result<RoutingDecision, RouterError> {
        route_snapshot(&self.registry.snapshot(), category, preset, estimated_tokens)
    }
}

/// Pure scoring entry point: takes a registry snapshot rather than the
/// registry itself, so it can be unit-tested and is provably
/// permutation-invariant in registry order up to stable ties.
pub fn route_snapshot(
    snapshot: &RegistrySnapshot,
    category: Category,
    preset: Preset,
    estimated_tokens: u64,
) -> Result<RoutingDecision, RouterError> {
    let candidates: Vec<Arc<ModelEntry>> = snapshot
        .entries
        .iter()
        .filter(|(entry, available)| {
            *available
                && entry.descriptor.supports_category(category)
                && u64::from(entry.descriptor.context_window_tokens) >= estimated_tokens
        })
        .map(|(entry, _)| Arc::clone(entry))
        .collect();

    if candidates.is_empty() {
        return Err(RouterError::NoCandidateModels { category: category.to_string() });
    }

    let weights = preset.weights();
    let max_price = candidates
        .iter()
        .map(|e| e.descriptor.price_input_per_million)
        .fold(0.0_f64, f64::max);
    let min_price = candidates
        .iter()
        .map(|e| e.descriptor.price_input_per_million)
        .fold(f64::INFINITY, f64::min);
    let max_latency_ms = candidates.iter().map(|e| e.descriptor.latency_ms()).fold(0.0_f64, f64::max);
    let max_throughput =
        candidates.iter().map(|e| e.descriptor.throughput_tps()).fold(0.0_f64, f64::max);

    let mut scored: Vec<Scored> = candidates
        .into_iter()
        .map(|entry| {
            score_candidate(
                &entry,
                category,
                weights,
                estimated_tokens,
                max_price,
                min_price,
                max_latency_ms,
                max_throughput,
            )
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let selected = &scored[0];
    let runner_up_score = scored.get(1).map(|s| s.score);

    let confidence = match runner_up_score {
        None => 1.0,
        Some(runner_up) if runner_up == 0.0 => 1.0,
        Some(runner_up) => {
            let top = selected.score;
            let denom = top.max(runner_up);
            if denom == 0.0 {
                1.0
            } else {
                (0.5 + 0.5 * (top - runner_up) / denom).clamp(0.0, 1.0)
            }
        }
    };

    let fallback_key = scored.get(1).map(|s| s.entry.descriptor.key.clone());

    let alternatives: Vec<Alternative> = scored
        .iter()
        .skip(1)
        .take(MAX_ALTERNATIVES)
        .map(|alt| describe_alternative(selected, alt))
        .collect();

    let reasoning = build_reasoning(selected, weights, estimated_tokens);

    Ok(RoutingDecision {
        selected_key: selected.entry.descriptor.key.clone(),
        provider: selected.entry.descriptor.provider,
        category,
        fallback_key,
        reasoning,
        confidence,
        estimated_cost_usd: 0.0,
        estimated_latency_ms: selected.entry.descriptor.latency_ms(),
        score: selected.score,
        priority_weights: weights,
        alternatives,
    })
}

#[allow(clippy::too_many_arguments)]
fn score_candidate(
    entry: &Arc<ModelEntry>,
    category: Category,
    weights: PriorityWeights,
    estimated_tokens: u64,
    max_price: f64,
    min_price: f64,
    max_latency_ms: f64,
    max_throughput: f64,
) -> Scored {
    let descriptor = &entry.descriptor;
    let q = descriptor.quality_prior(category);

    let quality_score = if weights.quality > 0.5 {
        let mut amplified = q.powf(0.3);
        if q > 0.9 {
            amplified += 0.1;
        }
        amplified
    } else {
        q
    };
    let quality_contribution = quality_score * weights.quality;

    let price = descriptor.price_input_per_million;
    let cost_score = if max_price == 0.0 {
        0.5
    } else if weights.cost > 0.4 {
        1.0 - price / max_price
    } else if price == 0.0 {
        0.6
    } else {
        let span = max_price - min_price;
        let n = if span == 0.0 { 0.0 } else { (price - min_price) / span };
        let base = 1.0 - (1.0 + 2.0 * n).ln() / 3.0_f64.ln();
        if weights.quality > 0.6 {
            let floor = if descriptor.is_premium_tier() { 0.6 } else { 0.4 };
            base.max(floor)
        } else {
            base
        }
    };
    let cost_contribution = cost_score * weights.cost;

    let latency_ms = descriptor.latency_ms();
    let raw_latency_score =
        if max_latency_ms == 0.0 { 1.0 } else { (1.0 - latency_ms / max_latency_ms).max(0.0) };
    let latency_score = if weights.quality > 0.6 && descriptor.is_premium_tier() {
        raw_latency_score.sqrt()
    } else {
        raw_latency_score
    };
    let latency_contribution = latency_score * weights.latency;

    let context_bonus = if estimated_tokens as f64 > CONTEXT_BONUS_TOKEN_THRESHOLD {
        let headroom =
            (f64::from(descriptor.context_window_tokens) - estimated_tokens as f64).max(0.0);
        (headroom / CONTEXT_BONUS_DIVISOR).min(CONTEXT_BONUS_CAP)
    } else {
        0.0
    };

    let throughput_bonus = if max_throughput == 0.0 {
        0.0
    } else {
        THROUGHPUT_BONUS_WEIGHT * descriptor.throughput_tps() / max_throughput
    };

    let score =
        quality_contribution + cost_contribution + latency_contribution + context_bonus + throughput_bonus;

    Scored { entry: Arc::clone(entry), score, quality_score: q, cost_score }
}

fn describe_alternative(selected: &Scored, alt: &Scored) -> Alternative {
    let sd = &selected.entry.descriptor;
    let ad = &alt.entry.descriptor;

    let mut notes = Vec::new();
    if alt.quality_score > selected.quality_score {
        notes.push("higher quality".to_owned());
    } else if alt.quality_score < selected.quality_score {
        notes.push("lower quality".to_owned());
    }
    if ad.price_input_per_million < sd.price_input_per_million {
        notes.push("cheaper".to_owned());
    } else if ad.price_input_per_million > sd.price_input_per_million {
        notes.push("more expensive".to_owned());
    }
    if ad.latency_ms() < sd.latency_ms() {
        notes.push("lower latency".to_owned());
    } else if ad.latency_ms() > sd.latency_ms() {
        notes.push("higher latency".to_owned());
    }
    if ad.context_window_tokens > sd.context_window_tokens {
        notes.push("larger context window".to_owned());
    }

    let reason = if notes.is_empty() {
        "comparable across quality, cost, latency, and context window".to_owned()
    } else {
        notes.join(", ")
    };

    Alternative {
        key: ad.key.clone(),
        score: alt.score,
        reason,
        provider: ad.provider,
        quality_score: alt.quality_score,
        cost_per_1k_tokens: ad.price_input_per_1k(),
        latency_ms: ad.latency_ms(),
    }
}

fn build_reasoning(selected: &Scored, weights: PriorityWeights, estimated_tokens: u64) -> String {
    let dominant = dominant_priority(weights);
    let descriptor = &selected.entry.descriptor;

    let mut reasoning = match dominant {
        Some("quality") => format!(
            "selected {} for its quality prior ({:.2}) under a quality-weighted preset",
            descriptor.key, selected.quality_score
        ),
        Some("cost") => format!(
            "selected {} for its cost profile (${:.2}/M input tokens) under a cost-weighted preset",
            descriptor.key, descriptor.price_input_per_million
        ),
        Some("latency") => format!(
            "selected {} for its low latency ({:.0}ms p50) under a latency-weighted preset",
            descriptor.key,
            descriptor.latency_ms()
        ),
        _ => format!("selected {} for balanced performance across quality, cost, and latency", descriptor.key),
    };

    if descriptor.context_window_tokens > NOTABLE_CONTEXT_WINDOW_TOKENS {
        reasoning.push_str(&format!(
            "; context window ({} tokens) comfortably covers the estimated {estimated_tokens} input tokens",
            descriptor.context_window_tokens
        ));
    }

    reasoning.push_str(&format!("; throughput ~{:.0} tokens/sec", descriptor.throughput_tps()));
    reasoning
}

fn dominant_priority(weights: PriorityWeights) -> Option<&'static str> {
    let candidates =
        [("quality", weights.quality), ("cost", weights.cost), ("latency", weights.latency)];
    let max = candidates.iter().map(|(_, w)| *w).fold(f64::MIN, f64::max);
    let winners: Vec<&str> = candidates.iter().filter(|(_, w)| *w == max).map(|(name, _)| *name).collect();
    if winners.len() == 1 { Some(winners[0]) } else { None }
}
