//! In-memory analytics ring buffer: bounded history of routed requests plus
//! derived metrics. Not persisted — durable storage is an external concern
//! this module has no opinion on.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde::Serialize;

use crate::category::Category;

pub const RING_BUFFER_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLogEntry {
    pub id: String,
    pub prompt: String,
    pub category: Category,
    pub selected_key: String,
    pub provider: String,
    pub cost_usd: f64,
    pub latency_ms: f64,
    pub quality_score: f64,
    pub classification_method: String,
    pub classification_confidence: f64,
    pub preset: String,
    pub timestamp: u64,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_requests: u64,
    pub total_cost_usd: f64,
    pub average_latency_ms: f64,
    pub usage_by_key: HashMap<String, u64>,
    pub category_distribution: HashMap<Category, u64>,
    /// Naive Σ `0.2 * costUsd` across all logged entries. A reporting
    /// sentinel, not a rigorous savings calculation.
    pub naive_cost_savings_total: f64,
    /// Fraction of entries with `classificationConfidence > 0.6`.
    pub classification_accuracy: f64,
}

/// Bounded, insertion-order log of every routed outcome (including fallback
/// successes and final failures). Appends evict the oldest entry once
/// capacity is exceeded; the append-then-maybe-evict is one critical
/// section so concurrent appends never interleave.
pub struct Analytics {
    log: Mutex<VecDeque<RequestLogEntry>>,
}

impl Analytics {
    pub fn new() -> Self {
        Self { log: Mutex::new(VecDeque::with_capacity(RING_BUFFER_CAPACITY)) }
    }

    pub fn record(&self, entry: RequestLogEntry) {
        let mut log = self.log.lock().expect("analytics lock poisoned");
        if log.len() >= RING_BUFFER_CAPACITY {
            log.pop_front();
        }
        log.push_back(entry);
    }

    /// Most recent `n` entries, newest first.
    pub fn recent_logs(&self, n: usize) -> Vec<RequestLogEntry> {
        let log = self.log.lock().expect("analytics lock poisoned");
        log.iter().rev().take(n).cloned().collect()
    }

    pub fn metrics(&self) -> Metrics {
        let log = self.log.lock().expect("analytics lock poisoned");
        if log.is_empty() {
            return Metrics::default();
        }

        let total_requests = log.len() as u64;
        let total_cost_usd: f64 = log.iter().map(|e| e.cost_usd).sum();
        let total_latency_ms: f64 = log.iter().map(|e| e.latency_ms).sum();
        let average_latency_ms = total_latency_ms / total_requests as f64;

        let mut usage_by_key: HashMap<String, u64> = HashMap::new();
        let mut category_distribution: HashMap<Category, u64> = HashMap::new();
        let mut confident_count = 0u64;

        for entry in log.iter() {
            *usage_by_key.entry(entry.selected_key.clone()).or_insert(0) += 1;
            *category_distribution.entry(entry.category).or_insert(0) += 1;
            if entry.classification_confidence > 0.6 {
                confident_count += 1;
            }
        }

        let naive_cost_savings_total = log.iter().map(|e| 0.2 * e.cost_usd).sum();
        let classification_accuracy = confident_count as f64 / total_requests as f64;

        Metrics {
            total_requests,
            total_cost_usd,
            average_latency_ms,
            usage_by_key,
            category_distribution,
            naive_cost_savings_total,
            classification_accuracy,
        }
    }

    /// Clear the log. Distinct from registry `reset_all`; only resets
    /// analytics counters.
    pub fn reset_metrics(&self) {
        self.log.lock().expect("analytics lock poisoned").clear();
    }

    pub fn len(&self) -> usize {
        self.log.lock().expect("analytics lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new()
    }
}
