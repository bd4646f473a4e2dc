//! Prompt classification: a keyword heuristic, a model-backed classifier,
//! and a hybrid that reconciles the two.

pub mod heuristic;
pub mod hybrid;
pub mod model;

pub use heuristic::{HeuristicResult, classify_heuristic};
pub use hybrid::{ClassificationMethod, HybridClassifier, HybridResult};
pub use model::{ModelClassificationResult, ModelClassifier};

/// Heuristic confidence at or above this value is treated as sufficient —
/// the hybrid classifier skips the model classifier entirely. Hard-coded
/// rather than configurable — `classification_confidence_threshold` in
/// configuration is reserved for future use and does not currently gate
/// this decision.
pub const HEURISTIC_SUFFICIENT_THRESHOLD: f64 = 0.7;
