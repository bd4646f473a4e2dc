//! Hybrid classifier: runs the heuristic first, escalates to the model
//! classifier only when needed, and reconciles the two.

use std::time::Instant;

use super::heuristic::{HeuristicResult, classify_heuristic};
use super::model::{ModelClassificationResult, ModelClassifier};
use super::HEURISTIC_SUFFICIENT_THRESHOLD;
use crate::category::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationMethod {
    Heuristic,
    Model,
    /// Reserved for a future case where the result is a genuine blend of
    /// both signals rather than an adoption of one; the reconciliation
    /// algorithm below always resolves to `Heuristic` or `Model`.
    Hybrid,
}

impl ClassificationMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            ClassificationMethod::Heuristic => "heuristic",
            ClassificationMethod::Model => "model",
            ClassificationMethod::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HybridResult {
    pub category: Category,
    pub confidence: f64,
    pub method: ClassificationMethod,
    pub heuristic_result: HeuristicResult,
    pub model_result: Option<ModelClassificationResult>,
    pub final_method: &'static str,
    pub reasoning: String,
    pub total_ms: u64,
}

pub struct HybridClassifier {
    model_classifier: ModelClassifier,
}

impl HybridClassifier {
    pub fn new(model_classifier: ModelClassifier) -> Self {
        Self { model_classifier }
    }

    pub async fn classify(&self, prompt: &str) -> HybridResult {
        let started = Instant::now();
        let heuristic = classify_heuristic(prompt);

        if heuristic.confidence >= HEURISTIC_SUFFICIENT_THRESHOLD {
            return HybridResult {
                category: heuristic.category,
                confidence: heuristic.confidence,
                method: ClassificationMethod::Heuristic,
                reasoning: heuristic.reasoning.clone(),
                heuristic_result: heuristic,
                model_result: None,
                final_method: "heuristic_only",
                total_ms: started.elapsed().as_millis() as u64,
            };
        }

        match self.model_classifier.classify_async(prompt).await {
            Err(_) => {
                let degraded_confidence = (heuristic.confidence / 2.0).max(0.1);
                HybridResult {
                    category: heuristic.category,
                    confidence: degraded_confidence,
                    method: ClassificationMethod::Heuristic,
                    reasoning: format!(
                        "model classifier unavailable, degraded heuristic result: {}",
                        heuristic.reasoning
                    ),
                    heuristic_result: heuristic,
                    model_result: None,
                    final_method: "heuristic_fallback",
                    total_ms: started.elapsed().as_millis() as u64,
                }
            }
            Ok(model_result) => Self::reconcile(heuristic, model_result, started.elapsed().as_millis() as u64),
        }
    }

    fn reconcile(
        heuristic: HeuristicResult,
        model_result: ModelClassificationResult,
        total_ms: u64,
    ) -> HybridResult {
        let (category, confidence, method, final_method, reasoning) =
            if model_result.category == heuristic.category {
                if model_result.confidence > heuristic.confidence {
                    (
                        model_result.category,
                        model_result.confidence,
                        ClassificationMethod::Model,
                        "model",
                        format!(
                            "heuristic and model agree on {}; model confidence ({:.2}) higher",
                            heuristic.category, model_result.confidence
                        ),
                    )
                } else {
                    (
                        heuristic.category,
                        heuristic.confidence,
                        ClassificationMethod::Heuristic,
                        "heuristic",
                        format!(
                            "heuristic and model agree on {}; heuristic confidence ({:.2}) higher or equal",
                            heuristic.category, heuristic.confidence
                        ),
                    )
                }
            } else {
                let gap = model_result.confidence - heuristic.confidence;
                if gap > 0.0 {
                    let strong = if gap > 0.2 { " (strong margin)" } else { "" };
                    (
                        model_result.category,
                        model_result.confidence,
                        ClassificationMethod::Model,
                        "model",
                        format!(
                            "heuristic said {} ({:.2}), model said {} ({:.2}); adopted model{}",
                            heuristic.category,
                            heuristic.confidence,
                            model_result.category,
                            model_result.confidence,
                            strong
                        ),
                    )
                } else {
                    (
                        heuristic.category,
                        heuristic.confidence,
                        ClassificationMethod::Heuristic,
                        "heuristic",
                        format!(
                            "heuristic said {} ({:.2}), model said {} ({:.2}); adopted heuristic",
                            heuristic.category,
                            heuristic.confidence,
                            model_result.category,
                            model_result.confidence
                        ),
                    )
                }
            };

        HybridResult {
            category,
            confidence,
            method,
            heuristic_result: heuristic,
            model_result: Some(model_result),
            final_method,
            reasoning,
            total_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::backend::{BackendClient, BackendClientError, GenerateOptions, GenerateResult};
    use crate::model::Provider;

    struct StubBackend {
        reply: String,
        fail: bool,
    }

    #[async_trait]
    impl BackendClient for StubBackend {
        fn provider(&self) -> Provider {
            Provider::Openai
        }

        fn model_name(&self) -> &str {
            "gpt-4o-mini"
        }

        async fn generate(
            &self,
            _prompt: &str,
            _options: &GenerateOptions,
        ) -> Result<GenerateResult, BackendClientError> {
            if self.fail {
                return Err(BackendClientError::Upstream {
                    provider: Provider::Openai,
                    message: "boom".into(),
                });
            }
            Ok(GenerateResult {
                content: self.reply.clone(),
                input_tokens: 10,
                output_tokens: 10,
                cost_usd: None,
                latency_ms: 5,
            })
        }
    }

    fn classifier(reply: &str, fail: bool) -> ModelClassifier {
        ModelClassifier::new(
            Arc::new(StubBackend { reply: reply.to_owned(), fail }),
            "gpt-4o-mini",
        )
    }

    #[tokio::test]
    async fn high_confidence_heuristic_skips_model() {
        let hybrid = HybridClassifier::new(classifier("unused", true));
        let result = hybrid.classify("Write a Python function to sort a list").await;
        assert_eq!(result.final_method, "heuristic_only");
        assert_eq!(result.category, Category::Code);
    }

    #[tokio::test]
    async fn model_classifier_failure_degrades_heuristic() {
        let hybrid = HybridClassifier::new(classifier("unused", true));
        let result = hybrid.classify("Hello, how are you?").await;
        assert_eq!(result.final_method, "heuristic_fallback");
        assert!(result.confidence >= 0.1);
        assert!(result.confidence <= result.heuristic_result.confidence);
    }

    #[tokio::test]
    async fn agreement_picks_higher_confidence() {
        let hybrid = HybridClassifier::new(classifier(
            r#"{"category": "qa", "confidence": 0.95, "reasoning": "greeting"}"#,
            false,
        ));
        let result = hybrid.classify("Hello, how are you?").await;
        assert_eq!(result.category, Category::Qa);
        assert_eq!(result.method, ClassificationMethod::Model);
    }

    #[tokio::test]
    async fn disagreement_adopts_model_when_more_confident() {
        let hybrid = HybridClassifier::new(classifier(
            r#"{"category": "creative", "confidence": 0.8, "reasoning": "storytelling"}"#,
            false,
        ));
        let result = hybrid.classify("Hello, how are you?").await;
        assert_eq!(result.category, Category::Creative);
        assert_eq!(result.method, ClassificationMethod::Model);
    }

    #[tokio::test]
    async fn disagreement_keeps_heuristic_when_model_less_confident() {
        let hybrid = HybridClassifier::new(classifier(
            r#"{"category": "creative", "confidence": 0.1, "reasoning": "unsure"}"#,
            false,
        ));
        let result = hybrid.classify("Hello, how are you?").await;
        assert_eq!(result.category, Category::Qa);
        assert_eq!(result.method, ClassificationMethod::Heuristic);
    }
}
