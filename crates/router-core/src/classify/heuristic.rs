//! Keyword-overlap classifier.

use crate::category::{Category, category_profile};

#[derive(Debug, Clone)]
pub struct HeuristicResult {
    pub category: Category,
    pub confidence: f64,
    pub method: &'static str,
    pub matched_keywords: Vec<String>,
    pub reasoning: String,
}

/// Score one category's keyword list against an already-lowercased prompt.
/// Returns `(raw_score, matched_keywords)`.
fn score_category(prompt_lower: &str, category: Category) -> (f64, Vec<String>) {
    let profile = category_profile(category);
    if profile.keywords.is_empty() {
        return (0.0, Vec::new());
    }

    let matched: Vec<String> = profile
        .keywords
        .iter()
        .filter(|kw| prompt_lower.contains(*kw))
        .map(|kw| (*kw).to_owned())
        .collect();

    let match_ratio = matched.len() as f64 / profile.keywords.len() as f64;
    let exact_bonus = 0.1 * matched.len() as f64;
    let raw_score = (match_ratio + exact_bonus).min(1.0);
    (raw_score, matched)
}

/// Run the heuristic classifier over `prompt`.
///
/// Picks the category with the highest raw score, breaking ties by
/// [`Category::CLASSIFIABLE`] iteration order. If every raw score is zero,
/// emits `Unknown` at confidence 0.1. Confidence is never allowed above 0.9
/// — the heuristic never claims full certainty.
pub fn classify_heuristic(prompt: &str) -> HeuristicResult {
    let prompt_lower = prompt.to_lowercase();

    let scores: Vec<(Category, f64, Vec<String>)> = Category::CLASSIFIABLE
        .iter()
        .map(|&category| {
            let (score, matched) = score_category(&prompt_lower, category);
            (category, score, matched)
        })
        .collect();

    let best_index = scores
        .iter()
        .enumerate()
        .max_by(|(_, (_, a, _)), (_, (_, b, _))| a.total_cmp(b))
        .map(|(i, _)| i)
        .expect("CLASSIFIABLE is non-empty");

    let (best_category, best_score, best_matched) = &scores[best_index];

    if *best_score <= 0.0 {
        return HeuristicResult {
            category: Category::Unknown,
            confidence: 0.1,
            method: "heuristic",
            matched_keywords: Vec::new(),
            reasoning: "no category keywords matched the prompt".to_owned(),
        };
    }

    let runner_up = scores
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != best_index)
        .map(|(_, (_, score, _))| *score)
        .fold(0.0_f64, f64::max);

    let gap = best_score - runner_up;
    let mut confidence = *best_score;
    if gap > 0.3 {
        confidence += 0.2;
    }
    if gap > 0.5 {
        confidence += 0.1;
    }
    confidence = confidence.clamp(0.0, 0.9);

    HeuristicResult {
        category: *best_category,
        confidence,
        method: "heuristic",
        matched_keywords: best_matched.clone(),
        reasoning: format!(
            "matched keywords {:?} for {} (raw score {:.3}, gap to runner-up {:.3})",
            best_matched, best_category, best_score, gap
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_1_code_with_high_confidence() {
        let result = classify_heuristic("Write a Python function to sort a list");
        assert_eq!(result.category, Category::Code);
        assert!(result.confidence >= 0.7, "confidence was {}", result.confidence);
        assert!(result.matched_keywords.contains(&"write".to_owned()));
        assert!(result.matched_keywords.contains(&"function".to_owned()));
    }

    #[test]
    fn scenario_2_summarize() {
        let result = classify_heuristic("Summarize the key points of machine learning");
        assert_eq!(result.category, Category::Summarize);
        assert!(result.matched_keywords.contains(&"summarize".to_owned()));
        assert!(result.matched_keywords.contains(&"key points".to_owned()));
    }

    #[test]
    fn scenario_3_math_reasoning() {
        let result = classify_heuristic("Solve: 2x + 5 = 13");
        assert_eq!(result.category, Category::MathReasoning);
        for kw in ["solve", "+", "=", "x"] {
            assert!(result.matched_keywords.contains(&kw.to_owned()), "missing {kw}");
        }
    }

    #[test]
    fn scenario_4_qa() {
        let result = classify_heuristic("Hello, how are you?");
        assert_eq!(result.category, Category::Qa);
    }

    #[test]
    fn empty_overlap_is_unknown_with_low_confidence() {
        let result = classify_heuristic("   ");
        assert_eq!(result.category, Category::Unknown);
        assert_eq!(result.confidence, 0.1);
    }

    #[test]
    fn confidence_never_exceeds_point_nine() {
        // A prompt stacking many keywords from one category plus zero overlap
        // elsewhere should still clamp at 0.9.
        let result = classify_heuristic(
            "write function code debug program algorithm class variable compile syntax \
             python javascript rust bug refactor implement script sort list",
        );
        assert!(result.confidence <= 0.9);
    }

    #[test]
    fn is_pure() {
        let prompt = "Write a Python function to sort a list";
        let a = classify_heuristic(prompt);
        let b = classify_heuristic(prompt);
        assert_eq!(a.category, b.category);
        assert!((a.confidence - b.confidence).abs() < f64::EPSILON);
    }
}
