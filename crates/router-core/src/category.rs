//! Prompt category taxonomy and the read-only per-category mapping table.

use serde::{Deserialize, Serialize};

/// Fixed, closed taxonomy a prompt is classified into.
///
/// `MATH_REASONING` is reachable only through the heuristic classifier — the
/// model classifier's prompt enumerates four labels and never produces it
/// (see [`crate::classify::model`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Code,
    Summarize,
    Qa,
    Creative,
    MathReasoning,
    Unknown,
}

impl Category {
    /// All non-`Unknown` categories, in the stable iteration order ties are
    /// broken by throughout the classifier and routing engine.
    pub const CLASSIFIABLE: [Category; 5] = [
        Category::Code,
        Category::Summarize,
        Category::Qa,
        Category::Creative,
        Category::MathReasoning,
    ];

    /// Every category including `Unknown`, in stable order.
    pub const ALL: [Category; 6] = [
        Category::Code,
        Category::Summarize,
        Category::Qa,
        Category::Creative,
        Category::MathReasoning,
        Category::Unknown,
    ];

    /// Parse a case-insensitive label, e.g. from a model classifier reply.
    /// Unknown strings map to `Unknown` rather than failing.
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "CODE" => Category::Code,
            "SUMMARIZE" => Category::Summarize,
            "QA" => Category::Qa,
            "CREATIVE" => Category::Creative,
            "MATH_REASONING" => Category::MathReasoning,
            _ => Category::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Code => "CODE",
            Category::Summarize => "SUMMARIZE",
            Category::Qa => "QA",
            Category::Creative => "CREATIVE",
            Category::MathReasoning => "MATH_REASONING",
            Category::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only per-category reference data: keyword list for the heuristic
/// classifier, a rough output-length prior, and a handful of example
/// prompts (documentation only — not consulted by any algorithm).
pub struct CategoryProfile {
    pub category: Category,
    /// Prior estimate of typical output length for this category. Compared
    /// against the per-category generation baseline in
    /// [`crate::service::generation_defaults`]; only overrides the baseline
    /// when it is strictly larger.
    pub estimated_output_tokens: u32,
    pub keywords: &'static [&'static str],
    pub examples: &'static [&'static str],
}

const CODE_KEYWORDS: &[&str] = &[
    "code", "function", "write", "debug", "program", "algorithm", "class", "variable", "compile",
    "syntax", "python", "javascript", "rust", "bug", "refactor", "implement", "script", "sort",
    "list",
];

const SUMMARIZE_KEYWORDS: &[&str] = &[
    "summarize", "key points", "overview", "brief", "condense", "abstract", "synopsis", "tl;dr",
    "main points", "recap",
];

const QA_KEYWORDS: &[&str] = &[
    "hello",
    "how are you",
    "what is",
    "explain",
    "question",
    "why",
    "define",
    "who",
    "when",
    "where",
    "help me understand",
];

const CREATIVE_KEYWORDS: &[&str] = &[
    "story",
    "poem",
    "imagine",
    "fiction",
    "write a story",
    "novel",
    "character",
    "fantasy",
    "compose a song",
    "lyrics",
    "narrative",
];

const MATH_REASONING_KEYWORDS: &[&str] = &[
    "solve", "equation", "calculate", "math", "+", "=", "x", "algebra", "theorem", "compute",
];

const CODE_EXAMPLES: &[&str] = &["Write a Python function to sort a list"];
const SUMMARIZE_EXAMPLES: &[&str] = &["Summarize the key points of machine learning"];
const QA_EXAMPLES: &[&str] = &["Hello, how are you?"];
const CREATIVE_EXAMPLES: &[&str] = &["Write a short story about a dragon"];
const MATH_REASONING_EXAMPLES: &[&str] = &["Solve: 2x + 5 = 13"];
const UNKNOWN_EXAMPLES: &[&str] = &[];

/// Look up the reference profile for a category. Total function: every
/// category (including `Unknown`) has a profile.
pub const fn category_profile(category: Category) -> CategoryProfile {
    match category {
        Category::Code => CategoryProfile {
            category,
            estimated_output_tokens: 2000,
            keywords: CODE_KEYWORDS,
            examples: CODE_EXAMPLES,
        },
        Category::Summarize => CategoryProfile {
            category,
            // A summary's prior runs longer than the generation baseline
            // assumes: condensing a long source can still take more than
            // the terse output the baseline budgets for.
            estimated_output_tokens: 2000,
            keywords: SUMMARIZE_KEYWORDS,
            examples: SUMMARIZE_EXAMPLES,
        },
        Category::Qa => CategoryProfile {
            category,
            estimated_output_tokens: 2000,
            keywords: QA_KEYWORDS,
            examples: QA_EXAMPLES,
        },
        Category::Creative => CategoryProfile {
            category,
            estimated_output_tokens: 2500,
            keywords: CREATIVE_KEYWORDS,
            examples: CREATIVE_EXAMPLES,
        },
        Category::MathReasoning => CategoryProfile {
            category,
            // Worked proofs and multi-step derivations routinely run past
            // the baseline's budget.
            estimated_output_tokens: 3500,
            keywords: MATH_REASONING_KEYWORDS,
            examples: MATH_REASONING_EXAMPLES,
        },
        Category::Unknown => CategoryProfile {
            category,
            estimated_output_tokens: 1500,
            keywords: &[],
            examples: UNKNOWN_EXAMPLES,
        },
    }
}
