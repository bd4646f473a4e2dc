//! Literal model fixture shared by the end-to-end scenario tests — mirrors
//! the default `router.toml` shipped at the workspace root.

use std::collections::HashMap;
use std::sync::Arc;

use router_core::{Category, ModelDescriptor, ModelRegistry, Provider};

pub fn registry() -> Arc<ModelRegistry> {
    Arc::new(ModelRegistry::new(vec![
        descriptor(
            "gpt-4o-mini",
            Provider::Openai,
            128_000,
            0.15,
            0.60,
            0.46,
            [
                (Category::Code, 0.75),
                (Category::Summarize, 0.80),
                (Category::Qa, 0.78),
                (Category::Creative, 0.70),
                (Category::MathReasoning, 0.60),
            ],
        ),
        descriptor(
            "claude-3-7-sonnet-20250219",
            Provider::Anthropic,
            200_000,
            3.0,
            15.0,
            1.2,
            [
                (Category::Code, 0.98),
                (Category::Summarize, 0.90),
                (Category::Qa, 0.92),
                (Category::Creative, 0.93),
                (Category::MathReasoning, 0.95),
            ],
        ),
        descriptor(
            "gpt-5",
            Provider::Openai,
            400_000,
            5.0,
            20.0,
            7.52,
            [
                (Category::Code, 0.99),
                (Category::Summarize, 0.92),
                (Category::Qa, 0.90),
                (Category::Creative, 0.88),
                (Category::MathReasoning, 0.99),
            ],
        ),
        descriptor(
            "gemini-1.5-flash",
            Provider::Google,
            1_050_000,
            0.075,
            0.30,
            0.45,
            [
                (Category::Code, 0.80),
                (Category::Summarize, 0.85),
                (Category::Qa, 0.88),
                (Category::Creative, 0.75),
                (Category::MathReasoning, 0.70),
            ],
        ),
        descriptor(
            "gpt-oss-20b",
            Provider::Huggingface,
            32_000,
            0.0,
            0.0,
            0.9,
            [
                (Category::Code, 0.60),
                (Category::Summarize, 0.65),
                (Category::Qa, 0.62),
                (Category::Creative, 0.55),
                (Category::MathReasoning, 0.50),
            ],
        ),
    ]))
}

#[allow(clippy::too_many_arguments)]
fn descriptor(
    key: &str,
    provider: Provider,
    context_window: u32,
    price_in: f64,
    price_out: f64,
    latency_s: f64,
    priors: [(Category, f64); 5],
) -> ModelDescriptor {
    ModelDescriptor {
        key: key.to_owned(),
        provider_model_name: key.to_owned(),
        provider,
        context_window_tokens: context_window,
        price_input_per_million: price_in,
        price_output_per_million: price_out,
        latency_p50_seconds: latency_s,
        quality_prior_by_category: HashMap::from(priors),
    }
}
