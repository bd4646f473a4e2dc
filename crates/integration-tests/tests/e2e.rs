//! End-to-end scenarios over a real bound HTTP server, driven with fake
//! backend clients so routing/fallback behavior is exercised without any
//! network traffic.

mod harness;

use std::sync::Arc;

use async_trait::async_trait;
use harness::fake_backend::{FakeBackendClient, FakeResolver};
use harness::fixtures;
use harness::server::TestServer;
use router_core::classify::model::DEFAULT_CLASSIFIER_KEY;
use router_core::{
    BackendClient, BackendClientError, GenerateOptions, GenerateResult, HybridClassifier,
    ModelClassifier, Provider, RouterService, RouterServiceConfig, RoutingEngine,
};
use serde_json::{Value, json};

/// Classifier backend that always fails, so every scenario resolves
/// through the heuristic classifier (directly or degraded), matching the
/// deterministic expectations below.
struct AlwaysFailingBackend;

#[async_trait]
impl BackendClient for AlwaysFailingBackend {
    fn provider(&self) -> Provider {
        Provider::Openai
    }

    fn model_name(&self) -> &str {
        DEFAULT_CLASSIFIER_KEY
    }

    async fn generate(
        &self,
        _prompt: &str,
        _options: &GenerateOptions,
    ) -> Result<GenerateResult, BackendClientError> {
        Err(BackendClientError::Unauthorized { provider: Provider::Openai })
    }
}

async fn start_server() -> (TestServer, Arc<FakeResolver>) {
    let registry = fixtures::registry();
    let resolver = Arc::new(FakeResolver::new());

    for entry in registry.iter() {
        let descriptor = &entry.descriptor;
        resolver.register(
            &descriptor.key,
            Arc::new(FakeBackendClient::new(descriptor.provider, descriptor.key.clone())),
        );
    }

    let classifier = ModelClassifier::new(Arc::new(AlwaysFailingBackend), DEFAULT_CLASSIFIER_KEY);
    let hybrid = HybridClassifier::new(classifier);
    let engine = RoutingEngine::new(Arc::clone(&registry));
    let client_resolver: Arc<dyn router_core::ClientResolver> = resolver.clone();
    let service = Arc::new(RouterService::new(
        hybrid,
        engine,
        client_resolver,
        RouterServiceConfig::default(),
    ));

    let server = TestServer::start(service).await.expect("server starts");
    (server, resolver)
}

async fn route(server: &TestServer, prompt: &str, preset: &str) -> Value {
    let response = server
        .client()
        .post(server.url("/route"))
        .json(&json!({ "prompt": prompt, "priorityPreset": preset }))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 200, "expected 200 OK");
    response.json().await.expect("valid JSON body")
}

#[tokio::test]
async fn scenario_1_code_prompt_routes_under_balanced_weights() {
    let (server, _resolver) = start_server().await;
    let body = route(&server, "Write a Python function to sort a list", "BALANCED").await;

    assert_eq!(body["category"], "CODE");
    assert!(body["classificationConfidence"].as_f64().unwrap() >= 0.7);
    // BALANCED weights quality at 0.45 — below the amplification threshold
    // (0.5) and cost at 0.30 — below the cost-priority threshold (0.4) — so
    // no premium string-match amplification or floor applies to anyone.
    // gpt-5's 7.52s p50 is the worst in this candidate set, zeroing its raw
    // latency score outright, which drags it to the bottom of the ranking
    // rather than the top. gemini-1.5-flash's lead on cost, latency, and
    // throughput wins decisively over claude and gpt-4o-mini's quality edge.
    let selected = body["decision"]["selectedKey"].as_str().unwrap();
    assert_eq!(selected, "gemini-1.5-flash", "unexpected selection: {selected}");
}

#[tokio::test]
async fn scenario_2_summarize_prompt_prefers_cheap_model_under_cost() {
    let (server, _resolver) = start_server().await;
    let body = route(&server, "Summarize the key points of machine learning", "COST").await;

    assert_eq!(body["category"], "SUMMARIZE");
    // gpt-oss-20b's zero price wins the raw cost score outright, but
    // gemini-1.5-flash's stronger quality prior and throughput under this
    // prompt's short context more than make up the small cost gap.
    let selected = body["decision"]["selectedKey"].as_str().unwrap();
    assert!(
        selected == "gemini-1.5-flash" || selected == "gpt-oss-20b" || selected == "gpt-4o-mini",
        "unexpected selection: {selected}"
    );
}

#[tokio::test]
async fn scenario_3_math_prompt_prefers_claude_under_quality() {
    let (server, _resolver) = start_server().await;
    let body = route(&server, "Solve: 2x + 5 = 13", "QUALITY").await;

    assert_eq!(body["category"], "MATH_REASONING");
    // gpt-5's 7.52s p50 is the worst in the registry, so it alone defines
    // maxLatencyMs for this candidate set — its raw latency score is exactly
    // 0, and sqrt(0) stays 0, so the premium latency transform cannot rescue
    // it. claude's 0.95 prior amplifies to nearly the same quality
    // contribution as gpt-5's 0.99 (q' = q^0.3 compresses the gap) while
    // paying a far smaller latency penalty, so it wins outright.
    assert_eq!(body["decision"]["selectedKey"], "claude-3-7-sonnet-20250219");
    assert_eq!(body["decision"]["fallbackKey"], "gemini-1.5-flash");
}

#[tokio::test]
async fn scenario_4_greeting_prefers_low_latency_model() {
    let (server, _resolver) = start_server().await;
    let body = route(&server, "Hello, how are you?", "LATENCY").await;

    assert_eq!(body["category"], "QA");
    let selected = body["decision"]["selectedKey"].as_str().unwrap();
    assert!(
        selected == "gemini-1.5-flash" || selected == "gpt-4o-mini",
        "unexpected selection: {selected}"
    );
}

#[tokio::test]
async fn scenario_5_backend_failure_falls_back_and_marks_unavailable() {
    let (server, resolver) = start_server().await;
    // gemini-1.5-flash is the QA/QUALITY winner for this prompt; fail its
    // backend so the static fallback path gets exercised.
    resolver.register(
        "gemini-1.5-flash",
        Arc::new(FakeBackendClient::failing(Provider::Google, "gemini-1.5-flash", u32::MAX)),
    );

    let body = route(&server, "Explain quantum physics in simple terms", "QUALITY").await;

    // The primary pick (gemini-1.5-flash) fails; the static fallback always wins.
    assert_eq!(body["modelUsed"], "gpt-4o-mini");
    assert_eq!(
        body["decision"]["selectedKey"], "gemini-1.5-flash",
        "decision still records the original selection"
    );

    // gemini-1.5-flash is now marked unavailable; a second identical request must not
    // pick it again, even though it would otherwise win under QUALITY.
    let second = route(&server, "Explain quantum physics in simple terms", "QUALITY").await;
    assert_ne!(second["decision"]["selectedKey"], "gemini-1.5-flash");
}

#[tokio::test]
async fn scenario_6_oversize_context_prefers_gemini() {
    let (server, _resolver) = start_server().await;
    let huge_prompt = "a".repeat(1_000_000);

    // ~250,000 estimated tokens. gemini-1.5-flash (1,050,000) and gpt-5
    // (400,000) both clear the context window filter; the other three
    // models don't. The prompt is all-keyword-free so it classifies as
    // UNKNOWN, where every model's quality prior is the 0.5 default —
    // gemini then wins on cost, latency, and throughput under every preset.
    for preset in ["BALANCED", "COST", "QUALITY", "LATENCY"] {
        let body = route(&server, &huge_prompt, preset).await;
        assert_eq!(
            body["decision"]["selectedKey"], "gemini-1.5-flash",
            "preset {preset} should select gemini-1.5-flash"
        );
        assert_eq!(
            body["decision"]["fallbackKey"], "gpt-5",
            "preset {preset}: gpt-5 is the only other model surviving the context filter"
        );
    }
}
