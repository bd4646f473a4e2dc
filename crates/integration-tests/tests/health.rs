//! Liveness probe and the models admin operations.

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

async fn start_server() -> TestServer {
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
    let client_resolver: Arc<dyn router_core::ClientResolver> = resolver;
    let service = Arc::new(RouterService::new(
        hybrid,
        engine,
        client_resolver,
        RouterServiceConfig::default(),
    ));

    TestServer::start(service).await.expect("server starts")
}

#[tokio::test]
async fn health_returns_ok() {
    let server = start_server().await;
    let response = server.client().get(server.url("/health")).send().await.expect("request succeeds");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn get_models_lists_the_fixture_registry() {
    let server = start_server().await;
    let response = server.client().get(server.url("/models")).send().await.expect("request succeeds");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("valid JSON body");
    let models = body["models"].as_array().expect("models array");
    assert_eq!(models.len(), 5);
    assert!(models.iter().all(|m| m["isAvailable"].as_bool() == Some(true)));
}

#[tokio::test]
async fn put_models_reset_restores_availability() {
    let server = start_server().await;

    let response = server
        .client()
        .put(server.url("/models"))
        .json(&serde_json::json!({ "action": "reset" }))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 200);

    let response = server
        .client()
        .put(server.url("/models"))
        .json(&serde_json::json!({ "action": "nonsense" }))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 400);
}
