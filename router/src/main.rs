#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod telemetry;

use std::sync::Arc;

use args::Args;
use clap::Parser;
use router_config::Config;
use router_core::classify::{HybridClassifier, ModelClassifier, model::DEFAULT_CLASSIFIER_KEY};
use router_core::{ModelRegistry, RouterService, RouterServiceConfig, RoutingEngine};
use router_providers::{ClientPool, NullClient};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    if let Some(listen) = args.listen {
        config.server.listen_address = listen.to_string();
    }

    // Initialize telemetry
    telemetry::init("info");

    tracing::info!(config_path = %args.config.display(), "starting router");

    let listen_address = config
        .server
        .listen_address
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.listen_address `{}`: {e}", config.server.listen_address))?;

    let default_preset = config.routing.default_preset()?;
    let request_timeout_ms = config.routing.request_timeout_ms;

    // Build the model registry and backend client pool
    let registry =
        Arc::new(ModelRegistry::new(config.models.into_iter().map(router_config::ModelConfig::into_descriptor).collect()));
    let providers = Arc::new(config.providers);
    let pool = Arc::new(ClientPool::new(Arc::clone(&registry), providers));

    let classifier_backend = pool
        .resolve(DEFAULT_CLASSIFIER_KEY)
        .await
        .unwrap_or_else(|| Arc::new(NullClient::new(router_core::Provider::Openai, DEFAULT_CLASSIFIER_KEY)));
    let model_classifier = ModelClassifier::new(classifier_backend, DEFAULT_CLASSIFIER_KEY);
    let hybrid = HybridClassifier::new(model_classifier);

    let engine = RoutingEngine::new(Arc::clone(&registry));
    let service_config = RouterServiceConfig { request_timeout_ms };
    let service = Arc::new(RouterService::new(hybrid, engine, pool, service_config));

    // Build server
    let server = router_server::Server::new(service, listen_address)
        .with_default_preset(default_preset);

    // Set up graceful shutdown
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    // Run server
    server.serve(shutdown).await?;

    tracing::info!("router stopped");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
