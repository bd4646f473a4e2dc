//! Configuration schema and loading for the router. Parses a TOML file
//! (with `{{ env.VAR }}` secret expansion) into a validated [`Config`].

mod env;
mod loader;
mod models;
mod providers;
mod routing;
mod server;

use serde::Deserialize;

pub use models::ModelConfig;
pub use providers::{ProviderConfig, ProvidersConfig};
pub use routing::RoutingConfig;
pub use server::ServerConfig;

/// Top-level router configuration, deserialized from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
    #[serde(default)]
    pub providers: ProvidersConfig,
}
