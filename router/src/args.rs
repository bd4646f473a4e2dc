use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Model router — classifies a prompt, picks a backend under a priority
/// preset, invokes it, and returns the decision alongside the response.
#[derive(Debug, Parser)]
#[command(name = "router", about = "Model router service")]
pub struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "router.toml", env = "ROUTER_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address from the config file.
    #[arg(long, env = "ROUTER_LISTEN")]
    pub listen: Option<SocketAddr>,
}
