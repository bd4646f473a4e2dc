use std::sync::Arc;

use router_core::{Preset, RouterService};

/// Shared application state. A thin `Arc`-wrapped handle to the already
/// fully-wired [`RouterService`] — this crate owns no domain state of its
/// own; it's the one thing every handler closes over.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RouterService>,
    pub default_preset: Preset,
}

impl AppState {
    pub fn new(service: Arc<RouterService>) -> Self {
        Self { service, default_preset: Preset::default() }
    }

    #[must_use]
    pub const fn with_default_preset(mut self, preset: Preset) -> Self {
        self.default_preset = preset;
        self
    }
}
