//! Logging setup for the `router` binary: `EnvFilter` plus a plain fmt
//! layer, no trace/metric exporter — there is nothing external this
//! service exports to, so there is no resource/meter/tracer provider to
//! build or flush on drop.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a `tracing-subscriber` that honors `RUST_LOG`, falling back to
/// `default_filter` when it is unset or invalid.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
