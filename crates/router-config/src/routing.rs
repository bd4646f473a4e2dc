//! `[routing]` table.

use router_core::Preset;
use serde::Deserialize;

const fn default_request_timeout_ms() -> u64 {
    30_000
}

const fn default_max_retry_attempts() -> u32 {
    2
}

const fn default_classification_confidence_threshold() -> f64 {
    0.6
}

fn default_priority_preset() -> String {
    "balanced".to_owned()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    #[serde(default = "default_priority_preset")]
    pub default_priority_preset: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Reserved: the service currently attempts exactly one static fallback
    /// regardless of this value.
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,
    /// Reserved for future use; not currently consulted by the hybrid
    /// classifier, which hard-codes its own escalation threshold.
    #[serde(default = "default_classification_confidence_threshold")]
    pub classification_confidence_threshold: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_priority_preset: default_priority_preset(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retry_attempts: default_max_retry_attempts(),
            classification_confidence_threshold: default_classification_confidence_threshold(),
        }
    }
}

impl RoutingConfig {
    /// Resolve `default_priority_preset` leniently. Unknown labels are
    /// rejected at validation time rather than silently degraded, since this
    /// is a top-level admin-set config value, not untrusted user input.
    pub fn default_preset(&self) -> anyhow::Result<Preset> {
        Preset::parse_lenient(&self.default_priority_preset)
            .ok_or_else(|| anyhow::anyhow!("unknown default_priority_preset: `{}`", self.default_priority_preset))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.default_preset()?;

        if !(5_000..=120_000).contains(&self.request_timeout_ms) {
            anyhow::bail!(
                "routing.request_timeout_ms must be between 5000 and 120000, got {}",
                self.request_timeout_ms
            );
        }

        if !(1..=5).contains(&self.max_retry_attempts) {
            anyhow::bail!(
                "routing.max_retry_attempts must be between 1 and 5, got {}",
                self.max_retry_attempts
            );
        }

        if !(0.0..=1.0).contains(&self.classification_confidence_threshold) {
            anyhow::bail!(
                "routing.classification_confidence_threshold must be between 0 and 1, got {}",
                self.classification_confidence_threshold
            );
        }

        Ok(())
    }
}
