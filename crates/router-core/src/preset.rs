//! Priority presets and their fixed `(quality, cost, latency)` weights.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Preset {
    #[default]
    Balanced,
    Quality,
    Cost,
    Latency,
}

/// `(quality, cost, latency)`, always summing to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityWeights {
    pub quality: f64,
    pub cost: f64,
    pub latency: f64,
}

impl Preset {
    pub const fn weights(self) -> PriorityWeights {
        match self {
            Preset::Balanced => PriorityWeights { quality: 0.45, cost: 0.30, latency: 0.25 },
            Preset::Quality => PriorityWeights { quality: 0.65, cost: 0.15, latency: 0.20 },
            Preset::Cost => PriorityWeights { quality: 0.30, cost: 0.50, latency: 0.20 },
            Preset::Latency => PriorityWeights { quality: 0.30, cost: 0.20, latency: 0.50 },
        }
    }

    pub fn parse_lenient(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "balanced" => Some(Preset::Balanced),
            "quality" => Some(Preset::Quality),
            "cost" => Some(Preset::Cost),
            "latency" => Some(Preset::Latency),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        for preset in [Preset::Balanced, Preset::Quality, Preset::Cost, Preset::Latency] {
            let w = preset.weights();
            let total = w.quality + w.cost + w.latency;
            assert!((total - 1.0).abs() < 1e-9, "{preset:?} weights sum to {total}");
        }
    }

    #[test]
    fn default_preset_is_balanced() {
        assert_eq!(Preset::default(), Preset::Balanced);
    }

    #[test]
    fn parse_lenient_rejects_unknown() {
        assert_eq!(Preset::parse_lenient("fastest"), None);
        assert_eq!(Preset::parse_lenient("COST"), Some(Preset::Cost));
    }
}
