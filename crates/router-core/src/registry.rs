//! The in-memory model registry: a stable-order table of model descriptors
//! plus their mutable availability flags.
//!
//! Mutation is intentionally narrow — `mark_unavailable` and `reset_all` are
//! the only two operations. Availability is an `AtomicBool` per entry
//! (Relaxed ordering is sufficient: last-writer-wins semantics with no
//! ordering guarantee between concurrent reads/writes is acceptable here).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::category::Category;
use crate::model::ModelDescriptor;

/// One registered model: its immutable descriptor plus a mutable
/// availability flag. Registry entries are reference-counted so a
/// [`RegistrySnapshot`] can be handed to the routing engine without cloning
/// descriptors.
pub struct ModelEntry {
    pub descriptor: ModelDescriptor,
    available: AtomicBool,
}

impl ModelEntry {
    fn new(descriptor: ModelDescriptor) -> Self {
        Self { descriptor, available: AtomicBool::new(true) }
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}

/// A point-in-time read of one entry's availability, used by the routing
/// engine so a whole candidate-filtering pass observes a consistent view
/// even if another request flips a flag mid-flight.
#[derive(Clone)]
pub struct RegistrySnapshot {
    pub entries: Vec<(Arc<ModelEntry>, bool)>,
}

impl RegistrySnapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Process-singleton table of routable models, in stable registration
/// order. `key` and `provider_model_name` are each unique within the
/// registry (enforced at construction).
pub struct ModelRegistry {
    entries: Vec<Arc<ModelEntry>>,
}

impl ModelRegistry {
    pub fn new(descriptors: Vec<ModelDescriptor>) -> Self {
        Self { entries: descriptors.into_iter().map(ModelEntry::new).map(Arc::new).collect() }
    }

    /// Snapshot of every entry's current availability, taken in registry
    /// order. The routing engine's candidate filter reads this once per
    /// decision rather than re-reading the atomics repeatedly mid-scoring.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            entries: self.entries.iter().map(|e| (Arc::clone(e), e.is_available())).collect(),
        }
    }

    pub fn find(&self, key: &str) -> Option<&Arc<ModelEntry>> {
        self.entries.iter().find(|e| e.descriptor.key == key)
    }

    /// Resolve by either the stable key or the provider-native wire name.
    pub fn find_by_key_or_provider_name(&self, name: &str) -> Option<&Arc<ModelEntry>> {
        self.entries
            .iter()
            .find(|e| e.descriptor.key == name || e.descriptor.provider_model_name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ModelEntry>> {
        self.entries.iter()
    }

    /// Flip one model's availability flag to false. Stays false until the
    /// next `reset_all`. A no-op (logged) if the key is unknown.
    pub fn mark_unavailable(&self, key: &str) {
        match self.find(key) {
            Some(entry) => {
                entry.available.store(false, Ordering::Relaxed);
                tracing::warn!(model_key = key, "marked model unavailable");
            }
            None => tracing::debug!(model_key = key, "mark_unavailable on unknown key"),
        }
    }

    /// Restore every model to available. Idempotent.
    pub fn reset_all(&self) {
        for entry in &self.entries {
            entry.available.store(true, Ordering::Relaxed);
        }
    }

    /// All descriptors that declare a quality prior for `category`, in
    /// registry order — used for reporting (e.g. `GET /models`), not for
    /// the routing hot path which works off a [`RegistrySnapshot`].
    pub fn supporting(&self, category: Category) -> Vec<&Arc<ModelEntry>> {
        self.entries.iter().filter(|e| e.descriptor.supports_category(category)).collect()
    }
}
