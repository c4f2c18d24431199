//! Caller-owned memo of successful resolutions.

use std::collections::HashMap;

use crate::models::{Provenance, ResolvedQuantity};

/// Successful resolutions keyed by lookup key.
///
/// Grows only; nothing is evicted during a run. Owned by the caller and
/// lent to resolvers by `&mut`.
#[derive(Debug, Default, Clone)]
pub struct ResolutionMemo {
    entries: HashMap<String, ResolvedQuantity>,
}

impl ResolutionMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Earlier result for `key`, re-tagged as coming from the cache.
    pub fn get(&self, key: &str) -> Option<ResolvedQuantity> {
        self.entries.get(key).map(|hit| ResolvedQuantity {
            provenance: Provenance::Cache,
            ..hit.clone()
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Record a result under its source key.
    pub fn record(&mut self, resolved: &ResolvedQuantity) {
        self.entries
            .insert(resolved.source_key.clone(), resolved.clone());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
