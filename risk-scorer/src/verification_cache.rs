//! Per-process memoization of `{event_id -> verified}` (§4.2, §5).
//!
//! Scoped to the process lifetime; never persisted, rebuilt empty on
//! restart. A plain `RwLock` is sufficient here: reads vastly outnumber
//! writes once a history's older rows have all been classified once.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

/// Shared, cloneable handle onto the verification memoization table.
#[derive(Clone, Default)]
pub struct VerificationCache {
    entries: Arc<RwLock<HashMap<Uuid, bool>>>,
}

impl VerificationCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previously computed verification result.
    #[must_use]
    pub fn get(&self, event_id: Uuid) -> Option<bool> {
        self.entries.read().map_or(None, |guard| guard.get(&event_id).copied())
    }

    /// Record a verification result for future lookups.
    pub fn set(&self, event_id: Uuid, verified: bool) {
        if let Ok(mut guard) = self.entries.write() {
            guard.insert(event_id, verified);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_recalls_a_verdict() {
        let cache = VerificationCache::new();
        let id = Uuid::new_v4();
        assert_eq!(cache.get(id), None);
        cache.set(id, true);
        assert_eq!(cache.get(id), Some(true));
    }
}
