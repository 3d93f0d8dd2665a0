use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;
use parking_lot::Mutex;

use super::RevocationStore;

/// Process-local revocation store.
///
/// A single mutex covers lookup, eviction and insertion, so an entry can never
/// be evicted between being checked and being read. `parking_lot` locks are
/// released on unwind and never poison.
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn evict_expired(entries: &mut HashMap<String, DateTime<Utc>>, now: DateTime<Utc>) -> usize {
    let before = entries.len();
    entries.retain(|_, expires_at| *expires_at > now);
    before - entries.len()
}

impl RevocationStore for InMemoryRevocationStore {
    fn revoke_at(&self, token: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) {
        if token.is_empty() || expires_at <= now {
            return;
        }

        let mut entries = self.entries.lock();
        // A later expiry wins when the same token is revoked twice.
        let slot = entries.entry(token.to_string()).or_insert(expires_at);
        if *slot < expires_at {
            *slot = expires_at;
        }
        tracing::debug!(expires_at = %expires_at, live = entries.len(), "Token revoked");
    }

    fn is_revoked_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        if token.is_empty() {
            return false;
        }

        let mut entries = self.entries.lock();
        let evicted = evict_expired(&mut entries, now);
        if evicted > 0 {
            tracing::debug!(evicted, live = entries.len(), "Expired revocations evicted");
        }

        entries.get(token).is_some_and(|expires_at| *expires_at > now)
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        evict_expired(&mut self.entries.lock(), now)
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}
