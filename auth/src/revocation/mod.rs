pub mod memory;

pub use memory::InMemoryRevocationStore;

use chrono::DateTime;
use chrono::Utc;

/// Time-bounded set of revoked bearer tokens.
///
/// Implementations are shared by every request on the process and must be
/// safe under any number of concurrent readers and writers. An entry whose
/// expiry has passed never counts as a revocation.
pub trait RevocationStore: Send + Sync + 'static {
    /// Record `token` as revoked until `expires_at`, judged at `now`.
    ///
    /// Empty tokens and entries that are already expired are ignored.
    fn revoke_at(&self, token: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>);

    /// Whether `token` is revoked at `now`.
    fn is_revoked_at(&self, token: &str, now: DateTime<Utc>) -> bool;

    /// Drop every entry expired at `now`, returning how many were removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> usize;

    /// Number of entries currently held, expired or not.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn revoke(&self, token: &str, expires_at: DateTime<Utc>) {
        self.revoke_at(token, expires_at, Utc::now());
    }

    fn is_revoked(&self, token: &str) -> bool {
        self.is_revoked_at(token, Utc::now())
    }
}
