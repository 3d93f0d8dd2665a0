use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::TokenCodec;
use crate::principal::Identity;
use crate::principal::IssuedToken;
use crate::principal::Principal;
use crate::revocation::RevocationStore;

/// Token lifecycle coordinator.
///
/// Combines the token codec with the revocation store: issues tokens on login,
/// authorizes bearer tokens on every gated request (revocation first, then
/// signature and claims), and revokes tokens on logout.
pub struct Authenticator {
    codec: Arc<TokenCodec>,
    revocations: Arc<dyn RevocationStore>,
}

/// Why a bearer token was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("Token revoked")]
    TokenRevoked,

    #[error(transparent)]
    Invalid(#[from] JwtError),
}

impl Authenticator {
    pub fn new(codec: Arc<TokenCodec>, revocations: Arc<dyn RevocationStore>) -> Self {
        Self { codec, revocations }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn revocations(&self) -> &dyn RevocationStore {
        self.revocations.as_ref()
    }

    /// Sign a token for an identity whose credentials were already verified.
    pub fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<IssuedToken, JwtError> {
        self.codec.issue(identity, now)
    }

    /// Resolve a bearer token to its principal.
    ///
    /// # Errors
    /// * `TokenRevoked` - The token is on the revocation list
    /// * `Invalid` - The codec rejected the token
    pub fn authorize(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, AuthorizationError> {
        if self.revocations.is_revoked_at(token, now) {
            return Err(AuthorizationError::TokenRevoked);
        }

        Ok(self.codec.validate(token, now)?)
    }

    /// Revoke `token` until the expiry of the principal it was issued for.
    pub fn revoke(&self, token: &str, principal: &Principal, now: DateTime<Utc>) {
        self.revocations.revoke_at(token, principal.expires_at, now);
    }
}
