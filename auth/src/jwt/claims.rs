use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::principal::Identity;
use crate::principal::Principal;

/// Decoded token payload.
///
/// Private claims use camelCase keys (`userId`, `tenantId`); registered claims
/// keep their RFC 7519 names. `aud` is always emitted as an array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,

    pub username: String,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(rename = "tenantId")]
    pub tenant_id: String,

    pub iss: String,

    pub sub: String,

    pub aud: Vec<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Claims for `identity`, valid from `now` for `lifetime`.
    ///
    /// `None` when the expiry falls outside the representable date range.
    pub fn for_identity(
        identity: &Identity,
        issuer: &str,
        audience: &str,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Option<Self> {
        let expires = now.checked_add_signed(lifetime)?;

        Some(Self {
            user_id: identity.user_id.clone(),
            username: identity.username.clone(),
            roles: identity.roles.clone(),
            tenant_id: identity.tenant_id.clone(),
            iss: issuer.to_string(),
            sub: identity.user_id.clone(),
            aud: vec![audience.to_string()],
            iat: now.timestamp(),
            exp: expires.timestamp(),
        })
    }

    /// Expired once `exp <= now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    pub fn into_principal(self, expires_at: DateTime<Utc>) -> Principal {
        Principal {
            user_id: self.user_id,
            username: self.username,
            tenant_id: self.tenant_id,
            roles: self.roles,
            expires_at,
        }
    }
}
