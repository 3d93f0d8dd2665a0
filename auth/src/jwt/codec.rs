use std::sync::OnceLock;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use crate::principal::Identity;
use crate::principal::IssuedToken;
use crate::principal::Principal;

const DEFAULT_LIFETIME_HOURS: i64 = 24;

/// Upper bound on token lifetime accepted by `init`.
pub const MAX_LIFETIME_DAYS: i64 = 366;

/// Signing configuration supplied once at startup.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub lifetime: Duration,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            lifetime: Duration::hours(DEFAULT_LIFETIME_HOURS),
        }
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl Keys {
    fn from_settings(settings: TokenSettings) -> Result<Self, JwtError> {
        if settings.secret.is_empty() {
            return Err(JwtError::InvalidSettings("secret is empty".to_string()));
        }
        if settings.lifetime <= Duration::zero() {
            return Err(JwtError::InvalidSettings("lifetime must be positive".to_string()));
        }
        if settings.lifetime > Duration::days(MAX_LIFETIME_DAYS) {
            return Err(JwtError::InvalidSettings(format!(
                "lifetime exceeds {} days",
                MAX_LIFETIME_DAYS
            )));
        }

        // Expiry is checked against the caller's clock in `validate`, not the
        // library's, so the library-side check is off.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[&settings.issuer]);
        validation.set_audience(&[&settings.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "sub", "aud"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            issuer: settings.issuer,
            audience: settings.audience,
            lifetime: settings.lifetime,
        })
    }
}

/// Issues and validates HS256 bearer tokens.
///
/// The codec starts unconfigured; `init` installs the signing settings exactly
/// once and every later call only reads them. Using the codec before `init`
/// fails with `NotInitialized`.
#[derive(Default)]
pub struct TokenCodec {
    keys: OnceLock<Keys>,
}

impl TokenCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an already-initialized codec.
    pub fn with_settings(settings: TokenSettings) -> Result<Self, JwtError> {
        let codec = Self::new();
        codec.init(settings)?;
        Ok(codec)
    }

    /// Install the signing settings.
    ///
    /// # Errors
    /// * `InvalidSettings` - Empty secret, or lifetime not within `(0, MAX_LIFETIME_DAYS]`
    /// * `AlreadyInitialized` - Settings were installed before
    pub fn init(&self, settings: TokenSettings) -> Result<(), JwtError> {
        let keys = Keys::from_settings(settings)?;
        self.keys
            .set(keys)
            .map_err(|_| JwtError::AlreadyInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.keys.get().is_some()
    }

    fn keys(&self) -> Result<&Keys, JwtError> {
        self.keys.get().ok_or(JwtError::NotInitialized)
    }

    /// Sign a token for `identity`, valid from `now` for the configured lifetime.
    ///
    /// # Errors
    /// * `NotInitialized` - `init` has not been called
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<IssuedToken, JwtError> {
        let keys = self.keys()?;
        let claims = Claims::for_identity(identity, &keys.issuer, &keys.audience, now, keys.lifetime)
            .ok_or_else(|| JwtError::EncodingFailed("expiry out of range".to_string()))?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| JwtError::EncodingFailed("expiry out of range".to_string()))?;

        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify `token` and return the principal it carries.
    ///
    /// # Errors
    /// * `NotInitialized` - `init` has not been called
    /// * `UnexpectedAlgorithm` - Header names an algorithm other than HS256
    /// * `SignatureMismatch` - Signature does not match the payload
    /// * `Malformed` - Not a decodable JWT
    /// * `InvalidClaims` - Wrong issuer/audience or missing registered claims
    /// * `Expired` - `exp <= now`
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, JwtError> {
        let keys = self.keys()?;

        let claims = decode::<Claims>(token, &keys.decoding, &keys.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::SignatureMismatch,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    JwtError::UnexpectedAlgorithm
                }
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidIssuer
                | ErrorKind::InvalidAudience
                | ErrorKind::InvalidSubject
                | ErrorKind::ImmatureSignature
                | ErrorKind::MissingRequiredClaim(_) => JwtError::InvalidClaims(e.to_string()),
                _ => JwtError::Malformed(e.to_string()),
            })?;

        if claims.is_expired(now) {
            return Err(JwtError::Expired);
        }

        let expires_at = claims
            .expires_at()
            .ok_or_else(|| JwtError::InvalidClaims("exp out of range".to_string()))?;

        Ok(claims.into_principal(expires_at))
    }
}
