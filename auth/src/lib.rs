//! Authentication building blocks shared by the report services.
//!
//! - Password hashing (Argon2id, PHC digests)
//! - HS256 bearer token issuance and validation
//! - Time-bounded token revocation
//! - An `Authenticator` tying the token codec to the revocation list
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("secret123").unwrap();
//! assert!(hasher.verify("secret123", &digest).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use std::sync::Arc;
//!
//! use auth::{Authenticator, Identity, InMemoryRevocationStore, TokenCodec, TokenSettings};
//! use chrono::Utc;
//!
//! let codec = TokenCodec::with_settings(TokenSettings::new(
//!     "secret_key_at_least_32_bytes_long!",
//!     "goreport",
//!     "goreport-web",
//! ))
//! .unwrap();
//! let auth = Authenticator::new(Arc::new(codec), Arc::new(InMemoryRevocationStore::new()));
//!
//! let identity = Identity {
//!     user_id: "u-1".to_string(),
//!     username: "alice".to_string(),
//!     roles: vec!["user".to_string()],
//!     tenant_id: "tenant-1".to_string(),
//! };
//! let now = Utc::now();
//! let issued = auth.issue(&identity, now).unwrap();
//! let principal = auth.authorize(&issued.token, now).unwrap();
//! assert_eq!(principal.tenant_id, "tenant-1");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod principal;
pub mod revocation;

pub use authenticator::AuthorizationError;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::TokenCodec;
pub use jwt::TokenSettings;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use principal::Identity;
pub use principal::IssuedToken;
pub use principal::Principal;
pub use revocation::InMemoryRevocationStore;
pub use revocation::RevocationStore;
