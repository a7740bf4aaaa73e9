//! Identity domain models.
//!
//! These are internal domain models, distinct from the API wire types in
//! `taskchat_api::models` (which carry `#[serde(rename)]` for camelCase etc.).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Primary key of an identity.
pub type IdentityId = i64;

/// Public identity fields. Never carries the password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Identity with its stored credential (for the login flow only).
#[derive(Debug, Clone)]
pub struct IdentityWithDigest {
    pub identity: Identity,
    pub password_digest: String,
}

/// Fields needed to persist a new identity. `password_digest` must already
/// be hashed.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub password_digest: String,
}

/// JWT claims embedded in session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the identity id as a decimal string (standard JWT `sub` claim).
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}
