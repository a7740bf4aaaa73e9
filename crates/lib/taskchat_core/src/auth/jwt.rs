//! Session token issuance and verification (HS256 JWT).
//!
//! Tokens are stateless: validity is decided by signature and the embedded
//! expiry alone. There is no server-side session table and no revocation.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{info, warn};

use super::{AuthError, TokenError};
use crate::models::auth::{IdentityId, TokenClaims};

/// Default session lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Longest accepted session lifetime: one year.
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * DEFAULT_TOKEN_TTL_SECS;

/// Turn a configured lifetime into a [`Duration`], refusing values outside
/// `1..=MAX_TOKEN_TTL_SECS`.
pub fn token_ttl(secs: i64) -> Result<Duration, AuthError> {
    if !(1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
        return Err(AuthError::Internal(format!(
            "token TTL must be between 1 and {MAX_TOKEN_TTL_SECS} seconds, got {secs}"
        )));
    }
    Ok(Duration::seconds(secs))
}

/// Mints and verifies session tokens with a fixed signing secret and TTL.
///
/// Built once at startup and shared read-only across requests.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by hand in `verify_at` so the clock can be supplied.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `identity_id`, valid from now for the configured TTL.
    pub fn issue(&self, identity_id: IdentityId) -> Result<String, AuthError> {
        self.issue_at(identity_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, identity_id: IdentityId, now: DateTime<Utc>) -> Result<String, AuthError> {
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Internal("token expiry out of range".into()))?;
        let claims = TokenClaims {
            sub: identity_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Verify a token and return the identity it is bound to.
    pub fn verify(&self, token: &str) -> Result<IdentityId, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token against the clock reading `now`.
    ///
    /// Structure is decoded first, then the signature, then `now <= exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityId, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::Malformed,
            },
        )?;
        let claims = data.claims;

        if now.timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        claims.sub.parse().map_err(|_| TokenError::Malformed)
    }
}

/// Resolve the signing secret: env var `JWT_SECRET` → `AUTH_SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    if let Ok(secret) = std::env::var("AUTH_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    resolve_jwt_secret_at(&jwt_secret_path())
}

/// Read the secret persisted at `path`, generating and writing one if absent.
pub fn resolve_jwt_secret_at(path: &Path) -> String {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match std::fs::write(path, &secret) {
        Ok(()) => info!(path = %path.display(), "generated new JWT secret"),
        // Still usable for this process; tokens just won't survive a restart.
        Err(e) => warn!(path = %path.display(), "could not persist JWT secret: {e}"),
    }
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskchat")
        .join("jwt-secret")
}
