//! Authorization gate: turns a presented `Authorization` header into a
//! [`VerifiedIdentity`], or refuses.
//!
//! A `VerifiedIdentity` can only be minted here (or by code inside this
//! crate), and every owned-resource store operation demands one. That makes
//! "scope every query to the caller" something the compiler checks.

use tracing::debug;

use super::AuthError;
use super::jwt::TokenIssuer;
use crate::models::auth::IdentityId;

const BEARER_PREFIX: &str = "Bearer ";

/// An identity whose session token has been verified for this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerifiedIdentity(IdentityId);

impl VerifiedIdentity {
    pub(crate) fn new(id: IdentityId) -> Self {
        Self(id)
    }

    /// The caller's identity id. Use it as the owner filter on every query.
    pub fn id(&self) -> IdentityId {
        self.0
    }
}

/// Verify the raw `Authorization` header value.
///
/// Missing header, wrong scheme, empty token, and every token failure all
/// collapse into `Unauthenticated`; the specific reason is only logged.
pub fn authenticate(
    header: Option<&str>,
    tokens: &TokenIssuer,
) -> Result<VerifiedIdentity, AuthError> {
    let header = header.ok_or_else(|| {
        debug!("auth gate: no Authorization header");
        AuthError::Unauthenticated("Not authenticated".into())
    })?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            debug!("auth gate: missing Bearer token");
            AuthError::Unauthenticated("Not authenticated".into())
        })?;

    match tokens.verify(token) {
        Ok(id) => Ok(VerifiedIdentity::new(id)),
        Err(e) => {
            debug!(reason = %e, "auth gate: token rejected");
            Err(AuthError::Unauthenticated("Not authenticated".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"gate-secret", Duration::hours(1))
    }

    #[test]
    fn valid_bearer_token_resolves_identity() {
        let tokens = issuer();
        let header = format!("Bearer {}", tokens.issue(9).unwrap());
        let who = authenticate(Some(header.as_str()), &tokens).unwrap();
        assert_eq!(who.id(), 9);
    }

    #[test]
    fn missing_header_is_unauthenticated() {
        assert!(matches!(
            authenticate(None, &issuer()),
            Err(AuthError::Unauthenticated(_))
        ));
    }

    #[test]
    fn wrong_scheme_or_empty_token_is_unauthenticated() {
        let tokens = issuer();
        let token = tokens.issue(9).unwrap();
        for header in [token.clone(), format!("Basic {token}"), "Bearer ".into(), "Bearer    ".into()] {
            assert!(
                matches!(
                    authenticate(Some(header.as_str()), &tokens),
                    Err(AuthError::Unauthenticated(_))
                ),
                "header {header:?} should be rejected"
            );
        }
    }

    #[test]
    fn every_token_failure_looks_the_same() {
        let tokens = issuer();
        let expired = tokens.issue_at(9, Utc::now() - Duration::hours(2)).unwrap();
        let foreign = TokenIssuer::new(b"elsewhere", Duration::hours(1))
            .issue(9)
            .unwrap();
        let messages: Vec<String> = [expired, foreign, "junk".to_string()]
            .iter()
            .map(|t| {
                match authenticate(Some(format!("Bearer {t}").as_str()), &tokens) {
                    Err(e) => e.to_string(),
                    Ok(_) => panic!("token {t:?} should be rejected"),
                }
            })
            .collect();
        assert!(messages.windows(2).all(|w| w[0] == w[1]));
    }
}
