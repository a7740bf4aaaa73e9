//! Authentication middleware: Bearer token extraction and verification.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use taskchat_core::auth::VerifiedIdentity;
use taskchat_core::auth::gate::authenticate;

use crate::AppState;
use crate::error::AppError;

/// The verified caller, stored in request extensions by [`require_auth`].
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub VerifiedIdentity);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies it,
/// and injects [`AuthenticatedUser`] into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let who = authenticate(header, &state.tokens)?;
    request.extensions_mut().insert(AuthenticatedUser(who));

    Ok(next.run(request).await)
}

/// Handlers take `AuthenticatedUser` as an argument. If a route was mounted
/// without [`require_auth`] the extension is absent and the request is
/// refused rather than run anonymously.
impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))
    }
}
