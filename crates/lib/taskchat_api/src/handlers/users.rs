//! User account request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, RegisterResponse,
};
use crate::services::auth;

/// `POST /api/users/register`: create a new account.
pub async fn register_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let resp = auth::register(
        state.store.as_ref(),
        &state.hasher,
        body.username.as_deref().unwrap_or_default(),
        body.email.as_deref().unwrap_or_default(),
        body.password.as_deref().unwrap_or_default(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `POST /api/users/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let resp = auth::login(
        state.store.as_ref(),
        &state.hasher,
        &state.tokens,
        body.email.as_deref().unwrap_or_default(),
        body.password.as_deref().unwrap_or_default(),
    )
    .await?;
    Ok(Json(resp))
}

/// `GET /api/users/profile`: the caller's own account.
pub async fn profile_handler(
    State(state): State<AppState>,
    AuthenticatedUser(who): AuthenticatedUser,
) -> AppResult<Json<ProfileResponse>> {
    let user = auth::profile(state.store.as_ref(), &who).await?;
    Ok(Json(ProfileResponse { user }))
}
