//! Authentication service: register/login flows over `taskchat_core::auth`.

use taskchat_core::auth::jwt::TokenIssuer;
use taskchat_core::auth::password::CredentialHasher;
use taskchat_core::auth::validation::validate_registration;
use taskchat_core::auth::{AuthError, VerifiedIdentity};
use taskchat_core::models::auth::{IdentityId, NewIdentity};
use taskchat_core::store::Store;
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::models::{AuthUser, LoginResponse, ProfileUser, RegisterResponse};

/// Register a new identity.
///
/// The digest is computed before anything is written, so an abandoned
/// request never leaves a half-created account behind.
pub async fn register(
    store: &dyn Store,
    hasher: &CredentialHasher,
    username: &str,
    email: &str,
    password: &str,
) -> AppResult<RegisterResponse> {
    validate_registration(username, email, password)?;

    if store.email_exists(email).await? {
        return Err(AppError::Conflict(
            "User with this email already exists".into(),
        ));
    }

    let password_digest = hasher.hash(password.to_string()).await?;

    let user_id: IdentityId = store
        .create_identity(NewIdentity {
            username: username.trim().to_string(),
            email: email.to_string(),
            password_digest,
        })
        .await?;

    info!(user_id, "registered new user");

    Ok(RegisterResponse {
        message: "User registered successfully".into(),
        user_id,
    })
}

/// Authenticate with email + password and issue a session token.
///
/// Unknown email, wrong password and an unreadable stored digest all end in
/// the same `InvalidCredentials`.
pub async fn login(
    store: &dyn Store,
    hasher: &CredentialHasher,
    tokens: &TokenIssuer,
    email: &str,
    password: &str,
) -> AppResult<LoginResponse> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".into(),
        ));
    }

    let record = store.find_identity_by_email(email).await?;

    let Some(record) = record else {
        // Same bcrypt work as a real check, so timing does not reveal the miss.
        let _ = hasher.verify_decoy(password.to_string()).await;
        return Err(AuthError::InvalidCredentials.into());
    };

    let matched = match hasher
        .verify(password.to_string(), record.password_digest.clone())
        .await
    {
        Ok(matched) => matched,
        Err(AuthError::Encoding(detail)) => {
            error!(user_id = record.identity.id, %detail, "stored password digest is unreadable");
            false
        }
        Err(e) => return Err(e.into()),
    };

    if !matched {
        return Err(AuthError::InvalidCredentials.into());
    }

    let identity = record.identity;
    let token = tokens.issue(identity.id)?;
    info!(user_id = identity.id, "user logged in");

    Ok(LoginResponse {
        message: "Login successful".into(),
        token,
        user: AuthUser {
            id: identity.id,
            username: identity.username,
            email: identity.email,
        },
    })
}

/// Public profile of the caller.
pub async fn profile(store: &dyn Store, who: &VerifiedIdentity) -> AppResult<ProfileUser> {
    store
        .find_identity(who)
        .await?
        .map(ProfileUser::from)
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}
