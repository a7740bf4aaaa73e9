//! # taskchat_api
//!
//! HTTP API library for Taskchat.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use taskchat_core::auth::AuthError;
use taskchat_core::auth::jwt::{TokenIssuer, token_ttl};
use taskchat_core::auth::password::CredentialHasher;
use taskchat_core::store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{chat, tasks, users};

/// Shared application state passed to all handlers.
///
/// Everything here is fixed at startup; requests only read it.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend (PostgreSQL or in-memory).
    pub store: Arc<dyn Store>,
    /// Session token signer/verifier holding the signing key.
    pub tokens: Arc<TokenIssuer>,
    /// Password hasher with its bounded worker pool.
    pub hasher: Arc<CredentialHasher>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Build state from configuration over the given store.
    pub fn new(store: Arc<dyn Store>, config: ApiConfig) -> Result<Self, AuthError> {
        let ttl = token_ttl(config.token_ttl_secs)?;
        let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), ttl);
        let hasher = CredentialHasher::new(config.bcrypt_cost, config.hash_concurrency)?;
        Ok(Self {
            store,
            tokens: Arc::new(tokens),
            hasher: Arc::new(hasher),
            config,
        })
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/api/users/register", post(users::register_handler))
        .route("/api/users/login", post(users::login_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route("/api/users/profile", get(users::profile_handler))
        .route(
            "/api/tasks",
            post(tasks::create_task_handler).get(tasks::list_tasks_handler),
        )
        .route(
            "/api/tasks/{task_id}",
            get(tasks::get_task_handler).delete(tasks::delete_task_handler),
        )
        .route(
            "/api/tasks/{task_id}/status",
            patch(tasks::update_task_status_handler),
        )
        .route("/api/chat/import", post(chat::import_chat_handler))
        .route("/api/chat/history", get(chat::chat_history_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
