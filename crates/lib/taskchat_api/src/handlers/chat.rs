//! Chat request handlers.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ChatHistoryResponse, ChatImportRequest, ChatImportResponse};
use crate::services::chat;

/// `POST /api/chat/import`: import rows read from an uploaded sheet.
pub async fn import_chat_handler(
    State(state): State<AppState>,
    AuthenticatedUser(who): AuthenticatedUser,
    AppJson(body): AppJson<ChatImportRequest>,
) -> AppResult<Json<ChatImportResponse>> {
    let resp = chat::import_chat(state.store.as_ref(), &who, &body.rows).await?;
    Ok(Json(resp))
}

/// `GET /api/chat/history`: the caller's messages, oldest first.
pub async fn chat_history_handler(
    State(state): State<AppState>,
    AuthenticatedUser(who): AuthenticatedUser,
) -> AppResult<Json<ChatHistoryResponse>> {
    let messages = chat::chat_history(state.store.as_ref(), &who).await?;
    Ok(Json(ChatHistoryResponse { messages }))
}
