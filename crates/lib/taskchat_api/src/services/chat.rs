//! Chat import/history service.

use taskchat_core::auth::VerifiedIdentity;
use taskchat_core::chat::{ChatImportRow, validate_rows};
use taskchat_core::store::Store;
use tracing::info;

use crate::error::AppResult;
use crate::models::{ChatImportResponse, ChatMessageView};

/// Validate sheet rows and store the good ones for the caller in one batch.
pub async fn import_chat(
    store: &dyn Store,
    who: &VerifiedIdentity,
    rows: &[ChatImportRow],
) -> AppResult<ChatImportResponse> {
    let batch = validate_rows(rows)?;
    let imported_count = store.insert_messages(who, &batch.messages).await?;
    info!(
        user_id = who.id(),
        imported = imported_count,
        skipped = batch.skipped,
        "imported chat history"
    );
    Ok(ChatImportResponse {
        message: "Chat history imported successfully".into(),
        imported_count,
        skipped_count: batch.skipped,
    })
}

/// The caller's chat history, oldest first.
pub async fn chat_history(store: &dyn Store, who: &VerifiedIdentity) -> AppResult<Vec<ChatMessageView>> {
    let messages = store.chat_history(who).await?;
    Ok(messages.into_iter().map(ChatMessageView::from).collect())
}
