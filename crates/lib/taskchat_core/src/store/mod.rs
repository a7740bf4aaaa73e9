//! Storage collaborators.
//!
//! Every operation on an owned resource takes the caller's
//! [`VerifiedIdentity`] and must filter by it. A row owned by someone else is
//! indistinguishable from a row that does not exist.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::VerifiedIdentity;
use crate::models::auth::{Identity, IdentityId, IdentityWithDigest, NewIdentity};
use crate::models::chat::{ChatMessage, NewChatMessage};
use crate::models::task::{NewTask, Task, TaskFilter, TaskId, TaskStatus};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Identity (account) persistence.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Check whether an email is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    /// Persist a new identity, returning its id. A taken email is `Conflict`.
    async fn create_identity(&self, new: NewIdentity) -> Result<IdentityId, StoreError>;

    /// Fetch an identity and its digest by email.
    async fn find_identity_by_email(
        &self,
        email: &str,
    ) -> Result<Option<IdentityWithDigest>, StoreError>;

    /// Fetch the caller's own identity.
    async fn find_identity(&self, who: &VerifiedIdentity) -> Result<Option<Identity>, StoreError>;
}

/// Task persistence, scoped to the owner.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, who: &VerifiedIdentity, new: NewTask) -> Result<TaskId, StoreError>;

    /// The caller's tasks matching `filter`, newest first.
    async fn list_tasks(
        &self,
        who: &VerifiedIdentity,
        filter: TaskFilter,
    ) -> Result<Vec<Task>, StoreError>;

    async fn find_task(&self, who: &VerifiedIdentity, id: TaskId) -> Result<Option<Task>, StoreError>;

    /// Returns `false` when no task with `id` belongs to the caller.
    async fn update_task_status(
        &self,
        who: &VerifiedIdentity,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<bool, StoreError>;

    /// Returns `false` when no task with `id` belongs to the caller.
    async fn delete_task(&self, who: &VerifiedIdentity, id: TaskId) -> Result<bool, StoreError>;
}

/// Chat history persistence, scoped to the owner.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Insert all messages atomically, returning how many were written.
    async fn insert_messages(
        &self,
        who: &VerifiedIdentity,
        messages: &[NewChatMessage],
    ) -> Result<u64, StoreError>;

    /// The caller's messages, oldest first.
    async fn chat_history(&self, who: &VerifiedIdentity) -> Result<Vec<ChatMessage>, StoreError>;
}

/// Everything the API needs from storage.
pub trait Store: IdentityStore + TaskStore + ChatStore {}

impl<T: IdentityStore + TaskStore + ChatStore> Store for T {}
