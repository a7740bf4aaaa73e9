//! PostgreSQL-backed store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{ChatStore, IdentityStore, StoreError, TaskStore};
use crate::auth::VerifiedIdentity;
use crate::models::auth::{Identity, IdentityId, IdentityWithDigest, NewIdentity};
use crate::models::chat::{ChatMessage, NewChatMessage, Sender};
use crate::models::task::{NewTask, Task, TaskFilter, TaskId, TaskStatus};

type TaskRow = (i64, i64, String, String, String, DateTime<Utc>);
type ChatRow = (i64, i64, String, String, DateTime<Utc>);

/// Store over a shared connection pool. Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn conflict_on_unique(e: sqlx::Error, what: &str) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(what.to_string())
        }
        _ => StoreError::Database(e),
    }
}

fn decode_error(column: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::Database(sqlx::Error::Decode(format!("{column}: {err}").into()))
}

fn task_from_row(row: TaskRow) -> Result<Task, StoreError> {
    let (id, owner_id, title, description, status, created_at) = row;
    let status: TaskStatus = status
        .parse()
        .map_err(|e| decode_error("tasks.status", e))?;
    Ok(Task {
        id,
        owner_id,
        title,
        description,
        status,
        created_at,
    })
}

fn chat_from_row(row: ChatRow) -> Result<ChatMessage, StoreError> {
    let (id, owner_id, message, sender, timestamp) = row;
    let sender: Sender = sender
        .parse()
        .map_err(|e| decode_error("chat_messages.sender", e))?;
    Ok(ChatMessage {
        id,
        owner_id,
        message,
        sender,
        timestamp,
    })
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM identities WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create_identity(&self, new: NewIdentity) -> Result<IdentityId, StoreError> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO identities (username, email, password_digest) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_digest)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "User with this email already exists"))
    }

    async fn find_identity_by_email(
        &self,
        email: &str,
    ) -> Result<Option<IdentityWithDigest>, StoreError> {
        let row = sqlx::query_as::<_, (i64, String, String, String, DateTime<Utc>)>(
            "SELECT id, username, email, password_digest, created_at \
             FROM identities WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(
            |(id, username, email, password_digest, created_at)| IdentityWithDigest {
                identity: Identity {
                    id,
                    username,
                    email,
                    created_at,
                },
                password_digest,
            },
        ))
    }

    async fn find_identity(&self, who: &VerifiedIdentity) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, (i64, String, String, DateTime<Utc>)>(
            "SELECT id, username, email, created_at FROM identities WHERE id = $1",
        )
        .bind(who.id())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(id, username, email, created_at)| Identity {
            id,
            username,
            email,
            created_at,
        }))
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, who: &VerifiedIdentity, new: NewTask) -> Result<TaskId, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO tasks (user_id, title, description, status) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(who.id())
        .bind(&new.title)
        .bind(&new.description)
        .bind(TaskStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn list_tasks(
        &self,
        who: &VerifiedIdentity,
        filter: TaskFilter,
    ) -> Result<Vec<Task>, StoreError> {
        let status = match filter {
            TaskFilter::All => None,
            TaskFilter::Only(s) => Some(s.as_str()),
        };
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, user_id, title, description, status, created_at \
             FROM tasks \
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(who.id())
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(task_from_row).collect()
    }

    async fn find_task(&self, who: &VerifiedIdentity, id: TaskId) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "SELECT id, user_id, title, description, status, created_at \
             FROM tasks WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(who.id())
        .fetch_optional(&self.pool)
        .await?;
        row.map(task_from_row).transpose()
    }

    async fn update_task_status(
        &self,
        who: &VerifiedIdentity,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE tasks SET status = $1 WHERE id = $2 AND user_id = $3")
            .bind(status.as_str())
            .bind(id)
            .bind(who.id())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_task(&self, who: &VerifiedIdentity, id: TaskId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(who.id())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ChatStore for PgStore {
    async fn insert_messages(
        &self,
        who: &VerifiedIdentity,
        messages: &[NewChatMessage],
    ) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for msg in messages {
            let result = sqlx::query(
                "INSERT INTO chat_messages (user_id, message, sender, timestamp) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(who.id())
            .bind(&msg.message)
            .bind(msg.sender.as_str())
            .bind(msg.timestamp)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;
        Ok(inserted)
    }

    async fn chat_history(&self, who: &VerifiedIdentity) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query_as::<_, ChatRow>(
            "SELECT id, user_id, message, sender, timestamp \
             FROM chat_messages WHERE user_id = $1 \
             ORDER BY timestamp ASC, id ASC",
        )
        .bind(who.id())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(chat_from_row).collect()
    }
}
