//! In-memory store for local development and tests.
//!
//! Same contract as [`super::PgStore`]: ids are assigned sequentially from 1
//! and every owned-resource lookup filters by owner.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ChatStore, IdentityStore, StoreError, TaskStore};
use crate::auth::VerifiedIdentity;
use crate::models::auth::{Identity, IdentityId, IdentityWithDigest, NewIdentity};
use crate::models::chat::{ChatMessage, NewChatMessage};
use crate::models::task::{NewTask, Task, TaskFilter, TaskId, TaskStatus};

#[derive(Debug, Default)]
struct Tables {
    identities: Vec<IdentityWithDigest>,
    tasks: Vec<Task>,
    chat_messages: Vec<ChatMessage>,
    next_identity_id: i64,
    next_task_id: i64,
    next_message_id: i64,
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.identities.iter().any(|i| i.identity.email == email))
    }

    async fn create_identity(&self, new: NewIdentity) -> Result<IdentityId, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.identities.iter().any(|i| i.identity.email == new.email) {
            return Err(StoreError::Conflict(
                "User with this email already exists".into(),
            ));
        }
        let id = next(&mut tables.next_identity_id);
        tables.identities.push(IdentityWithDigest {
            identity: Identity {
                id,
                username: new.username,
                email: new.email,
                created_at: Utc::now(),
            },
            password_digest: new.password_digest,
        });
        Ok(id)
    }

    async fn find_identity_by_email(
        &self,
        email: &str,
    ) -> Result<Option<IdentityWithDigest>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .identities
            .iter()
            .find(|i| i.identity.email == email)
            .cloned())
    }

    async fn find_identity(&self, who: &VerifiedIdentity) -> Result<Option<Identity>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .identities
            .iter()
            .find(|i| i.identity.id == who.id())
            .map(|i| i.identity.clone()))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, who: &VerifiedIdentity, new: NewTask) -> Result<TaskId, StoreError> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.next_task_id);
        tables.tasks.push(Task {
            id,
            owner_id: who.id(),
            title: new.title,
            description: new.description,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_tasks(
        &self,
        who: &VerifiedIdentity,
        filter: TaskFilter,
    ) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .iter()
            .filter(|t| t.owner_id == who.id() && filter.matches(t.status))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    async fn find_task(&self, who: &VerifiedIdentity, id: TaskId) -> Result<Option<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .find(|t| t.id == id && t.owner_id == who.id())
            .cloned())
    }

    async fn update_task_status(
        &self,
        who: &VerifiedIdentity,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == who.id())
        {
            Some(task) => {
                task.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_task(&self, who: &VerifiedIdentity, id: TaskId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.tasks.len();
        tables
            .tasks
            .retain(|t| !(t.id == id && t.owner_id == who.id()));
        Ok(tables.tasks.len() < before)
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn insert_messages(
        &self,
        who: &VerifiedIdentity,
        messages: &[NewChatMessage],
    ) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        for msg in messages {
            let id = next(&mut tables.next_message_id);
            tables.chat_messages.push(ChatMessage {
                id,
                owner_id: who.id(),
                message: msg.message.clone(),
                sender: msg.sender,
                timestamp: msg.timestamp,
            });
        }
        Ok(messages.len() as u64)
    }

    async fn chat_history(&self, who: &VerifiedIdentity) -> Result<Vec<ChatMessage>, StoreError> {
        let tables = self.tables.read().await;
        let mut messages: Vec<ChatMessage> = tables
            .chat_messages
            .iter()
            .filter(|m| m.owner_id == who.id())
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::chat::Sender;

    fn identity(username: &str, email: &str) -> NewIdentity {
        NewIdentity {
            username: username.into(),
            email: email.into(),
            password_digest: "digest".into(),
        }
    }

    fn task(title: &str) -> NewTask {
        NewTask {
            title: title.into(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let store = MemoryStore::new();
        let id = store.create_identity(identity("alice", "a@x.com")).await.unwrap();
        assert_eq!(id, 1);
        assert!(store.email_exists("a@x.com").await.unwrap());
        assert!(matches!(
            store.create_identity(identity("alice2", "a@x.com")).await,
            Err(StoreError::Conflict(_))
        ));
        let found = store.find_identity_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.identity.username, "alice");
        assert_eq!(found.password_digest, "digest");
    }

    #[tokio::test]
    async fn tasks_are_invisible_to_other_owners() {
        let store = MemoryStore::new();
        let alice = VerifiedIdentity::new(1);
        let bob = VerifiedIdentity::new(2);
        let id = store.create_task(&alice, task("alice's")).await.unwrap();

        assert!(store.find_task(&bob, id).await.unwrap().is_none());
        assert!(store.list_tasks(&bob, TaskFilter::All).await.unwrap().is_empty());
        assert!(!store
            .update_task_status(&bob, id, TaskStatus::Completed)
            .await
            .unwrap());
        assert!(!store.delete_task(&bob, id).await.unwrap());

        let still = store.find_task(&alice, id).await.unwrap().unwrap();
        assert_eq!(still.status, TaskStatus::Pending);
        assert!(store.delete_task(&alice, id).await.unwrap());
        assert!(store.find_task(&alice, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn task_listing_filters_and_orders_newest_first() {
        let store = MemoryStore::new();
        let alice = VerifiedIdentity::new(1);
        let first = store.create_task(&alice, task("first")).await.unwrap();
        let second = store.create_task(&alice, task("second")).await.unwrap();
        store
            .update_task_status(&alice, first, TaskStatus::Completed)
            .await
            .unwrap();

        let all = store.list_tasks(&alice, TaskFilter::All).await.unwrap();
        assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![second, first]);

        let done = store
            .list_tasks(&alice, TaskFilter::Only(TaskStatus::Completed))
            .await
            .unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, first);
    }

    #[tokio::test]
    async fn chat_history_is_scoped_and_chronological() {
        let store = MemoryStore::new();
        let alice = VerifiedIdentity::new(1);
        let bob = VerifiedIdentity::new(2);
        let at = |h| Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap();
        let msgs = vec![
            NewChatMessage {
                message: "later".into(),
                sender: Sender::System,
                timestamp: at(10),
            },
            NewChatMessage {
                message: "earlier".into(),
                sender: Sender::User,
                timestamp: at(9),
            },
        ];
        assert_eq!(store.insert_messages(&alice, &msgs).await.unwrap(), 2);

        let history = store.chat_history(&alice).await.unwrap();
        assert_eq!(
            history.iter().map(|m| m.message.as_str()).collect::<Vec<_>>(),
            vec!["earlier", "later"]
        );
        assert!(store.chat_history(&bob).await.unwrap().is_empty());
    }
}
