//! Task service. Every call is scoped to the verified caller; another
//! owner's task is reported exactly like a missing one.

use taskchat_core::auth::VerifiedIdentity;
use taskchat_core::models::task::TaskId;
use taskchat_core::store::Store;
use taskchat_core::tasks;

use crate::error::{AppError, AppResult};
use crate::models::{CreateTaskResponse, TaskView};

const TASK_NOT_FOUND: &str = "Task not found";

pub async fn create_task(
    store: &dyn Store,
    who: &VerifiedIdentity,
    title: Option<&str>,
    description: Option<&str>,
) -> AppResult<CreateTaskResponse> {
    let new = tasks::new_task(title, description)?;
    let task_id = store.create_task(who, new).await?;
    Ok(CreateTaskResponse {
        message: "Task created successfully".into(),
        task_id,
    })
}

pub async fn list_tasks(
    store: &dyn Store,
    who: &VerifiedIdentity,
    filter: Option<&str>,
) -> AppResult<Vec<TaskView>> {
    let filter = tasks::parse_filter(filter);
    let found = store.list_tasks(who, filter).await?;
    Ok(found.into_iter().map(TaskView::from).collect())
}

pub async fn get_task(store: &dyn Store, who: &VerifiedIdentity, id: TaskId) -> AppResult<TaskView> {
    store
        .find_task(who, id)
        .await?
        .map(TaskView::from)
        .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))
}

pub async fn update_task_status(
    store: &dyn Store,
    who: &VerifiedIdentity,
    id: TaskId,
    status: Option<&str>,
) -> AppResult<()> {
    let status = tasks::parse_status(status)?;
    if store.update_task_status(who, id, status).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(TASK_NOT_FOUND.into()))
    }
}

pub async fn delete_task(store: &dyn Store, who: &VerifiedIdentity, id: TaskId) -> AppResult<()> {
    if store.delete_task(who, id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(TASK_NOT_FOUND.into()))
    }
}
