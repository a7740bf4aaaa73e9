//! Task request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use taskchat_core::models::task::TaskId;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    CreateTaskRequest, CreateTaskResponse, MessageResponse, TaskListQuery, TaskListResponse,
    TaskResponse, UpdateTaskStatusRequest,
};
use crate::services::tasks;

/// `POST /api/tasks`: create a pending task.
pub async fn create_task_handler(
    State(state): State<AppState>,
    AuthenticatedUser(who): AuthenticatedUser,
    AppJson(body): AppJson<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<CreateTaskResponse>)> {
    let resp = tasks::create_task(
        state.store.as_ref(),
        &who,
        body.title.as_deref(),
        body.description.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `GET /api/tasks?filter=completed|pending`: list the caller's tasks.
pub async fn list_tasks_handler(
    State(state): State<AppState>,
    AuthenticatedUser(who): AuthenticatedUser,
    AppQuery(query): AppQuery<TaskListQuery>,
) -> AppResult<Json<TaskListResponse>> {
    let tasks = tasks::list_tasks(state.store.as_ref(), &who, query.filter.as_deref()).await?;
    Ok(Json(TaskListResponse { tasks }))
}

/// `GET /api/tasks/{taskId}`
pub async fn get_task_handler(
    State(state): State<AppState>,
    AuthenticatedUser(who): AuthenticatedUser,
    AppPath(task_id): AppPath<TaskId>,
) -> AppResult<Json<TaskResponse>> {
    let task = tasks::get_task(state.store.as_ref(), &who, task_id).await?;
    Ok(Json(TaskResponse { task }))
}

/// `PATCH /api/tasks/{taskId}/status`
pub async fn update_task_status_handler(
    State(state): State<AppState>,
    AuthenticatedUser(who): AuthenticatedUser,
    AppPath(task_id): AppPath<TaskId>,
    AppJson(body): AppJson<UpdateTaskStatusRequest>,
) -> AppResult<Json<MessageResponse>> {
    tasks::update_task_status(state.store.as_ref(), &who, task_id, body.status.as_deref()).await?;
    Ok(Json(MessageResponse {
        message: "Task status updated successfully".into(),
    }))
}

/// `DELETE /api/tasks/{taskId}`
pub async fn delete_task_handler(
    State(state): State<AppState>,
    AuthenticatedUser(who): AuthenticatedUser,
    AppPath(task_id): AppPath<TaskId>,
) -> AppResult<StatusCode> {
    tasks::delete_task(state.store.as_ref(), &who, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
