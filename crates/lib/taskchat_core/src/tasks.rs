//! Task input rules: what a create/update request must look like before it
//! reaches the store.

use thiserror::Error;

use crate::models::task::{NewTask, TaskFilter, TaskStatus};

/// Rejected task input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskInputError {
    #[error("Task title is required")]
    MissingTitle,

    #[error("Valid status (completed/pending) is required")]
    InvalidStatus,
}

/// Build a new task from request fields. A blank title is rejected; a missing
/// description becomes empty.
pub fn new_task(title: Option<&str>, description: Option<&str>) -> Result<NewTask, TaskInputError> {
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(TaskInputError::MissingTitle)?;
    Ok(NewTask {
        title: title.to_string(),
        description: description.unwrap_or_default().to_string(),
    })
}

/// Parse the status of a status-change request.
pub fn parse_status(status: Option<&str>) -> Result<TaskStatus, TaskInputError> {
    status
        .and_then(|s| s.parse().ok())
        .ok_or(TaskInputError::InvalidStatus)
}

/// Parse the `filter` query parameter. Anything unrecognised lists everything.
pub fn parse_filter(filter: Option<&str>) -> TaskFilter {
    match filter.and_then(|f| f.parse().ok()) {
        Some(status) => TaskFilter::Only(status),
        None => TaskFilter::All,
    }
}
