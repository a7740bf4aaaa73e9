//! Domain models.

pub mod auth;
pub mod chat;
pub mod task;
