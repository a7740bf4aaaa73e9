//! Request handlers.

pub mod chat;
pub mod tasks;
pub mod users;
