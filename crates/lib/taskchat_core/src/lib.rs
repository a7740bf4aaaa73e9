//! # taskchat_core
//!
//! Core domain logic for Taskchat: credential hashing, session tokens,
//! the authorization gate, and ownership-scoped storage.

pub mod auth;
pub mod chat;
pub mod migrate;
pub mod models;
pub mod store;
pub mod tasks;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
