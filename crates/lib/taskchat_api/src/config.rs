//! API server configuration.

/// Configuration for the API server.
///
/// The server binary fills this from its command line, where each option
/// also reads an environment variable:
///
/// | Field              | Variable                     | Default                          |
/// |--------------------|------------------------------|----------------------------------|
/// | `bind_addr`        | `BIND_ADDR`                  | `127.0.0.1:5000`                 |
/// | `jwt_secret`       | `JWT_SECRET` / `AUTH_SECRET` | generated & persisted to file    |
/// | `token_ttl_secs`   | `TOKEN_TTL_SECS`             | `86400` (24h)                    |
/// | `bcrypt_cost`      | `BCRYPT_COST`                | `10`                             |
/// | `hash_concurrency` | `HASH_CONCURRENCY`           | available parallelism            |
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:5000").
    pub bind_addr: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Session token lifetime in seconds. Must lie in
    /// `1..=taskchat_core::auth::jwt::MAX_TOKEN_TTL_SECS`.
    pub token_ttl_secs: i64,
    /// bcrypt cost factor for new password digests.
    pub bcrypt_cost: u32,
    /// Maximum number of bcrypt operations running at once.
    pub hash_concurrency: usize,
}

/// One bcrypt at a time per core.
pub fn default_hash_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
