//! Password hashing via bcrypt.
//!
//! The synchronous pair [`hash_password`] / [`verify_password`] does the work;
//! [`CredentialHasher`] runs it on tokio's blocking pool under a semaphore so
//! a burst of logins cannot tie up the request-handling workers.

use std::sync::Arc;

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tokio::sync::Semaphore;

use super::AuthError;

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// bcrypt only reads this many bytes of input.
const BCRYPT_MAX_INPUT: usize = 72;

/// Hash a password with bcrypt at the given cost. A random salt is generated
/// per call and embedded in the returned digest.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    check_input(password)?;
    bcrypt::hash(password, cost).map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt digest.
///
/// A mismatch is `Ok(false)`; only an unparseable digest is an error. Input
/// [`hash_password`] would refuse can never match, so it is a mismatch too
/// rather than being truncated into one.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, AuthError> {
    if check_input(password).is_err() {
        return Ok(false);
    }
    bcrypt::verify(password, digest).map_err(|e| AuthError::Encoding(format!("bcrypt verify: {e}")))
}

/// Reject input bcrypt would silently truncate or cut at a NUL.
fn check_input(password: &str) -> Result<(), AuthError> {
    if password.len() > BCRYPT_MAX_INPUT {
        return Err(AuthError::Encoding(format!(
            "Password must be at most {BCRYPT_MAX_INPUT} bytes"
        )));
    }
    if password.as_bytes().contains(&0) {
        return Err(AuthError::Encoding(
            "Password must not contain NUL bytes".into(),
        ));
    }
    Ok(())
}

/// Async facade over bcrypt with bounded concurrency.
#[derive(Debug)]
pub struct CredentialHasher {
    cost: u32,
    permits: Arc<Semaphore>,
    /// Digest of a random throwaway password, verified against when a login
    /// names an unknown email so both failure paths cost the same.
    decoy: String,
}

impl CredentialHasher {
    /// Build a hasher. Computes the decoy digest eagerly.
    pub fn new(cost: u32, max_concurrent: usize) -> Result<Self, AuthError> {
        let throwaway: String = rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let decoy = hash_password(&throwaway, cost)?;
        Ok(Self {
            cost,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            decoy,
        })
    }

    /// bcrypt cost this hasher was built with.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `password` off the async workers.
    pub async fn hash(&self, password: String) -> Result<String, AuthError> {
        let cost = self.cost;
        self.run(move || hash_password(&password, cost)).await
    }

    /// Verify `password` against `digest` off the async workers.
    pub async fn verify(&self, password: String, digest: String) -> Result<bool, AuthError> {
        self.run(move || verify_password(&password, &digest)).await
    }

    /// Burn one verification against the decoy digest. Always yields `false`
    /// unless the caller guesses a random 32-char string.
    pub async fn verify_decoy(&self, password: String) -> Result<bool, AuthError> {
        self.verify(password, self.decoy.clone()).await
    }

    async fn run<T, F>(&self, work: F) -> Result<T, AuthError>
    where
        F: FnOnce() -> Result<T, AuthError> + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| AuthError::Internal(format!("hash pool closed: {e}")))?;
        tokio::task::spawn_blocking(work)
            .await
            .map_err(|e| AuthError::Internal(format!("hash task: {e}")))?
    }
}
