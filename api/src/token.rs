//! Bearer-token storage.
//!
//! Exactly one secret is persisted on the device: the session bearer
//! token, under the single well-known key [`TOKEN_KEY`]. The storage
//! itself is an external collaborator (the platform secure enclave);
//! this module defines the opaque save/retrieve/clear contract and an
//! in-memory implementation for tests and process-local use.

use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Well-known key the bearer token is stored under.
pub const TOKEN_KEY: &str = "auth_token";

/// Secure-storage failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct StorageError(pub String);

/// Opaque bearer-token storage.
///
/// The client reads through this on every request and wipes it on 401;
/// the session layer writes on login/registration and wipes on logout.
/// Nothing else touches it.
pub trait TokenStore: Send + Sync {
    /// Persist the bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store is unavailable.
    fn save(&self, token: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Retrieve the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store is unavailable.
    fn retrieve(&self) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Remove the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store is unavailable.
    fn clear(&self) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// In-memory token store.
///
/// Clones share the same slot, mirroring how the device keychain is a
/// single shared store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl InMemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a token, for restore-flow tests.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token.into()))),
        }
    }
}

impl TokenStore for InMemoryTokenStore {
    async fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn retrieve(&self) -> Result<Option<String>, StorageError> {
        Ok(self.token.read().await.clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.token.write().await = None;
        Ok(())
    }
}
