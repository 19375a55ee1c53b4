//! Session environment.
//!
//! Dependencies injected into the session reducers.

use crate::gateway::AuthGateway;
use casaverde_api::TokenStore;

/// Dependencies for the session reducers.
///
/// # Type Parameters
///
/// - `G`: auth gateway (the HTTP client in production)
/// - `T`: secure bearer-token storage
#[derive(Clone)]
pub struct SessionEnvironment<G, T>
where
    G: AuthGateway + Clone,
    T: TokenStore + Clone,
{
    /// Server operations.
    pub gateway: G,

    /// Secure credential storage.
    pub tokens: T,
}

impl<G, T> SessionEnvironment<G, T>
where
    G: AuthGateway + Clone,
    T: TokenStore + Clone,
{
    /// Create a new session environment.
    pub const fn new(gateway: G, tokens: T) -> Self {
        Self { gateway, tokens }
    }
}
