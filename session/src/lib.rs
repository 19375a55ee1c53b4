//! # Casa Verde Session
//!
//! Session lifecycle for the reservation client.
//!
//! The authenticated identity and bearer credential are process-wide
//! state: every API call reads the credential (via the client's token
//! store) and only login, registration, logout, and expiry handling may
//! mutate it. This crate owns that lifecycle as two reducers:
//!
//! - [`reducers::CredentialsReducer`]: login, registration, restore from
//!   a stored token (`GET /me`), logout, and the hard session clear on
//!   expiry. Expiry clears the persisted credential and the in-memory
//!   identity together, never just one.
//! - [`reducers::RecoveryReducer`]: the password-recovery sub-flow
//!   (send link → verify OTP → reset password), which the server may
//!   have disabled.
//!
//! ## Flow
//!
//! ```text
//! Action → Reducer → (State, Effects) → Effect Execution → More Actions
//! ```

pub mod actions;
pub mod environment;
pub mod gateway;
pub mod reducers;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use actions::{RecoveryAction, SessionAction};
pub use environment::SessionEnvironment;
pub use gateway::AuthGateway;
pub use reducers::{CredentialsReducer, RecoveryReducer};
pub use state::{RecoveryStage, RecoveryState, SessionState};
