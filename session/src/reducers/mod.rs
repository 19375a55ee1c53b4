//! Session reducers.

pub mod credentials;
pub mod recovery;

pub use credentials::CredentialsReducer;
pub use recovery::RecoveryReducer;
