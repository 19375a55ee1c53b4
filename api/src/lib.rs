//! # Casa Verde API
//!
//! HTTP client for the homeowners'-association reservation API.
//!
//! The client mirrors the server's Laravel conventions:
//!
//! - JSON bodies, `Accept: application/json`
//! - `Authorization: Bearer <token>` attached centrally from the
//!   [`token::TokenStore`], never by individual call sites
//! - a fixed request timeout; no retries
//! - one normalized error shape ([`error::ApiError`]) whose `Display` is
//!   the message screens show: 422 responses flatten field errors, 401
//!   responses additionally wipe the stored credential
//!
//! Feature crates do not use [`client::ApiClient`] directly; they depend
//! on their own gateway traits and the client implements those, so
//! reducers stay testable at memory speed.

pub mod client;
pub mod error;
pub mod token;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, Result};
pub use token::{InMemoryTokenStore, TokenStore};
pub use types::User;
