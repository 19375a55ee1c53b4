//! Mock auth gateway for tests.
//!
//! Stub the endpoints a test needs; anything unstubbed fails with a
//! recognizable network error. Call counters let tests assert exactly how
//! many requests a flow produced.

#![allow(clippy::expect_used)] // test support code

use crate::gateway::AuthGateway;
use casaverde_api::types::{
    AuthPayload, RecoveryResponse, RegisterRequest, ResetPasswordRequest, User,
};
use casaverde_api::{ApiError, Result};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn unstubbed() -> ApiError {
    ApiError::Network("mock gateway: endpoint not stubbed".to_string())
}

#[derive(Default)]
struct Inner {
    login: Mutex<Option<Result<AuthPayload>>>,
    register: Mutex<Option<Result<AuthPayload>>>,
    me: Mutex<Option<Result<User>>>,
    logout: Mutex<Option<Result<()>>>,
    send_reset_link: Mutex<Option<Result<RecoveryResponse>>>,
    verify_otp: Mutex<Option<Result<RecoveryResponse>>>,
    reset_password: Mutex<Option<Result<RecoveryResponse>>>,

    login_calls: AtomicUsize,
    register_calls: AtomicUsize,
    me_calls: AtomicUsize,
    logout_calls: AtomicUsize,
    reset_password_calls: AtomicUsize,
}

/// Programmable [`AuthGateway`] double.
///
/// Clones share stubs and counters.
#[derive(Clone, Default)]
pub struct MockAuthGateway {
    inner: Arc<Inner>,
}

impl MockAuthGateway {
    /// Create a gateway with nothing stubbed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub `login` (and leave `register` to fail).
    #[must_use]
    pub fn with_login_user(self, user: User, token: &str) -> Self {
        *self.inner.login.lock().expect("mock lock") = Some(Ok(AuthPayload {
            user,
            token: token.to_string(),
        }));
        self
    }

    /// Stub `login` with a failure.
    #[must_use]
    pub fn with_login_error(self, error: ApiError) -> Self {
        *self.inner.login.lock().expect("mock lock") = Some(Err(error));
        self
    }

    /// Stub `register` with a success payload.
    #[must_use]
    pub fn with_register_user(self, user: User, token: &str) -> Self {
        *self.inner.register.lock().expect("mock lock") = Some(Ok(AuthPayload {
            user,
            token: token.to_string(),
        }));
        self
    }

    /// Stub `me` with an identity.
    #[must_use]
    pub fn with_me_user(self, user: User) -> Self {
        *self.inner.me.lock().expect("mock lock") = Some(Ok(user));
        self
    }

    /// Stub `me` with a failure.
    #[must_use]
    pub fn with_me_error(self, error: ApiError) -> Self {
        *self.inner.me.lock().expect("mock lock") = Some(Err(error));
        self
    }

    /// Stub `logout` to succeed.
    #[must_use]
    pub fn with_logout_ok(self) -> Self {
        *self.inner.logout.lock().expect("mock lock") = Some(Ok(()));
        self
    }

    /// Stub `send_reset_link` with a server outcome.
    #[must_use]
    pub fn with_send_reset_link(self, response: RecoveryResponse) -> Self {
        *self.inner.send_reset_link.lock().expect("mock lock") = Some(Ok(response));
        self
    }

    /// Stub `verify_otp` with a server outcome.
    #[must_use]
    pub fn with_verify_otp(self, response: RecoveryResponse) -> Self {
        *self.inner.verify_otp.lock().expect("mock lock") = Some(Ok(response));
        self
    }

    /// Stub `reset_password` with a server outcome.
    #[must_use]
    pub fn with_reset_password(self, response: RecoveryResponse) -> Self {
        *self.inner.reset_password.lock().expect("mock lock") = Some(Ok(response));
        self
    }

    /// How many times `login` was called.
    #[must_use]
    pub fn login_calls(&self) -> usize {
        self.inner.login_calls.load(Ordering::SeqCst)
    }

    /// How many times `me` was called.
    #[must_use]
    pub fn me_calls(&self) -> usize {
        self.inner.me_calls.load(Ordering::SeqCst)
    }

    /// How many times `logout` was called.
    #[must_use]
    pub fn logout_calls(&self) -> usize {
        self.inner.logout_calls.load(Ordering::SeqCst)
    }

    /// How many times `reset_password` was called.
    #[must_use]
    pub fn reset_password_calls(&self) -> usize {
        self.inner.reset_password_calls.load(Ordering::SeqCst)
    }

    fn take<T: Clone>(slot: &Mutex<Option<Result<T>>>) -> Result<T> {
        slot.lock()
            .expect("mock lock")
            .clone()
            .unwrap_or_else(|| Err(unstubbed()))
    }
}

impl AuthGateway for MockAuthGateway {
    async fn login(&self, _email: &str, _password: &str) -> Result<AuthPayload> {
        self.inner.login_calls.fetch_add(1, Ordering::SeqCst);
        Self::take(&self.inner.login)
    }

    async fn logout(&self) -> Result<()> {
        self.inner.logout_calls.fetch_add(1, Ordering::SeqCst);
        Self::take(&self.inner.logout)
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<AuthPayload> {
        self.inner.register_calls.fetch_add(1, Ordering::SeqCst);
        Self::take(&self.inner.register)
    }

    async fn me(&self) -> Result<User> {
        self.inner.me_calls.fetch_add(1, Ordering::SeqCst);
        Self::take(&self.inner.me)
    }

    async fn send_reset_link(&self, _email: &str) -> Result<RecoveryResponse> {
        Self::take(&self.inner.send_reset_link)
    }

    async fn verify_otp(&self, _email: &str, _otp: &str) -> Result<RecoveryResponse> {
        Self::take(&self.inner.verify_otp)
    }

    async fn reset_password(&self, _request: &ResetPasswordRequest) -> Result<RecoveryResponse> {
        self.inner.reset_password_calls.fetch_add(1, Ordering::SeqCst);
        Self::take(&self.inner.reset_password)
    }
}
