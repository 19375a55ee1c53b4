//! Auth gateway trait.
//!
//! The reducers in this crate depend on this interface, not on the HTTP
//! client, so session logic tests run at memory speed. The production
//! implementation is [`casaverde_api::ApiClient`].

use casaverde_api::Result;
use casaverde_api::types::{AuthPayload, RecoveryResponse, RegisterRequest, ResetPasswordRequest, User};
use std::future::Future;

/// Server operations the session reducers need.
pub trait AuthGateway: Send + Sync {
    /// `POST /login`.
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthPayload>> + Send;

    /// `POST /logout`.
    fn logout(&self) -> impl Future<Output = Result<()>> + Send;

    /// `POST /register`.
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<AuthPayload>> + Send;

    /// `GET /me`.
    fn me(&self) -> impl Future<Output = Result<User>> + Send;

    /// `POST /password/send-link`.
    fn send_reset_link(&self, email: &str) -> impl Future<Output = Result<RecoveryResponse>> + Send;

    /// `POST /password/verify-otp`.
    fn verify_otp(
        &self,
        email: &str,
        otp: &str,
    ) -> impl Future<Output = Result<RecoveryResponse>> + Send;

    /// `POST /password/reset-password`.
    fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> impl Future<Output = Result<RecoveryResponse>> + Send;
}

impl<T> AuthGateway for casaverde_api::ApiClient<T>
where
    T: casaverde_api::TokenStore + Clone + Send + Sync,
{
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload> {
        Self::login(self, email, password).await
    }

    async fn logout(&self) -> Result<()> {
        Self::logout(self).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload> {
        Self::register(self, request).await
    }

    async fn me(&self) -> Result<User> {
        Self::me(self).await
    }

    async fn send_reset_link(&self, email: &str) -> Result<RecoveryResponse> {
        Self::send_reset_link(self, email).await
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<RecoveryResponse> {
        Self::verify_otp(self, email, otp).await
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<RecoveryResponse> {
        Self::reset_password(self, request).await
    }
}
