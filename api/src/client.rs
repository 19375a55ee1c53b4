//! The association API client.

use crate::error::{ApiError, Result};
use crate::token::TokenStore;
use crate::types::{
    AmenityOption, AuthPayload, MePayload, NewReservation, RecoveryResponse, RegisterRequest,
    ReservationRecord, ResetPasswordRequest, SlotRecord, User,
};
use chrono::NaiveDate;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Fixed request timeout; calls fail with [`ApiError::Timeout`] when the
/// server does not answer within it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the association API.
///
/// The bearer token is read from the [`TokenStore`] on every request and
/// wiped the moment any call comes back 401, so an expired session can
/// never keep authenticating later calls.
#[derive(Clone)]
pub struct ApiClient<T> {
    http: Client,
    base_url: String,
    tokens: T,
}

impl<T: TokenStore + Clone> ApiClient<T> {
    /// Create a client with the default 15-second timeout.
    ///
    /// `base_url` includes the `/api` prefix, e.g.
    /// `https://reserve.casaverde.ph/api`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>, tokens: T) -> Result<Self> {
        Self::with_timeout(base_url, tokens, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        tokens: T,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ApiError::Network(error.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// The token store this client reads and wipes.
    pub const fn token_store(&self) -> &T {
        &self.tokens
    }

    // ═══════════════════════════════════════════════════════════════════
    // Auth
    // ═══════════════════════════════════════════════════════════════════

    /// `POST /login`. The returned token is saved to the store before the
    /// payload is handed back.
    ///
    /// # Errors
    ///
    /// Invalid credentials surface as [`ApiError::Validation`] with the
    /// server's message.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload> {
        #[derive(Serialize)]
        struct LoginRequest<'a> {
            email: &'a str,
            password: &'a str,
        }

        let payload: AuthPayload = self
            .post_json("/login", &LoginRequest { email, password })
            .await?;
        self.save_token(&payload.token).await?;
        tracing::debug!(user_id = payload.user.id, "Logged in");
        Ok(payload)
    }

    /// `POST /logout`. Invalidates the session server-side; callers clear
    /// local state separately.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any non-success response.
    pub async fn logout(&self) -> Result<()> {
        let builder = self.request(Method::POST, "/logout").await?;
        self.execute(builder).await?;
        Ok(())
    }

    /// `POST /register`. The returned token is saved like a login.
    ///
    /// # Errors
    ///
    /// Field problems surface as [`ApiError::Validation`] with the
    /// flattened messages.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload> {
        let payload: AuthPayload = self.post_json("/register", request).await?;
        self.save_token(&payload.token).await?;
        tracing::debug!(user_id = payload.user.id, "Registered");
        Ok(payload)
    }

    /// `GET /me`: validate the stored token and refresh the identity.
    ///
    /// # Errors
    ///
    /// An invalid or expired token surfaces as [`ApiError::Unauthorized`]
    /// after the stored credential has been wiped.
    pub async fn me(&self) -> Result<User> {
        let payload: MePayload = self.get_json("/me").await?;
        Ok(payload.user)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Reservations
    // ═══════════════════════════════════════════════════════════════════

    /// `GET /availability/{facility}/{date}`.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any non-success response.
    pub async fn availability(&self, facility_id: u32, date: NaiveDate) -> Result<Vec<SlotRecord>> {
        self.get_json(&format!("/availability/{facility_id}/{date}"))
            .await
    }

    /// `GET /amenities`: the priced add-on catalog for event bookings.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any non-success response.
    pub async fn amenities(&self) -> Result<Vec<AmenityOption>> {
        self.get_json("/amenities").await
    }

    /// `GET /reservations`: the caller's confirmed reservations.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any non-success response.
    pub async fn reservations(&self) -> Result<Vec<ReservationRecord>> {
        self.get_json("/reservations").await
    }

    /// `POST /reservations/store`: submit a completed draft.
    ///
    /// # Errors
    ///
    /// Server-side validation surfaces as [`ApiError::Validation`];
    /// an expired session as [`ApiError::Unauthorized`].
    pub async fn store_reservation(&self, request: &NewReservation) -> Result<ReservationRecord> {
        self.post_json("/reservations/store", request).await
    }

    // ═══════════════════════════════════════════════════════════════════
    // Password recovery (may be server-disabled)
    // ═══════════════════════════════════════════════════════════════════

    /// `POST /password/send-link`.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any non-success response.
    pub async fn send_reset_link(&self, email: &str) -> Result<RecoveryResponse> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
        }
        self.post_json("/password/send-link", &Body { email }).await
    }

    /// `POST /password/verify-otp`.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any non-success response.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<RecoveryResponse> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            otp: &'a str,
        }
        self.post_json("/password/verify-otp", &Body { email, otp })
            .await
    }

    /// `POST /password/reset-password`.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any non-success response.
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<RecoveryResponse> {
        self.post_json("/password/reset-password", request).await
    }

    // ═══════════════════════════════════════════════════════════════════
    // Plumbing
    // ═══════════════════════════════════════════════════════════════════

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let mut builder = self
            .http
            .request(method, format!("{}{path}", self.base_url))
            .header(ACCEPT, "application/json");

        let token = self
            .tokens
            .retrieve()
            .await
            .map_err(|error| ApiError::Storage(error.to_string()))?;
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        Ok(builder)
    }

    /// Send a request and normalize any failure. A 401 wipes the stored
    /// credential before the error is returned, so the persisted token and
    /// the in-memory identity can never disagree for longer than one
    /// reducer turn.
    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_response(status, &body);

        if error.is_session_expired() {
            tracing::warn!("Session expired, clearing stored credential");
            if let Err(storage) = self.tokens.clear().await {
                tracing::warn!(%storage, "Failed to clear stored credential");
            }
        }

        Err(error)
    }

    async fn get_json<D: DeserializeOwned>(&self, path: &str) -> Result<D> {
        let builder = self.request(Method::GET, path).await?;
        let response = self.execute(builder).await?;
        response
            .json()
            .await
            .map_err(|error| ApiError::Decode(error.to_string()))
    }

    async fn post_json<B, D>(&self, path: &str, body: &B) -> Result<D>
    where
        B: Serialize + ?Sized,
        D: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path).await?.json(body);
        let response = self.execute(builder).await?;
        response
            .json()
            .await
            .map_err(|error| ApiError::Decode(error.to_string()))
    }

    async fn save_token(&self, token: &str) -> Result<()> {
        self.tokens
            .save(token)
            .await
            .map_err(|error| ApiError::Storage(error.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::token::InMemoryTokenStore;

    #[test]
    fn trailing_slash_in_base_url_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/api/", InMemoryTokenStore::new());
        assert_eq!(client.unwrap().base_url, "http://localhost:8000/api");
    }
}
