//! Session and recovery actions.

use casaverde_api::types::{RegisterRequest, User};

/// All inputs to the credentials reducer: user intents and the feedback
/// actions produced by its effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// App startup: try to restore a session from the stored token.
    Restore,

    /// Restore succeeded; the stored token is still valid.
    Restored {
        /// Identity confirmed by `GET /me`.
        user: User,
        /// The stored token that proved valid.
        token: String,
    },

    /// Restore failed or there was no stored token; stay logged out.
    RestoreFailed,

    /// Log in with credentials.
    Login {
        /// Account email.
        email: String,
        /// Account password.
        password: String,
    },

    /// Create an account and log in.
    Register {
        /// Registration form fields.
        request: RegisterRequest,
    },

    /// Login or registration succeeded.
    LoggedIn {
        /// The authenticated identity.
        user: User,
        /// Fresh bearer token (already persisted by the client).
        token: String,
    },

    /// Login, registration, or logout failed.
    AuthFailed {
        /// Normalized message for display.
        message: String,
    },

    /// Log out (server-side invalidation then local clear).
    Logout,

    /// Logout completed; local state is cleared.
    LoggedOut,

    /// A protected call came back 401: hard-clear the session.
    SessionExpired,

    /// Dismiss the current failure notice.
    DismissNotice,
}

/// All inputs to the password-recovery reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Request a reset link/OTP for an email.
    SendLink {
        /// Account email.
        email: String,
    },

    /// The server accepted the send-link request.
    LinkSent {
        /// Email the code went to.
        email: String,
        /// Server outcome message.
        message: String,
    },

    /// The send-link request failed.
    SendFailed {
        /// Normalized message for display.
        message: String,
    },

    /// Submit the one-time code.
    SubmitOtp {
        /// The code the user received.
        otp: String,
    },

    /// The OTP was accepted; it doubles as the reset token.
    OtpAccepted {
        /// Email the reset is for.
        email: String,
        /// Token to present to the reset endpoint.
        reset_token: String,
    },

    /// The OTP was rejected.
    OtpRejected {
        /// Normalized message for display.
        message: String,
    },

    /// Submit the new password.
    SubmitNewPassword {
        /// New password.
        password: String,
        /// Confirmation; must match.
        confirmation: String,
    },

    /// The password was reset.
    ResetSucceeded {
        /// Server outcome message.
        message: String,
    },

    /// The reset failed.
    ResetFailed {
        /// Normalized message for display.
        message: String,
    },

    /// Abandon the flow and start from the email step.
    StartOver,
}
