//! Session state types.

use casaverde_api::types::User;
use serde::{Deserialize, Serialize};

/// Root session state.
///
/// One instance lives for the whole app run. `user` and `token` are set
/// together by login/registration/restore and cleared together by logout
/// and expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Authenticated identity, if logged in.
    pub user: Option<User>,

    /// Bearer token mirrored from secure storage while logged in.
    pub token: Option<String>,

    /// True while the startup restore (`GET /me`) is running.
    pub restoring: bool,

    /// True while a login/registration/logout call is outstanding.
    pub in_flight: bool,

    /// Last auth failure message, until dismissed.
    pub notice: Option<String>,
}

impl SessionState {
    /// Whether a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Whether the account qualifies for discounted facility fees.
    ///
    /// Evaluates the verified-status code; absent user means not
    /// eligible.
    #[must_use]
    pub fn discount_eligible(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_verified)
    }

    /// The logged-in user's id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<u64> {
        self.user.as_ref().map(|user| user.id)
    }
}

/// Password-recovery flow state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryState {
    /// Where in the flow the user is.
    pub stage: RecoveryStage,

    /// True while a recovery call is outstanding.
    pub in_flight: bool,

    /// Last message to show (validation failure or server outcome).
    pub notice: Option<String>,
}

/// Stages of the password-recovery flow, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RecoveryStage {
    /// Asking for the account email.
    #[default]
    EnterEmail,

    /// Link/OTP sent; waiting for the one-time code.
    AwaitingOtp {
        /// Email the code was sent to.
        email: String,
    },

    /// OTP accepted; collecting the new password.
    NewPassword {
        /// Email the reset is for.
        email: String,
        /// Reset token proven by the OTP step.
        reset_token: String,
    },

    /// Password reset; the user can log in again.
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use casaverde_api::types::{User, VERIFIED_STATUS};

    fn resident(status: i64) -> User {
        User {
            id: 1,
            first_name: "Jose".to_string(),
            last_name: "Rizal".to_string(),
            address: "Blk 1 Lot 1".to_string(),
            email: "jose@example.com".to_string(),
            status,
        }
    }

    #[test]
    fn discount_eligibility_follows_verified_status() {
        let mut state = SessionState::default();
        assert!(!state.discount_eligible());

        state.user = Some(resident(VERIFIED_STATUS));
        assert!(state.discount_eligible());

        state.user = Some(resident(0));
        assert!(!state.discount_eligible());
    }
}
