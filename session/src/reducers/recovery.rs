//! Password-recovery reducer: send link → verify OTP → reset password.
//!
//! The server may have this flow disabled; every step surfaces the
//! server's own `{status, message}` outcome, so a disabled flow reads as
//! an ordinary failure message. The verified OTP doubles as the reset
//! token for the final step.

use crate::actions::RecoveryAction;
use crate::environment::SessionEnvironment;
use crate::gateway::AuthGateway;
use crate::state::{RecoveryStage, RecoveryState};
use casaverde_api::TokenStore;
use casaverde_api::types::{RecoveryStatus, ResetPasswordRequest};
use casaverde_core::effect::{Effect, Effects};
use casaverde_core::reducer::Reducer;
use casaverde_core::smallvec;

/// Minimum accepted password length, matching the server rule.
const MIN_PASSWORD_LEN: usize = 8;

/// Reducer for the password-recovery flow.
#[derive(Debug, Clone)]
pub struct RecoveryReducer<G, T> {
    _phantom: std::marker::PhantomData<(G, T)>,
}

impl<G, T> RecoveryReducer<G, T> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<G, T> Default for RecoveryReducer<G, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G, T> Reducer for RecoveryReducer<G, T>
where
    G: AuthGateway + Clone + 'static,
    T: TokenStore + Clone + 'static,
{
    type State = RecoveryState;
    type Action = RecoveryAction;
    type Environment = SessionEnvironment<G, T>;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            RecoveryAction::SendLink { email } => {
                if state.in_flight {
                    return smallvec![];
                }
                if email.trim().is_empty() {
                    state.notice = Some("Please enter your email".to_string());
                    return smallvec![];
                }
                state.in_flight = true;
                state.notice = None;

                let gateway = env.gateway.clone();
                smallvec![Effect::future(async move {
                    match gateway.send_reset_link(&email).await {
                        Ok(response) if response.status == RecoveryStatus::Success => {
                            Some(RecoveryAction::LinkSent {
                                email,
                                message: response.message,
                            })
                        },
                        Ok(response) => Some(RecoveryAction::SendFailed {
                            message: response.message,
                        }),
                        Err(error) => Some(RecoveryAction::SendFailed {
                            message: error.message(),
                        }),
                    }
                })]
            },

            RecoveryAction::LinkSent { email, message } => {
                state.in_flight = false;
                state.notice = Some(message);
                state.stage = RecoveryStage::AwaitingOtp { email };
                smallvec![]
            },

            RecoveryAction::SendFailed { message } | RecoveryAction::OtpRejected { message } => {
                state.in_flight = false;
                state.notice = Some(message);
                smallvec![]
            },

            RecoveryAction::SubmitOtp { otp } => {
                let RecoveryStage::AwaitingOtp { email } = &state.stage else {
                    tracing::warn!("OTP submitted outside the OTP stage");
                    return smallvec![];
                };
                if state.in_flight {
                    return smallvec![];
                }
                if otp.trim().is_empty() {
                    state.notice = Some("Please enter the code we sent you".to_string());
                    return smallvec![];
                }
                state.in_flight = true;
                state.notice = None;

                let gateway = env.gateway.clone();
                let email = email.clone();
                smallvec![Effect::future(async move {
                    match gateway.verify_otp(&email, &otp).await {
                        Ok(response) if response.status == RecoveryStatus::Success => {
                            // The verified OTP is the reset token.
                            Some(RecoveryAction::OtpAccepted {
                                email,
                                reset_token: otp,
                            })
                        },
                        Ok(response) => Some(RecoveryAction::OtpRejected {
                            message: response.message,
                        }),
                        Err(error) => Some(RecoveryAction::OtpRejected {
                            message: error.message(),
                        }),
                    }
                })]
            },

            RecoveryAction::OtpAccepted { email, reset_token } => {
                state.in_flight = false;
                state.notice = None;
                state.stage = RecoveryStage::NewPassword { email, reset_token };
                smallvec![]
            },

            RecoveryAction::SubmitNewPassword {
                password,
                confirmation,
            } => {
                let RecoveryStage::NewPassword { email, reset_token } = &state.stage else {
                    tracing::warn!("Password submitted outside the reset stage");
                    return smallvec![];
                };
                if state.in_flight {
                    return smallvec![];
                }

                if password.is_empty() || confirmation.is_empty() {
                    state.notice = Some("Please fill in all fields".to_string());
                    return smallvec![];
                }
                if password.len() < MIN_PASSWORD_LEN {
                    state.notice =
                        Some("Password must be at least 8 characters long".to_string());
                    return smallvec![];
                }
                if password != confirmation {
                    state.notice = Some("Passwords do not match".to_string());
                    return smallvec![];
                }

                state.in_flight = true;
                state.notice = None;

                let gateway = env.gateway.clone();
                let request = ResetPasswordRequest {
                    token: reset_token.clone(),
                    email: email.clone(),
                    password,
                    password_confirmation: confirmation,
                };
                smallvec![Effect::future(async move {
                    match gateway.reset_password(&request).await {
                        Ok(response) if response.status == RecoveryStatus::Success => {
                            Some(RecoveryAction::ResetSucceeded {
                                message: response.message,
                            })
                        },
                        Ok(response) => Some(RecoveryAction::ResetFailed {
                            message: response.message,
                        }),
                        Err(error) => Some(RecoveryAction::ResetFailed {
                            message: error.message(),
                        }),
                    }
                })]
            },

            RecoveryAction::ResetSucceeded { message } => {
                state.in_flight = false;
                state.notice = Some(message);
                state.stage = RecoveryStage::Completed;
                smallvec![]
            },

            RecoveryAction::ResetFailed { message } => {
                state.in_flight = false;
                state.notice = Some(message);
                smallvec![]
            },

            RecoveryAction::StartOver => {
                *state = RecoveryState::default();
                smallvec![]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::mocks::MockAuthGateway;
    use casaverde_api::InMemoryTokenStore;
    use casaverde_api::types::{RecoveryResponse, RecoveryStatus};
    use casaverde_testing::assertions::assert_no_effects;
    use casaverde_testing::helpers::collect_actions;

    type Env = SessionEnvironment<MockAuthGateway, InMemoryTokenStore>;
    type TestReducer = RecoveryReducer<MockAuthGateway, InMemoryTokenStore>;

    fn env(gateway: MockAuthGateway) -> Env {
        SessionEnvironment::new(gateway, InMemoryTokenStore::new())
    }

    fn success(message: &str) -> RecoveryResponse {
        RecoveryResponse {
            status: RecoveryStatus::Success,
            message: message.to_string(),
        }
    }

    async fn drive(state: &mut RecoveryState, action: RecoveryAction, env: &Env) {
        let effects = TestReducer::new().reduce(state, action, env);
        for feedback in collect_actions(effects).await {
            let _ = TestReducer::new().reduce(state, feedback, env);
        }
    }

    #[tokio::test]
    async fn happy_path_walks_all_stages() {
        let gateway = MockAuthGateway::new()
            .with_send_reset_link(success("OTP sent"))
            .with_verify_otp(success("Verified"))
            .with_reset_password(success("Password reset"));
        let env = env(gateway);
        let mut state = RecoveryState::default();

        drive(
            &mut state,
            RecoveryAction::SendLink {
                email: "maria@example.com".to_string(),
            },
            &env,
        )
        .await;
        assert!(matches!(state.stage, RecoveryStage::AwaitingOtp { .. }));

        drive(
            &mut state,
            RecoveryAction::SubmitOtp {
                otp: "123456".to_string(),
            },
            &env,
        )
        .await;
        let RecoveryStage::NewPassword { ref reset_token, .. } = state.stage else {
            panic!("expected the reset stage");
        };
        assert_eq!(reset_token, "123456");

        drive(
            &mut state,
            RecoveryAction::SubmitNewPassword {
                password: "longenough".to_string(),
                confirmation: "longenough".to_string(),
            },
            &env,
        )
        .await;
        assert_eq!(state.stage, RecoveryStage::Completed);
        assert_eq!(state.notice.as_deref(), Some("Password reset"));
    }

    #[tokio::test]
    async fn short_or_mismatched_passwords_never_reach_the_server() {
        let gateway = MockAuthGateway::new();
        let env = env(gateway.clone());
        let mut state = RecoveryState {
            stage: RecoveryStage::NewPassword {
                email: "maria@example.com".to_string(),
                reset_token: "123456".to_string(),
            },
            ..RecoveryState::default()
        };

        let short = TestReducer::new().reduce(
            &mut state,
            RecoveryAction::SubmitNewPassword {
                password: "short".to_string(),
                confirmation: "short".to_string(),
            },
            &env,
        );
        assert_no_effects(&short);
        assert_eq!(
            state.notice.as_deref(),
            Some("Password must be at least 8 characters long")
        );

        let mismatch = TestReducer::new().reduce(
            &mut state,
            RecoveryAction::SubmitNewPassword {
                password: "longenough".to_string(),
                confirmation: "different!".to_string(),
            },
            &env,
        );
        assert_no_effects(&mismatch);
        assert_eq!(state.notice.as_deref(), Some("Passwords do not match"));
        assert_eq!(gateway.reset_password_calls(), 0);
    }

    #[tokio::test]
    async fn server_error_status_blocks_the_stage() {
        let gateway = MockAuthGateway::new().with_send_reset_link(RecoveryResponse {
            status: RecoveryStatus::Error,
            message: "Password recovery is disabled".to_string(),
        });
        let env = env(gateway);
        let mut state = RecoveryState::default();

        drive(
            &mut state,
            RecoveryAction::SendLink {
                email: "maria@example.com".to_string(),
            },
            &env,
        )
        .await;

        assert_eq!(state.stage, RecoveryStage::EnterEmail);
        assert_eq!(
            state.notice.as_deref(),
            Some("Password recovery is disabled")
        );
    }

    #[test]
    fn otp_outside_its_stage_is_ignored() {
        let env = env(MockAuthGateway::new());
        let mut state = RecoveryState::default();

        let effects = TestReducer::new().reduce(
            &mut state,
            RecoveryAction::SubmitOtp {
                otp: "123456".to_string(),
            },
            &env,
        );

        assert_no_effects(&effects);
        assert_eq!(state.stage, RecoveryStage::EnterEmail);
    }
}
