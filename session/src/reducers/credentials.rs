//! Credentials reducer: login, registration, restore, logout, expiry.
//!
//! # Flow
//!
//! 1. On startup, `Restore` reads the stored token and validates it with
//!    `GET /me`; a dead token is wiped and the user stays logged out.
//! 2. `Login`/`Register` call the server; the client persists the fresh
//!    token, and `LoggedIn` mirrors it into state.
//! 3. `Logout` invalidates server-side first, then clears both stores.
//! 4. `SessionExpired` (a 401 anywhere) hard-clears the in-memory
//!    identity and the persisted credential together.

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::gateway::AuthGateway;
use crate::state::SessionState;
use casaverde_api::TokenStore;
use casaverde_core::effect::{Effect, Effects};
use casaverde_core::reducer::Reducer;
use casaverde_core::smallvec;

/// Reducer for the session credential lifecycle.
#[derive(Debug, Clone)]
pub struct CredentialsReducer<G, T> {
    _phantom: std::marker::PhantomData<(G, T)>,
}

impl<G, T> CredentialsReducer<G, T> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<G, T> Default for CredentialsReducer<G, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G, T> Reducer for CredentialsReducer<G, T>
where
    G: AuthGateway + Clone + 'static,
    T: TokenStore + Clone + 'static,
{
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment<G, T>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            // ═══════════════════════════════════════════════════════════
            // Restore: stored token → GET /me
            // ═══════════════════════════════════════════════════════════
            SessionAction::Restore => {
                state.restoring = true;

                let gateway = env.gateway.clone();
                let tokens = env.tokens.clone();

                smallvec![Effect::future(async move {
                    let stored = match tokens.retrieve().await {
                        Ok(Some(token)) => token,
                        Ok(None) => return Some(SessionAction::RestoreFailed),
                        Err(error) => {
                            tracing::warn!(%error, "Token storage unavailable during restore");
                            return Some(SessionAction::RestoreFailed);
                        },
                    };

                    match gateway.me().await {
                        Ok(user) => Some(SessionAction::Restored {
                            user,
                            token: stored,
                        }),
                        Err(error) => {
                            tracing::info!(%error, "Stored token rejected, clearing it");
                            if let Err(storage) = tokens.clear().await {
                                tracing::warn!(%storage, "Failed to clear stored token");
                            }
                            Some(SessionAction::RestoreFailed)
                        },
                    }
                })]
            },

            SessionAction::Restored { user, token } => {
                tracing::info!(user_id = user.id, "Session restored");
                state.restoring = false;
                state.user = Some(user);
                state.token = Some(token);
                smallvec![]
            },

            SessionAction::RestoreFailed => {
                state.restoring = false;
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════
            // Login / registration
            // ═══════════════════════════════════════════════════════════
            SessionAction::Login { email, password } => {
                if state.in_flight {
                    tracing::debug!("Ignoring login while a call is outstanding");
                    return smallvec![];
                }
                state.in_flight = true;
                state.notice = None;

                let gateway = env.gateway.clone();
                smallvec![Effect::future(async move {
                    match gateway.login(&email, &password).await {
                        Ok(payload) => Some(SessionAction::LoggedIn {
                            user: payload.user,
                            token: payload.token,
                        }),
                        Err(error) => Some(SessionAction::AuthFailed {
                            message: error.message(),
                        }),
                    }
                })]
            },

            SessionAction::Register { request } => {
                if state.in_flight {
                    tracing::debug!("Ignoring registration while a call is outstanding");
                    return smallvec![];
                }
                state.in_flight = true;
                state.notice = None;

                let gateway = env.gateway.clone();
                smallvec![Effect::future(async move {
                    match gateway.register(&request).await {
                        Ok(payload) => Some(SessionAction::LoggedIn {
                            user: payload.user,
                            token: payload.token,
                        }),
                        Err(error) => Some(SessionAction::AuthFailed {
                            message: error.message(),
                        }),
                    }
                })]
            },

            SessionAction::LoggedIn { user, token } => {
                tracing::info!(user_id = user.id, "Logged in");
                state.in_flight = false;
                state.user = Some(user);
                state.token = Some(token);
                state.notice = None;
                smallvec![]
            },

            SessionAction::AuthFailed { message } => {
                state.in_flight = false;
                state.notice = Some(message);
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════
            // Logout / expiry
            // ═══════════════════════════════════════════════════════════
            SessionAction::Logout => {
                if state.in_flight {
                    return smallvec![];
                }
                state.in_flight = true;

                let gateway = env.gateway.clone();
                let tokens = env.tokens.clone();
                smallvec![Effect::future(async move {
                    match gateway.logout().await {
                        Ok(()) => {
                            if let Err(storage) = tokens.clear().await {
                                tracing::warn!(%storage, "Failed to clear stored token");
                            }
                            Some(SessionAction::LoggedOut)
                        },
                        // Keep the session: the server still considers it
                        // live, so silently dropping it would strand the
                        // token.
                        Err(error) => Some(SessionAction::AuthFailed {
                            message: error.message(),
                        }),
                    }
                })]
            },

            SessionAction::LoggedOut => {
                tracing::info!("Logged out");
                state.in_flight = false;
                state.user = None;
                state.token = None;
                smallvec![]
            },

            SessionAction::SessionExpired => {
                tracing::warn!("Session expired, clearing identity and credential");
                state.user = None;
                state.token = None;
                state.in_flight = false;

                // The client wipes the credential on 401 as well; this
                // keeps the pair in sync even when expiry is signalled
                // from elsewhere.
                let tokens = env.tokens.clone();
                smallvec![Effect::future(async move {
                    if let Err(storage) = tokens.clear().await {
                        tracing::warn!(%storage, "Failed to clear stored token");
                    }
                    None
                })]
            },

            SessionAction::DismissNotice => {
                state.notice = None;
                smallvec![]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::MockAuthGateway;
    use casaverde_api::types::{User, VERIFIED_STATUS};
    use casaverde_api::{ApiError, InMemoryTokenStore};
    use casaverde_testing::assertions::assert_no_effects;
    use casaverde_testing::helpers::collect_actions;

    type Env = SessionEnvironment<MockAuthGateway, InMemoryTokenStore>;
    type TestReducer = CredentialsReducer<MockAuthGateway, InMemoryTokenStore>;

    fn resident() -> User {
        User {
            id: 7,
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            address: "Blk 4 Lot 9".to_string(),
            email: "maria@example.com".to_string(),
            status: VERIFIED_STATUS,
        }
    }

    fn env(gateway: MockAuthGateway, tokens: InMemoryTokenStore) -> Env {
        SessionEnvironment::new(gateway, tokens)
    }

    #[tokio::test]
    async fn login_round_trip_sets_identity() {
        let gateway = MockAuthGateway::new().with_login_user(resident(), "tok-1");
        let env = env(gateway.clone(), InMemoryTokenStore::new());
        let mut state = SessionState::default();

        let effects = TestReducer::new().reduce(
            &mut state,
            SessionAction::Login {
                email: "maria@example.com".to_string(),
                password: "secret123".to_string(),
            },
            &env,
        );
        assert!(state.in_flight);

        let feedback = collect_actions(effects).await;
        assert_eq!(feedback.len(), 1);
        for action in feedback {
            let _ = TestReducer::new().reduce(&mut state, action, &env);
        }

        assert!(!state.in_flight);
        assert!(state.is_authenticated());
        assert!(state.discount_eligible());
        assert_eq!(state.token.as_deref(), Some("tok-1"));
        assert_eq!(gateway.login_calls(), 1);
    }

    #[tokio::test]
    async fn second_login_while_in_flight_is_ignored() {
        let gateway = MockAuthGateway::new().with_login_user(resident(), "tok-1");
        let env = env(gateway.clone(), InMemoryTokenStore::new());
        let mut state = SessionState::default();

        let login = || SessionAction::Login {
            email: "maria@example.com".to_string(),
            password: "secret123".to_string(),
        };

        let first = TestReducer::new().reduce(&mut state, login(), &env);
        let second = TestReducer::new().reduce(&mut state, login(), &env);

        assert_no_effects(&second);
        let _ = collect_actions(first).await;
        assert_eq!(gateway.login_calls(), 1);
    }

    #[tokio::test]
    async fn login_failure_surfaces_message_and_clears_flag() {
        let gateway = MockAuthGateway::new().with_login_error(ApiError::Validation {
            message: "Invalid credentials".to_string(),
        });
        let env = env(gateway, InMemoryTokenStore::new());
        let mut state = SessionState::default();

        let effects = TestReducer::new().reduce(
            &mut state,
            SessionAction::Login {
                email: "maria@example.com".to_string(),
                password: "wrong".to_string(),
            },
            &env,
        );

        for action in collect_actions(effects).await {
            let _ = TestReducer::new().reduce(&mut state, action, &env);
        }

        assert!(!state.in_flight);
        assert!(!state.is_authenticated());
        assert_eq!(state.notice.as_deref(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn restore_with_valid_token_recovers_the_session() {
        let gateway = MockAuthGateway::new().with_me_user(resident());
        let tokens = InMemoryTokenStore::with_token("stored-tok");
        let env = env(gateway, tokens);
        let mut state = SessionState::default();

        let effects = TestReducer::new().reduce(&mut state, SessionAction::Restore, &env);
        assert!(state.restoring);

        for action in collect_actions(effects).await {
            let _ = TestReducer::new().reduce(&mut state, action, &env);
        }

        assert!(!state.restoring);
        assert!(state.is_authenticated());
        assert_eq!(state.token.as_deref(), Some("stored-tok"));
    }

    #[tokio::test]
    async fn restore_without_stored_token_skips_the_network() {
        let gateway = MockAuthGateway::new();
        let env = env(gateway.clone(), InMemoryTokenStore::new());
        let mut state = SessionState::default();

        let effects = TestReducer::new().reduce(&mut state, SessionAction::Restore, &env);
        let feedback = collect_actions(effects).await;

        assert_eq!(feedback, vec![SessionAction::RestoreFailed]);
        assert_eq!(gateway.me_calls(), 0);
    }

    #[tokio::test]
    async fn restore_with_dead_token_wipes_it() {
        let gateway = MockAuthGateway::new().with_me_error(ApiError::Unauthorized {
            message: "Unauthenticated.".to_string(),
        });
        let tokens = InMemoryTokenStore::with_token("dead-tok");
        let env = env(gateway, tokens.clone());
        let mut state = SessionState::default();

        let effects = TestReducer::new().reduce(&mut state, SessionAction::Restore, &env);
        for action in collect_actions(effects).await {
            let _ = TestReducer::new().reduce(&mut state, action, &env);
        }

        assert!(!state.is_authenticated());
        assert_eq!(tokens.retrieve().await.unwrap(), None);
    }

    #[tokio::test]
    async fn session_expiry_clears_identity_and_credential_together() {
        let tokens = InMemoryTokenStore::with_token("tok-1");
        let env = env(MockAuthGateway::new(), tokens.clone());
        let mut state = SessionState {
            user: Some(resident()),
            token: Some("tok-1".to_string()),
            ..SessionState::default()
        };

        let effects = TestReducer::new().reduce(&mut state, SessionAction::SessionExpired, &env);

        assert!(!state.is_authenticated());
        assert_eq!(state.token, None);

        let _ = collect_actions(effects).await;
        assert_eq!(tokens.retrieve().await.unwrap(), None);
    }

    #[tokio::test]
    async fn logout_clears_state_only_after_the_server_confirms() {
        let gateway = MockAuthGateway::new().with_logout_ok();
        let tokens = InMemoryTokenStore::with_token("tok-1");
        let env = env(gateway, tokens.clone());
        let mut state = SessionState {
            user: Some(resident()),
            token: Some("tok-1".to_string()),
            ..SessionState::default()
        };

        let effects = TestReducer::new().reduce(&mut state, SessionAction::Logout, &env);
        assert!(state.is_authenticated());

        for action in collect_actions(effects).await {
            let _ = TestReducer::new().reduce(&mut state, action, &env);
        }

        assert!(!state.is_authenticated());
        assert_eq!(tokens.retrieve().await.unwrap(), None);
    }
}
