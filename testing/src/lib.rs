//! # Casa Verde Testing
//!
//! Testing utilities for the reservation client.
//!
//! This crate provides:
//! - Mock implementations of core environment traits (`FixedClock`)
//! - A fluent Given-When-Then harness for reducers ([`ReducerTest`])
//! - Helpers for driving effects without a full store
//!
//! ## Example
//!
//! ```ignore
//! use casaverde_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(BookingReducer::new())
//!     .with_env(test_environment())
//!     .given_state(BookingState::default())
//!     .when_action(BookingAction::ChooseFacility { facility: Facility::TennisCourt })
//!     .then_state(|state| assert_eq!(state.step, WizardStep::FacilityChosen))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use casaverde_core::environment::Clock;


pub use reducer_test::ReducerTest;

/// Install a fmt tracing subscriber for a test binary.
///
/// Safe to call from every test in the binary; only the first call
/// installs, the rest are no-ops. `RUST_LOG` controls the filter.
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests.
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use casaverde_testing::mocks::FixedClock;
    /// use casaverde_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-06-01 08:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which should
    /// never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-06-01T08:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Helpers for driving effects outside a store.
pub mod helpers {
    use casaverde_core::effect::Effect;
    use futures::future::BoxFuture;

    /// Run a batch of effects to completion and collect every action they
    /// produce, in completion order.
    ///
    /// `Parallel` branches are driven sequentially here; tests that care
    /// about real interleaving should use a full store instead.
    pub async fn collect_actions<A: Send + 'static>(
        effects: impl IntoIterator<Item = Effect<A>>,
    ) -> Vec<A> {
        let mut actions = Vec::new();
        for effect in effects {
            drive(effect, &mut actions).await;
        }
        actions
    }

    fn drive<A: Send + 'static>(
        effect: Effect<A>,
        actions: &mut Vec<A>,
    ) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            match effect {
                Effect::None => {},
                Effect::Future(fut) => {
                    if let Some(action) = fut.await {
                        actions.push(action);
                    }
                },
                Effect::Delay { duration, action } => {
                    tokio::time::sleep(duration).await;
                    actions.push(*action);
                },
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    for effect in effects {
                        drive(effect, actions).await;
                    }
                },
            }
        })
    }
}

/// Assertion helpers for effects.
pub mod assertions {
    use casaverde_core::effect::Effect;

    /// Assert that there are no effects.
    ///
    /// # Panics
    ///
    /// Panics if effects is not empty.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.is_empty() || matches!(effects, [Effect::None]),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects.
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one `Future` effect.
    ///
    /// # Panics
    ///
    /// Panics if no `Future` effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use casaverde_core::effect::Effect;

    #[test]
    fn fixed_clock_is_fixed() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[tokio::test]
    async fn collect_actions_drains_futures() {
        let effects = vec![
            Effect::<u32>::None,
            Effect::future(async { Some(1) }),
            Effect::chain(vec![
                Effect::future(async { Some(2) }),
                Effect::future(async { None }),
            ]),
        ];

        let actions = helpers::collect_actions(effects).await;
        assert_eq!(actions, vec![1, 2]);
    }
}
