//! # Casa Verde Core
//!
//! Core traits and types for the Casa Verde reservation client.
//!
//! Every feature of the client (session, reservation wizard) is built from
//! the same three pieces:
//!
//! - **State**: owned, `Clone`-able domain state for a feature
//! - **Action**: all possible inputs to a reducer (user intents and the
//!   feedback actions produced by effects)
//! - **Reducer**: pure function `(State, Action, Environment) → Effects`
//!
//! Reducers never perform I/O. They mutate state in place and return
//! [`effect::Effect`] descriptions; the store runtime executes those and
//! feeds any resulting actions back into the reducer.
//!
//! ## Example
//!
//! ```ignore
//! use casaverde_core::{effect::Effects, reducer::Reducer, smallvec};
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = i64;
//!     type Action = i64;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut i64, action: i64, _env: &()) -> Effects<i64> {
//!         *state += action;
//!         smallvec![]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub mod money;

/// Reducer module - the core trait for feature logic.
///
/// Reducers are pure functions: `(State, Action, Environment) → Effects`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effects;

    /// The Reducer trait - core abstraction for feature logic.
    ///
    /// # Type Parameters
    ///
    /// - `State`: the domain state this reducer operates on
    /// - `Action`: the action type this reducer processes
    /// - `Environment`: the injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for BookingReducer<G, C> {
    ///     type State = BookingState;
    ///     type Action = BookingAction;
    ///     type Environment = BookingEnvironment<G, C>;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut BookingState,
    ///         action: BookingAction,
    ///         env: &BookingEnvironment<G, C>,
    ///     ) -> Effects<BookingAction> {
    ///         // guarded transitions here
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects.
        ///
        /// This is a pure function that:
        /// 1. Validates the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Effects<Self::Action>;
    }
}

/// Effect module - side effect descriptions.
///
/// Effects describe side effects to be performed by the store runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use smallvec::SmallVec;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// The effect collection returned by reducers.
    ///
    /// Most transitions produce zero or one effect, so the inline capacity
    /// keeps the common path allocation-free.
    pub type Effects<Action> = SmallVec<[Effect<Action>; 4]>;

    /// Effect type - describes a side effect to be executed.
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: the action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts, deferred refreshes)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after the delay
            action: Box<Action>,
        },

        /// Arbitrary async computation.
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back
        /// into the reducer.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an async computation as a feedback effect.
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }
    }
}

/// Environment module - dependency injection traits.
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter of a reducer. Feature crates define
/// their own provider traits (gateways, token stores); only the clock is
/// universal enough to live here.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability.
    ///
    /// # Examples
    ///
    /// ```
    /// use casaverde_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let _today = clock.now().date_naive();
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// System clock used outside of tests.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::{Effect, Effects};
    use super::reducer::Reducer;
    use smallvec::smallvec;

    struct Adder;

    impl Reducer for Adder {
        type State = i64;
        type Action = i64;
        type Environment = ();

        fn reduce(&self, state: &mut i64, action: i64, (): &()) -> Effects<i64> {
            *state += action;
            smallvec![]
        }
    }

    #[test]
    fn reduce_mutates_state_in_place() {
        let mut state = 1;
        let effects = Adder.reduce(&mut state, 41, &());
        assert_eq!(state, 42);
        assert!(effects.is_empty());
    }

    #[test]
    fn effect_debug_labels_variants() {
        let effect: Effect<i64> = Effect::None;
        assert_eq!(format!("{effect:?}"), "Effect::None");

        let fut = Effect::<i64>::future(async { None });
        assert_eq!(format!("{fut:?}"), "Effect::Future(<future>)");
    }
}
