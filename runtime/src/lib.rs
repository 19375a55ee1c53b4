//! # Casa Verde Runtime
//!
//! The Store runtime that coordinates reducer execution and effect
//! handling for the reservation client.
//!
//! ## Core Components
//!
//! - **Store**: owns feature state, runs the reducer, executes effects
//! - **Effect execution**: spawned tasks whose resulting actions feed back
//!   into the reducer
//! - **Action broadcast**: observers (screens, tests) subscribe to the
//!   actions produced by effects
//!
//! ## Example
//!
//! ```ignore
//! use casaverde_runtime::Store;
//!
//! let store = Store::new(BookingState::default(), BookingReducer::new(), environment);
//!
//! store.send(BookingAction::ChooseFacility { facility: Facility::TennisCourt }).await?;
//! let step = store.state(|s| s.step).await;
//! ```

use casaverde_core::effect::Effect;
use casaverde_core::reducer::Reducer;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, RwLock, broadcast};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a matching action in `send_and_wait_for`
        #[error("Timeout waiting for action")]
        Timeout,

        /// The action broadcast channel closed, typically because the
        /// store is shutting down
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

// ═══════════════════════════════════════════════════════════════════════
// Effect tracking
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct TrackingInner {
    active: AtomicUsize,
    done: Notify,
}

/// Handle returned by [`Store::send`] for waiting on effect completion.
///
/// `send` returns once the reducer has run and effect tasks have been
/// spawned; the handle lets callers wait until those tasks settle.
/// Feedback actions dispatched by an effect get their own handles and are
/// not covered by this one.
#[derive(Debug, Clone)]
pub struct EffectHandle {
    inner: Arc<TrackingInner>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let inner = Arc::new(TrackingInner::default());
        (
            Self {
                inner: Arc::clone(&inner),
            },
            EffectTracking { inner },
        )
    }

    /// Wait until every effect spawned for this action has completed.
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.done.notified();
            if self.inner.active.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Wait for effect completion with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running when
    /// the timeout expires.
    pub async fn wait_with_timeout(&self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

#[derive(Debug, Clone)]
struct EffectTracking {
    inner: Arc<TrackingInner>,
}

impl EffectTracking {
    fn increment(&self) {
        self.inner.active.fetch_add(1, Ordering::AcqRel);
    }
}

/// Decrements the tracking counter on drop so panicking effect tasks
/// still release their waiters.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        if self.0.inner.active.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.inner.done.notify_waiters();
        }
    }
}

/// Decrements the store-wide pending-effect counter on drop.
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Store
// ═══════════════════════════════════════════════════════════════════════

/// The Store runtime.
///
/// The Store manages:
/// 1. State (behind an `RwLock` for concurrent access)
/// 2. Reducer (feature logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with the action feedback loop)
///
/// # Concurrency
///
/// - The reducer executes synchronously while holding the write lock, so
///   concurrent `send` calls serialize at the reducer; there is never a
///   second writer to feature state.
/// - Effects execute in spawned tasks and may complete in any order.
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
    /// Actions produced by effects are broadcast to observers. Initial
    /// actions passed to `send` are not.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment.
    ///
    /// The action broadcast buffers 16 actions; use
    /// [`Store::with_broadcast_capacity`] when observers may lag.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Create a new store with a custom action broadcast capacity.
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
            action_broadcast,
        }
    }

    /// Send an action to the store.
    ///
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Spawns the returned effects; their actions feed back via `send`
    ///
    /// Returns an [`EffectHandle`] for waiting on the spawned effects.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            return Err(StoreError::ShutdownInProgress);
        }

        metrics::counter!("store.actions.total").increment(1);

        let (handle, tracking) = EffectHandle::new();

        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action, &self.environment)
        };

        tracing::trace!("Reducer returned {} effects", effects.len());
        for effect in effects {
            self.execute_effect(effect, &tracking);
        }

        Ok(handle)
    }

    /// Send an action and wait for a matching result action.
    ///
    /// Designed for request-response flows: subscribe to the action
    /// broadcast, send the initial action, then wait for an action
    /// matching the predicate.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no matching action before the timeout
    /// - [`StoreError::ChannelClosed`]: broadcast closed (store shutdown)
    /// - [`StoreError::ShutdownInProgress`]: store is shutting down
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        // Subscribe BEFORE sending to avoid a race with fast effects.
        let mut rx = self.action_broadcast.subscribe();

        self.send(action).await?;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // If the terminal action was among the skipped
                        // ones the timeout catches it.
                        tracing::warn!(skipped, "Action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Subscribe to all actions produced by effects.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Read current state via a closure.
    ///
    /// ```ignore
    /// let step = store.state(|s| s.step).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Initiate graceful shutdown.
    ///
    /// Sets the shutdown flag (rejecting new actions) and waits for
    /// pending effects to complete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires with
    /// effects still running.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");
        self.shutdown.store(true, Ordering::Release);

        let start = tokio::time::Instant::now();
        let poll_interval = Duration::from_millis(50);

        loop {
            let pending = self.pending_effects.load(Ordering::SeqCst);

            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending_effects = pending, "Shutdown timed out");
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Spawn a top-level effect with tracking.
    ///
    /// `None` is free; `Parallel` fans out through this same path so each
    /// branch is tracked individually; everything else runs in one
    /// spawned task.
    fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
        match effect {
            Effect::None => {},
            Effect::Parallel(effects) => {
                metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                for effect in effects {
                    self.execute_effect(effect, tracking);
                }
            },
            effect => {
                metrics::counter!("store.effects.executed", "type" => effect_kind(&effect))
                    .increment(1);
                tracking.increment();
                self.pending_effects.fetch_add(1, Ordering::SeqCst);

                let guard = DecrementGuard(tracking.clone());
                let pending_guard = PendingGuard(Arc::clone(&self.pending_effects));
                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = guard;
                    let _pending_guard = pending_guard;
                    run_effect(store, effect).await;
                });
            },
        }
    }
}

const fn effect_kind<A>(effect: &Effect<A>) -> &'static str {
    match effect {
        Effect::None => "none",
        Effect::Parallel(_) => "parallel",
        Effect::Sequential(_) => "sequential",
        Effect::Delay { .. } => "delay",
        Effect::Future(_) => "future",
    }
}

/// Run one effect to completion, dispatching any produced actions back
/// into the store. Boxed so `Sequential`/`Parallel` can recurse.
fn run_effect<S, A, E, R>(
    store: Store<S, A, E, R>,
    effect: Effect<A>,
) -> futures::future::BoxFuture<'static, ()>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => {},
            Effect::Future(fut) => {
                if let Some(action) = fut.await {
                    feed_back(&store, action).await;
                } else {
                    tracing::trace!("Effect::Future completed with no action");
                }
            },
            Effect::Delay { duration, action } => {
                tokio::time::sleep(duration).await;
                feed_back(&store, *action).await;
            },
            Effect::Sequential(effects) => {
                for effect in effects {
                    run_effect(store.clone(), effect).await;
                }
            },
            Effect::Parallel(effects) => {
                let tasks: Vec<_> = effects
                    .into_iter()
                    .map(|effect| tokio::spawn(run_effect(store.clone(), effect)))
                    .collect();
                for task in tasks {
                    if task.await.is_err() {
                        tracing::warn!("Parallel effect task panicked");
                    }
                }
            },
        }
    })
}

/// Broadcast an effect-produced action and feed it back into the reducer.
async fn feed_back<S, A, E, R>(store: &Store<S, A, E, R>, action: A)
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let _ = store.action_broadcast.send(action.clone());
    if let Err(error) = store.send(action).await {
        tracing::debug!(%error, "Feedback action dropped");
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}
