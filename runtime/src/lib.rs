//! # Portal Runtime
//!
//! The Store runtime that coordinates reducer execution and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: owns the state, runs the reducer, executes effects
//! - **Feedback loop**: an action produced by an effect is reduced, then
//!   broadcast to observers
//!
//! ## Example
//!
//! ```ignore
//! use portal_runtime::Store;
//!
//! let store = Store::new(CatalogState::default(), CatalogReducer::new(), env);
//!
//! store.send(CatalogAction::Initialize).await;
//!
//! let count = store.state(|s| s.formations.len()).await;
//! ```

use portal_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Store errors
pub mod error {
    use thiserror::Error;

    /// Why waiting on the store gave up
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// No matching action was broadcast before the deadline
        #[error("Timed out waiting for a matching action")]
        Timeout,

        /// Every sender of the action broadcast is gone
        #[error("Action broadcast closed")]
        ChannelClosed,
    }
}

/// Store module - the runtime for reducers
pub mod store {
    use super::{Arc, Effect, Reducer, RwLock};
    use crate::error::StoreError;
    use std::time::Duration;
    use tokio::sync::broadcast;

    /// Default capacity of the action broadcast channel
    const BROADCAST_CAPACITY: usize = 16;

    /// Runs a reducer against shared state
    ///
    /// State sits behind a `RwLock`; reductions are serialised by the write
    /// lock. Effects are spawned on the tokio runtime and whatever action
    /// they yield goes back through [`Store::send`].
    ///
    /// Cloning a Store is cheap and every clone shares the same state.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        /// Every action produced by an effect, published after it has been reduced.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + std::fmt::Debug + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Store with the default broadcast capacity
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, BROADCAST_CAPACITY)
        }

        /// Create a new store with a custom action broadcast capacity
        ///
        /// Observers that fall further behind than `capacity` actions miss
        /// the oldest ones.
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                action_broadcast,
            }
        }

        /// Reduce `action` and spawn the resulting effects
        ///
        /// The reducer runs under the state write lock, then every returned
        /// effect is spawned. This returns once the reducer has run; it does
        /// not wait for the effects.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) {
            tracing::debug!(?action, "Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect);
            }
        }

        /// Send `action`, then wait for an effect to yield an action matching
        /// `predicate`
        ///
        /// Subscribes to the action broadcast before sending, so a result
        /// produced quickly is never missed. When this returns, the matching
        /// action has already been reduced into the state.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action arrived in time
        /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await;

            wait_for_action(&mut rx, predicate, timeout).await
        }

        /// Wait on `rx` for an action matching `predicate`, falling back to
        /// the state when the receiver lags
        ///
        /// A lagging receiver may have missed the action it waits for. Since
        /// actions are reduced before they are broadcast, `settled` is then
        /// checked against the state: if it holds, the outcome has already
        /// been applied and this returns `Ok(None)`.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: nothing matched or settled in time
        /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
        pub async fn wait_or_settled<F, P>(
            &self,
            rx: &mut broadcast::Receiver<A>,
            predicate: F,
            settled: P,
            timeout: Duration,
        ) -> Result<Option<A>, StoreError>
        where
            F: Fn(&A) -> bool,
            P: Fn(&S) -> bool,
        {
            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(Some(action)),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "Action observer lagged, checking state");
                            metrics::counter!("store.observers.lagged").increment(1);
                            if self.state(&settled).await {
                                return Ok(None);
                            }
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

        /// Subscribe to every action produced by effects
        ///
        /// Actions sent directly through [`Store::send`] are not broadcast.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Run `f` against the current state under the read lock
        ///
        /// ```ignore
        /// let count = store.state(|s| s.formations.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let store = self.clone();

                    tokio::spawn(async move {
                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            store.send(action.clone()).await;
                            // No receivers is fine.
                            let _ = store.action_broadcast.send(action);
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    });
                },
            }
        }
    }

    /// Wait on a receiver from [`Store::subscribe_actions`] for a matching action
    ///
    /// A lagging receiver keeps waiting; use [`Store::wait_or_settled`] when
    /// the state can tell whether the action was missed.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no matching action arrived in time
    /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
    pub async fn wait_for_action<A, F>(
        rx: &mut broadcast::Receiver<A>,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        A: Clone,
        F: Fn(&A) -> bool,
    {
        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // A dropped terminal action surfaces as a timeout.
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

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

pub use error::StoreError;
pub use store::{Store, wait_for_action};

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::{SmallVec, smallvec};
    use std::time::Duration;

    #[derive(Debug, Clone, Default)]
    struct SeatState {
        booked: u32,
        confirmations: Vec<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum SeatAction {
        Book,
        BookRemotely,
        Confirmed(String),
        FireAndForget,
    }

    struct SeatEnv {
        venue: String,
    }

    struct SeatReducer;

    impl Reducer for SeatReducer {
        type State = SeatState;
        type Action = SeatAction;
        type Environment = SeatEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                SeatAction::Book => {
                    state.booked += 1;
                    SmallVec::new()
                },
                SeatAction::BookRemotely => {
                    let venue = env.venue.clone();
                    smallvec![Effect::future(async move {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        Some(SeatAction::Confirmed(venue))
                    })]
                },
                SeatAction::Confirmed(venue) => {
                    state.booked += 1;
                    state.confirmations.push(venue);
                    SmallVec::new()
                },
                SeatAction::FireAndForget => smallvec![Effect::None, Effect::future(async { None })],
            }
        }
    }

    fn store() -> Store<SeatState, SeatAction, SeatEnv, SeatReducer> {
        Store::new(
            SeatState::default(),
            SeatReducer,
            SeatEnv {
                venue: "Tunis".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_send_runs_reducer() {
        let store = store();

        store.send(SeatAction::Book).await;
        store.send(SeatAction::Book).await;

        assert_eq!(store.state(|s| s.booked).await, 2);
    }

    #[tokio::test]
    async fn test_feedback_action_is_reduced_before_broadcast() -> Result<(), StoreError> {
        let store = store();

        let result = store
            .send_and_wait_for(
                SeatAction::BookRemotely,
                |a| matches!(a, SeatAction::Confirmed(_)),
                Duration::from_secs(1),
            )
            .await?;

        assert_eq!(result, SeatAction::Confirmed("Tunis".to_string()));
        let (booked, confirmations) = store.state(|s| (s.booked, s.confirmations.clone())).await;
        assert_eq!(booked, 1);
        assert_eq!(confirmations, vec!["Tunis".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_wait_times_out_without_feedback() {
        let store = store();

        let result = store
            .send_and_wait_for(
                SeatAction::FireAndForget,
                |_| true,
                Duration::from_millis(50),
            )
            .await;

        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn test_lagging_waiter_falls_back_to_state() -> Result<(), StoreError> {
        let store = Store::with_broadcast_capacity(
            SeatState::default(),
            SeatReducer,
            SeatEnv {
                venue: "Sousse".to_string(),
            },
            1,
        );
        let mut rx = store.subscribe_actions();

        for _ in 0..3 {
            store.send(SeatAction::BookRemotely).await;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;

        // The first confirmation was pushed out of the channel.
        let outcome = store
            .wait_or_settled(
                &mut rx,
                |a| *a == SeatAction::Book,
                |s| s.confirmations.len() == 3,
                Duration::from_secs(1),
            )
            .await?;

        assert_eq!(outcome, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_wait_or_settled_returns_matching_action() -> Result<(), StoreError> {
        let store = store();
        let mut rx = store.subscribe_actions();

        store.send(SeatAction::BookRemotely).await;
        let outcome = store
            .wait_or_settled(
                &mut rx,
                |a| matches!(a, SeatAction::Confirmed(_)),
                |_| false,
                Duration::from_secs(1),
            )
            .await?;

        assert_eq!(outcome, Some(SeatAction::Confirmed("Tunis".to_string())));
        Ok(())
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = store();
        let clone = store.clone();

        clone.send(SeatAction::Book).await;

        assert_eq!(store.state(|s| s.booked).await, 1);
    }

    #[tokio::test]
    async fn test_subscribers_do_not_see_direct_sends() {
        let store = store();
        let mut rx = store.subscribe_actions();

        store.send(SeatAction::Book).await;
        store.send(SeatAction::BookRemotely).await;

        let received = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await;
        assert!(matches!(received, Ok(Ok(SeatAction::Confirmed(_)))));
    }
}
