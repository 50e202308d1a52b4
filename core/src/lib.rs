//! # Portal Core
//!
//! Core traits and types shared by every feature of the formation portal.
//!
//! A feature is described by four pieces:
//!
//! - **State**: what the view renders (owned, `Clone`-able data)
//! - **Action**: every input the feature reacts to, user intents and
//!   results coming back from the network alike
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of asynchronous work, executed by the runtime
//!
//! Collaborators (HTTP clients, identity, clock) reach the reducer through
//! its `Environment`, so tests can swap them for doubles.
//!
//! ## Example
//!
//! ```ignore
//! use portal_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! impl Reducer for CatalogReducer {
//!     type State = CatalogState;
//!     type Action = CatalogAction;
//!     type Environment = CatalogEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CatalogState,
//!         action: CatalogAction,
//!         env: &CatalogEnvironment,
//!     ) -> SmallVec<[Effect<CatalogAction>; 4]> {
//!         SmallVec::new()
//!     }
//! }
//! ```

pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - the trait holding a feature's logic
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for feature logic
    ///
    /// Reducers are synchronous. They update state in place and describe any
    /// asynchronous follow-up work as [`Effect`] values. They never perform
    /// I/O themselves.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime. An empty vector means the
        /// action was fully handled in place.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Boxed future produced by [`Effect::Future`]
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed by the reducer. The store spawns them and
    /// feeds any resulting action back into the reducer.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(EffectFuture<Action>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async block into an [`Effect::Future`]
        #[must_use]
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - dependency injection traits
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
