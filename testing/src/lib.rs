//! # Portal Testing
//!
//! Testing utilities for reducers built on `portal-core`.
//!
//! This crate provides:
//! - [`FixedClock`] for deterministic timestamps
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Effect assertions and [`run_effects`] to resolve effects without a store
//!
//! ## Example
//!
//! ```ignore
//! use portal_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(CatalogReducer::new())
//!     .with_env(test_environment())
//!     .given_state(CatalogState::default())
//!     .when_action(CatalogAction::Participate { formation_id })
//!     .then_state(|state| assert_eq!(state.notifications.len(), 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use portal_core::effect::Effect;
use portal_core::environment::Clock;


/// Mock implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use portal_testing::mocks::FixedClock;
    /// use portal_core::environment::Clock;
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

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Never in practice: the timestamp is a valid constant.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Resolve effects without a store
///
/// Awaits every [`Effect::Future`] concurrently and returns the actions they
/// produced, in effect order. `Effect::None` and futures yielding `None`
/// contribute nothing.
pub async fn run_effects<A, I>(effects: I) -> Vec<A>
where
    I: IntoIterator<Item = Effect<A>>,
{
    let futures = effects.into_iter().filter_map(|effect| match effect {
        Effect::None => None,
        Effect::Future(fut) => Some(fut),
    });

    futures::future::join_all(futures)
        .await
        .into_iter()
        .flatten()
        .collect()
}

pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_run_effects_collects_produced_actions() {
        let effects = vec![
            Effect::None,
            Effect::future(async { Some(1_u8) }),
            Effect::future(async { None }),
            Effect::future(async { Some(3_u8) }),
        ];

        assert_eq!(run_effects(effects).await, vec![1, 3]);
    }
}
