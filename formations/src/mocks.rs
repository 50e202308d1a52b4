//! In-memory doubles for the formation service.
//!
//! Used by the tests and by anyone wiring the catalog without a running
//! service. Like the real clients, the returned futures do nothing until
//! polled: calls and requests are recorded at poll time.

use crate::client::{ApiError, ApiFuture, ApiResult, FormationApi, ReservationApi};
use crate::types::{Formation, ReservationRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Formation listing that answers from memory
#[derive(Clone, Debug)]
pub struct MockFormationApi {
    response: Arc<Mutex<ApiResult<Vec<Formation>>>>,
    calls: Arc<AtomicUsize>,
}

impl MockFormationApi {
    /// Listing that returns `formations`
    #[must_use]
    pub fn returning(formations: Vec<Formation>) -> Self {
        Self {
            response: Arc::new(Mutex::new(Ok(formations))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Listing that fails with `error`
    #[must_use]
    pub fn failing(error: ApiError) -> Self {
        Self {
            response: Arc::new(Mutex::new(Err(error))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replace the answer for subsequent fetches
    pub fn set_response(&self, response: ApiResult<Vec<Formation>>) {
        *self.response.lock().unwrap_or_else(PoisonError::into_inner) = response;
    }

    /// Number of fetches that reached the service
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockFormationApi {
    fn default() -> Self {
        Self::returning(Vec::new())
    }
}

impl FormationApi for MockFormationApi {
    fn all_formations(&self) -> ApiFuture<Vec<Formation>> {
        let mock = self.clone();
        Box::pin(async move {
            mock.calls.fetch_add(1, Ordering::SeqCst);
            mock.response
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        })
    }
}

/// Reservation service that records submissions
#[derive(Clone, Debug)]
pub struct MockReservationApi {
    outcome: Arc<Mutex<ApiResult<()>>>,
    latency: Duration,
    submitted: Arc<Mutex<Vec<ReservationRequest>>>,
}

impl MockReservationApi {
    /// Service that accepts every reservation
    #[must_use]
    pub fn accepting() -> Self {
        Self::with_outcome(Ok(()))
    }

    /// Service that rejects every reservation with `error`
    #[must_use]
    pub fn failing(error: ApiError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: ApiResult<()>) -> Self {
        Self {
            outcome: Arc::new(Mutex::new(outcome)),
            latency: Duration::ZERO,
            submitted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Delay each answer by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Replace the answer for subsequent submissions
    pub fn set_outcome(&self, outcome: ApiResult<()>) {
        *self.outcome.lock().unwrap_or_else(PoisonError::into_inner) = outcome;
    }

    /// Every request that reached the service, in arrival order
    #[must_use]
    pub fn submitted(&self) -> Vec<ReservationRequest> {
        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MockReservationApi {
    fn default() -> Self {
        Self::accepting()
    }
}

impl ReservationApi for MockReservationApi {
    fn create_reservation(&self, request: ReservationRequest) -> ApiFuture<()> {
        let mock = self.clone();
        Box::pin(async move {
            mock.submitted
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request);

            if !mock.latency.is_zero() {
                tokio::time::sleep(mock.latency).await;
            }

            mock.outcome
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        })
    }
}
