//! Store for the list-and-reserve view.

use super::{CatalogAction, CatalogEnvironment, CatalogReducer, CatalogState, CatalogStatus, Notification};
use crate::types::FormationId;
use portal_runtime::{Store, StoreError};
use std::time::Duration;

/// Catalog controller as the view sees it
///
/// Wraps the generic [`Store`] with the catalog's request/response shapes:
/// initialise and wait for the listing, participate and wait for the
/// reservation outcome, drain notifications.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Store<CatalogState, CatalogAction, CatalogEnvironment, CatalogReducer>,
}

impl CatalogStore {
    /// Create a store with an empty catalog
    #[must_use]
    pub fn new(environment: CatalogEnvironment) -> Self {
        Self {
            inner: Store::new(CatalogState::new(), CatalogReducer::new(), environment),
        }
    }

    /// Resolve the participant and load formations, waiting for the listing
    ///
    /// # Errors
    ///
    /// [`StoreError::Timeout`] if the listing does not settle within `timeout`.
    /// A failed listing is not an error here: it is reported in the returned
    /// status.
    pub async fn initialize(&self, timeout: Duration) -> Result<CatalogStatus, StoreError> {
        self.load(CatalogAction::Initialize, timeout).await
    }

    /// Load formations again, waiting for the listing
    ///
    /// # Errors
    ///
    /// [`StoreError::Timeout`] if the listing does not settle within `timeout`.
    pub async fn refresh(&self, timeout: Duration) -> Result<CatalogStatus, StoreError> {
        self.load(CatalogAction::Refresh, timeout).await
    }

    async fn load(&self, action: CatalogAction, timeout: Duration) -> Result<CatalogStatus, StoreError> {
        let mut rx = self.inner.subscribe_actions();
        self.inner.send(action).await;

        self.inner
            .wait_or_settled(
                &mut rx,
                CatalogAction::is_load_outcome,
                |s| s.status != CatalogStatus::Loading,
                timeout,
            )
            .await?;
        Ok(self.inner.state(|s| s.status.clone()).await)
    }

    /// Ask to attend `formation_id`, waiting for the reservation to settle
    ///
    /// Returns immediately when the request is refused locally (no
    /// participant). If a submission for the same formation is already in
    /// flight, waits for that one instead of sending another.
    ///
    /// # Errors
    ///
    /// [`StoreError::Timeout`] if the reservation does not settle within `timeout`.
    pub async fn participate(&self, formation_id: FormationId, timeout: Duration) -> Result<(), StoreError> {
        let mut rx = self.inner.subscribe_actions();

        self.inner.send(CatalogAction::Participate { formation_id }).await;

        // Not pending: refused locally, or the outcome has already been reduced.
        let Some(attempt) = self.inner.state(|s| s.pending_attempt(formation_id)).await else {
            return Ok(());
        };

        self.inner
            .wait_or_settled(
                &mut rx,
                |action| action.is_reservation_outcome(formation_id, attempt),
                |s| s.pending_attempt(formation_id) != Some(attempt),
                timeout,
            )
            .await
            .map(|_| ())
    }

    /// Read the catalog state via a closure
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&CatalogState) -> T,
    {
        self.inner.state(f).await
    }

    /// Take every queued notification, oldest first
    ///
    /// Notifications queued after the read stay queued. Concurrent callers
    /// may both see the same notifications, but never dismiss unseen ones.
    pub async fn take_notifications(&self) -> Vec<Notification> {
        let (notifications, up_to) = self
            .inner
            .state(|s| (s.notifications.clone(), s.notifications_end()))
            .await;
        if !notifications.is_empty() {
            self.inner
                .send(CatalogAction::DismissNotifications { up_to })
                .await;
        }
        notifications
    }
}
