//! Environment for the catalog reducer.

use crate::client::{ApiResult, FormationApi, FormationClient, ReservationApi, ReservationClient, http_client};
use crate::config::Config;
use crate::identity::ParticipantIdentity;
use portal_core::environment::{Clock, SystemClock};
use std::sync::Arc;

/// Collaborators the catalog controller talks to
#[derive(Clone)]
pub struct CatalogEnvironment {
    /// Formation listing service
    pub formations: Arc<dyn FormationApi>,
    /// Reservation service
    pub reservations: Arc<dyn ReservationApi>,
    /// Current participant lookup
    pub identity: Arc<dyn ParticipantIdentity>,
    /// Clock for load timestamps
    pub clock: Arc<dyn Clock>,
}

impl CatalogEnvironment {
    /// Creates a new `CatalogEnvironment`
    #[must_use]
    pub fn new(
        formations: Arc<dyn FormationApi>,
        reservations: Arc<dyn ReservationApi>,
        identity: Arc<dyn ParticipantIdentity>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            formations,
            reservations,
            identity,
            clock,
        }
    }

    /// Production environment: HTTP clients against the configured service,
    /// the configured participant, and the system clock
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let http = http_client(config.request_timeout())?;
        let base_url = &config.service.base_url;

        Ok(Self::new(
            Arc::new(FormationClient::new(http.clone(), base_url.as_str())),
            Arc::new(ReservationClient::new(http, base_url.as_str())),
            Arc::new(config.identity()),
            Arc::new(SystemClock),
        ))
    }
}
