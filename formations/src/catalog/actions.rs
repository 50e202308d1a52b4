//! Actions for the list-and-reserve controller.

use crate::types::{Formation, FormationId};
use serde::{Deserialize, Serialize};

/// Every input the catalog reacts to
///
/// User intents (`Initialize`, `Refresh`, `Participate`,
/// `DismissNotifications`) come from the view. The remaining variants are
/// produced by effects once a network call settles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogAction {
    /// The view became active: resolve the participant, then load formations
    Initialize,

    /// Load formations again without touching identity
    Refresh,

    /// The listing fetch succeeded
    FormationsLoaded {
        /// Formations in service order
        formations: Vec<Formation>,
    },

    /// The listing fetch failed
    FormationsLoadFailed {
        /// Error description
        error: String,
    },

    /// The participant asked to attend a formation
    Participate {
        /// Formation to reserve
        formation_id: FormationId,
    },

    /// The reservation service accepted the submission
    ReservationSucceeded {
        /// Reserved formation
        formation_id: FormationId,
        /// Submission this outcome belongs to
        attempt: u64,
    },

    /// The reservation submission failed
    ReservationFailed {
        /// Formation that could not be reserved
        formation_id: FormationId,
        /// Submission this outcome belongs to
        attempt: u64,
        /// Error description
        error: String,
    },

    /// The view has shown every notification numbered below `up_to`
    ///
    /// Notifications are numbered in queue order from zero for the lifetime
    /// of the catalog, so dismissing is idempotent.
    DismissNotifications {
        /// One past the last notification shown
        up_to: u64,
    },
}

impl CatalogAction {
    /// Whether this action settles a listing fetch
    #[must_use]
    pub const fn is_load_outcome(&self) -> bool {
        matches!(
            self,
            Self::FormationsLoaded { .. } | Self::FormationsLoadFailed { .. }
        )
    }

    /// Whether this action settles submission `attempt` for `formation_id`
    #[must_use]
    pub fn is_reservation_outcome(&self, formation_id: FormationId, attempt: u64) -> bool {
        match self {
            Self::ReservationSucceeded {
                formation_id: id,
                attempt: a,
            }
            | Self::ReservationFailed {
                formation_id: id,
                attempt: a,
                ..
            } => *id == formation_id && *a == attempt,
            _ => false,
        }
    }
}
