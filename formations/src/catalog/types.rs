//! State of the list-and-reserve view.

use super::Notification;
use crate::types::{Formation, FormationId, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where the formation listing stands
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded
    Loaded,
    /// The last fetch failed; `formations` still holds the previous listing
    Failed {
        /// Error description
        error: String,
    },
}

/// State owned by the catalog controller for the lifetime of the view
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogState {
    /// Formations in service order, replaced wholesale on each successful fetch
    pub formations: Vec<Formation>,
    /// Current participant, `None` when not authenticated or not yet resolved
    pub participant_id: Option<ParticipantId>,
    /// Listing status
    pub status: CatalogStatus,
    /// When the listing was last replaced
    pub loaded_at: Option<DateTime<Utc>>,
    /// Formations with a reservation submission in flight, with the
    /// attempt number of that submission
    pub pending: HashMap<FormationId, u64>,
    /// Attempt number given to the next submission
    pub next_attempt: u64,
    /// Notifications waiting to be shown, oldest first
    pub notifications: Vec<Notification>,
    /// Notifications dismissed so far; `notifications[i]` is number
    /// `dismissed + i`
    pub dismissed: u64,
}

impl CatalogState {
    /// Creates an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a formation in the current listing
    #[must_use]
    pub fn formation(&self, id: FormationId) -> Option<&Formation> {
        self.formations.iter().find(|f| f.id == id)
    }

    /// Whether a participant is known
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.participant_id.is_some()
    }

    /// Whether a reservation for `id` is in flight
    #[must_use]
    pub fn is_pending(&self, id: FormationId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Attempt number of the submission in flight for `id`
    #[must_use]
    pub fn pending_attempt(&self, id: FormationId) -> Option<u64> {
        self.pending.get(&id).copied()
    }

    /// Number given to the next notification queued
    #[must_use]
    pub fn notifications_end(&self) -> u64 {
        self.dismissed + self.notifications.len() as u64
    }

    /// Formations grouped by category name, uncategorised ones under `None`
    ///
    /// Groups appear in order of first occurrence and keep listing order.
    #[must_use]
    pub fn by_category(&self) -> Vec<(Option<&str>, Vec<&Formation>)> {
        let mut groups: Vec<(Option<&str>, Vec<&Formation>)> = Vec::new();
        for formation in &self.formations {
            let key = formation.category.as_ref().map(|c| c.name.as_str());
            match groups.iter_mut().find(|(name, _)| *name == key) {
                Some((_, members)) => members.push(formation),
                None => groups.push((key, vec![formation])),
            }
        }
        groups
    }
}
