//! Reducer for the list-and-reserve controller.
//!
//! Listing and reservation calls leave the reducer as `Effect::Future`
//! values; their outcome comes back as `FormationsLoaded` /
//! `FormationsLoadFailed` and `ReservationSucceeded` / `ReservationFailed`.

use super::{CatalogAction, CatalogEnvironment, CatalogState, CatalogStatus, Notification};
use crate::types::{FormationId, ReservationRequest};
use portal_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Reducer for the formation catalog
#[derive(Clone, Debug)]
pub struct CatalogReducer;

impl CatalogReducer {
    /// Creates a new `CatalogReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn load_formations(
        state: &mut CatalogState,
        env: &CatalogEnvironment,
    ) -> SmallVec<[Effect<CatalogAction>; 4]> {
        state.status = CatalogStatus::Loading;

        let fetch = env.formations.all_formations();
        smallvec![Effect::future(async move {
            Some(match fetch.await {
                Ok(formations) => CatalogAction::FormationsLoaded { formations },
                Err(error) => CatalogAction::FormationsLoadFailed {
                    error: error.to_string(),
                },
            })
        })]
    }

    fn participate(
        state: &mut CatalogState,
        formation_id: FormationId,
        env: &CatalogEnvironment,
    ) -> SmallVec<[Effect<CatalogAction>; 4]> {
        let Some(participant_id) = state.participant_id else {
            tracing::debug!(%formation_id, "Participation refused: not authenticated");
            state.notifications.push(Notification::AuthenticationRequired);
            return SmallVec::new();
        };

        if state.is_pending(formation_id) {
            tracing::debug!(%formation_id, "Reservation already in flight, ignoring");
            return SmallVec::new();
        }

        let attempt = state.next_attempt;
        state.next_attempt += 1;
        state.pending.insert(formation_id, attempt);

        let submit = env.reservations.create_reservation(ReservationRequest {
            formation_id,
            participant_id,
        });
        smallvec![Effect::future(async move {
            Some(match submit.await {
                Ok(()) => CatalogAction::ReservationSucceeded {
                    formation_id,
                    attempt,
                },
                Err(error) => CatalogAction::ReservationFailed {
                    formation_id,
                    attempt,
                    error: error.to_string(),
                },
            })
        })]
    }

    fn settle(state: &mut CatalogState, formation_id: FormationId, attempt: u64) {
        if state.pending_attempt(formation_id) == Some(attempt) {
            state.pending.remove(&formation_id);
        } else {
            tracing::debug!(%formation_id, attempt, "Outcome of a superseded attempt");
        }
    }
}

impl Default for CatalogReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = CatalogEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== View intents ==========
            CatalogAction::Initialize => {
                state.participant_id = env.identity.participant_id();
                Self::load_formations(state, env)
            },

            CatalogAction::Refresh => Self::load_formations(state, env),

            CatalogAction::Participate { formation_id } => {
                Self::participate(state, formation_id, env)
            },

            CatalogAction::DismissNotifications { up_to } => {
                let up_to = up_to.min(state.notifications_end());
                if let Some(shown) = up_to.checked_sub(state.dismissed) {
                    let shown = usize::try_from(shown)
                        .map_or(state.notifications.len(), |n| n.min(state.notifications.len()));
                    state.notifications.drain(..shown);
                    state.dismissed = up_to;
                }
                SmallVec::new()
            },

            // ========== Effect outcomes ==========
            CatalogAction::FormationsLoaded { formations } => {
                for formation in formations.iter().filter(|f| !f.has_consistent_delivery()) {
                    tracing::warn!(
                        formation_id = %formation.id,
                        online = formation.online,
                        "Formation delivery fields do not match its delivery mode"
                    );
                }
                tracing::info!(count = formations.len(), "Formations loaded");

                state.formations = formations;
                state.status = CatalogStatus::Loaded;
                state.loaded_at = Some(env.clock.now());
                SmallVec::new()
            },

            CatalogAction::FormationsLoadFailed { error } => {
                tracing::warn!(%error, "Formation listing unavailable");
                state.status = CatalogStatus::Failed { error };
                SmallVec::new()
            },

            CatalogAction::ReservationSucceeded {
                formation_id,
                attempt,
            } => {
                tracing::info!(%formation_id, attempt, "Reservation recorded");
                Self::settle(state, formation_id, attempt);
                state.notifications.push(Notification::ReservationRecorded);
                SmallVec::new()
            },

            CatalogAction::ReservationFailed {
                formation_id,
                attempt,
                error,
            } => {
                tracing::warn!(%formation_id, attempt, %error, "Reservation failed");
                Self::settle(state, formation_id, attempt);
                state.notifications.push(Notification::ReservationFailed);
                SmallVec::new()
            },
        }
    }
}
