//! Identity collaborator.
//!
//! The authentication subsystem lives elsewhere; the catalog only needs to
//! know who the current participant is, if anyone.

use crate::types::ParticipantId;

/// Synchronous accessor for the current participant
pub trait ParticipantIdentity: Send + Sync {
    /// The authenticated participant, or `None` when nobody is logged in
    fn participant_id(&self) -> Option<ParticipantId>;
}

/// Identity fixed at construction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StaticIdentity(Option<ParticipantId>);

impl StaticIdentity {
    /// A logged-in participant
    #[must_use]
    pub const fn authenticated(participant_id: ParticipantId) -> Self {
        Self(Some(participant_id))
    }

    /// Nobody logged in
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }
}

impl From<Option<ParticipantId>> for StaticIdentity {
    fn from(participant_id: Option<ParticipantId>) -> Self {
        Self(participant_id)
    }
}

impl ParticipantIdentity for StaticIdentity {
    fn participant_id(&self) -> Option<ParticipantId> {
        self.0
    }
}
