//! User-facing notifications raised by the catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A message the view must show to the participant
///
/// The view decides how to render it (toast, modal, log line); the catalog
/// only queues the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// Participation attempted without being logged in
    AuthenticationRequired,
    /// The reservation was accepted by the service
    ReservationRecorded,
    /// The reservation could not be submitted
    ReservationFailed,
}

impl Notification {
    /// Text shown to the participant
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "Vous devez être connecté pour participer.",
            Self::ReservationRecorded => "Participation enregistrée !",
            Self::ReservationFailed => "Erreur lors de la réservation",
        }
    }

    /// Whether this notification reports a problem
    #[must_use]
    pub const fn is_error(self) -> bool {
        !matches!(self, Self::ReservationRecorded)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Notification::AuthenticationRequired.to_string(),
            "Vous devez être connecté pour participer."
        );
        assert_eq!(Notification::ReservationRecorded.message(), "Participation enregistrée !");
        assert_eq!(Notification::ReservationFailed.message(), "Erreur lors de la réservation");
        assert!(!Notification::ReservationRecorded.is_error());
        assert!(Notification::ReservationFailed.is_error());
    }
}
