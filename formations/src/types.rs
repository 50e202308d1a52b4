//! Domain types for the formation catalog.
//!
//! Field names on the wire follow the formation service's JSON (French keys);
//! the Rust side uses English names.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a formation, assigned by the formation service
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormationId(i64);

impl FormationId {
    /// Wraps a raw identifier
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FormationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an authenticated participant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(i64);

impl ParticipantId {
    /// Wraps a raw identifier
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Formation
// ============================================================================

/// Category a formation belongs to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier
    pub id: i64,
    /// Display name
    #[serde(rename = "nom")]
    pub name: String,
}

/// A training offering as returned by `GET /formations/all`
///
/// Decoding is lenient: `location` and `meeting_link` are both optional
/// regardless of `online`. Use [`Formation::has_consistent_delivery`] to check
/// whether a record carries the field its delivery mode expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    /// Formation identifier
    pub id: FormationId,
    /// Title
    #[serde(rename = "titre")]
    pub title: String,
    /// Description
    pub description: String,
    /// Image URL
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// Delivered online (true) or in person (false)
    #[serde(rename = "enLigne")]
    pub online: bool,
    /// Physical location, expected when in person
    #[serde(rename = "lieu", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Meeting link, expected when online
    #[serde(rename = "meetLink", default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    /// Start date, as sent by the service
    #[serde(rename = "dateDebut")]
    pub start_date: String,
    /// End date, as sent by the service
    #[serde(rename = "dateFin")]
    pub end_date: String,
    /// Optional category
    #[serde(rename = "categorie", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// How a formation is delivered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery<'a> {
    /// Online session, with its meeting link when known
    Online {
        /// Meeting link
        meeting_link: Option<&'a str>,
    },
    /// In-person session, with its location when known
    InPerson {
        /// Physical location
        location: Option<&'a str>,
    },
}

impl Formation {
    /// Delivery mode with the field relevant to it
    #[must_use]
    pub fn delivery(&self) -> Delivery<'_> {
        if self.online {
            Delivery::Online {
                meeting_link: self.meeting_link.as_deref(),
            }
        } else {
            Delivery::InPerson {
                location: self.location.as_deref(),
            }
        }
    }

    /// True when exactly the field matching the delivery mode is present
    #[must_use]
    pub const fn has_consistent_delivery(&self) -> bool {
        if self.online {
            self.meeting_link.is_some() && self.location.is_none()
        } else {
            self.location.is_some() && self.meeting_link.is_none()
        }
    }

    /// Parsed start date, `None` if the service sent an unknown format
    #[must_use]
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        parse_schedule_date(&self.start_date)
    }

    /// Parsed end date, `None` if the service sent an unknown format
    #[must_use]
    pub fn ends_at(&self) -> Option<NaiveDateTime> {
        parse_schedule_date(&self.end_date)
    }
}

/// Parses the date-valued text used for formation schedules.
///
/// Accepts RFC 3339, ISO local date-times (with or without fractional
/// seconds) and plain dates, which map to midnight.
#[must_use]
pub fn parse_schedule_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

// ============================================================================
// Reservation
// ============================================================================

/// Body of `POST /reservations`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    /// Formation to attend
    pub formation_id: FormationId,
    /// Participant attending
    pub participant_id: ParticipantId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn online_formation() -> serde_json::Value {
        json!({
            "id": 1,
            "titre": "Rust avancé",
            "description": "Ownership et lifetimes",
            "imageUrl": "http://img/1.png",
            "enLigne": true,
            "meetLink": "https://meet.example/abc",
            "dateDebut": "2025-07-01",
            "dateFin": "2025-07-03",
            "categorie": { "id": 3, "nom": "Programmation" }
        })
    }

    #[test]
    fn test_decode_online_formation() {
        let formation: Formation = serde_json::from_value(online_formation()).unwrap();

        assert_eq!(formation.id, FormationId::new(1));
        assert_eq!(formation.title, "Rust avancé");
        assert!(formation.online);
        assert_eq!(formation.location, None);
        assert_eq!(
            formation.category,
            Some(Category {
                id: 3,
                name: "Programmation".to_string()
            })
        );
        assert_eq!(
            formation.delivery(),
            Delivery::Online {
                meeting_link: Some("https://meet.example/abc")
            }
        );
        assert!(formation.has_consistent_delivery());
    }

    #[test]
    fn test_decode_is_lenient_about_delivery_fields() {
        let formation: Formation = serde_json::from_value(json!({
            "id": 2,
            "titre": "Atelier",
            "description": "",
            "imageUrl": "",
            "enLigne": false,
            "meetLink": "https://meet.example/oops",
            "dateDebut": "2025-09-01T09:00:00",
            "dateFin": "2025-09-01T17:00:00"
        }))
        .unwrap();

        assert_eq!(formation.delivery(), Delivery::InPerson { location: None });
        assert!(!formation.has_consistent_delivery());
        assert_eq!(formation.category, None);
    }

    #[test]
    fn test_schedule_dates() {
        let formation: Formation = serde_json::from_value(online_formation()).unwrap();
        let start = formation.starts_at().unwrap();
        assert_eq!(start.to_string(), "2025-07-01 00:00:00");

        assert_eq!(
            parse_schedule_date("2025-09-01T09:30:00.250").map(|d| d.to_string()),
            Some("2025-09-01 09:30:00.250".to_string())
        );
        assert_eq!(
            parse_schedule_date("2025-09-01T09:30:00+02:00").map(|d| d.to_string()),
            Some("2025-09-01 07:30:00".to_string())
        );
        assert_eq!(parse_schedule_date("demain"), None);
    }

    #[test]
    fn test_reservation_request_wire_format() {
        let request = ReservationRequest {
            formation_id: FormationId::new(42),
            participant_id: ParticipantId::new(7),
        };

        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({ "formationId": 42, "participantId": 7 })
        );
    }
}
