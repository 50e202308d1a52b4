//! Configuration management for the formation catalog.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::identity::StaticIdentity;
use crate::types::ParticipantId;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default root of the formation service
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8089/formation-service";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Formation service configuration
    pub service: ServiceConfig,
    /// Current participant, as handed over by the authentication layer
    pub participant_id: Option<ParticipantId>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Formation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Root URL; endpoints are `{base_url}/formations/all` and `{base_url}/reservations`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            participant_id: None,
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparseable values fall back to defaults. An unparseable
    /// `PARTICIPANT_ID` means nobody is logged in.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            service: ServiceConfig {
                base_url: lookup("FORMATION_SERVICE_URL").unwrap_or(defaults.service.base_url),
                timeout_secs: lookup("FORMATION_SERVICE_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.service.timeout_secs),
            },
            participant_id: lookup("PARTICIPANT_ID")
                .and_then(|s| s.trim().parse().ok())
                .map(ParticipantId::new),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    /// Request timeout for the HTTP clients
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }

    /// Identity collaborator for the configured participant
    #[must_use]
    pub fn identity(&self) -> StaticIdentity {
        StaticIdentity::from(self.participant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ParticipantIdentity;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);

        assert_eq!(config.service.base_url, DEFAULT_SERVICE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.participant_id, None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("FORMATION_SERVICE_URL", "http://gateway:9000/formation-service"),
            ("FORMATION_SERVICE_TIMEOUT_SECS", "5"),
            ("PARTICIPANT_ID", " 7 "),
        ]);

        assert_eq!(config.service.base_url, "http://gateway:9000/formation-service");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.identity().participant_id(), Some(ParticipantId::new(7)));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[
            ("FORMATION_SERVICE_TIMEOUT_SECS", "soon"),
            ("PARTICIPANT_ID", "anonymous"),
        ]);

        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.identity().participant_id(), None);
    }
}
