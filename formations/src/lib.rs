//! Formation catalog: list training offerings and reserve a seat.
//!
//! The crate is made of thin pieces around one controller:
//!
//! - [`types`]: the `Formation` and `ReservationRequest` records
//! - [`client`]: one HTTP client per endpoint of the formation service
//! - [`identity`]: who the current participant is
//! - [`catalog`]: the list-and-reserve controller (reducer, environment, store)
//! - [`config`]: environment-variable configuration
//! - [`mocks`]: in-memory service doubles
//!
//! # Quick Start
//!
//! ```no_run
//! use formations::catalog::{CatalogEnvironment, CatalogStore};
//! use formations::config::Config;
//! use formations::types::FormationId;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let store = CatalogStore::new(CatalogEnvironment::from_config(&config)?);
//!
//! store.initialize(Duration::from_secs(10)).await?;
//! let count = store.state(|s| s.formations.len()).await;
//! println!("{count} formations");
//!
//! store.participate(FormationId::new(1), Duration::from_secs(10)).await?;
//! for notification in store.take_notifications().await {
//!     println!("{notification}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod identity;
pub mod mocks;
pub mod types;

// Re-export commonly used types
pub use catalog::{CatalogAction, CatalogEnvironment, CatalogState, CatalogStatus, CatalogStore, Notification};
pub use client::{ApiError, FormationApi, FormationClient, ReservationApi, ReservationClient};
pub use config::Config;
pub use identity::{ParticipantIdentity, StaticIdentity};
pub use types::{Category, Formation, FormationId, ParticipantId, ReservationRequest};
