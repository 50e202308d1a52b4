//! The list-and-reserve controller.
//!
//! When the view becomes active it sends [`CatalogAction::Initialize`]: the
//! participant is read from the identity collaborator and the formation
//! listing is fetched. [`CatalogAction::Participate`] submits a reservation
//! for the current participant and queues a [`Notification`] with the
//! outcome.
//!
//! ```text
//! view ──Initialize──▶ reducer ──identity (sync)
//!                         └──Effect: GET /formations/all ──▶ FormationsLoaded | FormationsLoadFailed
//! view ──Participate──▶ reducer ──(no participant)──▶ Notification::AuthenticationRequired
//!                         └──Effect: POST /reservations ──▶ ReservationSucceeded | ReservationFailed
//! ```
//!
//! A formation with a submission in flight ignores further `Participate`
//! actions until the submission settles. Submissions for different
//! formations are independent. Nothing is retried and nothing can be
//! cancelled once started.

pub mod actions;
pub mod environment;
pub mod notification;
pub mod reducer;
pub mod store;
pub mod types;

pub use actions::CatalogAction;
pub use environment::CatalogEnvironment;
pub use notification::Notification;
pub use reducer::CatalogReducer;
pub use store::CatalogStore;
pub use types::{CatalogState, CatalogStatus};
