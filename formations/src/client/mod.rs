//! HTTP clients for the formation service.
//!
//! Each client wraps exactly one endpoint. Calls return lazy, single-shot
//! futures: no request leaves the process until the future is polled, and
//! it resolves once. Nothing is retried or cached.
//!
//! The controller depends on the [`FormationApi`] and [`ReservationApi`]
//! traits rather than on the concrete clients, so tests can inject doubles.

pub mod error;
pub mod formation;
pub mod reservation;

use crate::types::{Formation, ReservationRequest};
use reqwest::Response;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub use error::ApiError;
pub use formation::FormationClient;
pub use reservation::ReservationClient;

/// Result of a formation service call
pub type ApiResult<T> = Result<T, ApiError>;

/// Boxed future returned by the API traits
pub type ApiFuture<T> = Pin<Box<dyn Future<Output = ApiResult<T>> + Send>>;

/// Read access to the formation listing
pub trait FormationApi: Send + Sync {
    /// Fetch every formation, in the order the service returns them
    ///
    /// # Errors
    ///
    /// The future fails on transport errors, non-2xx statuses and bodies
    /// that are not a JSON array of formations.
    fn all_formations(&self) -> ApiFuture<Vec<Formation>>;
}

/// Write access to reservations
pub trait ReservationApi: Send + Sync {
    /// Submit a reservation; the response body is ignored
    ///
    /// # Errors
    ///
    /// The future fails on transport errors and non-2xx statuses.
    fn create_reservation(&self, request: ReservationRequest) -> ApiFuture<()>;
}

/// Builds the shared `reqwest` client used by both services
///
/// # Errors
///
/// Returns `ApiError::RequestFailed` if the TLS backend cannot be initialised.
pub fn http_client(timeout: Duration) -> ApiResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ApiError::RequestFailed(e.to_string()))
}

/// Strips trailing slashes so endpoint paths can be appended verbatim
pub(crate) fn normalize_base_url(base_url: impl Into<String>) -> String {
    let base_url = base_url.into();
    base_url.trim_end_matches('/').to_string()
}

/// Turns a non-2xx response into `ApiError::Status`
pub(crate) async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Label used for request metrics
pub(crate) const fn outcome_label<T>(result: &ApiResult<T>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(ApiError::RequestFailed(_)) => "transport_error",
        Err(ApiError::Status { .. }) => "status_error",
        Err(ApiError::ResponseParseFailed(_)) => "parse_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:8089/formation-service/"),
            "http://localhost:8089/formation-service"
        );
        assert_eq!(normalize_base_url("http://h"), "http://h");
    }

    #[test]
    fn test_outcome_label() {
        assert_eq!(outcome_label(&Ok::<(), ApiError>(())), "success");
        assert_eq!(
            outcome_label::<()>(&Err(ApiError::Status {
                status: 500,
                message: String::new()
            })),
            "status_error"
        );
    }
}
