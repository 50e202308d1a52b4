//! Error types for the formation service clients

use thiserror::Error;

/// Errors that can occur when calling the formation service
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, timeout)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The service answered with a non-success status
    #[error("Service error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        message: String,
    },

    /// The response body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),
}
