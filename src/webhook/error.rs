//! Error types for HTTP operations and payload delivery.

use thiserror::Error;

/// Error type for HTTP transport operations.
///
/// Describes what went wrong on the wire. Whether to try again is left to
/// the caller; nothing in this crate retries.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, refused connections, TLS
    /// failures and errors while reading the response body.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request did not complete within the transport timeout.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Error type for a single payload delivery.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The request could not be assembled.
    #[error("Failed to create HTTP request: {0}")]
    Request(String),

    /// The transport failed; passed through unchanged.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The endpoint answered with a non-2xx status.
    ///
    /// The response body is logged, not carried here.
    #[error("failed to send HTTP request - status code {}", status.as_u16())]
    Status {
        /// Status returned by the endpoint
        status: http::StatusCode,
    },
}

impl DeliveryError {
    /// Returns the response status for [`DeliveryError::Status`].
    #[must_use]
    pub const fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_numeric_code() {
        let error = DeliveryError::Status {
            status: http::StatusCode::INTERNAL_SERVER_ERROR,
        };

        assert_eq!(
            error.to_string(),
            "failed to send HTTP request - status code 500"
        );
        assert_eq!(error.status(), Some(http::StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn transport_error_is_transparent() {
        let error = DeliveryError::from(HttpError::Timeout);

        assert_eq!(error.to_string(), "Request timed out");
        assert_eq!(error.status(), None);
    }
}
