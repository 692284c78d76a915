//! Error taxonomy for the gateway and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors surfaced to HTTP callers
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Malformed body, out-of-range field or missing query parameter
    #[error("{0}")]
    BadRequest(String),

    /// No matching city or an empty result set
    #[error("{0}")]
    NotFound(String),

    /// Transport failure talking to an upstream provider
    #[error("Outbound Call: {0}")]
    OutboundCall(#[source] reqwest::Error),

    /// Upstream body did not decode into the expected shape
    #[error("Parse Response: {0}")]
    ParseResponse(#[source] serde_json::Error),

    #[error("Too Many Requests")]
    RateLimited,
}

impl GatewayError {
    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::OutboundCall(_) | Self::ParseResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        // Upstream causes are passed through to the caller verbatim.
        (self.status_code(), self.to_string()).into_response()
    }
}
