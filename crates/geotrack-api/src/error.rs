use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geotrack_core::error::GeotrackError;
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<GeotrackError> for ApiError {
    fn from(err: GeotrackError) -> Self {
        match &err {
            GeotrackError::Validation { .. } => {
                Self::bad_request("Invalid request").with_details(err.to_string())
            }
            GeotrackError::NotFound { .. } => Self::not_found(err.to_string()),
            GeotrackError::Dependency { .. } => {
                tracing::error!(error = %err, "Collaborator failure");
                Self::bad_gateway("Upstream dependency failed").with_details(err.to_string())
            }
            _ => {
                tracing::error!(error = %err, "Internal error");
                Self::internal("Internal error").with_details(err.to_string())
            }
        }
    }
}
