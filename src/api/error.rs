use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ErrorBody;
use crate::constants::messages;
use crate::services::DirectoryError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    InvalidInput(String),

    /// Provider failure. Only a generic message reaches the client.
    ExternalApiError { service: String, message: String },

    /// Missing provider setup; the message is meant for the operator.
    ConfigurationError(String),

    /// Server-side failure with a fixed public message; `detail` is logged.
    Failed {
        message: &'static str,
        detail: String,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ApiError::ExternalApiError { service, message } => {
                write!(f, "{} error: {}", service, message)
            }
            ApiError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            ApiError::Failed { message, detail } => write!(f, "{}: {}", message, detail),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::ExternalApiError { service, message } => {
                tracing::warn!("{} API error: {}", service, message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::SEARCH_FAILED.to_string(),
                )
            }
            ApiError::ConfigurationError(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Facility search is not configured: {}", msg),
                )
            }
            ApiError::Failed { message, detail } => {
                tracing::error!("{}: {}", message, detail);
                (StatusCode::INTERNAL_SERVER_ERROR, (*message).to_string())
            }
        };

        (status, Json(ErrorBody::new(error_message))).into_response()
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::InvalidInput(msg) => Self::InvalidInput(msg),
            DirectoryError::Configuration(msg) => Self::ConfigurationError(msg),
            DirectoryError::Upstream(message) => Self::ExternalApiError {
                service: "Places".to_string(),
                message,
            },
            DirectoryError::NotFound(msg) => Self::NotFound(msg),
            DirectoryError::Validation(msg) => Self::failed(messages::HISTORY_SAVE_FAILED, msg),
        }
    }
}

impl ApiError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ApiError::InvalidInput(msg.into())
    }

    pub fn failed(message: &'static str, detail: impl fmt::Display) -> Self {
        ApiError::Failed {
            message,
            detail: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (ApiError::invalid_input("x"), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ApiError::ConfigurationError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::failed(messages::HISTORY_SAVE_FAILED, "bad body"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn upstream_maps_to_generic_failure() {
        let err: ApiError = DirectoryError::Upstream("REQUEST_DENIED: bad key".into()).into();
        assert!(matches!(err, ApiError::ExternalApiError { .. }));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
