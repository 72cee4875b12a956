use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::services::normalizer::ParseFailure;

/// User-facing message for any upstream failure, transport or parse
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to get movie recommendations";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Parse failure: {0}")]
    Parse(#[from] ParseFailure),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Session is already fetching recommendations")]
    SessionBusy,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

/// Failure classification reported alongside the error message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidInput,
    TransportFailure,
    ParseFailure,
    SessionNotFound,
    SessionBusy,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::InvalidInput(_) => FailureKind::InvalidInput,
            AppError::HttpClient(_) | AppError::ExternalApi(_) => FailureKind::TransportFailure,
            AppError::Parse(_) => FailureKind::ParseFailure,
            AppError::SessionNotFound(_) => FailureKind::SessionNotFound,
            AppError::SessionBusy => FailureKind::SessionBusy,
            AppError::Internal(_) => FailureKind::Internal,
        }
    }

    /// Message safe to show to an end user
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::HttpClient(_) | AppError::ExternalApi(_) | AppError::Parse(_) => {
                UPSTREAM_FAILURE_MESSAGE.to_string()
            }
            AppError::SessionNotFound(_) | AppError::SessionBusy | AppError::Internal(_) => {
                self.to_string()
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            FailureKind::InvalidInput => StatusCode::BAD_REQUEST,
            FailureKind::TransportFailure | FailureKind::ParseFailure => StatusCode::BAD_GATEWAY,
            FailureKind::SessionNotFound => StatusCode::NOT_FOUND,
            FailureKind::SessionBusy => StatusCode::CONFLICT,
            FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.user_message(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_and_parse_share_user_message() {
        let transport = AppError::ExternalApi("status 503".to_string());
        let parse = AppError::Parse(ParseFailure::NoJson);

        assert_eq!(transport.user_message(), UPSTREAM_FAILURE_MESSAGE);
        assert_eq!(parse.user_message(), UPSTREAM_FAILURE_MESSAGE);
        assert_ne!(transport.kind(), parse.kind());
    }

    #[test]
    fn test_invalid_input_keeps_message() {
        let err = AppError::InvalidInput("Favorite movie is required".to_string());
        assert_eq!(err.user_message(), "Favorite movie is required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::SessionBusy.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::SessionNotFound(Uuid::new_v4()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Parse(ParseFailure::NotAnArray).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_failure_kind_serialization() {
        let json = serde_json::to_string(&FailureKind::TransportFailure).unwrap();
        assert_eq!(json, "\"transport_failure\"");
    }
}
