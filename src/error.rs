use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failure of a single upstream metadata call
///
/// `Clone` so one outcome can be handed to every caller sharing an in-flight request.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("API error: {0}")]
    Status(u16),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{error}")]
    Upstream {
        error: String,
        message: Option<String>,
    },

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl AppError {
    /// Upstream failure reported with a fixed error label only
    pub fn upstream(error: &str) -> Self {
        AppError::Upstream {
            error: error.to_string(),
            message: None,
        }
    }

    /// Upstream failure reported with a label and the underlying reason
    pub fn upstream_with_reason(error: &str, reason: &FetchError) -> Self {
        AppError::Upstream {
            error: error.to_string(),
            message: Some(reason.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match self {
            AppError::InvalidInput(msg) => {
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Upstream {
                error,
                message: Some(message),
            } => json!({ "error": error, "message": message }),
            AppError::Upstream { error, message: None } => json!({ "error": error }),
            AppError::Backend(msg) => json!({ "error": msg }),
            AppError::HttpClient(_) => json!({ "error": self.to_string() }),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_bad_request() {
        let response = AppError::InvalidInput("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_is_internal_server_error() {
        let response =
            AppError::upstream_with_reason("Failed to fetch data", &FetchError::Status(503))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(FetchError::Status(404).to_string(), "API error: 404");
        assert_eq!(
            FetchError::Timeout(Duration::from_millis(8000)).to_string(),
            "Request timeout after 8s"
        );
    }
}
