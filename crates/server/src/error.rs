use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::store::StoreError;
use crate::whatsapp::WhatsAppError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Webhook verification failed")]
    VerificationFailed,

    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] tonbot::PipelineError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("WhatsApp error: {0}")]
    WhatsApp(#[from] WhatsAppError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::VerificationFailed | ServerError::InvalidSignature => StatusCode::FORBIDDEN,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Pipeline(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::WhatsApp(_) => StatusCode::BAD_GATEWAY,
            ServerError::Store(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::VerificationFailed => "VERIFICATION_FAILED",
            ServerError::InvalidSignature => "INVALID_SIGNATURE",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::Pipeline(_) => "PIPELINE_ERROR",
            ServerError::Store(_) => "STORE_ERROR",
            ServerError::WhatsApp(_) => "WHATSAPP_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        });

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::BadRequest(format!("JSON parse error: {err}"))
    }
}

impl From<tonbot::ConfigLoadError> for ServerError {
    fn from(err: tonbot::ConfigLoadError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<intent::IntentError> for ServerError {
    fn from(err: intent::IntentError) -> Self {
        ServerError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_code_pairs() {
        let cases = [
            (ServerError::VerificationFailed, StatusCode::FORBIDDEN, "VERIFICATION_FAILED"),
            (ServerError::NotFound, StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                ServerError::Pipeline(tonbot::PipelineError::NoTextMessage),
                StatusCode::UNPROCESSABLE_ENTITY,
                "PIPELINE_ERROR",
            ),
            (
                ServerError::WhatsApp(WhatsAppError::Api("Invalid parameter".into())),
                StatusCode::BAD_GATEWAY,
                "WHATSAPP_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.error_code(), code);
        }
    }

    #[test]
    fn json_parse_errors_are_bad_requests() {
        let err: ServerError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ServerError::BadRequest(_)));
    }

    #[tokio::test]
    async fn response_body_is_error_envelope() {
        use http_body_util::BodyExt;

        let response = ServerError::VerificationFailed.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let parsed: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.error.code, "VERIFICATION_FAILED");
        assert_eq!(parsed.error.message, "Webhook verification failed");
    }
}
