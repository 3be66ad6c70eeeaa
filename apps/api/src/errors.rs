use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// An external service answered with a non-2xx status. Status and body
    /// are forwarded to the caller verbatim, never suppressed.
    #[error("Upstream error (status {status})")]
    Upstream { status: u16, body: Value },

    /// An LLM provider answered with a non-2xx status. Forwarded with a
    /// normalized `{error:{message, provider}}` envelope.
    #[error("Provider '{provider}' error (status {status}): {message}")]
    Provider {
        status: u16,
        provider: &'static str,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Consumes an upstream response known to be non-2xx and turns it into a
    /// pass-through error. JSON bodies stay JSON; anything else is wrapped as
    /// a string.
    pub async fn from_upstream(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
        AppError::Upstream { status, body }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => error_envelope(StatusCode::NOT_FOUND, "NOT_FOUND", &msg),
            AppError::Validation(msg) => {
                error_envelope(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", &msg)
            }
            AppError::Unauthorized => error_envelope(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Missing bearer token",
            ),
            AppError::Upstream { status, body } => {
                tracing::warn!("Upstream returned {status}: {body}");
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, Json(body)).into_response()
            }
            AppError::Provider {
                status,
                provider,
                message,
            } => {
                tracing::warn!("Provider '{provider}' returned {status}: {message}");
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                let body = Json(json!({
                    "error": { "message": message, "provider": provider }
                }));
                (status, body).into_response()
            }
            AppError::Http(e) => {
                tracing::error!("Outbound HTTP error: {e}");
                error_envelope(
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNREACHABLE",
                    &e.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                error_envelope(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    &e.to_string(),
                )
            }
        }
    }
}

fn error_envelope(status: StatusCode, code: &str, message: &str) -> Response {
    let body = Json(json!({
        "error": {
            "code": code,
            "message": message
        }
    }));
    (status, body).into_response()
}
