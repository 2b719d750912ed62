use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::llm::CompletionError;
use crate::report::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("API key not configured on server")]
    Configuration,
    #[error("upstream returned {status}: {message}")]
    UpstreamStatus { status: u16, message: String },
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),
    #[error("Unexpected response format from Gemini API")]
    UnexpectedShape,
    #[error("{message}")]
    RateLimited {
        message: &'static str,
        window: Duration,
        reset_in: Duration,
        limit: Option<u32>,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<CompletionError> for AppError {
    fn from(e: CompletionError) -> Self {
        match e {
            CompletionError::Status { status, message } => {
                AppError::UpstreamStatus { status, message }
            }
            CompletionError::Unreachable(e) => AppError::UpstreamUnreachable(e.to_string()),
            CompletionError::UnexpectedFormat => AppError::UnexpectedShape,
            CompletionError::Local(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::UpstreamUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Configuration
            | AppError::UnexpectedShape
            | AppError::Render(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(msg) => json!({ "error": msg }),
            AppError::Configuration => json!({ "error": self.to_string() }),
            AppError::UpstreamStatus { message, .. } => json!({
                "error": "Failed to get comparison from Gemini API",
                "details": message,
            }),
            AppError::UpstreamUnreachable(e) => {
                tracing::warn!(error = %e, "completion API unreachable");
                json!({
                    "error": "Unable to reach Gemini API",
                    "details": "Please check your internet connection",
                })
            }
            AppError::UnexpectedShape => json!({
                "error": "Internal server error",
                "details": self.to_string(),
            }),
            AppError::RateLimited {
                message,
                window,
                limit,
                ..
            } => {
                let mut body = json!({
                    "error": message,
                    "retryAfter": humanize(*window),
                });
                if let Some(limit) = limit {
                    body["limit"] = json!(limit);
                }
                body
            }
            AppError::Render(e) => {
                tracing::error!(error = %e, "PDF generation failed");
                json!({ "error": "Failed to generate PDF", "details": e.to_string() })
            }
            AppError::Internal(e) => {
                tracing::error!(error = ?e, "internal error");
                json!({ "error": "Internal server error", "details": e.to_string() })
            }
        };

        let mut response = (status, Json(body)).into_response();
        if let AppError::RateLimited { reset_in, .. } = &self {
            if let Ok(value) = HeaderValue::from_str(&reset_in.as_secs().max(1).to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

/// "15 minutes", "1 minute", "30 seconds".
pub(crate) fn humanize(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        let minutes = secs / 60;
        format!("{minutes} minute{}", if minutes == 1 { "" } else { "s" })
    } else {
        format!("{secs} second{}", if secs == 1 { "" } else { "s" })
    }
}
