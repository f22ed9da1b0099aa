//! Service error type and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures of the external AI collaborators. Each wraps the upstream cause.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("summarizer failed: {0:#}")]
    Summarizer(anyhow::Error),

    #[error("signal extraction failed: {0:#}")]
    SignalExtraction(anyhow::Error),

    #[error("copilot responder failed: {0:#}")]
    Responder(anyhow::Error),

    #[error("root cause generator failed: {0:#}")]
    RootCauseGenerator(anyhow::Error),
}

impl ServiceError {
    /// Short label used for metrics and the public error body.
    pub fn collaborator(&self) -> &'static str {
        match self {
            ServiceError::Summarizer(_) => "summarizer",
            ServiceError::SignalExtraction(_) => "signal_extraction",
            ServiceError::Responder(_) => "responder",
            ServiceError::RootCauseGenerator(_) => "root_cause_generator",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        // Upstream detail stays in the logs.
        tracing::warn!(error = %self, "request failed on upstream AI call");
        let body = json!({ "error": format!("{} failed", self.collaborator()) });
        (StatusCode::BAD_GATEWAY, Json(body)).into_response()
    }
}
