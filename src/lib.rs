// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod ai;
pub mod ai_bootstrap;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod prompts;
pub mod service;
pub mod summary;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::error::ServiceError;
pub use crate::service::ReturnsService;

use tracing::info;

/// Build the API router with collaborators wired from the environment
/// (Azure credentials, or mocks under `AI_TEST_MODE=mock`).
///
/// Load `.env` before calling this if you rely on it.
pub fn app() -> anyhow::Result<axum::Router> {
    let ai = ai_bootstrap::AiRuntime::from_env()?;
    info!(
        completion = ai.completion.provider_name(),
        extractor = ai.extractor.provider_name(),
        "AI collaborators ready"
    );
    Ok(router(AppState::new(ai.completion, ai.extractor)))
}
