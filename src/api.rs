use std::sync::Arc;

use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::ai::{DynCompletion, DynExtractor};
use crate::error::ServiceError;
use crate::model::{AnalysisResult, ReturnRecord, RootCause};
use crate::service::{GeneratedRootCauses, ReturnsService};

#[derive(Clone)]
pub struct AppState {
    service: Arc<ReturnsService>,
}

impl AppState {
    pub fn new(completion: DynCompletion, extractor: DynExtractor) -> Self {
        Self {
            service: Arc::new(ReturnsService::new(completion, extractor)),
        }
    }

    pub fn service(&self) -> &ReturnsService {
        &self.service
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/analyze", post(analyze))
        .route("/root_causes", post(root_causes))
        .route("/root_causes/generate", post(generate_root_causes))
        .route("/copilot", post(copilot))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct ReturnsReq {
    returns: Vec<ReturnRecord>,
}

#[derive(Serialize)]
struct AnalyzeResp {
    status: &'static str,
    analysis: AnalysisResult,
}

async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<ReturnsReq>,
) -> Result<Json<AnalyzeResp>, ServiceError> {
    let stored = state.service.analyze(&body.returns).await?;
    Ok(Json(AnalyzeResp {
        status: "ok",
        analysis: (*stored).clone(),
    }))
}

#[derive(Serialize)]
struct RootCausesResp {
    root_causes: Vec<RootCause>,
}

async fn root_causes(State(state): State<AppState>) -> Json<RootCausesResp> {
    Json(RootCausesResp {
        root_causes: state.service.root_causes(),
    })
}

async fn generate_root_causes(
    State(state): State<AppState>,
    Json(body): Json<ReturnsReq>,
) -> Result<Json<GeneratedRootCauses>, ServiceError> {
    let out = state.service.generate_root_causes(&body.returns).await?;
    Ok(Json(out))
}

#[derive(Deserialize)]
struct CopilotReq {
    question: String,
}

#[derive(Serialize)]
struct CopilotResp {
    answer: String,
}

async fn copilot(
    State(state): State<AppState>,
    Json(body): Json<CopilotReq>,
) -> Result<Json<CopilotResp>, ServiceError> {
    let answer = state.service.copilot(&body.question).await?;
    Ok(Json(CopilotResp { answer }))
}
