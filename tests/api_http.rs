// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /analyze        (response shape, extractor input, total_returns)
// - POST /root_causes    (empty before analysis, projection after)
// - POST /copilot        (fixed answer before analysis, delegated after)
// - POST /root_causes/generate

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use return_intelligence::ai::mock::{MockCompletion, MockExtractor};
use return_intelligence::{router, AppState};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

const SUMMARY: &str = "```json\n{\"total_returns\": 2, \"dominant_reasons\": [\"wrong size\", \"damaged\"], \"confidence\": \"high\"}\n```";

fn test_router(completion: MockCompletion) -> (Router, Arc<MockCompletion>, Arc<MockExtractor>) {
    let completion = Arc::new(completion);
    let extractor = Arc::new(MockExtractor::default());
    let app = router(AppState::new(completion.clone(), extractor.clone()));
    (app, completion, extractor)
}

async fn post(app: &Router, uri: &str, payload: Option<Json>) -> (StatusCode, Json) {
    let mut req = Request::builder().method("POST").uri(uri);
    let body = match payload {
        Some(p) => {
            req = req.header("content-type", "application/json");
            Body::from(p.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(req.body(body).expect("build request"))
        .await
        .expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let v = serde_json::from_slice(&bytes).unwrap_or(Json::Null);
    (status, v)
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let (app, _, _) = test_router(MockCompletion::new(SUMMARY));

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");
    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).expect("utf8"), "ok");
}

#[tokio::test]
async fn analyze_returns_contract_and_forwards_reasons() {
    let (app, completion, extractor) = test_router(MockCompletion::new(SUMMARY));

    let (status, v) = post(
        &app,
        "/analyze",
        Some(json!({"returns": [
            {"sku": "A1", "reason": "wrong size"},
            {"sku": "A2", "reason": "damaged"}
        ]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["status"], "ok");
    let analysis = &v["analysis"];
    assert_eq!(analysis["total_returns"], 2);
    assert!(analysis["analysis_summary"].is_string(), "summary must be text");
    assert!(analysis.get("language_signals").is_some(), "missing 'language_signals'");
    assert!(
        !analysis["analysis_summary"].as_str().unwrap().contains("```"),
        "stored summary should be fence-free"
    );

    assert_eq!(
        extractor.inputs(),
        vec![vec!["wrong size".to_string(), "damaged".to_string()]]
    );
    assert_eq!(completion.calls(), 1);
    let prompt = &completion.prompts()[0];
    assert!(prompt.user.contains("\"sku\": \"A2\""), "records must reach the summarizer");
}

#[tokio::test]
async fn analyze_empty_list_reports_zero() {
    let (app, _, extractor) = test_router(MockCompletion::new(SUMMARY));

    let (status, v) = post(&app, "/analyze", Some(json!({"returns": []}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["analysis"]["total_returns"], 0);
    // Empty reason list is passed through as-is.
    assert_eq!(extractor.inputs(), vec![Vec::<String>::new()]);
}

#[tokio::test]
async fn analyze_rejects_body_without_returns() {
    let (app, completion, _) = test_router(MockCompletion::new(SUMMARY));
    let (status, _) = post(&app, "/analyze", Some(json!({"rows": []}))).await;
    assert!(status.is_client_error(), "got {status}");
    assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn root_causes_empty_before_any_analysis() {
    let (app, _, _) = test_router(MockCompletion::new(SUMMARY));
    let (status, v) = post(&app, "/root_causes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v, json!({"root_causes": []}));
}

#[tokio::test]
async fn root_causes_follow_dominant_reasons() {
    let (app, completion, _) = test_router(MockCompletion::new(SUMMARY));
    post(&app, "/analyze", Some(json!({"returns": [{"sku": "A1"}]}))).await;

    let (status, v) = post(&app, "/root_causes", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        v,
        json!({"root_causes": [
            {"reason": "wrong size", "confidence": "high", "status": "open"},
            {"reason": "damaged", "confidence": "high", "status": "open"}
        ]})
    );
    // Derived locally: only the analyze call reached the model.
    assert_eq!(completion.calls(), 1);
}

#[tokio::test]
async fn copilot_before_analysis_returns_fixed_answer_without_model_call() {
    let (app, completion, _) = test_router(MockCompletion::new("should not be used"));

    for q in ["What is the top reason?", ""] {
        let (status, v) = post(&app, "/copilot", Some(json!({"question": q}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            v["answer"],
            "No analysis data available yet. Please upload return data first."
        );
    }
    assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn copilot_after_analysis_returns_model_answer() {
    let (app, completion, _) = test_router(MockCompletion::scripted(
        [SUMMARY],
        "Sizing drives most returns; update the size chart.",
    ));
    post(&app, "/analyze", Some(json!({"returns": [{"reason": "too small"}]}))).await;

    let (status, v) = post(&app, "/copilot", Some(json!({"question": "Top issue?"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["answer"], "Sizing drives most returns; update the size chart.");

    let prompt = &completion.prompts()[1];
    assert!(prompt.user.contains("Top issue?"));
    assert!(prompt.user.contains("language_signals"));
}

#[tokio::test]
async fn generate_root_causes_is_stateless() {
    let (app, _, _) = test_router(MockCompletion::new(
        "[{\"id\": \"rc-1\", \"title\": \"Sizing\", \"priority\": \"high\"}]",
    ));

    let (status, v) = post(
        &app,
        "/root_causes/generate",
        Some(json!({"returns": [{"sku": "A1", "reason": "too small"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["parsed"], true);
    assert_eq!(v["root_causes"][0]["title"], "Sizing");

    // Nothing was cached by the generator.
    let (_, rc) = post(&app, "/root_causes", None).await;
    assert_eq!(rc, json!({"root_causes": []}));
}
