use std::time::Instant;

use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const ANALYZE_TOTAL: &str = "returns_analyze_total";
pub const ANALYZED_RECORDS_TOTAL: &str = "returns_analyzed_records_total";
pub const SUMMARY_UNPARSEABLE_TOTAL: &str = "returns_summary_unparseable_total";
pub const COPILOT_TOTAL: &str = "returns_copilot_total";
pub const UPSTREAM_ERRORS_TOTAL: &str = "returns_upstream_errors_total";
pub const UPSTREAM_DURATION_MS: &str = "returns_upstream_duration_ms";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the process-wide Prometheus recorder. Fails if one is already
    /// installed; without a recorder the macros below are no-ops.
    pub fn install() -> anyhow::Result<Self> {
        // Use default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new().install_recorder()?;
        describe();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!(ANALYZE_TOTAL, "Completed /analyze runs.");
    describe_counter!(ANALYZED_RECORDS_TOTAL, "Return records submitted to /analyze.");
    describe_counter!(
        SUMMARY_UNPARSEABLE_TOTAL,
        "Cached summaries that were not JSON when root causes were read."
    );
    describe_counter!(COPILOT_TOTAL, "Copilot questions by outcome.");
    describe_counter!(UPSTREAM_ERRORS_TOTAL, "Failed calls to AI collaborators.");
    describe_histogram!(UPSTREAM_DURATION_MS, "AI collaborator call latency in milliseconds.");
}

/// Record latency (and failure, if any) of one collaborator call.
pub fn observe_upstream(collaborator: &'static str, started: Instant, ok: bool) {
    histogram!(UPSTREAM_DURATION_MS, "collaborator" => collaborator)
        .record(started.elapsed().as_secs_f64() * 1000.0);
    if !ok {
        counter!(UPSTREAM_ERRORS_TOTAL, "collaborator" => collaborator).increment(1);
    }
}
