//! # Returns service
//! Orchestrates the analyze / root-causes / copilot flows over injected AI
//! collaborators and the single-slot analysis cache.

use std::sync::Arc;
use std::time::Instant;

use metrics::counter;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::ai::{DynCompletion, DynExtractor};
use crate::cache::AnalysisCache;
use crate::error::ServiceError;
use crate::metrics::{
    observe_upstream, ANALYZED_RECORDS_TOTAL, ANALYZE_TOTAL, COPILOT_TOTAL,
    SUMMARY_UNPARSEABLE_TOTAL,
};
use crate::model::{collect_reasons, AnalysisResult, ReturnRecord, RootCause};
use crate::prompts;
use crate::summary::{dominant_reasons, parse_summary, strip_code_fences, ParsedSummary};

/// Answer given when the copilot is asked before any analysis exists.
pub const NO_ANALYSIS_ANSWER: &str =
    "No analysis data available yet. Please upload return data first.";

/// Output of the model-driven root-cause generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedRootCauses {
    /// Parsed JSON array, or empty when the model text was not a JSON array.
    pub root_causes: Vec<Value>,
    /// Fence-stripped model text.
    pub raw: String,
    pub parsed: bool,
}

pub struct ReturnsService {
    completion: DynCompletion,
    extractor: DynExtractor,
    cache: AnalysisCache,
}

impl ReturnsService {
    pub fn new(completion: DynCompletion, extractor: DynExtractor) -> Self {
        Self {
            completion,
            extractor,
            cache: AnalysisCache::new(),
        }
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Extract signals from reasons, summarize the records, and replace the cache.
    /// On any upstream failure the previous cache contents are left untouched.
    pub async fn analyze(
        &self,
        records: &[ReturnRecord],
    ) -> Result<Arc<AnalysisResult>, ServiceError> {
        let reasons = collect_reasons(records);
        debug!(records = records.len(), reasons = reasons.len(), "analyze start");

        let started = Instant::now();
        let extracted = self.extractor.extract(&reasons).await;
        observe_upstream("signal_extraction", started, extracted.is_ok());
        let language_signals = extracted.map_err(ServiceError::SignalExtraction)?;

        let started = Instant::now();
        let summarized = self
            .completion
            .complete(&prompts::summarize_returns(records))
            .await;
        observe_upstream("summarizer", started, summarized.is_ok());
        let raw_summary = summarized.map_err(ServiceError::Summarizer)?;

        let stored = self.cache.store(AnalysisResult {
            language_signals,
            analysis_summary: strip_code_fences(&raw_summary),
            total_returns: records.len(),
        });

        counter!(ANALYZE_TOTAL).increment(1);
        counter!(ANALYZED_RECORDS_TOTAL).increment(records.len() as u64);
        info!(
            total_returns = stored.total_returns,
            reasons = reasons.len(),
            summary_len = stored.analysis_summary.len(),
            provider = self.completion.provider_name(),
            "analysis stored"
        );
        Ok(stored)
    }

    /// Project `dominant_reasons` of the cached summary into root causes.
    /// Empty cache or unparseable summary yields an empty list.
    pub fn root_causes(&self) -> Vec<RootCause> {
        let Some(current) = self.cache.snapshot() else {
            return Vec::new();
        };

        let summary = match parse_summary(&current.analysis_summary) {
            ParsedSummary::Parsed(v) => v,
            ParsedSummary::Unparseable(reason) => {
                counter!(SUMMARY_UNPARSEABLE_TOTAL).increment(1);
                warn!(%reason, "cached analysis summary is not JSON; no root causes");
                return Vec::new();
            }
        };

        dominant_reasons(&summary)
            .into_iter()
            .map(RootCause::open)
            .collect()
    }

    /// Answer a question grounded in the cached analysis. Without an analysis
    /// the fixed [`NO_ANALYSIS_ANSWER`] is returned and no model call is made.
    pub async fn copilot(&self, question: &str) -> Result<String, ServiceError> {
        let Some(current) = self.cache.snapshot() else {
            counter!(COPILOT_TOTAL, "outcome" => "no_analysis").increment(1);
            return Ok(NO_ANALYSIS_ANSWER.to_string());
        };

        let context = json!({
            "analysis_summary": current.analysis_summary,
            "language_signals": current.language_signals,
            "total_returns": current.total_returns,
        });
        debug!(question_len = question.len(), "copilot question");

        let started = Instant::now();
        let answered = self
            .completion
            .complete(&prompts::copilot(question, &context))
            .await;
        observe_upstream("responder", started, answered.is_ok());
        match answered {
            Ok(answer) => {
                counter!(COPILOT_TOTAL, "outcome" => "answered").increment(1);
                Ok(answer.trim().to_string())
            }
            Err(e) => {
                counter!(COPILOT_TOTAL, "outcome" => "error").increment(1);
                Err(ServiceError::Responder(e))
            }
        }
    }

    /// Ask the model for structured root causes over `records`. Stateless: the
    /// cache is neither read nor written.
    pub async fn generate_root_causes(
        &self,
        records: &[ReturnRecord],
    ) -> Result<GeneratedRootCauses, ServiceError> {
        let started = Instant::now();
        let generated = self
            .completion
            .complete(&prompts::generate_root_causes(records))
            .await;
        observe_upstream("root_cause_generator", started, generated.is_ok());
        let raw = generated.map_err(ServiceError::RootCauseGenerator)?;

        let (root_causes, parsed) = match parse_summary(&raw) {
            ParsedSummary::Parsed(Value::Array(items)) => (items, true),
            ParsedSummary::Parsed(other) => {
                warn!(kind = json_kind(&other), "generated root causes are not a JSON array");
                (Vec::new(), false)
            }
            ParsedSummary::Unparseable(reason) => {
                warn!(%reason, "generated root causes are not JSON");
                (Vec::new(), false)
            }
        };

        Ok(GeneratedRootCauses {
            root_causes,
            raw: strip_code_fences(&raw),
            parsed,
        })
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
