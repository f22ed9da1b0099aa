//! # Data model
//! Return records as submitted by clients, the cached analysis result, and the
//! root-cause projection served to the dashboard.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One customer return entry. The schema is open: every field the client sends
/// is kept and forwarded to the summarizer; only `reason` is read here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnRecord(pub Map<String, Value>);

impl ReturnRecord {
    /// The free-text `reason`, if present, a string, and non-empty.
    pub fn reason(&self) -> Option<&str> {
        self.0
            .get("reason")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

impl From<Map<String, Value>> for ReturnRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Every non-empty reason across `records`, in input order, duplicates kept.
pub fn collect_reasons(records: &[ReturnRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(ReturnRecord::reason)
        .map(str::to_string)
        .collect()
}

/// The single cached aggregation. Built completely before it is published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub language_signals: Value,
    pub analysis_summary: String,
    pub total_returns: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CauseStatus {
    Open,
}

/// Display projection of one dominant reason. Confidence and status are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootCause {
    pub reason: String,
    pub confidence: Confidence,
    pub status: CauseStatus,
}

impl RootCause {
    pub fn open(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            confidence: Confidence::High,
            status: CauseStatus::Open,
        }
    }
}
