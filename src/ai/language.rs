//! Azure AI Language client: per-reason sentiment and key phrases, folded into
//! one signals object for the analysis cache.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use super::{ensure_success, http_client, SignalExtractor};
use crate::config::AzureLanguageConfig;

/// Synchronous analyze-text accepts at most this many documents per task call.
pub const MAX_DOCUMENTS_PER_REQUEST: usize = 10;
/// Service limit is 5,120 characters per document; stay under it.
const MAX_DOCUMENT_CHARS: usize = 5_000;
const TOP_KEY_PHRASES: usize = 10;
const DOCUMENT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Signals for one submitted reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSignal {
    pub id: String,
    pub text: String,
    /// `positive` | `neutral` | `negative` | `mixed`; `None` when the service rejected the document.
    pub sentiment: Option<String>,
    pub confidence_scores: Option<ConfidenceScores>,
    pub key_phrases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub mixed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseCount {
    pub phrase: String,
    pub count: usize,
}

/// The signals object stored as `language_signals`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageSignals {
    pub documents: Vec<DocumentSignal>,
    pub sentiment_counts: SentimentCounts,
    pub top_key_phrases: Vec<PhraseCount>,
}

impl LanguageSignals {
    /// Fold per-document results into counts and the most frequent phrases.
    pub fn from_documents(documents: Vec<DocumentSignal>) -> Self {
        let mut counts = SentimentCounts::default();
        // lowercase phrase -> (first spelling seen, count)
        let mut phrases: HashMap<String, (String, usize)> = HashMap::new();

        for doc in &documents {
            match doc.sentiment.as_deref() {
                Some("positive") => counts.positive += 1,
                Some("neutral") => counts.neutral += 1,
                Some("negative") => counts.negative += 1,
                Some("mixed") => counts.mixed += 1,
                _ => {}
            }
            for p in &doc.key_phrases {
                let entry = phrases
                    .entry(p.to_lowercase())
                    .or_insert_with(|| (p.clone(), 0));
                entry.1 += 1;
            }
        }

        let mut top: Vec<PhraseCount> = phrases
            .into_values()
            .map(|(phrase, count)| PhraseCount { phrase, count })
            .collect();
        top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.phrase.cmp(&b.phrase)));
        top.truncate(TOP_KEY_PHRASES);

        Self {
            documents,
            sentiment_counts: counts,
            top_key_phrases: top,
        }
    }

    pub fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| json!({}))
    }
}

pub struct AzureLanguageClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl AzureLanguageClient {
    pub fn new(cfg: &AzureLanguageConfig, timeout: std::time::Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            url: format!(
                "{}/language/:analyze-text?api-version={}",
                cfg.endpoint.trim_end_matches('/'),
                cfg.api_version
            ),
            api_key: cfg.api_key.clone(),
        })
    }

    async fn run_task(&self, kind: &str, docs: &[InputDoc<'_>]) -> Result<TaskResults> {
        let body = json!({
            "kind": kind,
            "analysisInput": { "documents": docs },
            "parameters": {},
        });
        let resp = self
            .http
            .post(&self.url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("azure language {kind} request"))?;
        let resp = ensure_success(resp, "azure language").await?;
        let out: TaskResponse = resp
            .json()
            .await
            .with_context(|| format!("decoding azure language {kind} response"))?;
        for e in &out.results.errors {
            warn!(kind, id = %e.id, code = %e.error.code, "language document rejected");
        }
        Ok(out.results)
    }
}

#[derive(Serialize)]
struct InputDoc<'a> {
    id: String,
    language: &'a str,
    text: String,
}

#[derive(Deserialize)]
struct TaskResponse {
    results: TaskResults,
}

#[derive(Deserialize)]
struct TaskResults {
    #[serde(default)]
    documents: Vec<ResultDoc>,
    #[serde(default)]
    errors: Vec<DocError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultDoc {
    id: String,
    #[serde(default)]
    sentiment: Option<String>,
    #[serde(default)]
    confidence_scores: Option<ConfidenceScores>,
    #[serde(default)]
    key_phrases: Vec<String>,
}

#[derive(Deserialize)]
struct DocError {
    id: String,
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
}

#[async_trait]
impl SignalExtractor for AzureLanguageClient {
    async fn extract(&self, texts: &[String]) -> Result<Value> {
        let mut documents = Vec::with_capacity(texts.len());

        for (chunk_no, chunk) in texts.chunks(MAX_DOCUMENTS_PER_REQUEST).enumerate() {
            let base = chunk_no * MAX_DOCUMENTS_PER_REQUEST;
            let docs: Vec<InputDoc> = chunk
                .iter()
                .enumerate()
                .map(|(i, t)| InputDoc {
                    id: (base + i).to_string(),
                    language: DOCUMENT_LANGUAGE,
                    text: t.chars().take(MAX_DOCUMENT_CHARS).collect(),
                })
                .collect();

            let sentiment = self.run_task("SentimentAnalysis", &docs).await?;
            let phrases = self.run_task("KeyPhraseExtraction", &docs).await?;

            let mut by_id: HashMap<String, ResultDoc> = sentiment
                .documents
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect();
            let mut phrases_by_id: HashMap<String, Vec<String>> = phrases
                .documents
                .into_iter()
                .map(|d| (d.id, d.key_phrases))
                .collect();

            for (doc, text) in docs.iter().zip(chunk) {
                let s = by_id.remove(&doc.id);
                documents.push(DocumentSignal {
                    id: doc.id.clone(),
                    text: text.clone(),
                    sentiment: s.as_ref().and_then(|d| d.sentiment.clone()),
                    confidence_scores: s.and_then(|d| d.confidence_scores),
                    key_phrases: phrases_by_id.remove(&doc.id).unwrap_or_default(),
                });
            }
        }

        Ok(LanguageSignals::from_documents(documents).into_value())
    }

    fn provider_name(&self) -> &'static str {
        "azure-language"
    }
}
