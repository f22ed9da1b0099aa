//! Deterministic in-process collaborators for local runs (`AI_TEST_MODE=mock`)
//! and tests. They record what they were asked so callers can assert on it.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::language::{DocumentSignal, LanguageSignals};
use super::{ChatPrompt, CompletionClient, SignalExtractor};

/// Summary returned by the default mock so the dashboard has something to show.
pub const MOCK_SUMMARY: &str = r#"```json
{
  "total_returns": 0,
  "top_skus": [],
  "dominant_reasons": ["Size runs small", "Item arrived damaged"],
  "confidence": "medium"
}
```"#;

pub const MOCK_ANSWER: &str = "Most returns trace back to sizing; review the size chart for the top SKUs.";

/// Completion mock. Replies are served from a queue; once drained the
/// fallback reply is repeated. Failing mode errors on every call.
pub struct MockCompletion {
    replies: Mutex<VecDeque<String>>,
    fallback: String,
    fail: bool,
    prompts: Mutex<Vec<ChatPrompt>>,
}

impl MockCompletion {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: fallback.into(),
            fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Replies handed out in order, then `fallback` forever.
    pub fn scripted<I, S>(replies: I, fallback: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let m = Self::new(fallback);
        m.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(replies.into_iter().map(Into::into));
        m
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("")
        }
    }

    /// Every prompt received so far, oldest first.
    pub fn prompts(&self) -> Vec<ChatPrompt> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new(MOCK_SUMMARY)
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.clone());
        if self.fail {
            return Err(anyhow!("mock completion failure"));
        }
        let next = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Signal-extractor mock: marks every text neutral with no key phrases.
#[derive(Default)]
pub struct MockExtractor {
    fail: bool,
    inputs: Mutex<Vec<Vec<String>>>,
}

impl MockExtractor {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Text lists received so far, one entry per call.
    pub fn inputs(&self) -> Vec<Vec<String>> {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SignalExtractor for MockExtractor {
    async fn extract(&self, texts: &[String]) -> Result<Value> {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(texts.to_vec());
        if self.fail {
            return Err(anyhow!("mock extractor failure"));
        }
        let docs = texts
            .iter()
            .enumerate()
            .map(|(i, t)| DocumentSignal {
                id: i.to_string(),
                text: t.clone(),
                sentiment: Some("neutral".to_string()),
                confidence_scores: None,
                key_phrases: Vec::new(),
            })
            .collect();
        Ok(LanguageSignals::from_documents(docs).into_value())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts;

    #[tokio::test]
    async fn scripted_replies_drain_then_fall_back() {
        let m = MockCompletion::scripted(["one", "two"], "rest");
        let p = prompts::copilot("q", &serde_json::json!({}));
        assert_eq!(m.complete(&p).await.unwrap(), "one");
        assert_eq!(m.complete(&p).await.unwrap(), "two");
        assert_eq!(m.complete(&p).await.unwrap(), "rest");
        assert_eq!(m.calls(), 3);
    }

    #[tokio::test]
    async fn extractor_records_inputs_and_counts_neutral() {
        let m = MockExtractor::default();
        let v = m.extract(&["a".to_string(), "b".to_string()]).await.unwrap();
        assert_eq!(v["sentiment_counts"]["neutral"], 2);
        assert_eq!(m.inputs(), vec![vec!["a".to_string(), "b".to_string()]]);
    }
}
