//! AI collaborators: the completion seam (summaries, copilot answers, generated
//! root causes) and the language-signal seam, plus their Azure and mock backends.

pub mod azure_openai;
pub mod language;
pub mod mock;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Sampling knobs forwarded with each completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// One system + user exchange with its sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
    pub params: CompletionParams,
}

/// Chat completion provider. Returns the model text, trimmed.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String>;
    /// Provider name for logs and metrics labels.
    fn provider_name(&self) -> &'static str;
}

/// Extracts linguistic/sentiment signals from free text. The shape of the
/// returned value is owned by the provider and passed through untouched.
#[async_trait]
pub trait SignalExtractor: Send + Sync {
    async fn extract(&self, texts: &[String]) -> Result<Value>;
    fn provider_name(&self) -> &'static str;
}

pub type DynCompletion = Arc<dyn CompletionClient>;
pub type DynExtractor = Arc<dyn SignalExtractor>;

const USER_AGENT: &str = concat!("return-intelligence/", env!("CARGO_PKG_VERSION"));

/// Shared reqwest client for the Azure backends.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(5))
        .timeout(timeout)
        .build()
        .context("building HTTP client")
}

/// Turn a non-2xx upstream response into an error carrying status and a body excerpt.
pub(crate) async fn ensure_success(resp: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(300).collect();
    Err(anyhow!("{what} returned {status}: {excerpt}"))
}
