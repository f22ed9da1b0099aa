//! Azure OpenAI chat-completions client.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ensure_success, http_client, ChatPrompt, CompletionClient};
use crate::config::AzureOpenAiConfig;

pub struct AzureOpenAiProvider {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl AzureOpenAiProvider {
    pub fn new(cfg: &AzureOpenAiConfig, timeout: std::time::Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            url: completions_url(cfg),
            api_key: cfg.api_key.clone(),
        })
    }
}

/// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={version}`
pub fn completions_url(cfg: &AzureOpenAiConfig) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        cfg.endpoint.trim_end_matches('/'),
        cfg.deployment,
        cfg.api_version
    )
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionClient for AzureOpenAiProvider {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String> {
        let req = Req {
            messages: vec![
                Msg {
                    role: "system",
                    content: &prompt.system,
                },
                Msg {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: prompt.params.temperature,
            max_tokens: prompt.params.max_tokens,
        };

        let resp = self
            .http
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&req)
            .send()
            .await
            .context("azure openai request")?;
        let resp = ensure_success(resp, "azure openai").await?;
        let body: Resp = resp.json().await.context("decoding azure openai response")?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .ok_or_else(|| anyhow!("azure openai returned no message content"))
    }

    fn provider_name(&self) -> &'static str {
        "azure-openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_targets_deployment_and_version() {
        let cfg = AzureOpenAiConfig {
            endpoint: "https://contoso.openai.azure.com/".into(),
            api_key: "k".into(),
            api_version: "2024-02-01".into(),
            deployment: "returns-gpt".into(),
        };
        assert_eq!(
            completions_url(&cfg),
            "https://contoso.openai.azure.com/openai/deployments/returns-gpt/chat/completions?api-version=2024-02-01"
        );
    }
}
