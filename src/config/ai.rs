// src/config/ai.rs
use anyhow::{anyhow, Result};
use std::time::Duration;

pub const ENV_OPENAI_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_OPENAI_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_OPENAI_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const ENV_OPENAI_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";
pub const ENV_LANGUAGE_ENDPOINT: &str = "AZURE_LANGUAGE_ENDPOINT";
pub const ENV_LANGUAGE_KEY: &str = "AZURE_LANGUAGE_KEY";
pub const ENV_LANGUAGE_API_VERSION: &str = "AZURE_LANGUAGE_API_VERSION";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "AI_HTTP_TIMEOUT_SECS";
pub const ENV_TEST_MODE: &str = "AI_TEST_MODE";

pub const DEFAULT_LANGUAGE_API_VERSION: &str = "2023-04-01";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Azure OpenAI chat-completions deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureOpenAiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub deployment: String,
}

/// Azure AI Language resource used for sentiment + key phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureLanguageConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub openai: AzureOpenAiConfig,
    pub language: AzureLanguageConfig,
    pub timeout: Duration,
}

/// Which backends to wire at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiSettings {
    Azure(AiConfig),
    /// `AI_TEST_MODE=mock`: deterministic in-process clients, no credentials needed.
    Mock,
}

impl AiSettings {
    /// Read settings from the process environment (call `dotenvy::dotenv()` first).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |k: &str| get(k).ok_or_else(|| anyhow!("Missing {k} env var"));

        if get(ENV_TEST_MODE).is_some_and(|m| m.eq_ignore_ascii_case("mock")) {
            return Ok(AiSettings::Mock);
        }

        let openai = AzureOpenAiConfig {
            endpoint: normalize_endpoint(&require(ENV_OPENAI_ENDPOINT)?),
            api_key: require(ENV_OPENAI_API_KEY)?,
            api_version: require(ENV_OPENAI_API_VERSION)?,
            deployment: require(ENV_OPENAI_DEPLOYMENT)?,
        };
        let language = AzureLanguageConfig {
            endpoint: normalize_endpoint(&require(ENV_LANGUAGE_ENDPOINT)?),
            api_key: require(ENV_LANGUAGE_KEY)?,
            api_version: get(ENV_LANGUAGE_API_VERSION)
                .unwrap_or_else(|| DEFAULT_LANGUAGE_API_VERSION.to_string()),
        };

        let timeout_secs = match get(ENV_HTTP_TIMEOUT_SECS) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| anyhow!("{ENV_HTTP_TIMEOUT_SECS} must be a positive integer, got {raw:?}"))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(AiSettings::Azure(AiConfig {
            openai,
            language,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }
}

fn normalize_endpoint(raw: &str) -> String {
    raw.trim_end_matches('/').to_string()
}
