// src/ai_bootstrap.rs
use crate::ai::azure_openai::AzureOpenAiProvider;
use crate::ai::language::AzureLanguageClient;
use crate::ai::mock::{MockCompletion, MockExtractor};
use crate::ai::{DynCompletion, DynExtractor};
use crate::config::AiSettings;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AiRuntime {
    pub completion: DynCompletion,
    pub extractor: DynExtractor,
}

impl AiRuntime {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_settings(&AiSettings::from_env()?)
    }

    pub fn from_settings(settings: &AiSettings) -> anyhow::Result<Self> {
        match settings {
            AiSettings::Mock => {
                warn!("AI_TEST_MODE=mock: using in-process mock collaborators");
                Ok(Self {
                    completion: Arc::new(MockCompletion::default()),
                    extractor: Arc::new(MockExtractor::default()),
                })
            }
            AiSettings::Azure(cfg) => {
                // Safe diagnostics: endpoints + deployment + key lengths only
                info!(
                    openai_endpoint = %cfg.openai.endpoint,
                    deployment = %cfg.openai.deployment,
                    api_version = %cfg.openai.api_version,
                    openai_key_len = cfg.openai.api_key.len(),
                    language_endpoint = %cfg.language.endpoint,
                    language_key_len = cfg.language.api_key.len(),
                    timeout_secs = cfg.timeout.as_secs(),
                    "AI cfg loaded"
                );
                Ok(Self {
                    completion: Arc::new(AzureOpenAiProvider::new(&cfg.openai, cfg.timeout)?),
                    extractor: Arc::new(AzureLanguageClient::new(&cfg.language, cfg.timeout)?),
                })
            }
        }
    }
}
