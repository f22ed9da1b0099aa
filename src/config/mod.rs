// src/config/mod.rs
pub mod ai;

pub use ai::{AiConfig, AiSettings, AzureLanguageConfig, AzureOpenAiConfig};
