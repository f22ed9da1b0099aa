// src/prompts.rs
//! Prompt templates and sampling parameters for every completion the service makes.

use serde_json::Value;

use crate::ai::{ChatPrompt, CompletionParams};
use crate::model::ReturnRecord;

pub const SUMMARY_PARAMS: CompletionParams = CompletionParams {
    temperature: 0.2,
    max_tokens: 400,
};
pub const COPILOT_PARAMS: CompletionParams = CompletionParams {
    temperature: 0.3,
    max_tokens: 300,
};
pub const ROOT_CAUSE_PARAMS: CompletionParams = CompletionParams {
    temperature: 0.25,
    max_tokens: 700,
};

const SUMMARY_SYSTEM: &str = "You analyze return datasets.";

const SUMMARY_TASK: &str = "You are an AI system analyzing e-commerce return data.

Your task:
- detect major return patterns
- extract high-level insights
- summarize key signals for downstream reasoning

Return JSON with:
- total_returns
- top_skus
- dominant_reasons
- confidence (low/medium/high)";

const ROOT_CAUSE_SYSTEM: &str = "You perform root cause analysis.";

const ROOT_CAUSE_TASK: &str = "You are an AI specialized in root cause analysis.

From the return data below:
- group related issues
- assign root causes
- include confidence and impact

Return JSON array with:
- id
- title
- description
- affected_skus
- confidence (0-1)
- priority (high/medium/low)";

const COPILOT_SYSTEM: &str = "You are an AI Copilot for a Return Intelligence platform.

Rules:
- Answer ONLY using provided data
- Be concise, analytical, business-friendly
- Prioritize actionable recommendations
- Avoid hallucination";

fn records_block(records: &[ReturnRecord]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
}

/// Summarization prompt over the full record list.
pub fn summarize_returns(records: &[ReturnRecord]) -> ChatPrompt {
    ChatPrompt {
        system: SUMMARY_SYSTEM.to_string(),
        user: format!("{SUMMARY_TASK}\n\nDATA:\n{}\n", records_block(records)),
        params: SUMMARY_PARAMS,
    }
}

/// Model-generated root causes over the full record list.
pub fn generate_root_causes(records: &[ReturnRecord]) -> ChatPrompt {
    ChatPrompt {
        system: ROOT_CAUSE_SYSTEM.to_string(),
        user: format!("{ROOT_CAUSE_TASK}\n\nDATA:\n{}\n", records_block(records)),
        params: ROOT_CAUSE_PARAMS,
    }
}

/// Copilot prompt: the question plus the analysis context it must stay within.
pub fn copilot(question: &str, context: &Value) -> ChatPrompt {
    let context_text = serde_json::to_string_pretty(context).unwrap_or_else(|_| "{}".to_string());
    ChatPrompt {
        system: COPILOT_SYSTEM.to_string(),
        user: format!(
            "QUESTION:\n{question}\n\nCONTEXT (analysis + root causes):\n{context_text}\n"
        ),
        params: COPILOT_PARAMS,
    }
}
