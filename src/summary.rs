// src/summary.rs
//! Cleanup and best-effort parsing of model output that is supposed to be JSON.

use serde_json::Value;

/// Remove Markdown code-fence markers (```` ```json ```` and ```` ``` ````) anywhere
/// in the text, then trim surrounding whitespace. Idempotent.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Outcome of reading a summary as structured data.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedSummary {
    Parsed(Value),
    /// The text did not parse as JSON; carries the parser message.
    Unparseable(String),
}

/// Strip fences and parse. Never fails; malformed text becomes `Unparseable`.
pub fn parse_summary(raw: &str) -> ParsedSummary {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(v) => ParsedSummary::Parsed(v),
        Err(e) => ParsedSummary::Unparseable(e.to_string()),
    }
}

/// `dominant_reasons` of a parsed summary rendered as display strings.
/// Missing key, non-object summary, or non-array value all yield an empty list.
pub fn dominant_reasons(summary: &Value) -> Vec<String> {
    summary
        .get("dominant_reasons")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(render_reason).collect())
        .unwrap_or_default()
}

// Models sometimes emit {"reason": "...", "count": 3} instead of a bare string.
fn render_reason(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        Value::Object(map) => ["reason", "name"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| item.to_string()),
        other => other.to_string(),
    }
}
