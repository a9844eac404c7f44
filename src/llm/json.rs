//! Defensive parsing of LLM completion text.
//!
//! Callers pattern-match on [`LlmJson`] instead of relying on try/catch
//! control flow around `serde_json::from_str`.

/// Outcome of parsing an LLM reply as JSON
#[derive(Debug, Clone, PartialEq)]
pub enum LlmJson {
    Array(Vec<serde_json::Value>),
    Object(serde_json::Value),
    /// Not valid JSON; carries the original text
    Invalid(String),
}

impl LlmJson {
    pub fn as_array(&self) -> Option<&[serde_json::Value]> {
        match self {
            LlmJson::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&serde_json::Value> {
        match self {
            LlmJson::Object(value) => Some(value),
            _ => None,
        }
    }
}

/// Parse an LLM reply into JSON, tolerating the usual decoration: markdown
/// code fences and prose before/after the payload.
pub fn parse_llm_json(raw: &str) -> LlmJson {
    let cleaned = strip_code_fences(raw);

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(cleaned) {
        return classify(value, raw);
    }

    // Models sometimes wrap the payload in prose; try the outermost
    // bracketed/braced region.
    if let Some(slice) = outermost_json_slice(cleaned) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(slice) {
            return classify(value, raw);
        }
    }

    LlmJson::Invalid(raw.to_string())
}

fn classify(value: serde_json::Value, raw: &str) -> LlmJson {
    match value {
        serde_json::Value::Array(items) => LlmJson::Array(items),
        obj @ serde_json::Value::Object(_) => LlmJson::Object(obj),
        _ => LlmJson::Invalid(raw.to_string()),
    }
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };

    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn outermost_json_slice(text: &str) -> Option<&str> {
    let open = text.find(['[', '{'])?;
    let close_char = if text.as_bytes()[open] == b'[' { ']' } else { '}' };
    let close = text.rfind(close_char)?;
    (close > open).then(|| &text[open..=close])
}
