//! Permissive response body decoding
//!
//! Backends have answered with JSON objects, JSON strings containing JSON,
//! Markdown-fenced JSON and plain text. Decoding never fails; anything that
//! is not JSON is kept as raw text.

use serde_json::Value;

/// Maximum length of an error detail shown to the caller
const MAX_DETAIL_LEN: usize = 300;

/// Fields searched (in order) for a service-supplied error message
const DETAIL_FIELDS: &[&str] = &["detail", "error", "message"];

/// A decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Structured JSON
    Json(Value),
    /// Undecodable text, kept verbatim
    Text(String),
}

impl Body {
    /// The JSON object, if the body is one
    #[must_use]
    pub fn as_object(&self) -> Option<&serde_json::Map<String, Value>> {
        match self {
            Body::Json(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Short description of the body shape, for error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Body::Json(Value::Object(_)) => "object",
            Body::Json(Value::Array(_)) => "array",
            Body::Json(Value::String(_)) => "string",
            Body::Json(Value::Number(_)) => "number",
            Body::Json(Value::Bool(_)) => "boolean",
            Body::Json(Value::Null) => "null",
            Body::Text(_) => "text",
        }
    }
}

/// Decode a response body
#[must_use]
pub fn decode_body(raw: &str) -> Body {
    let trimmed = raw.trim();

    if let Some(value) = parse_json(trimmed) {
        return Body::Json(value);
    }

    if let Some(value) = strip_code_fence(trimmed).and_then(parse_json) {
        return Body::Json(value);
    }

    Body::Text(raw.to_string())
}

fn parse_json(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text).ok()? {
        // Double-encoded: a JSON string whose content is itself JSON
        Value::String(inner) => match serde_json::from_str::<Value>(inner.trim()) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
            _ => Some(Value::String(inner)),
        },
        value => Some(value),
    }
}

fn strip_code_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("```")?;
    // Drop the info string (e.g. "json") up to the first newline
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    let body = rest.trim_end().strip_suffix("```")?;
    Some(body.trim())
}

/// Pick the most specific message for a failed response
///
/// Prefers a `detail`/`error`/`message` field, then the raw body text, then
/// the HTTP status line.
#[must_use]
pub fn error_detail(body: &Body, raw: &str, status: u16, status_text: &str) -> String {
    if let Some(map) = body.as_object() {
        let field = DETAIL_FIELDS
            .iter()
            .filter_map(|name| map.get(*name))
            .find(|value| !value.is_null());
        if let Some(message) = field.and_then(message_text) {
            return truncate(&message);
        }
    }

    if let Body::Json(Value::String(text)) = body {
        if !text.trim().is_empty() {
            return truncate(text.trim());
        }
    }

    let raw = raw.trim();
    if !raw.is_empty() {
        return truncate(raw);
    }

    format!("HTTP {status} {status_text}").trim_end().to_string()
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Object(map) => ["message", "msg", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(message_text))
            .or_else(|| Some(value.to_string())),
        // FastAPI validation errors: [{"loc": [...], "msg": "..."}]
        Value::Array(list) => {
            let parts: Vec<String> = list.iter().filter_map(message_text).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        other => Some(other.to_string()),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_DETAIL_LEN {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_DETAIL_LEN).collect();
    format!("{cut}...(truncated)")
}
