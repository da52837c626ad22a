//! Text normalisation for behavioural step arguments.

use serde_json::Value;

/// Strips one layer of matching single or double quotes from a value.
#[must_use]
pub fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    if let Some(stripped) = trimmed.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        return stripped;
    }
    if let Some(stripped) = trimmed
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
    {
        return stripped;
    }
    trimmed
}

/// Normalizes a scalar placeholder by trimming and unquoting one outer layer.
#[must_use]
pub fn normalize_scalar(value: &str) -> String {
    unquote(value).trim().to_owned()
}

/// Interprets a step argument as JSON, falling back to the unquoted text as a
/// string. Single-quoted arguments are always strings, so `'true'` stays text.
#[must_use]
pub fn json_arg(value: &str) -> Value {
    let trimmed = value.trim();
    if trimmed.starts_with('\'') {
        return Value::String(normalize_scalar(trimmed));
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(normalize_scalar(trimmed)))
}
