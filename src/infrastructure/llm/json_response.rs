use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(?P<body>.*?)\s*```\s*$").unwrap());

/// Parses a model reply as JSON, tolerating a Markdown code fence around it.
pub fn parse_json_reply(content: &str) -> Result<Value, serde_json::Error> {
    let body = CODE_FENCE
        .captures(content)
        .and_then(|c| c.name("body"))
        .map(|m| m.as_str())
        .unwrap_or(content);
    serde_json::from_str(body.trim())
}

/// Returns the array stored under `key`, or the reply itself when the model
/// answered with a bare array.
pub fn take_array(reply: Value, key: &str) -> Option<Vec<Value>> {
    match reply {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}
