use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::{ModelError, Result};

/// How much of the offending input to echo back in parse errors.
const ERROR_HEAD_CHARS: usize = 200;

/// Remove a surrounding Markdown code fence (```json … ```), if any.
pub fn strip_fences(input: &str) -> &str {
    let s = input.trim();
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    // Drop the info string (e.g. `json`) on the opening fence line.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Drop trailing commas before `}` / `]` and normalize curly quotes.
pub fn soften(json: &str) -> String {
    static TRAILING_COMMA: OnceLock<Regex> = OnceLock::new();
    let re = TRAILING_COMMA.get_or_init(|| Regex::new(r",\s*([}\]])").expect("valid regex"));
    re.replace_all(json, "$1")
        .replace(['\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'], "\"")
}

/// Parse model output that is *supposed* to be JSON.
///
/// Tries the fence-stripped text verbatim first, then a softened copy.
/// The error reports the softened input's head so callers can see what the
/// model actually said.
pub fn parse_json_loose(input: &str) -> Result<Value> {
    let stripped = strip_fences(input);
    if let Ok(v) = serde_json::from_str(stripped) {
        return Ok(v);
    }
    let softened = soften(stripped);
    serde_json::from_str(&softened).map_err(|source| ModelError::Parse {
        head: softened.chars().take(ERROR_HEAD_CHARS).collect(),
        source,
    })
}
