//! Embedded project templates.
//!
//! Templates live under `crates/appgen-core/templates/` and are compiled into
//! the binary. Every token in a text template sits inside a JS string
//! literal, so substituted values are string-escaped.

use rust_embed::Embed;
use std::collections::BTreeMap;

use crate::error::{AppgenError, Result};

#[derive(Embed)]
#[folder = "templates/"]
struct Templates;

/// Extensions copied byte-for-byte instead of token-substituted.
const BINARY_EXTENSIONS: &[&str] = &["ico", "png", "jpg", "jpeg", "gif", "webp", "woff", "woff2"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    Text(String),
    Binary(Vec<u8>),
}

pub fn is_binary(id: &str) -> bool {
    id.rsplit_once('.')
        .map(|(_, ext)| BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn load(id: &str) -> Result<Template> {
    let file = <Templates as Embed>::get(id)
        .ok_or_else(|| AppgenError::MissingTemplate(id.to_string()))?;
    let bytes = file.data.into_owned();
    if is_binary(id) {
        return Ok(Template::Binary(bytes));
    }
    String::from_utf8(bytes)
        .map(Template::Text)
        .map_err(|_| AppgenError::MissingTemplate(format!("{id} is not valid UTF-8")))
}

/// Replace every token in `text` with its escaped value.
pub fn render(text: &str, tokens: &BTreeMap<String, String>) -> String {
    tokens.iter().fold(text.to_string(), |acc, (token, value)| {
        acc.replace(token.as_str(), &escape_js(value))
    })
}

/// Escape a value for use inside a double-quoted JS string literal.
pub fn escape_js(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::WEB_APP_TEMPLATES;

    #[test]
    fn every_planned_template_is_embedded() {
        for (_, id) in WEB_APP_TEMPLATES {
            assert!(load(id).is_ok(), "missing template {id}");
        }
    }

    #[test]
    fn favicon_is_binary() {
        assert!(is_binary("web_app/public/favicon.ico"));
        assert!(matches!(
            load("web_app/public/favicon.ico").unwrap(),
            Template::Binary(bytes) if !bytes.is_empty()
        ));
        assert!(!is_binary("web_app/src/app/layout.tsx"));
    }

    #[test]
    fn unknown_template_is_an_error() {
        assert!(matches!(
            load("web_app/nope.txt"),
            Err(AppgenError::MissingTemplate(_))
        ));
    }

    #[test]
    fn render_substitutes_and_escapes() {
        let mut tokens = BTreeMap::new();
        tokens.insert("__APP_NAME__".to_string(), "Say \"hi\"".to_string());
        let out = render("title: \"__APP_NAME__\", again: \"__APP_NAME__\"", &tokens);
        assert_eq!(out, "title: \"Say \\\"hi\\\"\", again: \"Say \\\"hi\\\"\"");
    }

    #[test]
    fn landing_template_carries_identity_tokens() {
        let Template::Text(text) = load("web_app/src/app/(marketing)/page.tsx").unwrap() else {
            panic!("landing page should be text");
        };
        assert!(text.contains("__APP_NAME__"));
        assert!(text.contains("__SUBHEAD__"));
    }
}
