use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;

use crate::{CompletionRequest, JsonModel, Result};

/// Deterministic offline backend.
///
/// Derives a minimal, valid app spec from the idea text embedded in the user
/// prompt between `IDEA_START` / `IDEA_END`. Used for demos and tests; it
/// ignores the system prompt, schema and hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubModel;

impl StubModel {
    pub fn new() -> Self {
        Self
    }

    /// The spec the stub returns for `idea`.
    pub fn draft_for(idea: &str) -> Value {
        let idea = match idea.trim() {
            "" => "App",
            s => s,
        };
        json!({
            "blueprint": "web_app",
            "app": {
                "name": app_name(idea),
                "purpose": idea,
                "roles": ["user"],
                "entities": []
            },
            "features": {
                "auth": "none",
                "pages": ["/", "/items", "/items/[id]"],
                "integrations": []
            },
            "runtime": { "renderMode": "ssg", "database": "none" },
            "deploy": { "target": "github_pages", "domain": null }
        })
    }
}

#[async_trait]
impl JsonModel for StubModel {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete_json(&self, request: CompletionRequest) -> Result<Value> {
        Ok(Self::draft_for(&extract_idea(&request.user)))
    }
}

/// Pull the idea out of a prompt built with `IDEA_START` / `IDEA_END` lines.
pub fn extract_idea(user: &str) -> String {
    static IDEA: OnceLock<Regex> = OnceLock::new();
    let re = IDEA
        .get_or_init(|| Regex::new(r"IDEA_START\n([\s\S]*?)\nIDEA_END").expect("valid regex"));
    re.captures(user)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "App".to_string())
}

/// First two words of the idea, stripped to ASCII alphanumerics and joined.
fn app_name(idea: &str) -> String {
    let name: String = idea
        .split_whitespace()
        .take(2)
        .map(|w| w.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>())
        .collect();
    if name.is_empty() {
        "App".to_string()
    } else {
        name
    }
}
