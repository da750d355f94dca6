//! Idea → validated [`AppSpec`] through an unreliable JSON generator.
//!
//! ```text
//! DRAFTING ──► repair ──► validate ──► DONE
//!                             │ fail
//!                             ▼
//!            (backoff) CORRECTING ──► repair ──► validate ──► DONE
//!                                                  │ fail
//!                                                  ▼
//!                                           SynthesisFailure
//! ```
//!
//! Repair runs on the raw draft for the render-mode rules and again on the
//! decoded spec for the section rules, so validation always sees the
//! repaired document.
//!
//! The generator is called at most twice. Generator errors, timeouts and
//! validation failures all count as a failed attempt.

use appgen_model::{parse_json_loose, CompletionRequest, JsonModel};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppgenError, Result};
use crate::heuristics;
use crate::spec::AppSpec;
use crate::validate::{refine, Validator};

pub const MAX_ATTEMPTS: u32 = 2;

const SYSTEM_PROMPT: &str = "You are an expert product and technical specifier. \
Output ONLY valid JSON matching the provided JSON Schema, with no extra keys. \
If uncertain, choose sensible defaults from the enum values. \
Keep arrays minimal but non-empty where the schema requires items. \
If deploy.target is github_pages, set runtime.renderMode to \"ssg\" and use no server routes. \
If deploy.target is vercel and features.auth is not none, set runtime.renderMode to \"ssr\". \
If a database is wanted but github_pages is chosen, set runtime.database to turso or supabase.";

#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Upper bound on each generator call.
    pub timeout: Duration,
    /// Pause before the correction call.
    pub correction_backoff: Duration,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            correction_backoff: Duration::from_secs(1),
        }
    }
}

/// The system and user prompt of a drafting call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

pub fn build_prompt(idea: &str, hints: &BTreeMap<String, Value>, schema: &Value) -> Prompt {
    let hints = Value::Object(hints.clone().into_iter().collect());
    let user = [
        "JSON_SCHEMA_START".to_string(),
        format!("{schema:#}"),
        "JSON_SCHEMA_END".to_string(),
        "HINTS_START".to_string(),
        format!("{hints:#}"),
        "HINTS_END".to_string(),
        "IDEA_START".to_string(),
        idea.to_string(),
        "IDEA_END".to_string(),
    ]
    .join("\n");
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

/// The draft prompt followed by the failed attempt's error text.
pub fn correction_prompt(user: &str, error: &str) -> String {
    format!(
        "{user}\nPrevious output failed validation: {error}\n\
         Correct the JSON strictly to satisfy the schema. Output only JSON."
    )
}

/// Some generators wrap their answer, e.g. `{file_path, file_name, code}`.
/// Pull the payload out of a `code` or `content` field when the object is
/// not itself a spec.
pub fn unwrap_envelope(value: Value) -> Value {
    let inner = match &value {
        Value::Object(map) if !map.contains_key("blueprint") => {
            ["code", "content"].iter().find_map(|key| match map.get(*key) {
                Some(Value::String(text)) => parse_json_loose(text).ok(),
                Some(inner @ Value::Object(_)) => Some(inner.clone()),
                _ => None,
            })
        }
        _ => None,
    };
    inner.unwrap_or(value)
}

pub struct Synthesizer {
    model: Arc<dyn JsonModel>,
    validator: Validator,
    config: SynthesisConfig,
}

impl Synthesizer {
    pub fn new(model: Arc<dyn JsonModel>, validator: Validator, config: SynthesisConfig) -> Self {
        Self {
            model,
            validator,
            config,
        }
    }

    pub async fn synthesize(
        &self,
        idea: &str,
        hints: &BTreeMap<String, Value>,
    ) -> Result<AppSpec> {
        let prompt = build_prompt(idea, hints, self.validator.schema());
        let draft = CompletionRequest::new(&prompt.system, &prompt.user)
            .with_schema(self.validator.schema().clone());

        tracing::info!(backend = self.model.name(), "drafting app spec");
        let error = match self.attempt(draft).await {
            Ok(spec) => return Ok(spec),
            Err(e) => e,
        };
        tracing::warn!(error = %error, "draft rejected, requesting one correction");

        tokio::time::sleep(self.config.correction_backoff).await;
        let user = correction_prompt(&prompt.user, &error);
        let correction = CompletionRequest::new(&prompt.system, user)
            .with_schema(self.validator.schema().clone())
            .with_max_retries(1);

        self.attempt(correction).await.map_err(|last_error| {
            tracing::warn!(error = %last_error, "correction rejected");
            AppgenError::SynthesisFailure {
                attempts: MAX_ATTEMPTS,
                last_error,
            }
        })
    }

    /// One generator call plus validation. The error is the text fed back to
    /// the generator on correction.
    async fn attempt(&self, request: CompletionRequest) -> std::result::Result<AppSpec, String> {
        let call = self.model.complete_json(request);
        let raw = match tokio::time::timeout(self.config.timeout, call).await {
            Err(_) => {
                return Err(format!(
                    "generation timed out after {}s",
                    self.config.timeout.as_secs_f64()
                ))
            }
            Ok(Err(e)) => return Err(format!("generation failed: {e}")),
            Ok(Ok(value)) => value,
        };

        let mut candidate = unwrap_envelope(raw);
        heuristics::repair_draft(&mut candidate);
        let spec = self
            .validator
            .structural(&candidate)
            .map_err(|e| e.to_string())?;
        let spec = heuristics::repair(spec);
        refine(&spec).map_err(|e| e.to_string())?;
        Ok(spec)
    }
}
