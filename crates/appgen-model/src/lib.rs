//! `appgen-model`: JSON-producing text generation backends.
//!
//! Every backend implements [`JsonModel`]: take a system prompt, a user
//! prompt and an optional JSON Schema, and return parsed JSON (or fail).
//! Backends are unreliable by nature; callers are expected to validate what
//! comes back.
//!
//! ```text
//! CompletionRequest { system, user, schema?, max_retries? }
//!     │
//!     ▼
//! dyn JsonModel  ── StubModel       deterministic, offline
//!                ── OpenAiModel     chat completions over HTTP
//!                ── ClaudeCliModel  `claude --print --output-format json`
//!     │
//!     ▼
//! serde_json::Value
//! ```
//!
//! Backends never read the environment. Resolve credentials and model names
//! in the caller and pass a [`ModelSettings`] to [`build_model`].

pub mod claude;
pub mod error;
pub mod json;
pub mod openai;
pub mod stub;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

pub use claude::ClaudeCliModel;
pub use error::ModelError;
pub use json::parse_json_loose;
pub use openai::{OpenAiConfig, OpenAiModel};
pub use stub::StubModel;
pub use types::{CompletionRequest, Provider};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ModelError>;

/// A capability that turns a prompt into parsed JSON.
#[async_trait]
pub trait JsonModel: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    async fn complete_json(&self, request: CompletionRequest) -> Result<Value>;
}

/// Backend-specific settings, resolved by the caller.
#[derive(Debug, Clone, Default)]
pub struct ModelSettings {
    pub provider: Provider,
    /// Model name override; each backend has its own default.
    pub model: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub max_completion_tokens: Option<u32>,
}

/// Construct the backend selected by `settings.provider`.
pub fn build_model(settings: &ModelSettings) -> Result<Arc<dyn JsonModel>> {
    let model: Arc<dyn JsonModel> = match settings.provider {
        Provider::Stub => Arc::new(StubModel::new()),
        Provider::OpenAi => {
            let mut config = OpenAiConfig::new(settings.openai_api_key.clone().unwrap_or_default());
            if let Some(m) = &settings.model {
                config.model = m.clone();
            }
            if let Some(url) = &settings.openai_base_url {
                config.base_url = url.clone();
            }
            if let Some(limit) = settings.max_completion_tokens {
                config.max_completion_tokens = limit;
            }
            Arc::new(OpenAiModel::new(config)?)
        }
        Provider::Claude => Arc::new(ClaudeCliModel::new(settings.model.clone())),
    };
    tracing::debug!(backend = model.name(), "generation backend ready");
    Ok(model)
}
