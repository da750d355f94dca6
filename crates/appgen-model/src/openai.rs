use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::json::parse_json_loose;
use crate::{CompletionRequest, JsonModel, ModelError, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Transport-level retries when the request does not specify any.
const DEFAULT_MAX_RETRIES: u32 = 2;
/// Room for a spec with several entities and landing sections.
pub const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 8192;

// ─── OpenAiConfig ─────────────────────────────────────────────────────────

/// Everything the OpenAI backend needs, resolved by the caller.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL up to and including the API version, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Upper bound on reply length. Replies cut short do not parse.
    pub max_completion_tokens: u32,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_completion_tokens: DEFAULT_MAX_COMPLETION_TOKENS,
        }
    }
}

// ─── OpenAiModel ──────────────────────────────────────────────────────────

/// Chat-completions backend using JSON mode.
///
/// When a schema is supplied it first asks for `json_schema` structured
/// output; if the provider rejects that request it retries the same attempt
/// in plain `json_object` mode. Replies are parsed loosely.
pub struct OpenAiModel {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiModel {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ModelError::Config("OPENAI_API_KEY is not set".into()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn chat(&self, request: &CompletionRequest, response_format: Value) -> Result<Value> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "response_format": response_format,
            "max_completion_tokens": self.config.max_completion_tokens,
        });
        let resp: ChatResponse = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let text = resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_else(|| "{}".to_string());
        parse_json_loose(&text)
    }

    async fn attempt(&self, request: &CompletionRequest) -> Result<Value> {
        let Some(schema) = &request.schema else {
            return self.chat(request, json!({ "type": "json_object" })).await;
        };
        let structured = json!({
            "type": "json_schema",
            "json_schema": { "name": "AppSpec", "schema": schema, "strict": true },
        });
        match self.chat(request, structured).await {
            Ok(v) => Ok(v),
            Err(e) => {
                tracing::debug!(error = %e, "structured output rejected, retrying in json_object mode");
                self.chat(request, json!({ "type": "json_object" })).await
            }
        }
    }
}

#[async_trait]
impl JsonModel for OpenAiModel {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete_json(&self, request: CompletionRequest) -> Result<Value> {
        let max_retries = request.max_retries.unwrap_or(DEFAULT_MAX_RETRIES);
        let mut last_error = None;
        for attempt in 0..=max_retries {
            match self.attempt(&request).await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "openai completion attempt failed");
                    last_error = Some(e);
                }
            }
        }
        Err(ModelError::Exhausted {
            backend: "openai",
            attempts: max_retries + 1,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
