use appgen_model::{ModelSettings, Provider};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::synth::SynthesisConfig;

// ---------------------------------------------------------------------------
// GenerationConfig
// ---------------------------------------------------------------------------

/// Generation settings, loadable from YAML. Every field has a default, so an
/// empty document is valid.
///
/// ```yaml
/// provider: openai
/// model: gpt-4o-mini
/// timeout_secs: 60
/// correction_backoff_ms: 500
/// max_completion_tokens: 16384
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_correction_backoff_ms")]
    pub correction_backoff_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_base_url: Option<String>,
    /// Reply length limit for the HTTP backend; it has its own default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_correction_backoff_ms() -> u64 {
    1000
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            timeout_secs: default_timeout_secs(),
            correction_backoff_ms: default_correction_backoff_ms(),
            openai_base_url: None,
            max_completion_tokens: None,
        }
    }
}

impl GenerationConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: GenerationConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn synthesis(&self) -> SynthesisConfig {
        SynthesisConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            correction_backoff: Duration::from_millis(self.correction_backoff_ms),
        }
    }

    /// Backend settings. The API key is never stored in the config file.
    pub fn model_settings(&self, openai_api_key: Option<String>) -> ModelSettings {
        ModelSettings {
            provider: self.provider,
            model: self.model.clone(),
            openai_api_key,
            openai_base_url: self.openai_base_url.clone(),
            max_completion_tokens: self.max_completion_tokens,
        }
    }
}
