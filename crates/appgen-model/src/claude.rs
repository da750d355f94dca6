use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::json::parse_json_loose;
use crate::{CompletionRequest, JsonModel, ModelError, Result};

// ─── ClaudeCliModel ───────────────────────────────────────────────────────

/// Backend that shells out to the `claude` CLI in single-shot print mode.
///
/// The user prompt is written to stdin; the CLI's `--output-format json`
/// envelope is decoded and its `result` text parsed loosely as JSON.
#[derive(Debug, Clone)]
pub struct ClaudeCliModel {
    executable: PathBuf,
    model: Option<String>,
}

impl Default for ClaudeCliModel {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("claude"),
            model: None,
        }
    }
}

impl ClaudeCliModel {
    pub fn new(model: Option<String>) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }

    /// Use a specific executable instead of `claude` from `PATH`.
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    fn build_command(&self, request: &CompletionRequest) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("--print").arg("--output-format").arg("json");
        if let Some(model) = &self.model {
            cmd.arg("--model").arg(model);
        }
        if !request.system.is_empty() {
            cmd.arg("--system-prompt").arg(&request.system);
        }
        // Allow running from inside an interactive Claude session.
        cmd.env_remove("CLAUDECODE");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

#[async_trait]
impl JsonModel for ClaudeCliModel {
    fn name(&self) -> &str {
        "claude"
    }

    async fn complete_json(&self, request: CompletionRequest) -> Result<Value> {
        let mut child = self.build_command(&request).spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(request.user.as_bytes()).await?;
            stdin.flush().await?;
        }
        let output = child.wait_with_output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            return Err(ModelError::Process(format!(
                "claude exited with {code}\nstderr: {}",
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let envelope: CliResult =
            serde_json::from_str(stdout.trim()).map_err(|source| ModelError::Parse {
                head: stdout.chars().take(200).collect(),
                source,
            })?;
        if envelope.is_error {
            return Err(ModelError::Process(format!(
                "claude returned an error result: {}",
                envelope.result.unwrap_or_default()
            )));
        }
        parse_json_loose(envelope.result.as_deref().unwrap_or("{}"))
    }
}

/// The single JSON object `claude --print --output-format json` writes.
#[derive(Debug, Deserialize)]
struct CliResult {
    #[serde(default)]
    is_error: bool,
    #[serde(default)]
    result: Option<String>,
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// Write a fake `claude` executable that prints `body` and exits with `code`.
    fn fake_cli(dir: &TempDir, body: &str, code: i32) -> PathBuf {
        let path = dir.path().join("claude");
        let script = format!("#!/bin/sh\ncat > /dev/null\ncat <<'EOF'\n{body}\nEOF\nexit {code}\n");
        std::fs::write(&path, script).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[tokio::test]
    async fn parses_result_text_from_cli_envelope() {
        let dir = TempDir::new().unwrap();
        let body = r#"{"type":"result","subtype":"success","is_error":false,"result":"```json\n{\"app\": 1}\n```"}"#;
        let model = ClaudeCliModel::default().with_executable(fake_cli(&dir, body, 0));
        let v = model
            .complete_json(CompletionRequest::new("sys", "user"))
            .await
            .unwrap();
        assert_eq!(v["app"], 1);
    }

    #[tokio::test]
    async fn non_zero_exit_is_a_process_error() {
        let dir = TempDir::new().unwrap();
        let model = ClaudeCliModel::default().with_executable(fake_cli(&dir, "boom", 3));
        let err = model
            .complete_json(CompletionRequest::new("sys", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Process(_)));
        assert!(err.to_string().contains("exited with 3"));
    }

    #[tokio::test]
    async fn error_result_is_a_process_error() {
        let dir = TempDir::new().unwrap();
        let body = r#"{"type":"result","subtype":"error_max_turns","is_error":true,"result":"limit"}"#;
        let model = ClaudeCliModel::default().with_executable(fake_cli(&dir, body, 0));
        let err = model
            .complete_json(CompletionRequest::new("", "user"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("limit"));
    }
}
