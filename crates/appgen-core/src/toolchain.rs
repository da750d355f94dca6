//! Optional install/typecheck/build gate over the generated project.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::error::{AppgenError, Result};

/// npm invocations run in order; the first failure stops the gate.
pub const NPM_STEPS: &[&[&str]] = &[
    &["i", "--no-fund", "--no-audit"],
    &["run", "typecheck"],
    &["run", "build"],
];

pub struct Toolchain {
    name: String,
    program: PathBuf,
}

impl Toolchain {
    /// Find `name` on `PATH`.
    pub fn locate(name: &str) -> Result<Self> {
        let program =
            which::which(name).map_err(|_| AppgenError::ToolchainMissing(name.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            program,
        })
    }

    /// Run one step in `dir`. Child output goes to stderr so stdout stays
    /// free for machine-readable results.
    pub async fn run(&self, args: &[&str], dir: &Path) -> Result<()> {
        let command = format!("{} {}", self.name, args.join(" "));
        tracing::info!(%command, dir = %dir.display(), "running toolchain step");
        let status = tokio::process::Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(std::io::stderr()))
            .status()
            .await?;
        if status.success() {
            Ok(())
        } else {
            Err(AppgenError::ToolchainFailed {
                command,
                status: status.to_string(),
            })
        }
    }
}

/// Install dependencies, typecheck and build the project at `dir`.
pub async fn install_and_build(dir: &Path) -> Result<()> {
    let npm = Toolchain::locate("npm")?;
    for args in NPM_STEPS {
        npm.run(args, dir).await?;
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_program_is_reported_by_name() {
        match Toolchain::locate("appgen-no-such-tool") {
            Err(AppgenError::ToolchainMissing(name)) => assert_eq!(name, "appgen-no-such-tool"),
            _ => panic!("expected ToolchainMissing"),
        }
    }

    #[tokio::test]
    async fn successful_step_passes() {
        let dir = TempDir::new().unwrap();
        let sh = Toolchain::locate("sh").unwrap();
        sh.run(&["-c", "touch built"], dir.path()).await.unwrap();
        assert!(dir.path().join("built").exists());
    }

    #[tokio::test]
    async fn failing_step_names_the_command() {
        let dir = TempDir::new().unwrap();
        let sh = Toolchain::locate("sh").unwrap();
        match sh.run(&["-c", "exit 3"], dir.path()).await {
            Err(AppgenError::ToolchainFailed { command, .. }) => {
                assert_eq!(command, "sh -c exit 3")
            }
            other => panic!("expected ToolchainFailed, got {other:?}"),
        }
    }
}
