use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// FieldIssue
// ---------------------------------------------------------------------------

/// One violated rule, tagged with the JSON pointer of the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() { "/".to_string() } else { path },
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Renders a list of issues one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issues(pub Vec<FieldIssue>);

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// AppgenError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum AppgenError {
    #[error("AppSpec validation failed:\n{issues}")]
    StructuralValidation { issues: Issues },

    #[error("AppSpec refinement failed:\n{issues}")]
    RefinementValidation { issues: Issues },

    #[error("spec synthesis failed after {attempts} attempt(s): {last_error}")]
    SynthesisFailure { attempts: u32, last_error: String },

    #[error("failed to write {}: {source}", path.display())]
    Scaffold {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("blueprint '{0}' is not supported yet; only web_app can be scaffolded")]
    UnsupportedBlueprint(String),

    #[error("template not found: {0}")]
    MissingTemplate(String),

    #[error("invalid deploy target '{0}': expected vercel or github_pages")]
    InvalidDeployTarget(String),

    #[error("invalid schema: {0}")]
    Schema(String),

    #[error("'{0}' not found on PATH")]
    ToolchainMissing(String),

    #[error("{command} failed with {status}")]
    ToolchainFailed { command: String, status: String },

    #[error(transparent)]
    Model(#[from] appgen_model::ModelError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AppgenError {
    pub fn structural(issues: Vec<FieldIssue>) -> Self {
        AppgenError::StructuralValidation {
            issues: Issues(issues),
        }
    }

    pub fn refinement(issues: Vec<FieldIssue>) -> Self {
        AppgenError::RefinementValidation {
            issues: Issues(issues),
        }
    }

    /// The per-field issues of a validation error, empty for anything else.
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            AppgenError::StructuralValidation { issues }
            | AppgenError::RefinementValidation { issues } => &issues.0,
            _ => &[],
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppgenError::StructuralValidation { .. } | AppgenError::RefinementValidation { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AppgenError>;
