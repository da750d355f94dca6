//! End-to-end run: idea or spec file → validated spec → plan → project tree.

use appgen_model::{JsonModel, ModelError};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::error::{AppgenError, Result};
use crate::heuristics;
use crate::plan::{plan, BuildPlan};
use crate::scaffold::{scaffold, ScaffoldReport};
use crate::spec::{AppSpec, Blueprint, DeployTarget};
use crate::synth::Synthesizer;
use crate::toolchain;
use crate::validate::Validator;

/// Where the app specification comes from.
#[derive(Debug, Clone)]
pub enum SpecSource {
    /// Synthesize from a free-text idea. Hints are passed to the generator verbatim.
    Idea {
        idea: String,
        hints: BTreeMap<String, Value>,
    },
    /// Load a JSON or YAML spec document.
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub source: SpecSource,
    pub out_dir: PathBuf,
    /// Replaces the spec's deploy target before heuristics run.
    pub deploy: Option<DeployTarget>,
    /// Run the npm install/typecheck/build gate after scaffolding.
    pub install: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub spec: AppSpec,
    pub plan: BuildPlan,
    pub report: ScaffoldReport,
}

pub struct Pipeline {
    config: GenerationConfig,
    model: Option<Arc<dyn JsonModel>>,
}

impl Pipeline {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    /// Generation backend used for [`SpecSource::Idea`].
    pub fn with_model(mut self, model: Arc<dyn JsonModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineOutcome> {
        let validator = Validator::new()?;
        let spec = match request.source {
            SpecSource::Idea { idea, hints } => {
                let model = self.model.clone().ok_or_else(|| {
                    ModelError::Config("no generation backend configured".to_string())
                })?;
                Synthesizer::new(model, validator, self.config.synthesis())
                    .synthesize(&idea, &hints)
                    .await?
            }
            SpecSource::File(path) => {
                tracing::info!(path = %path.display(), "loading app spec");
                let mut document = load_spec_file(&path)?;
                heuristics::repair_draft(&mut document);
                validator.validate(&document)?
            }
        };

        let spec = heuristics::repair(apply_deploy_override(spec, request.deploy));
        if spec.blueprint != Blueprint::WebApp {
            return Err(AppgenError::UnsupportedBlueprint(
                spec.blueprint.as_str().to_string(),
            ));
        }

        let plan = plan(&spec);
        tracing::info!(
            render_mode = %spec.runtime.render_mode,
            deploy = %plan.deploy_target,
            files = plan.files.len(),
            "build plan ready"
        );
        let report = scaffold(&spec, &plan, &request.out_dir)?;

        if request.install {
            toolchain::install_and_build(&request.out_dir).await?;
        }
        Ok(PipelineOutcome { spec, plan, report })
    }
}

/// Read a spec document: YAML for `.yaml`/`.yml`, JSON otherwise.
pub fn load_spec_file(path: &Path) -> Result<Value> {
    let data = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    if is_yaml {
        Ok(serde_yaml::from_str(&data)?)
    } else {
        Ok(serde_json::from_str(&data)?)
    }
}

/// Force the deploy target. Render mode is reconciled by the heuristics pass.
pub fn apply_deploy_override(mut spec: AppSpec, deploy: Option<DeployTarget>) -> AppSpec {
    if let Some(target) = deploy {
        if spec.deploy.target != target {
            tracing::warn!(from = %spec.deploy.target, to = %target, "deploy target overridden");
            spec.deploy.target = target;
        }
    }
    spec
}
