use anyhow::{bail, Context, Result};
use appgen_core::config::GenerationConfig;
use appgen_core::pipeline::{Pipeline, PipelineRequest, SpecSource};
use appgen_model::{build_model, Provider};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::output::{print_json, print_next_steps, RunSummary};
use crate::{prompt, Cli};

pub fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => GenerationConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GenerationConfig::default(),
    };
    apply_overrides(&mut config, &cli);

    let (source, out_dir, deploy) = match (&cli.idea, &cli.spec) {
        (Some(idea), _) => {
            let source = SpecSource::Idea {
                idea: idea.clone(),
                hints: BTreeMap::new(),
            };
            (source, required_out(&cli)?, cli.deploy)
        }
        (None, Some(path)) => (SpecSource::File(path.clone()), required_out(&cli)?, cli.deploy),
        (None, None) => {
            let answers = prompt::ask(&mut std::io::stdin().lock(), &mut std::io::stderr())?;
            let source = SpecSource::Idea {
                idea: answers.idea,
                hints: answers.hints,
            };
            let out_dir = cli.out.clone().unwrap_or(answers.out_dir);
            (source, out_dir, cli.deploy.or(Some(answers.deploy)))
        }
    };

    let mut pipeline = Pipeline::new(config.clone());
    if matches!(source, SpecSource::Idea { .. }) {
        let settings = config.model_settings(cli.openai_api_key.clone());
        let model = build_model(&settings)
            .with_context(|| format!("failed to start the {} backend", config.provider))?;
        pipeline = pipeline.with_model(model);
    }

    let request = PipelineRequest {
        source,
        out_dir: out_dir.clone(),
        deploy,
        install: cli.install,
    };
    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt
        .block_on(pipeline.run(request))
        .with_context(|| format!("failed to generate app in {}", out_dir.display()))?;

    if cli.json {
        print_json(&RunSummary::new(&outcome))?;
    } else {
        print_next_steps(&outcome, cli.install);
    }
    Ok(())
}

fn required_out(cli: &Cli) -> Result<PathBuf> {
    match &cli.out {
        Some(out) => Ok(out.clone()),
        None => bail!("--out is required with --idea or --spec"),
    }
}

/// Flags and environment win over the config file. Backend-specific model
/// variables only apply to their own backend.
fn apply_overrides(config: &mut GenerationConfig, cli: &Cli) {
    if let Some(provider) = cli.provider {
        config.provider = provider;
    }
    let env_model = match config.provider {
        Provider::OpenAi => cli.openai_model.clone(),
        Provider::Claude => cli.claude_model.clone(),
        Provider::Stub => None,
    };
    if let Some(model) = cli.model.clone().or(env_model) {
        config.model = Some(model);
    }
    if let Some(url) = &cli.openai_base_url {
        config.openai_base_url = Some(url.clone());
    }
}
