mod generate;
mod output;
mod prompt;

use appgen_core::spec::DeployTarget;
use appgen_model::Provider;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "appgen",
    about = "Turn a product idea or an app spec into a runnable Next.js project",
    version
)]
struct Cli {
    /// Product idea to synthesize an app spec from
    #[arg(long, conflicts_with = "spec")]
    idea: Option<String>,

    /// App spec file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Directory to write the generated project into
    #[arg(long)]
    out: Option<PathBuf>,

    /// Override the deploy target (vercel | github_pages)
    #[arg(long)]
    deploy: Option<DeployTarget>,

    /// Generation backend (stub | openai | claude)
    #[arg(long, env = "MODEL_PROVIDER")]
    provider: Option<Provider>,

    /// Model name for the generation backend
    #[arg(long)]
    model: Option<String>,

    /// Generation settings file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run npm install, typecheck and build in the generated project
    #[arg(long)]
    install: bool,

    /// Output a JSON run summary
    #[arg(long, short = 'j')]
    json: bool,

    #[arg(long, env = "OPENAI_API_KEY", hide = true, hide_env_values = true)]
    openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_MODEL", hide = true)]
    openai_model: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", hide = true)]
    openai_base_url: Option<String>,

    #[arg(long, env = "CLAUDE_MODEL", hide = true)]
    claude_model: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = generate::run(cli) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
