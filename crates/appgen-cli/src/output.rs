use appgen_core::pipeline::PipelineOutcome;
use serde::Serialize;
use std::path::Path;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Machine-readable run summary for `--json`.
#[derive(Serialize)]
pub struct RunSummary<'a> {
    pub out_dir: &'a Path,
    pub app_name: &'a str,
    pub render_mode: &'static str,
    pub deploy_target: &'static str,
    pub is_ssr: bool,
    pub needs_db: bool,
    pub needs_auth: bool,
    pub files: &'a [String],
}

impl<'a> RunSummary<'a> {
    pub fn new(outcome: &'a PipelineOutcome) -> Self {
        Self {
            out_dir: &outcome.report.root,
            app_name: &outcome.spec.app.name,
            render_mode: outcome.spec.runtime.render_mode.as_str(),
            deploy_target: outcome.plan.deploy_target.as_str(),
            is_ssr: outcome.plan.is_ssr,
            needs_db: outcome.plan.needs_db,
            needs_auth: outcome.plan.needs_auth,
            files: &outcome.report.written,
        }
    }
}

pub fn print_next_steps(outcome: &PipelineOutcome, installed: bool) {
    let root = outcome.report.root.display();
    println!(
        "Scaffold complete at: {root} ({} files, {}, {})",
        outcome.report.written.len(),
        outcome.spec.runtime.render_mode,
        outcome.plan.deploy_target
    );
    println!("Next steps:");
    println!("  1) cd {root}");
    if installed {
        println!("  2) npm run dev");
        return;
    }
    println!("  2) npm i");
    println!("  3) npm run typecheck && npm run build");
    println!("  4) npm run dev");
    if outcome.plan.needs_db {
        println!("  Set DATABASE_URL in .env before running against a database.");
    }
}
