//! Interactive questionnaire used when neither `--idea` nor `--spec` is given.

use anyhow::{bail, Result};
use appgen_core::spec::DeployTarget;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;

pub const DEFAULT_OUT_DIR: &str = "out/app";

const PLATFORMS: &[&str] = &["web", "desktop"];
const DATABASES: &[&str] = &["none", "neon", "turso", "supabase"];
const AUTH_MODES: &[&str] = &["none", "email_magic", "google_oauth"];
const DEPLOY_TARGETS: &[&str] = &["github_pages", "vercel"];

pub struct Answers {
    pub idea: String,
    pub out_dir: PathBuf,
    pub deploy: DeployTarget,
    /// Everything but the idea, passed to the generator as hints.
    pub hints: BTreeMap<String, Value>,
}

/// Ask each question in turn. Required answers are re-asked until
/// non-empty; choices are re-asked until they match an option.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Answers> {
    let idea = ask_line(input, output, "Describe your app idea", None)?;
    let platform = ask_choice(input, output, "Platform", PLATFORMS, "web")?;
    let auth = ask_choice(input, output, "Sign-in", AUTH_MODES, "none")?;
    let database = ask_choice(input, output, "Database", DATABASES, "none")?;
    let features = ask_line(input, output, "Key features (comma separated)", Some(""))?;
    let out_dir = ask_line(input, output, "Output directory", Some(DEFAULT_OUT_DIR))?;
    let deploy = ask_choice(input, output, "Deploy target", DEPLOY_TARGETS, "github_pages")?;

    let features: Vec<String> = features
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    let deploy_target: DeployTarget = deploy.parse()?;
    let blueprint = if platform == "desktop" {
        "electron_app"
    } else {
        "web_app"
    };

    let mut hints = BTreeMap::new();
    hints.insert("blueprint".to_string(), json!(blueprint));
    hints.insert("auth".to_string(), json!(auth));
    hints.insert("database".to_string(), json!(database));
    hints.insert("features".to_string(), json!(features));
    hints.insert("deploy".to_string(), json!(deploy));

    Ok(Answers {
        idea,
        out_dir: PathBuf::from(out_dir),
        deploy: deploy_target,
        hints,
    })
}

fn ask_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: Option<&str>,
) -> Result<String> {
    loop {
        match default {
            Some(d) if !d.is_empty() => write!(output, "{question} [{d}]: ")?,
            _ => write!(output, "{question}: ")?,
        }
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed while asking: {question}");
        }
        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
        if let Some(d) = default {
            return Ok(d.to_string());
        }
        writeln!(output, "An answer is required.")?;
    }
}

fn ask_choice<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    choices: &[&str],
    default: &str,
) -> Result<String> {
    let question = format!("{question} ({})", choices.join("/"));
    loop {
        let answer = ask_line(input, output, &question, Some(default))?.to_lowercase();
        if choices.contains(&answer.as_str()) {
            return Ok(answer);
        }
        writeln!(output, "Please answer one of: {}", choices.join(", "))?;
    }
}
