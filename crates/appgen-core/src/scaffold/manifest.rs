//! `package.json` and `.env.example`.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::plan::BuildPlan;
use crate::spec::{AppSpec, AuthMode, DeployTarget};

#[derive(Debug, Serialize)]
pub struct PackageJson {
    pub name: String,
    pub private: bool,
    #[serde(rename = "type")]
    pub module_type: &'static str,
    pub scripts: Scripts,
    pub dependencies: BTreeMap<String, String>,
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct Scripts {
    pub dev: &'static str,
    pub build: &'static str,
    pub start: &'static str,
    pub lint: &'static str,
    pub typecheck: &'static str,
    pub seed: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postinstall: Option<&'static str>,
}

impl PackageJson {
    pub fn new(spec: &AppSpec, plan: &BuildPlan) -> Self {
        let build = match plan.deploy_target {
            DeployTarget::Vercel => "next build",
            DeployTarget::GithubPages => "GITHUB_PAGES=true next build",
        };
        Self {
            name: package_name(&spec.app.name),
            private: true,
            module_type: "module",
            scripts: Scripts {
                dev: "next dev",
                build,
                start: "next start",
                lint: "echo \"No linter configured\"",
                typecheck: "tsc --noEmit",
                seed: "tsx prisma/seed.ts",
                postinstall: plan.needs_db.then_some("prisma generate"),
            },
            dependencies: plan.deps.iter().map(|d| parse_dep(d)).collect(),
            dev_dependencies: plan.dev_deps.iter().map(|d| parse_dep(d)).collect(),
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

/// Lower-case the name and join whitespace-separated words with `-`.
pub fn package_name(app_name: &str) -> String {
    app_name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Split `name@version` at the last `@` after position 0, so scoped names
/// (`@types/node@^20`) keep their leading `@`. A missing version is `*`.
pub fn parse_dep(dep: &str) -> (String, String) {
    match dep.rfind('@') {
        Some(at) if at > 0 => {
            let version = &dep[at + 1..];
            let version = if version.is_empty() { "*" } else { version };
            (dep[..at].to_string(), version.to_string())
        }
        _ => (dep.to_string(), "*".to_string()),
    }
}

/// Environment template lines, one per secret the generated app reads.
pub fn env_example(spec: &AppSpec, plan: &BuildPlan) -> String {
    let mut lines: Vec<&str> = Vec::new();
    if plan.needs_db {
        lines.push("DATABASE_URL=");
    }
    match spec.features.auth {
        AuthMode::GoogleOauth => {
            lines.extend(["GOOGLE_CLIENT_ID=", "GOOGLE_CLIENT_SECRET=", "NEXTAUTH_SECRET="])
        }
        AuthMode::EmailMagic => lines.push("# RESEND_API_KEY="),
        AuthMode::None => {}
    }
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
