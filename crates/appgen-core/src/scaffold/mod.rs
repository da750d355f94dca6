//! Scaffolding engine: executes a [`BuildPlan`] against a destination
//! directory.
//!
//! ```text
//! plan.files ──► templates (token-substituted / binary) + generated pages
//!            ──► prisma/schema.prisma            (needs_db)
//!            ──► src/lib/fixtures.json           (needs_fixtures)
//!            ──► .env.example
//!            ──► vercel.json | gh-pages workflow
//!            ──► auth route                      (needs_auth && ssr)
//!            ──► package.json
//! ```
//!
//! Writes are sequential and atomic per file. The first failure aborts the
//! run with [`AppgenError::Scaffold`] naming the path.

pub mod auth;
pub mod deploy;
pub mod fixtures;
pub mod manifest;
pub mod pages;
pub mod prisma;

use serde::Serialize;
use std::path::{Component, Path, PathBuf};

use crate::error::{AppgenError, Result};
use crate::io::{atomic_write, ensure_dir};
use crate::plan::{BuildPlan, TemplateRef};
use crate::spec::{AppSpec, Blueprint};
use crate::templates::{self, Template};

/// What a scaffold run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldReport {
    pub root: PathBuf,
    /// Relative paths, in write order.
    pub written: Vec<String>,
}

struct Writer<'a> {
    root: &'a Path,
    written: Vec<String>,
}

impl Writer<'_> {
    fn write(&mut self, rel: &str, data: &[u8]) -> Result<()> {
        let target = self.root.join(rel);
        if !Path::new(rel)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(AppgenError::Scaffold {
                path: target,
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path leaves the destination directory",
                ),
            });
        }
        atomic_write(&target, data)?;
        tracing::debug!(path = rel, bytes = data.len(), "wrote file");
        self.written.push(rel.to_string());
        Ok(())
    }
}

pub fn scaffold(spec: &AppSpec, plan: &BuildPlan, destination: &Path) -> Result<ScaffoldReport> {
    if spec.blueprint != Blueprint::WebApp {
        return Err(AppgenError::UnsupportedBlueprint(
            spec.blueprint.as_str().to_string(),
        ));
    }
    ensure_dir(destination)?;
    let mut out = Writer {
        root: destination,
        written: Vec::new(),
    };

    for entry in &plan.files {
        match &entry.template {
            TemplateRef::File { id } => match templates::load(id)? {
                Template::Text(text) => {
                    out.write(&entry.path, templates::render(&text, &entry.tokens).as_bytes())?
                }
                Template::Binary(bytes) => out.write(&entry.path, &bytes)?,
            },
            TemplateRef::Page { route } => {
                let source =
                    pages::render_page(route, &entry.tokens, plan.is_ssr, plan.needs_fixtures());
                out.write(&entry.path, source.as_bytes())?;
            }
        }
    }

    if plan.needs_db {
        out.write("prisma/schema.prisma", prisma::render_schema(spec).as_bytes())?;
    }
    if plan.needs_fixtures() {
        let doc = fixtures::build_fixtures(spec);
        let mut json = serde_json::to_string_pretty(&doc)?;
        json.push('\n');
        out.write("src/lib/fixtures.json", json.as_bytes())?;
    }

    out.write(".env.example", manifest::env_example(spec, plan).as_bytes())?;

    let (deploy_path, deploy_body) = deploy::deploy_artifact(plan.deploy_target);
    out.write(deploy_path, deploy_body.as_bytes())?;

    if let Some(route) = auth::auth_route(spec.features.auth, plan.is_ssr) {
        out.write(auth::AUTH_ROUTE_PATH, route.as_bytes())?;
    }

    let package = manifest::PackageJson::new(spec, plan).to_pretty_json()?;
    out.write("package.json", package.as_bytes())?;

    tracing::info!(
        root = %destination.display(),
        files = out.written.len(),
        "scaffold complete"
    );
    Ok(ScaffoldReport {
        root: destination.to_path_buf(),
        written: out.written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::plan;
    use crate::spec::test_support::sample_spec;
    use crate::spec::{
        AuthMode, Database, DeployTarget, Entity, EntityField, FieldType, PageDescriptor,
        RenderMode,
    };
    use tempfile::TempDir;

    fn read(root: &Path, rel: &str) -> String {
        std::fs::read_to_string(root.join(rel)).unwrap()
    }

    #[test]
    fn static_spec_without_database_uses_fixtures() {
        let dir = TempDir::new().unwrap();
        let spec = sample_spec();
        let report = scaffold(&spec, &plan(&spec), dir.path()).unwrap();

        assert!(dir.path().join("src/lib/fixtures.json").exists());
        assert!(!dir.path().join("prisma/schema.prisma").exists());
        for page in ["src/app/items/page.tsx", "src/app/items/[id]/page.tsx"] {
            assert!(read(dir.path(), page).contains("lib/fixtures.json"), "{page}");
        }
        assert!(dir.path().join(".github/workflows/gh-pages.yml").exists());
        assert!(!dir.path().join("vercel.json").exists());
        assert_eq!(report.written.last().map(String::as_str), Some("package.json"));
        assert!(report.written.contains(&"public/favicon.ico".to_string()));
    }

    #[test]
    fn database_spec_emits_prisma_models() {
        let dir = TempDir::new().unwrap();
        let mut spec = sample_spec();
        spec.deploy.target = DeployTarget::Vercel;
        spec.runtime.render_mode = RenderMode::Server;
        spec.runtime.database = Database::Neon;
        spec.app.entities = vec![Entity {
            name: "Item".into(),
            fields: vec![
                EntityField::new("title", FieldType::String),
                EntityField::new("count", FieldType::Int),
            ],
        }];
        scaffold(&spec, &plan(&spec), dir.path()).unwrap();

        let schema = read(dir.path(), "prisma/schema.prisma");
        assert!(schema.contains("model Item {"));
        assert!(schema.contains("@id @default(cuid())"));
        assert!(schema.contains("createdAt DateTime @default(now())"));
        assert!(schema.contains("  title String"));
        assert!(schema.contains("  count Int"));
        assert!(!dir.path().join("src/lib/fixtures.json").exists());
        assert!(!read(dir.path(), "src/app/items/page.tsx").contains("fixtures.json"));
        assert_eq!(read(dir.path(), ".env.example"), "DATABASE_URL=\n");
        assert!(dir.path().join("vercel.json").exists());
    }

    #[test]
    fn static_database_spec_still_ships_fixtures() {
        let dir = TempDir::new().unwrap();
        let mut spec = sample_spec();
        spec.runtime.database = Database::Turso;
        scaffold(&spec, &plan(&spec), dir.path()).unwrap();
        assert!(dir.path().join("prisma/schema.prisma").exists());
        assert!(dir.path().join("src/lib/fixtures.json").exists());
    }

    #[test]
    fn templates_are_token_substituted() {
        let dir = TempDir::new().unwrap();
        let spec = sample_spec();
        scaffold(&spec, &plan(&spec), dir.path()).unwrap();
        let landing = read(dir.path(), "src/app/(marketing)/page.tsx");
        assert!(landing.contains(r#"{"Bookswap"}"#));
        assert!(landing.contains("Swap paperbacks with your neighbours"));
        assert!(landing.contains(r#"href={"/items"}"#));
        assert!(!landing.contains("__APP_NAME__"));
        assert!(read(dir.path(), "src/app/layout.tsx").contains(r#"title: "Bookswap""#));
    }

    #[test]
    fn auth_route_only_in_server_mode() {
        let mut spec = sample_spec();
        spec.features.auth = AuthMode::GoogleOauth;

        let dir = TempDir::new().unwrap();
        scaffold(&spec, &plan(&spec), dir.path()).unwrap();
        assert!(!dir.path().join(auth::AUTH_ROUTE_PATH).exists());

        spec.deploy.target = DeployTarget::Vercel;
        spec.runtime.render_mode = RenderMode::Server;
        let dir = TempDir::new().unwrap();
        scaffold(&spec, &plan(&spec), dir.path()).unwrap();
        assert!(read(dir.path(), auth::AUTH_ROUTE_PATH).contains("GoogleProvider"));
    }

    #[test]
    fn unwritable_destination_names_the_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("taken");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let spec = sample_spec();
        let err = scaffold(&spec, &plan(&spec), &blocker.join("app")).unwrap_err();
        match err {
            AppgenError::Scaffold { path, .. } => assert!(path.starts_with(&blocker)),
            other => panic!("expected scaffold error, got {other:?}"),
        }
    }

    #[test]
    fn page_paths_cannot_leave_the_destination() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("a/b/out");
        let mut spec = sample_spec();
        spec.features
            .pages
            .push(PageDescriptor::Path("/../../../../escaped".into()));
        let err = scaffold(&spec, &plan(&spec), &dest).unwrap_err();
        match err {
            AppgenError::Scaffold { path, .. } => assert!(path.ends_with("escaped/page.tsx")),
            other => panic!("expected scaffold error, got {other:?}"),
        }
        assert!(!dir.path().join("a/escaped/page.tsx").exists());
        assert!(!dir.path().join("escaped/page.tsx").exists());
    }

    #[test]
    fn electron_blueprint_is_refused() {
        let dir = TempDir::new().unwrap();
        let mut spec = sample_spec();
        spec.blueprint = Blueprint::ElectronApp;
        assert!(matches!(
            scaffold(&spec, &plan(&spec), dir.path()),
            Err(AppgenError::UnsupportedBlueprint(_))
        ));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
