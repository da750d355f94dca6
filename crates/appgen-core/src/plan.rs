//! Deterministic expansion of an [`AppSpec`] into a [`BuildPlan`].
//!
//! The plan lists package dependencies and the ordered file instructions the
//! scaffolder executes. Equal specs always yield equal plans.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::heuristics::DEFAULT_FEATURE_BULLETS;
use crate::route::{capitalize, PageKind, PageRoute};
use crate::spec::{
    AppSpec, AuthMode, Database, DeployTarget, PageDescriptor, PagePurpose, RenderMode, SectionKind,
};

pub const APP_NAME_TOKEN: &str = "__APP_NAME__";
pub const SUBHEAD_TOKEN: &str = "__SUBHEAD__";
pub const COLLECTION_TOKEN: &str = "__COLLECTION__";
pub const SINGULAR_TOKEN: &str = "__SINGULAR__";
pub const PRIMARY_HREF_TOKEN: &str = "__PRIMARY_HREF__";
pub const PRIMARY_LABEL_TOKEN: &str = "__PRIMARY_LABEL__";
pub const FEATURE_TOKENS: [&str; 3] = ["__FEATURE_1__", "__FEATURE_2__", "__FEATURE_3__"];

const BASE_DEPS: &[&str] = &["next@14", "react@18", "react-dom@18", "zod@^3", "dotenv@^16"];
const BASE_DEV_DEPS: &[&str] = &[
    "typescript@^5",
    "@types/node@^20",
    "@types/react@^18",
    "@types/react-dom@^18",
];
const DB_DEP: &str = "@prisma/client@^5";
const DB_DEV_DEP: &str = "prisma@^5";
const AUTH_DEP: &str = "next-auth@^5";

/// Static project files: (output path, embedded template id).
pub const WEB_APP_TEMPLATES: &[(&str, &str)] = &[
    ("next.config.mjs", "web_app/next.config.mjs"),
    ("tsconfig.json", "web_app/tsconfig.json"),
    ("next-env.d.ts", "web_app/next-env.d.ts"),
    ("src/app/layout.tsx", "web_app/src/app/layout.tsx"),
    ("src/app/(marketing)/page.tsx", "web_app/src/app/(marketing)/page.tsx"),
    ("src/app/(app)/layout.tsx", "web_app/src/app/(app)/layout.tsx"),
    ("src/components/ui/Button.tsx", "web_app/src/components/ui/Button.tsx"),
    ("public/favicon.ico", "web_app/public/favicon.ico"),
    ("src/lib/db.ts", "web_app/src/lib/db.ts"),
    ("prisma/seed.ts", "web_app/prisma/seed.ts"),
    (".github/workflows/ci.yml", "web_app/github/workflows/ci.yml"),
];

// ---------------------------------------------------------------------------
// BuildPlan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub is_ssr: bool,
    pub needs_db: bool,
    pub needs_auth: bool,
    pub deploy_target: DeployTarget,
    /// `name@version` strings, in install order.
    pub deps: Vec<String>,
    pub dev_deps: Vec<String>,
    pub files: Vec<FilePlanEntry>,
}

impl BuildPlan {
    /// Static pages read fixtures only, so fixtures ship whenever there is
    /// no database or no server to query it.
    pub fn needs_fixtures(&self) -> bool {
        !self.needs_db || !self.is_ssr
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePlanEntry {
    /// Output path relative to the project root.
    pub path: String,
    pub template: TemplateRef,
    pub tokens: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateRef {
    /// An embedded template, by id.
    File { id: String },
    /// A generated list or detail page.
    Page { route: PageRoute },
}

// ---------------------------------------------------------------------------
// plan
// ---------------------------------------------------------------------------

pub fn plan(spec: &AppSpec) -> BuildPlan {
    let is_ssr = spec.runtime.render_mode == RenderMode::Server;
    let needs_db = spec.runtime.database != Database::None;
    let needs_auth = spec.features.auth != AuthMode::None;

    let mut deps: Vec<String> = BASE_DEPS.iter().map(|d| d.to_string()).collect();
    let mut dev_deps: Vec<String> = BASE_DEV_DEPS.iter().map(|d| d.to_string()).collect();
    if needs_db {
        deps.push(DB_DEP.to_string());
        dev_deps.push(DB_DEV_DEP.to_string());
    }
    if needs_auth {
        deps.push(AUTH_DEP.to_string());
    }

    let tokens = base_tokens(spec);
    let mut files: Vec<FilePlanEntry> = WEB_APP_TEMPLATES
        .iter()
        .map(|(path, id)| FilePlanEntry {
            path: path.to_string(),
            template: TemplateRef::File { id: id.to_string() },
            tokens: tokens.clone(),
        })
        .collect();

    for route in spec.features.pages.iter().filter_map(PageRoute::from_descriptor) {
        let mut page_tokens = tokens.clone();
        page_tokens.insert(COLLECTION_TOKEN.to_string(), route.collection.clone());
        page_tokens.insert(SINGULAR_TOKEN.to_string(), route.singular.clone());
        files.push(FilePlanEntry {
            path: route.file_path(),
            template: TemplateRef::Page { route },
            tokens: page_tokens,
        });
    }

    BuildPlan {
        is_ssr,
        needs_db,
        needs_auth,
        deploy_target: spec.deploy.target,
        deps,
        dev_deps,
        files,
    }
}

/// Tokens shared by every entry: identity text plus the landing page's call
/// to action and feature bullets.
fn base_tokens(spec: &AppSpec) -> BTreeMap<String, String> {
    let mut tokens = BTreeMap::new();
    tokens.insert(APP_NAME_TOKEN.to_string(), spec.app.name.clone());
    tokens.insert(SUBHEAD_TOKEN.to_string(), spec.app.purpose.clone());

    let (href, label) = primary_link(spec);
    tokens.insert(PRIMARY_HREF_TOKEN.to_string(), href);
    tokens.insert(PRIMARY_LABEL_TOKEN.to_string(), label);

    let bullets = landing_bullets(spec);
    for (i, token) in FEATURE_TOKENS.iter().enumerate() {
        let bullet = bullets
            .get(i)
            .cloned()
            .unwrap_or_else(|| DEFAULT_FEATURE_BULLETS[i].to_string());
        tokens.insert(token.to_string(), bullet);
    }
    tokens
}

/// The first list page becomes the landing call to action.
fn primary_link(spec: &AppSpec) -> (String, String) {
    spec.features
        .pages
        .iter()
        .filter_map(PageRoute::from_descriptor)
        .find(|r| r.kind == PageKind::List)
        .map(|r| (r.path.clone(), format!("Browse {}", capitalize(&r.collection))))
        .unwrap_or_else(|| ("/".to_string(), "Get started".to_string()))
}

fn landing_bullets(spec: &AppSpec) -> Vec<String> {
    spec.features
        .pages
        .iter()
        .filter_map(|p| match p {
            PageDescriptor::Detailed(page) if page.purpose == PagePurpose::Landing => {
                page.sections.as_ref()
            }
            _ => None,
        })
        .flatten()
        .find(|s| s.kind == SectionKind::Features)
        .and_then(|s| s.bullets.clone())
        .unwrap_or_default()
}
