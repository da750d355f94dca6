//! Deterministic repairs applied to every spec before planning.
//!
//! Rules run in a fixed order so later rules see earlier corrections:
//! 1. static hosting forces static rendering
//! 2. dynamic hosting with auth forces server rendering
//! 3. landing pages get a hero (first) and a features section (last)
//!
//! Rules 1 and 2 also run on the raw draft (`repair_draft`) so a draft that
//! only gets the render mode wrong or leaves it out still passes the schema.
//!
//! `repair` never fails and never drops information.

use serde_json::{Map, Value};

use crate::spec::{
    AppSpec, AuthMode, DeployTarget, PageDescriptor, PagePurpose, RenderMode, Section, SectionKind,
};

/// Bullets used when a landing page has no features section.
pub const DEFAULT_FEATURE_BULLETS: [&str; 3] = ["Fast to start", "Simple to use", "Free to try"];

/// Schema minimums for synthesized section text.
const HEADLINE_MIN_CHARS: usize = 18;
const SUBHEAD_MIN_CHARS: usize = 30;

pub fn repair(spec: AppSpec) -> AppSpec {
    let spec = resolve_render_mode(spec);
    ensure_minimum_sections(spec)
}

/// The render mode a deploy target and auth mode leave no choice about.
pub fn required_render_mode(target: DeployTarget, auth_required: bool) -> Option<RenderMode> {
    match target {
        DeployTarget::GithubPages => Some(RenderMode::Static),
        DeployTarget::Vercel if auth_required => Some(RenderMode::Server),
        DeployTarget::Vercel => None,
    }
}

/// Rules 1 and 2 over an undecoded draft. Drafts whose deploy target is
/// missing or unknown are left for the schema to reject.
pub fn repair_draft(draft: &mut Value) {
    let Some(target) = draft
        .pointer("/deploy/target")
        .and_then(Value::as_str)
        .and_then(|t| t.parse::<DeployTarget>().ok())
    else {
        return;
    };
    let auth_required = draft
        .pointer("/features/auth")
        .and_then(Value::as_str)
        .is_some_and(|a| a != AuthMode::None.as_str());
    let Some(mode) = required_render_mode(target, auth_required) else {
        return;
    };
    let Some(root) = draft.as_object_mut() else {
        return;
    };
    let runtime = root
        .entry("runtime")
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(runtime) = runtime.as_object_mut() else {
        return;
    };
    let current = runtime.get("renderMode").and_then(Value::as_str);
    if current != Some(mode.as_str()) {
        tracing::warn!(
            deploy = %target,
            from = current.unwrap_or("<missing>"),
            to = %mode,
            "draft render mode overridden by deploy target"
        );
        runtime.insert("renderMode".to_string(), Value::from(mode.as_str()));
    }
}

/// Rules 1 and 2: reconcile `runtime.renderMode` with the deploy target.
pub fn resolve_render_mode(mut spec: AppSpec) -> AppSpec {
    let auth_required = spec.features.auth != AuthMode::None;
    if let Some(mode) = required_render_mode(spec.deploy.target, auth_required) {
        if spec.runtime.render_mode != mode {
            tracing::warn!(
                deploy = %spec.deploy.target,
                from = %spec.runtime.render_mode,
                to = %mode,
                "render mode overridden by deploy target"
            );
        }
        spec.runtime.render_mode = mode;
    }
    spec
}

/// Rule 3: every landing page carries a hero and a features section.
pub fn ensure_minimum_sections(mut spec: AppSpec) -> AppSpec {
    let hero = hero_for(&spec.app.name, &spec.app.purpose);
    for page in spec.features.pages.iter_mut() {
        let PageDescriptor::Detailed(page) = page else {
            continue;
        };
        if page.purpose != PagePurpose::Landing {
            continue;
        }
        let mut sections = page.sections.take().unwrap_or_default();
        if !sections.iter().any(|s| s.kind == SectionKind::Hero) {
            sections.insert(0, hero.clone());
        }
        if !sections.iter().any(|s| s.kind == SectionKind::Features) {
            sections.push(default_features());
        }
        page.sections = Some(sections);
    }
    spec
}

/// Headline and subhead are only attached when they satisfy the schema minimums.
fn hero_for(name: &str, purpose: &str) -> Section {
    let headline = format!("Welcome to {name}");
    let mut hero = Section::new(SectionKind::Hero);
    if headline.chars().count() >= HEADLINE_MIN_CHARS {
        hero.headline = Some(headline);
    }
    if purpose.chars().count() >= SUBHEAD_MIN_CHARS {
        hero.subhead = Some(purpose.to_string());
    }
    hero
}

fn default_features() -> Section {
    let mut features = Section::new(SectionKind::Features);
    features.bullets = Some(DEFAULT_FEATURE_BULLETS.iter().map(|b| b.to_string()).collect());
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{App, Blueprint, Database, Deploy, Features, PageSpec, Runtime};
    use serde_json::json;

    fn spec(target: DeployTarget, auth: AuthMode, mode: RenderMode) -> AppSpec {
        AppSpec {
            blueprint: Blueprint::WebApp,
            app: App {
                name: "Bookswap".into(),
                purpose: "Trade paperbacks with readers in your neighbourhood".into(),
                roles: vec!["reader".into()],
                entities: vec![],
            },
            features: Features {
                auth,
                pages: vec![PageDescriptor::Path("/".into())],
                uploads: None,
                emails: None,
                payments: None,
                integrations: vec![],
            },
            runtime: Runtime {
                render_mode: mode,
                database: Database::None,
            },
            deploy: Deploy {
                target,
                domain: None,
            },
        }
    }

    fn landing(sections: Option<Vec<Section>>) -> PageDescriptor {
        PageDescriptor::Detailed(PageSpec {
            path: "/".into(),
            purpose: PagePurpose::Landing,
            entity: None,
            sections,
        })
    }

    fn sections_of(spec: &AppSpec, idx: usize) -> Vec<Section> {
        match &spec.features.pages[idx] {
            PageDescriptor::Detailed(p) => p.sections.clone().unwrap_or_default(),
            PageDescriptor::Path(_) => vec![],
        }
    }

    #[test]
    fn static_hosting_forces_static_rendering() {
        for auth in [AuthMode::None, AuthMode::EmailMagic, AuthMode::GoogleOauth] {
            for mode in [RenderMode::Static, RenderMode::Server] {
                let out = repair(spec(DeployTarget::GithubPages, auth, mode));
                assert_eq!(out.runtime.render_mode, RenderMode::Static);
            }
        }
    }

    #[test]
    fn dynamic_host_with_auth_forces_server_rendering() {
        for auth in [AuthMode::EmailMagic, AuthMode::GoogleOauth] {
            let out = repair(spec(DeployTarget::Vercel, auth, RenderMode::Static));
            assert_eq!(out.runtime.render_mode, RenderMode::Server);
        }
    }

    #[test]
    fn dynamic_host_without_auth_keeps_render_mode() {
        let out = repair(spec(DeployTarget::Vercel, AuthMode::None, RenderMode::Static));
        assert_eq!(out.runtime.render_mode, RenderMode::Static);
    }

    #[test]
    fn landing_without_sections_gets_hero_then_features() {
        let mut s = spec(DeployTarget::Vercel, AuthMode::None, RenderMode::Server);
        s.features.pages = vec![landing(None)];
        let sections = sections_of(&repair(s), 0);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].kind, SectionKind::Hero);
        assert_eq!(sections[0].headline.as_deref(), Some("Welcome to Bookswap"));
        let last = sections.last().unwrap();
        assert_eq!(last.kind, SectionKind::Features);
        assert!(last.bullets.as_ref().unwrap().len() >= 3);
    }

    #[test]
    fn existing_sections_are_kept_between_injected_ones() {
        let mut s = spec(DeployTarget::Vercel, AuthMode::None, RenderMode::Server);
        s.features.pages = vec![landing(Some(vec![Section::new(SectionKind::Faq)]))];
        let kinds: Vec<SectionKind> = sections_of(&repair(s), 0).iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SectionKind::Hero, SectionKind::Faq, SectionKind::Features]
        );
    }

    #[test]
    fn existing_hero_is_not_replaced() {
        let mut hero = Section::new(SectionKind::Hero);
        hero.headline = Some("Swap the books you already read".into());
        let mut s = spec(DeployTarget::Vercel, AuthMode::None, RenderMode::Server);
        s.features.pages = vec![landing(Some(vec![hero.clone()]))];
        let sections = sections_of(&repair(s), 0);
        assert_eq!(sections[0], hero);
        assert_eq!(sections.len(), 2);
    }

    #[test]
    fn short_names_get_a_hero_without_headline() {
        let mut s = spec(DeployTarget::Vercel, AuthMode::None, RenderMode::Server);
        s.app.name = "Bk".into();
        s.app.purpose = "Books".into();
        s.features.pages = vec![landing(None)];
        let sections = sections_of(&repair(s), 0);
        assert_eq!(sections[0].kind, SectionKind::Hero);
        assert_eq!(sections[0].headline, None);
        assert_eq!(sections[0].subhead, None);
    }

    #[test]
    fn non_landing_pages_are_untouched() {
        let mut s = spec(DeployTarget::Vercel, AuthMode::None, RenderMode::Server);
        s.features.pages = vec![PageDescriptor::Detailed(PageSpec {
            path: "/about".into(),
            purpose: PagePurpose::About,
            entity: None,
            sections: None,
        })];
        let out = repair(s.clone());
        assert_eq!(out.features.pages, s.features.pages);
    }

    #[test]
    fn draft_without_render_mode_gets_static_for_pages_hosting() {
        let mut draft = json!({
            "features": { "auth": "google_oauth" },
            "runtime": { "database": "none" },
            "deploy": { "target": "github_pages" }
        });
        repair_draft(&mut draft);
        assert_eq!(draft["runtime"]["renderMode"], "ssg");
    }

    #[test]
    fn draft_with_auth_on_vercel_gets_server_rendering() {
        let mut draft = json!({
            "features": { "auth": "email_magic" },
            "runtime": { "renderMode": "ssg", "database": "neon" },
            "deploy": { "target": "vercel" }
        });
        repair_draft(&mut draft);
        assert_eq!(draft["runtime"]["renderMode"], "ssr");
    }

    #[test]
    fn draft_without_a_known_target_is_left_alone() {
        let original = json!({
            "features": { "auth": "none" },
            "deploy": { "target": "netlify" }
        });
        let mut draft = original.clone();
        repair_draft(&mut draft);
        assert_eq!(draft, original);

        let mut vercel = json!({ "features": { "auth": "none" }, "deploy": { "target": "vercel" } });
        repair_draft(&mut vercel);
        assert!(vercel.get("runtime").is_none());
    }

    #[test]
    fn repair_is_idempotent() {
        let mut s = spec(DeployTarget::GithubPages, AuthMode::GoogleOauth, RenderMode::Server);
        s.features.pages = vec![landing(None), PageDescriptor::Path("/items".into())];
        let once = repair(s);
        let twice = repair(once.clone());
        assert_eq!(once, twice);
    }
}
