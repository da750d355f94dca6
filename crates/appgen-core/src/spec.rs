use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::AppgenError;

// ---------------------------------------------------------------------------
// AppSpec
// ---------------------------------------------------------------------------

/// The validated intermediate representation of the app to scaffold.
///
/// Field names follow the wire format shared with the JSON Schema and the
/// generation prompt (`renderMode`, `enumValues`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSpec {
    pub blueprint: Blueprint,
    pub app: App,
    pub features: Features,
    pub runtime: Runtime,
    pub deploy: Deploy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Blueprint {
    WebApp,
    ElectronApp,
}

impl Blueprint {
    pub fn as_str(self) -> &'static str {
        match self {
            Blueprint::WebApp => "web_app",
            Blueprint::ElectronApp => "electron_app",
        }
    }
}

// ---------------------------------------------------------------------------
// App / entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub name: String,
    pub purpose: String,
    pub roles: Vec<String>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub fields: Vec<EntityField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(
        rename = "enumValues",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

impl EntityField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            enum_values: None,
            optional: None,
        }
    }

    pub fn is_optional(&self) -> bool {
        self.optional.unwrap_or(false)
    }

    pub fn enum_values(&self) -> &[String] {
        self.enum_values.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Text,
    Int,
    Float,
    Bool,
    Date,
    Datetime,
    Enum,
    Json,
}

// ---------------------------------------------------------------------------
// Features / pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub auth: AuthMode,
    pub pages: Vec<PageDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploads: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payments: Option<bool>,
    #[serde(default)]
    pub integrations: Vec<Integration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    None,
    EmailMagic,
    GoogleOauth,
}

impl AuthMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthMode::None => "none",
            AuthMode::EmailMagic => "email_magic",
            AuthMode::GoogleOauth => "google_oauth",
        }
    }
}

/// A page is either a bare path (`"/items"`) or a structured descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageDescriptor {
    Path(String),
    Detailed(PageSpec),
}

impl PageDescriptor {
    pub fn path(&self) -> &str {
        match self {
            PageDescriptor::Path(p) => p,
            PageDescriptor::Detailed(p) => &p.path,
        }
    }

    /// Explicit entity hint, if the descriptor carries one.
    pub fn entity(&self) -> Option<&str> {
        match self {
            PageDescriptor::Path(_) => None,
            PageDescriptor::Detailed(p) => p.entity.as_deref().filter(|e| !e.is_empty()),
        }
    }

    pub fn purpose(&self) -> Option<PagePurpose> {
        match self {
            PageDescriptor::Path(_) => None,
            PageDescriptor::Detailed(p) => Some(p.purpose),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub path: String,
    pub purpose: PagePurpose,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagePurpose {
    Landing,
    List,
    Detail,
    Form,
    Dashboard,
    About,
    Contact,
    Faq,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subhead: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            headline: None,
            subhead: None,
            bullets: None,
            fields: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Hero,
    Features,
    Faq,
    List,
    Detail,
    Form,
    Contact,
    Pricing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    pub provider: IntegrationProvider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationProvider {
    Stripe,
    Resend,
    Supabase,
    CustomApi,
}

// ---------------------------------------------------------------------------
// Runtime / deploy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runtime {
    #[serde(rename = "renderMode")]
    pub render_mode: RenderMode,
    pub database: Database,
}

/// `ssg` pages are fully static; `ssr` pages may query a data source per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    #[serde(rename = "ssg")]
    Static,
    #[serde(rename = "ssr")]
    Server,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Static => "ssg",
            RenderMode::Server => "ssr",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    None,
    Neon,
    Turso,
    Supabase,
}

impl Database {
    pub fn as_str(self) -> &'static str {
        match self {
            Database::None => "none",
            Database::Neon => "neon",
            Database::Turso => "turso",
            Database::Supabase => "supabase",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deploy {
    pub target: DeployTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// `vercel` is the dynamic host; `github_pages` is static hosting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployTarget {
    Vercel,
    GithubPages,
}

impl DeployTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            DeployTarget::Vercel => "vercel",
            DeployTarget::GithubPages => "github_pages",
        }
    }

    pub fn is_static_hosting(self) -> bool {
        matches!(self, DeployTarget::GithubPages)
    }
}

impl fmt::Display for DeployTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeployTarget {
    type Err = AppgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vercel" => Ok(DeployTarget::Vercel),
            "github_pages" => Ok(DeployTarget::GithubPages),
            _ => Err(AppgenError::InvalidDeployTarget(s.to_string())),
        }
    }
}
