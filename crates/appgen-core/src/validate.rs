//! Two-stage App Specification validation.
//!
//! Stage 1 checks the candidate against the embedded JSON Schema and decodes
//! it into [`AppSpec`]. Stage 2 runs only on a structurally valid spec and
//! checks the rules the schema cannot express. Each stage has its own error
//! variant so callers can tell them apart.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::collections::HashSet;

use crate::error::{AppgenError, FieldIssue, Result};
use crate::route::page_path_problem;
use crate::spec::{AppSpec, FieldType};

/// The schema document shared by the validator and the generation prompt.
pub const APPSPEC_SCHEMA: &str = include_str!("../schema/appspec.schema.json");

pub struct Validator {
    schema: Value,
    compiled: JSONSchema,
}

impl Validator {
    pub fn new() -> Result<Self> {
        let schema: Value = serde_json::from_str(APPSPEC_SCHEMA)
            .map_err(|e| AppgenError::Schema(format!("failed to parse AppSpec schema: {e}")))?;
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft202012)
            .compile(&schema)
            .map_err(|e| AppgenError::Schema(format!("failed to compile AppSpec schema: {e}")))?;
        Ok(Self { schema, compiled })
    }

    /// The raw schema document.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Run both stages and return the typed spec.
    pub fn validate(&self, candidate: &Value) -> Result<AppSpec> {
        let spec = self.structural(candidate)?;
        refine(&spec)?;
        Ok(spec)
    }

    /// Stage 1: schema conformance, then decode.
    pub fn structural(&self, candidate: &Value) -> Result<AppSpec> {
        if let Err(errors) = self.compiled.validate(candidate) {
            let issues: Vec<FieldIssue> = errors
                .map(|e| FieldIssue::new(e.instance_path.to_string(), e.to_string()))
                .collect();
            return Err(AppgenError::structural(issues));
        }
        serde_json::from_value(candidate.clone())
            .map_err(|e| AppgenError::structural(vec![FieldIssue::new("/", e.to_string())]))
    }
}

/// Stage 2: semantic rules over a structurally valid spec.
///
/// - `enumValues` is non-empty exactly when the field type is `enum`
/// - entity names are unique
/// - field names are unique within an entity
/// - page paths stay inside the app directory
pub fn refine(spec: &AppSpec) -> Result<()> {
    let mut issues = Vec::new();
    let mut entity_names = HashSet::new();

    for (i, page) in spec.features.pages.iter().enumerate() {
        if let Some(problem) = page_path_problem(page.path()) {
            issues.push(FieldIssue::new(
                format!("/features/pages/{i}"),
                format!("page path '{}' {problem}", page.path()),
            ));
        }
    }

    for (i, entity) in spec.app.entities.iter().enumerate() {
        if !entity_names.insert(entity.name.as_str()) {
            issues.push(FieldIssue::new(
                format!("/app/entities/{i}/name"),
                format!("duplicate entity name '{}'", entity.name),
            ));
        }

        let mut field_names = HashSet::new();
        for (j, field) in entity.fields.iter().enumerate() {
            let path = format!("/app/entities/{i}/fields/{j}");
            if !field_names.insert(field.name.as_str()) {
                issues.push(FieldIssue::new(
                    format!("{path}/name"),
                    format!("duplicate field '{}' in entity '{}'", field.name, entity.name),
                ));
            }
            let has_values = !field.enum_values().is_empty();
            match (field.field_type, has_values) {
                (FieldType::Enum, false) => issues.push(FieldIssue::new(
                    format!("{path}/enumValues"),
                    "enum type requires enumValues",
                )),
                (t, true) if t != FieldType::Enum => issues.push(FieldIssue::new(
                    format!("{path}/enumValues"),
                    "enumValues is only allowed when type is enum",
                )),
                _ => {}
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppgenError::refinement(issues))
    }
}
