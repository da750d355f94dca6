//! Prisma schema generation from declared entities.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::spec::{AppSpec, FieldType};

const HEADER: &str = r#"generator client {
  provider = "prisma-client-js"
}

datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}"#;

fn non_identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid regex"))
}

/// Columns every model gets; declared fields with these names are dropped.
const GENERATED_COLUMNS: [&str; 2] = ["id", "createdAt"];

/// Replace every character Prisma rejects in an identifier with `_`.
/// Identifiers must start with a letter, so anything else gets an `x` prefix.
pub fn sanitize_identifier(name: &str) -> String {
    let cleaned = non_identifier().replace_all(name.trim(), "_");
    match cleaned.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => cleaned.into_owned(),
        _ => format!("x{cleaned}"),
    }
}

fn prisma_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::String | FieldType::Text | FieldType::Enum => "String",
        FieldType::Int => "Int",
        FieldType::Float => "Float",
        FieldType::Bool => "Boolean",
        FieldType::Date | FieldType::Datetime => "DateTime",
        FieldType::Json => "Json",
    }
}

/// Render `schema.prisma`: header, one enum block per enum field, then one
/// model per entity with `id` and `createdAt` columns.
pub fn render_schema(spec: &AppSpec) -> String {
    let mut enums = Vec::new();
    let mut models = Vec::new();

    for entity in &spec.app.entities {
        let model = sanitize_identifier(&entity.name);
        let mut lines = vec![
            format!("model {model} {{"),
            "  id        String   @id @default(cuid())".to_string(),
            "  createdAt DateTime @default(now())".to_string(),
        ];
        let mut seen: HashSet<String> = GENERATED_COLUMNS.iter().map(|c| c.to_string()).collect();
        for field in &entity.fields {
            let column = sanitize_identifier(&field.name);
            if !seen.insert(column.clone()) {
                tracing::warn!(
                    model = %model,
                    field = %field.name,
                    "field collides with an existing column, skipped"
                );
                continue;
            }
            let optional = if field.is_optional() { "?" } else { "" };
            let type_name = if field.field_type == FieldType::Enum {
                let enum_name = sanitize_identifier(&format!("{model}_{column}"));
                let values: Vec<String> = field
                    .enum_values()
                    .iter()
                    .map(|v| format!("  {}", sanitize_identifier(v)))
                    .collect();
                enums.push(format!("enum {enum_name} {{\n{}\n}}", values.join("\n")));
                enum_name
            } else {
                prisma_type(field.field_type).to_string()
            };
            lines.push(format!("  {column} {type_name}{optional}"));
        }
        lines.push("}".to_string());
        models.push(lines.join("\n"));
    }

    let mut blocks = vec![HEADER.to_string()];
    blocks.extend(enums);
    blocks.extend(models);
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}
