//! Deterministic fixture rows for pages that run without a database.

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use serde_json::{json, Map, Value};

use crate::route::pluralize;
use crate::spec::{AppSpec, Entity, EntityField, FieldType};

pub const ROWS_PER_COLLECTION: i64 = 10;

/// Date fields count back one day per row from this instant (2024-01-01T00:00:00Z).
const EPOCH_SECS: i64 = 1_704_067_200;

const CONDITIONS: [&str; 3] = ["new", "good", "fair"];
const FALLBACK_ENUM: [&str; 3] = ["A", "B", "C"];

fn default_entity() -> Entity {
    Entity {
        name: "Item".into(),
        fields: vec![
            EntityField::new("title", FieldType::String),
            EntityField::new("author", FieldType::String),
            EntityField::new("condition", FieldType::String),
        ],
    }
}

/// Build the fixture document: one collection per entity, keyed by the
/// lower-cased plural entity name.
pub fn build_fixtures(spec: &AppSpec) -> Value {
    let defaults;
    let entities: &[Entity] = if spec.app.entities.is_empty() {
        defaults = [default_entity()];
        &defaults
    } else {
        &spec.app.entities
    };

    let epoch = Utc.timestamp_opt(EPOCH_SECS, 0).single().unwrap_or_default();
    let mut doc = Map::new();
    for entity in entities {
        let rows: Vec<Value> = (1..=ROWS_PER_COLLECTION)
            .map(|i| fixture_row(entity, i, epoch))
            .collect();
        doc.insert(pluralize(&entity.name.to_lowercase()), Value::Array(rows));
    }
    Value::Object(doc)
}

fn fixture_row(entity: &Entity, i: i64, epoch: DateTime<Utc>) -> Value {
    let mut row = Map::new();
    row.insert("id".into(), Value::String(i.to_string()));
    for field in &entity.fields {
        row.insert(field.name.clone(), fixture_value(entity, field, i, epoch));
    }
    Value::Object(row)
}

fn fixture_value(entity: &Entity, field: &EntityField, i: i64, epoch: DateTime<Utc>) -> Value {
    match field.name.as_str() {
        "title" => return json!(format!("{} {i}", entity.name)),
        "author" => return json!(format!("Author {i}")),
        "condition" => return json!(CONDITIONS[(i % 3) as usize]),
        _ => {}
    }
    match field.field_type {
        FieldType::Int => json!(i),
        FieldType::Float => json!(i as f64 + 0.5),
        FieldType::Bool => json!(i % 2 == 0),
        FieldType::Enum => {
            let values = field.enum_values();
            if values.is_empty() {
                json!(FALLBACK_ENUM[(i % 3) as usize])
            } else {
                json!(values[i as usize % values.len()])
            }
        }
        FieldType::Date | FieldType::Datetime => {
            let at = epoch - Duration::days(i);
            json!(at.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        FieldType::Json => json!({ "sample": i }),
        FieldType::String | FieldType::Text => json!(format!("{} {i}", field.name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::test_support::sample_spec;

    #[test]
    fn default_entity_yields_ten_items() {
        let doc = build_fixtures(&sample_spec());
        let items = doc["items"].as_array().unwrap();
        assert_eq!(items.len(), 10);
        assert_eq!(items[0]["id"], "1");
        assert_eq!(items[0]["title"], "Item 1");
        assert_eq!(items[0]["author"], "Author 1");
        assert_eq!(items[0]["condition"], "good");
        assert_eq!(items[9]["id"], "10");
    }

    #[test]
    fn typed_fields_follow_row_index() {
        let mut status = EntityField::new("status", FieldType::Enum);
        status.enum_values = Some(vec!["open".into(), "closed".into()]);
        let mut spec = sample_spec();
        spec.app.entities = vec![Entity {
            name: "Task".into(),
            fields: vec![
                EntityField::new("count", FieldType::Int),
                EntityField::new("score", FieldType::Float),
                EntityField::new("done", FieldType::Bool),
                status,
                EntityField::new("due", FieldType::Date),
                EntityField::new("meta", FieldType::Json),
                EntityField::new("notes", FieldType::Text),
            ],
        }];
        let doc = build_fixtures(&spec);
        let row = &doc["tasks"][1];
        assert_eq!(row["count"], 2);
        assert_eq!(row["score"], 2.5);
        assert_eq!(row["done"], true);
        assert_eq!(row["status"], "open");
        assert_eq!(row["due"], "2023-12-30T00:00:00.000Z");
        assert_eq!(row["meta"], json!({ "sample": 2 }));
        assert_eq!(row["notes"], "notes 2");
    }

    #[test]
    fn fixtures_are_deterministic() {
        let spec = sample_spec();
        assert_eq!(build_fixtures(&spec), build_fixtures(&spec));
    }

    #[test]
    fn collection_names_are_plural_lowercase() {
        let mut spec = sample_spec();
        spec.app.entities = vec![
            Entity {
                name: "Book".into(),
                fields: vec![],
            },
            Entity {
                name: "Address".into(),
                fields: vec![],
            },
        ];
        let doc = build_fixtures(&spec);
        assert!(doc.get("books").is_some());
        assert!(doc.get("address").is_some());
    }
}
