//! JSON persistence of a [`Diagram`]

use crate::core::dialect::Dialect;
use crate::core::schema::Diagram;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Invalid snapshot: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Pretty-printed JSON with camelCase keys
pub fn to_json(diagram: &Diagram) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(diagram).map_err(SnapshotError::Serialize)
}

pub fn from_json(json: &str) -> Result<Diagram, SnapshotError> {
    let diagram: Diagram = serde_json::from_str(json).map_err(SnapshotError::Parse)?;
    tracing::debug!(
        "Parsed snapshot '{}' ({} tables)",
        diagram.title,
        diagram.tables.len()
    );
    Ok(diagram)
}

/// Like [`from_json`], but a document without a `dialect` key gets `dialect`
pub fn from_json_or(json: &str, dialect: Dialect) -> Result<Diagram, SnapshotError> {
    let mut value: serde_json::Value = serde_json::from_str(json).map_err(SnapshotError::Parse)?;
    if let Some(object) = value.as_object_mut() {
        object
            .entry("dialect")
            .or_insert_with(|| serde_json::Value::String(dialect.id().to_string()));
    }
    serde_json::from_value(value).map_err(SnapshotError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{
        Area, DefaultValue, Field, ForeignKeyAction, Index, Note, create_demo_diagram,
    };
    use std::sync::Arc;

    #[test]
    fn test_round_trip_is_lossless() {
        let mut diagram = create_demo_diagram(Dialect::PostgreSql);
        Arc::make_mut(&mut diagram.tables[0]).fields.push(
            Field::new("created_at", "TIMESTAMP")
                .with_default(DefaultValue::keyword("CURRENT_TIMESTAMP"))
                .with_comment("insert time"),
        );
        Arc::make_mut(&mut diagram.tables[0])
            .indexes
            .push(Index::new(["name", "created_at"]).unique().with_type("BTREE"));
        diagram.relationships[0].delete_constraint = ForeignKeyAction::Cascade;
        diagram.notes.push(Note::new("n", "text"));
        diagram.areas.push(Area::new("a", 10.0, 20.0));

        let json = to_json(&diagram).unwrap();
        assert_eq!(from_json(&json).unwrap(), diagram);
    }

    #[test]
    fn test_wire_format() {
        let diagram = create_demo_diagram(Dialect::MsSql);
        let value: serde_json::Value = serde_json::from_str(&to_json(&diagram).unwrap()).unwrap();

        assert_eq!(value["dialect"], "mssql");
        assert_eq!(value["tables"][0]["fields"][0]["type"], "INT");
        assert_eq!(value["tables"][0]["fields"][1]["notNull"], true);
        assert!(value["relationships"][0]["startTableId"].is_string());
        assert_eq!(value["relationships"][0]["cardinality"], "one_to_many");
        assert_eq!(value["relationships"][0]["deleteConstraint"], "no_action");
    }

    #[test]
    fn test_minimal_document_uses_defaults() {
        let diagram = from_json(
            r#"{"tables":[{"id":"t1","name":"users","fields":[{"id":"f1","name":"id","type":"INT"}]}]}"#,
        )
        .unwrap();
        assert_eq!(diagram.dialect, Dialect::MySql);
        assert_eq!(diagram.tables[0].fields[0].data_type, "INT");
        assert!(diagram.relationships.is_empty());
    }

    #[test]
    fn test_fallback_dialect_only_when_missing() {
        let bare = r#"{"title":"t"}"#;
        assert_eq!(from_json_or(bare, Dialect::Oracle).unwrap().dialect, Dialect::Oracle);

        let named = r#"{"title":"t","dialect":"sqlite"}"#;
        assert_eq!(from_json_or(named, Dialect::Oracle).unwrap().dialect, Dialect::Sqlite);
    }

    #[test]
    fn test_invalid_json() {
        let err = from_json("{ not json").unwrap_err();
        assert!(matches!(err, SnapshotError::Parse(_)));
        assert!(err.to_string().starts_with("Invalid snapshot"));
    }
}
