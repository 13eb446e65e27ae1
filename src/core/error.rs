/// Mutation API errors.
///
/// Every variant leaves the diagram and history exactly as they were, so a
/// caller that prefers silent no-ops can discard the error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Field {field_id} not found in table {table_id}")]
    FieldNotFound { table_id: String, field_id: String },

    #[error("Index {index_id} not found in table {table_id}")]
    IndexNotFound { table_id: String, index_id: String },

    #[error("Relationship not found: {0}")]
    RelationshipNotFound(String),

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Area not found: {0}")]
    AreaNotFound(String),

    #[error("Relationship endpoint {table_id}.{field_id} does not resolve")]
    UnresolvedEndpoint { table_id: String, field_id: String },

    #[error("Duplicate id: {0}")]
    DuplicateId(String),
}

impl SchemaError {
    pub fn is_not_found(&self) -> bool {
        !matches!(
            self,
            SchemaError::UnresolvedEndpoint { .. } | SchemaError::DuplicateId(_)
        )
    }
}

/// Result type for mutation operations
pub type SchemaResult<T> = Result<T, SchemaError>;
