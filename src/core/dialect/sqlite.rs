use super::{
    CommentStyle, DialectConfig, ForeignKeyPlacement, IncrementStrategy, IndexTypePlacement,
    TypeInfo,
};
use crate::core::schema::ForeignKeyAction;

// SQLite has type affinity rather than strict types; names are kept close to
// what the column stores.
const TYPES: &[TypeInfo] = &[
    TypeInfo::new("TINYINT", "INTEGER").integer(),
    TypeInfo::new("SMALLINT", "INTEGER").integer(),
    TypeInfo::new("INT", "INTEGER").integer(),
    TypeInfo::new("INTEGER", "INTEGER").integer(),
    TypeInfo::new("BIGINT", "INTEGER").integer(),
    TypeInfo::new("DECIMAL", "NUMERIC").numeric().with_precision(),
    TypeInfo::new("NUMERIC", "NUMERIC").numeric().with_precision(),
    TypeInfo::new("NUMBER", "NUMERIC").numeric().with_precision(),
    TypeInfo::new("FLOAT", "REAL").numeric(),
    TypeInfo::new("REAL", "REAL").numeric(),
    TypeInfo::new("DOUBLE", "REAL").numeric(),
    TypeInfo::new("CHAR", "CHAR").sized(1),
    TypeInfo::new("VARCHAR", "VARCHAR").sized(255),
    TypeInfo::new("TEXT", "TEXT"),
    TypeInfo::new("BOOLEAN", "INTEGER").unquoted(),
    TypeInfo::new("DATE", "DATE"),
    TypeInfo::new("TIME", "TIME"),
    TypeInfo::new("DATETIME", "DATETIME"),
    TypeInfo::new("TIMESTAMP", "TIMESTAMP"),
    TypeInfo::new("UUID", "TEXT"),
    TypeInfo::new("JSON", "TEXT"),
    TypeInfo::new("BLOB", "BLOB").without_check(),
    TypeInfo::new("BINARY", "BLOB").without_check(),
    TypeInfo::new("VARBINARY", "BLOB").without_check(),
];

const ACTIONS: &[ForeignKeyAction] = &[
    ForeignKeyAction::NoAction,
    ForeignKeyAction::Restrict,
    ForeignKeyAction::Cascade,
    ForeignKeyAction::SetNull,
    ForeignKeyAction::SetDefault,
];

pub const SQLITE: DialectConfig = DialectConfig {
    id: "sqlite",
    name: "SQLite",
    identifier_quotes: ('"', '"'),
    increment: IncrementStrategy::InlinePrimaryKey("PRIMARY KEY AUTOINCREMENT"),
    comment_style: CommentStyle::Inline,
    foreign_keys: ForeignKeyPlacement::Inline,
    inline_indexes: false,
    index_types: &[],
    index_type_placement: IndexTypePlacement::UsingSuffix,
    update_actions: ACTIONS,
    delete_actions: ACTIONS,
    batch_separator: None,
    supports_if_not_exists: true,
    supports_unsigned: false,
    supports_arrays: false,
    true_literal: "1",
    false_literal: "0",
    default_functions: &["CURRENT_TIMESTAMP", "DATETIME('NOW')", "DATE('NOW')"],
    types: TYPES,
};
