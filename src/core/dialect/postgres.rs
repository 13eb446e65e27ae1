use super::{
    CommentStyle, DialectConfig, ForeignKeyPlacement, IncrementStrategy, IndexTypePlacement,
    TypeInfo,
};
use crate::core::schema::ForeignKeyAction;

const TYPES: &[TypeInfo] = &[
    TypeInfo::new("TINYINT", "SMALLINT").integer(),
    TypeInfo::new("SMALLINT", "SMALLINT").integer(),
    TypeInfo::new("INT", "INTEGER").integer(),
    TypeInfo::new("INTEGER", "INTEGER").integer(),
    TypeInfo::new("BIGINT", "BIGINT").integer(),
    TypeInfo::new("DECIMAL", "DECIMAL").numeric().with_precision(),
    TypeInfo::new("NUMERIC", "NUMERIC").numeric().with_precision(),
    TypeInfo::new("NUMBER", "NUMERIC").numeric().with_precision(),
    TypeInfo::new("FLOAT", "REAL").numeric(),
    TypeInfo::new("REAL", "REAL").numeric(),
    TypeInfo::new("DOUBLE", "DOUBLE PRECISION").numeric(),
    TypeInfo::new("CHAR", "CHAR").sized(1),
    TypeInfo::new("VARCHAR", "VARCHAR").sized(255),
    TypeInfo::new("TEXT", "TEXT"),
    TypeInfo::new("BOOLEAN", "BOOLEAN").unquoted(),
    TypeInfo::new("DATE", "DATE"),
    TypeInfo::new("TIME", "TIME"),
    TypeInfo::new("DATETIME", "TIMESTAMP"),
    TypeInfo::new("TIMESTAMP", "TIMESTAMP"),
    TypeInfo::new("TIMESTAMPTZ", "TIMESTAMPTZ"),
    TypeInfo::new("UUID", "UUID"),
    TypeInfo::new("JSON", "JSON").without_check(),
    TypeInfo::new("JSONB", "JSONB").without_check(),
    TypeInfo::new("BLOB", "BYTEA").without_check(),
    TypeInfo::new("BINARY", "BYTEA").without_check(),
    TypeInfo::new("VARBINARY", "BYTEA").without_check(),
];

const ACTIONS: &[ForeignKeyAction] = &[
    ForeignKeyAction::NoAction,
    ForeignKeyAction::Restrict,
    ForeignKeyAction::Cascade,
    ForeignKeyAction::SetNull,
    ForeignKeyAction::SetDefault,
];

pub const POSTGRESQL: DialectConfig = DialectConfig {
    id: "postgresql",
    name: "PostgreSQL",
    identifier_quotes: ('"', '"'),
    increment: IncrementStrategy::Identity("GENERATED BY DEFAULT AS IDENTITY"),
    comment_style: CommentStyle::Statement,
    foreign_keys: ForeignKeyPlacement::AlterTable,
    inline_indexes: false,
    index_types: &["BTREE", "HASH", "GIST", "SPGIST", "GIN", "BRIN"],
    index_type_placement: IndexTypePlacement::UsingBeforeColumns,
    update_actions: ACTIONS,
    delete_actions: ACTIONS,
    batch_separator: None,
    supports_if_not_exists: true,
    supports_unsigned: false,
    supports_arrays: true,
    true_literal: "TRUE",
    false_literal: "FALSE",
    default_functions: &[
        "NOW()",
        "CURRENT_TIMESTAMP()",
        "GEN_RANDOM_UUID()",
        "UUID_GENERATE_V4()",
        "CLOCK_TIMESTAMP()",
        "TRANSACTION_TIMESTAMP()",
    ],
    types: TYPES,
};
