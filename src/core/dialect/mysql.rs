use super::{
    CommentStyle, DialectConfig, ForeignKeyPlacement, IncrementStrategy, IndexTypePlacement,
    TypeInfo,
};
use crate::core::schema::ForeignKeyAction;

const TYPES: &[TypeInfo] = &[
    TypeInfo::new("TINYINT", "TINYINT").integer(),
    TypeInfo::new("SMALLINT", "SMALLINT").integer(),
    TypeInfo::new("INT", "INT").integer(),
    TypeInfo::new("INTEGER", "INT").integer(),
    TypeInfo::new("BIGINT", "BIGINT").integer(),
    TypeInfo::new("DECIMAL", "DECIMAL").numeric().with_precision(),
    TypeInfo::new("NUMERIC", "DECIMAL").numeric().with_precision(),
    TypeInfo::new("NUMBER", "DECIMAL").numeric().with_precision(),
    TypeInfo::new("FLOAT", "FLOAT").numeric(),
    TypeInfo::new("REAL", "DOUBLE").numeric(),
    TypeInfo::new("DOUBLE", "DOUBLE").numeric(),
    TypeInfo::new("CHAR", "CHAR").sized(1),
    TypeInfo::new("VARCHAR", "VARCHAR").sized(255),
    TypeInfo::new("TEXT", "TEXT"),
    TypeInfo::new("BOOLEAN", "BOOLEAN").unquoted(),
    TypeInfo::new("DATE", "DATE"),
    TypeInfo::new("TIME", "TIME"),
    TypeInfo::new("DATETIME", "DATETIME"),
    TypeInfo::new("TIMESTAMP", "TIMESTAMP"),
    TypeInfo::new("UUID", "CHAR").sized(36),
    TypeInfo::new("JSON", "JSON").without_check(),
    TypeInfo::new("BLOB", "BLOB").without_check(),
    TypeInfo::new("BINARY", "BINARY").sized(1),
    TypeInfo::new("VARBINARY", "VARBINARY").sized(255),
];

pub const MYSQL: DialectConfig = DialectConfig {
    id: "mysql",
    name: "MySQL",
    identifier_quotes: ('`', '`'),
    increment: IncrementStrategy::Keyword("AUTO_INCREMENT"),
    comment_style: CommentStyle::Inline,
    foreign_keys: ForeignKeyPlacement::AlterTable,
    inline_indexes: true,
    index_types: &["BTREE", "HASH"],
    index_type_placement: IndexTypePlacement::UsingSuffix,
    update_actions: &[
        ForeignKeyAction::NoAction,
        ForeignKeyAction::Restrict,
        ForeignKeyAction::Cascade,
        ForeignKeyAction::SetNull,
    ],
    delete_actions: &[
        ForeignKeyAction::NoAction,
        ForeignKeyAction::Restrict,
        ForeignKeyAction::Cascade,
        ForeignKeyAction::SetNull,
    ],
    batch_separator: None,
    supports_if_not_exists: true,
    supports_unsigned: true,
    supports_arrays: false,
    true_literal: "TRUE",
    false_literal: "FALSE",
    default_functions: &[
        "NOW()",
        "CURRENT_TIMESTAMP()",
        "UTC_TIMESTAMP()",
        "CURDATE()",
        "CURTIME()",
        "UUID()",
    ],
    types: TYPES,
};
