use super::{
    CommentStyle, DialectConfig, ForeignKeyPlacement, IncrementStrategy, IndexTypePlacement,
    TypeInfo,
};
use crate::core::schema::ForeignKeyAction;

const TYPES: &[TypeInfo] = &[
    TypeInfo::new("TINYINT", "NUMBER(3)").integer(),
    TypeInfo::new("SMALLINT", "NUMBER(5)").integer(),
    TypeInfo::new("INT", "NUMBER(10)").integer(),
    TypeInfo::new("INTEGER", "NUMBER(10)").integer(),
    TypeInfo::new("BIGINT", "NUMBER(19)").integer(),
    TypeInfo::new("DECIMAL", "NUMBER")
        .numeric()
        .with_precision()
        .drop_zero_scale(),
    TypeInfo::new("NUMERIC", "NUMBER")
        .numeric()
        .with_precision()
        .drop_zero_scale(),
    TypeInfo::new("NUMBER", "NUMBER")
        .numeric()
        .with_precision()
        .drop_zero_scale(),
    TypeInfo::new("FLOAT", "BINARY_FLOAT").numeric(),
    TypeInfo::new("REAL", "BINARY_FLOAT").numeric(),
    TypeInfo::new("DOUBLE", "BINARY_DOUBLE").numeric(),
    TypeInfo::new("CHAR", "CHAR").sized(1),
    TypeInfo::new("VARCHAR", "VARCHAR2").sized(255),
    TypeInfo::new("VARCHAR2", "VARCHAR2").sized(255),
    TypeInfo::new("TEXT", "CLOB").without_check(),
    TypeInfo::new("BOOLEAN", "NUMBER(1)").unquoted(),
    TypeInfo::new("DATE", "DATE"),
    TypeInfo::new("TIME", "TIMESTAMP"),
    TypeInfo::new("DATETIME", "TIMESTAMP"),
    TypeInfo::new("TIMESTAMP", "TIMESTAMP"),
    TypeInfo::new("UUID", "VARCHAR2").sized(36),
    TypeInfo::new("JSON", "CLOB").without_check(),
    TypeInfo::new("BLOB", "BLOB").without_check(),
    TypeInfo::new("BINARY", "RAW").sized(16).without_check(),
    TypeInfo::new("VARBINARY", "RAW").sized(2000).without_check(),
];

pub const ORACLE: DialectConfig = DialectConfig {
    id: "oracle",
    name: "Oracle",
    identifier_quotes: ('"', '"'),
    increment: IncrementStrategy::Identity("GENERATED BY DEFAULT AS IDENTITY"),
    comment_style: CommentStyle::Statement,
    foreign_keys: ForeignKeyPlacement::AlterTable,
    inline_indexes: false,
    index_types: &["BITMAP"],
    index_type_placement: IndexTypePlacement::Modifier,
    update_actions: &[],
    delete_actions: &[ForeignKeyAction::Cascade, ForeignKeyAction::SetNull],
    batch_separator: None,
    supports_if_not_exists: false,
    supports_unsigned: false,
    supports_arrays: false,
    true_literal: "1",
    false_literal: "0",
    default_functions: &["SYS_GUID()", "SYSDATE", "SYSTIMESTAMP", "CURRENT_TIMESTAMP"],
    types: TYPES,
};
