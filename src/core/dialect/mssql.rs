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
    TypeInfo::new("NUMERIC", "NUMERIC").numeric().with_precision(),
    TypeInfo::new("NUMBER", "DECIMAL").numeric().with_precision(),
    TypeInfo::new("FLOAT", "FLOAT").numeric(),
    TypeInfo::new("REAL", "REAL").numeric(),
    TypeInfo::new("DOUBLE", "FLOAT").numeric(),
    TypeInfo::new("CHAR", "NCHAR").sized(1),
    TypeInfo::new("VARCHAR", "NVARCHAR").sized(255),
    TypeInfo::new("TEXT", "NVARCHAR(MAX)"),
    TypeInfo::new("BOOLEAN", "BIT").unquoted(),
    TypeInfo::new("DATE", "DATE"),
    TypeInfo::new("TIME", "TIME"),
    TypeInfo::new("DATETIME", "DATETIME2"),
    TypeInfo::new("TIMESTAMP", "DATETIME2"),
    TypeInfo::new("UUID", "UNIQUEIDENTIFIER"),
    TypeInfo::new("JSON", "NVARCHAR(MAX)"),
    TypeInfo::new("BLOB", "VARBINARY(MAX)").without_check(),
    TypeInfo::new("BINARY", "BINARY").sized(1).without_check(),
    TypeInfo::new("VARBINARY", "VARBINARY").sized(255).without_check(),
];

const ACTIONS: &[ForeignKeyAction] = &[
    ForeignKeyAction::NoAction,
    ForeignKeyAction::Cascade,
    ForeignKeyAction::SetNull,
    ForeignKeyAction::SetDefault,
];

pub const MSSQL: DialectConfig = DialectConfig {
    id: "mssql",
    name: "SQL Server",
    identifier_quotes: ('[', ']'),
    increment: IncrementStrategy::Identity("IDENTITY(1,1)"),
    comment_style: CommentStyle::Statement,
    foreign_keys: ForeignKeyPlacement::AlterTable,
    inline_indexes: false,
    index_types: &["CLUSTERED", "NONCLUSTERED"],
    index_type_placement: IndexTypePlacement::Modifier,
    update_actions: ACTIONS,
    delete_actions: ACTIONS,
    batch_separator: Some("GO"),
    supports_if_not_exists: false,
    supports_unsigned: false,
    supports_arrays: false,
    true_literal: "1",
    false_literal: "0",
    default_functions: &[
        "GETDATE()",
        "GETUTCDATE()",
        "SYSDATETIME()",
        "SYSUTCDATETIME()",
        "NEWID()",
        "NEWSEQUENTIALID()",
    ],
    types: TYPES,
};
