//! Built-in emitters. Anything the dialect record can express lives in the
//! trait defaults; these only cover syntax with no config equivalent.

use super::{DdlEmitter, EmitContext, Statement, helpers};
use crate::core::schema::{Field, Table};

/// MySQL / MariaDB: inline comments and indexes, `AUTO_INCREMENT`
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlEmitter;

impl DdlEmitter for MySqlEmitter {}

/// PostgreSQL: `COMMENT ON`, `CREATE INDEX ... USING`, identity columns
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresEmitter;

impl DdlEmitter for PostgresEmitter {}

/// Oracle: `COMMENT ON`, no `ON UPDATE` actions
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleEmitter;

impl DdlEmitter for OracleEmitter {}

/// SQLite keeps comments as SQL comments since it has no comment metadata
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteEmitter;

impl DdlEmitter for SqliteEmitter {
    fn decorate_table(&self, ctx: &EmitContext<'_>, table: &Table, sql: String) -> String {
        if ctx.options.include_comments && !table.comment.trim().is_empty() {
            format!("{}\n{}", helpers::line_comment(&table.comment), sql)
        } else {
            sql
        }
    }

    fn inline_column_comment(&self, _ctx: &EmitContext<'_>, comment: &str) -> String {
        format!("/* {} */", comment.replace("*/", "* /"))
    }
}

/// SQL Server stores descriptions as extended properties
#[derive(Debug, Clone, Copy, Default)]
pub struct MsSqlEmitter;

impl DdlEmitter for MsSqlEmitter {
    fn comment_statement(
        &self,
        ctx: &EmitContext<'_>,
        table: &Table,
        field: Option<&Field>,
        comment: &str,
    ) -> Statement {
        let q = |s: &str| ctx.config.quote_string(s);
        let mut sql = format!(
            "EXEC sp_addextendedproperty 'MS_Description', {}, 'SCHEMA', 'dbo', 'TABLE', {}",
            q(comment),
            q(&table.name)
        );
        if let Some(field) = field {
            sql.push_str(&format!(", 'COLUMN', {}", q(&field.name)));
        }
        Statement::new(sql)
    }
}
