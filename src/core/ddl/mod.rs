//! DDL generation
//!
//! Renders a [`Diagram`] into dialect-specific `CREATE TABLE`, comment,
//! index and foreign-key statements. Every emitter is a pure function of
//! the diagram, its [`DialectConfig`] and the [`DdlOptions`]; the default
//! methods of [`DdlEmitter`] read everything dialect-dependent from the
//! config, so a dialect only overrides what its syntax cannot express
//! through that record.
//!
//! Output order is tables, then comment statements, then indexes, then
//! foreign keys. Dialects with inline comments, inline indexes or inline
//! foreign keys fold those into the table statement.

mod emitters;
pub mod helpers;

use crate::core::dialect::{
    CommentStyle, DialectConfig, DialectRegistry, ForeignKeyPlacement, IncrementStrategy,
    IndexTypePlacement, registry,
};
use crate::core::schema::{Diagram, Field, ForeignKeyAction, Index, Table};

pub use emitters::{MsSqlEmitter, MySqlEmitter, OracleEmitter, PostgresEmitter, SqliteEmitter};
use helpers::{ResolvedForeignKey, quoted_list};

/// Generation switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlOptions {
    /// Use `IF NOT EXISTS` where the dialect supports it
    pub if_not_exists: bool,
    /// Emit table and column comments
    pub include_comments: bool,
}

impl Default for DdlOptions {
    fn default() -> Self {
        Self {
            if_not_exists: false,
            include_comments: true,
        }
    }
}

/// One top-level statement plus caveat lines about clauses the dialect could not express
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statement {
    pub sql: String,
    pub notes: Vec<String>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            notes: Vec::new(),
        }
    }

    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Terminate with `;`, add the batch separator, then the caveats as SQL comments
    pub fn render(&self, config: &DialectConfig) -> String {
        let mut out = format!("{};", self.sql);
        if let Some(separator) = config.batch_separator {
            out.push('\n');
            out.push_str(separator);
        }
        for note in &self.notes {
            out.push('\n');
            out.push_str(&helpers::line_comment(note));
        }
        out
    }
}

/// Everything an emitter reads
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    pub diagram: &'a Diagram,
    pub config: &'a DialectConfig,
    pub options: &'a DdlOptions,
}

impl EmitContext<'_> {
    pub fn quote(&self, name: &str) -> String {
        self.config.quote_identifier(name)
    }

    fn comments_enabled(&self, style: CommentStyle) -> bool {
        self.options.include_comments && self.config.comment_style == style
    }

    fn if_not_exists(&self) -> &'static str {
        if self.options.if_not_exists && self.config.supports_if_not_exists {
            "IF NOT EXISTS "
        } else {
            ""
        }
    }
}

/// Per-dialect DDL strategy
pub trait DdlEmitter: Send + Sync {
    /// Full statement sequence for a diagram
    fn emit(&self, ctx: &EmitContext<'_>) -> Vec<Statement> {
        let mut tables = Vec::new();
        let mut comments = Vec::new();
        let mut indexes = Vec::new();
        let mut foreign_keys = Vec::new();

        for table in &ctx.diagram.tables {
            tables.push(self.create_table(ctx, table));
            if ctx.comments_enabled(CommentStyle::Statement) {
                comments.extend(self.comment_statements(ctx, table));
            }
            if !ctx.config.inline_indexes {
                indexes.extend(
                    table
                        .indexes
                        .iter()
                        .filter_map(|index| self.create_index(ctx, table, index)),
                );
            }
        }

        if ctx.config.foreign_keys == ForeignKeyPlacement::AlterTable {
            for relationship in &ctx.diagram.relationships {
                match helpers::resolve_foreign_key(ctx.diagram, relationship) {
                    Some(fk) => foreign_keys.push(self.add_foreign_key(ctx, &fk)),
                    None => tracing::warn!(
                        "Skipping relationship {}: endpoint no longer exists",
                        relationship.id
                    ),
                }
            }
        }

        tables
            .into_iter()
            .chain(comments)
            .chain(indexes)
            .chain(foreign_keys)
            .collect()
    }

    /// `CREATE TABLE` with columns, primary key and any inline clauses
    fn create_table(&self, ctx: &EmitContext<'_>, table: &Table) -> Statement {
        let mut notes = Vec::new();
        let mut lines: Vec<String> = table
            .fields
            .iter()
            .map(|field| self.column_definition(ctx, table, field, &mut notes))
            .collect();

        if let Some(primary_key) = self.primary_key_clause(ctx, table) {
            lines.push(primary_key);
        }

        if ctx.config.inline_indexes {
            lines.extend(
                table
                    .indexes
                    .iter()
                    .filter_map(|index| self.inline_index(ctx, table, index, &mut notes)),
            );
        }

        if ctx.config.foreign_keys == ForeignKeyPlacement::Inline {
            for relationship in ctx
                .diagram
                .relationships
                .iter()
                .filter(|r| r.start_table_id == table.id)
            {
                match helpers::resolve_foreign_key(ctx.diagram, relationship) {
                    Some(fk) => lines.push(self.foreign_key_clause(ctx, &fk, &mut notes)),
                    None => tracing::warn!(
                        "Skipping relationship {}: endpoint no longer exists",
                        relationship.id
                    ),
                }
            }
        }

        let body = lines
            .iter()
            .map(|line| format!("\t{}", line))
            .collect::<Vec<_>>()
            .join(",\n");
        let sql = format!(
            "CREATE TABLE {}{} (\n{}\n)",
            ctx.if_not_exists(),
            ctx.quote(&table.name),
            body
        );

        Statement::new(self.decorate_table(ctx, table, sql)).with_notes(notes)
    }

    /// Add an inline table comment around the finished `CREATE TABLE` text
    fn decorate_table(&self, ctx: &EmitContext<'_>, table: &Table, sql: String) -> String {
        if ctx.comments_enabled(CommentStyle::Inline) && !table.comment.trim().is_empty() {
            format!("{} COMMENT={}", sql, ctx.config.quote_string(&table.comment))
        } else {
            sql
        }
    }

    /// One column line; caveats about dropped clauses go to `notes`
    fn column_definition(
        &self,
        ctx: &EmitContext<'_>,
        table: &Table,
        field: &Field,
        notes: &mut Vec<String>,
    ) -> String {
        let config = ctx.config;
        let mut parts = vec![ctx.quote(&field.name), helpers::render_type(config, field)];

        if field.is_array && !config.supports_arrays {
            notes.push(format!(
                "{}.{} is an array column; {} has no array types, element type used",
                table.name, field.name, config.name
            ));
        }

        if field.unsigned {
            if config.supports_unsigned && config.signed(&field.data_type) {
                parts.push("UNSIGNED".to_string());
            } else {
                notes.push(format!(
                    "{}.{}: {} has no UNSIGNED {}; clause omitted",
                    table.name, field.name, config.name, field.data_type
                ));
            }
        }

        if field.increment {
            match config.increment {
                IncrementStrategy::Identity(clause) => parts.push(clause.to_string()),
                IncrementStrategy::InlinePrimaryKey(clause) => {
                    match helpers::inline_primary_key(config, table) {
                        Some(pk) if pk.id == field.id => parts.push(clause.to_string()),
                        _ => notes.push(format!(
                            "{}.{}: {} requires a single-column primary key; auto-increment omitted",
                            table.name, field.name, clause
                        )),
                    }
                }
                IncrementStrategy::Keyword(_) => {}
            }
        }

        if let Some(default) = helpers::render_default(config, field) {
            parts.push(format!("DEFAULT {}", default));
        }

        if field.is_required() {
            parts.push("NOT NULL".to_string());
        }

        if field.unique {
            parts.push("UNIQUE".to_string());
        }

        if field.increment
            && let IncrementStrategy::Keyword(keyword) = config.increment
        {
            parts.push(keyword.to_string());
        }

        if let Some(check) = field.check.as_deref().map(str::trim)
            && !check.is_empty()
        {
            if config.has_check(&field.data_type) {
                parts.push(format!("CHECK({})", check));
            } else {
                notes.push(format!(
                    "{}.{}: {} does not support CHECK on {}; CHECK({}) omitted",
                    table.name, field.name, config.name, field.data_type, check
                ));
            }
        }

        if ctx.comments_enabled(CommentStyle::Inline) && !field.comment.trim().is_empty() {
            parts.push(self.inline_column_comment(ctx, &field.comment));
        }

        parts.join(" ")
    }

    fn inline_column_comment(&self, ctx: &EmitContext<'_>, comment: &str) -> String {
        format!("COMMENT {}", ctx.config.quote_string(comment))
    }

    /// `PRIMARY KEY(...)` over every primary field, unless the key went inline
    fn primary_key_clause(&self, ctx: &EmitContext<'_>, table: &Table) -> Option<String> {
        if helpers::inline_primary_key(ctx.config, table).is_some() {
            return None;
        }
        let columns: Vec<&str> = table.primary_fields().map(|f| f.name.as_str()).collect();
        if columns.is_empty() {
            return None;
        }
        Some(format!("PRIMARY KEY({})", quoted_list(ctx.config, columns)))
    }

    /// Index clause inside `CREATE TABLE`
    fn inline_index(
        &self,
        ctx: &EmitContext<'_>,
        table: &Table,
        index: &Index,
        notes: &mut Vec<String>,
    ) -> Option<String> {
        let columns = helpers::index_columns(table, index);
        if columns.is_empty() {
            tracing::warn!("Skipping index {} on {}: no resolvable fields", index.id, table.name);
            return None;
        }
        let mut clause = format!(
            "{}INDEX {} ({})",
            if index.unique { "UNIQUE " } else { "" },
            ctx.quote(&helpers::index_name(table, index)),
            quoted_list(ctx.config, columns)
        );
        if let Some(index_type) = self.index_type(ctx, table, index, notes) {
            clause.push_str(&format!(" USING {}", index_type));
        }
        Some(clause)
    }

    /// Stand-alone `CREATE INDEX`
    fn create_index(&self, ctx: &EmitContext<'_>, table: &Table, index: &Index) -> Option<Statement> {
        let columns = helpers::index_columns(table, index);
        if columns.is_empty() {
            tracing::warn!("Skipping index {} on {}: no resolvable fields", index.id, table.name);
            return None;
        }
        let mut notes = Vec::new();
        let index_type = self.index_type(ctx, table, index, &mut notes);
        let unique = if index.unique { "UNIQUE " } else { "" };
        let name = ctx.quote(&helpers::index_name(table, index));
        let on = ctx.quote(&table.name);
        let columns = quoted_list(ctx.config, columns);
        let exists = ctx.if_not_exists();

        let sql = match (index_type, ctx.config.index_type_placement) {
            (Some(t), IndexTypePlacement::Modifier) => {
                format!("CREATE {unique}{t} INDEX {exists}{name} ON {on} ({columns})")
            }
            (Some(t), IndexTypePlacement::UsingBeforeColumns) => {
                format!("CREATE {unique}INDEX {exists}{name} ON {on} USING {t} ({columns})")
            }
            (Some(t), IndexTypePlacement::UsingSuffix) => {
                format!("CREATE {unique}INDEX {exists}{name} ON {on} ({columns}) USING {t}")
            }
            (None, _) => format!("CREATE {unique}INDEX {exists}{name} ON {on} ({columns})"),
        };
        Some(Statement::new(sql).with_notes(notes))
    }

    /// Upper-cased index type if the dialect supports it; otherwise a caveat
    fn index_type(
        &self,
        ctx: &EmitContext<'_>,
        table: &Table,
        index: &Index,
        notes: &mut Vec<String>,
    ) -> Option<String> {
        let requested = index.index_type.as_deref().map(str::trim)?;
        if requested.is_empty() {
            return None;
        }
        if ctx.config.supports_index_type(requested) {
            Some(requested.to_uppercase())
        } else {
            notes.push(format!(
                "index {} on {}: {} does not support index type {}; default used",
                helpers::index_name(table, index),
                table.name,
                ctx.config.name,
                requested
            ));
            None
        }
    }

    /// `CONSTRAINT ... FOREIGN KEY ... REFERENCES ...` with the supported actions
    fn foreign_key_clause(
        &self,
        ctx: &EmitContext<'_>,
        fk: &ResolvedForeignKey<'_>,
        notes: &mut Vec<String>,
    ) -> String {
        let config = ctx.config;
        let mut clause = format!(
            "CONSTRAINT {} FOREIGN KEY({}) REFERENCES {}({})",
            ctx.quote(&fk.name),
            ctx.quote(&fk.field.name),
            ctx.quote(&fk.ref_table.name),
            ctx.quote(&fk.ref_field.name)
        );

        let actions = [
            ("UPDATE", fk.on_update, config.supports_update_action(fk.on_update)),
            ("DELETE", fk.on_delete, config.supports_delete_action(fk.on_delete)),
        ];
        for (event, action, supported) in actions {
            if supported {
                clause.push_str(&format!(" ON {} {}", event, action));
            } else if action != ForeignKeyAction::NoAction {
                notes.push(format!(
                    "{}: {} does not support ON {} {}; clause omitted",
                    fk.name, config.name, event, action
                ));
            }
        }
        clause
    }

    /// `ALTER TABLE ... ADD CONSTRAINT ...`
    fn add_foreign_key(&self, ctx: &EmitContext<'_>, fk: &ResolvedForeignKey<'_>) -> Statement {
        let mut notes = Vec::new();
        let clause = self.foreign_key_clause(ctx, fk, &mut notes);
        Statement::new(format!("ALTER TABLE {} ADD {}", ctx.quote(&fk.table.name), clause))
            .with_notes(notes)
    }

    /// Separate comment statements for a table and its columns
    fn comment_statements(&self, ctx: &EmitContext<'_>, table: &Table) -> Vec<Statement> {
        let table_comment = Some(table.comment.as_str())
            .filter(|c| !c.trim().is_empty())
            .map(|c| self.comment_statement(ctx, table, None, c));
        let field_comments = table
            .fields
            .iter()
            .filter(|f| !f.comment.trim().is_empty())
            .map(|f| self.comment_statement(ctx, table, Some(f), &f.comment));
        table_comment.into_iter().chain(field_comments).collect()
    }

    /// `COMMENT ON TABLE|COLUMN ... IS '...'`
    fn comment_statement(
        &self,
        ctx: &EmitContext<'_>,
        table: &Table,
        field: Option<&Field>,
        comment: &str,
    ) -> Statement {
        let text = ctx.config.quote_string(comment);
        let sql = match field {
            Some(field) => format!(
                "COMMENT ON COLUMN {}.{} IS {}",
                ctx.quote(&table.name),
                ctx.quote(&field.name),
                text
            ),
            None => format!("COMMENT ON TABLE {} IS {}", ctx.quote(&table.name), text),
        };
        Statement::new(sql)
    }
}

impl DialectRegistry {
    /// Statement list for a diagram in the given dialect
    pub fn generate_statements(
        &self,
        diagram: &Diagram,
        dialect_id: &str,
        options: &DdlOptions,
    ) -> Vec<String> {
        let entry = self.entry(dialect_id);
        let ctx = EmitContext {
            diagram,
            config: &entry.config,
            options,
        };
        let statements = entry.emitter.emit(&ctx);
        tracing::debug!(
            "Generated {} {} statements for '{}'",
            statements.len(),
            entry.config.name,
            diagram.title
        );
        statements
            .iter()
            .map(|statement| statement.render(&entry.config))
            .collect()
    }

    /// Newline-joined DDL document
    pub fn generate(&self, diagram: &Diagram, dialect_id: &str, options: &DdlOptions) -> String {
        self.generate_statements(diagram, dialect_id, options)
            .join("\n\n")
    }
}

/// Generate a DDL document with the built-in registry
pub fn generate(diagram: &Diagram, dialect_id: &str, options: &DdlOptions) -> String {
    registry().generate(diagram, dialect_id, options)
}

/// Generate individual statements with the built-in registry
pub fn generate_statements(diagram: &Diagram, dialect_id: &str, options: &DdlOptions) -> Vec<String> {
    registry().generate_statements(diagram, dialect_id, options)
}
