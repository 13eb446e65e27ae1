//! Dialect registry
//!
//! Static, data-only description of every supported SQL engine: quoting,
//! type metadata, auto-increment strategy, comment placement and the
//! referential actions it understands. Lookups are total and fall back to
//! MySQL for unknown identifiers.

mod mssql;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use crate::core::ddl::{
    DdlEmitter, MsSqlEmitter, MySqlEmitter, OracleEmitter, PostgresEmitter, SqliteEmitter,
};
use crate::core::schema::ForeignKeyAction;

pub use mssql::MSSQL;
pub use mysql::MYSQL;
pub use oracle::ORACLE;
pub use postgres::POSTGRESQL;
pub use sqlite::SQLITE;

/// Identifier length ceiling shared by every dialect in the set
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Built-in engines
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    MySql,
    PostgreSql,
    Sqlite,
    MsSql,
    Oracle,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::MySql,
        Dialect::PostgreSql,
        Dialect::Sqlite,
        Dialect::MsSql,
        Dialect::Oracle,
    ];

    /// Canonical registry identifier
    pub fn id(&self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::PostgreSql => "postgresql",
            Dialect::Sqlite => "sqlite",
            Dialect::MsSql => "mssql",
            Dialect::Oracle => "oracle",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Dialect::MySql),
            "postgresql" | "postgres" | "pg" => Some(Dialect::PostgreSql),
            "sqlite" => Some(Dialect::Sqlite),
            "mssql" | "sqlserver" | "transactsql" => Some(Dialect::MsSql),
            "oracle" | "oraclesql" => Some(Dialect::Oracle),
            _ => None,
        }
    }

    pub fn config(&self) -> &'static DialectConfig {
        registry().lookup(self.id())
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.config().name)
    }
}

/// How a dialect spells auto-increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementStrategy {
    /// Column keyword after the constraints, e.g. `AUTO_INCREMENT`
    Keyword(&'static str),
    /// Identity clause right after the type, e.g. `IDENTITY(1,1)`
    Identity(&'static str),
    /// Only valid on a single-column inline primary key, e.g. `PRIMARY KEY AUTOINCREMENT`
    InlinePrimaryKey(&'static str),
}

/// Where table and column comments go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// Part of the column/table definition
    Inline,
    /// One statement per commented object after the table body
    Statement,
}

/// Where an index access method is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTypePlacement {
    /// `(cols) USING BTREE`
    UsingSuffix,
    /// `ON t USING GIN (cols)`
    UsingBeforeColumns,
    /// `CREATE [UNIQUE] BITMAP INDEX`
    Modifier,
}

/// Where foreign keys are declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyPlacement {
    /// `ALTER TABLE ... ADD CONSTRAINT` after all tables
    AlterTable,
    /// Table constraint inside `CREATE TABLE`
    Inline,
}

/// Metadata for one logical type in one dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    /// Logical type name used by the model
    pub name: &'static str,
    /// Rendered SQL type name
    pub sql: &'static str,
    pub is_sized: bool,
    pub has_precision: bool,
    pub has_check: bool,
    pub has_quotes: bool,
    pub signed: bool,
    pub is_integer: bool,
    pub default_size: Option<u32>,
    /// Render `(p)` instead of `(p,0)`
    pub omit_zero_scale: bool,
}

/// Metadata used for types the registry does not know
pub const UNKNOWN_TYPE: TypeInfo = TypeInfo::new("", "");

impl TypeInfo {
    pub const fn new(name: &'static str, sql: &'static str) -> Self {
        Self {
            name,
            sql,
            is_sized: false,
            has_precision: false,
            has_check: true,
            has_quotes: true,
            signed: false,
            is_integer: false,
            default_size: None,
            omit_zero_scale: false,
        }
    }

    pub const fn sized(mut self, default_size: u32) -> Self {
        self.is_sized = true;
        self.default_size = Some(default_size);
        self
    }

    pub const fn with_precision(mut self) -> Self {
        self.has_precision = true;
        self
    }

    pub const fn numeric(mut self) -> Self {
        self.has_quotes = false;
        self.signed = true;
        self
    }

    pub const fn integer(mut self) -> Self {
        self.is_integer = true;
        self.numeric()
    }

    pub const fn unquoted(mut self) -> Self {
        self.has_quotes = false;
        self
    }

    pub const fn without_check(mut self) -> Self {
        self.has_check = false;
        self
    }

    pub const fn drop_zero_scale(mut self) -> Self {
        self.omit_zero_scale = true;
        self
    }
}

/// Fixed-shape description of a dialect
#[derive(Debug, Clone)]
pub struct DialectConfig {
    pub id: &'static str,
    pub name: &'static str,
    /// Opening and closing identifier quote
    pub identifier_quotes: (char, char),
    pub increment: IncrementStrategy,
    pub comment_style: CommentStyle,
    pub foreign_keys: ForeignKeyPlacement,
    /// Indexes may be declared inside `CREATE TABLE`
    pub inline_indexes: bool,
    pub index_types: &'static [&'static str],
    pub index_type_placement: IndexTypePlacement,
    pub update_actions: &'static [ForeignKeyAction],
    pub delete_actions: &'static [ForeignKeyAction],
    /// Appended on its own line after every top-level statement
    pub batch_separator: Option<&'static str>,
    pub supports_if_not_exists: bool,
    pub supports_unsigned: bool,
    pub supports_arrays: bool,
    pub true_literal: &'static str,
    pub false_literal: &'static str,
    /// Function defaults recognized when classifying raw input
    pub default_functions: &'static [&'static str],
    pub types: &'static [TypeInfo],
}

impl DialectConfig {
    /// Quote an identifier, doubling the closing quote character
    pub fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.identifier_quotes;
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(open);
        for c in name.chars() {
            if c == close {
                quoted.push(close);
            }
            quoted.push(c);
        }
        quoted.push(close);
        quoted
    }

    /// Quote a string literal, doubling embedded single quotes
    pub fn quote_string(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    pub fn type_info(&self, name: &str) -> Option<&'static TypeInfo> {
        let name = name.trim();
        self.types.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    fn meta(&self, name: &str) -> &TypeInfo {
        self.type_info(name).unwrap_or(&UNKNOWN_TYPE)
    }

    pub fn is_sized(&self, name: &str) -> bool {
        self.meta(name).is_sized
    }

    pub fn has_precision(&self, name: &str) -> bool {
        self.meta(name).has_precision
    }

    pub fn has_check(&self, name: &str) -> bool {
        self.meta(name).has_check
    }

    pub fn has_quotes(&self, name: &str) -> bool {
        self.meta(name).has_quotes
    }

    pub fn signed(&self, name: &str) -> bool {
        self.meta(name).signed
    }

    /// SQL type name for a logical type; unknown names pass through upper-cased
    pub fn sql_type_name(&self, name: &str) -> String {
        match self.type_info(name) {
            Some(info) => info.sql.to_string(),
            None => name.trim().to_uppercase(),
        }
    }

    pub fn supports_index_type(&self, index_type: &str) -> bool {
        self.index_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(index_type.trim()))
    }

    pub fn supports_update_action(&self, action: ForeignKeyAction) -> bool {
        self.update_actions.contains(&action)
    }

    pub fn supports_delete_action(&self, action: ForeignKeyAction) -> bool {
        self.delete_actions.contains(&action)
    }
}

/// A registered dialect: its syntax record and the emitter that renders it
#[derive(Clone)]
pub struct DialectEntry {
    pub config: DialectConfig,
    pub emitter: Arc<dyn DdlEmitter>,
}

impl std::fmt::Debug for DialectEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectEntry")
            .field("id", &self.config.id)
            .finish_non_exhaustive()
    }
}

/// Map from dialect identifier to config and emitter
#[derive(Debug, Clone)]
pub struct DialectRegistry {
    entries: Vec<DialectEntry>,
    aliases: HashMap<String, usize>,
    fallback: usize,
}

static BUILTIN: LazyLock<DialectRegistry> = LazyLock::new(DialectRegistry::with_builtins);

/// Registry holding the five built-in dialects
pub fn registry() -> &'static DialectRegistry {
    &BUILTIN
}

impl DialectRegistry {
    /// Empty registry; the first registered dialect becomes the fallback
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            aliases: HashMap::new(),
            fallback: 0,
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(MYSQL, Arc::new(MySqlEmitter), &["mariadb"]);
        registry.register(POSTGRESQL, Arc::new(PostgresEmitter), &["postgres", "pg"]);
        registry.register(SQLITE, Arc::new(SqliteEmitter), &[]);
        registry.register(MSSQL, Arc::new(MsSqlEmitter), &["sqlserver", "transactsql"]);
        registry.register(ORACLE, Arc::new(OracleEmitter), &["oraclesql"]);
        registry
    }

    /// Register (or replace) a dialect under its id and any aliases
    pub fn register(
        &mut self,
        config: DialectConfig,
        emitter: Arc<dyn DdlEmitter>,
        aliases: &[&str],
    ) {
        let id = config.id.to_lowercase();
        let slot = match self.aliases.get(&id) {
            Some(&existing) => {
                self.entries[existing] = DialectEntry { config, emitter };
                existing
            }
            None => {
                self.entries.push(DialectEntry { config, emitter });
                self.entries.len() - 1
            }
        };
        self.aliases.insert(id, slot);
        for alias in aliases {
            self.aliases.insert(alias.to_lowercase(), slot);
        }
    }

    /// Make a registered id the fallback for unknown lookups
    pub fn set_fallback(&mut self, id: &str) -> bool {
        match self.aliases.get(&id.trim().to_lowercase()) {
            Some(&slot) => {
                self.fallback = slot;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.aliases.contains_key(&id.trim().to_lowercase())
    }

    /// Resolve an id; unknown ids resolve to the fallback dialect.
    ///
    /// # Panics
    ///
    /// Panics if the registry is empty.
    pub fn entry(&self, id: &str) -> &DialectEntry {
        let slot = match self.aliases.get(&id.trim().to_lowercase()) {
            Some(&slot) => slot,
            None => {
                tracing::debug!("Unknown dialect '{}', falling back to {}", id, self.entries[self.fallback].config.id);
                self.fallback
            }
        };
        &self.entries[slot]
    }

    pub fn lookup(&self, id: &str) -> &DialectConfig {
        &self.entry(id).config
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.config.id)
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_aliases() {
        assert_eq!(Dialect::from_id("Postgres"), Some(Dialect::PostgreSql));
        assert_eq!(Dialect::from_id("mariadb"), Some(Dialect::MySql));
        assert_eq!(Dialect::from_id("transactsql"), Some(Dialect::MsSql));
        assert_eq!(Dialect::from_id("oraclesql"), Some(Dialect::Oracle));
        assert_eq!(Dialect::from_id("db2"), None);
    }

    #[test]
    fn test_lookup_falls_back_to_mysql() {
        let config = registry().lookup("no-such-engine");
        assert_eq!(config.id, "mysql");
        assert_eq!(registry().lookup("").id, "mysql");
    }

    #[test]
    fn test_every_builtin_is_registered() {
        for dialect in Dialect::ALL {
            assert_eq!(registry().lookup(dialect.id()).id, dialect.id());
        }
        assert_eq!(registry().ids().count(), 5);
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(MYSQL.quote_identifier("users"), "`users`");
        assert_eq!(POSTGRESQL.quote_identifier("a\"b"), "\"a\"\"b\"");
        assert_eq!(MSSQL.quote_identifier("order]s"), "[order]]s]");
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(ORACLE.quote_string("it's"), "'it''s'");
    }

    #[test]
    fn test_type_metadata() {
        assert!(MYSQL.is_sized("varchar"));
        assert!(MYSQL.has_precision("DECIMAL"));
        assert!(!MYSQL.has_quotes("INT"));
        assert!(MYSQL.signed("BIGINT"));
        assert!(MYSQL.has_quotes("VARCHAR"));
        assert_eq!(POSTGRESQL.sql_type_name("DOUBLE"), "DOUBLE PRECISION");
        assert_eq!(MSSQL.sql_type_name("uuid"), "UNIQUEIDENTIFIER");
        assert_eq!(ORACLE.sql_type_name("varchar"), "VARCHAR2");
    }

    #[test]
    fn test_unknown_type_metadata() {
        assert_eq!(SQLITE.sql_type_name("geometry"), "GEOMETRY");
        assert!(!SQLITE.is_sized("geometry"));
        assert!(SQLITE.has_quotes("geometry"));
        assert!(SQLITE.has_check("geometry"));
    }

    #[test]
    fn test_register_custom_dialect() {
        let mut custom = DialectRegistry::with_builtins();
        let mut config = POSTGRESQL.clone();
        config.id = "cockroach";
        config.name = "CockroachDB";
        custom.register(config, Arc::new(PostgresEmitter), &["crdb"]);

        assert!(custom.contains("crdb"));
        assert_eq!(custom.lookup("CRDB").name, "CockroachDB");
        assert_eq!(custom.lookup("unknown").id, "mysql");

        assert!(custom.set_fallback("cockroach"));
        assert_eq!(custom.lookup("unknown").id, "cockroach");
        assert!(!custom.set_fallback("nothing"));
    }

    #[test]
    fn test_action_support() {
        assert!(!ORACLE.supports_update_action(ForeignKeyAction::Cascade));
        assert!(ORACLE.supports_delete_action(ForeignKeyAction::Cascade));
        assert!(!MSSQL.supports_delete_action(ForeignKeyAction::Restrict));
        assert!(!MYSQL.supports_delete_action(ForeignKeyAction::SetDefault));
        assert!(POSTGRESQL.supports_update_action(ForeignKeyAction::SetDefault));
    }
}
