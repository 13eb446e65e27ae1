//! Validation of identifiers and whole diagrams
//!
//! Identifier rules are the portable subset shared by the supported engines.
//! [`diagram_issues`] reports problems without changing the diagram; the DDL
//! generator still runs on a diagram with issues.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use derive_more::Display;
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;

use crate::core::ddl::helpers::index_name;
use crate::core::dialect::{DialectConfig, MAX_IDENTIFIER_LENGTH};
use crate::core::schema::Diagram;

/// SQL reserved keywords that cannot be used as identifiers without quoting
static RESERVED_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // SQL Standard
        "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK",
        "COLUMN", "CONSTRAINT", "CREATE", "CROSS", "CURRENT_DATE", "CURRENT_TIME",
        "CURRENT_TIMESTAMP", "CURRENT_USER", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP",
        "ELSE", "END", "EXISTS", "FALSE", "FETCH", "FOR", "FOREIGN", "FROM", "FULL", "GRANT",
        "GROUP", "HAVING", "IN", "INDEX", "INNER", "INSERT", "INTO", "IS", "JOIN", "KEY",
        "LEFT", "LIKE", "NOT", "NULL", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES",
        "RIGHT", "SELECT", "SET", "TABLE", "THEN", "TO", "TRUE", "UNION", "UNIQUE", "UPDATE",
        "USING", "VALUES", "WHEN", "WHERE", "WITH",
        // MySQL
        "AUTO_INCREMENT", "CHANGE", "DATABASE", "LIMIT", "MODIFY", "RENAME", "REPLACE",
        "SCHEMA", "SHOW", "TRIGGER", "UNSIGNED", "ZEROFILL",
        // PostgreSQL
        "ANALYZE", "ARRAY", "CAST", "DO", "EXCEPT", "ILIKE", "INTERSECT", "LATERAL",
        "LOCALTIME", "LOCALTIMESTAMP", "OFFSET", "ONLY", "RETURNING", "WINDOW",
        // SQL Server
        "CLUSTERED", "IDENTITY", "NONCLUSTERED", "PROC", "TOP", "TRAN",
        // Oracle
        "ACCESS", "LEVEL", "MINUS", "NUMBER", "RAW", "ROWID", "ROWNUM", "SYSDATE", "UID",
        "VARCHAR2",
    ]
    .into_iter()
    .collect()
});

/// Validation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    Empty,

    #[error("Name is too long ({actual} chars, max {max})")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Name contains invalid characters: '{}'. Only letters, numbers, and underscores are allowed",
        .invalid.iter().collect::<String>()
    )]
    InvalidCharacters { invalid: Vec<char> },

    #[error("Name cannot start with a digit")]
    StartsWithDigit,

    #[error("Name should not start with an underscore")]
    StartsWithUnderscore,

    #[error("'{keyword}' is a reserved SQL keyword")]
    ReservedKeyword { keyword: String },

    #[error("Name must contain at least one letter")]
    NoLetters,

    #[error("Name cannot contain consecutive underscores")]
    ConsecutiveUnderscores,

    #[error("Name should not end with an underscore")]
    EndsWithUnderscore,
}

/// Validation strictness level
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ValidationLevel {
    /// Only check critical errors (empty, too long, invalid chars, starts with digit)
    Minimal,
    /// Standard validation (minimal + reserved keywords)
    #[default]
    Standard,
    /// Strict validation (standard + style warnings as errors)
    Strict,
}

/// Validation result containing errors and warnings
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Convert to Result, returning first error if any
    pub fn to_result(&self) -> Result<(), ValidationError> {
        match self.errors.first() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Validates a table or column name
pub fn validate_identifier(name: &str, level: ValidationLevel) -> ValidationResult {
    let mut result = ValidationResult::default();

    let trimmed = name.trim();
    if trimmed.is_empty() {
        result.errors.push(ValidationError::Empty);
        return result;
    }

    let length = trimmed.chars().count();
    if length > MAX_IDENTIFIER_LENGTH {
        result.errors.push(ValidationError::TooLong {
            max: MAX_IDENTIFIER_LENGTH,
            actual: length,
        });
    }

    let invalid: Vec<char> = trimmed
        .chars()
        .filter(|c| !c.is_ascii_alphanumeric() && *c != '_')
        .collect();
    if !invalid.is_empty() {
        result.errors.push(ValidationError::InvalidCharacters { invalid });
    }

    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        result.errors.push(ValidationError::StartsWithDigit);
    }

    if !trimmed.chars().any(|c| c.is_ascii_alphabetic()) {
        result.errors.push(ValidationError::NoLetters);
    }

    if level != ValidationLevel::Minimal && is_reserved_keyword(trimmed) {
        result.errors.push(ValidationError::ReservedKeyword {
            keyword: trimmed.to_string(),
        });
    }

    let style = [
        (trimmed.starts_with('_'), ValidationError::StartsWithUnderscore),
        (trimmed.ends_with('_'), ValidationError::EndsWithUnderscore),
        (trimmed.contains("__"), ValidationError::ConsecutiveUnderscores),
    ];
    for (violated, error) in style {
        if !violated {
            continue;
        }
        if level == ValidationLevel::Strict {
            result.errors.push(error);
        } else {
            result.warnings.push(error);
        }
    }

    result
}

/// Standard-level validation with the first error as a message
pub fn validate_name(name: &str) -> Result<(), String> {
    validate_identifier(name, ValidationLevel::Standard)
        .to_result()
        .map_err(|e| e.to_string())
}

/// Check if a string is a reserved keyword
pub fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(name.trim().to_uppercase().as_str())
}

/// Sanitize an identifier by removing/replacing invalid characters.
/// Returns None if the result would be empty
pub fn sanitize_identifier(name: &str) -> Option<String> {
    let mapped: String = name
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '_' => Some(c),
            ' ' | '-' | '.' => Some('_'),
            _ => None,
        })
        .collect();

    let mut result = String::with_capacity(mapped.len());
    for c in mapped.trim_start_matches(|c: char| c.is_ascii_digit()).chars() {
        if c == '_' && result.ends_with('_') {
            continue;
        }
        result.push(c);
    }

    let result = result.trim_matches('_');
    if !result.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    // ASCII only at this point, byte slicing is safe
    Some(result[..result.len().min(MAX_IDENTIFIER_LENGTH)].to_string())
}

// ============================================================================
// Diagram issues
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Severity {
    #[display("warning")]
    Warning,
    #[display("error")]
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{severity}: {message}")]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

fn name_issues(issues: &mut Vec<Issue>, subject: &str, name: &str) {
    let result = validate_identifier(name, ValidationLevel::Standard);
    for error in result.errors {
        // quoting makes keywords legal, so they only warn
        let severity = if matches!(error, ValidationError::ReservedKeyword { .. }) {
            Severity::Warning
        } else {
            Severity::Error
        };
        issues.push(Issue {
            severity,
            message: format!("{}: {}", subject, error),
        });
    }
    for warning in result.warnings {
        issues.push(Issue::warning(format!("{}: {}", subject, warning)));
    }
}

/// Everything worth telling the user about a diagram before export
pub fn diagram_issues(diagram: &Diagram, config: &DialectConfig) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut table_names = HashSet::new();
    let mut index_names = HashSet::new();

    for table in &diagram.tables {
        let subject = format!("Table '{}'", table.name);
        name_issues(&mut issues, &subject, &table.name);
        if !table_names.insert(table.name.trim().to_lowercase()) {
            issues.push(Issue::error(format!("Duplicate table name '{}'", table.name)));
        }
        if table.fields.is_empty() {
            issues.push(Issue::error(format!("{} has no fields", subject)));
        }

        let mut field_names = HashSet::new();
        for field in &table.fields {
            let field_subject = format!("Field '{}.{}'", table.name, field.name);
            name_issues(&mut issues, &field_subject, &field.name);
            if !field_names.insert(field.name.trim().to_lowercase()) {
                issues.push(Issue::error(format!(
                    "{} has a duplicate field '{}'",
                    subject, field.name
                )));
            }
            if field.data_type.trim().is_empty() {
                issues.push(Issue::error(format!("{} has no type", field_subject)));
                continue;
            }
            let info = config.type_info(&field.data_type);
            if info.is_some_and(|info| info.is_sized) && field.size == Some(0) {
                issues.push(Issue::error(format!("{} has size 0", field_subject)));
            }
            if field.increment && info.is_some_and(|info| !info.is_integer) {
                issues.push(Issue::error(format!(
                    "{} auto-increments but {} is not an integer type",
                    field_subject, field.data_type
                )));
            }
        }

        for index in &table.indexes {
            let name = index_name(table, index);
            if index.fields.is_empty() {
                issues.push(Issue::error(format!("Index '{}' has no fields", name)));
            }
            for column in &index.fields {
                if table.field_by_name(column).is_none() {
                    issues.push(Issue::error(format!(
                        "Index '{}' references unknown field '{}'",
                        name, column
                    )));
                }
            }
            if !index_names.insert(name.to_lowercase()) {
                issues.push(Issue::error(format!("Duplicate index name '{}'", name)));
            }
        }
    }

    for relationship in &diagram.relationships {
        let start = diagram.resolve(&relationship.start());
        let end = diagram.resolve(&relationship.end());
        match (start, end) {
            (Some((table, field)), Some((ref_table, ref_field))) => {
                if !field.data_type.eq_ignore_ascii_case(&ref_field.data_type) {
                    issues.push(Issue::warning(format!(
                        "Relationship {}.{} -> {}.{} joins {} to {}",
                        table.name,
                        field.name,
                        ref_table.name,
                        ref_field.name,
                        field.data_type,
                        ref_field.data_type
                    )));
                }
            }
            _ => issues.push(Issue::error(format!(
                "Relationship {} has an endpoint that no longer exists",
                relationship.id
            ))),
        }
    }

    issues.extend(foreign_key_cycles(diagram));
    issues
}

/// Chains of foreign keys that lead back to their starting table.
/// A table referencing itself is a plain hierarchy and is not reported.
fn foreign_key_cycles(diagram: &Diagram) -> Vec<Issue> {
    let mut graph = DiGraph::<&str, ()>::new();
    let nodes: HashMap<&str, _> = diagram
        .tables
        .iter()
        .map(|t| (t.id.as_str(), graph.add_node(t.name.as_str())))
        .collect();

    for relationship in &diagram.relationships {
        if relationship.start_table_id == relationship.end_table_id {
            continue;
        }
        if let (Some(&from), Some(&to)) = (
            nodes.get(relationship.start_table_id.as_str()),
            nodes.get(relationship.end_table_id.as_str()),
        ) {
            graph.add_edge(from, to, ());
        }
    }

    tarjan_scc(&graph)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            let mut names: Vec<&str> = component.iter().map(|node| graph[*node]).collect();
            names.sort_unstable();
            Issue::warning(format!(
                "Circular foreign-key chain between {}",
                names.join(", ")
            ))
        })
        .collect()
}
