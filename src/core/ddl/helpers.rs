//! Shared rendering helpers used by every emitter

use crate::core::dialect::{DialectConfig, IncrementStrategy, MAX_IDENTIFIER_LENGTH, UNKNOWN_TYPE};
use crate::core::schema::{DefaultValue, Diagram, Field, ForeignKeyAction, Index, Relationship, Table};

/// Cut an identifier to the shared length ceiling on a char boundary
pub fn truncate_identifier(name: &str) -> String {
    name.chars().take(MAX_IDENTIFIER_LENGTH).collect()
}

/// Constraint name for a relationship: explicit name, or
/// `fk_<startTable>_<startField>_<endTable>`
pub fn foreign_key_name(
    relationship: &Relationship,
    table: &Table,
    field: &Field,
    ref_table: &Table,
) -> String {
    match relationship.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => truncate_identifier(name),
        _ => truncate_identifier(&format!(
            "fk_{}_{}_{}",
            table.name, field.name, ref_table.name
        )),
    }
}

/// Index name: explicit name, or `<table>_<fields>_index`
pub fn index_name(table: &Table, index: &Index) -> String {
    match index.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => truncate_identifier(name),
        _ => truncate_identifier(&format!(
            "{}_{}_index",
            table.name,
            index.fields.join("_")
        )),
    }
}

/// Index columns that still exist in the table, in declared order
pub fn index_columns<'a>(table: &'a Table, index: &'a Index) -> Vec<&'a str> {
    index
        .fields
        .iter()
        .filter(|name| table.field_by_name(name).is_some())
        .map(String::as_str)
        .collect()
}

/// Render the SQL type of a field: name, size or precision, array marker
pub fn render_type(config: &DialectConfig, field: &Field) -> String {
    let info = config.type_info(&field.data_type).unwrap_or(&UNKNOWN_TYPE);
    let mut sql = config.sql_type_name(&field.data_type);

    if info.is_sized {
        if let Some(size) = field.size.or(info.default_size) {
            sql.push_str(&format!("({})", size));
        }
    } else if info.has_precision
        && let Some(precision) = field.precision
    {
        match field.scale {
            Some(0) if info.omit_zero_scale => sql.push_str(&format!("({})", precision)),
            Some(scale) => sql.push_str(&format!("({},{})", precision, scale)),
            None => sql.push_str(&format!("({})", precision)),
        }
    }

    if field.is_array && config.supports_arrays {
        sql.push_str("[]");
    }
    sql
}

fn is_numeric_literal(text: &str) -> bool {
    let text = text.trim();
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty()
        && digits.chars().filter(|c| *c == '.').count() <= 1
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().any(|c| c.is_ascii_digit())
}

/// Render the DEFAULT operand of a field, if it has one.
///
/// Auto-increment fields never carry a default.
pub fn render_default(config: &DialectConfig, field: &Field) -> Option<String> {
    if field.increment {
        return None;
    }
    let rendered = match field.default.as_ref()? {
        DefaultValue::Keyword(keyword) => match keyword.to_uppercase().as_str() {
            "TRUE" => config.true_literal.to_string(),
            "FALSE" => config.false_literal.to_string(),
            other => other.to_string(),
        },
        DefaultValue::Expression(expression) => expression.trim().to_string(),
        DefaultValue::Literal(value) => {
            if !config.has_quotes(&field.data_type) && is_numeric_literal(value) {
                value.trim().to_string()
            } else {
                config.quote_string(value)
            }
        }
    };
    Some(rendered)
}

/// The field that takes an inline `PRIMARY KEY AUTOINCREMENT`, when the
/// dialect needs one and the table qualifies (exactly one primary key, auto-incremented)
pub fn inline_primary_key<'a>(config: &DialectConfig, table: &'a Table) -> Option<&'a Field> {
    if !matches!(config.increment, IncrementStrategy::InlinePrimaryKey(_)) {
        return None;
    }
    let mut primary = table.primary_fields();
    match (primary.next(), primary.next()) {
        (Some(field), None) if field.increment => Some(field),
        _ => None,
    }
}

/// Comma-separated list of quoted identifiers
pub fn quoted_list<'a, I>(config: &DialectConfig, names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(|name| config.quote_identifier(name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prefix every line of `text` with `-- `
pub fn line_comment(text: &str) -> String {
    text.lines()
        .map(|line| format!("-- {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A relationship with both endpoints resolved against the current model
#[derive(Debug, Clone)]
pub struct ResolvedForeignKey<'a> {
    pub name: String,
    pub table: &'a Table,
    pub field: &'a Field,
    pub ref_table: &'a Table,
    pub ref_field: &'a Field,
    pub on_update: ForeignKeyAction,
    pub on_delete: ForeignKeyAction,
}

/// Resolve a relationship, or `None` when an endpoint no longer exists
pub fn resolve_foreign_key<'a>(
    diagram: &'a Diagram,
    relationship: &Relationship,
) -> Option<ResolvedForeignKey<'a>> {
    let (table, field) = diagram.resolve(&relationship.start())?;
    let (ref_table, ref_field) = diagram.resolve(&relationship.end())?;
    Some(ResolvedForeignKey {
        name: foreign_key_name(relationship, table, field, ref_table),
        table,
        field,
        ref_table,
        ref_field,
        on_update: relationship.update_constraint,
        on_delete: relationship.delete_constraint,
    })
}
