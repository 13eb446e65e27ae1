use std::sync::Arc;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::dialect::{Dialect, DialectConfig};

/// Generate a fresh opaque entity id
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Aggregate root of an editing session.
///
/// Tables are held behind `Arc` so history snapshots share every table that
/// a mutation did not touch; writers go through `Arc::make_mut`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub dialect: Dialect,
    #[serde(default)]
    pub tables: Vec<Arc<Table>>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub areas: Vec<Area>,
}

impl Diagram {
    pub fn new(title: impl Into<String>, dialect: Dialect) -> Self {
        Self {
            title: title.into(),
            dialect,
            ..Self::default()
        }
    }

    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id).map(Arc::as_ref)
    }

    pub fn table_position(&self, id: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.id == id)
    }

    /// Resolve an endpoint to its table and field
    pub fn resolve(&self, endpoint: &Endpoint) -> Option<(&Table, &Field)> {
        let table = self.table(&endpoint.table_id)?;
        let field = table.field(&endpoint.field_id)?;
        Some((table, field))
    }

    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    /// Relationships that touch the given table on either side
    pub fn relationships_of<'a>(
        &'a self,
        table_id: &'a str,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships
            .iter()
            .filter(move |r| r.references_table(table_id))
    }

    /// Find a relationship joining two endpoints, in either direction
    pub fn relationship_between(&self, a: &Endpoint, b: &Endpoint) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.connects(a, b))
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn area(&self, id: &str) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    pub fn dialect_config(&self) -> &DialectConfig {
        crate::core::dialect::registry().lookup(self.dialect.id())
    }
}

/// Database table
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub name: String,
    /// Canvas position (x, y)
    #[serde(default)]
    pub position: (f64, f64),
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub indexes: Vec<Index>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            position: (0.0, 0.0),
            comment: String::new(),
            color: None,
            fields: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = (x, y);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn add_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn add_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn field_position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn index(&self, id: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.id == id)
    }

    pub fn primary_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.primary)
    }
}

/// Table column
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub name: String,
    /// Dialect-neutral logical type name
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub scale: Option<u32>,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub increment: bool,
    #[serde(default)]
    pub unsigned: bool,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub default: Option<DefaultValue>,
    #[serde(default)]
    pub check: Option<String>,
    #[serde(default)]
    pub comment: String,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            data_type: data_type.into(),
            size: None,
            precision: None,
            scale: None,
            primary: false,
            unique: false,
            not_null: false,
            increment: false,
            unsigned: false,
            is_array: false,
            default: None,
            check: None,
            comment: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary = true;
        self.not_null = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Auto-increment; implies NOT NULL and drops any default
    pub fn increment(mut self) -> Self {
        self.increment = true;
        self.not_null = true;
        self.default = None;
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_precision(mut self, precision: u32, scale: Option<u32>) -> Self {
        self.precision = Some(precision);
        self.scale = scale;
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_check(mut self, expression: impl Into<String>) -> Self {
        self.check = Some(expression.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Effective NOT NULL flag: primary keys and auto-increment columns never accept NULL
    pub fn is_required(&self) -> bool {
        self.not_null || self.primary || self.increment
    }
}

/// Default value of a column, classified when it is set
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum DefaultValue {
    /// Plain value, quoted as a string literal unless the column type is numeric
    Literal(String),
    /// Function call such as `NOW()` or `gen_random_uuid()`, emitted verbatim
    Expression(String),
    /// Reserved token such as `NULL`, `TRUE` or `CURRENT_TIMESTAMP`
    Keyword(String),
}

/// Tokens emitted unquoted in every dialect
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "NULL",
    "TRUE",
    "FALSE",
    "CURRENT_TIMESTAMP",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_USER",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "SYSDATE",
    "SYSTIMESTAMP",
];

impl DefaultValue {
    pub fn literal(value: impl Into<String>) -> Self {
        DefaultValue::Literal(value.into())
    }

    pub fn expression(value: impl Into<String>) -> Self {
        DefaultValue::Expression(value.into())
    }

    pub fn keyword(value: impl Into<String>) -> Self {
        DefaultValue::Keyword(value.into().to_uppercase())
    }

    /// Classify raw user input against a dialect's known tokens.
    ///
    /// Keywords are matched case-insensitively, functions either by the
    /// dialect's list or by a `name(...)` call shape. Everything else is a literal.
    pub fn infer(raw: &str, config: &DialectConfig) -> Self {
        let trimmed = raw.trim();
        let upper = trimmed.to_uppercase();

        if DEFAULT_KEYWORDS.contains(&upper.as_str()) {
            return DefaultValue::Keyword(upper);
        }

        let is_known_function = config
            .default_functions
            .iter()
            .any(|f| f.eq_ignore_ascii_case(trimmed));
        if is_known_function || looks_like_call(trimmed) {
            return DefaultValue::Expression(trimmed.to_string());
        }

        DefaultValue::Literal(raw.to_string())
    }

    pub fn value(&self) -> &str {
        match self {
            DefaultValue::Literal(v) | DefaultValue::Expression(v) | DefaultValue::Keyword(v) => v,
        }
    }
}

fn looks_like_call(text: &str) -> bool {
    let Some(open) = text.find('(') else {
        return false;
    };
    let name = &text[..open];
    text.ends_with(')')
        && name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Table index; fields are referenced by name and resolved at generation time
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub fields: Vec<String>,
    /// Access method such as BTREE, HASH or GIN
    #[serde(default)]
    pub index_type: Option<String>,
}

impl Index {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: new_id(),
            name: None,
            unique: false,
            fields: fields.into_iter().map(Into::into).collect(),
            index_type: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_type(mut self, index_type: impl Into<String>) -> Self {
        self.index_type = Some(index_type.into());
        self
    }
}

/// One side of a relationship
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub table_id: String,
    pub field_id: String,
}

impl Endpoint {
    pub fn new(table_id: impl Into<String>, field_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            field_id: field_id.into(),
        }
    }
}

/// Foreign-key edge. The start side holds the referencing column,
/// the end side the referenced one.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub start_table_id: String,
    pub start_field_id: String,
    pub end_table_id: String,
    pub end_field_id: String,
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default)]
    pub update_constraint: ForeignKeyAction,
    #[serde(default)]
    pub delete_constraint: ForeignKeyAction,
}

impl Relationship {
    pub fn new(start: Endpoint, end: Endpoint) -> Self {
        Self {
            id: new_id(),
            name: None,
            start_table_id: start.table_id,
            start_field_id: start.field_id,
            end_table_id: end.table_id,
            end_field_id: end.field_id,
            cardinality: Cardinality::default(),
            update_constraint: ForeignKeyAction::default(),
            delete_constraint: ForeignKeyAction::default(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.update_constraint = action;
        self
    }

    pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.delete_constraint = action;
        self
    }

    pub fn start(&self) -> Endpoint {
        Endpoint::new(&self.start_table_id, &self.start_field_id)
    }

    pub fn end(&self) -> Endpoint {
        Endpoint::new(&self.end_table_id, &self.end_field_id)
    }

    pub fn references_table(&self, table_id: &str) -> bool {
        self.start_table_id == table_id || self.end_table_id == table_id
    }

    pub fn references_field(&self, table_id: &str, field_id: &str) -> bool {
        (self.start_table_id == table_id && self.start_field_id == field_id)
            || (self.end_table_id == table_id && self.end_field_id == field_id)
    }

    /// Direction-insensitive endpoint comparison
    pub fn connects(&self, a: &Endpoint, b: &Endpoint) -> bool {
        let (start, end) = (self.start(), self.end());
        (start == *a && end == *b) || (start == *b && end == *a)
    }
}

/// Multiplicity of a relationship
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default, Display)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    #[display("1:1")]
    OneToOne,
    #[default]
    #[display("1:N")]
    OneToMany,
    #[display("N:1")]
    ManyToOne,
}

/// Referential action vocabulary for ON UPDATE / ON DELETE
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default, Display)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyAction {
    #[default]
    #[display("NO ACTION")]
    NoAction,
    #[display("RESTRICT")]
    Restrict,
    #[display("CASCADE")]
    Cascade,
    #[display("SET NULL")]
    SetNull,
    #[display("SET DEFAULT")]
    SetDefault,
}

/// Free-standing sticky note on the canvas
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub position: (f64, f64),
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub height: f64,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            content: content.into(),
            position: (0.0, 0.0),
            color: None,
            height: 0.0,
        }
    }
}

/// Labelled rectangle grouping tables visually
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: (f64, f64),
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub color: Option<String>,
}

impl Area {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            position: (0.0, 0.0),
            width,
            height,
            color: None,
        }
    }
}

/// Two-table demo diagram: `orders.user_id` references `users.id`
pub fn create_demo_diagram(dialect: Dialect) -> Diagram {
    let users = Table::new("users")
        .with_position(100.0, 100.0)
        .add_field(Field::new("id", "INT").primary_key().increment())
        .add_field(Field::new("name", "VARCHAR").with_size(255).not_null());
    let orders = Table::new("orders")
        .with_position(400.0, 100.0)
        .add_field(Field::new("id", "INT").primary_key().increment())
        .add_field(Field::new("user_id", "INT").not_null());

    let relationship = Relationship::new(
        Endpoint::new(&orders.id, &orders.fields[1].id),
        Endpoint::new(&users.id, &users.fields[0].id),
    );

    let mut diagram = Diagram::new("Demo", dialect);
    diagram.tables.push(Arc::new(users));
    diagram.tables.push(Arc::new(orders));
    diagram.relationships.push(relationship);
    diagram
}
