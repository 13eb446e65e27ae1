//! Partial-update records for the mutation API.
//!
//! `None` leaves an attribute untouched. Attributes that are themselves
//! optional use `Option<Option<T>>`, where `Some(None)` clears the value.

use crate::core::schema::{
    Area, Cardinality, DefaultValue, Field, ForeignKeyAction, Index, Note, Relationship, Table,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablePatch {
    pub name: Option<String>,
    pub comment: Option<String>,
    pub color: Option<Option<String>>,
}

impl TablePatch {
    pub fn apply(&self, table: &mut Table) {
        if let Some(name) = &self.name {
            table.name = name.clone();
        }
        if let Some(comment) = &self.comment {
            table.comment = comment.clone();
        }
        if let Some(color) = &self.color {
            table.color = color.clone();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub data_type: Option<String>,
    pub size: Option<Option<u32>>,
    pub precision: Option<Option<u32>>,
    pub scale: Option<Option<u32>>,
    pub primary: Option<bool>,
    pub unique: Option<bool>,
    pub not_null: Option<bool>,
    pub increment: Option<bool>,
    pub unsigned: Option<bool>,
    pub is_array: Option<bool>,
    pub default: Option<Option<DefaultValue>>,
    pub check: Option<Option<String>>,
    pub comment: Option<String>,
}

impl FieldPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Apply to a field. Turning on `increment` forces NOT NULL and clears the default.
    pub fn apply(&self, field: &mut Field) {
        if let Some(name) = &self.name {
            field.name = name.clone();
        }
        if let Some(data_type) = &self.data_type {
            field.data_type = data_type.clone();
        }
        if let Some(size) = self.size {
            field.size = size;
        }
        if let Some(precision) = self.precision {
            field.precision = precision;
        }
        if let Some(scale) = self.scale {
            field.scale = scale;
        }
        if let Some(primary) = self.primary {
            field.primary = primary;
        }
        if let Some(unique) = self.unique {
            field.unique = unique;
        }
        if let Some(not_null) = self.not_null {
            field.not_null = not_null;
        }
        if let Some(unsigned) = self.unsigned {
            field.unsigned = unsigned;
        }
        if let Some(is_array) = self.is_array {
            field.is_array = is_array;
        }
        if let Some(default) = &self.default {
            field.default = default.clone();
        }
        if let Some(check) = &self.check {
            field.check = check.clone();
        }
        if let Some(comment) = &self.comment {
            field.comment = comment.clone();
        }
        if let Some(increment) = self.increment {
            field.increment = increment;
        }
        if field.increment {
            field.not_null = true;
            field.default = None;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexPatch {
    pub name: Option<Option<String>>,
    pub unique: Option<bool>,
    pub fields: Option<Vec<String>>,
    pub index_type: Option<Option<String>>,
}

impl IndexPatch {
    pub fn apply(&self, index: &mut Index) {
        if let Some(name) = &self.name {
            index.name = name.clone();
        }
        if let Some(unique) = self.unique {
            index.unique = unique;
        }
        if let Some(fields) = &self.fields {
            index.fields = fields.clone();
        }
        if let Some(index_type) = &self.index_type {
            index.index_type = index_type.clone();
        }
    }
}

/// Endpoints are not patchable; delete and recreate to re-point a relationship
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipPatch {
    pub name: Option<Option<String>>,
    pub cardinality: Option<Cardinality>,
    pub update_constraint: Option<ForeignKeyAction>,
    pub delete_constraint: Option<ForeignKeyAction>,
}

impl RelationshipPatch {
    pub fn apply(&self, relationship: &mut Relationship) {
        if let Some(name) = &self.name {
            relationship.name = name.clone();
        }
        if let Some(cardinality) = self.cardinality {
            relationship.cardinality = cardinality;
        }
        if let Some(action) = self.update_constraint {
            relationship.update_constraint = action;
        }
        if let Some(action) = self.delete_constraint {
            relationship.delete_constraint = action;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<Option<String>>,
    pub height: Option<f64>,
}

impl NotePatch {
    pub fn apply(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(color) = &self.color {
            note.color = color.clone();
        }
        if let Some(height) = self.height {
            note.height = height;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaPatch {
    pub name: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<Option<String>>,
}

impl AreaPatch {
    pub fn apply(&self, area: &mut Area) {
        if let Some(name) = &self.name {
            area.name = name.clone();
        }
        if let Some(width) = self.width {
            area.width = width;
        }
        if let Some(height) = self.height {
            area.height = height;
        }
        if let Some(color) = &self.color {
            area.color = color.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_patch_partial() {
        let mut field = Field::new("email", "VARCHAR").with_size(100).unique();
        FieldPatch {
            size: Some(Some(320)),
            not_null: Some(true),
            ..FieldPatch::default()
        }
        .apply(&mut field);

        assert_eq!(field.name, "email");
        assert_eq!(field.size, Some(320));
        assert!(field.not_null);
        assert!(field.unique);
    }

    #[test]
    fn test_field_patch_clears_optional() {
        let mut field = Field::new("status", "VARCHAR").with_default(DefaultValue::literal("new"));
        FieldPatch {
            default: Some(None),
            ..FieldPatch::default()
        }
        .apply(&mut field);
        assert_eq!(field.default, None);
    }

    #[test]
    fn test_field_patch_increment_drops_default() {
        let mut field = Field::new("id", "INT").with_default(DefaultValue::literal("1"));
        FieldPatch {
            increment: Some(true),
            ..FieldPatch::default()
        }
        .apply(&mut field);
        assert!(field.increment);
        assert!(field.not_null);
        assert_eq!(field.default, None);
    }

    #[test]
    fn test_table_patch() {
        let mut table = Table::new("users");
        TablePatch {
            name: Some("accounts".into()),
            color: Some(Some("#ff0000".into())),
            ..TablePatch::default()
        }
        .apply(&mut table);
        assert_eq!(table.name, "accounts");
        assert_eq!(table.color.as_deref(), Some("#ff0000"));
        assert_eq!(table.comment, "");
    }
}
