//! Editing session
//!
//! [`Session`] owns one [`Diagram`] and its [`History`]. Every structural
//! mutation goes through here: the target is looked up first, the
//! pre-mutation diagram is recorded, then the change is applied. A lookup
//! failure returns an error before anything is recorded, so a failed call
//! leaves both the model and the history untouched.
//!
//! Cosmetic operations (`move_*`) change positions only and are not recorded.

use std::sync::Arc;

use crate::core::config::Config;
use crate::core::ddl::{self, DdlOptions};
use crate::core::dialect::Dialect;
use crate::core::error::{SchemaError, SchemaResult};
use crate::core::history::History;
use crate::core::patch::{AreaPatch, FieldPatch, IndexPatch, NotePatch, RelationshipPatch, TablePatch};
use crate::core::schema::{
    Area, DefaultValue, Diagram, Endpoint, Field, Index, Note, Relationship, Table,
};

/// Move the element at `from` to `to`, clamping `to` into range
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    diagram: Diagram,
    history: History,
}

impl Session {
    pub fn new(diagram: Diagram) -> Self {
        Self {
            diagram,
            history: History::default(),
        }
    }

    pub fn with_history_limit(diagram: Diagram, limit: usize) -> Self {
        Self {
            diagram,
            history: History::new(limit),
        }
    }

    /// Empty diagram in the configured dialect, with the configured undo depth
    pub fn from_config(config: &Config) -> Self {
        Self::with_history_limit(
            Diagram::new("Untitled", config.default_dialect),
            config.history_limit,
        )
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    fn checkpoint(&mut self) {
        self.history.record(self.diagram.clone());
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    fn table_pos(&self, table_id: &str) -> SchemaResult<usize> {
        self.diagram
            .table_position(table_id)
            .ok_or_else(|| SchemaError::TableNotFound(table_id.to_string()))
    }

    fn field_pos(&self, table_id: &str, field_id: &str) -> SchemaResult<(usize, usize)> {
        let table_pos = self.table_pos(table_id)?;
        let field_pos = self.diagram.tables[table_pos]
            .field_position(field_id)
            .ok_or_else(|| SchemaError::FieldNotFound {
                table_id: table_id.to_string(),
                field_id: field_id.to_string(),
            })?;
        Ok((table_pos, field_pos))
    }

    fn index_pos(&self, table_id: &str, index_id: &str) -> SchemaResult<(usize, usize)> {
        let table_pos = self.table_pos(table_id)?;
        let index_pos = self.diagram.tables[table_pos]
            .indexes
            .iter()
            .position(|i| i.id == index_id)
            .ok_or_else(|| SchemaError::IndexNotFound {
                table_id: table_id.to_string(),
                index_id: index_id.to_string(),
            })?;
        Ok((table_pos, index_pos))
    }

    fn relationship_pos(&self, id: &str) -> SchemaResult<usize> {
        self.diagram
            .relationships
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| SchemaError::RelationshipNotFound(id.to_string()))
    }

    fn note_pos(&self, id: &str) -> SchemaResult<usize> {
        self.diagram
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| SchemaError::NoteNotFound(id.to_string()))
    }

    fn area_pos(&self, id: &str) -> SchemaResult<usize> {
        self.diagram
            .areas
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| SchemaError::AreaNotFound(id.to_string()))
    }

    /// Detach a table from the snapshots that share it
    fn table_mut(&mut self, pos: usize) -> &mut Table {
        Arc::make_mut(&mut self.diagram.tables[pos])
    }

    fn require_endpoint(&self, endpoint: &Endpoint) -> SchemaResult<()> {
        match self.diagram.resolve(endpoint) {
            Some(_) => Ok(()),
            None => Err(SchemaError::UnresolvedEndpoint {
                table_id: endpoint.table_id.clone(),
                field_id: endpoint.field_id.clone(),
            }),
        }
    }

    // ========================================================================
    // Diagram
    // ========================================================================

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.checkpoint();
        self.diagram.title = title.into();
    }

    pub fn set_dialect(&mut self, dialect: Dialect) {
        self.checkpoint();
        self.diagram.dialect = dialect;
        tracing::debug!("Dialect set to {}", dialect.id());
    }

    /// Replace the diagram; the previous history no longer applies
    pub fn load_snapshot(&mut self, diagram: Diagram) {
        tracing::debug!(
            "Loaded '{}' with {} tables, {} relationships",
            diagram.title,
            diagram.tables.len(),
            diagram.relationships.len()
        );
        self.diagram = diagram;
        self.history.clear();
    }

    pub fn save_snapshot(&self) -> Diagram {
        self.diagram.clone()
    }

    /// DDL for the diagram in its own dialect
    pub fn export_ddl(&self, options: &DdlOptions) -> String {
        ddl::generate(&self.diagram, self.diagram.dialect.id(), options)
    }

    // ========================================================================
    // History
    // ========================================================================

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.diagram)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.diagram)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ========================================================================
    // Tables
    // ========================================================================

    pub fn add_table(&mut self, table: Table) -> SchemaResult<&Table> {
        if self.diagram.table(&table.id).is_some() {
            return Err(SchemaError::DuplicateId(table.id));
        }
        self.checkpoint();
        tracing::debug!("Adding table '{}' ({})", table.name, table.id);
        self.diagram.tables.push(Arc::new(table));
        Ok(self.diagram.tables[self.diagram.tables.len() - 1].as_ref())
    }

    pub fn update_table(&mut self, table_id: &str, patch: &TablePatch) -> SchemaResult<&Table> {
        let pos = self.table_pos(table_id)?;
        self.checkpoint();
        patch.apply(self.table_mut(pos));
        Ok(self.diagram.tables[pos].as_ref())
    }

    /// Remove a table and every relationship touching it
    pub fn delete_table(&mut self, table_id: &str) -> SchemaResult<Table> {
        let pos = self.table_pos(table_id)?;
        self.checkpoint();
        let removed = self.diagram.tables.remove(pos);
        let dropped = self.diagram.relationships_of(table_id).count();
        self.diagram
            .relationships
            .retain(|r| !r.references_table(table_id));
        tracing::debug!(
            "Deleted table '{}', dropped {} relationships",
            removed.name,
            dropped
        );
        Ok(Arc::unwrap_or_clone(removed))
    }

    pub fn move_table(&mut self, table_id: &str, x: f64, y: f64) -> SchemaResult<()> {
        let pos = self.table_pos(table_id)?;
        self.table_mut(pos).position = (x, y);
        Ok(())
    }

    pub fn reorder_table(&mut self, table_id: &str, to: usize) -> SchemaResult<()> {
        let from = self.table_pos(table_id)?;
        self.checkpoint();
        move_item(&mut self.diagram.tables, from, to);
        Ok(())
    }

    // ========================================================================
    // Fields
    // ========================================================================

    pub fn add_field(&mut self, table_id: &str, field: Field) -> SchemaResult<&Field> {
        let pos = self.table_pos(table_id)?;
        if self.diagram.tables[pos].field(&field.id).is_some() {
            return Err(SchemaError::DuplicateId(field.id));
        }
        self.checkpoint();
        let table = self.table_mut(pos);
        table.fields.push(field);
        let field_pos = table.fields.len() - 1;
        Ok(&self.diagram.tables[pos].fields[field_pos])
    }

    /// Patch a field. A rename is carried into the indexes naming the field,
    /// unless another field of the table still answers to the old name.
    pub fn update_field(
        &mut self,
        table_id: &str,
        field_id: &str,
        patch: &FieldPatch,
    ) -> SchemaResult<&Field> {
        let (table_pos, field_pos) = self.field_pos(table_id, field_id)?;
        self.checkpoint();
        let table = self.table_mut(table_pos);
        let old_name = table.fields[field_pos].name.clone();
        patch.apply(&mut table.fields[field_pos]);
        let new_name = table.fields[field_pos].name.clone();

        if new_name != old_name && table.field_by_name(&old_name).is_none() {
            for index in &mut table.indexes {
                for name in index.fields.iter_mut().filter(|n| **n == old_name) {
                    *name = new_name.clone();
                }
            }
        }
        if new_name != old_name {
            tracing::debug!("Renamed field '{}' to '{}'", old_name, new_name);
        }
        Ok(&self.diagram.tables[table_pos].fields[field_pos])
    }

    /// Classify raw default text against the diagram's dialect and store it
    pub fn set_field_default(
        &mut self,
        table_id: &str,
        field_id: &str,
        raw: Option<&str>,
    ) -> SchemaResult<&Field> {
        let default = raw
            .filter(|text| !text.trim().is_empty())
            .map(|text| DefaultValue::infer(text, self.diagram.dialect_config()));
        let patch = FieldPatch {
            default: Some(default),
            ..FieldPatch::default()
        };
        self.update_field(table_id, field_id, &patch)
    }

    /// Remove a field and the relationships attached to it. Index entries go
    /// too once no remaining field carries the name; indexes left without
    /// columns are dropped.
    pub fn delete_field(&mut self, table_id: &str, field_id: &str) -> SchemaResult<Field> {
        let (table_pos, field_pos) = self.field_pos(table_id, field_id)?;
        self.checkpoint();
        let table = self.table_mut(table_pos);
        let removed = table.fields.remove(field_pos);
        if table.field_by_name(&removed.name).is_none() {
            for index in &mut table.indexes {
                index.fields.retain(|name| *name != removed.name);
            }
            table.indexes.retain(|index| !index.fields.is_empty());
        }

        self.diagram
            .relationships
            .retain(|r| !r.references_field(table_id, field_id));
        tracing::debug!("Deleted field '{}' from {}", removed.name, table_id);
        Ok(removed)
    }

    pub fn reorder_field(&mut self, table_id: &str, field_id: &str, to: usize) -> SchemaResult<()> {
        let (table_pos, from) = self.field_pos(table_id, field_id)?;
        self.checkpoint();
        move_item(&mut self.table_mut(table_pos).fields, from, to);
        Ok(())
    }

    // ========================================================================
    // Indexes
    // ========================================================================

    pub fn add_index(&mut self, table_id: &str, index: Index) -> SchemaResult<&Index> {
        let pos = self.table_pos(table_id)?;
        if self.diagram.tables[pos].index(&index.id).is_some() {
            return Err(SchemaError::DuplicateId(index.id));
        }
        self.checkpoint();
        let table = self.table_mut(pos);
        table.indexes.push(index);
        let index_pos = table.indexes.len() - 1;
        Ok(&self.diagram.tables[pos].indexes[index_pos])
    }

    pub fn update_index(
        &mut self,
        table_id: &str,
        index_id: &str,
        patch: &IndexPatch,
    ) -> SchemaResult<&Index> {
        let (table_pos, index_pos) = self.index_pos(table_id, index_id)?;
        self.checkpoint();
        patch.apply(&mut self.table_mut(table_pos).indexes[index_pos]);
        Ok(&self.diagram.tables[table_pos].indexes[index_pos])
    }

    pub fn delete_index(&mut self, table_id: &str, index_id: &str) -> SchemaResult<Index> {
        let (table_pos, index_pos) = self.index_pos(table_id, index_id)?;
        self.checkpoint();
        Ok(self.table_mut(table_pos).indexes.remove(index_pos))
    }

    pub fn reorder_index(&mut self, table_id: &str, index_id: &str, to: usize) -> SchemaResult<()> {
        let (table_pos, from) = self.index_pos(table_id, index_id)?;
        self.checkpoint();
        move_item(&mut self.table_mut(table_pos).indexes, from, to);
        Ok(())
    }

    // ========================================================================
    // Relationships
    // ========================================================================

    /// Add a relationship; both endpoints must resolve
    pub fn add_relationship(&mut self, relationship: Relationship) -> SchemaResult<&Relationship> {
        if self.diagram.relationship(&relationship.id).is_some() {
            return Err(SchemaError::DuplicateId(relationship.id));
        }
        self.require_endpoint(&relationship.start())?;
        self.require_endpoint(&relationship.end())?;
        self.checkpoint();
        tracing::debug!(
            "Adding relationship {}.{} -> {}.{}",
            relationship.start_table_id,
            relationship.start_field_id,
            relationship.end_table_id,
            relationship.end_field_id
        );
        self.diagram.relationships.push(relationship);
        Ok(&self.diagram.relationships[self.diagram.relationships.len() - 1])
    }

    pub fn update_relationship(
        &mut self,
        id: &str,
        patch: &RelationshipPatch,
    ) -> SchemaResult<&Relationship> {
        let pos = self.relationship_pos(id)?;
        self.checkpoint();
        patch.apply(&mut self.diagram.relationships[pos]);
        Ok(&self.diagram.relationships[pos])
    }

    pub fn delete_relationship(&mut self, id: &str) -> SchemaResult<Relationship> {
        let pos = self.relationship_pos(id)?;
        self.checkpoint();
        Ok(self.diagram.relationships.remove(pos))
    }

    pub fn reorder_relationship(&mut self, id: &str, to: usize) -> SchemaResult<()> {
        let from = self.relationship_pos(id)?;
        self.checkpoint();
        move_item(&mut self.diagram.relationships, from, to);
        Ok(())
    }

    // ========================================================================
    // Notes
    // ========================================================================

    pub fn add_note(&mut self, note: Note) -> SchemaResult<&Note> {
        if self.diagram.note(&note.id).is_some() {
            return Err(SchemaError::DuplicateId(note.id));
        }
        self.checkpoint();
        self.diagram.notes.push(note);
        Ok(&self.diagram.notes[self.diagram.notes.len() - 1])
    }

    pub fn update_note(&mut self, id: &str, patch: &NotePatch) -> SchemaResult<&Note> {
        let pos = self.note_pos(id)?;
        self.checkpoint();
        patch.apply(&mut self.diagram.notes[pos]);
        Ok(&self.diagram.notes[pos])
    }

    pub fn delete_note(&mut self, id: &str) -> SchemaResult<Note> {
        let pos = self.note_pos(id)?;
        self.checkpoint();
        Ok(self.diagram.notes.remove(pos))
    }

    pub fn move_note(&mut self, id: &str, x: f64, y: f64) -> SchemaResult<()> {
        let pos = self.note_pos(id)?;
        self.diagram.notes[pos].position = (x, y);
        Ok(())
    }

    pub fn reorder_note(&mut self, id: &str, to: usize) -> SchemaResult<()> {
        let from = self.note_pos(id)?;
        self.checkpoint();
        move_item(&mut self.diagram.notes, from, to);
        Ok(())
    }

    // ========================================================================
    // Areas
    // ========================================================================

    pub fn add_area(&mut self, area: Area) -> SchemaResult<&Area> {
        if self.diagram.area(&area.id).is_some() {
            return Err(SchemaError::DuplicateId(area.id));
        }
        self.checkpoint();
        self.diagram.areas.push(area);
        Ok(&self.diagram.areas[self.diagram.areas.len() - 1])
    }

    pub fn update_area(&mut self, id: &str, patch: &AreaPatch) -> SchemaResult<&Area> {
        let pos = self.area_pos(id)?;
        self.checkpoint();
        patch.apply(&mut self.diagram.areas[pos]);
        Ok(&self.diagram.areas[pos])
    }

    pub fn delete_area(&mut self, id: &str) -> SchemaResult<Area> {
        let pos = self.area_pos(id)?;
        self.checkpoint();
        Ok(self.diagram.areas.remove(pos))
    }

    pub fn move_area(&mut self, id: &str, x: f64, y: f64) -> SchemaResult<()> {
        let pos = self.area_pos(id)?;
        self.diagram.areas[pos].position = (x, y);
        Ok(())
    }

    pub fn reorder_area(&mut self, id: &str, to: usize) -> SchemaResult<()> {
        let from = self.area_pos(id)?;
        self.checkpoint();
        move_item(&mut self.diagram.areas, from, to);
        Ok(())
    }
}
