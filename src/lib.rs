//! Schemacraft - Entity-Relationship Schema Engine
//!
//! An in-memory ER diagram model with an undo/redo history, an interactive
//! relationship builder and DDL generation for MySQL, PostgreSQL, SQLite,
//! SQL Server and Oracle.

pub mod core;

pub use crate::core::{
    Diagram, DialectRegistry, Session, generate, generate_statements, registry,
};
