//! Core domain models and logic for schema editing and DDL generation

pub mod config;
pub mod ddl;
pub mod dialect;
mod error;
pub mod history;
pub mod patch;
pub mod relationship_builder;
mod schema;
pub mod session;
pub mod snapshot;
pub mod validation;
#[cfg(test)]
mod tests;

pub use ddl::{DdlOptions, generate, generate_statements};
pub use dialect::{Dialect, DialectConfig, DialectRegistry, registry};
pub use error::{SchemaError, SchemaResult};
pub use history::History;
pub use relationship_builder::RelationshipBuilder;
pub use schema::*;
pub use session::Session;
