//! Descriptor-driven object/row mapping over SQLite.
//!
//! ## Layers
//!
//! | Module | Role |
//! |--------|------|
//! | [`entity`] | The [`Entity`] trait a record implements to declare its table |
//! | [`descriptor`] | Validates and caches one [`EntityDescriptor`] per type |
//! | [`statement`] | Builds INSERT / SELECT / UPDATE / DELETE text |
//! | [`mapper`] | Record → bind values, row → record, delimited row → record |
//! | [`gateway`] | Owns the connection; generic CRUD plus transactions |
//!
//! Writes flow record → mapper → statement → gateway; reads flow
//! gateway → mapper → record. Enumerated fields are stored as their symbolic
//! name (see [`Enumerated`]).

pub mod descriptor;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod mapper;
pub mod statement;
pub mod value;

#[cfg(test)]
mod fixtures;

pub use descriptor::{describe, EntityDescriptor};
pub use entity::{unknown_field, Entity, FieldDef, FieldKind};
pub use error::{MappingError, PersistenceError};
pub use gateway::Gateway;
pub use mapper::{from_delimited_row, from_row, to_row, to_row_without_identity};
pub use value::{Enumerated, SqlValue};
