//! SQL text generation from an [`EntityDescriptor`].
//!
//! Every builder is a pure function of the descriptor. Placeholder order here
//! is the bind order used by [`crate::mapper`]: INSERT binds every persisted
//! field in descriptor order, UPDATE binds the non-identity fields in
//! descriptor order followed by the identity.

use crate::descriptor::EntityDescriptor;

/// `INSERT INTO <table> (<cols>) VALUES (?, ...)`
pub fn insert_statement(descriptor: &EntityDescriptor) -> String {
    let fields = descriptor.fields();
    let columns: Vec<&str> = fields.iter().map(|f| f.column).collect();
    let placeholders = vec!["?"; fields.len()];

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        descriptor.table(),
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// `SELECT * FROM <table> WHERE <id> = ?`
pub fn select_by_id_statement(descriptor: &EntityDescriptor) -> String {
    format!(
        "SELECT * FROM {} WHERE {} = ?",
        descriptor.table(),
        descriptor.identity().column
    )
}

/// `UPDATE <table> SET <col> = ?, ... WHERE <id> = ?`
pub fn update_statement(descriptor: &EntityDescriptor) -> String {
    let assignments: Vec<String> = descriptor
        .non_identity_fields()
        .map(|f| format!("{} = ?", f.column))
        .collect();

    format!(
        "UPDATE {} SET {} WHERE {} = ?",
        descriptor.table(),
        assignments.join(", "),
        descriptor.identity().column
    )
}

/// `DELETE FROM <table> WHERE <id> = ?`
pub fn delete_by_id_statement(descriptor: &EntityDescriptor) -> String {
    format!(
        "DELETE FROM {} WHERE {} = ?",
        descriptor.table(),
        descriptor.identity().column
    )
}
