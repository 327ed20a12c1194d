//! Row persistence built on the connection contract.
//!
//! # Responsibility
//! - Provide table-level CRUD helpers keyed by `id`.
//! - Provide the record lifecycle and the schema-discovering active record.
//!
//! # Invariants
//! - Every statement reaches the connection fully literal.
//! - Errors propagate unchanged; nothing is retried or repaired internally.

pub mod active_record;
pub mod fields;
pub mod record;
pub mod table;

pub use active_record::{ActiveRecord, RecordSnapshot, TableRow};
pub use fields::{to_column_name, FieldRegistry};
pub use record::{Record, RecordError, RecordHooks, RecordResult, RecordState};
