//! Value model shared by templates, connections and records.
//!
//! # Responsibility
//! - Define the bindable literal shape passed into SQL templates.
//! - Define the row shape returned by connections.
//!
//! # Invariants
//! - Values are text or SQL `NULL`; no other type coercion happens in core.
//! - Column names are unique within one `Row`.

pub mod literal;
pub mod row;
