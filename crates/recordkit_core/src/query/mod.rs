//! Materialized query results.
//!
//! # Responsibility
//! - Fetch a statement's rows once and expose them through an explicit cursor.
//!
//! # Invariants
//! - In-memory edits never reach storage.

pub mod cursor;

pub use cursor::ResultCursor;
