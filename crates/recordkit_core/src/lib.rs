//! Relational data access core: safe SQL templating, a record lifecycle and
//! a schema-discovering active record over a generic connection.
//!
//! Everything is synchronous and single-connection. Callers own the
//! connection and must not share one session between threads without
//! external synchronization.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod sql;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, RelationalConnection, SqliteConnection};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::literal::{Args, Literal};
pub use model::row::Row;
pub use query::cursor::ResultCursor;
pub use repo::{
    ActiveRecord, Record, RecordError, RecordHooks, RecordResult, RecordSnapshot, RecordState,
};
pub use sql::{quote_identifier, render, render_checked, Escapes, StatementTemplate, TemplateError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
