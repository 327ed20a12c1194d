//! Relational connection contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the connection surface consumed by records and cursors.
//! - Provide a SQLite-backed connection with bootstrap pragmas applied.
//!
//! # Invariants
//! - SQL handed to a connection by core is fully literal; placeholders are
//!   resolved by `sql::template` before execution.
//! - At most one logical operation is in flight on a connection. Connections
//!   are not `Sync`; callers synchronize externally or use one per worker.

use crate::model::literal::Literal;
use crate::model::row::Row;
use crate::sql::identifier::quote_identifier;
use crate::sql::template::{Escapes, StatementTemplate, TemplateError};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod sqlite;

pub use open::{open_db, open_db_in_memory};
pub use sqlite::SqliteConnection;

pub type DbResult<T> = Result<T, DbError>;

/// Boxed driver error kept as the `source()` of a `DbError`.
pub type DriverError = Box<dyn Error + Send + Sync + 'static>;

const LAST_INSERT_ID_SQL: &str = "select last_insert_id()";

#[derive(Debug)]
pub enum DbError {
    /// Opening or bootstrapping the session failed.
    Connection { target: String, source: DriverError },
    /// Executing or fetching a statement failed.
    Statement { sql: String, source: DriverError },
    /// The statement template could not be resolved.
    Template(TemplateError),
    /// The connection was used after `close()`.
    Closed,
}

impl DbError {
    pub fn statement(sql: impl Into<String>, source: impl Into<DriverError>) -> Self {
        Self::Statement {
            sql: sql.into(),
            source: source.into(),
        }
    }

    pub fn connection(target: impl Into<String>, source: impl Into<DriverError>) -> Self {
        Self::Connection {
            target: target.into(),
            source: source.into(),
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection { target, source } => {
                write!(f, "failed to connect to `{target}`: {source}")
            }
            Self::Statement { sql, source } => {
                write!(f, "failed to execute the statement `{sql}`: {source}")
            }
            Self::Template(err) => write!(f, "{err}"),
            Self::Closed => write!(f, "connection is closed"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection { source, .. } => Some(source.as_ref()),
            Self::Statement { source, .. } => Some(source.as_ref()),
            Self::Template(err) => Some(err),
            Self::Closed => None,
        }
    }
}

impl From<TemplateError> for DbError {
    fn from(value: TemplateError) -> Self {
        Self::Template(value)
    }
}

/// Connection surface consumed by the table helper, records and cursors.
///
/// `args` are bound to the `?` markers of `sql` by [`RelationalConnection::render`];
/// implementations run the rendered statement unbound.
pub trait RelationalConnection {
    /// Executes a statement and returns the number of affected rows.
    fn exec(&self, sql: &str, args: &[Literal]) -> DbResult<u64>;

    /// Executes a query and returns every row in fetch order.
    fn query_all(&self, sql: &str, args: &[Literal]) -> DbResult<Vec<Row>>;

    /// Escapes and quotes a value. `Null` maps to the `null` keyword.
    fn quote_literal(&self, value: &Literal) -> String;

    /// Closes the session. Later calls fail with [`DbError::Closed`].
    fn close(&mut self) -> DbResult<()>;

    /// Executes a query and returns its first row, if any.
    fn query_one(&self, sql: &str, args: &[Literal]) -> DbResult<Option<Row>> {
        Ok(self.query_all(sql, args)?.into_iter().next())
    }

    /// Escape rule of this engine's quoted literals. It must agree with
    /// [`RelationalConnection::quote_literal`].
    fn literal_escapes(&self) -> Escapes {
        Escapes::Backslash
    }

    /// Resolves placeholders with this connection's literal quoting.
    ///
    /// Every applicable placeholder must have an argument, including when
    /// `args` is empty.
    fn render(&self, sql: &str, args: &[Literal]) -> DbResult<String> {
        let rendered = StatementTemplate::parse_with(sql, self.literal_escapes())
            .render_checked(args, |value| self.quote_literal(value))?;
        Ok(rendered)
    }

    /// Lists the column names of `table` in declaration order.
    ///
    /// The default issues `show columns from <table>` and reads the `Field`
    /// column (or `name`, for engines that report it that way).
    fn describe_table(&self, table: &str) -> DbResult<Vec<String>> {
        let sql = format!("show columns from {}", quote_identifier(table));
        let rows = self.query_all(&sql, &[])?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get("Field").or_else(|| row.get("name")))
            .map(str::to_string)
            .collect())
    }

    /// Runs an insert statement and returns the generated row id.
    ///
    /// The default issues a second `select last_insert_id()` round trip. It is
    /// not atomic: if the second call fails, the row persists but the id is
    /// lost. Engines with a session-scoped primitive should override this.
    fn insert_returning_id(&self, sql: &str) -> DbResult<String> {
        self.exec(sql, &[])?;
        let row = self.query_one(LAST_INSERT_ID_SQL, &[])?;
        row.as_ref()
            .and_then(|row| row.get_index(0))
            .map(str::to_string)
            .ok_or_else(|| DbError::statement(LAST_INSERT_ID_SQL, "statement returned no generated id"))
    }
}

/// Returns the leading SQL keyword, lower-cased, for metadata-only logging.
pub(crate) fn statement_verb(sql: &str) -> String {
    sql.split_whitespace()
        .next()
        .map(|word| {
            word.chars()
                .take_while(|ch| ch.is_ascii_alphabetic())
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|verb| !verb.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
