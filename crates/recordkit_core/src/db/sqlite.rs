//! SQLite-backed `RelationalConnection`.
//!
//! # Responsibility
//! - Run fully rendered statements on a `rusqlite` session.
//! - Surface every column value as nullable text.
//!
//! # Invariants
//! - SQL text and argument values are never logged; only the statement verb.
//! - Generated ids come from `last_insert_rowid()` on the same session.
//! - Quoted literals escape only by doubling; `\` is ordinary content.

use super::{statement_verb, DbError, DbResult, RelationalConnection};
use crate::model::literal::Literal;
use crate::model::row::Row;
use crate::sql::identifier::quote_identifier;
use crate::sql::template::Escapes;
use log::{debug, error, info};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::time::Instant;

/// SQLite session implementing [`RelationalConnection`].
///
/// Not `Sync`: one connection serves one logical operation at a time.
#[derive(Debug)]
pub struct SqliteConnection {
    conn: Option<Connection>,
    target: String,
}

impl SqliteConnection {
    /// Wraps an already-open `rusqlite` session.
    pub fn new(conn: Connection, target: impl Into<String>) -> Self {
        Self {
            conn: Some(conn),
            target: target.into(),
        }
    }

    /// Path (or `:memory:`) this connection was opened against.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    fn session(&self) -> DbResult<&Connection> {
        self.conn.as_ref().ok_or(DbError::Closed)
    }

    fn run<T, F>(&self, sql: &str, args: &[Literal], op: F) -> DbResult<T>
    where
        F: FnOnce(&Connection, &str) -> rusqlite::Result<T>,
    {
        let conn = self.session()?;
        let rendered = self.render(sql, args)?;
        let verb = statement_verb(&rendered);
        let started_at = Instant::now();

        match op(conn, &rendered) {
            Ok(value) => {
                debug!(
                    "event=db_statement module=db status=ok verb={} duration_ms={}",
                    verb,
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                error!(
                    "event=db_statement module=db status=error verb={} duration_ms={} error_code=statement_failed",
                    verb,
                    started_at.elapsed().as_millis()
                );
                Err(DbError::statement(rendered, err))
            }
        }
    }
}

impl RelationalConnection for SqliteConnection {
    fn exec(&self, sql: &str, args: &[Literal]) -> DbResult<u64> {
        self.run(sql, args, |conn, rendered| {
            conn.execute(rendered, []).map(|changed| changed as u64)
        })
    }

    fn query_all(&self, sql: &str, args: &[Literal]) -> DbResult<Vec<Row>> {
        self.run(sql, args, fetch_rows)
    }

    fn quote_literal(&self, value: &Literal) -> String {
        match value {
            Literal::Null => "null".to_string(),
            Literal::Text(text) => format!("'{}'", text.replace('\'', "''")),
        }
    }

    fn literal_escapes(&self) -> Escapes {
        Escapes::DoubledOnly
    }

    fn close(&mut self) -> DbResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok");
                Ok(())
            }
            Err((conn, err)) => {
                error!("event=db_close module=db status=error error={err}");
                self.conn = Some(conn);
                Err(DbError::connection(self.target.clone(), err))
            }
        }
    }

    fn describe_table(&self, table: &str) -> DbResult<Vec<String>> {
        let sql = format!("pragma table_info({})", quote_identifier(table));
        let rows = self.query_all(&sql, &[])?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get("name"))
            .map(str::to_string)
            .collect())
    }

    fn insert_returning_id(&self, sql: &str) -> DbResult<String> {
        self.run(sql, &[], |conn, rendered| {
            conn.execute(rendered, [])?;
            Ok(conn.last_insert_rowid().to_string())
        })
    }
}

fn fetch_rows(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut rows = stmt.query([])?;
    let mut fetched = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Row::new();
        for (index, column) in columns.iter().enumerate() {
            values.insert(column.as_str(), value_to_text(row.get_ref(index)?));
        }
        fetched.push(values);
    }

    Ok(fetched)
}

fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(number) => Some(number.to_string()),
        ValueRef::Real(number) => Some(number.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::value_to_text;
    use rusqlite::types::ValueRef;

    #[test]
    fn values_are_rendered_as_text() {
        assert_eq!(value_to_text(ValueRef::Null), None);
        assert_eq!(value_to_text(ValueRef::Integer(42)).as_deref(), Some("42"));
        assert_eq!(value_to_text(ValueRef::Real(1.5)).as_deref(), Some("1.5"));
        assert_eq!(
            value_to_text(ValueRef::Text(b"ada")).as_deref(),
            Some("ada")
        );
    }
}
