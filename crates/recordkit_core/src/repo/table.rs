//! Table-level helpers keyed by the `id` primary key.
//!
//! # Responsibility
//! - Build select/insert/update/delete statements for one table row.
//! - Route value quoting through the connection's literal quoting.
//!
//! # Invariants
//! - Table and column names always pass through `quote_identifier`.
//! - The `id` argument is bound through the placeholder engine on the
//!   `where` fragment only; dynamic column values are quoted directly because
//!   their count varies. The assembled statement has no applicable
//!   placeholders left.

use crate::db::{DbResult, RelationalConnection};
use crate::model::literal::Literal;
use crate::model::row::Row;
use crate::sql::identifier::quote_identifier;
use log::debug;

const ID_FILTER: &str = "where id = ?";

/// Selects `columns` of the row with the given `id`.
///
/// ```no_run
/// # use recordkit_core::db::open_db_in_memory;
/// # use recordkit_core::repo::table;
/// let conn = open_db_in_memory()?;
/// let row = table::select(&conn, "user", &["username", "password"], "1")?;
/// # Ok::<(), recordkit_core::db::DbError>(())
/// ```
pub fn select<C, S>(conn: &C, table: &str, columns: &[S], id: &str) -> DbResult<Option<Row>>
where
    C: RelationalConnection + ?Sized,
    S: AsRef<str>,
{
    let column_list = columns
        .iter()
        .map(|column| quote_identifier(column.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "select {column_list} from {} {}",
        quote_identifier(table),
        id_filter(conn, id)?
    );
    conn.query_one(&sql, &[])
}

/// Updates the row with the given `id`. Returns the affected row count.
///
/// An empty `values` list issues no statement and returns `0`.
pub fn update<C, S>(conn: &C, table: &str, values: &[(S, Literal)], id: &str) -> DbResult<u64>
where
    C: RelationalConnection + ?Sized,
    S: AsRef<str>,
{
    if values.is_empty() {
        debug!("event=table_update module=repo status=skipped reason=no_columns");
        return Ok(0);
    }

    let assignments = values
        .iter()
        .map(|(column, value)| {
            format!(
                "{} = {}",
                quote_identifier(column.as_ref()),
                conn.quote_literal(value)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "update {} set {assignments} {}",
        quote_identifier(table),
        id_filter(conn, id)?
    );
    conn.exec(&sql, &[])
}

/// Inserts a row and returns the generated id.
///
/// The id is obtained through [`RelationalConnection::insert_returning_id`].
/// An empty `values` list inserts a row of column defaults.
pub fn insert<C, S>(conn: &C, table: &str, values: &[(S, Literal)]) -> DbResult<String>
where
    C: RelationalConnection + ?Sized,
    S: AsRef<str>,
{
    let table = quote_identifier(table);
    let sql = if values.is_empty() {
        format!("insert into {table} default values")
    } else {
        let (columns, literals): (Vec<_>, Vec<_>) = values
            .iter()
            .map(|(column, value)| {
                (
                    quote_identifier(column.as_ref()),
                    conn.quote_literal(value),
                )
            })
            .unzip();
        format!(
            "insert into {table} ({}) values ({})",
            columns.join(", "),
            literals.join(", ")
        )
    };
    conn.insert_returning_id(&sql)
}

/// Deletes the row with the given `id`. Returns the affected row count.
pub fn delete<C>(conn: &C, table: &str, id: &str) -> DbResult<u64>
where
    C: RelationalConnection + ?Sized,
{
    let sql = format!(
        "delete from {} {}",
        quote_identifier(table),
        id_filter(conn, id)?
    );
    conn.exec(&sql, &[])
}

fn id_filter<C>(conn: &C, id: &str) -> DbResult<String>
where
    C: RelationalConnection + ?Sized,
{
    conn.render(ID_FILTER, &[Literal::from(id)])
}
