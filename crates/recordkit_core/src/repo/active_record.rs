//! Schema-discovering active record.
//!
//! # Responsibility
//! - Discover a table's columns once and expose them as named fields.
//! - Persist field values through the table helpers.
//!
//! # Invariants
//! - Field names are translated `camelCase` -> `snake_case` before lookup.
//! - `id` is read through the record identity and is never writable.
//! - Unknown fields fail with `UnknownColumn` on both read and write.

use super::fields::{to_column_name, FieldRegistry, ID_COLUMN};
use super::record::{Record, RecordError, RecordHooks, RecordResult, RecordState};
use super::table;
use crate::db::RelationalConnection;
use crate::model::row::Row;
use log::debug;
use serde::Serialize;

/// Hooks backing an [`ActiveRecord`]: table name plus field storage.
#[derive(Debug, Clone)]
pub struct TableRow {
    table: String,
    fields: FieldRegistry,
}

impl TableRow {
    fn discover(conn: &dyn RelationalConnection, table: &str) -> RecordResult<Self> {
        let columns = conn.describe_table(table)?;
        if columns.is_empty() {
            return Err(RecordError::UnknownTable(table.to_string()));
        }

        let fields = FieldRegistry::from_columns(columns);
        if !fields.has_column(ID_COLUMN) {
            return Err(RecordError::UnknownColumn {
                table: table.to_string(),
                column: ID_COLUMN.to_string(),
            });
        }

        debug!(
            "event=schema_discover module=repo status=ok columns={}",
            fields.columns().len()
        );
        Ok(Self {
            table: table.to_string(),
            fields,
        })
    }
}

impl RecordHooks for TableRow {
    fn select(&mut self, conn: &dyn RelationalConnection, id: &str) -> RecordResult<Option<String>> {
        let Some(row) = table::select(conn, &self.table, self.fields.columns(), id)? else {
            return Ok(None);
        };
        self.fields.load_row(&row);
        Ok(row.get(ID_COLUMN).map(str::to_string))
    }

    fn update(&mut self, conn: &dyn RelationalConnection, id: &str) -> RecordResult<()> {
        table::update(conn, &self.table, &self.fields.assigned(), id)?;
        Ok(())
    }

    fn insert(&mut self, conn: &dyn RelationalConnection) -> RecordResult<String> {
        Ok(table::insert(conn, &self.table, &self.fields.assigned())?)
    }

    fn delete(&mut self, conn: &dyn RelationalConnection, id: &str) -> RecordResult<()> {
        table::delete(conn, &self.table, id)?;
        Ok(())
    }
}

/// Serializable view of an active record.
#[derive(Debug, Clone, Serialize)]
pub struct RecordSnapshot {
    pub table: String,
    pub id: Option<String>,
    pub fields: Row,
}

/// One row of a table whose columns are discovered at construction.
///
/// `save()` writes only the columns that were set or loaded. Columns never
/// touched are left out of the insert or update, so they keep their stored
/// value or the table default rather than being overwritten with `NULL`.
/// Call [`ActiveRecord::set_null`] to clear a column explicitly.
///
/// ```no_run
/// # use recordkit_core::db::open_db_in_memory;
/// # use recordkit_core::repo::ActiveRecord;
/// let conn = open_db_in_memory()?;
/// let mut user = ActiveRecord::new(&conn, "user")?;
/// user.set("firstName", "Ada")?;
/// user.save()?;
/// println!("created user {:?}", user.id());
/// # Ok::<(), recordkit_core::repo::RecordError>(())
/// ```
#[derive(Debug)]
pub struct ActiveRecord<'conn> {
    record: Record<'conn, TableRow>,
}

impl<'conn> ActiveRecord<'conn> {
    /// Discovers the schema of `table` and creates an unsaved record.
    pub fn new(conn: &'conn dyn RelationalConnection, table: &str) -> RecordResult<Self> {
        let hooks = TableRow::discover(conn, table)?;
        Ok(Self {
            record: Record::new(conn, hooks),
        })
    }

    /// Discovers the schema of `table` and loads the row with `id`.
    pub fn load(
        conn: &'conn dyn RelationalConnection,
        table: &str,
        id: impl Into<String>,
    ) -> RecordResult<Self> {
        let hooks = TableRow::discover(conn, table)?;
        Ok(Self {
            record: Record::load(conn, hooks, id)?,
        })
    }

    pub fn table(&self) -> &str {
        &self.record.hooks().table
    }

    /// Discovered column names, `id` included, in schema order.
    pub fn columns(&self) -> &[String] {
        self.record.hooks().fields.columns()
    }

    pub fn id(&self) -> Option<&str> {
        self.record.id()
    }

    pub fn state(&self) -> &RecordState {
        self.record.state()
    }

    pub fn is_saved(&self) -> bool {
        self.record.is_saved()
    }

    pub fn is_found(&self) -> bool {
        self.record.is_found()
    }

    /// Reads a field by external (`camelCase`) or column name.
    ///
    /// `Ok(None)` means the column holds `NULL` or was never set.
    pub fn get(&self, field: &str) -> RecordResult<Option<&str>> {
        let column = to_column_name(field);
        if column == ID_COLUMN {
            return Ok(self.record.id());
        }
        self.record
            .hooks()
            .fields
            .get(&column)
            .ok_or_else(|| self.unknown_column(column))
    }

    /// Writes a field value, stored as a string.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> RecordResult<()> {
        self.store(field, Some(value.into()))
    }

    /// Writes `NULL` into a field.
    pub fn set_null(&mut self, field: &str) -> RecordResult<()> {
        self.store(field, None)
    }

    /// Writable fields with their current values, in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.record.hooks().fields.iter()
    }

    pub fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot {
            table: self.table().to_string(),
            id: self.id().map(str::to_string),
            fields: self.record.hooks().fields.to_row(),
        }
    }

    /// Inserts the row on first call, updates it afterwards.
    pub fn save(&mut self) -> RecordResult<()> {
        self.record.save()
    }

    /// Deletes the backing row and consumes the record.
    pub fn delete(self) -> RecordResult<()> {
        self.record.delete()
    }

    fn store(&mut self, field: &str, value: Option<String>) -> RecordResult<()> {
        let column = to_column_name(field);
        if column == ID_COLUMN {
            return Err(RecordError::ImmutableField(column));
        }
        if self.record.hooks_mut().fields.set(&column, value) {
            Ok(())
        } else {
            Err(self.unknown_column(column))
        }
    }

    fn unknown_column(&self, column: String) -> RecordError {
        RecordError::UnknownColumn {
            table: self.table().to_string(),
            column,
        }
    }
}
