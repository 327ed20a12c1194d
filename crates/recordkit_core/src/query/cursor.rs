//! Fetched row set with an explicit cursor position.

use crate::db::{DbResult, RelationalConnection};
use crate::model::literal::Args;
use crate::model::row::Row;

/// All rows of one query plus a current-row index.
///
/// The cursor starts at the first row and only moves through `advance`,
/// `seek` or `rewind`. Iterating with `iter()` or indexing with `row()` never
/// moves it.
#[derive(Debug, Clone, Default)]
pub struct ResultCursor {
    rows: Vec<Row>,
    position: usize,
}

impl ResultCursor {
    /// Executes `sql` and materializes every row.
    pub fn fetch<C>(conn: &C, sql: &str, args: impl Into<Args>) -> DbResult<Self>
    where
        C: RelationalConnection + ?Sized,
    {
        let args: Args = args.into();
        let rows = conn.query_all(sql, &args)?;
        Ok(Self::from_rows(rows))
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows, position: 0 }
    }

    /// Number of fetched rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    /// Iterates over every row from the start. Restartable; does not move the
    /// cursor.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Row under the cursor; `None` when empty or moved past the end.
    pub fn current(&self) -> Option<&Row> {
        self.rows.get(self.position)
    }

    /// Moves to the next row and returns it.
    pub fn advance(&mut self) -> Option<&Row> {
        if self.position < self.rows.len() {
            self.position += 1;
        }
        self.current()
    }

    /// Moves the cursor to `index`. Returns `false` (cursor unchanged) when out
    /// of range.
    pub fn seek(&mut self, index: usize) -> bool {
        if index < self.rows.len() {
            self.position = index;
            true
        } else {
            false
        }
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Does the current row have `column`?
    pub fn contains(&self, column: &str) -> bool {
        self.current().is_some_and(|row| row.contains(column))
    }

    /// Value of `column` on the current row.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.current().and_then(|row| row.get(column))
    }

    /// Sets `column` on the current row (in memory only). Returns `false`
    /// when there is no current row.
    pub fn set(&mut self, column: &str, value: impl Into<String>) -> bool {
        match self.rows.get_mut(self.position) {
            Some(row) => {
                row.insert(column, Some(value.into()));
                true
            }
            None => false,
        }
    }

    /// Removes `column` from the current row (in memory only) and returns its
    /// previous value.
    pub fn remove(&mut self, column: &str) -> Option<Option<String>> {
        self.rows.get_mut(self.position)?.remove(column)
    }
}

impl<'a> IntoIterator for &'a ResultCursor {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
