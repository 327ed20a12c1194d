//! Row shape returned by connections.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One fetched row: column name -> nullable text value, in select order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, Option<String>)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row from `(column, value)` pairs.
    ///
    /// A repeated column name overwrites the earlier value in place.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<String>,
    {
        let mut row = Self::new();
        for (column, value) in pairs {
            row.insert(column, value);
        }
        row
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// Returns the column value; `None` when the column is absent or `NULL`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.position(column)
            .and_then(|index| self.cells[index].1.as_deref())
    }

    /// Returns the value at select-list position `index`.
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|(_, value)| value.as_deref())
    }

    pub fn is_null(&self, column: &str) -> bool {
        self.position(column)
            .is_some_and(|index| self.cells[index].1.is_none())
    }

    /// Sets a column value, appending the column when it is new.
    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        let column = column.into();
        match self.position(&column) {
            Some(index) => self.cells[index].1 = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Removes a column and returns its previous value.
    pub fn remove(&mut self, column: &str) -> Option<Option<String>> {
        let index = self.position(column)?;
        Some(self.cells.remove(index).1)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(column, _)| column.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells
            .iter()
            .map(|(column, value)| (column.as_str(), value.as_deref()))
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.cells.iter().position(|(name, _)| name == column)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
