//! Field registry built from a discovered table schema.
//!
//! # Responsibility
//! - Translate external field names into column names.
//! - Hold one value slot per writable column.
//!
//! # Invariants
//! - The registry shape is fixed at construction; columns are never added or
//!   removed afterwards.
//! - The `id` column is listed but owns no writable slot.

use crate::model::literal::Literal;
use crate::model::row::Row;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Name of the primary-key column every mapped table carries.
pub const ID_COLUMN: &str = "id";

static CAMEL_BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid camel boundary regex"));

/// Converts a `camelCase` field name into its `snake_case` column name.
///
/// ```
/// use recordkit_core::repo::fields::to_column_name;
///
/// assert_eq!(to_column_name("firstName"), "first_name");
/// assert_eq!(to_column_name("id"), "id");
/// ```
pub fn to_column_name(field: &str) -> String {
    CAMEL_BOUNDARY_RE
        .replace_all(field, "${1}_${2}")
        .to_lowercase()
}

#[derive(Debug, Clone)]
struct Slot {
    column: String,
    value: Option<String>,
    assigned: bool,
}

/// Column-name -> value storage with a fixed shape.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    slots: Vec<Slot>,
}

impl FieldRegistry {
    /// Builds the registry from discovered column names, in schema order.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self {
            columns: Vec::new(),
            index: HashMap::new(),
            slots: Vec::new(),
        };

        for column in columns {
            let column = column.into();
            if registry.columns.contains(&column) {
                continue;
            }
            if column != ID_COLUMN {
                registry.index.insert(column.clone(), registry.slots.len());
                registry.slots.push(Slot {
                    column: column.clone(),
                    value: None,
                    assigned: false,
                });
            }
            registry.columns.push(column);
        }

        registry
    }

    /// Every discovered column, `id` included, in schema order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|known| known == column)
    }

    /// Returns the slot value: `None` for unknown or identity columns,
    /// `Some(None)` for a `NULL`/unset value.
    pub fn get(&self, column: &str) -> Option<Option<&str>> {
        self.index
            .get(column)
            .map(|&slot| self.slots[slot].value.as_deref())
    }

    /// Stores `value` for a writable column. Returns `false` when the column
    /// owns no slot.
    pub fn set(&mut self, column: &str, value: Option<String>) -> bool {
        match self.index.get(column) {
            Some(&slot) => {
                let slot = &mut self.slots[slot];
                slot.value = value;
                slot.assigned = true;
                true
            }
            None => false,
        }
    }

    /// Overwrites every slot from a fetched row; columns missing from the
    /// row become `NULL`.
    pub fn load_row(&mut self, row: &Row) {
        for slot in &mut self.slots {
            slot.value = row.get(&slot.column).map(str::to_string);
            slot.assigned = true;
        }
    }

    /// Writable columns with their current values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.slots
            .iter()
            .map(|slot| (slot.column.as_str(), slot.value.as_deref()))
    }

    /// `(column, literal)` pairs for columns set or loaded since
    /// construction. Columns never touched keep their stored value.
    pub fn assigned(&self) -> Vec<(&str, Literal)> {
        self.slots
            .iter()
            .filter(|slot| slot.assigned)
            .map(|slot| (slot.column.as_str(), Literal::from(slot.value.clone())))
            .collect()
    }

    pub fn to_row(&self) -> Row {
        Row::from_pairs(
            self.slots
                .iter()
                .map(|slot| (slot.column.clone(), slot.value.clone())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{to_column_name, FieldRegistry};
    use crate::model::row::Row;

    #[test]
    fn camel_case_is_split_at_each_lower_upper_boundary() {
        assert_eq!(to_column_name("firstName"), "first_name");
        assert_eq!(to_column_name("createdAtUtc"), "created_at_utc");
        assert_eq!(to_column_name("already_snake"), "already_snake");
        assert_eq!(to_column_name("ID"), "id");
        assert_eq!(to_column_name("userID"), "user_id");
    }

    #[test]
    fn id_column_owns_no_slot() {
        let mut registry = FieldRegistry::from_columns(["id", "first_name"]);

        assert_eq!(registry.columns(), ["id", "first_name"]);
        assert!(registry.has_column("id"));
        assert_eq!(registry.get("id"), None);
        assert!(!registry.set("id", Some("7".to_string())));
        assert_eq!(registry.get("first_name"), Some(None));
    }

    #[test]
    fn only_assigned_columns_are_reported_as_assigned() {
        let mut registry = FieldRegistry::from_columns(["id", "a", "b"]);
        registry.set("b", Some("x".to_string()));

        let assigned = registry.assigned();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].0, "b");

        registry.load_row(&Row::from_pairs([("a", Some("1".to_string()))]));
        assert_eq!(registry.assigned().len(), 2);
        assert_eq!(registry.get("a"), Some(Some("1")));
        assert_eq!(registry.get("b"), Some(None));
    }
}
