//! Record lifecycle shared by every row-backed record type.
//!
//! # Responsibility
//! - Track identity and persisted state for one table row.
//! - Route `save()` to insert or update through subtype hooks.
//!
//! # Invariants
//! - `is_saved()` is true iff an id was supplied at construction or an insert
//!   completed.
//! - A persisted record never routes to insert again.
//! - `delete()` consumes the record; a deleted record cannot be saved.

use crate::db::{DbError, RelationalConnection};
use log::debug;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub type RecordResult<T> = Result<T, RecordError>;

/// Record-layer error for lifecycle and field access.
#[derive(Debug)]
pub enum RecordError {
    Db(DbError),
    /// Schema discovery returned no columns for the table.
    UnknownTable(String),
    /// The column is not part of the discovered schema.
    UnknownColumn { table: String, column: String },
    /// The identity column cannot be written through field access.
    ImmutableField(String),
    /// The record was loaded by id but no row matched.
    NotFound(String),
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UnknownTable(table) => write!(f, "table `{table}` has no columns"),
            Self::UnknownColumn { table, column } => {
                write!(f, "unknown column `{column}` in table `{table}`")
            }
            Self::ImmutableField(column) => write!(f, "field `{column}` is not writable"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UnknownTable(_)
            | Self::UnknownColumn { .. }
            | Self::ImmutableField(_)
            | Self::NotFound(_) => None,
        }
    }
}

impl From<DbError> for RecordError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Persistence operations a concrete record type supplies.
pub trait RecordHooks {
    /// Loads the row for `id` into `self`.
    ///
    /// Returns the id as stored (possibly normalized), or `None` when no row
    /// matches.
    fn select(&mut self, conn: &dyn RelationalConnection, id: &str) -> RecordResult<Option<String>>;

    fn update(&mut self, conn: &dyn RelationalConnection, id: &str) -> RecordResult<()>;

    /// Inserts `self` as a new row and returns the generated id.
    fn insert(&mut self, conn: &dyn RelationalConnection) -> RecordResult<String>;

    fn delete(&mut self, conn: &dyn RelationalConnection, id: &str) -> RecordResult<()>;
}

/// Lifecycle position of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordState {
    /// Not yet persisted; `save()` inserts.
    New,
    /// Backed by a row with this id; `save()` updates.
    Persisted(String),
    /// Loaded by this id but no row matched.
    Missing(String),
}

/// One table row with identity tracking, driving a [`RecordHooks`] value.
pub struct Record<'conn, H> {
    conn: &'conn dyn RelationalConnection,
    state: RecordState,
    hooks: H,
}

impl<'conn, H: RecordHooks> Record<'conn, H> {
    /// Creates an unsaved record.
    pub fn new(conn: &'conn dyn RelationalConnection, hooks: H) -> Self {
        Self {
            conn,
            state: RecordState::New,
            hooks,
        }
    }

    /// Creates a record bound to `id` and loads it immediately.
    ///
    /// When no row matches, the record is still considered saved but
    /// `is_found()` is false and `save()` fails with `NotFound`.
    pub fn load(
        conn: &'conn dyn RelationalConnection,
        mut hooks: H,
        id: impl Into<String>,
    ) -> RecordResult<Self> {
        let requested = id.into();
        let state = match hooks.select(conn, &requested)? {
            Some(loaded) if !loaded.is_empty() => RecordState::Persisted(loaded),
            _ => {
                debug!("event=record_load module=repo status=not_found");
                RecordState::Missing(requested)
            }
        };
        Ok(Self { conn, state, hooks })
    }

    /// Creates a new record, or loads one when `id` is present.
    pub fn with_id(
        conn: &'conn dyn RelationalConnection,
        hooks: H,
        id: Option<String>,
    ) -> RecordResult<Self> {
        match id {
            Some(id) => Self::load(conn, hooks, id),
            None => Ok(Self::new(conn, hooks)),
        }
    }

    /// Returns the record id, or `None` when unsaved or not found.
    pub fn id(&self) -> Option<&str> {
        match &self.state {
            RecordState::Persisted(id) => Some(id.as_str()),
            RecordState::New | RecordState::Missing(_) => None,
        }
    }

    pub fn state(&self) -> &RecordState {
        &self.state
    }

    pub fn is_saved(&self) -> bool {
        !matches!(self.state, RecordState::New)
    }

    /// Was the record found (or created)?
    pub fn is_found(&self) -> bool {
        self.id().is_some_and(|id| !id.is_empty())
    }

    /// Inserts the record on first call, updates it afterwards.
    ///
    /// A failed insert leaves the record unsaved.
    pub fn save(&mut self) -> RecordResult<()> {
        match &self.state {
            RecordState::New => {
                let id = self.hooks.insert(self.conn)?;
                debug!("event=record_save module=repo status=ok action=insert");
                self.state = RecordState::Persisted(id);
            }
            RecordState::Persisted(id) => {
                self.hooks.update(self.conn, id)?;
                debug!("event=record_save module=repo status=ok action=update");
            }
            RecordState::Missing(id) => return Err(RecordError::NotFound(id.clone())),
        }
        Ok(())
    }

    /// Deletes the backing row. Records that were never persisted are
    /// dropped without issuing a statement.
    pub fn delete(mut self) -> RecordResult<()> {
        if let RecordState::Persisted(id) = &self.state {
            self.hooks.delete(self.conn, id)?;
            debug!("event=record_delete module=repo status=ok");
        }
        Ok(())
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn connection(&self) -> &'conn dyn RelationalConnection {
        self.conn
    }
}

impl<H: Debug> Debug for Record<'_, H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("state", &self.state)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
