#![allow(dead_code)]

use recordkit_core::{DbError, DbResult, Escapes, Literal, RelationalConnection, Row};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// In-memory connection that records every rendered statement.
///
/// Schema describe and `last_insert_id()` are answered from configuration;
/// other queries pop queued result sets.
pub struct RecordingConnection {
    schema: Vec<String>,
    next_id: Cell<u64>,
    statements: RefCell<Vec<String>>,
    results: RefCell<VecDeque<Vec<Row>>>,
    fail_on: RefCell<Option<String>>,
    closed: Cell<bool>,
}

impl RecordingConnection {
    pub fn new(schema: &[&str]) -> Self {
        Self {
            schema: schema.iter().map(|column| column.to_string()).collect(),
            next_id: Cell::new(42),
            statements: RefCell::new(Vec::new()),
            results: RefCell::new(VecDeque::new()),
            fail_on: RefCell::new(None),
            closed: Cell::new(false),
        }
    }

    pub fn push_result(&self, rows: Vec<Row>) {
        self.results.borrow_mut().push_back(rows);
    }

    /// Makes every statement starting with `prefix` fail.
    pub fn fail_on(&self, prefix: &str) {
        *self.fail_on.borrow_mut() = Some(prefix.to_string());
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }

    pub fn clear(&self) {
        self.statements.borrow_mut().clear();
    }

    fn record(&self, sql: &str, args: &[Literal]) -> DbResult<String> {
        if self.closed.get() {
            return Err(DbError::Closed);
        }
        let rendered = self.render(sql, args)?;
        self.statements.borrow_mut().push(rendered.clone());
        if let Some(prefix) = self.fail_on.borrow().as_deref() {
            if rendered.starts_with(prefix) {
                return Err(DbError::statement(rendered, "injected failure"));
            }
        }
        Ok(rendered)
    }
}

impl RelationalConnection for RecordingConnection {
    fn exec(&self, sql: &str, args: &[Literal]) -> DbResult<u64> {
        self.record(sql, args)?;
        Ok(1)
    }

    fn query_all(&self, sql: &str, args: &[Literal]) -> DbResult<Vec<Row>> {
        let rendered = self.record(sql, args)?;
        if rendered.starts_with("show columns from") {
            return Ok(self
                .schema
                .iter()
                .map(|column| Row::from_pairs([("Field", Some(column.clone()))]))
                .collect());
        }
        if rendered == "select last_insert_id()" {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            return Ok(vec![Row::from_pairs([(
                "last_insert_id()",
                Some(id.to_string()),
            )])]);
        }
        Ok(self.results.borrow_mut().pop_front().unwrap_or_default())
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
        self.closed.set(true);
        Ok(())
    }
}

pub fn row(pairs: &[(&str, Option<&str>)]) -> Row {
    Row::from_pairs(
        pairs
            .iter()
            .map(|(column, value)| (*column, value.map(str::to_string))),
    )
}
