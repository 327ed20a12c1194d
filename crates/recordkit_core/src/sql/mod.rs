//! SQL text generation primitives.
//!
//! # Responsibility
//! - Quote bare identifiers for generated statements.
//! - Resolve positional `?` placeholders into literal SQL.
//!
//! # Invariants
//! - Identifier quoting doubles embedded delimiters and never strips them.
//! - A `?` inside a quoted literal is never treated as a placeholder.

pub mod identifier;
pub mod template;

pub use identifier::{quote_identifier, unquote_identifier};
pub use template::{render, render_checked, Escapes, QuotedSpan, StatementTemplate, TemplateError};
