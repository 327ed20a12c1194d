//! Positional placeholder substitution.
//!
//! # Responsibility
//! - Locate quoted literals in a statement with a single pre-pass.
//! - Replace applicable `?` markers with caller-quoted literals.
//!
//! # Invariants
//! - Quoted spans are computed over the whole statement before any
//!   substitution and never overlap.
//! - Arguments are consumed left to right; surplus arguments are ignored.
//! - Characters outside replaced placeholders are preserved verbatim.

use crate::model::literal::{Args, Literal};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PLACEHOLDER: u8 = b'?';
const ESCAPE: u8 = b'\\';
const QUOTE_DELIMITERS: [u8; 3] = [b'\'', b'"', b'`'];

/// Template rejection raised by checked rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateError {
    /// More applicable placeholders than supplied arguments.
    ArgumentCount { placeholders: usize, supplied: usize },
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArgumentCount {
                placeholders,
                supplied,
            } => write!(
                f,
                "statement has {placeholders} placeholder(s) but only {supplied} argument(s) were supplied"
            ),
        }
    }
}

impl Error for TemplateError {}

/// How a quoted literal escapes its own delimiter.
///
/// A doubled delimiter is literal content under every rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Escapes {
    /// `\` also escapes the next character (MySQL).
    #[default]
    Backslash,
    /// `\` is ordinary content (SQLite, standard SQL).
    DoubledOnly,
}

/// Half-open byte range `[start, end)` of a quoted literal, delimiters included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotedSpan {
    pub start: usize,
    pub end: usize,
}

impl QuotedSpan {
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// A parsed statement ready to be rendered against argument lists.
///
/// Parsing is done once; the same template can be rendered repeatedly.
#[derive(Debug, Clone)]
pub struct StatementTemplate<'sql> {
    sql: &'sql str,
    escapes: Escapes,
    spans: Vec<QuotedSpan>,
    placeholders: Vec<usize>,
}

impl<'sql> StatementTemplate<'sql> {
    /// Scans `sql` for quoted spans, then for applicable placeholders.
    ///
    /// Backslash escapes are honoured; see [`StatementTemplate::parse_with`].
    pub fn parse(sql: &'sql str) -> Self {
        Self::parse_with(sql, Escapes::default())
    }

    /// Like [`StatementTemplate::parse`], with an explicit escape rule.
    pub fn parse_with(sql: &'sql str, escapes: Escapes) -> Self {
        let spans = scan_quoted_spans(sql, escapes);
        let placeholders = applicable_placeholders(sql, &spans);
        Self {
            sql,
            escapes,
            spans,
            placeholders,
        }
    }

    pub fn sql(&self) -> &'sql str {
        self.sql
    }

    pub fn escapes(&self) -> Escapes {
        self.escapes
    }

    pub fn quoted_spans(&self) -> &[QuotedSpan] {
        &self.spans
    }

    /// Byte offsets of the `?` markers outside quoted spans, in source order.
    pub fn placeholder_offsets(&self) -> &[usize] {
        &self.placeholders
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }

    /// Renders with lenient semantics: a placeholder with no remaining
    /// argument is emitted verbatim.
    pub fn render<F>(&self, args: &[Literal], mut quote: F) -> String
    where
        F: FnMut(&Literal) -> String,
    {
        let mut rendered = String::with_capacity(self.sql.len());
        let mut copied_up_to = 0;

        for (&offset, arg) in self.placeholders.iter().zip(args) {
            rendered.push_str(&self.sql[copied_up_to..offset]);
            rendered.push_str(&quote(arg));
            copied_up_to = offset + 1;
        }

        rendered.push_str(&self.sql[copied_up_to..]);
        rendered
    }

    /// Renders like [`StatementTemplate::render`] but rejects a statement
    /// whose placeholders outnumber `args`.
    pub fn render_checked<F>(&self, args: &[Literal], quote: F) -> Result<String, TemplateError>
    where
        F: FnMut(&Literal) -> String,
    {
        if self.placeholders.len() > args.len() {
            return Err(TemplateError::ArgumentCount {
                placeholders: self.placeholders.len(),
                supplied: args.len(),
            });
        }
        Ok(self.render(args, quote))
    }
}

/// Parses and renders `sql` in one call (lenient).
pub fn render<A, F>(sql: &str, args: A, quote: F) -> String
where
    A: Into<Args>,
    F: FnMut(&Literal) -> String,
{
    StatementTemplate::parse(sql).render(&args.into(), quote)
}

/// Parses and renders `sql` in one call, rejecting missing arguments.
pub fn render_checked<A, F>(sql: &str, args: A, quote: F) -> Result<String, TemplateError>
where
    A: Into<Args>,
    F: FnMut(&Literal) -> String,
{
    StatementTemplate::parse(sql).render_checked(&args.into(), quote)
}

fn scan_quoted_spans(sql: &str, escapes: Escapes) -> Vec<QuotedSpan> {
    // Byte scanning is UTF-8 safe here: every byte compared is ASCII and never
    // appears inside a multi-byte sequence.
    let bytes = sql.as_bytes();
    let mut spans = Vec::new();
    let mut index = 0;

    while index < bytes.len() {
        let delimiter = bytes[index];
        if !QUOTE_DELIMITERS.contains(&delimiter) {
            index += 1;
            continue;
        }

        let start = index;
        let mut end = bytes.len();
        index += 1;
        while index < bytes.len() {
            match bytes[index] {
                ESCAPE if escapes == Escapes::Backslash => index += 2,
                byte if byte == delimiter => {
                    if bytes.get(index + 1) == Some(&delimiter) {
                        index += 2;
                    } else {
                        end = index + 1;
                        break;
                    }
                }
                _ => index += 1,
            }
        }

        // Unterminated literals run to the end of the statement.
        spans.push(QuotedSpan { start, end });
        index = end;
    }

    spans
}

fn applicable_placeholders(sql: &str, spans: &[QuotedSpan]) -> Vec<usize> {
    let mut spans = spans.iter().peekable();
    let mut offsets = Vec::new();

    for (offset, byte) in sql.bytes().enumerate() {
        if byte != PLACEHOLDER {
            continue;
        }
        while spans.next_if(|span| span.end <= offset).is_some() {}
        if spans.peek().is_some_and(|span| span.contains(offset)) {
            continue;
        }
        offsets.push(offset);
    }

    offsets
}
