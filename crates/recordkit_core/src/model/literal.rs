//! Bindable literal values and argument lists.

use std::ops::Deref;

/// One value bound to a `?` placeholder.
///
/// Core only distinguishes text from SQL `NULL`. Numeric inputs are rendered
/// to text at the conversion boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Null,
    Text(String),
}

impl Literal {
    /// Returns the text payload, or `None` for `NULL`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Null => None,
            Self::Text(value) => Some(value.as_str()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Literal {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u64> for Literal {
    fn from(value: u64) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Ordered argument list consumed left to right by a template.
///
/// A bare scalar normalizes to a one-element list and `()` to an empty list,
/// so call sites can pass `"x"`, `vec!["a", "b"]` or `["a", "b"]` directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(Vec<Literal>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<Literal>) {
        self.0.push(value.into());
    }

    pub fn into_vec(self) -> Vec<Literal> {
        self.0
    }
}

impl Deref for Args {
    type Target = [Literal];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<()> for Args {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<Literal> for Args {
    fn from(value: Literal) -> Self {
        Self(vec![value])
    }
}

impl From<&str> for Args {
    fn from(value: &str) -> Self {
        Self(vec![value.into()])
    }
}

impl From<String> for Args {
    fn from(value: String) -> Self {
        Self(vec![value.into()])
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Args {
    fn from(values: Vec<T>) -> Self {
        Self(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Literal>, const N: usize> From<[T; N]> for Args {
    fn from(values: [T; N]) -> Self {
        Self(values.into_iter().map(Into::into).collect())
    }
}

impl From<&[Literal]> for Args {
    fn from(values: &[Literal]) -> Self {
        Self(values.to_vec())
    }
}
