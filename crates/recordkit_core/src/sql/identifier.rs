//! Identifier quoting for table and column names.

const IDENTIFIER_DELIMITER: char = '`';

/// Wraps `identifier` in backticks, doubling any embedded backtick.
///
/// No other character is altered or validated; callers pass well-formed
/// names.
///
/// ```
/// use recordkit_core::sql::quote_identifier;
///
/// assert_eq!(quote_identifier("my_table"), "`my_table`");
/// assert_eq!(quote_identifier("a`b"), "`a``b`");
/// ```
pub fn quote_identifier(identifier: &str) -> String {
    let mut quoted = String::with_capacity(identifier.len() + 2);
    quoted.push(IDENTIFIER_DELIMITER);
    for ch in identifier.chars() {
        if ch == IDENTIFIER_DELIMITER {
            quoted.push(IDENTIFIER_DELIMITER);
        }
        quoted.push(ch);
    }
    quoted.push(IDENTIFIER_DELIMITER);
    quoted
}

/// Reverses [`quote_identifier`].
///
/// Returns `None` when `quoted` is not wrapped in backticks or contains an
/// undoubled backtick inside the wrapper.
pub fn unquote_identifier(quoted: &str) -> Option<String> {
    let inner = quoted
        .strip_prefix(IDENTIFIER_DELIMITER)?
        .strip_suffix(IDENTIFIER_DELIMITER)?;

    let mut identifier = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == IDENTIFIER_DELIMITER && chars.next() != Some(IDENTIFIER_DELIMITER) {
            return None;
        }
        identifier.push(ch);
    }
    Some(identifier)
}

#[cfg(test)]
mod tests {
    use super::{quote_identifier, unquote_identifier};

    #[test]
    fn doubles_embedded_backticks() {
        assert_eq!(quote_identifier("a`b"), "`a``b`");
        assert_eq!(quote_identifier("``"), "``````");
        assert_eq!(quote_identifier(""), "``");
    }

    #[test]
    fn leaves_other_quote_characters_alone() {
        assert_eq!(quote_identifier("it's \"x\""), "`it's \"x\"`");
    }

    #[test]
    fn unquote_rejects_malformed_input() {
        assert_eq!(unquote_identifier("plain"), None);
        assert_eq!(unquote_identifier("`a`b`"), None);
        assert_eq!(unquote_identifier("`"), None);
    }
}
