//! Title search helpers.

use crate::error::CoreError;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: i64 = 50;

/// Maximum number of search results.
pub const MAX_SEARCH_LIMIT: i64 = 500;

/// Maximum length for a search term.
pub const MAX_SEARCH_TERM_LEN: usize = 200;

/// Validate a title search term: non-blank and within length limits.
pub fn validate_search_term(term: &str) -> Result<(), CoreError> {
    if term.trim().is_empty() {
        return Err(CoreError::Validation(
            "Search term must not be empty".to_string(),
        ));
    }
    if term.chars().count() > MAX_SEARCH_TERM_LEN {
        return Err(CoreError::Validation(format!(
            "Search term exceeds maximum length of {MAX_SEARCH_TERM_LEN} characters"
        )));
    }
    Ok(())
}

/// Build an `ILIKE` pattern that matches `term` as a literal substring.
///
/// `%`, `_` and the escape character `\` are escaped so user input never
/// acts as a wildcard.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Clamp a requested result limit into `1..=MAX_SEARCH_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT)
}
