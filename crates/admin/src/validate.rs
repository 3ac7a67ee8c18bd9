//! Input validation for admin operations.
//!
//! Everything arriving from the admin UI is a string; these helpers turn
//! strings into typed values or reject them before any query runs.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::AdminError;

/// Hard cap applied to every list query.
pub const MAX_LIST_ROWS: i64 = 1000;

/// Longest search string passed through to a query.
const MAX_SEARCH_LEN: usize = 100;

/// Parse a typed value (ID or status enum) from raw admin input.
///
/// # Errors
///
/// Returns `AdminError::Validation` naming the rejected value.
pub fn parse_input<T>(raw: &str) -> Result<T, AdminError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AdminError::Validation(format!("'{raw}': {e}")))
}

/// Sanitize a free-text search term: trim, strip angle brackets, and cap
/// the length. Returns `None` when nothing searchable remains.
#[must_use]
pub fn sanitize_search(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(MAX_SEARCH_LEN)
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// SQL LIKE pattern for a case-insensitive substring match, with the
/// pattern metacharacters in the user's term escaped.
#[must_use]
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tinta_core::{OrderStatus, ProductId};

    use super::*;

    #[test]
    fn test_parse_input_accepts_uuid() {
        let id: ProductId = parse_input("6d2f1c3a-8b7e-4f5d-9a1b-2c3d4e5f6a7b").unwrap();
        assert_eq!(id.to_string(), "6d2f1c3a-8b7e-4f5d-9a1b-2c3d4e5f6a7b");
    }

    #[test]
    fn test_parse_input_rejects_malformed_uuid() {
        let result: Result<ProductId, _> = parse_input("not-a-uuid");
        assert!(matches!(result, Err(AdminError::Validation(_))));
    }

    #[test]
    fn test_parse_input_rejects_unhyphenated_uuid() {
        // Only the canonical hyphenated form counts as an ID.
        let result: Result<ProductId, _> = parse_input("6d2f1c3a8b7e4f5d9a1b2c3d4e5f6a7b");
        assert!(matches!(result, Err(AdminError::Validation(_))));
    }

    #[test]
    fn test_parse_input_rejects_unknown_status() {
        let result: Result<OrderStatus, _> = parse_input("refunded");
        assert!(matches!(result, Err(AdminError::Validation(_))));
    }

    #[test]
    fn test_sanitize_strips_angle_brackets() {
        assert_eq!(
            sanitize_search("<script>alert(1)</script>").unwrap(),
            "scriptalert(1)/script"
        );
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "a".repeat(500);
        assert_eq!(sanitize_search(&long).unwrap().len(), 100);
    }

    #[test]
    fn test_sanitize_empty_becomes_none() {
        assert!(sanitize_search("   ").is_none());
        assert!(sanitize_search("<>").is_none());
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
