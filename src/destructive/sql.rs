//! SQL destructive statement checks
//!
//! Textual pattern matching applied to any string-valued parameter; a
//! `DELETE` or `UPDATE` is only dangerous when no `WHERE` clause bounds it.

use crate::config::Severity;
use crate::destructive::{DestructiveCategory, DestructiveMatch};

use once_cell::sync::Lazy;
use regex::Regex;

static DROP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bDROP\s+(?:TABLE|DATABASE|SCHEMA|INDEX|VIEW)\b").unwrap());

static TRUNCATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bTRUNCATE\s+(?:TABLE\s+)?\w+").unwrap());

static DELETE_FROM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bDELETE\s+FROM\s+\S+").unwrap());

static UPDATE_SET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bUPDATE\s+\S+\s+SET\b").unwrap());

static WHERE_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bWHERE\b").unwrap());

static ALTER_DROP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bALTER\s+(?:TABLE|DATABASE)\s+[^;]*\bDROP\b").unwrap());

/// Classify SQL hazards in a text buffer.
pub fn check_sql(text: &str) -> Option<DestructiveMatch> {
    if DROP.is_match(text) {
        return Some(DestructiveMatch::new(
            DestructiveCategory::SqlDestructive,
            Severity::Critical,
            "DROP",
            "DROP statement destroys schema objects",
        ));
    }

    if TRUNCATE.is_match(text) {
        return Some(DestructiveMatch::new(
            DestructiveCategory::SqlDestructive,
            Severity::Critical,
            "TRUNCATE",
            "TRUNCATE removes all rows",
        ));
    }

    let has_where = WHERE_CLAUSE.is_match(text);

    if DELETE_FROM.is_match(text) && !has_where {
        return Some(DestructiveMatch::new(
            DestructiveCategory::SqlDestructive,
            Severity::Critical,
            "DELETE without WHERE",
            "Unbounded DELETE removes every row",
        ));
    }

    if UPDATE_SET.is_match(text) && !has_where {
        return Some(DestructiveMatch::new(
            DestructiveCategory::SqlDestructive,
            Severity::High,
            "UPDATE without WHERE",
            "Unbounded UPDATE rewrites every row",
        ));
    }

    if ALTER_DROP.is_match(text) {
        return Some(DestructiveMatch::new(
            DestructiveCategory::SqlDestructive,
            Severity::High,
            "ALTER ... DROP",
            "ALTER drops a column or constraint",
        ));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_and_truncate_critical() {
        let m = check_sql("DROP TABLE users;").unwrap();
        assert_eq!(m.severity, Severity::Critical);

        let m = check_sql("drop database prod").unwrap();
        assert_eq!(m.severity, Severity::Critical);

        let m = check_sql("TRUNCATE TABLE orders").unwrap();
        assert_eq!(m.severity, Severity::Critical);

        let m = check_sql("truncate sessions").unwrap();
        assert_eq!(m.severity, Severity::Critical);
    }

    #[test]
    fn test_delete_without_where() {
        let m = check_sql("DELETE FROM users").unwrap();
        assert_eq!(m.severity, Severity::Critical);
        assert_eq!(m.pattern, "DELETE without WHERE");
    }

    #[test]
    fn test_delete_with_where_ok() {
        assert!(check_sql("DELETE FROM users WHERE id = 42").is_none());
    }

    #[test]
    fn test_update_without_where() {
        let m = check_sql("UPDATE users SET active = false").unwrap();
        assert_eq!(m.severity, Severity::High);
    }

    #[test]
    fn test_update_with_where_ok() {
        assert!(check_sql("UPDATE users SET active = false WHERE id = 42").is_none());
    }

    #[test]
    fn test_alter_drop() {
        let m = check_sql("ALTER TABLE users DROP COLUMN email").unwrap();
        assert_eq!(m.severity, Severity::High);
    }

    #[test]
    fn test_benign_sql() {
        assert!(check_sql("SELECT * FROM users WHERE id = 1").is_none());
        assert!(check_sql("INSERT INTO logs (msg) VALUES ('hi')").is_none());
        assert!(check_sql("plain text mentioning update procedures").is_none());
    }
}
