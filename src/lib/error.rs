use std::fmt;

pub const DUPLICATE_DATABASE: &str = "42P04";
pub const INVALID_CATALOG_NAME: &str = "3D000";
pub const UNIQUE_VIOLATION: &str = "23505";
pub const DROP_DATABASE_IN_USE: &str = "55006";

/// Stable classification of the failures a create or drop can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DuplicateDatabase,
    InvalidCatalogName,
    UniqueViolation,
    DropDatabaseInUse,
    Unexpected,
}

// SQLSTATE reference: https://www.postgresql.org/docs/current/errcodes-appendix.html
const ERROR_PROTOCOL: &[(&str, ErrorKind, &str)] = &[
    (
        DUPLICATE_DATABASE,
        ErrorKind::DuplicateDatabase,
        "Database already exist.",
    ),
    (
        INVALID_CATALOG_NAME,
        ErrorKind::InvalidCatalogName,
        "Database does not exist.",
    ),
    (
        UNIQUE_VIOLATION,
        ErrorKind::UniqueViolation,
        "Attempt to create multiple databases concurrently.",
    ),
    (
        DROP_DATABASE_IN_USE,
        ErrorKind::DropDatabaseInUse,
        "Cannot delete a database that is being accessed by other users.",
    ),
];

/// Error reported back to callers, carrying the underlying SQLSTATE (or
/// `"unknown"` when the driver had none to report).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
}

impl DbError {
    /// Translate a raw SQLSTATE into a `DbError`. Codes outside the table
    /// keep the underlying message and map to `Unexpected`. Total: every
    /// input produces a `DbError`.
    pub fn from_code(code: Option<&str>, fallback_message: &str) -> DbError {
        let known = code.and_then(|c| ERROR_PROTOCOL.iter().find(|(known, ..)| *known == c));

        match known {
            Some((code, kind, message)) => DbError {
                kind: *kind,
                code: (*code).to_string(),
                message: (*message).to_string(),
            },
            None => DbError {
                kind: ErrorKind::Unexpected,
                code: code.unwrap_or("unknown").to_string(),
                message: fallback_message.to_string(),
            },
        }
    }

    /// Translate a driver error. Server-reported errors carry a SQLSTATE;
    /// anything else (I/O, protocol, pool) has none and maps to `Unexpected`.
    pub fn from_sqlx(err: sqlx::Error) -> DbError {
        match &err {
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DbError::from_code(code.as_deref(), db_err.message())
            }
            other => DbError::from_code(None, &other.to_string()),
        }
    }

    /// Business-rule failure raised by the create path without a server
    /// round-trip. Same code and message the translator would produce.
    pub fn database_already_exists() -> DbError {
        DbError::from_code(Some(DUPLICATE_DATABASE), "")
    }

    /// Business-rule failure raised by the drop path without a server
    /// round-trip.
    pub fn database_does_not_exist() -> DbError {
        DbError::from_code(Some(INVALID_CATALOG_NAME), "")
    }
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for DbError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_maps_every_table_entry() {
        let cases = [
            ("42P04", ErrorKind::DuplicateDatabase, "Database already exist."),
            ("3D000", ErrorKind::InvalidCatalogName, "Database does not exist."),
            (
                "23505",
                ErrorKind::UniqueViolation,
                "Attempt to create multiple databases concurrently.",
            ),
            (
                "55006",
                ErrorKind::DropDatabaseInUse,
                "Cannot delete a database that is being accessed by other users.",
            ),
        ];

        for (code, kind, message) in cases {
            let err = DbError::from_code(Some(code), "ignored");
            assert_eq!(err.kind, kind);
            assert_eq!(err.code, code);
            assert_eq!(err.message, message);
        }
    }

    #[test]
    fn test_from_code_unknown_code_preserves_original() {
        let err = DbError::from_code(Some("42501"), "permission denied to create database");

        assert_eq!(err.kind, ErrorKind::Unexpected);
        assert_eq!(err.code, "42501");
        assert_eq!(err.message, "permission denied to create database");
    }

    #[test]
    fn test_from_code_absent_code_is_unknown() {
        let err = DbError::from_code(None, "connection refused");

        assert_eq!(err.kind, ErrorKind::Unexpected);
        assert_eq!(err.code, "unknown");
        assert_eq!(err.message, "connection refused");
    }

    #[test]
    fn test_from_sqlx_without_server_error() {
        let err = DbError::from_sqlx(sqlx::Error::RowNotFound);

        assert_eq!(err.kind, ErrorKind::Unexpected);
        assert_eq!(err.code, "unknown");
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_direct_constructors_match_table() {
        let exists = DbError::database_already_exists();
        assert_eq!(exists.kind, ErrorKind::DuplicateDatabase);
        assert_eq!(exists.code, "42P04");
        assert_eq!(exists.message, "Database already exist.");

        let missing = DbError::database_does_not_exist();
        assert_eq!(missing.kind, ErrorKind::InvalidCatalogName);
        assert_eq!(missing.code, "3D000");
        assert_eq!(missing.message, "Database does not exist.");
    }

    #[test]
    fn test_display_includes_code() {
        let err = DbError::database_already_exists();
        assert_eq!(err.to_string(), "Database already exist. (42P04)");
    }
}
