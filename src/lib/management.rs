use crate::config::ConnectionTarget;
use crate::error::DbError;
use log::{info, warn};
use sqlx::{Connection, PgConnection, Row};

/// Request to create a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDatabase {
    pub database_name: String,
    /// When true, fail with DuplicateDatabase instead of treating an
    /// already existing database as success.
    pub error_if_exist: bool,
}

impl CreateDatabase {
    pub fn new(database_name: &str) -> CreateDatabase {
        CreateDatabase {
            database_name: database_name.to_string(),
            error_if_exist: false,
        }
    }
}

/// Request to drop a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropDatabase {
    pub database_name: String,
    /// When true, fail with InvalidCatalogName instead of treating a missing
    /// database as success.
    pub error_if_non_exist: bool,
    /// Terminate other sessions connected to the database before dropping
    /// it. Without this, any open session makes the drop fail (55006).
    pub drop_connections: bool,
}

impl DropDatabase {
    pub fn new(database_name: &str) -> DropDatabase {
        DropDatabase {
            database_name: database_name.to_string(),
            error_if_non_exist: false,
            drop_connections: true,
        }
    }
}

/// Create `request.database_name` on the target server, connecting through
/// the target's initial database. Creating a database that already exists is
/// a no-op unless the request says otherwise.
pub async fn create(request: &CreateDatabase, target: &ConnectionTarget) -> Result<(), DbError> {
    let mut conn = PgConnection::connect_with(&target.connect_options())
        .await
        .map_err(DbError::from_sqlx)?;

    let result = run_create(&mut conn, request).await;
    close(conn).await;

    result
}

/// Drop `request.database_name` on the target server, connecting through the
/// target's initial database. Dropping a database that does not exist is a
/// no-op unless the request says otherwise.
pub async fn drop(request: &DropDatabase, target: &ConnectionTarget) -> Result<(), DbError> {
    let mut conn = PgConnection::connect_with(&target.connect_options())
        .await
        .map_err(DbError::from_sqlx)?;

    let result = run_drop(&mut conn, request).await;
    close(conn).await;

    result
}

async fn run_create(conn: &mut PgConnection, request: &CreateDatabase) -> Result<(), DbError> {
    if database_exists(conn, &request.database_name).await? {
        if request.error_if_exist {
            return Err(DbError::database_already_exists());
        }

        info!("Database '{}' already exists", request.database_name);
        return Ok(());
    }

    let query = format!("CREATE DATABASE {}", quote_ident(&request.database_name));
    sqlx::query(query.as_str())
        .execute(&mut *conn)
        .await
        .map_err(DbError::from_sqlx)?;

    Ok(())
}

async fn run_drop(conn: &mut PgConnection, request: &DropDatabase) -> Result<(), DbError> {
    if !database_exists(conn, &request.database_name).await? {
        if request.error_if_non_exist {
            return Err(DbError::database_does_not_exist());
        }

        info!("Database '{}' does not exist", request.database_name);
        return Ok(());
    }

    if request.drop_connections {
        terminate_connections(conn, &request.database_name).await?;
    }

    let query = format!("DROP DATABASE {}", quote_ident(&request.database_name));
    sqlx::query(query.as_str())
        .execute(&mut *conn)
        .await
        .map_err(DbError::from_sqlx)?;

    Ok(())
}

/// Case-insensitive existence check against the system catalog. The name is
/// bound as a parameter, never interpolated.
async fn database_exists(conn: &mut PgConnection, database_name: &str) -> Result<bool, DbError> {
    let row = sqlx::query(
        "SELECT EXISTS(
            SELECT 1 FROM pg_catalog.pg_database WHERE lower(datname) = lower($1)
        ) AS found",
    )
    .bind(database_name)
    .fetch_one(&mut *conn)
    .await
    .map_err(DbError::from_sqlx)?;

    Ok(row.get::<bool, _>("found"))
}

/// Terminate every backend attached to the database, except the session
/// running this statement. Best effort: nothing stops a new connection from
/// racing in afterwards, in which case the drop itself reports 55006.
async fn terminate_connections(conn: &mut PgConnection, database_name: &str) -> Result<(), DbError> {
    sqlx::query(
        "SELECT pg_terminate_backend(pg_stat_activity.pid)
         FROM pg_stat_activity
         WHERE pg_stat_activity.datname = $1 AND pid <> pg_backend_pid()",
    )
    .bind(database_name)
    .execute(&mut *conn)
    .await
    .map_err(DbError::from_sqlx)?;

    Ok(())
}

// The session is released on every exit path, including the no-op
// short-circuits and mid-sequence driver errors.
async fn close(conn: PgConnection) {
    if let Err(err) = conn.close().await {
        warn!("Failed to close connection cleanly: {}", err);
    }
}

/// CREATE/DROP DATABASE cannot take the name as a bound parameter, so it is
/// quoted as an identifier. Embedded double quotes are doubled so the name
/// cannot break out of the quoting.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request = CreateDatabase::new("bank-db");

        assert_eq!(request.database_name, "bank-db");
        assert!(!request.error_if_exist);
    }

    #[test]
    fn test_drop_request_defaults() {
        let request = DropDatabase::new("bank-db");

        assert_eq!(request.database_name, "bank-db");
        assert!(!request.error_if_non_exist);
        assert!(request.drop_connections);
    }

    #[test]
    fn test_quote_ident_plain_name() {
        assert_eq!(quote_ident("bank-db"), "\"bank-db\"");
    }

    #[test]
    fn test_quote_ident_preserves_case() {
        assert_eq!(quote_ident("BankDB"), "\"BankDB\"");
    }

    #[test]
    fn test_quote_ident_doubles_embedded_quotes() {
        assert_eq!(quote_ident("bank\"db"), "\"bank\"\"db\"");
    }

    #[test]
    fn test_quote_ident_cannot_break_out() {
        // A name crafted to close the identifier and smuggle a statement
        // stays inside one quoted identifier.
        let quoted = quote_ident("x\"; DROP DATABASE postgres; --");
        assert_eq!(quoted, "\"x\"\"; DROP DATABASE postgres; --\"");
    }
}
