mod config;
mod error;
mod management;

pub use config::{ConnectionOptions, ConnectionTarget};
pub use error::{DbError, ErrorKind};
pub use management::{CreateDatabase, DropDatabase};

/// Create a database on the server described by `target`, connecting through
/// the target's initial database.
///
/// By default an already existing database is treated as success, so the call
/// is safe to run unconditionally. Set `error_if_exist` to fail with
/// `ErrorKind::DuplicateDatabase` instead.
pub async fn create_database(
    request: CreateDatabase,
    target: ConnectionTarget,
) -> Result<(), DbError> {
    management::create(&request, &target).await
}

/// Drop a database on the server described by `target`, connecting through
/// the target's initial database.
///
/// By default a missing database is treated as success and other sessions
/// connected to the database are terminated before the drop. Set
/// `error_if_non_exist` to fail with `ErrorKind::InvalidCatalogName`, and
/// `drop_connections` to false to leave other sessions alone (the drop then
/// fails with `ErrorKind::DropDatabaseInUse` if any remain).
pub async fn drop_database(request: DropDatabase, target: ConnectionTarget) -> Result<(), DbError> {
    management::drop(&request, &target).await
}
