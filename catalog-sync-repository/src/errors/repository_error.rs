use thiserror::Error;

/// Represents errors that can occur within the PostgreSQL-backed stores.
///
/// This enum consolidates database failures, migration failures and rows
/// that cannot be turned into domain values.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid row for product {id}: {reason}")]
    InvalidRow { id: i64, reason: String },
}
