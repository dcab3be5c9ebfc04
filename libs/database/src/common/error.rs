/// Errors raised by connection and probe helpers
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "sql")]
    #[error("SQL error: {0}")]
    Sql(#[from] sea_orm::DbErr),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
