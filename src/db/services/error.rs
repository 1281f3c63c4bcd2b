use sea_orm::DbErr;

/// Failure of a harem/prospect operation.
///
/// Validation and ownership failures are always raised before anything is
/// written, so receiving one of them means the store is untouched.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
}
