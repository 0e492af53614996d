use thiserror::Error;

/// Failure taxonomy for all feeder and account operations.
///
/// `NotFound` deliberately covers both "record absent" and "record outside
/// the caller's permitted scope" so that scoped lookups never leak the
/// existence of records the caller may not see.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity}")]
    NotFound { entity: &'static str },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl DomainError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
