use thiserror::Error;

pub mod audit;
pub mod database;
pub mod group;
pub mod token;
pub mod user;

pub use audit::AuditError;
pub use database::DatabaseError;
pub use group::GroupError;
pub use token::TokenError;
pub use user::UserError;

/// Internal error type for store and service operations
///
/// Hybrid design separates infrastructure errors (shared) from domain errors (store-specific).
/// Not exposed via API - endpoints must convert to ApiError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Group(#[from] GroupError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    /// Whether the underlying database error is a unique constraint violation
    pub fn is_unique_violation(source: &sea_orm::DbErr) -> bool {
        matches!(
            source.sql_err(),
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
        )
    }
}
