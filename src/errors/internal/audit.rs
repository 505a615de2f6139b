use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to serialize audit event data: {0}")]
    Serialization(String),
}
