use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User already exists: {username}")]
    DuplicateUsername { username: String },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    #[error("Invalid username: {reason}")]
    InvalidUsername { reason: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("User account is inactive: {user_id}")]
    Inactive { user_id: String },
}

impl UserError {
    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
