use thiserror::Error;

/// Configuration loading and validation failures
#[derive(Error, Debug, PartialEq)]
pub enum ApplicationError {
    #[error("Invalid setting '{setting_name}': {reason}")]
    InvalidSetting { setting_name: String, reason: String },

    #[error("Failed to parse setting '{setting_name}': {error}")]
    ParseError { setting_name: String, error: String },

    #[error("Required setting '{setting_name}' is missing")]
    MissingRequiredSetting { setting_name: String },
}
