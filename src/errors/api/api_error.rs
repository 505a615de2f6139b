use crate::errors::internal::{GroupError, InternalError, TokenError, UserError};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

/// Errors returned by every API endpoint
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Request failed validation
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Missing, invalid or expired bearer token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Caller lacks the required access flags
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Resource not found
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Resource conflicts with an existing one
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    })
}

impl ApiError {
    pub fn bad_request(error: &str, message: impl Into<String>) -> Self {
        ApiError::BadRequest(body(error, message, 400))
    }

    pub fn invalid_token() -> Self {
        ApiError::Unauthorized(body("invalid_token", "Invalid or malformed token", 401))
    }

    pub fn expired_token() -> Self {
        ApiError::Unauthorized(body("expired_token", "Token has expired", 401))
    }

    pub fn inactive_account() -> Self {
        ApiError::Forbidden(body("inactive_account", "Account is not active", 403))
    }

    pub fn superuser_required() -> Self {
        ApiError::Forbidden(body("superuser_required", "Superuser status required", 403))
    }

    pub fn user_not_found(user_id: &str) -> Self {
        ApiError::NotFound(body("user_not_found", format!("User not found: {}", user_id), 404))
    }

    pub fn group_not_found(group_id: i32) -> Self {
        ApiError::NotFound(body("group_not_found", format!("Group not found: {}", group_id), 404))
    }

    pub fn conflict(error: &str, message: impl Into<String>) -> Self {
        ApiError::Conflict(body(error, message, 409))
    }

    /// Generic internal error that never exposes internal details
    fn internal_server_error() -> Self {
        ApiError::InternalError(body("internal_error", "An internal error occurred", 500))
    }

    /// Convert InternalError to ApiError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Infrastructure details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match err {
            InternalError::Token(TokenError::Expired) => Self::expired_token(),
            InternalError::Token(TokenError::Invalid { reason }) => {
                tracing::debug!("Rejected bearer token: {}", reason);
                Self::invalid_token()
            }

            InternalError::User(UserError::UserNotFound { user_id }) => Self::user_not_found(&user_id),
            InternalError::User(UserError::Inactive { .. }) => Self::inactive_account(),
            InternalError::User(UserError::DuplicateUsername { username }) => {
                Self::conflict("duplicate_username", format!("User already exists: {}", username))
            }
            InternalError::User(e @ UserError::InvalidUsername { .. })
            | InternalError::User(e @ UserError::InvalidField { .. }) => {
                Self::bad_request("invalid_input", e.to_string())
            }

            InternalError::Group(GroupError::GroupNotFound { group_id }) => Self::group_not_found(group_id),
            InternalError::Group(GroupError::DuplicateName { name }) => {
                Self::conflict("duplicate_group", format!("Group already exists: {}", name))
            }
            InternalError::Group(e @ GroupError::Invalid { .. }) => {
                Self::bad_request("invalid_input", e.to_string())
            }
            InternalError::Group(e @ GroupError::NotAMember { .. }) => {
                ApiError::NotFound(body("membership_not_found", e.to_string(), 404))
            }

            err @ (InternalError::Database(_) | InternalError::Audit(_)) => {
                tracing::error!("Internal error: {}", err);
                Self::internal_server_error()
            }
        }
    }

    fn response(&self) -> &ErrorResponse {
        match self {
            ApiError::BadRequest(json)
            | ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::Conflict(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
