use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Token is invalid: {reason}")]
    Invalid { reason: String },
}
