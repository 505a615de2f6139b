/// Entry point an operation was started from; recorded on every audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    /// HTTP API request by an authenticated user
    API,

    /// Administrative command line
    CLI,

    /// Internal operation such as provisioning a user from token claims
    System,
}

impl RequestSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::API => "api",
            Self::CLI => "cli",
            Self::System => "system",
        }
    }
}
