//! Process exit codes for the gwadm application.
//!
//! The numeric values are part of the tool's scripting contract: batch
//! wrappers key on them to distinguish usage mistakes from network
//! failures and access configuration problems. Fatal API errors exit with
//! the HTTP status itself and are not represented here.

/// Exit codes for gwadm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GwadmExitCode {
    /// Command completed successfully
    Success = 0,

    /// Command line usage error
    UsageError = 2,

    /// Network, transport, or unexpected API payload error
    NetworkError = 4,

    /// The API returned a response body that could not be parsed
    MalformedResponse = 5,

    /// The authorization client is not configured for the requested access
    ApiAccessDenied = 12,

    /// A data file that was expected to contain JSON did not
    InvalidJson = 17,

    /// Token acquisition or refresh failed
    TokenError = 18,

    /// The service is not applicable to the impersonated user
    ServiceNotApplicable = 19,

    /// Configuration file could not be loaded or written
    ConfigError = 78,
}

impl GwadmExitCode {
    /// Convert to numeric exit code
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Get descriptive message for the exit code
    pub fn message(&self) -> &'static str {
        match self {
            GwadmExitCode::Success => "Success",
            GwadmExitCode::UsageError => "Command line usage error",
            GwadmExitCode::NetworkError => "Network communication error",
            GwadmExitCode::MalformedResponse => "Malformed API response",
            GwadmExitCode::ApiAccessDenied => "API access denied",
            GwadmExitCode::InvalidJson => "Invalid JSON content",
            GwadmExitCode::TokenError => "Authentication token error",
            GwadmExitCode::ServiceNotApplicable => "Service not applicable to user",
            GwadmExitCode::ConfigError => "Configuration error",
        }
    }
}

impl From<GwadmExitCode> for i32 {
    fn from(code: GwadmExitCode) -> Self {
        code.code()
    }
}
