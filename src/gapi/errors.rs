//! Error reasons and error-detail extraction for Google API responses.
//!
//! Google APIs report failures with a machine-readable reason string in the
//! JSON error body, distinct from the numeric HTTP status. This module
//! defines the closed set of reasons the tool understands, the retry/throw
//! groupings used by the call wrapper, and the extraction logic that turns a
//! raw HTTP error response into a classified reason.

use serde_json::Value;
use strum::{Display, EnumString};
use thiserror::Error;

/// The reason why a non-200 HTTP response was returned from a Google API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ErrorReason {
    #[strum(serialize = "aborted")]
    Aborted,
    #[strum(serialize = "authError")]
    AuthError,
    #[strum(serialize = "backendError")]
    BackendError,
    #[strum(serialize = "badGateway")]
    BadGateway,
    #[strum(serialize = "badRequest")]
    BadRequest,
    #[strum(serialize = "conditionNotMet")]
    ConditionNotMet,
    #[strum(serialize = "cyclicMembershipsNotAllowed")]
    CyclicMembershipsNotAllowed,
    #[strum(serialize = "dailyLimitExceeded")]
    DailyLimitExceeded,
    #[strum(serialize = "domainCannotUseApis")]
    DomainCannotUseApis,
    #[strum(serialize = "domainNotFound")]
    DomainNotFound,
    #[strum(serialize = "duplicate")]
    Duplicate,
    #[strum(serialize = "failedPrecondition")]
    FailedPrecondition,
    #[strum(serialize = "forbidden")]
    Forbidden,
    #[strum(serialize = "403")]
    FourOThree,
    #[strum(serialize = "429")]
    FourTwoNine,
    #[strum(serialize = "gatewayTimeout")]
    GatewayTimeout,
    #[strum(serialize = "groupNotFound")]
    GroupNotFound,
    #[strum(serialize = "internalError")]
    InternalError,
    #[strum(serialize = "invalid")]
    Invalid,
    #[strum(serialize = "invalidArgument")]
    InvalidArgument,
    #[strum(serialize = "invalidMember")]
    InvalidMember,
    #[strum(serialize = "memberNotFound")]
    MemberNotFound,
    #[strum(serialize = "notFound")]
    NotFound,
    #[strum(serialize = "notImplemented")]
    NotImplemented,
    #[strum(serialize = "permissionDenied")]
    PermissionDenied,
    #[strum(serialize = "quotaExceeded")]
    QuotaExceeded,
    #[strum(serialize = "rateLimitExceeded")]
    RateLimitExceeded,
    #[strum(serialize = "resourceNotFound")]
    ResourceNotFound,
    #[strum(serialize = "serviceLimit")]
    ServiceLimit,
    #[strum(serialize = "serviceNotAvailable")]
    ServiceNotAvailable,
    #[strum(serialize = "systemError")]
    SystemError,
    #[strum(serialize = "userNotFound")]
    UserNotFound,
    #[strum(serialize = "userRateLimitExceeded")]
    UserRateLimitExceeded,
}

/// Reasons retried with exponential backoff even when the caller asks for
/// nothing special.
pub const DEFAULT_RETRY_REASONS: &[ErrorReason] = &[
    ErrorReason::QuotaExceeded,
    ErrorReason::RateLimitExceeded,
    ErrorReason::UserRateLimitExceeded,
    ErrorReason::BackendError,
    ErrorReason::BadGateway,
    ErrorReason::GatewayTimeout,
    ErrorReason::InternalError,
    ErrorReason::FourTwoNine,
];

pub const GROUP_GET_THROW_REASONS: &[ErrorReason] = &[
    ErrorReason::GroupNotFound,
    ErrorReason::DomainNotFound,
    ErrorReason::DomainCannotUseApis,
    ErrorReason::Forbidden,
    ErrorReason::BadRequest,
];

pub const GROUP_GET_RETRY_REASONS: &[ErrorReason] =
    &[ErrorReason::Invalid, ErrorReason::SystemError];

pub const MEMBERS_THROW_REASONS: &[ErrorReason] = &[
    ErrorReason::GroupNotFound,
    ErrorReason::DomainNotFound,
    ErrorReason::DomainCannotUseApis,
    ErrorReason::Invalid,
    ErrorReason::Forbidden,
];

pub const MEMBERS_RETRY_REASONS: &[ErrorReason] = &[ErrorReason::SystemError];

pub const USER_GET_THROW_REASONS: &[ErrorReason] = &[
    ErrorReason::UserNotFound,
    ErrorReason::DomainNotFound,
    ErrorReason::Forbidden,
    ErrorReason::BadRequest,
    ErrorReason::SystemError,
];

/// OAuth token error strings that indicate an access configuration problem
/// rather than a transient failure.
pub const OAUTH2_TOKEN_ERRORS: &[&str] = &[
    "access_denied",
    "access_denied: Requested client not authorized",
    "internal_failure: Backend Error",
    "internal_failure: None",
    "invalid_grant",
    "invalid_grant: Bad Request",
    "invalid_grant: Invalid email or User ID",
    "invalid_grant: Not a valid email",
    "invalid_grant: Invalid JWT: No valid verifier found for issuer",
    "invalid_request: Invalid impersonation prn email address",
    "unauthorized_client: Client is unauthorized to retrieve access tokens \
     using this method",
    "unauthorized_client: Client is unauthorized to retrieve access tokens \
     using this method, or client not authorized for any of the scopes \
     requested",
    "unauthorized_client: Unauthorized client or scope in request",
];

/// Error emitted by the API call wrapper once retries and classification
/// have run their course.
#[derive(Debug, Error)]
pub enum GapiError {
    /// A reason the caller declared in `throw_reasons`, surfaced for the
    /// caller to match on instead of aborting the process.
    #[error("{status}: {message} - {reason}")]
    Reason {
        reason: ErrorReason,
        status: u16,
        message: String,
    },
    /// Any other API error; the process exits with a code derived from the
    /// HTTP status.
    #[error("{status}: {message} - {reason}")]
    Fatal {
        status: u16,
        reason: String,
        message: String,
    },
    /// The error body was not JSON and matched no known proxy/edge pattern.
    #[error("malformed API error response: {0}")]
    MalformedResponse(String),
    /// The error body was JSON but not shaped like a Google API error.
    #[error("unrecognized API error payload: {0}")]
    UnrecognizedResponse(String),
    /// DNS, connection, or timeout failure that outlived the retry budget.
    #[error("network error: {0}")]
    Network(String),
    /// A token refresh failed with an error string outside the known list.
    #[error("Authentication Token Error - {0}")]
    TokenError(String),
    /// The authorization client is not configured for the requested access.
    #[error("API access denied: please make sure the client is authorized - {0}")]
    ApiAccessDenied(String),
    /// The service is not applicable to the impersonated user.
    #[error("Service not applicable for user {user}")]
    ServiceNotApplicable { user: String },
}

impl GapiError {
    /// The process exit code this error maps to when it reaches `main`.
    pub fn exit_code(&self) -> i32 {
        match self {
            GapiError::Reason { status, .. } => *status as i32,
            GapiError::Fatal { status, .. } => *status as i32,
            GapiError::MalformedResponse(_) => crate::exit_codes::GwadmExitCode::MalformedResponse.code(),
            GapiError::UnrecognizedResponse(_) => crate::exit_codes::GwadmExitCode::NetworkError.code(),
            GapiError::Network(_) => crate::exit_codes::GwadmExitCode::NetworkError.code(),
            GapiError::TokenError(_) => crate::exit_codes::GwadmExitCode::TokenError.code(),
            GapiError::ApiAccessDenied(_) => crate::exit_codes::GwadmExitCode::ApiAccessDenied.code(),
            GapiError::ServiceNotApplicable { .. } => {
                crate::exit_codes::GwadmExitCode::ServiceNotApplicable.code()
            }
        }
    }
}

/// Outcome of classifying one HTTP error response.
#[derive(Debug, PartialEq)]
pub enum ErrorDetail {
    /// Status, reason string, and message extracted from the body. The
    /// reason may fall outside [`ErrorReason`] for APIs this tool has not
    /// cataloged; the call wrapper treats unknown reasons as fatal.
    Known {
        status: u16,
        reason: String,
        message: String,
    },
    /// The body was unusable but the failure looks transient; refresh
    /// credentials and retry the request.
    RetryCredentials,
    /// Non-JSON body with no known pattern; not retryable.
    Unparsed { body: String },
    /// JSON body without the Google error envelope; not retryable.
    Unrecognized { body: String },
}

fn detail(status: u16, reason: ErrorReason, message: &str) -> ErrorDetail {
    ErrorDetail::Known {
        status,
        reason: reason.to_string(),
        message: message.to_string(),
    }
}

/// Extracts the HTTP status, error reason, and message from a non-200 API
/// response body.
///
/// Certain edge proxies return plain-text bodies for quota and gateway
/// failures; those are matched by pattern and mapped onto the equivalent
/// reason. A completely unusable body is treated as a transient edge
/// failure while `retry_on_malformed` holds.
pub fn extract_error_detail(status: u16, body: &str, retry_on_malformed: bool) -> ErrorDetail {
    let error: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => {
            if status == 503 && body == "Quota exceeded for the current request" {
                return detail(status, ErrorReason::QuotaExceeded, body);
            }
            if status == 403 && body.starts_with("Request rate higher than configured") {
                return detail(status, ErrorReason::QuotaExceeded, body);
            }
            if status == 502 && body.contains("Bad Gateway") {
                return detail(status, ErrorReason::BadGateway, body);
            }
            if status == 504 && body.contains("Gateway Timeout") {
                return detail(status, ErrorReason::GatewayTimeout, body);
            }
            if status == 403 && body.contains("Invalid domain.") {
                return detail(403, ErrorReason::NotFound, "Domain not found");
            }
            if status == 400 && body.contains("InvalidSsoSigningKey") {
                return detail(400, ErrorReason::Invalid, "InvalidSsoSigningKey");
            }
            if status == 400 && body.contains("UnknownError") {
                return detail(400, ErrorReason::Invalid, "UnknownError");
            }
            if retry_on_malformed {
                return ErrorDetail::RetryCredentials;
            }
            return ErrorDetail::Unparsed {
                body: body.to_string(),
            };
        }
    };

    let envelope = match error.get("error") {
        Some(e) => e,
        None => {
            // Token endpoints report through error_description instead.
            if error.get("error_description").and_then(Value::as_str) == Some("Invalid Value") {
                return detail(400, ErrorReason::Invalid, "Invalid Value");
            }
            return ErrorDetail::Unrecognized {
                body: error.to_string(),
            };
        }
    };

    let http_status = envelope
        .get("code")
        .and_then(Value::as_u64)
        .map(|c| c as u16)
        .unwrap_or(status);
    let first_error = envelope
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first());
    let message = first_error
        .and_then(|e| e.get("message"))
        .or_else(|| envelope.get("message"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let reason = match first_error.and_then(|e| e.get("reason")).and_then(Value::as_str) {
        Some(reason) => refine_reason(reason, &message),
        None => http_status.to_string(),
    };

    ErrorDetail::Known {
        status: http_status,
        reason,
        message,
    }
}

/// Several Directory API reasons are too coarse to act on; the message
/// names the key that was rejected, which pins down the real reason.
fn refine_reason(reason: &str, message: &str) -> String {
    let refined = match reason {
        "notFound" => {
            if message.contains("userKey") {
                ErrorReason::UserNotFound
            } else if message.contains("groupKey") {
                ErrorReason::GroupNotFound
            } else if message.contains("memberKey") {
                ErrorReason::MemberNotFound
            } else if message.contains("Domain not found") {
                ErrorReason::DomainNotFound
            } else if message.contains("Resource Not Found") {
                ErrorReason::ResourceNotFound
            } else {
                return reason.to_string();
            }
        }
        "invalid" => {
            if message.contains("userId") {
                ErrorReason::UserNotFound
            } else if message.contains("memberKey") {
                ErrorReason::InvalidMember
            } else {
                return reason.to_string();
            }
        }
        "failedPrecondition" => {
            if message.contains("Bad Request") {
                ErrorReason::BadRequest
            } else if message.contains("Mail service not enabled") {
                ErrorReason::ServiceNotAvailable
            } else {
                return reason.to_string();
            }
        }
        "required" => {
            if message.contains("memberKey") {
                ErrorReason::MemberNotFound
            } else {
                return reason.to_string();
            }
        }
        "conditionNotMet" => {
            if message.contains("Cyclic memberships not allowed") {
                ErrorReason::CyclicMembershipsNotAllowed
            } else {
                return reason.to_string();
            }
        }
        _ => return reason.to_string(),
    };
    refined.to_string()
}

/// Decides what a failed token refresh means for the process.
///
/// Known token error strings indicate a configuration problem: either the
/// client has no access at all, or the impersonated user is outside the
/// service's reach. Anything else is a generic token error.
pub fn classify_token_error(message: &str, impersonated_user: Option<&str>) -> GapiError {
    let normalized = message.replace('.', "");
    let known = OAUTH2_TOKEN_ERRORS.contains(&normalized.as_str())
        || message.starts_with("Invalid response");
    if known {
        match impersonated_user {
            Some(user) => GapiError::ServiceNotApplicable {
                user: user.to_string(),
            },
            None => GapiError::ApiAccessDenied(normalized),
        }
    } else {
        GapiError::TokenError(message.to_string())
    }
}
