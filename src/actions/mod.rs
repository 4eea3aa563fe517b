//! Command handlers: one module per Directory entity, plus batch fan-out.

use std::sync::Arc;

use thiserror::Error;

use crate::auth::{self, TokenProvider};
use crate::batch::BatchError;
use crate::configuration::{Configuration, ConfigurationError};
use crate::exit_codes::GwadmExitCode;
use crate::format::FormattingError;
use crate::gapi::errors::GapiError;
use crate::gapi::{Params, RetryPolicy, ServiceError};
use crate::model::ModelError;
use crate::service::{self, RestService};

pub mod groups;
pub mod users;

#[derive(Debug, Error)]
pub enum CliActionError {
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    ApiError(#[from] GapiError),

    #[error("{0}")]
    ServiceError(#[from] ServiceError),

    #[error("{0}")]
    FormattingError(#[from] FormattingError),

    #[error("{0}")]
    ConfigurationError(#[from] ConfigurationError),

    #[error("{0}")]
    ModelError(#[from] ModelError),

    #[error("{0}")]
    BatchError(#[from] BatchError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Domain not found: {0}")]
    DomainNotFound(String),
}

impl CliActionError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliActionError::ApiError(e) => e.exit_code(),
            CliActionError::ConfigurationError(_) => GwadmExitCode::ConfigError.code(),
            CliActionError::ServiceError(_) => GwadmExitCode::NetworkError.code(),
            CliActionError::IoError(_) | CliActionError::BatchError(_) => {
                GwadmExitCode::NetworkError.code()
            }
            CliActionError::JsonError(_) | CliActionError::ModelError(_) => {
                GwadmExitCode::InvalidJson.code()
            }
            CliActionError::UserNotFound(_)
            | CliActionError::GroupNotFound(_)
            | CliActionError::DomainNotFound(_) => GwadmExitCode::UsageError.code(),
            CliActionError::FormattingError(_) => GwadmExitCode::UsageError.code(),
        }
    }
}

/// Shared state for one CLI invocation: the authenticated service and the
/// retry policy resolved from configuration.
pub struct Context {
    pub service: RestService,
    pub policy: RetryPolicy,
    pub configuration: Configuration,
}

impl Context {
    pub fn from_configuration(configuration: Configuration) -> Result<Context, CliActionError> {
        let (client_id, client_secret, refresh_token) = configuration.credentials()?;
        let token_url = configuration
            .token_url()
            .unwrap_or(auth::DEFAULT_TOKEN_URL)
            .to_string();
        let auth = Arc::new(TokenProvider::new(
            token_url,
            client_id,
            client_secret,
            refresh_token,
        ));
        let base_url = configuration
            .api_base_url()
            .unwrap_or(service::DEFAULT_DIRECTORY_BASE_URL)
            .to_string();
        let service = RestService::new(base_url, auth)?;
        let policy = configuration.retry_policy();
        Ok(Context {
            service,
            policy,
            configuration,
        })
    }

    /// Listing scope: an explicit domain narrows the listing, otherwise the
    /// whole customer is addressed.
    pub fn scope_params(&self, domain: Option<&str>) -> Params {
        let mut params = Params::new();
        match domain.or_else(|| self.configuration.domain()) {
            Some(domain) => {
                params.insert("domain".to_string(), domain.into());
            }
            None => {
                params.insert(
                    "customer".to_string(),
                    self.configuration.customer_id().into(),
                );
            }
        }
        params
    }
}
