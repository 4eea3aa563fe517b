//! OAuth2 token acquisition for the Workspace APIs.
//!
//! The tool authenticates with a refresh-token grant: the configured
//! client id/secret and refresh token are exchanged for a short-lived
//! access token, which is cached until a refresh is forced by the call
//! wrapper.

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint rejected the grant. The message is formatted as
    /// `error: description` to line up with the known token error strings.
    #[error("{0}")]
    TokenRejected(String),
    /// The token endpoint could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchanges a refresh token for access tokens and caches the result.
pub struct TokenProvider {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    access_token: RwLock<Option<String>>,
}

impl TokenProvider {
    pub fn new(
        token_url: String,
        client_id: String,
        client_secret: String,
        refresh_token: String,
    ) -> Self {
        TokenProvider {
            http: reqwest::Client::new(),
            token_url,
            client_id,
            client_secret,
            refresh_token,
            access_token: RwLock::new(None),
        }
    }

    /// A provider pre-seeded with a fixed access token. Refresh becomes a
    /// no-op; used by tests and short-lived scripted sessions.
    pub fn with_static_token(token: String) -> Self {
        TokenProvider {
            http: reqwest::Client::new(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            access_token: RwLock::new(Some(token)),
        }
    }

    /// Returns a bearer token, refreshing if none is cached.
    pub async fn bearer(&self) -> Result<String, AuthError> {
        if let Some(token) = self.access_token.read().await.clone() {
            return Ok(token);
        }
        self.refresh().await?;
        Ok(self
            .access_token
            .read()
            .await
            .clone()
            .unwrap_or_default())
    }

    /// Forces a refresh-token grant against the token endpoint.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        if self.refresh_token.is_empty() {
            // Static-token provider; nothing to refresh.
            return Ok(());
        }
        debug!("Refreshing access token from {}", self.token_url);
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("refresh_token", &self.refresh_token),
        ];
        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if status.is_success() {
            let token: TokenResponse = serde_json::from_str(&body)
                .map_err(|e| AuthError::Transport(format!("invalid token response: {e}")))?;
            *self.access_token.write().await = Some(token.access_token);
            debug!("Access token refreshed");
            Ok(())
        } else {
            let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(rejection) => match rejection.error_description {
                    Some(description) => format!("{}: {}", rejection.error, description),
                    None => rejection.error,
                },
                Err(_) => format!("Invalid response from token endpoint: {body}"),
            };
            Err(AuthError::TokenRejected(message))
        }
    }
}
