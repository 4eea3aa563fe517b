//! The reqwest-backed Directory API service.
//!
//! A thin registry maps method names (`users.list`, `groups.get`, ...) to
//! an HTTP verb and path template. Request parameters bind `{placeholder}`
//! segments in the path, the reserved `body` parameter becomes the JSON
//! request body, and everything else is sent as a query parameter. The
//! retry wrapper in [`crate::gapi`] never sees HTTP types; it works against
//! the [`Service`] trait this module implements.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, trace};

use crate::auth::{AuthError, TokenProvider};
use crate::gapi::{Params, Service, ServiceError};

pub const DEFAULT_DIRECTORY_BASE_URL: &str = "https://admin.googleapis.com/admin/directory/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

fn endpoint(method: &str) -> Option<(Method, &'static str)> {
    match method {
        "users.list" => Some((Method::GET, "/users")),
        "users.get" => Some((Method::GET, "/users/{userKey}")),
        "users.insert" => Some((Method::POST, "/users")),
        "users.update" => Some((Method::PUT, "/users/{userKey}")),
        "users.delete" => Some((Method::DELETE, "/users/{userKey}")),
        "groups.list" => Some((Method::GET, "/groups")),
        "groups.get" => Some((Method::GET, "/groups/{groupKey}")),
        "groups.insert" => Some((Method::POST, "/groups")),
        "groups.delete" => Some((Method::DELETE, "/groups/{groupKey}")),
        "members.list" => Some((Method::GET, "/groups/{groupKey}/members")),
        "members.get" => Some((Method::GET, "/groups/{groupKey}/members/{memberKey}")),
        "members.insert" => Some((Method::POST, "/groups/{groupKey}/members")),
        "members.delete" => Some((Method::DELETE, "/groups/{groupKey}/members/{memberKey}")),
        _ => None,
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Directory API client implementing the [`Service`] seam.
pub struct RestService {
    http: Client,
    base_url: String,
    auth: Arc<TokenProvider>,
    impersonated_user: Option<String>,
}

impl RestService {
    pub fn new(base_url: String, auth: Arc<TokenProvider>) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("gwadm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        Ok(RestService {
            http,
            base_url,
            auth,
            impersonated_user: None,
        })
    }

    pub fn with_impersonated_user(mut self, user: Option<String>) -> Self {
        self.impersonated_user = user;
        self
    }

    fn resolve(&self, template: &str, params: &Params) -> Result<(String, Params), ServiceError> {
        let mut path = template.to_string();
        let mut remaining = Params::new();
        for (key, value) in params {
            let placeholder = format!("{{{key}}}");
            if path.contains(&placeholder) {
                path = path.replace(&placeholder, &query_value(value));
            } else {
                remaining.insert(key.clone(), value.clone());
            }
        }
        if path.contains('{') {
            return Err(ServiceError::Transport(format!(
                "unbound path parameter in {path}"
            )));
        }
        Ok((format!("{}{}", self.base_url, path), remaining))
    }
}

#[async_trait]
impl Service for RestService {
    async fn execute(&self, method: &str, params: &Params) -> Result<Value, ServiceError> {
        let (verb, template) =
            endpoint(method).ok_or_else(|| ServiceError::UnknownMethod(method.to_string()))?;
        let (url, mut remaining) = self.resolve(template, params)?;
        let body = remaining.remove("body");

        let token = self.auth.bearer().await.map_err(|e| match e {
            AuthError::TokenRejected(message) => ServiceError::Auth(message),
            AuthError::Transport(message) => ServiceError::Transport(message),
        })?;

        let query: Vec<(String, String)> = remaining
            .iter()
            .map(|(k, v)| (k.clone(), query_value(v)))
            .collect();

        debug!("{} {}", verb, url);
        let mut request = self
            .http
            .request(verb, &url)
            .bearer_auth(token)
            .query(&query);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        trace!("response {}: {}", status, text);

        if status.is_success() {
            if text.is_empty() || status == StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }
            serde_json::from_str(&text)
                .map_err(|e| ServiceError::Transport(format!("invalid JSON in response: {e}")))
        } else {
            Err(ServiceError::Status {
                status: status.as_u16(),
                body: text,
            })
        }
    }

    async fn refresh_credentials(&self) -> Result<(), ServiceError> {
        self.auth.refresh().await.map_err(|e| match e {
            AuthError::TokenRejected(message) => ServiceError::Auth(message),
            AuthError::Transport(message) => ServiceError::Transport(message),
        })
    }

    fn impersonated_user(&self) -> Option<String> {
        self.impersonated_user.clone()
    }
}
