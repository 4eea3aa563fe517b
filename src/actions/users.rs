//! User listing and info handlers.

use serde_json::Value;
use tracing::debug;

use crate::actions::{CliActionError, Context};
use crate::format::{format_value, OutputFormat};
use crate::gapi::errors::{ErrorReason, GapiError, USER_GET_THROW_REASONS};
use crate::gapi::{self, got_total_items_msg, CallOptions, PageOptions};
use crate::model::{from_values, User};

/// Lists users for the customer or a domain, walking every page.
pub async fn list_users(
    context: &Context,
    domain: Option<&str>,
    query: Option<&str>,
    max_results: Option<u32>,
    format: &OutputFormat,
) -> Result<(), CliActionError> {
    let mut params = context.scope_params(domain);
    params.insert("orderBy".to_string(), "email".into());
    if let Some(query) = query {
        params.insert("query".to_string(), query.into());
    }
    if let Some(max_results) = max_results {
        params.insert("maxResults".to_string(), max_results.into());
    }

    let page_options = PageOptions::with_message(
        got_total_items_msg("Users", "..."),
        Some("primaryEmail"),
    );
    let items = gapi::get_all_pages(
        &context.service,
        &context.policy,
        "users.list",
        "users",
        &page_options,
        &CallOptions::default(),
        params,
    )
    .await?;
    debug!("retrieved {} users", items.len());

    let users = from_values(items, User::from_value)?;
    println!("{}", format_value(&users, format)?);
    Ok(())
}

/// Shows one user. Lookup misses surface as friendly errors instead of a
/// fatal API error.
pub async fn user_info(
    context: &Context,
    email: &str,
    format: &OutputFormat,
) -> Result<(), CliActionError> {
    let mut params = serde_json::Map::new();
    params.insert("userKey".to_string(), Value::String(email.to_string()));
    params.insert("projection".to_string(), "full".into());

    let options = CallOptions::throwing(USER_GET_THROW_REASONS);
    let response = gapi::call(
        &context.service,
        &context.policy,
        "users.get",
        &options,
        params,
    )
    .await
    .map_err(|e| match e {
        GapiError::Reason {
            reason: ErrorReason::UserNotFound,
            ..
        } => CliActionError::UserNotFound(email.to_string()),
        GapiError::Reason {
            reason: ErrorReason::DomainNotFound,
            ..
        } => CliActionError::DomainNotFound(email.to_string()),
        other => CliActionError::ApiError(other),
    })?;

    if let Some(response) = response {
        let user = User::from_value(response)?;
        println!("{}", format_value(&user, format)?);
    }
    Ok(())
}
