//! Group and membership handlers.

use serde_json::Value;
use tracing::debug;

use crate::actions::{CliActionError, Context};
use crate::format::{format_value, OutputFormat};
use crate::gapi::errors::{
    ErrorReason, GapiError, GROUP_GET_RETRY_REASONS, GROUP_GET_THROW_REASONS,
    MEMBERS_RETRY_REASONS, MEMBERS_THROW_REASONS,
};
use crate::gapi::{self, got_total_items_msg, CallOptions, PageOptions};
use crate::model::{from_values, Group, Member};

fn group_lookup_error(group: &str) -> impl Fn(GapiError) -> CliActionError + '_ {
    move |e| match e {
        GapiError::Reason {
            reason: ErrorReason::GroupNotFound,
            ..
        } => CliActionError::GroupNotFound(group.to_string()),
        GapiError::Reason {
            reason: ErrorReason::DomainNotFound,
            ..
        } => CliActionError::DomainNotFound(group.to_string()),
        other => CliActionError::ApiError(other),
    }
}

/// Lists groups for the customer or a domain, walking every page.
pub async fn list_groups(
    context: &Context,
    domain: Option<&str>,
    format: &OutputFormat,
) -> Result<(), CliActionError> {
    let params = context.scope_params(domain);
    let page_options =
        PageOptions::with_message(got_total_items_msg("Groups", "..."), Some("email"));
    let items = gapi::get_all_pages(
        &context.service,
        &context.policy,
        "groups.list",
        "groups",
        &page_options,
        &CallOptions::default(),
        params,
    )
    .await?;
    debug!("retrieved {} groups", items.len());

    let groups = from_values(items, Group::from_value)?;
    println!("{}", format_value(&groups, format)?);
    Ok(())
}

/// Shows one group.
pub async fn group_info(
    context: &Context,
    group: &str,
    format: &OutputFormat,
) -> Result<(), CliActionError> {
    let mut params = serde_json::Map::new();
    params.insert("groupKey".to_string(), Value::String(group.to_string()));

    let options = CallOptions::throwing(GROUP_GET_THROW_REASONS)
        .with_retry_reasons(GROUP_GET_RETRY_REASONS);
    let response = gapi::call(
        &context.service,
        &context.policy,
        "groups.get",
        &options,
        params,
    )
    .await
    .map_err(group_lookup_error(group))?;

    if let Some(response) = response {
        let group = Group::from_value(response)?;
        println!("{}", format_value(&group, format)?);
    }
    Ok(())
}

/// Lists the members of a group, optionally restricted to a role set
/// (`OWNER,MANAGER,MEMBER`).
pub async fn list_members(
    context: &Context,
    group: &str,
    roles: Option<&str>,
    format: &OutputFormat,
) -> Result<(), CliActionError> {
    let mut params = serde_json::Map::new();
    params.insert("groupKey".to_string(), Value::String(group.to_string()));
    if let Some(roles) = roles {
        params.insert("roles".to_string(), roles.to_uppercase().into());
    }

    let options =
        CallOptions::throwing(MEMBERS_THROW_REASONS).with_retry_reasons(MEMBERS_RETRY_REASONS);
    let page_options =
        PageOptions::with_message(got_total_items_msg("Members", "..."), Some("email"));
    let items = gapi::get_all_pages(
        &context.service,
        &context.policy,
        "members.list",
        "members",
        &page_options,
        &options,
        params,
    )
    .await
    .map_err(group_lookup_error(group))?;
    debug!("retrieved {} members of {}", items.len(), group);

    let members = from_values(items, Member::from_value)?;
    println!("{}", format_value(&members, format)?);
    Ok(())
}
