//! Data models for Directory API entities.
//!
//! Only the fields the CLI surfaces are modeled; the raw JSON keeps
//! anything else. Each model carries a CSV projection for the listing
//! commands.

use crate::format::CsvRecordProducer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unexpected API payload: {0}")]
    UnexpectedPayload(#[from] serde_json::Error),
}

fn flag(value: Option<bool>) -> String {
    value.unwrap_or(false).to_string()
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub primary_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<UserName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_unit_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
}

impl User {
    pub fn from_value(value: Value) -> Result<User, ModelError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn full_name(&self) -> String {
        self.name
            .as_ref()
            .and_then(|n| n.full_name.clone())
            .unwrap_or_default()
    }
}

impl CsvRecordProducer for User {
    fn csv_header() -> Vec<String> {
        vec![
            "PRIMARY_EMAIL".to_string(),
            "FULL_NAME".to_string(),
            "SUSPENDED".to_string(),
            "ADMIN".to_string(),
            "ORG_UNIT_PATH".to_string(),
            "LAST_LOGIN_TIME".to_string(),
        ]
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.primary_email.clone(),
            self.full_name(),
            flag(self.suspended),
            flag(self.is_admin),
            self.org_unit_path.clone().unwrap_or_default(),
            self.last_login_time.clone().unwrap_or_default(),
        ]]
    }
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    // The Directory API returns this count as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_members_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_created: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
}

impl Group {
    pub fn from_value(value: Value) -> Result<Group, ModelError> {
        Ok(serde_json::from_value(value)?)
    }
}

impl CsvRecordProducer for Group {
    fn csv_header() -> Vec<String> {
        vec![
            "EMAIL".to_string(),
            "NAME".to_string(),
            "DESCRIPTION".to_string(),
            "MEMBERS".to_string(),
            "ADMIN_CREATED".to_string(),
        ]
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.email.clone(),
            self.name.clone().unwrap_or_default(),
            self.description.clone().unwrap_or_default(),
            self.direct_members_count.clone().unwrap_or_default(),
            flag(self.admin_created),
        ]]
    }
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub member_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Member {
    pub fn from_value(value: Value) -> Result<Member, ModelError> {
        Ok(serde_json::from_value(value)?)
    }
}

impl CsvRecordProducer for Member {
    fn csv_header() -> Vec<String> {
        vec![
            "EMAIL".to_string(),
            "ROLE".to_string(),
            "TYPE".to_string(),
            "STATUS".to_string(),
        ]
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.email.clone().unwrap_or_default(),
            self.role.clone().unwrap_or_default(),
            self.member_type.clone().unwrap_or_default(),
            self.status.clone().unwrap_or_default(),
        ]]
    }
}

/// Converts a page of raw items into typed models, rejecting the whole
/// page on the first malformed item.
pub fn from_values<T, F>(items: Vec<Value>, convert: F) -> Result<Vec<T>, ModelError>
where
    F: Fn(Value) -> Result<T, ModelError>,
{
    items.into_iter().map(convert).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_deserializes_from_api_payload() {
        let user = User::from_value(json!({
            "primaryEmail": "jqpublic@example.com",
            "name": {"givenName": "J", "familyName": "Public", "fullName": "J Public"},
            "suspended": false,
            "isAdmin": true,
            "orgUnitPath": "/Sales",
            "kind": "admin#directory#user",
        }))
        .unwrap();
        assert_eq!(user.primary_email, "jqpublic@example.com");
        assert_eq!(user.full_name(), "J Public");
        assert_eq!(user.is_admin, Some(true));
    }

    #[test]
    fn user_csv_record_fills_missing_fields() {
        let user = User {
            primary_email: "a@example.com".to_string(),
            ..Default::default()
        };
        let records = user.as_csv_records();
        assert_eq!(
            records,
            vec![vec![
                "a@example.com".to_string(),
                String::new(),
                "false".to_string(),
                "false".to_string(),
                String::new(),
                String::new(),
            ]]
        );
    }

    #[test]
    fn group_members_count_is_a_string() {
        let group = Group::from_value(json!({
            "email": "eng@example.com",
            "name": "Engineering",
            "directMembersCount": "42",
        }))
        .unwrap();
        assert_eq!(group.direct_members_count.as_deref(), Some("42"));
    }

    #[test]
    fn member_type_field_is_renamed() {
        let member = Member::from_value(json!({
            "email": "a@example.com",
            "role": "MEMBER",
            "type": "USER",
            "status": "ACTIVE",
        }))
        .unwrap();
        assert_eq!(member.member_type.as_deref(), Some("USER"));
    }

    #[test]
    fn malformed_item_rejects_the_page() {
        let result = from_values(
            vec![json!({"primaryEmail": "ok@example.com"}), json!({"noEmail": true})],
            User::from_value,
        );
        assert!(result.is_err());
    }
}
