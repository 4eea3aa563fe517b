//! End-to-end tests for the reqwest-backed service behind the call wrapper,
//! against a local mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use gwadm::auth::TokenProvider;
use gwadm::gapi::errors::{ErrorReason, GapiError, USER_GET_THROW_REASONS};
use gwadm::gapi::{call, get_all_pages, CallOptions, PageOptions, Params, RetryPolicy};
use gwadm::service::RestService;

fn service_for(server: &MockServer) -> RestService {
    RestService::new(
        server.base_url(),
        Arc::new(TokenProvider::with_static_token("test-token".to_string())),
    )
    .unwrap()
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base: Duration::from_millis(1),
        cap: Duration::from_millis(4),
        max_jitter: Duration::from_millis(1),
        error_print_threshold: 3,
    }
}

fn error_body(status: u16, reason: &str, message: &str) -> serde_json::Value {
    json!({
        "error": {
            "code": status,
            "errors": [{"reason": reason, "message": message}],
        }
    })
}

#[tokio::test]
async fn requests_carry_bearer_token_and_query() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users/jo@example.com")
                .header("authorization", "Bearer test-token")
                .query_param("projection", "full");
            then.status(200)
                .json_body(json!({"primaryEmail": "jo@example.com"}));
        })
        .await;

    let service = service_for(&server);
    let mut params = Params::new();
    params.insert("userKey".to_string(), json!("jo@example.com"));
    params.insert("projection".to_string(), json!("full"));

    let response = call(
        &service,
        &fast_policy(),
        "users.get",
        &CallOptions::default(),
        params,
    )
    .await
    .unwrap();

    mock.assert_async().await;
    assert_eq!(response, Some(json!({"primaryEmail": "jo@example.com"})));
}

#[tokio::test]
async fn pagination_advances_the_page_token() {
    let server = MockServer::start_async().await;
    let page_one = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users")
                .query_param("customer", "c123")
                .query_param("pageToken", "1");
            then.status(200).json_body(json!({
                "users": [
                    {"primaryEmail": "a@example.com"},
                    {"primaryEmail": "b@example.com"},
                ],
                "nextPageToken": "2",
            }));
        })
        .await;
    let page_two = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users")
                .query_param("customer", "c123")
                .query_param("pageToken", "2");
            then.status(200).json_body(json!({
                "users": [{"primaryEmail": "c@example.com"}],
            }));
        })
        .await;

    let service = service_for(&server);
    let mut params = Params::new();
    params.insert("customer".to_string(), json!("c123"));
    params.insert("pageToken".to_string(), json!("1"));

    let items = get_all_pages(
        &service,
        &fast_policy(),
        "users.list",
        "users",
        &PageOptions::default(),
        &CallOptions::default(),
        params,
    )
    .await
    .unwrap();

    page_one.assert_async().await;
    page_two.assert_async().await;
    let emails: Vec<&str> = items
        .iter()
        .map(|i| i["primaryEmail"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["a@example.com", "b@example.com", "c@example.com"]);
}

#[tokio::test]
async fn fatal_api_error_carries_the_http_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/groups/eng@example.com");
            then.status(400)
                .json_body(error_body(400, "badRequest", "Bad Request"));
        })
        .await;

    let service = service_for(&server);
    let mut params = Params::new();
    params.insert("groupKey".to_string(), json!("eng@example.com"));

    let error = call(
        &service,
        &fast_policy(),
        "groups.get",
        &CallOptions::default(),
        params,
    )
    .await
    .unwrap_err();

    assert!(matches!(error, GapiError::Fatal { status: 400, .. }));
    assert_eq!(error.exit_code(), 400);
}

#[tokio::test]
async fn declared_throw_reasons_surface_as_typed_errors() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/users/ghost@example.com");
            then.status(404).json_body(error_body(
                404,
                "notFound",
                "Resource Not Found: userKey",
            ));
        })
        .await;

    let service = service_for(&server);
    let mut params = Params::new();
    params.insert("userKey".to_string(), json!("ghost@example.com"));

    let options = CallOptions::throwing(USER_GET_THROW_REASONS);
    let error = call(&service, &fast_policy(), "users.get", &options, params)
        .await
        .unwrap_err();

    // No retries on a thrown reason.
    mock.assert_async().await;
    match error {
        GapiError::Reason { reason, status, .. } => {
            assert_eq!(reason, ErrorReason::UserNotFound);
            assert_eq!(status, 404);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn insert_posts_the_json_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/users")
                .header("authorization", "Bearer test-token")
                .json_body(json!({
                    "primaryEmail": "new@example.com",
                    "name": {"givenName": "New", "familyName": "User"},
                }));
            then.status(200).json_body(json!({
                "primaryEmail": "new@example.com",
                "id": "12345",
            }));
        })
        .await;

    let service = service_for(&server);
    let mut params = Params::new();
    params.insert(
        "body".to_string(),
        json!({
            "primaryEmail": "new@example.com",
            "name": {"givenName": "New", "familyName": "User"},
        }),
    );

    let response = call(
        &service,
        &fast_policy(),
        "users.insert",
        &CallOptions::default(),
        params,
    )
    .await
    .unwrap();

    mock.assert_async().await;
    assert_eq!(response.unwrap()["id"], json!("12345"));
}

#[tokio::test]
async fn empty_success_body_becomes_null() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/users/old@example.com");
            then.status(204);
        })
        .await;

    let service = service_for(&server);
    let mut params = Params::new();
    params.insert("userKey".to_string(), json!("old@example.com"));

    let response = call(
        &service,
        &fast_policy(),
        "users.delete",
        &CallOptions::default(),
        params,
    )
    .await
    .unwrap();

    assert_eq!(response, Some(serde_json::Value::Null));
}

#[tokio::test]
async fn retryable_status_is_retried_against_the_server() {
    let server = MockServer::start_async().await;
    // The mock always fails; the wrapper should give up only after the
    // policy's attempt ceiling.
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/users");
            then.status(503)
                .json_body(error_body(503, "backendError", "Backend Error"));
        })
        .await;

    let service = service_for(&server);
    let error = call(
        &service,
        &fast_policy(),
        "users.list",
        &CallOptions::default(),
        Params::new(),
    )
    .await
    .unwrap_err();

    mock.assert_hits_async(3).await;
    assert!(matches!(error, GapiError::Fatal { status: 503, .. }));
}
