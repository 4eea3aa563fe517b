//! Execution of Google API requests.
//!
//! Every API invocation in the tool goes through [`call`] or its paging
//! counterpart [`get_all_pages`]. The wrapper absorbs transient failures
//! with bounded exponential backoff, converts caller-designated error
//! reasons into typed errors, and walks page tokens until a listing is
//! exhausted.

pub mod errors;

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use self::errors::{ErrorDetail, ErrorReason, GapiError, DEFAULT_RETRY_REASONS};

/// Request parameters passed to a service method. Entries either bind path
/// placeholders, become query parameters, or (under the `body` key) form
/// the JSON request body.
pub type Params = serde_json::Map<String, Value>;

/// A transport-level failure reported by a [`Service`], before reason
/// classification.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Non-2xx response; the body is kept raw for reason extraction.
    #[error("HTTP {status}")]
    Status { status: u16, body: String },
    /// DNS, connection, timeout, or undecodable-success-body failure.
    #[error("{0}")]
    Transport(String),
    /// The credential refresh itself failed.
    #[error("{0}")]
    Auth(String),
    /// The method name is not in the service's registry.
    #[error("unknown API method {0}")]
    UnknownMethod(String),
}

/// One remote API surface, abstracted to a method-name dispatch so the
/// retry wrapper stays independent of the HTTP client.
#[async_trait]
pub trait Service: Send + Sync {
    /// Executes a named method and returns the decoded JSON response.
    async fn execute(&self, method: &str, params: &Params) -> Result<Value, ServiceError>;

    /// Refreshes the credentials backing this service.
    async fn refresh_credentials(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    /// The user this service impersonates, when acting on a user's behalf.
    fn impersonated_user(&self) -> Option<String> {
        None
    }
}

/// Retry and backoff policy for [`call`]: ten attempts by default, with
/// `min(2^n, 60s)` backoff plus up to a second of jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt ceiling, first attempt included.
    pub max_attempts: u32,
    /// Backoff base; attempt n sleeps `base * 2^n`, capped.
    pub base: Duration,
    /// Upper bound on the exponential component of the delay.
    pub cap: Duration,
    /// Upper bound on the random jitter added to each delay.
    pub max_jitter: Duration,
    /// Retries past this attempt count log a visible warning.
    pub error_print_threshold: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 10,
            base: Duration::from_secs(1),
            cap: Duration::from_secs(60),
            max_jitter: Duration::from_millis(1000),
            error_print_threshold: 3,
        }
    }
}

impl RetryPolicy {
    /// The deterministic part of the backoff delay after attempt `n`.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let millis = (self.base.as_millis() as u64)
            .saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(millis).min(self.cap)
    }

    /// Full delay: exponential component plus random jitter.
    pub fn delay(&self, attempt: u32) -> Duration {
        let jitter_ceiling = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ceiling == 0 {
            0
        } else {
            rand::rng().random_range(1..=jitter_ceiling)
        };
        self.base_delay(attempt) + Duration::from_millis(jitter)
    }
}

/// Per-call error handling options. These are control options for the
/// wrapper, not API parameters.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Reasons surfaced to the caller as [`GapiError::Reason`] instead of
    /// being retried or treated as fatal.
    pub throw_reasons: Vec<ErrorReason>,
    /// Reasons retried with backoff in addition to the default set.
    pub retry_reasons: Vec<ErrorReason>,
    /// Return `Ok(None)` on failure instead of a fatal error.
    pub soft_errors: bool,
    /// Suppress the warning normally printed on a soft failure.
    pub silent_errors: bool,
}

impl CallOptions {
    pub fn throwing(reasons: &[ErrorReason]) -> Self {
        CallOptions {
            throw_reasons: reasons.to_vec(),
            ..Default::default()
        }
    }

    pub fn with_retry_reasons(mut self, reasons: &[ErrorReason]) -> Self {
        self.retry_reasons = reasons.to_vec();
        self
    }

    pub fn soft(mut self) -> Self {
        self.soft_errors = true;
        self
    }
}

// Unusable error bodies are refreshed-and-retried this many times before
// they are surfaced.
const MALFORMED_RETRY_LIMIT: u32 = 3;

async fn wait_on_failure(policy: &RetryPolicy, attempt: u32, error_message: &str) {
    let delay = policy.delay(attempt);
    if attempt > policy.error_print_threshold {
        let line = format!(
            "Temporary error: {}, Backing off: {} seconds, Retry: {}/{}",
            error_message,
            delay.as_secs(),
            attempt,
            policy.max_attempts
        );
        warn!("{}", line);
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "{}", line);
        let _ = stderr.flush();
    }
    tokio::time::sleep(delay).await;
}

/// Executes a single request on a Google service method.
///
/// On success the decoded response is returned after the first working
/// attempt. On failure the error reason is extracted from the response
/// body and dispatched:
///
/// - reasons in `options.throw_reasons` surface as [`GapiError::Reason`];
/// - reasons in the default retry set or `options.retry_reasons` sleep
///   `min(2^n, cap)` plus jitter and retry, up to `policy.max_attempts`;
/// - with `options.soft_errors`, anything else produces a warning and
///   `Ok(None)`;
/// - otherwise the error is fatal and its exit code derives from the HTTP
///   status.
///
/// An unusable error body is assumed to be a transient edge failure: the
/// credentials are refreshed and the request retried a small fixed number
/// of times before the body is surfaced as fatal.
pub async fn call(
    service: &dyn Service,
    policy: &RetryPolicy,
    method: &str,
    options: &CallOptions,
    params: Params,
) -> Result<Option<Value>, GapiError> {
    for attempt in 1..=policy.max_attempts {
        let error = match service.execute(method, &params).await {
            Ok(response) => return Ok(Some(response)),
            Err(e) => e,
        };
        match error {
            ServiceError::Status { status, body } => {
                match errors::extract_error_detail(status, &body, attempt < MALFORMED_RETRY_LIMIT)
                {
                    ErrorDetail::RetryCredentials => {
                        if let Err(e) = service.refresh_credentials().await {
                            return Err(auth_failure(service, options, e));
                        }
                        continue;
                    }
                    ErrorDetail::Unparsed { body } => {
                        if options.soft_errors {
                            if !options.silent_errors {
                                warn!("{}", body);
                            }
                            return Ok(None);
                        }
                        return Err(GapiError::MalformedResponse(body));
                    }
                    ErrorDetail::Unrecognized { body } => {
                        return Err(GapiError::UnrecognizedResponse(body));
                    }
                    ErrorDetail::Known {
                        status,
                        reason,
                        message,
                    } => {
                        let known_reason = reason.parse::<ErrorReason>().ok();
                        if let Some(known) = known_reason {
                            if options.throw_reasons.contains(&known) {
                                return Err(GapiError::Reason {
                                    reason: known,
                                    status,
                                    message,
                                });
                            }
                            if attempt != policy.max_attempts
                                && (DEFAULT_RETRY_REASONS.contains(&known)
                                    || options.retry_reasons.contains(&known))
                            {
                                wait_on_failure(policy, attempt, &reason).await;
                                continue;
                            }
                        }
                        if options.soft_errors {
                            if !options.silent_errors {
                                warn!(
                                    "{}: {} - {}{}",
                                    status,
                                    message,
                                    reason,
                                    if attempt > 1 { ": Giving up." } else { "" }
                                );
                            }
                            return Ok(None);
                        }
                        return Err(GapiError::Fatal {
                            status,
                            reason,
                            message,
                        });
                    }
                }
            }
            ServiceError::Transport(message) => {
                if attempt != policy.max_attempts {
                    wait_on_failure(policy, attempt, &message).await;
                    continue;
                }
                return Err(GapiError::Network(message));
            }
            ServiceError::Auth(message) => {
                return Err(auth_failure(
                    service,
                    options,
                    ServiceError::Auth(message),
                ));
            }
            ServiceError::UnknownMethod(method) => {
                return Err(GapiError::Network(format!("unknown API method {method}")));
            }
        }
    }
    Err(GapiError::Network("retry attempts exhausted".to_string()))
}

fn auth_failure(service: &dyn Service, options: &CallOptions, error: ServiceError) -> GapiError {
    let message = error.to_string();
    if options
        .throw_reasons
        .contains(&ErrorReason::ServiceNotAvailable)
    {
        return GapiError::Reason {
            reason: ErrorReason::ServiceNotAvailable,
            status: 0,
            message,
        };
    }
    errors::classify_token_error(&message, service.impersonated_user().as_deref())
}

/// Substitution markers understood by page progress messages.
pub const TOTAL_ITEMS_MARKER: &str = "%%total_items%%";
pub const NUM_ITEMS_MARKER: &str = "%%num_items%%";
pub const FIRST_ITEM_MARKER: &str = "%%first_item%%";
pub const LAST_ITEM_MARKER: &str = "%%last_item%%";

/// The standard "Got N <things>" page progress template.
pub fn got_total_items_msg(noun: &str, eol: &str) -> String {
    format!("Got {TOTAL_ITEMS_MARKER} {noun}{eol}")
}

/// Paging controls for [`get_all_pages`]. The items and token field names
/// vary per API and are supplied by the caller.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Name of the continuation-token field in the response.
    pub page_token_field: String,
    /// Optional progress template, rewritten in place on stderr between
    /// pages using the `%%..%%` markers.
    pub page_message: Option<String>,
    /// Item attribute substituted for the first/last-item markers.
    pub message_attribute: Option<String>,
}

impl Default for PageOptions {
    fn default() -> Self {
        PageOptions {
            page_token_field: "nextPageToken".to_string(),
            page_message: None,
            message_attribute: None,
        }
    }
}

impl PageOptions {
    pub fn with_message(message: String, attribute: Option<&str>) -> Self {
        PageOptions {
            page_message: Some(message),
            message_attribute: attribute.map(str::to_string),
            ..Default::default()
        }
    }
}

struct PageProgress {
    template: String,
    attribute: Option<String>,
    total: usize,
}

impl PageProgress {
    fn new(template: String, attribute: Option<String>) -> Self {
        PageProgress {
            template,
            attribute,
            total: 0,
        }
    }

    fn item_attribute<'a>(&self, item: Option<&'a Value>) -> &'a str {
        match (&self.attribute, item) {
            (Some(attribute), Some(item)) => {
                item.get(attribute).and_then(Value::as_str).unwrap_or("")
            }
            _ => "",
        }
    }

    fn report(&mut self, page_items: &[Value]) {
        self.total += page_items.len();
        let message = self
            .template
            .replace(NUM_ITEMS_MARKER, &page_items.len().to_string())
            .replace(TOTAL_ITEMS_MARKER, &self.total.to_string())
            .replace(FIRST_ITEM_MARKER, self.item_attribute(page_items.first()))
            .replace(LAST_ITEM_MARKER, self.item_attribute(page_items.last()));
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "\r{}", message);
        let _ = stderr.flush();
    }

    fn finish(self) {
        if !self.template.ends_with('\n') {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "\r\n");
            let _ = stderr.flush();
        }
    }
}

/// Gets all pages of items from a paged Google service method.
///
/// Repeatedly invokes [`call`], extracting `items_field` from each response
/// (an absent field contributes an empty page) and advancing `pageToken`
/// from the response's continuation-token field until the server stops
/// issuing one. Failure semantics per page are those of [`call`]; an error
/// on any page propagates and the accumulated items are discarded.
pub async fn get_all_pages(
    service: &dyn Service,
    policy: &RetryPolicy,
    method: &str,
    items_field: &str,
    page_options: &PageOptions,
    options: &CallOptions,
    mut params: Params,
) -> Result<Vec<Value>, GapiError> {
    let mut all_items: Vec<Value> = Vec::new();
    let mut progress = page_options
        .page_message
        .clone()
        .map(|template| PageProgress::new(template, page_options.message_attribute.clone()));
    loop {
        let response = call(service, policy, method, options, params.clone()).await?;
        let page_items = response
            .as_ref()
            .and_then(|r| r.get(items_field))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        if let Some(progress) = progress.as_mut() {
            progress.report(&page_items);
        }
        all_items.extend(page_items);
        let token = response
            .as_ref()
            .and_then(|r| r.get(&page_options.page_token_field))
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        match token {
            Some(token) => {
                params.insert("pageToken".to_string(), Value::String(token));
            }
            None => break,
        }
    }
    if let Some(progress) = progress {
        progress.finish();
    }
    Ok(all_items)
}

/// Gets a single page of items from a paged Google service method. An
/// absent items field yields an empty list.
pub async fn get_first_page(
    service: &dyn Service,
    policy: &RetryPolicy,
    method: &str,
    items_field: &str,
    options: &CallOptions,
    params: Params,
) -> Result<Vec<Value>, GapiError> {
    let response = call(service, policy, method, options, params).await?;
    Ok(response
        .as_ref()
        .and_then(|r| r.get(items_field))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Scripted service: pops one canned result per execute call.
    struct MockService {
        responses: Mutex<VecDeque<Result<Value, ServiceError>>>,
        calls: AtomicU32,
        refreshes: AtomicU32,
        last_params: Mutex<Vec<Params>>,
    }

    impl MockService {
        fn new(responses: Vec<Result<Value, ServiceError>>) -> Self {
            MockService {
                responses: Mutex::new(responses.into()),
                calls: AtomicU32::new(0),
                refreshes: AtomicU32::new(0),
                last_params: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Service for MockService {
        async fn execute(&self, _method: &str, params: &Params) -> Result<Value, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_params.lock().unwrap().push(params.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ServiceError::Transport("script exhausted".to_string())))
        }

        async fn refresh_credentials(&self) -> Result<(), ServiceError> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 10,
            base: Duration::from_millis(1),
            cap: Duration::from_millis(8),
            max_jitter: Duration::from_millis(1),
            error_print_threshold: 3,
        }
    }

    fn status_error(status: u16, reason: &str, message: &str) -> ServiceError {
        ServiceError::Status {
            status,
            body: json!({
                "error": {
                    "code": status,
                    "errors": [{"reason": reason, "message": message}],
                }
            })
            .to_string(),
        }
    }

    fn page(items: &[&str], token: Option<&str>) -> Value {
        let mut page = json!({
            "users": items
                .iter()
                .map(|email| json!({"primaryEmail": email}))
                .collect::<Vec<_>>(),
        });
        if let Some(token) = token {
            page["nextPageToken"] = json!(token);
        }
        page
    }

    #[tokio::test]
    async fn first_attempt_success_returns_response() {
        let service = MockService::new(vec![Ok(json!({"kind": "directory#user"}))]);
        let result = call(
            &service,
            &fast_policy(),
            "users.get",
            &CallOptions::default(),
            Params::new(),
        )
        .await
        .unwrap();
        assert_eq!(result, Some(json!({"kind": "directory#user"})));
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn backend_error_twice_then_success_takes_three_attempts() {
        let service = MockService::new(vec![
            Err(status_error(503, "backendError", "Backend Error")),
            Err(status_error(503, "backendError", "Backend Error")),
            Ok(json!({"ok": true})),
        ]);
        let result = call(
            &service,
            &fast_policy(),
            "users.list",
            &CallOptions::default(),
            Params::new(),
        )
        .await
        .unwrap();
        assert_eq!(result, Some(json!({"ok": true})));
        assert_eq!(service.calls(), 3);
    }

    #[tokio::test]
    async fn thrown_reason_raises_without_retry() {
        let service = MockService::new(vec![
            Err(status_error(404, "notFound", "Not Found")),
            Ok(json!({"never": "reached"})),
        ]);
        let options = CallOptions::throwing(&[ErrorReason::NotFound]);
        let error = call(&service, &fast_policy(), "users.get", &options, Params::new())
            .await
            .unwrap_err();
        match error {
            GapiError::Reason { reason, status, .. } => {
                assert_eq!(reason, ErrorReason::NotFound);
                assert_eq!(status, 404);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn non_retryable_reason_is_fatal_with_status_exit_code() {
        let service = MockService::new(vec![Err(status_error(
            412,
            "conditionNotMet",
            "Precondition failed",
        ))]);
        let error = call(
            &service,
            &fast_policy(),
            "users.update",
            &CallOptions::default(),
            Params::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(error, GapiError::Fatal { status: 412, .. }));
        assert_eq!(error.exit_code(), 412);
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn soft_errors_return_none_and_continue() {
        let service = MockService::new(vec![Err(status_error(403, "forbidden", "Forbidden"))]);
        let options = CallOptions::default().soft();
        let result = call(&service, &fast_policy(), "users.get", &options, Params::new())
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn caller_retry_reasons_extend_the_default_set() {
        let service = MockService::new(vec![
            Err(status_error(500, "systemError", "System Error")),
            Ok(json!({"ok": true})),
        ]);
        // systemError is not in the default set; without the extra retry
        // reason this would be fatal.
        let options = CallOptions::default().with_retry_reasons(&[ErrorReason::SystemError]);
        let result = call(&service, &fast_policy(), "groups.get", &options, Params::new())
            .await
            .unwrap();
        assert_eq!(result, Some(json!({"ok": true})));
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn retry_cap_exhaustion_is_fatal() {
        let policy = RetryPolicy {
            max_attempts: 3,
            ..fast_policy()
        };
        let service = MockService::new(vec![
            Err(status_error(503, "backendError", "Backend Error")),
            Err(status_error(503, "backendError", "Backend Error")),
            Err(status_error(503, "backendError", "Backend Error")),
        ]);
        let error = call(
            &service,
            &policy,
            "users.list",
            &CallOptions::default(),
            Params::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(error, GapiError::Fatal { status: 503, .. }));
        assert_eq!(service.calls(), 3);
    }

    #[tokio::test]
    async fn transport_errors_are_retried_with_backoff() {
        let service = MockService::new(vec![
            Err(ServiceError::Transport("dns failure".to_string())),
            Ok(json!({"ok": true})),
        ]);
        let result = call(
            &service,
            &fast_policy(),
            "users.list",
            &CallOptions::default(),
            Params::new(),
        )
        .await
        .unwrap();
        assert_eq!(result, Some(json!({"ok": true})));
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn malformed_error_body_refreshes_and_retries() {
        let service = MockService::new(vec![
            Err(ServiceError::Status {
                status: 500,
                body: "<html>edge proxy burp</html>".to_string(),
            }),
            Ok(json!({"ok": true})),
        ]);
        let result = call(
            &service,
            &fast_policy(),
            "users.list",
            &CallOptions::default(),
            Params::new(),
        )
        .await
        .unwrap();
        assert_eq!(result, Some(json!({"ok": true})));
        assert_eq!(service.refreshes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn auth_error_with_service_not_available_throw_reason_is_thrown() {
        let service = MockService::new(vec![Err(ServiceError::Auth(
            "invalid_grant: Bad Request".to_string(),
        ))]);
        let options = CallOptions::throwing(&[ErrorReason::ServiceNotAvailable]);
        let error = call(&service, &fast_policy(), "users.list", &options, Params::new())
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            GapiError::Reason {
                reason: ErrorReason::ServiceNotAvailable,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn three_pages_concatenate_in_order() {
        let service = MockService::new(vec![
            Ok(page(&["a@x.com", "b@x.com", "c@x.com"], Some("2"))),
            Ok(page(&["d@x.com", "e@x.com", "f@x.com"], Some("3"))),
            Ok(page(&["g@x.com", "h@x.com", "i@x.com"], None)),
        ]);
        let items = get_all_pages(
            &service,
            &fast_policy(),
            "users.list",
            "users",
            &PageOptions::default(),
            &CallOptions::default(),
            Params::new(),
        )
        .await
        .unwrap();
        assert_eq!(items.len(), 9);
        assert_eq!(service.calls(), 3);
        let emails: Vec<&str> = items
            .iter()
            .map(|i| i["primaryEmail"].as_str().unwrap())
            .collect();
        assert_eq!(
            emails,
            vec![
                "a@x.com", "b@x.com", "c@x.com", "d@x.com", "e@x.com", "f@x.com", "g@x.com",
                "h@x.com", "i@x.com",
            ]
        );

        // The second and third requests must carry the advancing token.
        let recorded = service.last_params.lock().unwrap();
        assert!(recorded[0].get("pageToken").is_none());
        assert_eq!(recorded[1]["pageToken"], json!("2"));
        assert_eq!(recorded[2]["pageToken"], json!("3"));
    }

    #[tokio::test]
    async fn page_without_items_field_is_empty() {
        let service = MockService::new(vec![
            Ok(json!({"nextPageToken": "2"})),
            Ok(page(&["a@x.com"], None)),
        ]);
        let items = get_all_pages(
            &service,
            &fast_policy(),
            "users.list",
            "users",
            &PageOptions::default(),
            &CallOptions::default(),
            Params::new(),
        )
        .await
        .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn paging_failure_propagates_call_semantics() {
        let service = MockService::new(vec![
            Ok(page(&["a@x.com"], Some("2"))),
            Err(status_error(404, "notFound", "Resource Not Found: groupKey")),
        ]);
        let options = CallOptions::throwing(&[ErrorReason::GroupNotFound]);
        let error = get_all_pages(
            &service,
            &fast_policy(),
            "members.list",
            "members",
            &PageOptions::default(),
            &options,
            Params::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            error,
            GapiError::Reason {
                reason: ErrorReason::GroupNotFound,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn get_first_page_extracts_items() {
        let service = MockService::new(vec![Ok(page(&["a@x.com", "b@x.com"], Some("ignored")))]);
        let items = get_first_page(
            &service,
            &fast_policy(),
            "users.list",
            "users",
            &CallOptions::default(),
            Params::new(),
        )
        .await
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(service.calls(), 1);
    }

    #[test]
    fn backoff_is_exponential_and_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.base_delay(1), Duration::from_secs(2));
        assert_eq!(policy.base_delay(2), Duration::from_secs(4));
        assert_eq!(policy.base_delay(5), Duration::from_secs(32));
        assert_eq!(policy.base_delay(6), Duration::from_secs(60));
        assert_eq!(policy.base_delay(9), Duration::from_secs(60));
    }

    #[test]
    fn backoff_is_monotonic_with_bounded_jitter() {
        let policy = RetryPolicy::default();
        for attempt in 1..policy.max_attempts {
            assert!(policy.base_delay(attempt + 1) >= policy.base_delay(attempt));
            let delay = policy.delay(attempt);
            assert!(delay >= policy.base_delay(attempt));
            assert!(delay <= policy.base_delay(attempt) + policy.max_jitter);
        }
    }

    #[test]
    fn page_message_template_carries_marker() {
        let message = got_total_items_msg("Users", "...\n");
        assert_eq!(message, "Got %%total_items%% Users...\n");
    }

    #[test]
    fn page_progress_substitutes_markers() {
        let mut progress = PageProgress::new(
            format!("Got {NUM_ITEMS_MARKER}/{TOTAL_ITEMS_MARKER}: {FIRST_ITEM_MARKER}-{LAST_ITEM_MARKER}"),
            Some("primaryEmail".to_string()),
        );
        let items = vec![
            json!({"primaryEmail": "a@x.com"}),
            json!({"primaryEmail": "b@x.com"}),
        ];
        progress.report(&items);
        assert_eq!(progress.total, 2);
        progress.report(&items);
        assert_eq!(progress.total, 4);
    }
}
