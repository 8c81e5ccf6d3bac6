//! Behavioral tests for the gateway's retry, classification and loading-flag
//! policy, driven through a mock effect interpreter.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::effects::{PrEffect, PrEffectInterpreter, PrResponse};
use crate::github::GitHubApiError;
use crate::notifications::{NotificationSink, Toast};
use crate::telemetry::EventSink;
use crate::types::{
    DetailedPullRequest, MergeMethod, MergeableState, PrNumber, PrState, PullRequest, RepoId,
};

use super::github::{GitHubPrService, RetryConfig};
use super::monitor::{MonitorConfig, PrMonitor};
use super::HostedGitPrService;

// ─── Test Doubles ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct MockInterpreter {
    inner: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    responses: Mutex<VecDeque<Result<PrResponse, GitHubApiError>>>,
    calls: Mutex<Vec<PrEffect>>,
    loading_probe: Mutex<Option<watch::Receiver<bool>>>,
    observed_loading: Mutex<Vec<bool>>,
}

impl MockInterpreter {
    fn push_ok(&self, response: PrResponse) {
        self.inner.responses.lock().unwrap().push_back(Ok(response));
    }

    fn push_err(&self, err: GitHubApiError) {
        self.inner.responses.lock().unwrap().push_back(Err(err));
    }

    fn calls(&self) -> Vec<PrEffect> {
        self.inner.calls.lock().unwrap().clone()
    }

    /// Snapshot the given loading receiver's value at every interpreted call.
    fn probe_loading(&self, rx: watch::Receiver<bool>) {
        *self.inner.loading_probe.lock().unwrap() = Some(rx);
    }

    fn observed_loading(&self) -> Vec<bool> {
        self.inner.observed_loading.lock().unwrap().clone()
    }
}

impl PrEffectInterpreter for MockInterpreter {
    type Error = GitHubApiError;

    async fn interpret(&self, effect: PrEffect) -> Result<PrResponse, GitHubApiError> {
        self.inner.calls.lock().unwrap().push(effect);
        if let Some(rx) = &*self.inner.loading_probe.lock().unwrap() {
            self.inner.observed_loading.lock().unwrap().push(*rx.borrow());
        }
        self.inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("interpreter called more times than responses were queued")
    }
}

#[derive(Clone, Default)]
struct RecordingNotifications {
    toasts: Arc<Mutex<Vec<Toast>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifications {
    fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingNotifications {
    fn show_toast(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }

    fn show_error(&self, title: &str, error: &dyn std::error::Error) {
        self.errors.lock().unwrap().push(format!("{title}: {error}"));
    }
}

#[derive(Clone, Default)]
struct RecordingEvents {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingEvents {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingEvents {
    fn capture(&self, event: &str) {
        self.events.lock().unwrap().push(event.to_string());
    }
}

// ─── Test Helpers ─────────────────────────────────────────────────────────────

fn api_error(status_code: Option<u16>, message: &str) -> GitHubApiError {
    GitHubApiError {
        status_code,
        message: message.to_string(),
        source: None,
    }
}

fn sample_pr(number: u64) -> PullRequest {
    PullRequest {
        number: PrNumber(number),
        title: "Add feature".to_string(),
        body: Some("Description".to_string()),
        html_url: Some(format!("https://github.com/octocat/demo/pull/{number}")),
        draft: false,
        source_branch: "feature".to_string(),
        target_branch: "main".to_string(),
        sha: "a".repeat(40),
        author: Some("octocat".to_string()),
        created_at: None,
    }
}

fn sample_detail(number: u64) -> DetailedPullRequest {
    DetailedPullRequest {
        number: PrNumber(number),
        title: "Add feature".to_string(),
        body: None,
        html_url: None,
        source_branch: "feature".to_string(),
        target_branch: "main".to_string(),
        draft: false,
        state: PrState::Open,
        mergeable: Some(true),
        mergeable_state: MergeableState::Clean,
        rebaseable: Some(true),
        merge_commit_sha: None,
        requested_reviewers: vec![],
        created_at: None,
        updated_at: None,
        merged_at: None,
        closed_at: None,
    }
}

fn make_service(
    mock: &MockInterpreter,
) -> (
    GitHubPrService<MockInterpreter>,
    RecordingNotifications,
    RecordingEvents,
) {
    let notifications = RecordingNotifications::default();
    let events = RecordingEvents::default();
    let service = GitHubPrService::new(
        mock.clone(),
        RepoId::new("octocat", "demo"),
        "main",
        "feature",
        Arc::new(notifications.clone()),
        Arc::new(events.clone()),
    );
    (service, notifications, events)
}

// ─── Creation ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_pr_first_attempt_success() {
    let mock = MockInterpreter::default();
    mock.push_ok(PrResponse::Created(sample_pr(12)));
    let (service, notifications, events) = make_service(&mock);

    let pr = service
        .create_pr("Add feature", "Description", false)
        .await
        .unwrap()
        .expect("expected a created pull request");

    assert_eq!(pr, sample_pr(12));
    assert_eq!(events.events(), vec!["PR Successful"]);
    assert!(notifications.toasts().is_empty());
    assert!(notifications.errors().is_empty());
    assert!(!*service.loading().borrow());

    // One remote call, carrying the configured branch pair and the inputs.
    assert_eq!(
        mock.calls(),
        vec![PrEffect::CreatePr {
            head: "feature".to_string(),
            base: "main".to_string(),
            title: "Add feature".to_string(),
            body: "Description".to_string(),
            draft: false,
        }]
    );
}

#[tokio::test]
async fn create_pr_suppresses_classified_errors_without_retry() {
    let mock = MockInterpreter::default();
    mock.push_err(api_error(
        Some(422),
        "Validation Failed: A pull request already exists for octocat:feature.",
    ));
    let (service, notifications, events) = make_service(&mock);

    let result = service.create_pr("t", "b", false).await.unwrap();

    assert!(result.is_none());
    assert_eq!(mock.calls().len(), 1);
    assert_eq!(notifications.toasts().len(), 1);
    assert_eq!(
        notifications.toasts()[0].title.as_deref(),
        Some("Pull request already exists")
    );
    assert!(notifications.errors().is_empty());
    assert!(events.events().is_empty());
    assert!(!*service.loading().borrow());
}

#[tokio::test(start_paused = true)]
async fn create_pr_exhausts_retries_and_returns_last_error() {
    let mock = MockInterpreter::default();
    for i in 1..=4 {
        mock.push_err(api_error(Some(500), &format!("server error {i}")));
    }
    let (service, notifications, events) = make_service(&mock);

    let start = tokio::time::Instant::now();
    let err = service.create_pr("t", "b", false).await.unwrap_err();

    // The error from the 4th (last) attempt is the one surfaced.
    assert_eq!(err.message, "server error 4");
    assert_eq!(mock.calls().len(), 4);

    // 500 ms between each pair of consecutive attempts, none after the last.
    assert_eq!(start.elapsed(), Duration::from_millis(1500));

    assert_eq!(notifications.errors().len(), 1);
    assert!(notifications.errors()[0].starts_with("Failed to create pull request"));
    assert!(notifications.toasts().is_empty());
    assert!(events.events().is_empty());
    assert!(!*service.loading().borrow());
}

#[tokio::test(start_paused = true)]
async fn create_pr_succeeds_on_second_attempt() {
    let mock = MockInterpreter::default();
    mock.push_err(api_error(Some(502), "bad gateway"));
    mock.push_ok(PrResponse::Created(sample_pr(3)));
    let (service, notifications, events) = make_service(&mock);

    let start = tokio::time::Instant::now();
    let pr = service.create_pr("t", "b", true).await.unwrap().unwrap();

    assert_eq!(pr.number, PrNumber(3));
    assert_eq!(mock.calls().len(), 2);
    assert_eq!(start.elapsed(), Duration::from_millis(500));
    assert_eq!(events.events(), vec!["PR Successful"]);
    assert!(notifications.errors().is_empty());
}

#[tokio::test(start_paused = true)]
async fn create_pr_respects_custom_attempt_ceiling() {
    let mock = MockInterpreter::default();
    mock.push_err(api_error(Some(500), "one"));
    mock.push_err(api_error(Some(500), "two"));
    let (service, _, _) = make_service(&mock);
    let service = service.with_retry(RetryConfig {
        max_attempts: 2,
        delay: Duration::from_millis(500),
    });

    let err = service.create_pr("t", "b", false).await.unwrap_err();

    assert_eq!(err.message, "two");
    assert_eq!(mock.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn loading_resets_after_every_attempt() {
    let mock = MockInterpreter::default();
    for i in 1..=3 {
        mock.push_err(api_error(Some(500), &format!("failure {i}")));
    }
    let (service, _, _) = make_service(&mock);
    let service = service.with_retry(RetryConfig {
        max_attempts: 3,
        delay: Duration::from_millis(500),
    });
    mock.probe_loading(service.loading());

    let _ = service.create_pr("t", "b", false).await;

    // The flag is raised once at the start of the sequence and cleared after
    // every individual attempt, so attempts 2 and 3 already observe false.
    assert_eq!(mock.observed_loading(), vec![true, false, false]);
    assert!(!*service.loading().borrow());
}

// ─── Get / Merge ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_issues_single_call_and_maps_response() {
    let mock = MockInterpreter::default();
    mock.push_ok(PrResponse::Detailed(sample_detail(42)));
    let (service, _, _) = make_service(&mock);

    let detail = service.get(PrNumber(42)).await.unwrap();

    assert_eq!(detail, sample_detail(42));
    assert_eq!(mock.calls(), vec![PrEffect::GetPr { pr: PrNumber(42) }]);
}

#[tokio::test]
async fn get_propagates_failure_without_retry() {
    let mock = MockInterpreter::default();
    mock.push_err(api_error(Some(404), "Not Found"));
    let (service, notifications, events) = make_service(&mock);

    let err = service.get(PrNumber(42)).await.unwrap_err();

    assert_eq!(err.status_code, Some(404));
    assert_eq!(mock.calls().len(), 1);
    assert!(notifications.toasts().is_empty());
    assert!(notifications.errors().is_empty());
    assert!(events.events().is_empty());
}

#[tokio::test]
async fn merge_issues_single_call_with_method() {
    let mock = MockInterpreter::default();
    mock.push_ok(PrResponse::Merged);
    let (service, _, _) = make_service(&mock);

    service.merge(MergeMethod::Squash, PrNumber(7)).await.unwrap();

    assert_eq!(
        mock.calls(),
        vec![PrEffect::MergePr {
            pr: PrNumber(7),
            method: MergeMethod::Squash,
        }]
    );
}

#[tokio::test]
async fn merge_propagates_failure_unmodified() {
    let mock = MockInterpreter::default();
    mock.push_err(api_error(Some(405), "Pull Request is not mergeable"));
    let (service, notifications, _) = make_service(&mock);

    let err = service
        .merge(MergeMethod::Rebase, PrNumber(7))
        .await
        .unwrap_err();

    assert_eq!(err.message, "Pull Request is not mergeable");
    assert_eq!(mock.calls().len(), 1);
    assert!(notifications.toasts().is_empty());
    assert!(notifications.errors().is_empty());
}

// ─── Monitor ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn monitor_refresh_routes_through_gateway_get() {
    let mock = MockInterpreter::default();
    mock.push_ok(PrResponse::Detailed(sample_detail(5)));
    let (service, _, _) = make_service(&mock);

    let monitor = service.pr_monitor(PrNumber(5));
    let status = monitor.status();
    assert!(status.borrow().is_none());

    let detail = monitor.refresh().await.unwrap();

    assert_eq!(detail, sample_detail(5));
    assert_eq!(status.borrow().as_ref(), Some(&sample_detail(5)));
    assert_eq!(mock.calls(), vec![PrEffect::GetPr { pr: PrNumber(5) }]);
}

#[tokio::test(start_paused = true)]
async fn monitor_run_polls_until_cancelled() {
    let mock = MockInterpreter::default();
    for _ in 0..4 {
        mock.push_ok(PrResponse::Detailed(sample_detail(9)));
    }
    let (service, _, _) = make_service(&mock);

    let monitor = PrMonitor::new(
        service,
        PrNumber(9),
        MonitorConfig {
            poll_interval: Duration::from_secs(30),
        },
    );
    let status = monitor.status();
    let cancel = CancellationToken::new();

    let token = cancel.clone();
    let handle = tokio::spawn(async move {
        monitor.run(token).await;
    });

    // First tick fires immediately, then every 30 s.
    tokio::time::sleep(Duration::from_secs(65)).await;
    cancel.cancel();
    handle.await.unwrap();

    let calls = mock.calls();
    assert!(
        (2..=4).contains(&calls.len()),
        "expected a poll per tick, got {}",
        calls.len()
    );
    assert!(calls
        .iter()
        .all(|c| *c == PrEffect::GetPr { pr: PrNumber(9) }));
    assert_eq!(status.borrow().as_ref(), Some(&sample_detail(9)));
}

#[tokio::test(start_paused = true)]
async fn monitor_keeps_polling_after_a_failed_fetch() {
    let mock = MockInterpreter::default();
    mock.push_err(api_error(Some(500), "flaky"));
    mock.push_ok(PrResponse::Detailed(sample_detail(9)));
    let (service, _, _) = make_service(&mock);

    let monitor = PrMonitor::new(
        service,
        PrNumber(9),
        MonitorConfig {
            poll_interval: Duration::from_secs(30),
        },
    );
    let status = monitor.status();
    let cancel = CancellationToken::new();

    let token = cancel.clone();
    let handle = tokio::spawn(async move {
        monitor.run(token).await;
    });

    tokio::time::sleep(Duration::from_secs(35)).await;
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(mock.calls().len(), 2);
    assert_eq!(status.borrow().as_ref(), Some(&sample_detail(9)));
}
