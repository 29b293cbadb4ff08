use std::sync::Arc;

use serde_json::json;

use crate::util::{RecordingTransport, SAT_HOST, connect_runner, satellite_source};
use surveyr_core::task::{CancelSignal, ScanTask, ScanTaskRunner, ScanType, TaskOutcome, TaskState};
use surveyr_protocols::http::TransportError;

async fn run_connect(version: Option<&str>, transport: RecordingTransport) -> (ScanTask, TaskOutcome, Arc<RecordingTransport>) {
    let transport = Arc::new(transport);
    let runner = connect_runner(transport.clone());
    let mut task = ScanTask::new(1, 7, ScanType::Connect, Arc::new(satellite_source(version)));
    let outcome = runner.run(&mut task, &CancelSignal::new()).await;
    (task, outcome, transport)
}

const FAILED: &str = "Connect scan failed for task 1 (job 7, source 'satellite').";

#[tokio::test]
async fn satellite_five_fails_without_network_calls() {
    let (task, outcome, transport) = run_connect(Some("5"), RecordingTransport::satellite(2)).await;

    assert_eq!(outcome.state, TaskState::Failed);
    assert_eq!(
        outcome.message.as_deref(),
        Some(format!("Satellite version 5 is not yet supported.\n{FAILED}").as_str())
    );
    assert_eq!(task.state(), TaskState::Failed);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn missing_version_fails_without_network_calls() {
    let (_, outcome, transport) = run_connect(None, RecordingTransport::satellite(2)).await;
    assert_eq!(outcome.state, TaskState::Failed);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn unresolvable_version_pair_names_both() {
    let (_, outcome, transport) = run_connect(Some("6.3"), RecordingTransport::satellite(1)).await;
    assert_eq!(
        outcome,
        TaskOutcome::failed(format!(
            "Satellite version 6.3 with api version 1 is not supported.\n{FAILED}"
        ))
    );
    assert_eq!(transport.paths(), ["/api/status"]);
}

#[tokio::test]
async fn resolvable_pairs_complete_without_message() {
    for (version, api) in [("6.2", 1), ("6.2", 2), ("6.3", 2)] {
        let (task, outcome, transport) = run_connect(Some(version), RecordingTransport::satellite(api)).await;
        assert_eq!(outcome, TaskOutcome::completed(), "{version}/{api}");
        assert_eq!(task.state(), TaskState::Completed);
        assert_eq!(task.result_message(), None);
        assert!(transport.requests().len() >= 3);
    }
}

#[tokio::test]
async fn probe_goes_to_first_host_with_first_credential() {
    let (_, _, transport) = run_connect(Some("6.3"), RecordingTransport::satellite(2)).await;
    let probe = &transport.requests()[0];

    assert_eq!(probe.url, format!("https://{SAT_HOST}:443/api/status"));
    assert_eq!(probe.auth.as_ref().map(|a| a.username.as_str()), Some("admin"));
    assert!(probe.verify_tls);
    assert!(!probe.timeout.is_zero());
}

#[tokio::test]
async fn non_200_probe_fails_generically() {
    let transport = RecordingTransport::default().status("/api/status", 503);
    let (_, outcome, _) = run_connect(Some("6.2"), transport).await;
    assert_eq!(outcome, TaskOutcome::failed(FAILED));
}

#[tokio::test]
async fn transport_errors_become_failed_tasks() {
    let errors = [
        TransportError::Connect("Connection refused".into()),
        TransportError::Timeout("operation timed out".into()),
        TransportError::Tls("invalid peer certificate: UnknownIssuer".into()),
    ];
    for err in errors {
        let transport = RecordingTransport::default().error("/api/status", err.clone());
        let (task, outcome, _) = run_connect(Some("6.2"), transport).await;

        assert_eq!(
            outcome,
            TaskOutcome::failed(format!("Satellite error encountered: {err}\n{FAILED}"))
        );
        assert_eq!(task.state(), TaskState::Failed);
    }
}

#[tokio::test]
async fn protocol_errors_become_failed_tasks() {
    let transport = RecordingTransport::default()
        .json("/api/status", json!({"api_version": 2}))
        .json("/api/v2/hosts", json!("not a page"));
    let (_, outcome, _) = run_connect(Some("6.3"), transport).await;

    assert_eq!(outcome.state, TaskState::Failed);
    let message = outcome.message.unwrap();
    assert!(message.starts_with("Satellite error encountered: unexpected response from /api/v2/hosts"));
    assert!(message.ends_with(FAILED));
}

#[tokio::test]
async fn pre_canceled_task_makes_no_calls() {
    let transport = Arc::new(RecordingTransport::satellite(2));
    let runner = connect_runner(transport.clone());
    let mut task = ScanTask::new(1, 7, ScanType::Connect, Arc::new(satellite_source(Some("6.3"))));
    let cancel = CancelSignal::new();
    cancel.cancel();

    let outcome = runner.run(&mut task, &cancel).await;
    assert_eq!(outcome.state, TaskState::Canceled);
    assert_eq!(
        outcome.message.as_deref(),
        Some("Connect scan canceled for task 1 (job 7, source 'satellite').")
    );
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn tasks_run_concurrently_and_independently() {
    let good = Arc::new(RecordingTransport::satellite(2));
    let bad = Arc::new(RecordingTransport::default().status("/api/status", 500));

    let mut handles = Vec::new();
    for (id, transport) in [(1, good.clone()), (2, bad.clone())] {
        handles.push(tokio::spawn(async move {
            let runner = connect_runner(transport);
            let mut task = ScanTask::new(id, 7, ScanType::Connect, Arc::new(satellite_source(Some("6.3"))));
            runner.run(&mut task, &CancelSignal::new()).await
        }));
    }

    let mut states = Vec::new();
    for handle in handles {
        states.push(handle.await.unwrap().state);
    }
    assert_eq!(states, [TaskState::Completed, TaskState::Failed]);
}
