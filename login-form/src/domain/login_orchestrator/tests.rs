//! Unit tests for the login orchestrator loop.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rstest::rstest;
use serde_json::json;
use tokio::sync::{Notify, broadcast, mpsc};
use tokio::time::timeout;

use super::{LoginFormHandle, LoginOrchestrator, OrchestratorConfig, OrchestratorError};
use crate::domain::ports::{GatewayError, LoginGateway, MockLoginGateway};
use crate::domain::{
    ButtonTone, LoginFailure, RequestPayload, ResponseMapping, StateUpdate, SubmissionState, User,
    UserDecodeError, ValidationPolicy,
};
use crate::test_support::ScriptedLoginGateway;

const WAIT: Duration = Duration::from_secs(5);

fn spawn_with(gateway: Arc<dyn LoginGateway>) -> (LoginFormHandle, tokio::task::JoinHandle<()>) {
    LoginOrchestrator::new(gateway, OrchestratorConfig::default()).spawn()
}

async fn next<T: Clone>(receiver: &mut broadcast::Receiver<T>) -> T {
    timeout(WAIT, receiver.recv())
        .await
        .expect("signal within timeout")
        .expect("signal channel open")
}

/// Type the credentials; each edit publishes one validity value.
async fn fill(handle: &LoginFormHandle, email: &str, password: &str) {
    handle.set_email(Some(email.to_owned())).await.expect("email");
    handle
        .set_password(Some(password.to_owned()))
        .await
        .expect("password");
}

fn gated(
    gateway: ScriptedLoginGateway,
) -> (
    Arc<ScriptedLoginGateway>,
    Arc<Notify>,
    mpsc::UnboundedReceiver<usize>,
) {
    let release = Arc::new(Notify::new());
    let (entered_tx, entered_rx) = mpsc::unbounded_channel();
    let stub = gateway
        .gated(Arc::clone(&release))
        .reporting_entry(entered_tx);
    (Arc::new(stub), release, entered_rx)
}

async fn wait_for_entry(entered: &mut mpsc::UnboundedReceiver<usize>) -> usize {
    timeout(WAIT, entered.recv())
        .await
        .expect("gateway entered within timeout")
        .expect("entry channel open")
}

fn test_user() -> User {
    User::new("123", "TestName")
}

/// Gateway whose call never returns normally.
struct PanickingGateway;

#[async_trait]
impl LoginGateway for PanickingGateway {
    async fn submit(&self, _payload: &RequestPayload) -> Result<ResponseMapping, GatewayError> {
        panic!("gateway exploded");
    }
}

#[rstest]
#[tokio::test]
async fn successful_submission_reports_loading_then_user() {
    let gateway = Arc::new(ScriptedLoginGateway::succeeding());
    let (handle, _task) = spawn_with(gateway.clone());
    let mut updates = handle.observe_state_updates();
    let mut loading = handle.observe_loading_state();

    fill(&handle, "ada@example.com", "pw").await;
    handle.submit().await.expect("submit");

    assert_eq!(next(&mut updates).await, StateUpdate::Loading);
    assert_eq!(next(&mut updates).await, StateUpdate::Finished(test_user()));
    assert!(next(&mut loading).await);
    assert!(!next(&mut loading).await);
    assert_eq!(handle.current_state(), SubmissionState::Succeeded(test_user()));
    assert_eq!(gateway.calls(), 1);
}

#[rstest]
#[tokio::test]
async fn gateway_failure_surfaces_verbatim() {
    let gateway = Arc::new(ScriptedLoginGateway::failing(GatewayError::unknown()));
    let (handle, _task) = spawn_with(gateway);
    let mut updates = handle.observe_state_updates();

    fill(&handle, "ada@example.com", "pw").await;
    handle.submit().await.expect("submit");

    assert_eq!(next(&mut updates).await, StateUpdate::Loading);
    assert_eq!(
        next(&mut updates).await,
        StateUpdate::Error(LoginFailure::Gateway(GatewayError::unknown()))
    );
}

#[rstest]
#[tokio::test]
async fn undecodable_success_is_a_data_failure() {
    let mut mapping = ResponseMapping::new();
    mapping.insert("id".to_owned(), json!("123"));
    let gateway = Arc::new(ScriptedLoginGateway::always(Ok(mapping)));
    let (handle, _task) = spawn_with(gateway);
    let mut updates = handle.observe_state_updates();

    fill(&handle, "ada@example.com", "pw").await;
    handle.submit().await.expect("submit");

    assert_eq!(next(&mut updates).await, StateUpdate::Loading);
    assert_eq!(
        next(&mut updates).await,
        StateUpdate::Error(LoginFailure::InvalidResponseData(
            UserDecodeError::MissingName
        ))
    );
}

#[rstest]
#[tokio::test]
async fn presses_while_loading_do_not_reach_the_gateway() {
    let (gateway, release, mut entered) = gated(ScriptedLoginGateway::succeeding());
    let (handle, _task) = spawn_with(gateway.clone());
    let mut updates = handle.observe_state_updates();
    let mut validity = handle.observe_form_validity();

    fill(&handle, "ada@example.com", "pw").await;
    handle.submit().await.expect("first submit");
    handle.submit().await.expect("second submit");
    assert_eq!(wait_for_entry(&mut entered).await, 1);
    handle.submit().await.expect("third submit");

    // The third validity value proves every earlier press was processed.
    handle
        .set_password(Some("pw2".to_owned()))
        .await
        .expect("password");
    assert!(!next(&mut validity).await);
    assert!(next(&mut validity).await);
    assert!(next(&mut validity).await);
    assert!(handle.current_state().is_loading());

    release.notify_one();
    assert_eq!(next(&mut updates).await, StateUpdate::Loading);
    assert_eq!(next(&mut updates).await, StateUpdate::Finished(test_user()));
    assert_eq!(gateway.calls(), 1);
}

#[rstest]
#[tokio::test]
async fn edits_after_submit_do_not_change_the_sent_payload() {
    let (gateway, release, mut entered) = gated(ScriptedLoginGateway::succeeding());
    let (handle, _task) = spawn_with(gateway.clone());
    let mut updates = handle.observe_state_updates();

    fill(&handle, "ada@example.com", "pw").await;
    handle.submit().await.expect("submit");
    wait_for_entry(&mut entered).await;
    handle
        .set_email(Some("eve@example.com".to_owned()))
        .await
        .expect("email");
    handle.set_password(None).await.expect("password");
    release.notify_one();

    assert_eq!(next(&mut updates).await, StateUpdate::Loading);
    assert_eq!(next(&mut updates).await, StateUpdate::Finished(test_user()));
    assert_eq!(
        gateway.recorded_bodies(),
        vec![json!({"email": "ada@example.com", "password": "pw"})]
    );
}

#[rstest]
#[tokio::test]
async fn real_edits_are_observable_from_the_first_one() {
    let (handle, _task) = spawn_with(Arc::new(ScriptedLoginGateway::succeeding()));
    let mut validity = handle.observe_form_validity();
    assert!(!handle.render_directive().login_button.enabled);

    fill(&handle, "ada@example.com", "pw").await;

    assert!(!next(&mut validity).await, "email typed, password still empty");
    assert!(next(&mut validity).await, "both typed");
    assert!(validity.try_recv().is_err());
    let directive = handle.render_directive();
    assert!(directive.login_button.enabled);
    assert_eq!(directive.login_button.tone, ButtonTone::Active);
}

#[rstest]
#[tokio::test]
async fn submit_while_invalid_is_ignored() {
    let mut gateway = MockLoginGateway::new();
    gateway.expect_submit().never();
    let (handle, _task) = spawn_with(Arc::new(gateway));
    let mut updates = handle.observe_state_updates();
    let mut validity = handle.observe_form_validity();

    handle.submit().await.expect("submit");
    handle
        .set_email(Some("ada@example.com".to_owned()))
        .await
        .expect("email");

    assert!(!next(&mut validity).await);
    assert_eq!(handle.current_state(), SubmissionState::Idle);
    assert!(updates.try_recv().is_err());
}

#[rstest]
#[tokio::test]
async fn a_new_attempt_may_follow_a_failed_one() {
    let gateway = Arc::new(ScriptedLoginGateway::scripted(
        vec![Err(GatewayError::timeout("after 10s"))],
        Ok(crate::test_support::user_mapping("123", "TestName")),
    ));
    let (handle, _task) = spawn_with(gateway.clone());
    let mut updates = handle.observe_state_updates();

    fill(&handle, "ada@example.com", "pw").await;
    handle.submit().await.expect("submit");
    assert_eq!(next(&mut updates).await, StateUpdate::Loading);
    assert!(matches!(next(&mut updates).await, StateUpdate::Error(_)));

    handle.submit().await.expect("retry");
    assert_eq!(next(&mut updates).await, StateUpdate::Loading);
    assert_eq!(next(&mut updates).await, StateUpdate::Finished(test_user()));
    assert_eq!(gateway.calls(), 2);
}

#[rstest]
#[tokio::test]
async fn render_directive_reflects_an_in_flight_attempt() {
    let (gateway, release, mut entered) = gated(ScriptedLoginGateway::succeeding());
    let (handle, _task) = spawn_with(gateway);

    fill(&handle, "ada@example.com", "pw").await;
    handle.submit().await.expect("submit");
    wait_for_entry(&mut entered).await;

    let directive = handle.render_directive();
    assert!(directive.busy_indicator);
    assert!(!directive.login_button.enabled);
    assert_eq!(directive.notice, None);
    release.notify_one();
}

#[rstest]
#[tokio::test]
async fn dropping_every_handle_lets_the_attempt_finish() {
    let (gateway, release, mut entered) = gated(ScriptedLoginGateway::succeeding());
    let (handle, task) = spawn_with(gateway);
    let state = handle.watch_state();

    fill(&handle, "ada@example.com", "pw").await;
    handle.submit().await.expect("submit");
    wait_for_entry(&mut entered).await;
    drop(handle);
    release.notify_one();

    timeout(WAIT, task)
        .await
        .expect("loop stops within timeout")
        .expect("loop task completes");
    assert_eq!(*state.borrow(), SubmissionState::Succeeded(test_user()));
}

#[rstest]
#[tokio::test]
async fn stopped_orchestrator_rejects_events() {
    let orchestrator = LoginOrchestrator::new(
        Arc::new(ScriptedLoginGateway::succeeding()),
        OrchestratorConfig::default(),
    );
    let (handle, events) = orchestrator.connect();
    drop(events);

    assert_eq!(handle.submit().await, Err(OrchestratorError::Stopped));
}

#[rstest]
#[tokio::test]
async fn per_field_policy_still_gates_submission() {
    let mut gateway = MockLoginGateway::new();
    gateway.expect_submit().never();
    let config = OrchestratorConfig {
        validation_policy: ValidationPolicy::PerField,
        ..OrchestratorConfig::default()
    };
    let (handle, _task) = LoginOrchestrator::new(Arc::new(gateway), config).spawn();
    let mut validity = handle.observe_form_validity();

    fill(&handle, "ada@example.com", "").await;
    handle.submit().await.expect("submit");
    handle.set_email(None).await.expect("email");

    assert!(!next(&mut validity).await);
    assert!(!next(&mut validity).await);
    assert!(!next(&mut validity).await);
    assert_eq!(handle.current_state(), SubmissionState::Idle);
}

#[rstest]
#[tokio::test]
async fn blank_fields_reported_by_a_ui_are_published() {
    let (handle, _task) = spawn_with(Arc::new(ScriptedLoginGateway::succeeding()));
    let mut validity = handle.observe_form_validity();

    handle.set_email(Some(String::new())).await.expect("email");
    handle
        .set_password(Some(String::new()))
        .await
        .expect("password");
    handle
        .set_email(Some("ada@example.com".to_owned()))
        .await
        .expect("email");
    handle
        .set_password(Some("pw".to_owned()))
        .await
        .expect("password");

    assert!(!next(&mut validity).await);
    assert!(!next(&mut validity).await);
    assert!(!next(&mut validity).await);
    assert!(next(&mut validity).await);
}

#[rstest]
#[tokio::test]
async fn panicking_attempt_surfaces_as_interrupted() {
    let (handle, _task) = spawn_with(Arc::new(PanickingGateway));
    let mut updates = handle.observe_state_updates();
    let mut loading = handle.observe_loading_state();

    fill(&handle, "ada@example.com", "pw").await;
    handle.submit().await.expect("submit");

    assert_eq!(next(&mut updates).await, StateUpdate::Loading);
    let update = next(&mut updates).await;
    assert!(
        matches!(
            &update,
            StateUpdate::Error(LoginFailure::Interrupted { message })
                if message.contains("gateway exploded")
        ),
        "unexpected update: {update:?}"
    );
    assert!(next(&mut loading).await);
    assert!(!next(&mut loading).await);
    assert!(matches!(
        handle.current_state(),
        SubmissionState::Failed(LoginFailure::Interrupted { .. })
    ));

    // The loop survives the panic and accepts another attempt.
    handle.submit().await.expect("retry");
    assert_eq!(next(&mut updates).await, StateUpdate::Loading);
}
