//! Login form entry-point: loads settings, wires the HTTP gateway into the
//! orchestrator, and presents one login attempt on stdout.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use login_form::config::LoginSettings;
use login_form::domain::{
    LoginFormHandle, LoginOrchestrator, OrchestratorError, SubmissionState, ValidationOutcome,
    validate_with,
};
use login_form::inbound::{TerminalPresenter, present_until_resolved};
use login_form::outbound::HttpLoginGateway;

fn main() -> io::Result<ExitCode> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<ExitCode> {
    let settings = LoginSettings::load_from_iter(env::args_os())
        .map_err(|error| io::Error::other(format!("load login settings: {error}")))?;
    let endpoint = settings.endpoint().map_err(io::Error::other)?;
    let timeout = settings.request_timeout().map_err(io::Error::other)?;
    let gateway = HttpLoginGateway::new(endpoint, timeout)
        .map_err(|error| io::Error::other(format!("build HTTP client: {error}")))?;
    info!(
        endpoint,
        timeout_secs = timeout.as_secs(),
        "login form starting"
    );

    let (handle, task) =
        LoginOrchestrator::new(Arc::new(gateway), settings.orchestrator_config()).spawn();
    let mut validity = handle.observe_form_validity();
    let updates = handle.observe_state_updates();
    let mut presenter = TerminalPresenter::new(io::stdout());

    type_credentials(&handle, &settings)
        .await
        .map_err(io::Error::other)?;
    if !latest_validity(&mut validity).await? {
        presenter
            .present(handle.render_directive())
            .map_err(io::Error::other)?;
        let reason = match validate_with(
            settings.validation_policy(),
            settings.email.as_deref(),
            settings.password.as_deref(),
        ) {
            ValidationOutcome::Invalid(reason) => reason.to_string(),
            ValidationOutcome::Valid => "form is not valid".to_owned(),
        };
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "cannot submit: {reason}")?;
        return Ok(ExitCode::FAILURE);
    }

    handle.submit().await.map_err(io::Error::other)?;
    let state = present_until_resolved(&handle, updates, &mut presenter)
        .await
        .map_err(io::Error::other)?;
    drop(handle);
    task.await
        .map_err(|error| io::Error::other(format!("login orchestrator task failed: {error}")))?;

    match state {
        SubmissionState::Succeeded(user) => {
            info!(user_id = user.id(), "login succeeded");
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "signed in as {} ({})", user.name(), user.id())?;
            Ok(ExitCode::SUCCESS)
        }
        SubmissionState::Failed(failure) => {
            warn!(%failure, "login failed");
            Ok(ExitCode::FAILURE)
        }
        SubmissionState::Idle | SubmissionState::Loading => Ok(ExitCode::FAILURE),
    }
}

/// Type the configured credentials into the form, one field at a time.
async fn type_credentials(
    handle: &LoginFormHandle,
    settings: &LoginSettings,
) -> Result<(), OrchestratorError> {
    handle.set_email(settings.email.clone()).await?;
    handle.set_password(settings.password.clone()).await
}

/// Wait for the two validity values produced by the typed credentials.
async fn latest_validity(validity: &mut broadcast::Receiver<bool>) -> io::Result<bool> {
    let mut latest = false;
    for _ in 0..2 {
        latest = validity
            .recv()
            .await
            .map_err(|error| io::Error::other(format!("form validity unavailable: {error}")))?;
    }
    Ok(latest)
}
