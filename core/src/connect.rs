//! # Connect Phase
//!
//! Verifies that a Satellite source is reachable and speaks an API this tool
//! understands, then asks it for its host count and host list.
//!
//! The steps, each separated by a cancellation check:
//! 1. refuse a missing or Satellite 5 version without touching the network,
//! 2. probe the status endpoint for an HTTP status and an API version,
//! 3. pick a client from the [`ClientRegistry`],
//! 4. call `host_count` and then `hosts`.
//!
//! Every network step runs under a step timeout on top of the per-request
//! timeout, so a stalled server cannot hold a task forever.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use surveyr_common::config::Config;
use surveyr_common::credential::CredentialStore;
use surveyr_common::source::SatelliteVersion;
use surveyr_common::success;
use surveyr_protocols::http::HttpTransport;
use surveyr_protocols::satellite::{self, SatelliteApi, SatelliteError, SatelliteSession};

use crate::registry::ClientRegistry;
use crate::task::{CancelSignal, ScanTask, ScanTaskRunner, ScanType, TaskOutcome};

const PROBE: &str = "status probe";
const HOST_COUNT: &str = "host count";
const HOST_LIST: &str = "host listing";

/// Why a connect scan stopped. Never leaves [`ConnectTaskRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum ConnectError {
    /// A missing version renders as `unknown`.
    #[error("Satellite version {} is not yet supported.", version_label(.0))]
    UnsupportedVersion(Option<SatelliteVersion>),
    #[error("status probe returned HTTP {0}")]
    ProbeRejected(u16),
    #[error("Satellite version {version} with api version {} is not supported.", api_label(.api_version))]
    UnsupportedApi {
        version: SatelliteVersion,
        api_version: Option<u32>,
    },
    #[error("Satellite error encountered: {0}")]
    Satellite(#[from] SatelliteError),
    #[error("Satellite error encountered: {step} timed out after {}s", .after.as_secs())]
    StepTimeout { step: &'static str, after: Duration },
    #[error("Connect scan runner cannot run {0} tasks.")]
    WrongScanType(ScanType),
    #[error("canceled before {0}")]
    Canceled(&'static str),
}

fn version_label(version: &Option<SatelliteVersion>) -> String {
    version.map_or_else(|| "unknown".to_owned(), |v| v.to_string())
}

fn api_label(api_version: &Option<u32>) -> String {
    api_version.map_or_else(|| "unknown".to_owned(), |v| v.to_string())
}

impl ConnectError {
    /// Operator-facing message: an optional detail line, then the verdict.
    fn into_outcome(self, task: &ScanTask) -> TaskOutcome {
        match self {
            ConnectError::Canceled(step) => {
                debug!("{task} canceled before {step}");
                TaskOutcome::canceled(format!("Connect scan canceled for {task}."))
            }
            ConnectError::ProbeRejected(status) => {
                debug!("{task} status probe returned HTTP {status}");
                TaskOutcome::failed(format!("Connect scan failed for {task}."))
            }
            other => TaskOutcome::failed(format!("{other}\nConnect scan failed for {task}.")),
        }
    }
}

fn checkpoint(cancel: &CancelSignal, next_step: &'static str) -> Result<(), ConnectError> {
    if cancel.is_canceled() {
        return Err(ConnectError::Canceled(next_step));
    }
    Ok(())
}

/// Connect phase runner for Satellite sources.
pub struct ConnectTaskRunner {
    registry: Arc<ClientRegistry>,
    credentials: Arc<dyn CredentialStore>,
    transport: Arc<dyn HttpTransport>,
    request_timeout: Duration,
    step_timeout: Duration,
}

impl ConnectTaskRunner {
    pub fn new(
        registry: Arc<ClientRegistry>,
        credentials: Arc<dyn CredentialStore>,
        transport: Arc<dyn HttpTransport>,
        config: &Config,
    ) -> Self {
        Self {
            registry,
            credentials,
            transport,
            request_timeout: config.request_timeout,
            step_timeout: config.step_timeout,
        }
    }

    async fn step<T>(
        &self,
        name: &'static str,
        call: impl Future<Output = Result<T, SatelliteError>>,
    ) -> Result<T, ConnectError> {
        match tokio::time::timeout(self.step_timeout, call).await {
            Ok(result) => result.map_err(ConnectError::from),
            Err(_) => Err(ConnectError::StepTimeout {
                step: name,
                after: self.step_timeout,
            }),
        }
    }

    async fn connect(&self, task: &ScanTask, cancel: &CancelSignal) -> Result<(), ConnectError> {
        if task.scan_type != ScanType::Connect {
            return Err(ConnectError::WrongScanType(task.scan_type));
        }

        let version = match task.source.options.satellite_version {
            Some(version) if version != SatelliteVersion::Five => version,
            other => return Err(ConnectError::UnsupportedVersion(other)),
        };

        checkpoint(cancel, PROBE)?;
        let session = SatelliteSession::for_source(
            &task.source,
            self.credentials.as_ref(),
            self.transport.clone(),
            self.request_timeout,
        )?;

        let (status, api_version) = self.step(PROBE, satellite::status(&session)).await?;
        if status != 200 {
            return Err(ConnectError::ProbeRejected(status));
        }
        debug!("{task} reports api version {}", api_label(&api_version));

        let client = self
            .registry
            .resolve(version, api_version, session)
            .ok_or(ConnectError::UnsupportedApi {
                version,
                api_version,
            })?;
        debug!("{task} uses {}", client.kind());

        checkpoint(cancel, HOST_COUNT)?;
        let count = self.step(HOST_COUNT, client.host_count()).await?;

        checkpoint(cancel, HOST_LIST)?;
        let hosts = self.step(HOST_LIST, client.hosts()).await?;

        info!("{task} reports {count} hosts, listed {}", hosts.len());
        Ok(())
    }
}

#[async_trait]
impl ScanTaskRunner for ConnectTaskRunner {
    async fn run(&self, task: &mut ScanTask, cancel: &CancelSignal) -> TaskOutcome {
        if let Err(err) = task.start() {
            warn!("Not running {task}: {err}");
            if task.state().is_terminal() {
                return task.outcome();
            }
            return TaskOutcome::failed(format!("{err}\nConnect scan failed for {task}."));
        }
        info!("Connect scan started for {task}.");

        let outcome = match self.connect(task, cancel).await {
            Ok(()) => {
                success!("Connect scan completed for {task}.");
                TaskOutcome::completed()
            }
            Err(err) => err.into_outcome(task),
        };

        if let Err(err) = task.finish(&outcome) {
            warn!("{err}");
        }
        outcome
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
