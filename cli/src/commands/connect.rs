use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tokio::task::{Id, JoinSet};
use tracing::{Instrument, info_span, warn};

use crate::inventory::Inventory;
use crate::sprint;
use crate::terminal::{colors, print, spinner};
use surveyr_common::config::Config;
use surveyr_common::credential::CredentialStore;
use surveyr_common::source::Source;
use surveyr_core::connect::ConnectTaskRunner;
use surveyr_core::registry::ClientRegistry;
use surveyr_core::task::{CancelSignal, ScanTask, ScanTaskRunner, ScanType, TaskOutcome, TaskState};
use surveyr_core::validation::SourceValidator;
use surveyr_protocols::http::{HttpTransport, ReqwestTransport};

/// Every connect scan started by one invocation belongs to this job.
const JOB_ID: u64 = 1;

type Detail = (String, ColoredString);

pub async fn connect(path: &Path, selected: &[String], cfg: &Config) -> anyhow::Result<()> {
    let inventory = Inventory::load(path)?;
    let credentials: Arc<dyn CredentialStore> = Arc::new(inventory.credential_store());
    let sources: Vec<Arc<Source>> = select_sources(&inventory, credentials.clone(), selected, cfg);
    if sources.is_empty() {
        anyhow::bail!("No valid source to scan in {}", path.display());
    }

    let transport: Arc<dyn HttpTransport> =
        Arc::new(ReqwestTransport::new().context("Failed to set up the HTTP client")?);
    let runner: Arc<ConnectTaskRunner> = Arc::new(ConnectTaskRunner::new(
        Arc::new(ClientRegistry::default()),
        credentials,
        transport,
        cfg,
    ));

    let cancel: CancelSignal = CancelSignal::new();
    let interrupt = tokio::spawn(cancel_on_interrupt(cancel.clone()));

    let start_time: Instant = Instant::now();
    let total: usize = sources.len();
    spinner::start(format!("Running {total} connect scans..."));

    let mut running: JoinSet<(ScanTask, TaskOutcome)> = JoinSet::new();
    let mut labels: HashMap<Id, String> = HashMap::with_capacity(total);
    for (idx, source) in sources.into_iter().enumerate() {
        let runner = runner.clone();
        let cancel = cancel.clone();
        let mut task = ScanTask::new(idx as u64 + 1, JOB_ID, ScanType::Connect, source);
        let label = task.to_string();
        let span = info_span!("connect", task = task.id, job = JOB_ID);
        let handle = running.spawn(
            async move {
                let outcome = runner.run(&mut task, &cancel).await;
                (task, outcome)
            }
            .instrument(span),
        );
        labels.insert(handle.id(), label);
    }

    let mut finished: Vec<(ScanTask, TaskOutcome)> = Vec::with_capacity(total);
    let mut panicked: usize = 0;
    while let Some(joined) = running.join_next().await {
        match joined {
            Ok(done) => finished.push(done),
            Err(err) => {
                let label = labels.get(&err.id()).map_or("a connect scan", String::as_str);
                warn!("Lost {label}: {err}");
                panicked += 1;
            }
        }
        spinner::report_connect_progress(finished.len() + panicked, total);
    }

    spinner::finish();
    interrupt.abort();

    finished.sort_by_key(|(task, _)| task.id);
    connect_ends(&finished, panicked, start_time.elapsed(), cfg)
}

/// Validates the inventory and keeps the requested, valid sources.
fn select_sources(
    inventory: &Inventory,
    credentials: Arc<dyn CredentialStore>,
    selected: &[String],
    cfg: &Config,
) -> Vec<Arc<Source>> {
    let validator = SourceValidator::new(credentials, cfg);
    let mut sources: Vec<Arc<Source>> = Vec::new();

    for checked in inventory.validate_all(&validator) {
        match checked.result {
            Ok(source) if selected.is_empty() || selected.contains(&source.name) => {
                sources.push(Arc::new(source));
            }
            Ok(_) => {}
            Err(errors) => warn!("Skipping {}: {errors}", checked.label),
        }
    }

    for name in selected {
        if !sources.iter().any(|s| &s.name == name) {
            warn!("No valid source named '{name}' in the inventory");
        }
    }
    sources
}

async fn cancel_on_interrupt(cancel: CancelSignal) {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("Interrupted, canceling connect scans after their current step");
        cancel.cancel();
    }
}

fn connect_ends(
    finished: &[(ScanTask, TaskOutcome)],
    lost: usize,
    total_time: Duration,
    cfg: &Config,
) -> anyhow::Result<()> {
    print::header("Connect Scan Results", cfg.quiet);

    for (idx, (task, outcome)) in finished.iter().enumerate() {
        match cfg.quiet {
            2 => print::print(&format!("{}\t{}", task.source.name, outcome.state)),
            _ => print_task_tree(idx, task, outcome),
        }
    }

    let total: usize = finished.len() + lost;
    let failed: usize = unfinished(finished) + lost;
    print_summary(total, failed, total_time, cfg);

    if failed > 0 {
        anyhow::bail!("{failed} of {total} connect scans did not complete");
    }
    Ok(())
}

fn unfinished(finished: &[(ScanTask, TaskOutcome)]) -> usize {
    finished
        .iter()
        .filter(|(_, outcome)| outcome.state != TaskState::Completed)
        .count()
}

fn state_colored(state: TaskState) -> ColoredString {
    match state {
        TaskState::Completed => state.to_string().green().bold(),
        TaskState::Canceled => state.to_string().yellow().bold(),
        _ => state.to_string().red().bold(),
    }
}

fn print_task_tree(idx: usize, task: &ScanTask, outcome: &TaskOutcome) {
    print::tree_head(idx, &task.source.name);

    let mut details: Vec<Detail> = vec![
        ("Task".to_string(), task.id.to_string().normal()),
        ("State".to_string(), state_colored(outcome.state)),
    ];
    if let Some(host) = task.source.primary_host() {
        details.push(("Host".to_string(), format!("{}:{}", host, task.source.port).normal()));
    }
    if let Some(message) = &outcome.message {
        let first_line: &str = message.lines().next().unwrap_or_default();
        details.push(("Reason".to_string(), first_line.color(colors::ACCENT)));
    }

    print::as_tree_one_level(details);
    sprint!();
}

fn print_summary(total: usize, failed: usize, total_time: Duration, cfg: &Config) {
    let completed: ColoredString = format!("{} completed", total - failed).bold().green();
    let failed: ColoredString = format!("{failed} failed").bold().red();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Connect Complete: {completed}, {failed} in {total_time}");

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&format!("{}", output.color(colors::TEXT_DEFAULT)));
        }
        _ => {
            sprint!();
            sprint!(&output);
        }
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
