//! Arcadia Forge — process entry point.
//!
//! Parses a handful of flags, loads layered configuration, initializes
//! logging, wires the real Hook Pipeline tool executor and Human
//! Channel approval gateway against the project's State Store, and
//! drives the Session Supervisor to completion. No concrete
//! provider-backed `AgentRuntime` ships in this workspace (§6); the
//! only implementation available to drive a real run is the scripted
//! transcript player in `arcadia-test`, selected with `--script`.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use arcadia_config::Config;
use arcadia_core::dirs::ProjectHome;
use arcadia_events::EventLog;
use arcadia_hooks::{ApprovalGateway, ToolExecutor};
use arcadia_human::HumanGateway;
use arcadia_risk::RiskClassifier;
use arcadia_storage::Database;
use arcadia_supervisor::{ExitStatus, Supervisor};
use arcadia_telemetry::{LogConfig, LogFormat};
use arcadia_test::ScriptedRuntime;
use arcadia_tools::ArcadiaToolExecutor;
use clap::Parser;

/// Arcadia Forge — drives a long-running coding agent across bounded
/// sessions until an application spec is satisfied.
#[derive(Parser, Debug)]
#[command(name = "arcadia", author, version, about, long_about = None)]
struct Cli {
    /// Project directory. Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    project_dir: Option<PathBuf>,

    /// Resume the session left paused by a previous run. Required if
    /// `.paused_session.json` is present; refused otherwise to avoid
    /// silently discarding a resumable snapshot.
    #[arg(long)]
    resume: bool,

    /// Log output format. Defaults to compact.
    #[arg(long, value_enum)]
    log_format: Option<CliLogFormat>,

    /// Path to a JSON file holding the scripted `AgentRuntime` turns to
    /// play back (a `Vec<RuntimeTurn>`). Required until a
    /// provider-backed runtime is wired in, since none ships here.
    #[arg(long, value_name = "FILE")]
    script: PathBuf,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum CliLogFormat {
    Compact,
    Pretty,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(value: CliLogFormat) -> Self {
        match value {
            CliLogFormat::Compact => Self::Compact,
            CliLogFormat::Pretty => Self::Pretty,
            CliLogFormat::Json => Self::Json,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(status) => exit_code_for(status),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(30)
        },
    }
}

fn exit_code_for(status: ExitStatus) -> ExitCode {
    match status {
        ExitStatus::Normal => ExitCode::from(0),
        ExitStatus::Paused => ExitCode::from(10),
        ExitStatus::BudgetExceeded => ExitCode::from(20),
        ExitStatus::CrashRecoveryNeeded => ExitCode::from(40),
    }
}

async fn run(cli: Cli) -> Result<ExitStatus> {
    let project = match cli.project_dir {
        Some(dir) => ProjectHome::from_path(dir),
        None => ProjectHome::resolve_cwd().context("failed to resolve the current directory")?,
    };
    project.ensure().context("failed to initialize .arcadia/ state directories")?;

    let resolved = Config::load(Some(project.root())).context("failed to load configuration")?;
    let config = resolved.config;

    let log_format = cli.log_format.unwrap_or(CliLogFormat::Compact);
    arcadia_telemetry::setup_logging(&LogConfig::new(config.logging.level.as_str()).with_format(log_format.into()))
        .context("failed to initialize logging")?;

    if project.paused_session_path().is_file() && !cli.resume {
        anyhow::bail!(
            "a paused session snapshot exists at {}; pass --resume to continue it",
            project.paused_session_path().display()
        );
    }

    let turns_json = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("failed to read scripted runtime file {}", cli.script.display()))?;
    let turns = serde_json::from_str(&turns_json)
        .with_context(|| format!("{} is not a valid scripted turn sequence", cli.script.display()))?;
    let runtime = ScriptedRuntime::new(turns);

    let db = Database::connect_embedded(&project.project_db_path().to_string_lossy())
        .await
        .context("failed to connect to the project database")?;
    let events = Arc::new(EventLog::open(project.events_log_path()).await.context("failed to open the event log")?);

    let tool_executor = ArcadiaToolExecutor::new(project.root().to_path_buf(), db.clone());
    let tool_catalog = tool_executor.builtin_catalog();
    let executor: Arc<dyn ToolExecutor> = Arc::new(tool_executor);
    let approval: Arc<dyn ApprovalGateway> = Arc::new(HumanGateway::new(Arc::new(db.clone())));

    let supervisor = Supervisor::new(
        project,
        db,
        events,
        runtime,
        executor,
        approval,
        tool_catalog,
        config.security,
        RiskClassifier::new(),
        config.autonomy,
        config.budget,
        arcadia_supervisor::WatchdogConfig {
            stall_timeout: config.watchdog.stall_timeout(),
            cyclic_threshold: config.watchdog.cyclic_threshold,
            cyclic_window: config.watchdog.cyclic_window,
        },
        "You are Arcadia, an autonomous coding agent working toward the project's application spec.",
    );

    supervisor.run_to_completion().await.context("supervisor run failed")
}
