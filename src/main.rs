//! status-digest - summarize a GitHub Project's status updates with Claude.
//!
//! Fetches every status update on the configured project, asks Claude for a
//! markdown summary, and posts the summary back as a new status update.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use status_digest::{
    App, ClaudeProvider, Config, Credentials, GitHubProjects, RunMode, RunOptions,
    StatusUpdateStatus,
};

/// Summarize GitHub Project status updates and post a new one
#[derive(Parser)]
#[command(name = "status-digest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print summary but do not post it
    #[arg(long)]
    dry_run: bool,

    /// Print raw status updates as JSON and exit
    #[arg(long = "json")]
    dump_json: bool,

    /// Status label for the posted summary [default: from config, ON_TRACK]
    #[arg(long, value_enum, ignore_case = true)]
    status: Option<StatusUpdateStatus>,

    /// Model used for the summary
    #[arg(long)]
    model: Option<String>,

    /// Path to a config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn mode(&self) -> RunMode {
        if self.dump_json {
            RunMode::DumpJson
        } else if self.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Publish
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // A missing .env is fine
    let _ = dotenvy::dotenv();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };
    config.apply_env_overrides();

    let credentials = Credentials::from_env()?;

    let projects =
        GitHubProjects::new(credentials.github_token.clone(), &config.github, &config.project)
            .context("Failed to create GitHub client")?;
    let mut claude = ClaudeProvider::new(credentials.anthropic_api_key.clone(), &config.anthropic)
        .context("Failed to create Claude client")?
        .with_project_name(&config.project.name);
    if let Some(model) = cli.model.clone() {
        claude = claude.with_model(model);
    }

    let options = RunOptions {
        mode: cli.mode(),
        status: cli.status.unwrap_or(config.project.default_status),
        project_id: config.project.node_id.clone(),
    };

    tracing::debug!(
        owner = %config.project.owner,
        number = config.project.number,
        mode = ?options.mode,
        "Starting run"
    );

    // Requests are issued one at a time; a single-threaded runtime is enough
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    let outcome = rt.block_on(async {
        let mut stdout = io::stdout().lock();
        let mut stderr = io::stderr().lock();
        App::new(&projects, &claude).run(&options, &mut stdout, &mut stderr).await
    })?;

    Ok(ExitCode::from(outcome.exit_code()))
}
