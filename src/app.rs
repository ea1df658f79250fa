//! The fetch → format → summarize → publish pipeline.
//!
//! `App` drives one run: it reads the project's status updates, optionally
//! dumps them, summarizes them, and posts the summary unless a read-only
//! mode was selected. User-facing output goes to the supplied writers.

use std::io::Write;

use anyhow::{Context, Result};

use crate::ai::{format_updates_for_prompt, Summarizer};
use crate::integrations::{PostedStatusUpdate, StatusUpdateStatus, StatusUpdateStore};

/// What a run should do after fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Summarize and post the summary
    Publish,
    /// Summarize and print, but do not post
    DryRun,
    /// Print the fetched records as JSON and stop
    DumpJson,
}

/// Options for a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Selected mode
    pub mode: RunMode,
    /// Status label for the posted summary
    pub status: StatusUpdateStatus,
    /// Project node ID to post to; defaults to the id returned by the fetch
    pub project_id: Option<String>,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The project had no status updates
    NoUpdates,
    /// Records were printed as JSON
    Dumped { count: usize },
    /// Summary was printed but not posted
    Previewed,
    /// Summary was posted
    Published(PostedStatusUpdate),
}

impl Outcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoUpdates => 1,
            _ => 0,
        }
    }
}

/// Runs the pipeline against a status store and a summarizer.
pub struct App<'a> {
    store: &'a dyn StatusUpdateStore,
    summarizer: &'a dyn Summarizer,
}

impl<'a> App<'a> {
    /// Create a new pipeline.
    pub fn new(store: &'a dyn StatusUpdateStore, summarizer: &'a dyn Summarizer) -> Self {
        Self { store, summarizer }
    }

    /// Execute one run.
    ///
    /// The summary and JSON dump go to `out`; progress and status messages
    /// go to `err`.
    pub async fn run(
        &self,
        options: &RunOptions,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<Outcome> {
        let history = self
            .store
            .fetch_status_updates()
            .await
            .context("Failed to fetch status updates")?;
        let updates = history.updates;

        if updates.is_empty() {
            writeln!(err, "No status updates found.")?;
            return Ok(Outcome::NoUpdates);
        }

        if options.mode == RunMode::DumpJson {
            let json = serde_json::to_string_pretty(&updates)?;
            writeln!(out, "{}", json)?;
            return Ok(Outcome::Dumped { count: updates.len() });
        }

        let updates_text = format_updates_for_prompt(&updates);
        writeln!(err, "Fetched {} status update(s). Summarizing...\n", updates.len())?;

        tracing::debug!(provider = self.summarizer.name(), "Summarizing status updates");
        let summary = self
            .summarizer
            .summarize(&updates_text)
            .await
            .context("Failed to summarize status updates")?;
        writeln!(out, "{}", summary)?;

        if options.mode == RunMode::DryRun {
            writeln!(err, "\n[dry-run] Summary was NOT posted.")?;
            return Ok(Outcome::Previewed);
        }

        let project_id = options.project_id.as_deref().unwrap_or(&history.project_id);
        let posted = self
            .store
            .post_status_update(project_id, &summary, options.status)
            .await
            .context("Failed to post status update")?;
        writeln!(err, "\nPosted status update: {} (created {})", posted.id, posted.created_at)?;

        Ok(Outcome::Published(posted))
    }
}
