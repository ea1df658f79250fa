//! # status-digest
//!
//! Summarize a GitHub Project's status-update history with Claude and post
//! the digest back to the project.
//!
//! The pipeline is linear: fetch every status update (oldest first), render
//! them into a prompt, ask the model for a markdown summary, then post the
//! summary as a new status update.
//!
//! ## Quick Start
//!
//! ```bash
//! # Preview the summary without posting it
//! status-digest --dry-run
//!
//! # Dump the raw status updates as JSON
//! status-digest --json
//!
//! # Summarize and post
//! status-digest
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::items_after_statements)]

pub mod ai;
pub mod app;
pub mod core;
pub mod integrations;

pub use ai::{AIError, ClaudeProvider, Summarizer};
pub use app::{App, Outcome, RunMode, RunOptions};
pub use core::{Config, Credentials};
pub use integrations::{
    GitHubProjects, PostedStatusUpdate, ProjectsError, StatusHistory, StatusUpdate,
    StatusUpdateStatus, StatusUpdateStore,
};
