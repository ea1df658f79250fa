//! External integrations module.
//!
//! Provides the GitHub Projects client used to read and post status updates.

pub mod github_projects;

pub use github_projects::{
    Actor, GitHubProjects, PostedStatusUpdate, ProjectsError, ProjectsResult, StatusHistory,
    StatusUpdate, StatusUpdateStatus, StatusUpdateStore,
};
