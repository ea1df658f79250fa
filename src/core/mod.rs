//! Core types for status-digest.
//!
//! Configuration and credentials, loaded once at startup and threaded
//! into the API clients.

mod config;
mod credentials;

pub use config::{
    AnthropicConfig, Config, ConfigError, GitHubConfig, OwnerKind, ProjectConfig,
    ANTHROPIC_API_URL_ENV, DEFAULT_ANTHROPIC_API_URL, DEFAULT_GITHUB_API_URL, DEFAULT_MODEL,
    GITHUB_API_URL_ENV, MAX_PAGE_SIZE,
};
pub use credentials::{Credentials, Secret, ANTHROPIC_API_KEY_VAR, GITHUB_TOKEN_VARS};
