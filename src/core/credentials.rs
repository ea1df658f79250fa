//! API credentials.
//!
//! Credentials are read once from the process environment at startup and
//! handed to the API clients. Values are zeroed on drop and never printed.

use std::fmt;
use std::process::Command;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::config::ConfigError;

/// Environment variables checked for a GitHub token, in order.
pub const GITHUB_TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Environment variable holding the Anthropic API key.
pub const ANTHROPIC_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// A secret value that is zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret {
    value: String,
}

impl Secret {
    /// Create a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    /// Get the secret value.
    ///
    /// Note: Use sparingly and ensure the value is not logged.
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Check if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

// Prevent accidental logging of secrets
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([REDACTED])")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Credentials for the two external APIs.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Token for the GitHub GraphQL API
    pub github_token: Secret,

    /// Anthropic API key; only needed once a summary is requested
    pub anthropic_api_key: Option<Secret>,
}

impl Credentials {
    /// Read credentials from the environment.
    ///
    /// The GitHub token comes from `GITHUB_TOKEN`, then `GH_TOKEN`, then
    /// `gh auth token` when the GitHub CLI is installed and logged in.
    pub fn from_env() -> Result<Self, ConfigError> {
        let github_token = github_token_from_env().or_else(gh_cli_token).ok_or_else(|| {
            ConfigError::MissingCredential(
                "GitHub token not found. Set GITHUB_TOKEN or GH_TOKEN, or run `gh auth login`."
                    .to_string(),
            )
        })?;

        let anthropic_api_key = non_empty_var(ANTHROPIC_API_KEY_VAR).map(Secret::new);

        Ok(Self { github_token, anthropic_api_key })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn github_token_from_env() -> Option<Secret> {
    GITHUB_TOKEN_VARS.iter().find_map(|name| non_empty_var(name)).map(Secret::new)
}

fn gh_cli_token() -> Option<Secret> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        tracing::debug!("`gh auth token` failed; no GitHub CLI session");
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return None;
    }

    tracing::debug!("Using GitHub token from the gh CLI");
    Some(Secret::new(token))
}
