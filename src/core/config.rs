//! Configuration management for status-digest.
//!
//! Handles loading configuration from TOML files and applying
//! environment overrides for the API endpoints.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::integrations::StatusUpdateStatus;

/// Default GitHub API base URL.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default Anthropic API base URL.
pub const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com";

/// Default model used for summaries.
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";

/// Largest page GitHub accepts for `statusUpdates(first:)`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Environment variable overriding the GitHub API base URL.
pub const GITHUB_API_URL_ENV: &str = "STATUS_DIGEST_GITHUB_API_URL";

/// Environment variable overriding the Anthropic API base URL.
pub const ANTHROPIC_API_URL_ENV: &str = "STATUS_DIGEST_ANTHROPIC_API_URL";

/// Local config file name, looked up in the current directory.
const LOCAL_CONFIG_FILE: &str = ".status-digest.toml";

/// Errors raised while assembling configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project being summarized
    pub project: ProjectConfig,

    /// GitHub GraphQL settings
    pub github: GitHubConfig,

    /// Anthropic completion settings
    pub anthropic: AnthropicConfig,
}

/// Whether the project owner is a user or an organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    #[default]
    User,
    Organization,
}

impl OwnerKind {
    /// GraphQL root field used to look up the owner.
    pub fn graphql_field(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Organization => "organization",
        }
    }
}

/// The project board whose status updates are summarized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Owner login
    pub owner: String,

    /// Owner type
    pub owner_kind: OwnerKind,

    /// Project number under the owner
    pub number: u32,

    /// Project node id used when posting; falls back to the id returned by the query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,

    /// Display name used in the summary prompt
    pub name: String,

    /// Status label attached to posted summaries
    pub default_status: StatusUpdateStatus,
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// API base URL (the GraphQL endpoint is `{api_url}/graphql`)
    pub api_url: String,

    /// Records requested per page
    pub page_size: u32,

    /// Upper bound on pages fetched per run (0 disables the bound)
    pub max_pages: u32,

    /// Request timeout in seconds; the transport default applies when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Anthropic API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    /// API base URL (the endpoint is `{api_url}/v1/messages`)
    pub api_url: String,

    /// Model identifier
    pub model: String,

    /// Maximum output tokens
    pub max_tokens: u32,

    /// Request timeout in seconds; the transport default applies when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.status-digest.toml` in current directory
    /// 2. `~/.config/status-digest/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(global_config) = Self::config_dir().map(|d| d.join("config.toml")) {
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// A leading `~` or `$VAR` in the path is expanded.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let path = expand_path(path);
        let content = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        let config: Self =
            toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })?;
        Ok(config)
    }

    /// Apply endpoint overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(GITHUB_API_URL_ENV) {
            tracing::debug!(url = %url, "GitHub API URL overridden from environment");
            self.github.api_url = url;
        }
        if let Ok(url) = std::env::var(ANTHROPIC_API_URL_ENV) {
            tracing::debug!(url = %url, "Anthropic API URL overridden from environment");
            self.anthropic.api_url = url;
        }
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("status-digest"))
    }
}

impl GitHubConfig {
    /// Page size clamped to what the API accepts.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            owner: "e-straight".to_string(),
            owner_kind: OwnerKind::User,
            number: 2,
            node_id: None,
            name: "Elijah Backlog".to_string(),
            default_status: StatusUpdateStatus::OnTrack,
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            page_size: MAX_PAGE_SIZE,
            max_pages: 1000,
            timeout_secs: None,
        }
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_ANTHROPIC_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            timeout_secs: None,
        }
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use assert_fs::NamedTempFile;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.project.owner, "e-straight");
        assert_eq!(config.project.number, 2);
        assert_eq!(config.project.owner_kind, OwnerKind::User);
        assert!(config.project.node_id.is_none());
        assert_eq!(config.project.default_status, StatusUpdateStatus::OnTrack);
        assert_eq!(config.github.page_size, 100);
        assert!(config.github.timeout_secs.is_none());
        assert_eq!(config.anthropic.model, DEFAULT_MODEL);
        assert_eq!(config.anthropic.max_tokens, 4096);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let toml_str = r#"
            [project]
            owner = "acme"
            owner_kind = "organization"
            number = 7
            name = "Roadmap"
            default_status = "AT_RISK"

            [anthropic]
            model = "claude-sonnet-4-5"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.project.owner, "acme");
        assert_eq!(config.project.owner_kind, OwnerKind::Organization);
        assert_eq!(config.project.number, 7);
        assert_eq!(config.project.default_status, StatusUpdateStatus::AtRisk);
        assert_eq!(config.anthropic.model, "claude-sonnet-4-5");
        assert_eq!(config.anthropic.max_tokens, 4096);
        assert_eq!(config.github.api_url, DEFAULT_GITHUB_API_URL);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let mut github = GitHubConfig { page_size: 500, ..Default::default() };
        assert_eq!(github.effective_page_size(), 100);

        github.page_size = 0;
        assert_eq!(github.effective_page_size(), 1);

        github.page_size = 25;
        assert_eq!(github.effective_page_size(), 25);
    }

    #[test]
    fn test_owner_kind_graphql_field() {
        assert_eq!(OwnerKind::User.graphql_field(), "user");
        assert_eq!(OwnerKind::Organization.graphql_field(), "organization");
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let result = Config::load_from_file(Path::new("/nonexistent/status-digest.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_from_invalid_file_fails() {
        let file = NamedTempFile::new("broken.toml").unwrap();
        file.write_str("[project\nowner = ").unwrap();

        let result = Config::load_from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let file = NamedTempFile::new("status-digest.toml").unwrap();
        file.write_str(
            r#"
                [project]
                owner = "acme"

                [github]
                timeout_secs = 15
            "#,
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.project.owner, "acme");
        assert_eq!(config.github.timeout_secs, Some(15));
        assert!(config.anthropic.timeout_secs.is_none());
    }

    #[test]
    #[serial(endpoint_env)]
    fn test_env_overrides() {
        std::env::set_var(GITHUB_API_URL_ENV, "http://127.0.0.1:9000");
        std::env::set_var(ANTHROPIC_API_URL_ENV, "http://127.0.0.1:9001");

        let mut config = Config::default();
        config.apply_env_overrides();

        std::env::remove_var(GITHUB_API_URL_ENV);
        std::env::remove_var(ANTHROPIC_API_URL_ENV);

        assert_eq!(config.github.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.anthropic.api_url, "http://127.0.0.1:9001");
    }
}
