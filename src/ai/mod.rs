//! AI integration module.
//!
//! Turns a project's status-update history into a prose summary using a
//! language model.

mod claude;
pub mod prompt;

pub use claude::ClaudeProvider;
pub use prompt::{build_summary_prompt, format_updates_for_prompt};

use async_trait::async_trait;

/// Result type for AI operations.
pub type AIResult<T> = Result<T, AIError>;

/// Trait for summary providers.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize status updates already rendered by [`format_updates_for_prompt`].
    async fn summarize(&self, updates_text: &str) -> AIResult<String>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// AI error types.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    #[error("ANTHROPIC_API_KEY not set")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("No response from AI")]
    NoResponse,
}
