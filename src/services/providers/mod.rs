/// Text completion providers
///
/// The recommendation pipeline only needs "prompt in, text out". Providers are
/// swappable behind this trait so tests can substitute canned completions.
use crate::error::AppResult;

pub mod openai;

pub use openai::OpenAiProvider;

/// Trait for chat completion services
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Completes a system + user prompt pair, returning the raw assistant text
    ///
    /// No formatting guarantee is made about the returned text.
    async fn complete(&self, system: &str, user: &str, temperature: f32) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
