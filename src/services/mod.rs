pub mod normalizer;
pub mod prompt;
pub mod providers;
pub mod recommendations;

pub use normalizer::{normalize, ParseFailure};
pub use prompt::{build_prompt, Prompt, RECOMMENDATION_COUNT};
pub use providers::{CompletionProvider, OpenAiProvider};
pub use recommendations::{RecommendationService, Recommender};
