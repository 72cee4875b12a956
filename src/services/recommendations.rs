use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{validate_seed_title, ExclusionEntry, RecommendationRecord},
    services::{normalizer::normalize, prompt::build_prompt, providers::CompletionProvider},
};

/// Source of recommendations for a seed title
///
/// The session driver depends on this rather than on a concrete provider so
/// tests can script results without any network stack.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(
        &self,
        seed_title: &str,
        exclude: &[ExclusionEntry],
    ) -> AppResult<Vec<RecommendationRecord>>;
}

/// Generates recommendations by prompting a completion provider and
/// normalizing its free-form answer
pub struct RecommendationService {
    provider: Arc<dyn CompletionProvider>,
    temperature: f32,
}

impl RecommendationService {
    pub fn new(provider: Arc<dyn CompletionProvider>, temperature: f32) -> Self {
        Self {
            provider,
            temperature,
        }
    }
}

#[async_trait::async_trait]
impl Recommender for RecommendationService {
    async fn recommend(
        &self,
        seed_title: &str,
        exclude: &[ExclusionEntry],
    ) -> AppResult<Vec<RecommendationRecord>> {
        let seed_title = validate_seed_title(seed_title)?;
        let prompt = build_prompt(seed_title, exclude);

        tracing::info!(
            seed = %seed_title,
            excluded = exclude.len(),
            provider = self.provider.name(),
            "Requesting recommendations"
        );

        let raw = self
            .provider
            .complete(&prompt.system, &prompt.user, self.temperature)
            .await?;

        let recommendations = normalize(&raw)?;

        tracing::info!(
            seed = %seed_title,
            results = recommendations.len(),
            "Recommendations generated"
        );

        Ok(recommendations)
    }
}
