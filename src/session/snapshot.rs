use serde::{Deserialize, Serialize};

use crate::{
    models::{RecommendationRecord, StreamingPlatform, WatchKey},
    session::state::{FetchKind, SessionState, SessionStatus},
};

/// Longest chain rendered in full by [`format_chain`]
const FULL_CHAIN_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTag {
    Idle,
    Fetching,
    Ready,
    Failed,
}

/// A displayed recommendation with its presentation flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationView {
    #[serde(flatten)]
    pub record: RecommendationRecord,
    /// `title-year` identity used by the watched toggle
    pub key: String,
    pub watched: bool,
    pub platform: StreamingPlatform,
    /// Label for `platform`, absent when it is not a recognised service
    pub platform_name: Option<String>,
}

/// Read-only view of a session for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: StatusTag,
    pub fetching: Option<FetchKind>,
    pub recommendations: Vec<RecommendationView>,
    pub watched: Vec<WatchKey>,
    pub watched_count: usize,
    pub seed_chain: Vec<String>,
    pub chain_summary: String,
    pub error: Option<String>,
}

impl From<&SessionState> for SessionSnapshot {
    fn from(state: &SessionState) -> Self {
        let (status, fetching, error) = match &state.status {
            SessionStatus::Idle => (StatusTag::Idle, None, None),
            SessionStatus::Fetching { kind, .. } => (StatusTag::Fetching, Some(*kind), None),
            SessionStatus::Ready => (StatusTag::Ready, None, None),
            SessionStatus::Failed { error } => (StatusTag::Failed, None, Some(error.clone())),
        };

        let recommendations = state
            .active_recommendations
            .iter()
            .map(|record| {
                let key = record.key();
                let platform = StreamingPlatform::from_availability(&record.streaming);
                RecommendationView {
                    key: key.to_string(),
                    watched: state.is_watched(&key),
                    platform_name: platform.display_name().map(str::to_string),
                    platform,
                    record: record.clone(),
                }
            })
            .collect();

        Self {
            status,
            fetching,
            recommendations,
            watched: state.watched_keys.iter().cloned().collect(),
            watched_count: state.watched_keys.len(),
            seed_chain: state.seed_chain.clone(),
            chain_summary: format_chain(&state.seed_chain),
            error,
        }
    }
}

/// Renders a seed chain as `A → B → ... → Y → Z`
///
/// Chains of up to four seeds are shown in full; longer ones keep the first
/// two and the last two.
pub fn format_chain(chain: &[String]) -> String {
    if chain.len() <= FULL_CHAIN_LEN {
        return chain.join(" → ");
    }

    format!(
        "{} → ... → {}",
        chain[..2].join(" → "),
        chain[chain.len() - 2..].join(" → ")
    )
}
