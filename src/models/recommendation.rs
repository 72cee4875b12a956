use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::{AppError, AppResult};

/// Longest seed title accepted from a user
pub const MAX_SEED_TITLE_LEN: usize = 100;

/// One recommended movie as returned by the completion service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationRecord {
    pub title: String,
    /// Release year as text; not validated as a number
    pub year: String,
    /// Short justification of the similarity
    pub reason: String,
    pub genre: String,
    /// Platform name(s) or an explicit "not available" sentence
    pub streaming: String,
}

impl RecommendationRecord {
    pub fn key(&self) -> WatchKey {
        WatchKey::new(self.title.clone(), self.year.clone())
    }
}

/// A title the next request should avoid suggesting again
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExclusionEntry {
    pub title: String,
    pub year: String,
}

/// Identity of a displayed recommendation, rendered as `title-year`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchKey {
    pub title: String,
    pub year: String,
}

impl WatchKey {
    pub fn new(title: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
        }
    }
}

impl Display for WatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.title, self.year)
    }
}

impl FromStr for WatchKey {
    type Err = AppError;

    /// Splits on the last `-` so hyphenated titles keep their hyphens
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.rsplit_once('-')
            .filter(|(title, _)| !title.is_empty())
            .map(|(title, year)| WatchKey::new(title, year))
            .ok_or_else(|| AppError::InvalidInput(format!("Malformed watch key: {}", s)))
    }
}

impl From<&WatchKey> for ExclusionEntry {
    fn from(key: &WatchKey) -> Self {
        Self {
            title: key.title.clone(),
            year: key.year.clone(),
        }
    }
}

/// Inbound body of `POST /api/recommendations`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub favorite_movie: Option<String>,
    #[serde(default)]
    pub exclude_movies: Vec<ExclusionEntry>,
}

/// Successful body of `POST /api/recommendations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendationRecord>,
}

/// Trims a seed title and rejects empty or overly long input
pub fn validate_seed_title(raw: &str) -> AppResult<&str> {
    let title = raw.trim();

    if title.is_empty() {
        return Err(AppError::InvalidInput(
            "Favorite movie is required".to_string(),
        ));
    }

    if title.chars().count() > MAX_SEED_TITLE_LEN {
        return Err(AppError::InvalidInput("Movie title is too long".to_string()));
    }

    Ok(title)
}
