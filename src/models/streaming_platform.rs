use serde::{Deserialize, Serialize};

/// Streaming platform recognised from a record's free-text `streaming` field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StreamingPlatform {
    Netflix,
    PrimeVideo,
    Hulu,
    HboMax,
    AppleTvPlus,
    /// Unrecognised platform or "not available" text
    Other,
}

impl StreamingPlatform {
    /// Classifies availability text by case-insensitive substring, first match wins
    pub fn from_availability(streaming: &str) -> Self {
        let lower = streaming.to_lowercase();

        if lower.contains("netflix") {
            StreamingPlatform::Netflix
        } else if lower.contains("amazon") || lower.contains("prime") {
            StreamingPlatform::PrimeVideo
        } else if lower.contains("hulu") {
            StreamingPlatform::Hulu
        } else if lower.contains("hbo") {
            StreamingPlatform::HboMax
        } else if lower.contains("apple") {
            StreamingPlatform::AppleTvPlus
        } else {
            StreamingPlatform::Other
        }
    }

    pub fn display_name(&self) -> Option<&'static str> {
        match self {
            StreamingPlatform::Netflix => Some("Netflix"),
            StreamingPlatform::PrimeVideo => Some("Prime Video"),
            StreamingPlatform::Hulu => Some("Hulu"),
            StreamingPlatform::HboMax => Some("HBO Max"),
            StreamingPlatform::AppleTvPlus => Some("Apple TV+"),
            StreamingPlatform::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_platforms() {
        assert_eq!(
            StreamingPlatform::from_availability("NETFLIX"),
            StreamingPlatform::Netflix
        );
        assert_eq!(
            StreamingPlatform::from_availability("Amazon Prime Video"),
            StreamingPlatform::PrimeVideo
        );
        assert_eq!(
            StreamingPlatform::from_availability("Hulu"),
            StreamingPlatform::Hulu
        );
        assert_eq!(
            StreamingPlatform::from_availability("HBO Max"),
            StreamingPlatform::HboMax
        );
        assert_eq!(
            StreamingPlatform::from_availability("Apple TV+"),
            StreamingPlatform::AppleTvPlus
        );
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            StreamingPlatform::from_availability("Hulu, Netflix"),
            StreamingPlatform::Netflix
        );
    }

    #[test]
    fn test_unavailable_is_other() {
        let platform =
            StreamingPlatform::from_availability("Not available on major streaming platforms");
        assert_eq!(platform, StreamingPlatform::Other);
        assert_eq!(platform.display_name(), None);
    }
}
