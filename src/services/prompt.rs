use crate::models::ExclusionEntry;

/// Number of recommendations requested per call
pub const RECOMMENDATION_COUNT: usize = 5;

const SYSTEM_INSTRUCTION: &str = "You are a movie recommendation expert. \
Respond with only a JSON array of recommendation objects. \
Do not include any prose, explanations, or markdown code fences.";

/// System and user messages for one completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Builds the completion prompt for a seed title
///
/// The exclusion list is only advisory: the service may still return excluded
/// titles, so callers filter the result themselves.
pub fn build_prompt(seed_title: &str, exclude: &[ExclusionEntry]) -> Prompt {
    let mut user = format!(
        "Given the movie \"{seed_title}\", please recommend exactly {count} similar movies. \
For each recommendation, provide:\n\
1. title: the movie title\n\
2. year: the year it was released\n\
3. reason: a brief reason why it is similar (1-2 sentences)\n\
4. genre: the genre\n\
5. streaming: where to watch it (one of Netflix, Amazon Prime, Hulu, Disney+, HBO Max, Apple TV+, \
or \"Not available on major streaming platforms\")",
        count = RECOMMENDATION_COUNT,
    );

    if !exclude.is_empty() {
        let excluded = exclude
            .iter()
            .map(|entry| format!("{} ({})", entry.title, entry.year))
            .collect::<Vec<_>>()
            .join(", ");
        user.push_str("\n\nPlease exclude these movies from your recommendations: ");
        user.push_str(&excluded);
    }

    user.push_str(
        "\n\nFormat the response as a JSON array with objects containing: \
title, year, reason, genre, and streaming fields.",
    );

    Prompt {
        system: SYSTEM_INSTRUCTION.to_string(),
        user,
    }
}
