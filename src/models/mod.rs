pub mod recommendation;
pub mod streaming_platform;

pub use recommendation::{
    validate_seed_title, ExclusionEntry, RecommendationRecord, RecommendationRequest,
    RecommendationResponse, WatchKey, MAX_SEED_TITLE_LEN,
};
pub use streaming_platform::StreamingPlatform;
