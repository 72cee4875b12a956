use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{validate_seed_title, RecommendationRequest, RecommendationResponse},
    routes::AppState,
};

/// Handler for the one-shot recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = payload?;
    let favorite_movie = validate_seed_title(request.favorite_movie.as_deref().unwrap_or_default())?;

    tracing::info!(
        favorite_movie = %favorite_movie,
        excluded = request.exclude_movies.len(),
        "Processing recommendation request"
    );

    let recommendations = state
        .recommender
        .recommend(favorite_movie, &request.exclude_movies)
        .await?;

    Ok(Json(RecommendationResponse { recommendations }))
}
