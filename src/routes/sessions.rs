use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::WatchKey,
    routes::AppState,
    session::SessionSnapshot,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(default)]
    pub favorite_movie: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub id: Uuid,
    pub session: SessionSnapshot,
}

/// Start a new, empty session
pub async fn create(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let (id, driver) = state.create_session().await;
    let session = driver.snapshot().await;

    (StatusCode::CREATED, Json(SessionCreatedResponse { id, session }))
}

/// Get the current session snapshot
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionSnapshot>> {
    let driver = state.session(id).await?;
    Ok(Json(driver.snapshot().await))
}

/// Submit a new search, resetting the session
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> AppResult<Json<SessionSnapshot>> {
    let Json(request) = payload?;
    let driver = state.session(id).await?;

    tracing::info!(session_id = %id, "Session search submitted");

    let snapshot = driver
        .submit(request.favorite_movie.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(snapshot))
}

/// Toggle the watched flag of a displayed recommendation
pub async fn toggle_watched(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<WatchKey>, JsonRejection>,
) -> AppResult<Json<SessionSnapshot>> {
    let Json(key) = payload?;
    let driver = state.session(id).await?;

    tracing::info!(session_id = %id, key = %key, "Watched toggled");

    Ok(Json(driver.toggle_watched(key).await?))
}

/// Discard a session
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.remove_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
