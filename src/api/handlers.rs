use axum::{extract::State, http::StatusCode, Extension, Form, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{Recommendation, SnapshotStats};
use crate::services::rebuild::build_snapshot;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub movie: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationEntry {
    pub title: String,
    pub similarity: String,
}

impl From<Recommendation> for RecommendationEntry {
    fn from(recommendation: Recommendation) -> Self {
        Self {
            title: recommendation.title,
            similarity: recommendation.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendationEntry>,
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub movies: Vec<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Sorted, de-duplicated movie titles for the picker
pub async fn get_movies(State(state): State<AppState>) -> Json<MoviesResponse> {
    let movies = state.recommender.list_titles(state.title_list_limit);
    Json(MoviesResponse { movies })
}

fn recommendations_for(
    state: &AppState,
    request_id: &RequestId,
    movie: &str,
) -> Json<RecommendationsResponse> {
    let recommendations = state.recommender.recommend(movie);

    tracing::info!(
        request_id = %request_id,
        movie = %movie,
        count = recommendations.len(),
        "Recommendations served"
    );

    Json(RecommendationsResponse {
        recommendations: recommendations.into_iter().map(RecommendationEntry::from).collect(),
    })
}

/// Recommendations for a form-posted `movie` field
pub async fn recommend_form(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Form(request): Form<RecommendRequest>,
) -> Json<RecommendationsResponse> {
    recommendations_for(&state, &request_id, &request.movie)
}

/// Recommendations for a JSON body `{"movie": ...}`
pub async fn recommend_json(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendRequest>,
) -> Json<RecommendationsResponse> {
    recommendations_for(&state, &request_id, &request.movie)
}

/// Stats for the snapshot currently serving queries
pub async fn get_snapshot(State(state): State<AppState>) -> Json<SnapshotStats> {
    Json(state.store().current().stats())
}

/// Reloads the catalog and swaps in a freshly built snapshot
pub async fn rebuild(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<SnapshotStats>> {
    let _guard = state
        .rebuild_lock
        .try_lock()
        .map_err(|_| AppError::RebuildInProgress)?;

    tracing::info!(request_id = %request_id, "Rebuild requested");

    let catalog = state.catalog.clone();
    let options = state.build_options.clone();
    let snapshot = tokio::task::spawn_blocking(move || build_snapshot(catalog.as_ref(), &options))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let stats = snapshot.stats();
    state.store().replace(snapshot);

    tracing::info!(request_id = %request_id, version = stats.version, "Rebuild completed");

    Ok(Json(stats))
}
