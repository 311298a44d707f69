use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::{AvailabilitySnapshot, SearchResult};
use crate::services::score::{self, ScoreAnalysis, BIN_COUNT};

use super::AppState;

/// How many ratings back one movie's histogram
const RATINGS_SAMPLE_SIZE: u32 = 1000;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: String,
}

#[derive(Debug, Serialize)]
pub struct HistogramResponse {
    pub movie_id: i64,
    pub histogram: [u32; BIN_COUNT],
    pub average: f64,
    pub total: u32,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub ratings: Vec<f64>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Keyword search over the catalog with archive supplement
///
/// Always responds 200 with a list; a dead upstream shows up as an empty
/// list, not an error.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<SearchResult>> {
    let results = state.search.search(&params.q).await;
    Json(results)
}

/// Provider availability for one movie
pub async fn availability(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<AvailabilitySnapshot>> {
    let providers = state.catalog.availability(movie_id).await?;

    Ok(Json(AvailabilitySnapshot {
        movie_id,
        providers,
        cached_at: Utc::now(),
    }))
}

/// Half-point star histogram for one movie's ratings
pub async fn movie_histogram(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<HistogramResponse>> {
    let ratings = state
        .catalog
        .ratings(movie_id, 0, RATINGS_SAMPLE_SIZE)
        .await?;

    let stars: Vec<f64> = ratings.iter().filter_map(|r| r.stars).collect();
    let analysis = score::analyze(&stars);

    Ok(Json(HistogramResponse {
        movie_id,
        histogram: analysis.counts,
        average: analysis.average,
        total: analysis.total,
    }))
}

/// Score analysis over a caller-supplied list of star values
pub async fn score_analysis(Json(request): Json<AnalysisRequest>) -> Json<ScoreAnalysis> {
    Json(score::analyze(&request.ratings))
}
