use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use hexaflix_core::model::{MovieDetails, MovieSummary, Page};
use hexaflix_core::profile::WatchlistAction;
use hexaflix_core::tmdb::TmdbClient;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/search", get(search))
        .route("/api/v1/movies/{id}", get(movie_detail))
        .route("/api/v1/movies/{id}/watchlist", post(toggle_watchlist))
        .route("/api/v1/watchlist", get(watchlist))
        .route("/api/v1/history", get(history))
}

// -- Request/Response types --

#[derive(Deserialize)]
pub struct SearchParams {
    q: String,
    #[serde(default = "default_page")]
    page: u32,
}

fn default_page() -> u32 {
    1
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub movie_id: u64,
    pub status: WatchlistAction,
}

// -- Handlers --

fn require_client(state: &AppState) -> Result<Arc<TmdbClient>, ApiError> {
    state
        .tmdb()
        .ok_or_else(|| ApiError::unauthorized("no API key configured"))
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page>, ApiError> {
    let client = require_client(&state)?;
    Ok(Json(client.search(&params.q, params.page).await?))
}

async fn movie_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<MovieDetails>, ApiError> {
    let client = require_client(&state)?;
    Ok(Json(client.fetch_movie(id).await?))
}

async fn toggle_watchlist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let summary = if state.profile.in_watchlist(id)? {
        MovieSummary {
            id,
            title: String::new(),
            poster_path: None,
            release_date: String::new(),
        }
    } else {
        let client = require_client(&state)?;
        client.fetch_movie(id).await?.summary()
    };

    let status = state.profile.toggle_watchlist(&summary)?;
    Ok(Json(ToggleResponse {
        movie_id: id,
        status,
    }))
}

async fn watchlist(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MovieSummary>>, ApiError> {
    Ok(Json(state.profile.watchlist()?))
}

async fn history(State(state): State<Arc<AppState>>) -> Result<Json<Vec<MovieSummary>>, ApiError> {
    Ok(Json(state.profile.watch_history()?))
}
