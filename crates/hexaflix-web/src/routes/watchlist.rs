use std::sync::Arc;

use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use hexaflix_core::model::MovieSummary;
use serde::Deserialize;

use crate::error::AppError;
use crate::render::{MovieCard, Renderer};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/watchlist", get(watchlist_page))
        .route("/history", get(history_page))
        .route("/movies/{id}/watchlist", post(toggle))
}

// -- Templates --

#[derive(Template)]
#[template(path = "watchlist.html")]
struct WatchlistTemplate {
    movies: Vec<MovieCard>,
}

#[derive(Template)]
#[template(path = "history.html")]
struct HistoryTemplate {
    movies: Vec<MovieCard>,
}

#[derive(Deserialize)]
pub struct ToggleForm {
    /// Where to land after the toggle; must be a site-local path.
    next: Option<String>,
}

// -- Handlers --

async fn watchlist_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let renderer = Renderer::new(&state.config.api.image_base_url);
    let tmpl = WatchlistTemplate {
        movies: renderer.cards(&state.profile.watchlist()?),
    };
    Ok(Html(tmpl.render()?))
}

async fn history_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let renderer = Renderer::new(&state.config.api.image_base_url);
    let tmpl = HistoryTemplate {
        movies: renderer.cards(&state.profile.watch_history()?),
    };
    Ok(Html(tmpl.render()?))
}

async fn toggle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Form(form): Form<ToggleForm>,
) -> Result<Response, AppError> {
    // Removal works straight off the stored set; only adding needs the
    // upstream record.
    let summary = if state.profile.in_watchlist(id)? {
        MovieSummary {
            id,
            title: String::new(),
            poster_path: None,
            release_date: String::new(),
        }
    } else {
        let Some(client) = state.tmdb() else {
            return Ok(Redirect::to("/setup").into_response());
        };
        client.fetch_movie(id).await?.summary()
    };

    let action = state.profile.toggle_watchlist(&summary)?;
    tracing::debug!("watchlist {action}: movie {id}");

    let target = match form.next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
        _ => format!("/movies/{id}"),
    };
    Ok(Redirect::to(&target).into_response())
}
