use std::sync::Arc;

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use hexaflix_core::error::HexaflixError;
use hexaflix_core::model::{SortBy, GENRE_CATALOG};
use hexaflix_core::tmdb::DiscoverQuery;
use serde::Deserialize;

use crate::error::AppError;
use crate::render::{DetailView, MovieCard, Pagination, Renderer};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(explore))
        .route("/movies/{id}", get(detail))
}

// -- Templates --

#[derive(Template)]
#[template(path = "explore.html")]
struct ExploreTemplate {
    movies: Vec<MovieCard>,
    genres: Vec<GenreOption>,
    sorts: Vec<SortOption>,
    year: String,
    pagination: Pagination,
}

struct GenreOption {
    id: u64,
    name: &'static str,
    selected: bool,
}

struct SortOption {
    value: String,
    label: &'static str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "detail.html")]
struct DetailTemplate {
    movie: DetailView,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    message: String,
}

// -- Query params --

/// Filter fields arrive as strings because an unset form select submits an
/// empty value; empty or malformed filters mean "no filter".
#[derive(Deserialize)]
pub struct ExploreParams {
    genre: Option<String>,
    sort: Option<String>,
    year: Option<String>,
    page: Option<u32>,
}

// -- Handlers --

async fn explore(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExploreParams>,
) -> Result<Response, AppError> {
    let Some(client) = state.tmdb() else {
        return Ok(Redirect::to("/setup").into_response());
    };

    // Unknown sort values fall back to the default rather than erroring.
    let sort: SortBy = params
        .sort
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();
    let genre: Option<u64> = params.genre.as_deref().and_then(|s| s.parse().ok());
    let year: Option<u16> = params.year.as_deref().and_then(|s| s.parse().ok());
    let page = params.page.unwrap_or(1).max(1);

    let query = DiscoverQuery {
        genre,
        sort,
        year,
        page,
    };
    let results = client.discover(&query).await?;

    let renderer = Renderer::new(&state.config.api.image_base_url);
    let href_for = |p: u32| {
        let mut href = format!("/movies?page={p}&sort={sort}");
        if let Some(genre) = genre {
            href.push_str(&format!("&genre={genre}"));
        }
        if let Some(year) = year {
            href.push_str(&format!("&year={year}"));
        }
        href
    };

    let tmpl = ExploreTemplate {
        movies: renderer.cards(&results.results),
        genres: GENRE_CATALOG
            .iter()
            .map(|&(id, name)| GenreOption {
                id,
                name,
                selected: genre == Some(id),
            })
            .collect(),
        sorts: [
            (SortBy::Popularity, "Most Popular"),
            (SortBy::ReleaseDate, "Newest"),
            (SortBy::Rating, "Top Rated"),
            (SortBy::Revenue, "Highest Grossing"),
        ]
        .into_iter()
        .map(|(value, label)| SortOption {
            value: value.to_string(),
            label,
            selected: sort == value,
        })
        .collect(),
        year: year.map(|y| y.to_string()).unwrap_or_default(),
        pagination: Pagination::new(page, results.total_pages, href_for),
    };
    Ok(Html(tmpl.render()?).into_response())
}

async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let Some(client) = state.tmdb() else {
        return Ok(Redirect::to("/setup").into_response());
    };

    let details = match client.fetch_movie(id).await {
        Ok(details) => details,
        Err(HexaflixError::NotFound(_)) => {
            let tmpl = ErrorTemplate {
                message: "Movie not found!".to_string(),
            };
            return Ok((StatusCode::NOT_FOUND, Html(tmpl.render()?)).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    // Viewing a detail page is what counts as "watched".
    state.profile.record_watched(&details.summary())?;
    let in_watchlist = state.profile.in_watchlist(id)?;

    let renderer = Renderer::new(&state.config.api.image_base_url);
    let tmpl = DetailTemplate {
        movie: renderer.detail(&details, in_watchlist),
    };
    Ok(Html(tmpl.render()?).into_response())
}
