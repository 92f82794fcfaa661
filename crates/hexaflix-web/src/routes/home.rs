use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use hexaflix_core::browse;

use crate::error::AppError;
use crate::render::{HeroView, MovieCard, Renderer};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(home))
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    hero: Option<HeroView>,
    sections: Vec<SectionView>,
    recent: Vec<MovieCard>,
}

struct SectionView {
    title: String,
    failed: bool,
    movies: Vec<MovieCard>,
}

async fn home(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let Some(client) = state.tmdb() else {
        return Ok(Redirect::to("/setup").into_response());
    };

    let page = browse::load_home(&client).await?;
    let renderer = Renderer::new(&state.config.api.image_base_url);

    let recent = renderer.cards(&state.profile.watch_history()?);
    let sections = page
        .sections
        .into_iter()
        .map(|s| SectionView {
            title: s.title,
            failed: s.failed,
            movies: renderer.cards(&s.movies),
        })
        .collect();

    let tmpl = HomeTemplate {
        hero: page.hero.as_ref().map(|h| renderer.hero(h)),
        sections,
        recent,
    };
    Ok(Html(tmpl.render()?).into_response())
}
