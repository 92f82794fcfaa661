use std::sync::Arc;

use askama::Template;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::error::AppError;
use crate::render::{MovieCard, Pagination, Renderer};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/search", get(search))
}

#[derive(Template)]
#[template(path = "search.html")]
struct SearchTemplate {
    query: String,
    movies: Vec<MovieCard>,
    pagination: Pagination,
}

#[derive(Deserialize)]
pub struct SearchParams {
    query: Option<String>,
    page: Option<u32>,
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let Some(client) = state.tmdb() else {
        return Ok(Redirect::to("/setup").into_response());
    };

    let query = params.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Ok(Redirect::to("/").into_response());
    }
    let page = params.page.unwrap_or(1).max(1);

    let results = client.search(&query, page).await?;
    let renderer = Renderer::new(&state.config.api.image_base_url);

    let encoded = urlencode(&query);
    let tmpl = SearchTemplate {
        movies: renderer.cards(&results.results),
        pagination: Pagination::new(page, results.total_pages, |p| {
            format!("/search?query={encoded}&page={p}")
        }),
        query,
    };
    Ok(Html(tmpl.render()?).into_response())
}

/// Minimal query-string escaping for the pager links.
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlencode() {
        assert_eq!(urlencode("fight club"), "fight+club");
        assert_eq!(urlencode("amélie"), "am%C3%A9lie");
        assert_eq!(urlencode("plain-1.0_~"), "plain-1.0_~");
    }
}
