use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use hexaflix_core::config::HexaflixConfig;
use hexaflix_core::model::MovieSummary;
use hexaflix_core::store::{MemoryStore, Store};

use crate::routes;
use crate::AppState;

fn test_state() -> Arc<AppState> {
    let mut config = HexaflixConfig::default_config();
    config.storage.backend = "memory".to_string();
    Arc::new(AppState::new(config, Store::Memory(MemoryStore::new())))
}

fn app(state: &Arc<AppState>) -> axum::Router {
    routes::router().with_state(Arc::clone(state))
}

fn movie(id: u64, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/p{id}.jpg")),
        release_date: "2022-05-01".to_string(),
    }
}

async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, String) {
    let response = app(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).to_string())
}

async fn post_form(state: &Arc<AppState>, uri: &str, body: &str) -> axum::response::Response {
    app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_home_redirects_to_setup_without_key() {
    let state = test_state();
    let response = app(&state)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/setup");
}

#[tokio::test]
async fn test_explore_redirects_to_setup_without_key() {
    let state = test_state();
    let response = app(&state)
        .oneshot(Request::builder().uri("/movies").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_setup_page_renders() {
    let state = test_state();
    let (status, body) = get(&state, "/setup").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("API key"), "setup page should show the key form");
}

#[tokio::test]
async fn test_watchlist_page_renders_saved_movies() {
    let state = test_state();
    state.profile.toggle_watchlist(&movie(5, "Heat")).unwrap();

    let (status, body) = get(&state, "/watchlist").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Heat"));
}

#[tokio::test]
async fn test_history_page_renders_watched_movies() {
    let state = test_state();
    state.profile.record_watched(&movie(3, "Alien")).unwrap();

    let (status, body) = get(&state, "/history").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Alien"));
}

#[tokio::test]
async fn test_toggle_removal_needs_no_upstream() {
    let state = test_state();
    state.profile.toggle_watchlist(&movie(5, "Heat")).unwrap();

    let response = post_form(&state, "/movies/5/watchlist", "next=/watchlist").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/watchlist");
    assert!(!state.profile.in_watchlist(5).unwrap());
}

#[tokio::test]
async fn test_toggle_rejects_offsite_redirect() {
    let state = test_state();
    state.profile.toggle_watchlist(&movie(7, "Ran")).unwrap();

    let response = post_form(
        &state,
        "/movies/7/watchlist",
        "next=https://example.test/elsewhere",
    )
    .await;
    assert_eq!(response.headers()[header::LOCATION], "/movies/7");
}

#[tokio::test]
async fn test_api_watchlist_round_trips() {
    let state = test_state();
    state.profile.toggle_watchlist(&movie(1, "Heat")).unwrap();
    state.profile.toggle_watchlist(&movie(2, "Ran")).unwrap();

    let (status, body) = get(&state, "/api/v1/watchlist").await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<MovieSummary> = serde_json::from_str(&body).unwrap();
    let ids: Vec<u64> = listed.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_api_search_requires_key() {
    let state = test_state();
    let (status, body) = get(&state, "/api/v1/search?q=matrix").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("error"));
}

#[tokio::test]
async fn test_api_toggle_reports_removal() {
    let state = test_state();
    state.profile.toggle_watchlist(&movie(9, "Solaris")).unwrap();

    let response = post_form(&state, "/api/v1/movies/9/watchlist", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["status"], "removed");
    assert_eq!(parsed["movie_id"], 9);
}
