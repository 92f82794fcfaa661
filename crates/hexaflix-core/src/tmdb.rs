use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::{HexaflixError, Result};
use crate::model::{MovieDetails, Page, SortBy};

const USER_AGENT: &str = concat!("hexaflix/", env!("CARGO_PKG_VERSION"));

/// Client for the TMDb-compatible movie metadata API.
///
/// Every call is a plain HTTPS GET with the `api_key` query parameter and a
/// bounded timeout. No caching, no retries; transient failures surface to
/// the caller.
pub struct TmdbClient {
    http: Client,
    base_url: String,
    image_base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(api_key: String, config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            image_base_url: config.image_base_url.clone(),
            api_key,
            language: config.language.clone(),
        })
    }

    /// Check whether the configured API key is accepted upstream.
    ///
    /// Probes the popular listing: 401 means a bad key, any 2xx means a
    /// good one. Other failures propagate so a network outage is not
    /// reported as an invalid key.
    pub async fn validate_key(&self) -> Result<bool> {
        match self.get_json::<Page>("movie/popular", &[]).await {
            Ok(_) => Ok(true),
            Err(HexaflixError::Api { status: 401, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetch full details for one movie. 404 maps to [`HexaflixError::NotFound`].
    pub async fn fetch_movie(&self, id: u64) -> Result<MovieDetails> {
        self.get_json(&format!("movie/{id}"), &[]).await
    }

    /// Search movies by title.
    pub async fn search(&self, query: &str, page: u32) -> Result<Page> {
        if query.trim().is_empty() {
            return Err(HexaflixError::InvalidInput(
                "search query cannot be empty".into(),
            ));
        }
        self.get_json(
            "search/movie",
            &[
                ("query", query.to_string()),
                ("page", page.max(1).to_string()),
            ],
        )
        .await
    }

    /// Currently popular movies.
    pub async fn popular(&self, page: u32) -> Result<Page> {
        self.get_json("movie/popular", &[("page", page.max(1).to_string())])
            .await
    }

    /// Movies currently in theaters.
    pub async fn now_playing(&self, page: u32) -> Result<Page> {
        self.get_json("movie/now_playing", &[("page", page.max(1).to_string())])
            .await
    }

    /// Filtered discovery listing (genre, sort order, release year).
    pub async fn discover(&self, query: &DiscoverQuery) -> Result<Page> {
        self.get_json("discover/movie", &query.params()).await
    }

    /// Full image URL for a poster path at the given width.
    pub fn image_url(&self, path: Option<&str>, size: ImageSize) -> Option<String> {
        image_url(&self.image_base_url, path, size)
    }

    // -- internals --

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("GET {path} failed: {status}");
            return Err(api_error(path, status, &body));
        }

        Ok(response.json().await?)
    }
}

/// Upstream error envelope (`{"status_code": .., "status_message": ".."}`).
#[derive(Deserialize)]
struct ApiErrorBody {
    status_message: String,
}

fn api_error(path: &str, status: StatusCode, body: &str) -> HexaflixError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.status_message)
        .unwrap_or_else(|_| body.trim().to_string());

    if status == StatusCode::NOT_FOUND {
        return HexaflixError::NotFound(path.to_string());
    }
    HexaflixError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Full image URL for a poster/backdrop path at the given width.
pub fn image_url(base: &str, path: Option<&str>, size: ImageSize) -> Option<String> {
    let path = path?;
    Some(format!("{base}/{}{path}", size.segment()))
}

/// Poster/backdrop widths the front-ends request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Card thumbnails.
    W300,
    /// Detail-page posters.
    W500,
    /// Hero backdrops.
    Original,
}

impl ImageSize {
    fn segment(&self) -> &'static str {
        match self {
            Self::W300 => "w300",
            Self::W500 => "w500",
            Self::Original => "original",
        }
    }
}

/// Parameters for the discover endpoint.
#[derive(Debug, Clone, Default)]
pub struct DiscoverQuery {
    pub genre: Option<u64>,
    pub sort: SortBy,
    pub year: Option<u16>,
    pub page: u32,
}

impl DiscoverQuery {
    pub fn with_genre(mut self, genre: u64) -> Self {
        self.genre = Some(genre);
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sort_by", self.sort.as_param().to_string()),
            ("page", self.page.max(1).to_string()),
        ];
        if let Some(genre) = self.genre {
            params.push(("with_genres", genre.to_string()));
        }
        if let Some(year) = self.year {
            params.push(("primary_release_year", year.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn client() -> TmdbClient {
        TmdbClient::new("test-key".into(), &ApiConfig::default()).unwrap()
    }

    #[test]
    fn test_discover_params_default() {
        let params = DiscoverQuery::default().params();
        assert!(params.contains(&("sort_by", "popularity.desc".to_string())));
        assert!(params.contains(&("page", "1".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "with_genres"));
    }

    #[test]
    fn test_discover_params_full() {
        let query = DiscoverQuery {
            genre: Some(35),
            sort: SortBy::Rating,
            year: Some(1999),
            page: 3,
        };
        let params = query.params();
        assert!(params.contains(&("sort_by", "vote_average.desc".to_string())));
        assert!(params.contains(&("page", "3".to_string())));
        assert!(params.contains(&("with_genres", "35".to_string())));
        assert!(params.contains(&("primary_release_year", "1999".to_string())));
    }

    #[test]
    fn test_image_url() {
        let c = client();
        assert_eq!(
            c.image_url(Some("/poster.jpg"), ImageSize::W300).unwrap(),
            "https://image.tmdb.org/t/p/w300/poster.jpg"
        );
        assert!(c.image_url(None, ImageSize::W500).is_none());
    }

    #[test]
    fn test_api_error_parses_upstream_envelope() {
        let err = api_error(
            "movie/1",
            StatusCode::UNAUTHORIZED,
            r#"{"status_code": 7, "status_message": "Invalid API key"}"#,
        );
        match err {
            HexaflixError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_api_error_maps_404_to_not_found() {
        let err = api_error("movie/999", StatusCode::NOT_FOUND, "{}");
        assert!(matches!(err, HexaflixError::NotFound(_)));
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let err = api_error("movie/1", StatusCode::BAD_GATEWAY, "upstream down");
        match err {
            HexaflixError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
                assert!(HexaflixError::Api { status, message }.is_transient());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
