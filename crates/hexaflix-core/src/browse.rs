use std::collections::HashSet;

use crate::error::Result;
use crate::model::MovieSummary;
use crate::tmdb::{DiscoverQuery, TmdbClient};

/// Maximum entries shown per home-page section.
pub const SECTION_CAP: usize = 20;

const ACTION_GENRE: u64 = 28;
const COMEDY_GENRE: u64 = 35;

/// Assembled home page: a hero pick plus themed carousels.
#[derive(Debug, Clone)]
pub struct HomePage {
    pub hero: Option<MovieSummary>,
    pub sections: Vec<Section>,
}

/// One carousel row. A failed row keeps its slot so the page can render a
/// failure note in place while the other rows still show.
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub movies: Vec<MovieSummary>,
    pub failed: bool,
}

impl Section {
    fn ok(title: &str, movies: Vec<MovieSummary>) -> Self {
        Self {
            title: title.to_string(),
            movies,
            failed: false,
        }
    }

    fn failed(title: &str) -> Self {
        Self {
            title: title.to_string(),
            movies: Vec::new(),
            failed: true,
        }
    }
}

/// Fetch and assemble the home page rows: popular, now playing, Action,
/// Comedy. A movie id appearing in an earlier row is dropped from later
/// ones, and each row is capped at [`SECTION_CAP`]. Rows are fetched
/// independently; only when every row fails does the whole page fail.
pub async fn load_home(client: &TmdbClient) -> Result<HomePage> {
    let fetches: [(&str, Result<crate::model::Page>); 4] = [
        ("Popular Movies", client.popular(1).await),
        ("Newest Movies", client.now_playing(1).await),
        (
            "Action Movies",
            client.discover(&DiscoverQuery::default().with_genre(ACTION_GENRE)).await,
        ),
        (
            "Comedy Movies",
            client.discover(&DiscoverQuery::default().with_genre(COMEDY_GENRE)).await,
        ),
    ];

    let mut seen = HashSet::new();
    let mut sections = Vec::with_capacity(fetches.len());
    let mut first_error = None;

    for (title, fetched) in fetches {
        match fetched {
            Ok(page) => {
                sections.push(Section::ok(title, dedup_row(page.results, &mut seen)));
            }
            Err(e) => {
                tracing::warn!("home section '{title}' failed: {e}");
                first_error.get_or_insert(e);
                sections.push(Section::failed(title));
            }
        }
    }

    if sections.iter().all(|s| s.failed) {
        // Nothing rendered; surface the underlying cause (bad key, outage).
        return Err(first_error.expect("all-failed home page has an error"));
    }

    let hero = sections
        .iter()
        .find(|s| !s.failed)
        .and_then(|s| s.movies.first().cloned());

    Ok(HomePage { hero, sections })
}

/// Keep the first [`SECTION_CAP`] movies whose ids have not appeared in an
/// earlier row.
fn dedup_row(movies: Vec<MovieSummary>, seen: &mut HashSet<u64>) -> Vec<MovieSummary> {
    let mut row = Vec::new();
    for movie in movies {
        if seen.insert(movie.id) {
            row.push(movie);
        }
        if row.len() >= SECTION_CAP {
            break;
        }
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies(ids: &[u64]) -> Vec<MovieSummary> {
        ids.iter()
            .map(|&id| MovieSummary {
                id,
                title: format!("Movie {id}"),
                poster_path: None,
                release_date: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_dedup_row_drops_ids_seen_in_earlier_rows() {
        let mut seen = HashSet::new();
        let first = dedup_row(movies(&[1, 2, 3]), &mut seen);
        let second = dedup_row(movies(&[2, 3, 4, 5]), &mut seen);

        let ids = |row: &[MovieSummary]| row.iter().map(|m| m.id).collect::<Vec<_>>();
        assert_eq!(ids(&first), vec![1, 2, 3]);
        assert_eq!(ids(&second), vec![4, 5]);
    }

    #[test]
    fn test_dedup_row_drops_duplicates_within_a_row() {
        let mut seen = HashSet::new();
        let row = dedup_row(movies(&[7, 7, 8]), &mut seen);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_dedup_row_caps_length() {
        let ids: Vec<u64> = (1..=50).collect();
        let mut seen = HashSet::new();
        let row = dedup_row(movies(&ids), &mut seen);
        assert_eq!(row.len(), SECTION_CAP);
        assert_eq!(row.first().unwrap().id, 1);
        assert_eq!(row.last().unwrap().id, SECTION_CAP as u64);
    }
}
