use hexaflix_core::model::{MovieDetails, MovieSummary};
use hexaflix_core::tmdb::{image_url, ImageSize};

/// Pure mapping from model records to template view-models. Owns nothing
/// but the image base URL; all formatting happens here so the templates
/// stay dumb.
pub struct Renderer {
    image_base: String,
}

/// Grid/carousel card. `poster` is empty when upstream has no artwork.
pub struct MovieCard {
    pub id: u64,
    pub title: String,
    pub year: String,
    pub poster: String,
}

pub struct HeroView {
    pub id: u64,
    pub title: String,
    pub backdrop: String,
}

pub struct DetailView {
    pub id: u64,
    pub title: String,
    pub release_date: String,
    pub runtime: String,
    pub genres: String,
    pub rating: String,
    pub overview: String,
    pub poster: String,
    pub in_watchlist: bool,
}

/// Pager state; `prev_href`/`next_href` are empty at the edges.
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub prev_href: String,
    pub next_href: String,
}

impl Pagination {
    /// `href_for` maps a page number to a link target.
    pub fn new(page: u32, total_pages: u32, href_for: impl Fn(u32) -> String) -> Self {
        let prev_href = if page > 1 {
            href_for(page - 1)
        } else {
            String::new()
        };
        let next_href = if page < total_pages {
            href_for(page + 1)
        } else {
            String::new()
        };
        Self {
            page,
            total_pages,
            prev_href,
            next_href,
        }
    }
}

impl Renderer {
    pub fn new(image_base: &str) -> Self {
        Self {
            image_base: image_base.to_string(),
        }
    }

    pub fn card(&self, movie: &MovieSummary) -> MovieCard {
        MovieCard {
            id: movie.id,
            title: movie.title.clone(),
            year: movie.release_year().to_string(),
            poster: image_url(&self.image_base, movie.poster_path.as_deref(), ImageSize::W300)
                .unwrap_or_default(),
        }
    }

    pub fn cards(&self, movies: &[MovieSummary]) -> Vec<MovieCard> {
        movies.iter().map(|m| self.card(m)).collect()
    }

    pub fn hero(&self, movie: &MovieSummary) -> HeroView {
        HeroView {
            id: movie.id,
            title: movie.title.clone(),
            backdrop: image_url(
                &self.image_base,
                movie.poster_path.as_deref(),
                ImageSize::Original,
            )
            .unwrap_or_default(),
        }
    }

    pub fn detail(&self, details: &MovieDetails, in_watchlist: bool) -> DetailView {
        DetailView {
            id: details.id,
            title: details.title.clone(),
            release_date: details.release_date.clone(),
            runtime: details
                .runtime
                .map(|m| format!("{m} min"))
                .unwrap_or_default(),
            genres: details.genre_names(),
            rating: format!("{:.1}", details.vote_average),
            overview: details.overview.clone(),
            poster: image_url(
                &self.image_base,
                details.poster_path.as_deref(),
                ImageSize::W500,
            )
            .unwrap_or_default(),
            in_watchlist,
        }
    }
}
