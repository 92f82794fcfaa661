use serde::{Deserialize, Serialize};

/// Minimal identifying record for a movie. Identity is `id`; a local copy
/// may go stale relative to the upstream source but is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    /// ISO date (`YYYY-MM-DD`) or empty when upstream has none.
    #[serde(default)]
    pub release_date: String,
}

impl MovieSummary {
    /// Release year, or empty string when the date is unknown.
    pub fn release_year(&self) -> &str {
        self.release_date.split('-').next().unwrap_or_default()
    }
}

/// Full detail record as returned by the `movie/{id}` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub overview: String,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub vote_average: f64,
}

impl MovieDetails {
    /// The summary record persisted in history and watchlist entries.
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            release_date: self.release_date.clone(),
        }
    }

    pub fn release_year(&self) -> &str {
        self.release_date.split('-').next().unwrap_or_default()
    }

    /// Comma-joined genre names for display.
    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// The browseable genre catalog offered in the explore filters.
pub const GENRE_CATALOG: &[(u64, &str)] = &[
    (28, "Action"),
    (35, "Comedy"),
    (18, "Drama"),
    (27, "Horror"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (53, "Thriller"),
];

/// Look up a catalog genre name by id.
pub fn genre_name(id: u64) -> Option<&'static str> {
    GENRE_CATALOG
        .iter()
        .find(|(gid, _)| *gid == id)
        .map(|(_, name)| *name)
}

/// One page of results from a list endpoint (popular, search, discover).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(default = "default_page")]
    pub page: u32,
    pub results: Vec<MovieSummary>,
    #[serde(default = "default_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

fn default_page() -> u32 {
    1
}

/// Sort orders accepted by the discover endpoint, mirroring the explore
/// filter options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Popularity,
    ReleaseDate,
    Rating,
    Revenue,
}

impl SortBy {
    /// The `sort_by` parameter value the upstream API expects.
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Popularity => "popularity.desc",
            Self::ReleaseDate => "release_date.desc",
            Self::Rating => "vote_average.desc",
            Self::Revenue => "revenue.desc",
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Popularity => write!(f, "popularity"),
            Self::ReleaseDate => write!(f, "release_date"),
            Self::Rating => write!(f, "rating"),
            Self::Revenue => write!(f, "revenue"),
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "popularity" | "popularity.desc" => Ok(Self::Popularity),
            "release_date" | "release_date.desc" | "newest" => Ok(Self::ReleaseDate),
            "rating" | "vote_average.desc" | "top_rated" => Ok(Self::Rating),
            "revenue" | "revenue.desc" => Ok(Self::Revenue),
            _ => Err(format!("unknown sort order: {s}")),
        }
    }
}
