use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use hexaflix_core::config::HexaflixConfig;
use hexaflix_core::model::{MovieDetails, MovieSummary, Session, GENRE_CATALOG};
use hexaflix_core::profile::Profile;
use hexaflix_core::store::{create_store, KeyValueStore, Store};
use hexaflix_core::tmdb::{DiscoverQuery, TmdbClient};

#[derive(Parser)]
#[command(name = "hexaflix", about = "HexaFlix: movie search, browsing, and watchlist", version)]
enum Cli {
    /// Validate and save a TMDb API key
    Init {
        /// The API key to save
        #[arg(long)]
        api_key: String,
        /// Optional profile name; namespaces the watchlist and history
        #[arg(long)]
        username: Option<String>,
        /// Only validate the key, don't save anything
        #[arg(long)]
        check: bool,
    },
    /// Search movies by title
    Search {
        /// Search query
        query: String,
        /// Result page
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Output raw JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Browse the discover listing with filters
    Browse {
        /// Genre name or id (action, comedy, drama, horror, romance, science fiction, thriller)
        #[arg(short, long)]
        genre: Option<String>,
        /// Sort order (popularity, release_date, rating, revenue)
        #[arg(short, long)]
        sort: Option<String>,
        /// Release year
        #[arg(short, long)]
        year: Option<u16>,
        /// Result page
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Output raw JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Show full details for a movie and record it as watched
    Show {
        /// Movie id
        id: u64,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the watchlist
    Watchlist {
        #[command(subcommand)]
        command: WatchlistCommand,
    },
    /// Show recently viewed movies
    History {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Show configuration and session status
    Status,
    /// Clear the saved session
    Logout,
}

#[derive(Subcommand)]
enum WatchlistCommand {
    /// List saved movies
    List {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Add or remove a movie by id
    Toggle {
        /// Movie id
        id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hexaflix=warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config =
        HexaflixConfig::load(Some(Path::new("."))).unwrap_or_else(|_| HexaflixConfig::default_config());
    let store = create_store(&config)?;
    let profile = Profile::new(store);

    match cli {
        Cli::Init {
            api_key,
            username,
            check,
        } => init(&config, &profile, api_key, username, check).await,
        Cli::Search { query, page, json } => {
            let client = client_for(&config, &profile)?;
            let results = client.search(&query, page).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&results.results)?);
            } else {
                println!(
                    "{} results for \"{query}\" (page {} of {})",
                    results.total_results.to_string().bold(),
                    results.page,
                    results.total_pages
                );
                print_movies(&results.results);
            }
            Ok(())
        }
        Cli::Browse {
            genre,
            sort,
            year,
            page,
            json,
        } => {
            let client = client_for(&config, &profile)?;
            let query = DiscoverQuery {
                genre: genre.as_deref().map(parse_genre).transpose()?,
                sort: match sort.as_deref() {
                    Some(s) => s.parse().map_err(|e: String| anyhow::anyhow!(e))?,
                    None => Default::default(),
                },
                year,
                page,
            };
            let results = client.discover(&query).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&results.results)?);
            } else {
                println!(
                    "Page {} of {} ({} movies)",
                    results.page,
                    results.total_pages,
                    results.total_results.to_string().bold()
                );
                print_movies(&results.results);
            }
            Ok(())
        }
        Cli::Show { id, json } => {
            let client = client_for(&config, &profile)?;
            let details = client.fetch_movie(id).await?;
            profile.record_watched(&details.summary())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&details)?);
            } else {
                print_details(&details, profile.in_watchlist(id)?);
            }
            Ok(())
        }
        Cli::Watchlist { command } => match command {
            WatchlistCommand::List { json } => {
                let movies = profile.watchlist()?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&movies)?);
                } else if movies.is_empty() {
                    println!("{}", "Watchlist is empty.".dimmed());
                } else {
                    print_movies(&movies);
                }
                Ok(())
            }
            WatchlistCommand::Toggle { id } => {
                // Removal works straight off the stored set; adding fetches
                // the record so the stored entry is complete.
                let summary = if profile.in_watchlist(id)? {
                    MovieSummary {
                        id,
                        title: String::new(),
                        poster_path: None,
                        release_date: String::new(),
                    }
                } else {
                    let client = client_for(&config, &profile)?;
                    client.fetch_movie(id).await?.summary()
                };
                let action = profile.toggle_watchlist(&summary)?;
                println!("{} movie {id}", action.to_string().green());
                Ok(())
            }
        },
        Cli::History { json } => {
            let movies = profile.watch_history()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&movies)?);
            } else if movies.is_empty() {
                println!("{}", "No watch history yet.".dimmed());
            } else {
                print_movies(&movies);
            }
            Ok(())
        }
        Cli::Status => status(&config, &profile),
        Cli::Logout => {
            profile.logout()?;
            println!("Session cleared.");
            Ok(())
        }
    }
}

async fn init(
    config: &HexaflixConfig,
    profile: &Profile<Store>,
    api_key: String,
    username: Option<String>,
    check: bool,
) -> Result<()> {
    let client = TmdbClient::new(api_key.clone(), &config.api)?;
    if !client.validate_key().await? {
        bail!("the metadata API rejected this key");
    }
    if check {
        println!("{} API key is valid", "ok:".green().bold());
        return Ok(());
    }

    let mut session = Session::new(api_key);
    if let Some(name) = username {
        session = session.with_username(name);
    }
    profile.login(&session)?;
    println!("{} API key saved", "ok:".green().bold());
    Ok(())
}

fn status(config: &HexaflixConfig, profile: &Profile<Store>) -> Result<()> {
    println!("{}", "HexaFlix status".bold());
    println!("  api base:  {}", config.api.base_url);
    println!("  storage:   {}", config.storage.backend);

    match profile.session()? {
        Some(session) => {
            println!("  session:   {}", "active".green());
            if let Some(username) = &session.username {
                println!("  profile:   {username}");
            }
            println!("  since:     {}", session.created_at.format("%Y-%m-%d"));
        }
        None => match config.configured_api_key() {
            Some(_) => println!("  session:   {} (key from config/env)", "none".yellow()),
            None => println!(
                "  session:   {} (run `hexaflix init --api-key <KEY>`)",
                "none".red()
            ),
        },
    }

    println!("  watchlist: {} movies", profile.watchlist()?.len());
    println!("  history:   {} movies", profile.watch_history()?.len());
    Ok(())
}

/// Resolve the session or configured key into a live client.
fn client_for<S: KeyValueStore>(
    config: &HexaflixConfig,
    profile: &Profile<S>,
) -> Result<TmdbClient> {
    let key = profile
        .session()?
        .map(|s| s.api_key)
        .or_else(|| config.configured_api_key())
        .context("no API key configured; run `hexaflix init --api-key <KEY>` first")?;
    Ok(TmdbClient::new(key, &config.api)?)
}

/// Accept a catalog genre by name (case-insensitive) or raw id.
fn parse_genre(input: &str) -> Result<u64> {
    if let Ok(id) = input.parse::<u64>() {
        return Ok(id);
    }
    let lowered = input.to_lowercase();
    GENRE_CATALOG
        .iter()
        .find(|(_, name)| name.to_lowercase() == lowered)
        .map(|(id, _)| *id)
        .with_context(|| {
            let names: Vec<&str> = GENRE_CATALOG.iter().map(|(_, n)| *n).collect();
            format!("unknown genre '{input}', valid: {}", names.join(", "))
        })
}

fn print_movies(movies: &[MovieSummary]) {
    for movie in movies {
        println!(
            "  {:>9}  {} {}",
            movie.id.to_string().cyan(),
            movie.title.bold(),
            format!("({})", movie.release_year()).dimmed()
        );
    }
}

fn print_details(details: &MovieDetails, in_watchlist: bool) {
    println!("{} {}", details.title.bold(), format!("({})", details.release_year()).dimmed());
    let mut meta = Vec::new();
    if let Some(runtime) = details.runtime {
        meta.push(format!("{runtime} min"));
    }
    if !details.genres.is_empty() {
        meta.push(details.genre_names());
    }
    meta.push(format!("rated {:.1}", details.vote_average));
    println!("  {}", meta.join(" | "));
    if !details.overview.is_empty() {
        println!("\n  {}", details.overview);
    }
    if in_watchlist {
        println!("\n  {}", "on your watchlist".green());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_genre_by_id() {
        assert_eq!(parse_genre("28").unwrap(), 28);
    }

    #[test]
    fn test_parse_genre_by_name() {
        assert_eq!(parse_genre("Comedy").unwrap(), 35);
        assert_eq!(parse_genre("science fiction").unwrap(), 878);
    }

    #[test]
    fn test_parse_genre_unknown() {
        assert!(parse_genre("western").is_err());
    }
}
