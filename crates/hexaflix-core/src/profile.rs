use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{validate_api_key, MovieSummary, Session};
use crate::store::KeyValueStore;

/// Most recently viewed movies kept in history; oldest evicted first.
pub const HISTORY_CAPACITY: usize = 7;

const SESSION_KEY: &str = "session";
const HISTORY_KEY: &str = "history";
const WATCHLIST_KEY: &str = "watchlist";

/// Outcome of a watchlist toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchlistAction {
    Added,
    Removed,
}

impl std::fmt::Display for WatchlistAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// Per-profile persisted state: session credential, bounded watch history,
/// and watchlist. An explicit context object over a [`KeyValueStore`];
/// operations read, modify, and write whole JSON documents, so every
/// mutation persists the full set.
///
/// When the active session carries a username, history and watchlist keys
/// are namespaced `history_<username>` / `watchlist_<username>`.
pub struct Profile<S> {
    store: S,
}

impl<S: KeyValueStore> Profile<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // -- session --

    /// The active session, or `None` when absent or expired.
    pub fn session(&self) -> Result<Option<Session>> {
        let Some(raw) = self.store.get(SESSION_KEY)? else {
            return Ok(None);
        };
        let session: Session = serde_json::from_str(&raw)?;
        if session.is_expired() {
            tracing::debug!("session expired, treating as absent");
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Validate and persist a session credential.
    pub fn login(&self, session: &Session) -> Result<()> {
        validate_api_key(&session.api_key)?;
        self.store.set(SESSION_KEY, &serde_json::to_string(session)?)
    }

    /// Drop the active session. History and watchlist stay on disk.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(SESSION_KEY)
    }

    // -- watch history --

    /// Append a movie to the watch history unless its id is already
    /// present; evict the oldest entry once the list exceeds
    /// [`HISTORY_CAPACITY`].
    pub fn record_watched(&self, movie: &MovieSummary) -> Result<()> {
        let key = self.scoped_key(HISTORY_KEY)?;
        let mut history = self.read_list(&key)?;

        if history.iter().any(|m| m.id == movie.id) {
            return Ok(());
        }

        history.push(movie.clone());
        if history.len() > HISTORY_CAPACITY {
            history.remove(0);
        }
        self.write_list(&key, &history)
    }

    /// Watch history in insertion order.
    pub fn watch_history(&self) -> Result<Vec<MovieSummary>> {
        let key = self.scoped_key(HISTORY_KEY)?;
        self.read_list(&key)
    }

    // -- watchlist --

    /// Remove the movie when present, append it when absent. The full set
    /// is persisted on every mutation.
    pub fn toggle_watchlist(&self, movie: &MovieSummary) -> Result<WatchlistAction> {
        let key = self.scoped_key(WATCHLIST_KEY)?;
        let mut watchlist = self.read_list(&key)?;

        let action = if watchlist.iter().any(|m| m.id == movie.id) {
            watchlist.retain(|m| m.id != movie.id);
            WatchlistAction::Removed
        } else {
            watchlist.push(movie.clone());
            WatchlistAction::Added
        };

        self.write_list(&key, &watchlist)?;
        Ok(action)
    }

    pub fn in_watchlist(&self, id: u64) -> Result<bool> {
        Ok(self.watchlist()?.iter().any(|m| m.id == id))
    }

    /// Saved movies; insertion order is preserved but not contracted.
    pub fn watchlist(&self) -> Result<Vec<MovieSummary>> {
        let key = self.scoped_key(WATCHLIST_KEY)?;
        self.read_list(&key)
    }

    // -- internals --

    fn scoped_key(&self, base: &str) -> Result<String> {
        let username = self.session()?.and_then(|s| s.username);
        Ok(match username {
            Some(name) => format!("{base}_{name}"),
            None => base.to_string(),
        })
    }

    fn read_list(&self, key: &str) -> Result<Vec<MovieSummary>> {
        match self.store.get(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_list(&self, key: &str, movies: &[MovieSummary]) -> Result<()> {
        self.store.set(key, &serde_json::to_string(movies)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {id}"),
            poster_path: Some(format!("/p{id}.jpg")),
            release_date: "2023-01-01".to_string(),
        }
    }

    fn profile() -> Profile<MemoryStore> {
        Profile::new(MemoryStore::new())
    }

    #[test]
    fn test_history_starts_empty() {
        assert!(profile().watch_history().unwrap().is_empty());
    }

    #[test]
    fn test_history_records_in_insertion_order() {
        let p = profile();
        for id in 1..=3 {
            p.record_watched(&movie(id)).unwrap();
        }
        let ids: Vec<u64> = p.watch_history().unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_history_record_is_idempotent() {
        let p = profile();
        p.record_watched(&movie(1)).unwrap();
        p.record_watched(&movie(2)).unwrap();
        let before = p.watch_history().unwrap();

        p.record_watched(&movie(2)).unwrap();
        assert_eq!(p.watch_history().unwrap(), before);
    }

    #[test]
    fn test_history_never_exceeds_capacity_or_duplicates() {
        let p = profile();
        for id in [1, 2, 3, 2, 4, 5, 6, 1, 7, 8, 9, 9, 10] {
            p.record_watched(&movie(id)).unwrap();
            let history = p.watch_history().unwrap();
            assert!(history.len() <= HISTORY_CAPACITY);
            let mut ids: Vec<u64> = history.iter().map(|m| m.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), history.len());
        }
    }

    #[test]
    fn test_history_evicts_oldest_fifo() {
        let p = profile();
        for id in 1..=7 {
            p.record_watched(&movie(id)).unwrap();
        }
        p.record_watched(&movie(8)).unwrap();

        let ids: Vec<u64> = p.watch_history().unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let p = profile();
        assert_eq!(p.toggle_watchlist(&movie(5)).unwrap(), WatchlistAction::Added);
        assert!(p.in_watchlist(5).unwrap());

        assert_eq!(
            p.toggle_watchlist(&movie(5)).unwrap(),
            WatchlistAction::Removed
        );
        assert!(!p.in_watchlist(5).unwrap());
    }

    #[test]
    fn test_double_toggle_is_involution() {
        let p = profile();
        p.toggle_watchlist(&movie(1)).unwrap();
        p.toggle_watchlist(&movie(2)).unwrap();
        let before = p.watchlist().unwrap();

        p.toggle_watchlist(&movie(3)).unwrap();
        p.toggle_watchlist(&movie(3)).unwrap();
        assert_eq!(p.watchlist().unwrap(), before);
    }

    #[test]
    fn test_watchlist_round_trips_through_json() {
        let p = profile();
        for id in [10, 20, 30] {
            p.toggle_watchlist(&movie(id)).unwrap();
        }

        let raw = serde_json::to_string(&p.watchlist().unwrap()).unwrap();
        let restored: Vec<MovieSummary> = serde_json::from_str(&raw).unwrap();
        let ids: Vec<u64> = restored.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_session_login_logout() {
        let p = profile();
        assert!(p.session().unwrap().is_none());

        p.login(&Session::new("key123".into())).unwrap();
        assert_eq!(p.session().unwrap().unwrap().api_key, "key123");

        p.logout().unwrap();
        assert!(p.session().unwrap().is_none());
    }

    #[test]
    fn test_login_rejects_blank_key() {
        let p = profile();
        assert!(p.login(&Session::new("  ".into())).is_err());
        assert!(p.session().unwrap().is_none());
    }

    #[test]
    fn test_expired_session_reads_as_absent() {
        use chrono::{Duration, Utc};
        use crate::model::SESSION_TTL_DAYS;

        let p = profile();
        let mut session = Session::new("key123".into());
        session.created_at = Utc::now() - Duration::days(SESSION_TTL_DAYS + 1);
        p.login(&session).unwrap();

        assert!(p.session().unwrap().is_none());
    }

    #[test]
    fn test_username_namespaces_lists() {
        let p = profile();
        p.login(&Session::new("key".into()).with_username("ayla".into()))
            .unwrap();
        p.toggle_watchlist(&movie(1)).unwrap();
        p.record_watched(&movie(2)).unwrap();
        assert!(p.in_watchlist(1).unwrap());

        // A different user sees their own empty lists.
        p.login(&Session::new("key".into()).with_username("badr".into()))
            .unwrap();
        assert!(p.watchlist().unwrap().is_empty());
        assert!(p.watch_history().unwrap().is_empty());

        // Switching back restores the first user's lists.
        p.login(&Session::new("key".into()).with_username("ayla".into()))
            .unwrap();
        assert!(p.in_watchlist(1).unwrap());
        assert_eq!(p.watch_history().unwrap().len(), 1);
    }

    #[test]
    fn test_watchlist_survives_logout() {
        let p = profile();
        p.toggle_watchlist(&movie(9)).unwrap();
        p.login(&Session::new("key".into())).unwrap();
        p.logout().unwrap();
        assert!(p.in_watchlist(9).unwrap());
    }
}
