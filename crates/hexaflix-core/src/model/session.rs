use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HexaflixError, Result};

/// How long a saved credential stays valid before the user has to enter
/// it again.
pub const SESSION_TTL_DAYS: i64 = 365;

/// A stored credential gating all metadata operations. One active instance
/// per profile store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub api_key: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            username: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// A session past its TTL reads back as absent.
    pub fn is_expired(&self) -> bool {
        Utc::now() - self.created_at > Duration::days(SESSION_TTL_DAYS)
    }
}

/// Validate an API key before saving it in a session.
pub fn validate_api_key(key: &str) -> Result<()> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(HexaflixError::InvalidInput("API key cannot be empty".into()));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(HexaflixError::InvalidInput(
            "API key cannot contain whitespace".into(),
        ));
    }
    Ok(())
}
