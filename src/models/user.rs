use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One rating entry; at most one per movie id, re-rating replaces the
/// value and timestamp in place of adding a second entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    /// External movie id, stored as a string like the favorites/watchlist entries
    pub movie: String,
    pub rating: i32,
    pub date: DateTime<Utc>,
}

/// User document persisted in the accounts collection
///
/// Favorites and watchlist hold external movie ids as strings; each id
/// appears at most once per collection. Entries are never pruned, even when
/// the referenced movie no longer resolves upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub watchlist: Vec<String>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    pub created: DateTime<Utc>,
}

impl UserRecord {
    /// Creates a fresh account document with empty collections
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            avatar: None,
            favorites: Vec::new(),
            watchlist: Vec::new(),
            ratings: Vec::new(),
            created: Utc::now(),
        }
    }
}

/// User payload returned to clients, without the credential hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub favorites: Vec<String>,
    pub watchlist: Vec<String>,
    pub ratings: Vec<Rating>,
    pub created: DateTime<Utc>,
}

impl From<UserRecord> for UserProfile {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            favorites: user.favorites,
            watchlist: user.watchlist,
            ratings: user.ratings,
            created: user.created,
        }
    }
}
