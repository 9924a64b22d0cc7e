use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{MovieRecord, Rating, UserRecord},
};

/// Movie collection operations
///
/// The store is the cache-of-record for movie documents: records are written
/// once on a lookup miss and read many times afterwards.
#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn find_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<MovieRecord>>;

    /// Inserts a record unless one with the same external id already exists.
    ///
    /// Two concurrent misses for the same id may both call this; the second
    /// write must be a no-op rather than a duplicate or an error.
    async fn insert(&self, record: &MovieRecord) -> AppResult<()>;
}

/// User collection operations
///
/// Favorites/watchlist/ratings mutations are atomic set operations executed
/// by the store itself, never read-modify-write of the whole document, so
/// concurrent mutations of different fields cannot overwrite each other.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;
    async fn insert(&self, user: &UserRecord) -> AppResult<()>;

    /// Adds a movie id to favorites; Ok(false) when it was already present
    async fn add_favorite(&self, id: Uuid, movie_id: &str) -> AppResult<bool>;
    async fn remove_favorite(&self, id: Uuid, movie_id: &str) -> AppResult<()>;

    /// Adds a movie id to the watchlist; Ok(false) when it was already present
    async fn add_watchlist(&self, id: Uuid, movie_id: &str) -> AppResult<bool>;
    async fn remove_watchlist(&self, id: Uuid, movie_id: &str) -> AppResult<()>;

    /// Replaces any existing rating for the same movie id, otherwise appends
    async fn upsert_rating(&self, id: Uuid, rating: &Rating) -> AppResult<()>;
}

/// Bearer-token session operations used by the auth extractor
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Issues an opaque token bound to the given user id
    async fn create_session(&self, user_id: Uuid) -> AppResult<String>;

    /// Resolves a bearer token to its user id, if the token is known
    async fn session_user(&self, token: &str) -> AppResult<Option<Uuid>>;
}
