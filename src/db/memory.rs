use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{MovieRecord, Rating, UserRecord},
};

use super::store::{MovieStore, SessionStore, UserStore};

/// In-memory document store
///
/// Stands in for PostgreSQL when the database is unreachable at startup
/// (degraded mode: data lives only for the process lifetime) and backs the
/// test suite. Mutation semantics match [`super::postgres::PgStore`] exactly.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
    movies: RwLock<HashMap<i64, MovieRecord>>,
    sessions: RwLock<HashMap<String, Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn find_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<MovieRecord>> {
        Ok(self.movies.read().await.get(&tmdb_id).cloned())
    }

    async fn insert(&self, record: &MovieRecord) -> AppResult<()> {
        self.movies
            .write()
            .await
            .entry(record.tmdb_id)
            .or_insert_with(|| record.clone());
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn insert(&self, user: &UserRecord) -> AppResult<()> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn add_favorite(&self, id: Uuid, movie_id: &str) -> AppResult<bool> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(false);
        };
        if user.favorites.iter().any(|m| m == movie_id) {
            return Ok(false);
        }
        user.favorites.push(movie_id.to_string());
        Ok(true)
    }

    async fn remove_favorite(&self, id: Uuid, movie_id: &str) -> AppResult<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.favorites.retain(|m| m != movie_id);
        }
        Ok(())
    }

    async fn add_watchlist(&self, id: Uuid, movie_id: &str) -> AppResult<bool> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(false);
        };
        if user.watchlist.iter().any(|m| m == movie_id) {
            return Ok(false);
        }
        user.watchlist.push(movie_id.to_string());
        Ok(true)
    }

    async fn remove_watchlist(&self, id: Uuid, movie_id: &str) -> AppResult<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.watchlist.retain(|m| m != movie_id);
        }
        Ok(())
    }

    async fn upsert_rating(&self, id: Uuid, rating: &Rating) -> AppResult<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.ratings.retain(|r| r.movie != rating.movie);
            user.ratings.push(rating.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, user_id: Uuid) -> AppResult<String> {
        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(token.clone(), user_id);
        Ok(token)
    }

    async fn session_user(&self, token: &str) -> AppResult<Option<Uuid>> {
        Ok(self.sessions.read().await.get(token).copied())
    }
}
