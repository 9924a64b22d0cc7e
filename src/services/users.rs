use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{SessionStore, UserStore},
    error::{AppError, AppResult},
    models::{Rating, UserProfile, UserRecord},
};

const MIN_PASSWORD_LEN: usize = 6;

/// Account registration, login, and per-user movie collections
///
/// Mutations delegate to the store's atomic set operations; this layer only
/// adds validation and the client-facing error messages.
pub struct AccountService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { users, sessions }
    }

    /// Creates an account and returns a fresh bearer token
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<String> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidInput("Name is required".to_string()));
        }
        if !is_plausible_email(email) {
            return Err(AppError::InvalidInput(
                "Please include a valid email".to_string(),
            ));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(
                "Please enter a password with 6 or more characters".to_string(),
            ));
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::InvalidInput("User already exists".to_string()));
        }

        let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = UserRecord::new(name.trim().to_string(), email.to_string(), hash);
        self.users.insert(&user).await?;

        tracing::info!(user_id = %user.id, "Registered new user");

        self.sessions.create_session(user.id).await
    }

    /// Verifies credentials and returns a fresh bearer token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        self.sessions.create_session(user.id).await
    }

    /// The authenticated user's profile, without the credential hash
    pub async fn profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        Ok(self.require_user(user_id).await?.into())
    }

    pub async fn add_favorite(&self, user_id: Uuid, movie_id: &str) -> AppResult<Vec<String>> {
        self.require_user(user_id).await?;
        if !self.users.add_favorite(user_id, movie_id).await? {
            return Err(AppError::InvalidInput(
                "Movie already in favorites".to_string(),
            ));
        }
        Ok(self.require_user(user_id).await?.favorites)
    }

    pub async fn remove_favorite(&self, user_id: Uuid, movie_id: &str) -> AppResult<Vec<String>> {
        self.require_user(user_id).await?;
        self.users.remove_favorite(user_id, movie_id).await?;
        Ok(self.require_user(user_id).await?.favorites)
    }

    pub async fn add_watchlist(&self, user_id: Uuid, movie_id: &str) -> AppResult<Vec<String>> {
        self.require_user(user_id).await?;
        if !self.users.add_watchlist(user_id, movie_id).await? {
            return Err(AppError::InvalidInput(
                "Movie already in watchlist".to_string(),
            ));
        }
        Ok(self.require_user(user_id).await?.watchlist)
    }

    pub async fn remove_watchlist(&self, user_id: Uuid, movie_id: &str) -> AppResult<Vec<String>> {
        self.require_user(user_id).await?;
        self.users.remove_watchlist(user_id, movie_id).await?;
        Ok(self.require_user(user_id).await?.watchlist)
    }

    /// Sets the user's rating for a movie, replacing any previous value
    pub async fn rate(&self, user_id: Uuid, movie_id: &str, value: i32) -> AppResult<Vec<Rating>> {
        if !(1..=10).contains(&value) {
            return Err(AppError::InvalidInput(
                "Rating must be between 1 and 10".to_string(),
            ));
        }
        self.require_user(user_id).await?;

        let rating = Rating {
            movie: movie_id.to_string(),
            rating: value,
            date: Utc::now(),
        };
        self.users.upsert_rating(user_id, &rating).await?;

        Ok(self.require_user(user_id).await?.ratings)
    }

    async fn require_user(&self, user_id: Uuid) -> AppResult<UserRecord> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
