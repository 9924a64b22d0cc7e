use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{MovieRecord, Rating, UserRecord},
};

use super::store::{MovieStore, SessionStore, UserStore};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!().run(pool).await?;
    Ok(())
}

/// Document store backed by PostgreSQL JSONB columns
///
/// Each collection is a two-column table: a typed key plus the whole
/// document as JSONB. Per-field mutations are single UPDATE statements over
/// the JSONB value, so they compose safely under concurrency without any
/// read-modify-write at this layer.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends a movie id to a set-valued field unless already present.
    /// `field` is one of the fixed collection names, never caller input.
    async fn push_unique(&self, id: Uuid, field: &str, movie_id: &str) -> AppResult<bool> {
        let sql = format!(
            "UPDATE users \
                SET doc = jsonb_set(doc, '{{{field}}}', doc->'{field}' || to_jsonb($2::text)) \
              WHERE id = $1 AND NOT doc->'{field}' @> to_jsonb($2::text)"
        );

        let result = sqlx::query(&sql)
            .bind(id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes every occurrence of a movie id from a set-valued field
    async fn pull(&self, id: Uuid, field: &str, movie_id: &str) -> AppResult<()> {
        let sql = format!(
            "UPDATE users \
                SET doc = jsonb_set(doc, '{{{field}}}', (doc->'{field}') - $2::text) \
              WHERE id = $1"
        );

        sqlx::query(&sql)
            .bind(id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn decode_doc<T: serde::de::DeserializeOwned>(doc: serde_json::Value) -> AppResult<T> {
    serde_json::from_value(doc)
        .map_err(|e| AppError::Internal(format!("Corrupt document in store: {}", e)))
}

#[async_trait]
impl MovieStore for PgStore {
    async fn find_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<MovieRecord>> {
        let row = sqlx::query("SELECT doc FROM movies WHERE tmdb_id = $1")
            .bind(tmdb_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let doc: serde_json::Value = row.try_get("doc")?;
                Ok(Some(decode_doc(doc)?))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, record: &MovieRecord) -> AppResult<()> {
        // Racing inserts for the same id collapse onto the first writer
        sqlx::query("INSERT INTO movies (tmdb_id, doc) VALUES ($1, $2) ON CONFLICT (tmdb_id) DO NOTHING")
            .bind(record.tmdb_id)
            .bind(Json(record))
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query("SELECT doc FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let doc: serde_json::Value = row.try_get("doc")?;
                Ok(Some(decode_doc(doc)?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query("SELECT doc FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let doc: serde_json::Value = row.try_get("doc")?;
                Ok(Some(decode_doc(doc)?))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, user: &UserRecord) -> AppResult<()> {
        sqlx::query("INSERT INTO users (id, email, doc) VALUES ($1, $2, $3)")
            .bind(user.id)
            .bind(&user.email)
            .bind(Json(user))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn add_favorite(&self, id: Uuid, movie_id: &str) -> AppResult<bool> {
        self.push_unique(id, "favorites", movie_id).await
    }

    async fn remove_favorite(&self, id: Uuid, movie_id: &str) -> AppResult<()> {
        self.pull(id, "favorites", movie_id).await
    }

    async fn add_watchlist(&self, id: Uuid, movie_id: &str) -> AppResult<bool> {
        self.push_unique(id, "watchlist", movie_id).await
    }

    async fn remove_watchlist(&self, id: Uuid, movie_id: &str) -> AppResult<()> {
        self.pull(id, "watchlist", movie_id).await
    }

    async fn upsert_rating(&self, id: Uuid, rating: &Rating) -> AppResult<()> {
        // Rebuild the array without any entry for this movie, then append the
        // new one; a single statement, so concurrent ratings of different
        // movies cannot lose each other's writes
        sqlx::query(
            "UPDATE users \
                SET doc = jsonb_set(doc, '{ratings}', \
                    (SELECT coalesce(jsonb_agg(entry), '[]'::jsonb) \
                       FROM jsonb_array_elements(doc->'ratings') AS entry \
                      WHERE entry->>'movie' <> $2) || $3) \
              WHERE id = $1",
        )
        .bind(id)
        .bind(&rating.movie)
        .bind(Json(rating))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn create_session(&self, user_id: Uuid) -> AppResult<String> {
        let token = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
            .bind(&token)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(token)
    }

    async fn session_user(&self, token: &str) -> AppResult<Option<Uuid>> {
        let row = sqlx::query("SELECT user_id FROM sessions WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.try_get("user_id"))
            .transpose()
            .map_err(Into::into)
    }
}
