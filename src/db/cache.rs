use std::fmt::Display;

use redis::AsyncCommands;
use redis::Client;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Popular-movies feed
    Popular,
    /// Full genre name/id table
    GenreList,
    /// Discover query, keyed by the pipe-joined genre id set
    Discover(String),
    /// Similar titles for a movie
    Similar(i64),
    /// Provider recommendations for a movie
    Recommendations(i64),
    /// Videos + similar enrichment for an already-stored movie
    Extras(i64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Popular => write!(f, "tmdb:popular"),
            CacheKey::GenreList => write!(f, "tmdb:genres"),
            CacheKey::Discover(genre_ids) => write!(f, "tmdb:discover:{}", genre_ids),
            CacheKey::Similar(id) => write!(f, "tmdb:similar:{}", id),
            CacheKey::Recommendations(id) => write!(f, "tmdb:recs:{}", id),
            CacheKey::Extras(id) => write!(f, "tmdb:extras:{}", id),
        }
    }
}

/// Creates a Redis client for caching upstream responses
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Read-through cache over Redis for upstream provider responses
///
/// The cache is strictly an accelerator: a Redis failure on read is treated
/// as a miss and a failure on write is logged and dropped, so a cache outage
/// never turns a healthy upstream call into an error. Writes happen on a
/// spawned task after the response has already been handed back.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
}

impl Cache {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }

    /// Looks up a cached value; any Redis or decode problem is a miss
    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let mut conn = match self.redis_client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable, treating as cache miss");
                return None;
            }
        };

        let cached: Option<String> = match conn.get(format!("{}", key)).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache read failed");
                return None;
            }
        };

        cached.and_then(|json| match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Discarding undecodable cache entry");
                None
            }
        })
    }

    /// Stores a value without blocking the caller; the Redis write runs on
    /// its own task and failures are only logged
    pub fn put_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        let client = self.redis_client.clone();
        let key = format!("{}", key);
        tokio::spawn(async move {
            let result: redis::RedisResult<()> = async {
                let mut conn = client.get_multiplexed_async_connection().await?;
                conn.set_ex(&key, json, ttl).await
            }
            .await;

            if let Err(e) = result {
                tracing::warn!(error = %e, key = %key, "Cache write failed");
            }
        });
    }
}
