/// TMDB (The Movie Database) provider
///
/// Thin client over the v3 REST API. List-shaped responses (popular,
/// discover, similar, recommendations) and per-movie enrichment are cached
/// in Redis; full detail fetches are not, because the document store itself
/// is the cache-of-record for those.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieExtras, TmdbGenre, TmdbMovie, TmdbMovieDetails},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;

const POPULAR_TTL: u64 = 3600; // 1 hour
const GENRES_TTL: u64 = 86400; // 1 day; the table changes essentially never
const DISCOVER_TTL: u64 = 1800; // 30 minutes
const SIMILAR_TTL: u64 = 3600; // 1 hour
const EXTRAS_TTL: u64 = 1800; // 30 minutes

/// Page-shaped TMDB list response
#[derive(Debug, Deserialize)]
struct Paged {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

/// Response of `/genre/movie/list`
#[derive(Debug, Deserialize)]
struct GenreTable {
    #[serde(default)]
    genres: Vec<TmdbGenre>,
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn movie_details(&self, tmdb_id: i64) -> AppResult<TmdbMovieDetails> {
        let details: TmdbMovieDetails = self
            .get_json(
                &format!("/movie/{}", tmdb_id),
                &[("append_to_response", "credits,videos,similar")],
            )
            .await?;

        tracing::info!(
            tmdb_id,
            title = %details.title,
            provider = "tmdb",
            "Fetched full movie details"
        );

        Ok(details)
    }

    async fn movie_extras(&self, tmdb_id: i64) -> AppResult<MovieExtras> {
        cached!(
            self.cache,
            CacheKey::Extras(tmdb_id),
            EXTRAS_TTL,
            async move {
                let details: TmdbMovieDetails = self
                    .get_json(
                        &format!("/movie/{}", tmdb_id),
                        &[("append_to_response", "videos,similar")],
                    )
                    .await?;

                Ok::<_, AppError>(MovieExtras::from(details))
            }
        )
    }

    async fn popular(&self) -> AppResult<Vec<TmdbMovie>> {
        cached!(self.cache, CacheKey::Popular, POPULAR_TTL, async move {
            let page: Paged = self.get_json("/movie/popular", &[]).await?;

            tracing::info!(
                results = page.results.len(),
                provider = "tmdb",
                "Fetched popular movies"
            );

            Ok::<_, AppError>(page.results)
        })
    }

    async fn genres(&self) -> AppResult<Vec<TmdbGenre>> {
        cached!(self.cache, CacheKey::GenreList, GENRES_TTL, async move {
            let table: GenreTable = self.get_json("/genre/movie/list", &[]).await?;
            Ok::<_, AppError>(table.genres)
        })
    }

    async fn discover_by_genres(&self, genre_ids: &[i64]) -> AppResult<Vec<TmdbMovie>> {
        // TMDB treats pipe-joined ids as an OR query
        let joined = genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join("|");
        let key = CacheKey::Discover(joined.clone());

        cached!(
            self.cache,
            key,
            DISCOVER_TTL,
            async move {
                let page: Paged = self
                    .get_json(
                        "/discover/movie",
                        &[
                            ("with_genres", joined.as_str()),
                            ("sort_by", "popularity.desc"),
                        ],
                    )
                    .await?;

                tracing::info!(
                    genre_ids = %joined,
                    results = page.results.len(),
                    provider = "tmdb",
                    "Discover query completed"
                );

                Ok::<_, AppError>(page.results)
            }
        )
    }

    async fn similar(&self, tmdb_id: i64) -> AppResult<Vec<TmdbMovie>> {
        cached!(
            self.cache,
            CacheKey::Similar(tmdb_id),
            SIMILAR_TTL,
            async move {
                let page: Paged = self
                    .get_json(&format!("/movie/{}/similar", tmdb_id), &[])
                    .await?;
                Ok::<_, AppError>(page.results)
            }
        )
    }

    async fn recommendations_for(&self, tmdb_id: i64) -> AppResult<Vec<TmdbMovie>> {
        cached!(
            self.cache,
            CacheKey::Recommendations(tmdb_id),
            SIMILAR_TTL,
            async move {
                let page: Paged = self
                    .get_json(&format!("/movie/{}/recommendations", tmdb_id), &[])
                    .await?;
                Ok::<_, AppError>(page.results)
            }
        )
    }
}
