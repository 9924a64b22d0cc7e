/// Movie metadata provider abstraction
///
/// The upstream catalog is the source of truth for everything the local
/// store has not yet cached. Keeping the surface behind a trait lets the
/// lookup and recommendation services run against a mock in tests and lets
/// the whole provider be absent when no API credential is configured.
use crate::{
    error::AppResult,
    models::{MovieExtras, TmdbGenre, TmdbMovie, TmdbMovieDetails},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Full detail record for one movie, with credits/videos/similar appended
    async fn movie_details(&self, tmdb_id: i64) -> AppResult<TmdbMovieDetails>;

    /// Videos + similar only, for enriching an already-stored record
    async fn movie_extras(&self, tmdb_id: i64) -> AppResult<MovieExtras>;

    /// Current popular-movies feed
    async fn popular(&self) -> AppResult<Vec<TmdbMovie>>;

    /// The provider's full genre name/id table
    async fn genres(&self) -> AppResult<Vec<TmdbGenre>>;

    /// Titles matching any of the given genre ids, most popular first
    async fn discover_by_genres(&self, genre_ids: &[i64]) -> AppResult<Vec<TmdbMovie>>;

    /// Titles similar to the given movie
    async fn similar(&self, tmdb_id: i64) -> AppResult<Vec<TmdbMovie>>;

    /// The provider's own recommendations for the given movie
    async fn recommendations_for(&self, tmdb_id: i64) -> AppResult<Vec<TmdbMovie>>;
}
