use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::{MovieStore, UserStore},
    error::{AppError, AppResult},
    models::{MovieRecord, TmdbMovie, TmdbMovieDetails, UserRecord},
    services::{catalog::FallbackCatalog, providers::MetadataProvider},
};

/// Weight added per genre of a favorited movie
const FAVORITE_WEIGHT: f64 = 3.0;
/// Weight added per genre of a watchlisted movie
const WATCHLIST_WEIGHT: f64 = 1.0;
/// A rating contributes half its value per genre
const RATING_DIVISOR: f64 = 2.0;
/// How many top genres drive the discover query
const TOP_GENRES: usize = 3;

const POPULAR_MESSAGE: &str = "Based on popular movies";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Popular,
    Personalized,
}

/// Recommendation feed returned to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
    pub movies: Vec<TmdbMovie>,
}

/// Response of the because-you-watched route: the seed movie plus the
/// provider's own recommendations for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BecauseYouWatched {
    pub movie: TmdbMovieDetails,
    pub recommendations: Vec<TmdbMovie>,
}

/// Genre-affinity recommendation engine
///
/// Scores genres from the user's interaction history, asks the provider for
/// popular titles in the top genres, and filters out everything the user has
/// already interacted with. Users without history get the generic popular
/// feed, which degrades to the fallback catalog when the provider is
/// unavailable. The personalized path deliberately has no such net: upstream
/// failures there surface to the caller.
pub struct Recommender {
    users: Arc<dyn UserStore>,
    movies: Arc<dyn MovieStore>,
    provider: Option<Arc<dyn MetadataProvider>>,
    fallback: Arc<FallbackCatalog>,
}

impl Recommender {
    pub fn new(
        users: Arc<dyn UserStore>,
        movies: Arc<dyn MovieStore>,
        provider: Option<Arc<dyn MetadataProvider>>,
        fallback: Arc<FallbackCatalog>,
    ) -> Self {
        Self {
            users,
            movies,
            provider,
            fallback,
        }
    }

    pub async fn for_user(&self, user_id: Uuid) -> AppResult<Recommendations> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.ratings.is_empty() && user.favorites.is_empty() && user.watchlist.is_empty() {
            return Ok(self.popular_feed().await);
        }

        let provider = self.provider()?;

        let rated = self.resolve_rated(&user).await?;
        let favorites = self.resolve(&user.favorites).await?;
        let watchlist = self.resolve(&user.watchlist).await?;

        let top = top_genres(genre_affinity(&rated, &favorites, &watchlist), TOP_GENRES);

        let genre_table = provider.genres().await?;
        let genre_ids: Vec<i64> = top
            .iter()
            .filter_map(|name| genre_table.iter().find(|g| &g.name == name).map(|g| g.id))
            .collect();

        if genre_ids.is_empty() {
            // History exists but none of its genres resolve to provider ids;
            // fall through to the popular feed, errors propagating this time
            let movies = provider.popular().await?;
            return Ok(Recommendations {
                kind: RecommendationKind::Popular,
                message: POPULAR_MESSAGE.to_string(),
                movies,
            });
        }

        let candidates = provider.discover_by_genres(&genre_ids).await?;
        let seen = exclusion_set(&user);
        let movies: Vec<TmdbMovie> = candidates
            .into_iter()
            .filter(|movie| !seen.contains(&movie.id))
            .collect();

        tracing::info!(
            user_id = %user_id,
            top_genres = ?top,
            results = movies.len(),
            "Personalized recommendations computed"
        );

        Ok(Recommendations {
            kind: RecommendationKind::Personalized,
            message: format!("Based on your interest in {}", top.join(", ")),
            movies,
        })
    }

    /// Provider similar-titles list for one movie
    pub async fn similar_to(&self, tmdb_id: i64) -> AppResult<Vec<TmdbMovie>> {
        self.provider()?.similar(tmdb_id).await
    }

    /// Seed movie plus the provider's recommendations for it
    pub async fn because_you_watched(&self, tmdb_id: i64) -> AppResult<BecauseYouWatched> {
        let provider = self.provider()?;
        let movie = provider.movie_details(tmdb_id).await?;
        let recommendations = provider.recommendations_for(tmdb_id).await?;
        Ok(BecauseYouWatched {
            movie,
            recommendations,
        })
    }

    /// Generic feed for users without history; never fails
    async fn popular_feed(&self) -> Recommendations {
        let movies = match &self.provider {
            Some(provider) => match provider.popular().await {
                Ok(movies) => movies,
                Err(e) => {
                    tracing::warn!(error = %e, "Popular feed unavailable, using fallback catalog");
                    self.fallback.movies().to_vec()
                }
            },
            None => self.fallback.movies().to_vec(),
        };

        Recommendations {
            kind: RecommendationKind::Popular,
            message: POPULAR_MESSAGE.to_string(),
            movies,
        }
    }

    fn provider(&self) -> AppResult<&Arc<dyn MetadataProvider>> {
        self.provider
            .as_ref()
            .ok_or_else(|| AppError::ExternalApi("Metadata provider is not configured".to_string()))
    }

    /// Resolves stored movie ids to records, skipping ids that are
    /// unparsable or missing from the store
    async fn resolve(&self, ids: &[String]) -> AppResult<Vec<MovieRecord>> {
        let mut records = Vec::new();
        for raw in ids {
            let Ok(id) = raw.parse::<i64>() else { continue };
            if let Some(record) = self.movies.find_by_tmdb_id(id).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn resolve_rated(&self, user: &UserRecord) -> AppResult<Vec<(MovieRecord, i32)>> {
        let mut records = Vec::new();
        for rating in &user.ratings {
            let Ok(id) = rating.movie.parse::<i64>() else { continue };
            if let Some(record) = self.movies.find_by_tmdb_id(id).await? {
                records.push((record, rating.rating));
            }
        }
        Ok(records)
    }
}

/// Accumulates per-genre weights across the user's history.
///
/// The result keeps first-seen genre order so that equal weights tie-break
/// deterministically in [`top_genres`].
pub(crate) fn genre_affinity(
    rated: &[(MovieRecord, i32)],
    favorites: &[MovieRecord],
    watchlist: &[MovieRecord],
) -> Vec<(String, f64)> {
    let mut weights: Vec<(String, f64)> = Vec::new();

    for (movie, rating) in rated {
        for genre in &movie.genres {
            bump(&mut weights, genre, *rating as f64 / RATING_DIVISOR);
        }
    }
    for movie in favorites {
        for genre in &movie.genres {
            bump(&mut weights, genre, FAVORITE_WEIGHT);
        }
    }
    for movie in watchlist {
        for genre in &movie.genres {
            bump(&mut weights, genre, WATCHLIST_WEIGHT);
        }
    }

    weights
}

fn bump(weights: &mut Vec<(String, f64)>, genre: &str, amount: f64) {
    match weights.iter_mut().find(|(name, _)| name == genre) {
        Some((_, weight)) => *weight += amount,
        None => weights.push((genre.to_string(), amount)),
    }
}

/// Highest-weighted genre names, stable under ties
pub(crate) fn top_genres(mut weights: Vec<(String, f64)>, limit: usize) -> Vec<String> {
    weights.sort_by(|a, b| b.1.total_cmp(&a.1));
    weights.into_iter().take(limit).map(|(name, _)| name).collect()
}

/// Every movie id the user has already interacted with, as provider-numeric
/// ids; entries that do not parse are left out
fn exclusion_set(user: &UserRecord) -> HashSet<i64> {
    user.favorites
        .iter()
        .chain(user.watchlist.iter())
        .map(|raw| raw.as_str())
        .chain(user.ratings.iter().map(|r| r.movie.as_str()))
        .filter_map(|raw| raw.parse::<i64>().ok())
        .collect()
}
