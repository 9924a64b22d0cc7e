use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::tmdb::{MovieList, TmdbMovie, TmdbMovieDetails, VideoList};

/// Number of cast credits kept when normalizing provider details
const CAST_LIMIT: usize = 10;

/// A cast credit on a stored movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Canonical movie document persisted in the catalog collection
///
/// Created on the first lookup miss against the upstream provider and never
/// rewritten afterwards; the external `tmdb_id` is the join key used by the
/// per-user favorites/watchlist/ratings collections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    pub tmdb_id: i64,
    pub title: String,
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub runtime: Option<i64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    pub date_added: DateTime<Utc>,
}

/// A movie response as served to clients: the persisted record plus the
/// transient videos/similar enrichment, which is never written to the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub record: MovieRecord,
    pub videos: VideoList,
    pub similar: MovieList,
}

fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

impl From<&TmdbMovieDetails> for MovieRecord {
    /// Normalizes a full provider detail response into a storable record.
    ///
    /// The director is the first crew member whose job is exactly "Director"
    /// (empty string when the crew has none); the cast keeps the first ten
    /// credits in provider order.
    fn from(details: &TmdbMovieDetails) -> Self {
        let director = details
            .credits
            .crew
            .iter()
            .find(|person| person.job == "Director")
            .map(|person| person.name.clone())
            .unwrap_or_default();

        let cast = details
            .credits
            .cast
            .iter()
            .take(CAST_LIMIT)
            .map(|person| CastMember {
                id: person.id,
                name: person.name.clone(),
                character: person.character.clone(),
                profile_path: person.profile_path.clone(),
            })
            .collect();

        Self {
            tmdb_id: details.id,
            title: details.title.clone(),
            overview: details.overview.clone(),
            poster_path: details.poster_path.clone(),
            backdrop_path: details.backdrop_path.clone(),
            release_date: parse_release_date(details.release_date.as_deref()),
            genres: details.genres.iter().map(|g| g.name.clone()).collect(),
            runtime: details.runtime,
            vote_average: details.vote_average,
            vote_count: details.vote_count,
            popularity: details.popularity,
            director,
            cast,
            date_added: Utc::now(),
        }
    }
}

impl From<&TmdbMovie> for MovieRecord {
    /// Normalizes a sample-catalog entry into the same record shape the
    /// provider path produces, so fallback responses are indistinguishable
    /// in structure from live ones.
    fn from(movie: &TmdbMovie) -> Self {
        Self {
            tmdb_id: movie.id,
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            poster_path: movie.poster_path.clone(),
            backdrop_path: movie.backdrop_path.clone(),
            release_date: parse_release_date(movie.release_date.as_deref()),
            genres: movie.genres.clone(),
            runtime: None,
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            popularity: movie.popularity,
            director: String::new(),
            cast: Vec::new(),
            date_added: Utc::now(),
        }
    }
}
