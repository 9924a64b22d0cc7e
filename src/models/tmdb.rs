use serde::{Deserialize, Serialize};

/// A single genre as listed by TMDB's `/genre/movie/list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

/// A movie as it appears in TMDB list responses (popular, discover, similar)
///
/// Also the shape of the built-in sample catalog entries, which carry genre
/// names instead of the numeric `genre_ids` the live API returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genre_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
}

/// One cast credit in a TMDB credits block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbCastMember {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// One crew credit in a TMDB credits block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbCrewMember {
    pub name: String,
    pub job: String,
}

/// Credits sub-resource returned by `append_to_response=credits`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

/// One trailer/clip entry in a TMDB videos block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    #[serde(default)]
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

/// Videos sub-resource; the `{ "results": [...] }` wrapper is part of the
/// wire format and is preserved in our own responses
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

/// Similar-titles sub-resource, same wrapper convention as [`VideoList`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieList {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// Full movie detail response from `GET /movie/{id}` with appended
/// credits/videos/similar sub-resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub runtime: Option<i64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub credits: TmdbCredits,
    #[serde(default)]
    pub videos: VideoList,
    #[serde(default)]
    pub similar: MovieList,
}

/// Transient enrichment (videos + similar titles) fetched for a movie that is
/// already persisted; never written to the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieExtras {
    pub videos: VideoList,
    pub similar: MovieList,
}

impl From<TmdbMovieDetails> for MovieExtras {
    fn from(details: TmdbMovieDetails) -> Self {
        Self {
            videos: details.videos,
            similar: details.similar,
        }
    }
}
