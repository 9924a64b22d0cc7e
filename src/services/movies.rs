use std::sync::Arc;

use crate::{
    db::MovieStore,
    error::AppResult,
    models::{MovieDetail, MovieList, MovieRecord, VideoList},
    services::{catalog::FallbackCatalog, providers::MetadataProvider},
};

/// Get-or-fetch-and-persist movie lookup
///
/// The store is checked first; on a miss the upstream provider supplies the
/// full record, which is normalized and persisted before being returned.
/// Videos and similar titles are transient enrichment and are re-fetched on
/// every read without rewriting the stored document.
pub struct MovieLookup {
    movies: Arc<dyn MovieStore>,
    provider: Option<Arc<dyn MetadataProvider>>,
    fallback: Arc<FallbackCatalog>,
}

impl MovieLookup {
    pub fn new(
        movies: Arc<dyn MovieStore>,
        provider: Option<Arc<dyn MetadataProvider>>,
        fallback: Arc<FallbackCatalog>,
    ) -> Self {
        Self {
            movies,
            provider,
            fallback,
        }
    }

    /// Resolves a movie id to a full detail payload.
    ///
    /// This never fails: any store or upstream trouble at any stage
    /// degrades to a synthesized entry from the fallback catalog, so the
    /// caller always gets some movie to render.
    pub async fn get_movie(&self, tmdb_id: i64) -> MovieDetail {
        match self.lookup(tmdb_id).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!(
                    tmdb_id,
                    error = %e,
                    "Movie lookup failed, serving fallback catalog entry"
                );
                self.synthesize(tmdb_id)
            }
        }
    }

    async fn lookup(&self, tmdb_id: i64) -> AppResult<MovieDetail> {
        if let Some(record) = self.movies.find_by_tmdb_id(tmdb_id).await? {
            return Ok(self.enrich(record).await);
        }

        let Some(provider) = &self.provider else {
            return Ok(self.synthesize(tmdb_id));
        };

        // Miss: one upstream call brings the core fields plus all the
        // enrichment, so the response reuses what the normalization consumed
        let details = provider.movie_details(tmdb_id).await?;
        let record = MovieRecord::from(&details);
        self.movies.insert(&record).await?;

        tracing::info!(tmdb_id, title = %record.title, "Persisted new movie record");

        Ok(MovieDetail {
            record,
            videos: details.videos,
            similar: details.similar,
        })
    }

    /// Attaches transient videos/similar to an already-stored record
    async fn enrich(&self, record: MovieRecord) -> MovieDetail {
        if let Some(provider) = &self.provider {
            match provider.movie_extras(record.tmdb_id).await {
                Ok(extras) => {
                    return MovieDetail {
                        record,
                        videos: extras.videos,
                        similar: extras.similar,
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        tmdb_id = record.tmdb_id,
                        error = %e,
                        "Enrichment fetch failed, serving stored record with fallback similar titles"
                    );
                }
            }
        }

        let similar = self.fallback.similar_to(record.tmdb_id);
        MovieDetail {
            record,
            videos: VideoList::default(),
            similar: MovieList { results: similar },
        }
    }

    /// Builds a response purely from the fallback catalog: the entry with
    /// the requested id, or the first entry when there is no match
    fn synthesize(&self, tmdb_id: i64) -> MovieDetail {
        let entry = self
            .fallback
            .movie(tmdb_id)
            .unwrap_or_else(|| self.fallback.first());

        MovieDetail {
            record: MovieRecord::from(entry),
            videos: VideoList::default(),
            similar: MovieList {
                results: self.fallback.similar_to(entry.id),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryStore,
        error::AppError,
        models::{MovieExtras, TmdbMovie, TmdbMovieDetails, Video},
        services::providers::MockMetadataProvider,
    };

    fn lookup_without_provider(store: Arc<MemoryStore>) -> MovieLookup {
        MovieLookup::new(store, None, Arc::new(FallbackCatalog::builtin()))
    }

    fn details_fixture(id: i64, title: &str) -> TmdbMovieDetails {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "overview": "overview",
            "genres": [{"id": 18, "name": "Drama"}],
            "credits": {
                "cast": [{"id": 1, "name": "Actor", "character": "Lead"}],
                "crew": [{"name": "Director Name", "job": "Director"}]
            },
            "videos": {"results": [{"key": "abc", "name": "Trailer", "site": "YouTube", "type": "Trailer"}]},
            "similar": {"results": [{"id": 604, "title": "Similar Movie"}]}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_id_without_provider_synthesizes_first_entry() {
        let lookup = lookup_without_provider(Arc::new(MemoryStore::new()));

        let detail = lookup.get_movie(999).await;

        assert_eq!(detail.record.tmdb_id, 1);
        assert!(detail.videos.results.is_empty());
        let similar_ids: Vec<i64> = detail.similar.results.iter().map(|m| m.id).collect();
        assert_eq!(similar_ids, vec![2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_known_catalog_id_without_provider() {
        let lookup = lookup_without_provider(Arc::new(MemoryStore::new()));

        let detail = lookup.get_movie(3).await;

        assert_eq!(detail.record.title, "The Dark Knight");
        let similar_ids: Vec<i64> = detail.similar.results.iter().map(|m| m.id).collect();
        assert_eq!(similar_ids, vec![1, 2, 4, 5]);
    }

    #[tokio::test]
    async fn test_stored_record_without_provider_is_stable_across_reads() {
        let store = Arc::new(MemoryStore::new());
        let record = MovieRecord::from(&details_fixture(603, "The Matrix"));
        MovieStore::insert(store.as_ref(), &record).await.unwrap();

        let lookup = lookup_without_provider(store);
        let first = lookup.get_movie(603).await;
        let second = lookup.get_movie(603).await;

        assert_eq!(first.record, second.record);
        assert_eq!(first.record.title, "The Matrix");
        assert!(first.videos.results.is_empty());
    }

    #[tokio::test]
    async fn test_miss_with_provider_persists_and_returns_enrichment() {
        let store = Arc::new(MemoryStore::new());
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_movie_details()
            .returning(|id| Ok(details_fixture(id, "The Matrix")));

        let lookup = MovieLookup::new(
            store.clone(),
            Some(Arc::new(provider)),
            Arc::new(FallbackCatalog::builtin()),
        );

        let detail = lookup.get_movie(603).await;

        assert_eq!(detail.record.director, "Director Name");
        assert_eq!(detail.videos.results[0].key, "abc");
        assert_eq!(detail.similar.results[0].id, 604);

        let persisted = store.find_by_tmdb_id(603).await.unwrap().unwrap();
        assert_eq!(persisted.title, "The Matrix");
    }

    #[tokio::test]
    async fn test_hit_with_provider_merges_extras_without_refetching_core() {
        let store = Arc::new(MemoryStore::new());
        let record = MovieRecord::from(&details_fixture(603, "The Matrix"));
        MovieStore::insert(store.as_ref(), &record).await.unwrap();

        let mut provider = MockMetadataProvider::new();
        provider.expect_movie_extras().returning(|_| {
            Ok(MovieExtras {
                videos: VideoList {
                    results: vec![Video {
                        id: String::new(),
                        key: "fresh".to_string(),
                        name: "New Trailer".to_string(),
                        site: "YouTube".to_string(),
                        video_type: "Trailer".to_string(),
                    }],
                },
                similar: MovieList {
                    results: vec![TmdbMovie {
                        id: 604,
                        title: "Similar".to_string(),
                        overview: String::new(),
                        poster_path: None,
                        backdrop_path: None,
                        release_date: None,
                        vote_average: None,
                        vote_count: None,
                        popularity: None,
                        genre_ids: vec![],
                        genres: vec![],
                    }],
                },
            })
        });
        // The full-details endpoint must not be hit for a stored record
        provider.expect_movie_details().never();

        let lookup = MovieLookup::new(
            store,
            Some(Arc::new(provider)),
            Arc::new(FallbackCatalog::builtin()),
        );

        let detail = lookup.get_movie(603).await;
        assert_eq!(detail.record.title, "The Matrix");
        assert_eq!(detail.videos.results[0].key, "fresh");
    }

    #[tokio::test]
    async fn test_hit_with_failing_enrichment_degrades_to_fallback_similar() {
        let store = Arc::new(MemoryStore::new());
        let record = MovieRecord::from(&details_fixture(603, "The Matrix"));
        MovieStore::insert(store.as_ref(), &record).await.unwrap();

        let mut provider = MockMetadataProvider::new();
        provider
            .expect_movie_extras()
            .returning(|_| Err(AppError::ExternalApi("boom".to_string())));

        let lookup = MovieLookup::new(
            store,
            Some(Arc::new(provider)),
            Arc::new(FallbackCatalog::builtin()),
        );

        let detail = lookup.get_movie(603).await;

        // Stored record survives; similar comes from the catalog minus 603
        assert_eq!(detail.record.title, "The Matrix");
        assert!(detail.videos.results.is_empty());
        assert_eq!(detail.similar.results.len(), 5);
    }

    #[tokio::test]
    async fn test_provider_failure_on_miss_serves_fallback() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_movie_details()
            .returning(|_| Err(AppError::ExternalApi("rate limited".to_string())));

        let lookup = MovieLookup::new(
            Arc::new(MemoryStore::new()),
            Some(Arc::new(provider)),
            Arc::new(FallbackCatalog::builtin()),
        );

        let detail = lookup.get_movie(2).await;
        assert_eq!(detail.record.tmdb_id, 2);
        assert_eq!(detail.record.title, "The Godfather");
    }
}
