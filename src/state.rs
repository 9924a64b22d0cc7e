use std::sync::Arc;

use crate::{
    db::{MovieStore, SessionStore, UserStore},
    services::{AccountService, FallbackCatalog, MetadataProvider, MovieLookup, Recommender},
};

/// Shared application state handed to every handler
///
/// Services are built once over trait objects for the store and the metadata
/// provider, so the same wiring serves production (Postgres + TMDB), the
/// degraded DB-less mode, and the test suite.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub lookup: Arc<MovieLookup>,
    pub recommender: Arc<Recommender>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        movies: Arc<dyn MovieStore>,
        sessions: Arc<dyn SessionStore>,
        provider: Option<Arc<dyn MetadataProvider>>,
        fallback: FallbackCatalog,
    ) -> Self {
        let fallback = Arc::new(fallback);

        Self {
            accounts: Arc::new(AccountService::new(users.clone(), sessions.clone())),
            lookup: Arc::new(MovieLookup::new(
                movies.clone(),
                provider.clone(),
                fallback.clone(),
            )),
            recommender: Arc::new(Recommender::new(users, movies, provider, fallback)),
            sessions,
        }
    }
}
