use std::sync::Arc;

use matinee_api::{
    config::Config,
    db::{self, Cache, MemoryStore, MovieStore, PgStore, SessionStore, UserStore},
    routes::create_router,
    services::{FallbackCatalog, MetadataProvider, TmdbProvider},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let redis_client = db::create_redis_client(&config.redis_url)?;
    let cache = Cache::new(redis_client);

    let provider: Option<Arc<dyn MetadataProvider>> = match config.tmdb_key() {
        Some(key) => Some(Arc::new(TmdbProvider::new(
            cache,
            key.to_string(),
            config.tmdb_api_url.clone(),
        ))),
        None => {
            tracing::warn!("TMDB API key not configured, serving the built-in sample catalog");
            None
        }
    };

    // The server stays up without PostgreSQL: the in-memory store keeps the
    // API functional for the process lifetime, with a warning
    let (users, movies, sessions): (
        Arc<dyn UserStore>,
        Arc<dyn MovieStore>,
        Arc<dyn SessionStore>,
    ) = match db::create_pool(&config.database_url).await {
        Ok(pool) => {
            db::run_migrations(&pool).await?;
            tracing::info!("Connected to PostgreSQL");
            let store = Arc::new(PgStore::new(pool));
            (store.clone(), store.clone(), store)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Database unavailable, running on the in-memory store");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store.clone(), store)
        }
    };

    let state = AppState::new(users, movies, sessions, provider, FallbackCatalog::builtin());
    let app = create_router(state, &config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
