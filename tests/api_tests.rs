use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use matinee_api::{
    config::Config,
    db::MemoryStore,
    error::AppResult,
    models::{MovieExtras, MovieList, TmdbGenre, TmdbMovie, TmdbMovieDetails, VideoList},
    routes::create_router,
    services::{FallbackCatalog, MetadataProvider},
    state::AppState,
};

fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        redis_url: "redis://unused".to_string(),
        tmdb_api_key: None,
        tmdb_api_url: "http://unused.local".to_string(),
        allowed_origins: "http://localhost:3000".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

fn create_test_server_with(provider: Option<Arc<dyn MetadataProvider>>) -> TestServer {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        store.clone(),
        store.clone(),
        store,
        provider,
        FallbackCatalog::builtin(),
    );
    let app = create_router(state, &test_config());
    TestServer::new(app).unwrap()
}

/// Server with no provider configured: every read degrades to the catalog
fn create_test_server() -> TestServer {
    create_test_server_with(None)
}

fn list_movie(id: i64) -> TmdbMovie {
    TmdbMovie {
        id,
        title: format!("Candidate {}", id),
        overview: String::new(),
        poster_path: None,
        backdrop_path: None,
        release_date: None,
        vote_average: None,
        vote_count: None,
        popularity: None,
        genre_ids: vec![],
        genres: vec![],
    }
}

/// Deterministic provider standing in for TMDB
struct FakeProvider;

#[async_trait::async_trait]
impl MetadataProvider for FakeProvider {
    async fn movie_details(&self, tmdb_id: i64) -> AppResult<TmdbMovieDetails> {
        Ok(serde_json::from_value(json!({
            "id": tmdb_id,
            "title": format!("Movie {}", tmdb_id),
            "overview": "A test movie.",
            "genres": [{"id": 18, "name": "Drama"}],
            "credits": {
                "cast": [{"id": 7, "name": "Lead Actor", "character": "Lead"}],
                "crew": [{"name": "Jane Doe", "job": "Director"}]
            },
            "videos": {"results": []},
            "similar": {"results": [{"id": 900, "title": "Similar"}]}
        }))
        .unwrap())
    }

    async fn movie_extras(&self, _tmdb_id: i64) -> AppResult<MovieExtras> {
        Ok(MovieExtras {
            videos: VideoList::default(),
            similar: MovieList {
                results: vec![list_movie(900)],
            },
        })
    }

    async fn popular(&self) -> AppResult<Vec<TmdbMovie>> {
        Ok(vec![list_movie(101), list_movie(102)])
    }

    async fn genres(&self) -> AppResult<Vec<TmdbGenre>> {
        Ok(vec![
            TmdbGenre { id: 18, name: "Drama".to_string() },
            TmdbGenre { id: 28, name: "Action".to_string() },
        ])
    }

    async fn discover_by_genres(&self, _genre_ids: &[i64]) -> AppResult<Vec<TmdbMovie>> {
        Ok(vec![list_movie(3), list_movie(201), list_movie(202)])
    }

    async fn similar(&self, _tmdb_id: i64) -> AppResult<Vec<TmdbMovie>> {
        Ok(vec![list_movie(301)])
    }

    async fn recommendations_for(&self, _tmdb_id: i64) -> AppResult<Vec<TmdbMovie>> {
        Ok(vec![list_movie(401)])
    }
}

async fn register(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/users")
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "hunter22"
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["token"].as_str().unwrap().to_string()
}

fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_login_and_profile() {
    let server = create_test_server();
    register(&server, "ada@example.com").await;

    // Login issues a fresh token
    let response = server
        .post("/api/auth")
        .json(&json!({ "email": "ada@example.com", "password": "hunter22" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let token = body["token"].as_str().unwrap();

    // The token resolves to the registered profile, hash not included
    let (name, value) = bearer(token);
    let response = server.get("/api/auth").add_header(name, value).await;
    response.assert_status_ok();
    let profile: serde_json::Value = response.json();
    assert_eq!(profile["email"], "ada@example.com");
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let server = create_test_server();
    register(&server, "ada@example.com").await;

    let response = server
        .post("/api/auth")
        .json(&json!({ "email": "ada@example.com", "password": "wrong-password" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let server = create_test_server();
    let response = server
        .post("/api/users")
        .json(&json!({
            "name": "Test User",
            "email": "ada@example.com",
            "password": "abc"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let server = create_test_server();
    register(&server, "ada@example.com").await;

    let response = server
        .post("/api/users")
        .json(&json!({
            "name": "Other User",
            "email": "ada@example.com",
            "password": "hunter23"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_recommendations_require_auth() {
    let server = create_test_server();
    let response = server.get("/api/recommendations").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_movie_lookup_unknown_id_serves_fallback_catalog() {
    let server = create_test_server();

    let response = server.get("/api/movies/999").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    // No catalog match for 999: first entry is served, similar = the rest
    assert_eq!(body["tmdb_id"], 1);
    assert_eq!(body["title"], "The Shawshank Redemption");
    assert_eq!(body["videos"]["results"], json!([]));
    let similar_ids: Vec<i64> = body["similar"]["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(similar_ids, vec![2, 3, 4, 5]);
}

#[tokio::test]
async fn test_movie_lookup_core_fields_stable_across_reads() {
    let server = create_test_server_with(Some(Arc::new(FakeProvider)));

    // First read persists the record
    let first = server.get("/api/movies/42").await;
    first.assert_status_ok();
    let first: serde_json::Value = first.json();
    assert_eq!(first["title"], "Movie 42");
    assert_eq!(first["director"], "Jane Doe");

    let second = server.get("/api/movies/42").await;
    second.assert_status_ok();
    let second: serde_json::Value = second.json();

    // Core fields are identical across reads
    for field in ["tmdb_id", "title", "overview", "genres", "director", "cast", "date_added"] {
        assert_eq!(first[field], second[field], "field {} changed", field);
    }
}

#[tokio::test]
async fn test_favorites_add_duplicate_and_remove() {
    let server = create_test_server();
    let token = register(&server, "ada@example.com").await;

    let (name, value) = bearer(&token);
    let response = server
        .put("/api/users/favorites/3")
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    let favorites: Vec<String> = response.json();
    assert_eq!(favorites, vec!["3"]);

    // Adding the same id again is rejected and leaves the list unchanged
    let (name, value) = bearer(&token);
    let response = server
        .put("/api/users/favorites/3")
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Movie already in favorites");

    let (name, value) = bearer(&token);
    let response = server
        .delete("/api/users/favorites/3")
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    let favorites: Vec<String> = response.json();
    assert!(favorites.is_empty());
}

#[tokio::test]
async fn test_rating_out_of_range_is_rejected() {
    let server = create_test_server();
    let token = register(&server, "ada@example.com").await;

    let (name, value) = bearer(&token);
    let response = server
        .post("/api/users/ratings/3")
        .add_header(name, value)
        .json(&json!({ "rating": 11 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rating_upsert_keeps_one_entry() {
    let server = create_test_server();
    let token = register(&server, "ada@example.com").await;

    let (name, value) = bearer(&token);
    server
        .post("/api/users/ratings/3")
        .add_header(name, value)
        .json(&json!({ "rating": 6 }))
        .await
        .assert_status_ok();

    let (name, value) = bearer(&token);
    let response = server
        .post("/api/users/ratings/3")
        .add_header(name, value)
        .json(&json!({ "rating": 9 }))
        .await;
    response.assert_status_ok();

    let ratings: serde_json::Value = response.json();
    let entries = ratings.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["movie"], "3");
    assert_eq!(entries[0]["rating"], 9);
}

#[tokio::test]
async fn test_recommendations_without_history_are_popular_fallback() {
    let server = create_test_server();
    let token = register(&server, "ada@example.com").await;

    let (name, value) = bearer(&token);
    let response = server
        .get("/api/recommendations")
        .add_header(name, value)
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["type"], "popular");
    assert_eq!(body["message"], "Based on popular movies");
    assert_eq!(body["movies"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_personalized_recommendations_exclude_seen_titles() {
    let server = create_test_server_with(Some(Arc::new(FakeProvider)));
    let token = register(&server, "ada@example.com").await;

    // Persist movie 3 (Drama) through the lookup path, then favorite it
    server.get("/api/movies/3").await.assert_status_ok();
    let (name, value) = bearer(&token);
    server
        .put("/api/users/favorites/3")
        .add_header(name, value)
        .await
        .assert_status_ok();

    let (name, value) = bearer(&token);
    let response = server
        .get("/api/recommendations")
        .add_header(name, value)
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["type"], "personalized");
    assert_eq!(body["message"], "Based on your interest in Drama");

    // Discover returned 3, 201, 202; the favorited 3 must be filtered out
    let ids: Vec<i64> = body["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![201, 202]);
}

#[tokio::test]
async fn test_personalized_without_provider_is_bad_gateway() {
    let server = create_test_server();
    let token = register(&server, "ada@example.com").await;

    let (name, value) = bearer(&token);
    server
        .put("/api/users/favorites/3")
        .add_header(name, value)
        .await
        .assert_status_ok();

    let (name, value) = bearer(&token);
    let response = server
        .get("/api/recommendations")
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_similar_route_without_provider_is_bad_gateway() {
    let server = create_test_server();
    let response = server.get("/api/recommendations/similar/3").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_similar_route_with_provider() {
    let server = create_test_server_with(Some(Arc::new(FakeProvider)));
    let response = server.get("/api/recommendations/similar/3").await;
    response.assert_status_ok();
    let movies: serde_json::Value = response.json();
    assert_eq!(movies[0]["id"], 301);
}

#[tokio::test]
async fn test_because_you_watched_route() {
    let server = create_test_server_with(Some(Arc::new(FakeProvider)));
    let response = server.get("/api/recommendations/because-you-watched/42").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["movie"]["title"], "Movie 42");
    assert_eq!(body["recommendations"][0]["id"], 401);
}
