use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::TmdbMovie,
    services::{BecauseYouWatched, Recommendations},
    state::AppState,
};

/// Handler for the personalized recommendation feed
pub async fn recommend(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Recommendations>> {
    Ok(Json(state.recommender.for_user(user_id).await?))
}

/// Handler for the similar-titles list of one movie
pub async fn similar(
    State(state): State<AppState>,
    Path(tmdb_id): Path<i64>,
) -> AppResult<Json<Vec<TmdbMovie>>> {
    Ok(Json(state.recommender.similar_to(tmdb_id).await?))
}

/// Handler for recommendations seeded by a single watched movie
pub async fn because_you_watched(
    State(state): State<AppState>,
    Path(tmdb_id): Path<i64>,
) -> AppResult<Json<BecauseYouWatched>> {
    Ok(Json(state.recommender.because_you_watched(tmdb_id).await?))
}
