use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{error::AppResult, middleware::AuthUser, models::Rating, state::AppState};

use super::auth::TokenResponse;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i32,
}

/// Handler for registration: creates the account and issues a token
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .accounts
        .register(&request.name, &request.email, &request.password)
        .await?;
    Ok(Json(TokenResponse { token }))
}

/// Adds a movie to the caller's favorites; duplicates are rejected
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.accounts.add_favorite(user_id, &movie_id).await?))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(
        state.accounts.remove_favorite(user_id, &movie_id).await?,
    ))
}

/// Adds a movie to the caller's watchlist; duplicates are rejected
pub async fn add_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(
        state.accounts.add_watchlist(user_id, &movie_id).await?,
    ))
}

pub async fn remove_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(
        state.accounts.remove_watchlist(user_id, &movie_id).await?,
    ))
}

/// Sets the caller's rating for a movie, replacing any previous value
pub async fn rate_movie(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(movie_id): Path<String>,
    Json(request): Json<RateRequest>,
) -> AppResult<Json<Vec<Rating>>> {
    Ok(Json(
        state
            .accounts
            .rate(user_id, &movie_id, request.rating)
            .await?,
    ))
}
