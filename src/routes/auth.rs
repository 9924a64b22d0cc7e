use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{error::AppResult, middleware::AuthUser, models::UserProfile, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Bearer token issued by registration and login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Handler for login: verifies credentials and issues a token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .accounts
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(TokenResponse { token }))
}

/// Handler returning the authenticated user's profile
pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(state.accounts.profile(user_id).await?))
}
