use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

/// Legacy header accepted alongside the standard Authorization form
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Extractor gating authenticated routes: resolves the request's bearer
/// credential to a user id through the session store
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("No token, authorization denied".to_string()))?;

        let user_id = state
            .sessions
            .session_user(&token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Token is not valid".to_string()))?;

        Ok(AuthUser(user_id))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.trim().to_string());
        }
    }

    headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
}
