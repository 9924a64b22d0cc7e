use axum::{
    extract::{Path, State},
    Json,
};

use crate::{models::MovieDetail, state::AppState};

/// Handler for the movie detail endpoint
///
/// Always returns a payload: the lookup service degrades to the fallback
/// catalog rather than surfacing upstream or store errors.
pub async fn movie_detail(
    State(state): State<AppState>,
    Path(tmdb_id): Path<i64>,
) -> Json<MovieDetail> {
    Json(state.lookup.get_movie(tmdb_id).await)
}
