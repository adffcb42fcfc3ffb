use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::reject,
    leaderboard::services::{Leaderboard, LeaderboardEntry},
    state::AppState,
    users::IdentityStore,
};

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub leaders: Vec<LeaderboardEntry>,
    pub is_admin: bool,
}

pub fn leaderboard_routes() -> Router<AppState> {
    Router::new().route("/app/leaderboard", get(leaderboard))
}

#[instrument(skip(state, identity, board))]
pub async fn leaderboard(
    State(state): State<AppState>,
    State(identity): State<IdentityStore>,
    State(board): State<Leaderboard>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<LeaderboardResponse>, (StatusCode, String)> {
    let viewer = identity.lookup_by_id(user_id).await.map_err(reject)?;
    let leaders = board
        .top_n(state.config.leaderboard_size)
        .await
        .map_err(reject)?;

    Ok(Json(LeaderboardResponse {
        leaders,
        is_admin: viewer.is_admin,
    }))
}
