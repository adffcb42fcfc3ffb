pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use services::Leaderboard;

pub fn router() -> Router<AppState> {
    handlers::leaderboard_routes()
}
