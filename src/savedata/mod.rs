pub mod codec;
pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use services::SaveDataService;

pub fn router() -> Router<AppState> {
    handlers::savedata_routes()
}
