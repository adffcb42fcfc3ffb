pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use services::ScoreLedger;

pub fn router() -> Router<AppState> {
    handlers::ledger_routes()
}
