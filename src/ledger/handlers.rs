use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::reject,
    ledger::services::ScoreLedger,
    state::AppState,
    users::{IdentityStore, User},
};

pub fn ledger_routes() -> Router<AppState> {
    Router::new()
        .route("/app/click", post(click))
        .route("/app/reset", post(reset))
}

#[derive(Debug, Deserialize)]
pub struct ResetForm {
    pub id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub id: Uuid,
}

#[instrument(skip(ledger))]
pub async fn click(
    State(ledger): State<ScoreLedger>,
    AuthUser(user_id): AuthUser,
) -> Result<StatusCode, (StatusCode, String)> {
    ledger.record_click(user_id).await.map_err(reject)?;
    Ok(StatusCode::OK)
}

#[instrument(skip(ledger, identity))]
pub async fn reset(
    State(ledger): State<ScoreLedger>,
    State(identity): State<IdentityStore>,
    AuthUser(user_id): AuthUser,
    Form(form): Form<ResetForm>,
) -> Result<Json<ResetResponse>, (StatusCode, String)> {
    let caller = identity.lookup_by_id(user_id).await.map_err(reject)?;

    let target = reset_target(&caller, form.id);
    ledger.reset_score(target).await.map_err(reject)?;
    Ok(Json(ResetResponse { id: target }))
}

/// Admins may reset anyone; everybody else only resets themselves.
fn reset_target(caller: &User, requested: Option<Uuid>) -> Uuid {
    match requested {
        Some(id) if caller.is_admin => id,
        Some(id) if id != caller.id => {
            warn!(user_id = %caller.id, requested = %id, "non-admin tried to reset another user");
            caller.id
        }
        _ => caller.id,
    }
}
