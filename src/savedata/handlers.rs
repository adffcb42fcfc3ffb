use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::reject,
    savedata::services::SaveDataService,
    state::AppState,
};

pub fn savedata_routes() -> Router<AppState> {
    Router::new()
        .route("/app/export", get(export_data))
        .route("/app/import", post(import_data))
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub save_data: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportForm {
    pub save_data: String,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub bio: String,
    pub score: i64,
}

#[instrument(skip(svc))]
pub async fn export_data(
    State(svc): State<SaveDataService>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ExportResponse>, (StatusCode, String)> {
    let save_data = svc.export(user_id).await.map_err(reject)?;
    Ok(Json(ExportResponse { save_data }))
}

#[instrument(skip(svc, form))]
pub async fn import_data(
    State(svc): State<SaveDataService>,
    AuthUser(user_id): AuthUser,
    Form(form): Form<ImportForm>,
) -> Result<Json<ImportResponse>, (StatusCode, String)> {
    let data = svc.import(user_id, &form.save_data).await.map_err(reject)?;
    Ok(Json(ImportResponse {
        bio: data.bio,
        score: data.score,
    }))
}
