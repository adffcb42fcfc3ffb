use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::reject,
    profile::{
        dto::{HomeResponse, ProfileResponse, UpdateProfileForm},
        services::ProfileEditor,
    },
    state::AppState,
    users::IdentityStore,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/app", get(home))
        .route("/app/profile", get(get_profile))
        .route("/app/update_profile", post(update_profile))
}

#[instrument(skip(identity))]
pub async fn home(
    State(identity): State<IdentityStore>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<HomeResponse>, (StatusCode, String)> {
    let user = identity.lookup_by_id(user_id).await.map_err(reject)?;
    Ok(Json(user.into()))
}

#[instrument(skip(identity))]
pub async fn get_profile(
    State(identity): State<IdentityStore>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let user = identity.lookup_by_id(user_id).await.map_err(reject)?;
    Ok(Json(user.into()))
}

#[instrument(skip(editor, form))]
pub async fn update_profile(
    State(editor): State<ProfileEditor>,
    AuthUser(user_id): AuthUser,
    Form(form): Form<UpdateProfileForm>,
) -> Result<StatusCode, (StatusCode, String)> {
    editor.update_bio(user_id, &form.bio).await.map_err(reject)?;
    Ok(StatusCode::OK)
}
