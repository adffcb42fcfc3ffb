use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest},
        jwt::JwtKeys,
        services::authenticate,
    },
    error::{reject, CoreError},
    state::AppState,
    users::{IdentityStore, User},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

fn session_for(keys: &JwtKeys, user: &User) -> Result<AuthResponse, (StatusCode, String)> {
    let (access_token, refresh_token) = keys.issue_session(user.id).map_err(|e| {
        error!(error = %e, user_id = %user.id, "jwt sign failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
    })?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::from(user),
    })
}

#[instrument(skip(identity, keys, payload), fields(username = %payload.username))]
pub async fn login(
    State(identity): State<IdentityStore>,
    State(keys): State<JwtKeys>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let user = authenticate(&identity, &payload.username, &payload.password)
        .await
        .map_err(reject)?
        .ok_or((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()))?;

    let response = session_for(&keys, &user)?;
    info!(user_id = %user.id, "user logged in");
    Ok(Json(response))
}

#[instrument(skip(identity, keys, payload))]
pub async fn refresh(
    State(identity): State<IdentityStore>,
    State(keys): State<JwtKeys>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let user = match identity.lookup_by_id(claims.sub).await {
        Ok(u) => u,
        Err(CoreError::NotFound) => {
            return Err((StatusCode::UNAUTHORIZED, "User not found".into()));
        }
        Err(e) => return Err(reject(e)),
    };

    Ok(Json(session_for(&keys, &user)?))
}
