use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    auth::user::{AuthSession, current_user},
    entities::{blockout, push_token, user},
    error::AppResult,
    router::AppState,
    services::{
        blockouts::{self, NewBlockout},
        people::{self, PasswordChange, ProfileUpdate},
        push_tokens::{self, Registration},
        schedules::{self, MyAssignment},
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me).put(update_me))
        .route("/me/password", post(change_password))
        .route("/me/blockouts", get(my_blockouts).post(add_blockout))
        .route("/me/blockouts/{id}", delete(remove_blockout))
        .route("/me/schedules", get(my_schedules))
        .route("/me/push-token", put(register_push_token))
}

pub async fn me(auth_session: AuthSession) -> AppResult<Json<user::Model>> {
    Ok(Json(current_user(&auth_session)?))
}

pub async fn update_me(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(update): Json<ProfileUpdate>,
) -> AppResult<Json<user::Model>> {
    let user = current_user(&auth_session)?;
    Ok(Json(people::update_profile(&state.db, user, update).await?))
}

/// Changing the password rotates the session hash, so the session is
/// re-established for the new credentials.
pub async fn change_password(
    State(state): State<AppState>,
    mut auth_session: AuthSession,
    Json(change): Json<PasswordChange>,
) -> AppResult<StatusCode> {
    let user = current_user(&auth_session)?;
    let user = people::change_password(&state.db, user, change).await?;
    auth_session.login(&user).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn my_blockouts(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Json<Vec<blockout::Model>>> {
    let user = current_user(&auth_session)?;
    Ok(Json(blockouts::list(&state.db, user.id).await?))
}

pub async fn add_blockout(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<NewBlockout>,
) -> AppResult<(StatusCode, Json<blockout::Model>)> {
    let user = current_user(&auth_session)?;
    let created = blockouts::add(&state.db, &user, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn remove_blockout(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let user = current_user(&auth_session)?;
    blockouts::remove(&state.db, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn my_schedules(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Json<Vec<MyAssignment>>> {
    let user = current_user(&auth_session)?;
    Ok(Json(schedules::for_user(&state.db, user.id).await?))
}

pub async fn register_push_token(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(registration): Json<Registration>,
) -> AppResult<Json<push_token::Model>> {
    let user = current_user(&auth_session)?;
    Ok(Json(
        push_tokens::register(&state.db, user.id, registration).await?,
    ))
}
