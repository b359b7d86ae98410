use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    auth::user::{AuthSession, current_user, require_role},
    entities::{announcement, sea_orm_active_enums::Role},
    error::AppResult,
    push::fanout,
    router::AppState,
    services::announcements::{self, AnnouncementInput},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/announcements", get(list).post(create))
        .route(
            "/announcements/{id}",
            get(show).put(update).delete(remove),
        )
}

pub async fn list(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Json<Vec<announcement::Model>>> {
    let user = current_user(&auth_session)?;
    Ok(Json(announcements::list_for(&state.db, &user).await?))
}

pub async fn show(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<announcement::Model>> {
    current_user(&auth_session)?;
    Ok(Json(announcements::get(&state.db, id).await?))
}

/// Publishes the announcement, then pushes it to its audience in the
/// background.
pub async fn create(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<AnnouncementInput>,
) -> AppResult<(StatusCode, Json<announcement::Model>)> {
    let author = require_role(&auth_session, Role::Leader)?;
    let created = announcements::create(&state.db, &author, input).await?;
    fanout::spawn_announcement_created(state.db.clone(), state.push.clone(), created.clone());
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(input): Json<AnnouncementInput>,
) -> AppResult<Json<announcement::Model>> {
    require_role(&auth_session, Role::Leader)?;
    Ok(Json(announcements::update(&state.db, id, input).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&auth_session, Role::Leader)?;
    announcements::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
