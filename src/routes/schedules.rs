use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
};
use uuid::Uuid;

use crate::{
    auth::user::{AuthSession, current_user, require_role},
    domain::assignment::Response,
    entities::{schedule, sea_orm_active_enums::Role},
    error::AppResult,
    router::AppState,
    services::schedules,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/schedules/{id}", delete(unassign))
        .route("/schedules/{id}/confirm", post(confirm))
        .route("/schedules/{id}/decline", post(decline))
}

pub async fn unassign(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&auth_session, Role::Leader)?;
    schedules::unassign(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn confirm(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<schedule::Model>> {
    let user = current_user(&auth_session)?;
    Ok(Json(
        schedules::respond(&state.db, &user, id, Response::Confirm).await?,
    ))
}

pub async fn decline(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<schedule::Model>> {
    let user = current_user(&auth_session)?;
    Ok(Json(
        schedules::respond(&state.db, &user, id, Response::Decline).await?,
    ))
}
