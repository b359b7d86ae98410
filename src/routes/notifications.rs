use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::user::{AuthSession, require_role},
    entities::{notification, sea_orm_active_enums::Role},
    error::AppResult,
    router::AppState,
    services::notifications,
};

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    updated: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(unread))
        .route("/notifications/read-all", post(read_all))
        .route("/notifications/{id}", delete(remove))
        .route("/notifications/{id}/read", post(read))
}

pub async fn unread(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Json<Vec<notification::Model>>> {
    require_role(&auth_session, Role::Admin)?;
    Ok(Json(notifications::unread(&state.db).await?))
}

pub async fn read(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&auth_session, Role::Admin)?;
    notifications::mark_read(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn read_all(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Json<MarkedRead>> {
    require_role(&auth_session, Role::Admin)?;
    let updated = notifications::mark_all_read(&state.db).await?;
    Ok(Json(MarkedRead { updated }))
}

pub async fn remove(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&auth_session, Role::Admin)?;
    notifications::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
