use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    auth::user::{AuthSession, current_user, require_role},
    entities::sea_orm_active_enums::Role,
    error::AppResult,
    router::AppState,
    services::teams::{self, TeamInput, TeamWithMembers},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teams", get(list).post(create))
        .route("/teams/{id}", get(show).put(update).delete(remove))
        .route(
            "/teams/{id}/members/{user_id}",
            post(add_member).delete(remove_member),
        )
        .route("/teams/{id}/members/{user_id}/toggle", post(toggle_member))
}

pub async fn list(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Json<Vec<TeamWithMembers>>> {
    current_user(&auth_session)?;
    Ok(Json(teams::list(&state.db).await?))
}

pub async fn show(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TeamWithMembers>> {
    current_user(&auth_session)?;
    Ok(Json(teams::get(&state.db, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<TeamInput>,
) -> AppResult<(StatusCode, Json<TeamWithMembers>)> {
    require_role(&auth_session, Role::Leader)?;
    Ok((StatusCode::CREATED, Json(teams::create(&state.db, input).await?)))
}

pub async fn update(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(input): Json<TeamInput>,
) -> AppResult<Json<TeamWithMembers>> {
    require_role(&auth_session, Role::Leader)?;
    Ok(Json(teams::update(&state.db, id, input).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&auth_session, Role::Leader)?;
    teams::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_member(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<TeamWithMembers>> {
    require_role(&auth_session, Role::Leader)?;
    Ok(Json(teams::add_member(&state.db, id, user_id).await?))
}

pub async fn remove_member(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<TeamWithMembers>> {
    require_role(&auth_session, Role::Leader)?;
    Ok(Json(teams::remove_member(&state.db, id, user_id).await?))
}

pub async fn toggle_member(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<TeamWithMembers>> {
    require_role(&auth_session, Role::Leader)?;
    Ok(Json(teams::toggle_member(&state.db, id, user_id).await?))
}
