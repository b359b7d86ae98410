use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::user::{AuthSession, current_user, require_role},
    domain::availability,
    entities::{sea_orm_active_enums::Role, user},
    error::AppResult,
    router::AppState,
    services::people::{self, CreatedAccount, NewPerson, PersonSummary},
};

#[derive(Debug, Deserialize)]
pub struct RoleChange {
    role: Role,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/people", get(roster).post(create_person))
        .route("/people/{id}", get(person).delete(delete_person))
        .route("/people/{id}/role", put(set_role))
}

pub async fn roster(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Json<Vec<PersonSummary>>> {
    current_user(&auth_session)?;
    Ok(Json(people::roster(&state.db, availability::today()).await?))
}

pub async fn person(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<user::Model>> {
    current_user(&auth_session)?;
    Ok(Json(people::get(&state.db, id).await?))
}

pub async fn create_person(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<NewPerson>,
) -> AppResult<(StatusCode, Json<CreatedAccount>)> {
    require_role(&auth_session, Role::Admin)?;
    let account = people::create_account(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn delete_person(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&auth_session, Role::Admin)?;
    people::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_role(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(change): Json<RoleChange>,
) -> AppResult<Json<user::Model>> {
    require_role(&auth_session, Role::Admin)?;
    Ok(Json(people::set_role(&state.db, id, change.role).await?))
}
