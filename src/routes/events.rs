use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::user::{AuthSession, current_user, require_role},
    domain::availability,
    entities::{event, schedule, sea_orm_active_enums::Role},
    error::AppResult,
    push::fanout,
    router::AppState,
    services::{
        events::{self, Candidate, EventDetail, EventInput, OrderEdit},
        schedules::{self, NewAssignment},
    },
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateQuery {
    team_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionQuery {
    expected_revision: Option<i32>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list).post(create))
        .route("/events/{id}", get(show).put(update).delete(remove))
        .route("/events/{id}/candidates", get(candidates))
        .route("/events/{id}/order", post(add_item))
        .route(
            "/events/{id}/order/{item_id}",
            put(update_item).delete(remove_item),
        )
        .route("/events/{id}/schedules", post(assign))
}

pub async fn list(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Json<Vec<event::Model>>> {
    current_user(&auth_session)?;
    Ok(Json(
        events::list_window(&state.db, availability::today()).await?,
    ))
}

pub async fn show(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventDetail>> {
    current_user(&auth_session)?;
    Ok(Json(events::detail(&state.db, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<EventInput>,
) -> AppResult<(StatusCode, Json<event::Model>)> {
    require_role(&auth_session, Role::Leader)?;
    Ok((StatusCode::CREATED, Json(events::create(&state.db, input).await?)))
}

pub async fn update(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(input): Json<EventInput>,
) -> AppResult<Json<event::Model>> {
    require_role(&auth_session, Role::Leader)?;
    Ok(Json(events::update(&state.db, id, input).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&auth_session, Role::Leader)?;
    events::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn candidates(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Query(query): Query<CandidateQuery>,
) -> AppResult<Json<Vec<Candidate>>> {
    require_role(&auth_session, Role::Leader)?;
    Ok(Json(events::candidates(&state.db, id, query.team_id).await?))
}

pub async fn add_item(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(edit): Json<OrderEdit>,
) -> AppResult<Json<event::Model>> {
    require_role(&auth_session, Role::Leader)?;
    Ok(Json(events::add_item(&state.db, id, edit).await?))
}

pub async fn update_item(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path((id, item_id)): Path<(Uuid, String)>,
    Json(edit): Json<OrderEdit>,
) -> AppResult<Json<event::Model>> {
    require_role(&auth_session, Role::Leader)?;
    Ok(Json(
        events::update_item(&state.db, id, &item_id, edit).await?,
    ))
}

pub async fn remove_item(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path((id, item_id)): Path<(Uuid, String)>,
    Query(query): Query<RevisionQuery>,
) -> AppResult<Json<event::Model>> {
    require_role(&auth_session, Role::Leader)?;
    Ok(Json(
        events::remove_item(&state.db, id, &item_id, query.expected_revision).await?,
    ))
}

/// Creates the assignment, then pushes it to the assignee in the background.
pub async fn assign(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(input): Json<NewAssignment>,
) -> AppResult<(StatusCode, Json<schedule::Model>)> {
    require_role(&auth_session, Role::Leader)?;
    let assignment = schedules::assign(&state.db, id, input).await?;
    fanout::spawn_schedule_created(state.db.clone(), state.push.clone(), assignment.clone());
    Ok((StatusCode::CREATED, Json(assignment)))
}
