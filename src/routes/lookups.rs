//! Reference lists. Everyone signed in may read them; only admins write.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    auth::user::{AuthSession, current_user, require_role},
    entities::{location, role, sea_orm_active_enums::Role, service_type, song_tag},
    error::AppResult,
    router::AppState,
    services::lookups::{self, ColorInput, LocationInput, RoleInput},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/service-types", get(service_types).post(create_service_type))
        .route(
            "/service-types/{id}",
            put(update_service_type).delete(delete_service_type),
        )
        .route("/locations", get(locations).post(create_location))
        .route(
            "/locations/{id}",
            put(update_location).delete(delete_location),
        )
        .route("/roles", get(roles).post(create_role))
        .route("/roles/{id}", put(update_role).delete(delete_role))
        .route("/song-tags", get(song_tags).post(create_song_tag))
        .route(
            "/song-tags/{id}",
            put(update_song_tag).delete(delete_song_tag),
        )
}

pub async fn service_types(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Json<Vec<service_type::Model>>> {
    current_user(&auth_session)?;
    Ok(Json(lookups::service_types(&state.db).await?))
}

pub async fn create_service_type(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<ColorInput>,
) -> AppResult<(StatusCode, Json<service_type::Model>)> {
    require_role(&auth_session, Role::Admin)?;
    let created = lookups::create_service_type(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_service_type(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(input): Json<ColorInput>,
) -> AppResult<Json<service_type::Model>> {
    require_role(&auth_session, Role::Admin)?;
    Ok(Json(lookups::update_service_type(&state.db, id, input).await?))
}

pub async fn delete_service_type(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&auth_session, Role::Admin)?;
    lookups::delete_service_type(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn locations(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Json<Vec<location::Model>>> {
    current_user(&auth_session)?;
    Ok(Json(lookups::locations(&state.db).await?))
}

pub async fn create_location(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<LocationInput>,
) -> AppResult<(StatusCode, Json<location::Model>)> {
    require_role(&auth_session, Role::Admin)?;
    let created = lookups::create_location(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_location(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(input): Json<LocationInput>,
) -> AppResult<Json<location::Model>> {
    require_role(&auth_session, Role::Admin)?;
    Ok(Json(lookups::update_location(&state.db, id, input).await?))
}

pub async fn delete_location(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&auth_session, Role::Admin)?;
    lookups::delete_location(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn roles(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Json<Vec<role::Model>>> {
    current_user(&auth_session)?;
    Ok(Json(lookups::roles(&state.db).await?))
}

pub async fn create_role(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<RoleInput>,
) -> AppResult<(StatusCode, Json<role::Model>)> {
    require_role(&auth_session, Role::Admin)?;
    let created = lookups::create_role(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_role(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(input): Json<RoleInput>,
) -> AppResult<Json<role::Model>> {
    require_role(&auth_session, Role::Admin)?;
    Ok(Json(lookups::update_role(&state.db, id, input).await?))
}

pub async fn delete_role(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&auth_session, Role::Admin)?;
    lookups::delete_role(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn song_tags(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Json<Vec<song_tag::Model>>> {
    current_user(&auth_session)?;
    Ok(Json(lookups::song_tags(&state.db).await?))
}

pub async fn create_song_tag(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<ColorInput>,
) -> AppResult<(StatusCode, Json<song_tag::Model>)> {
    require_role(&auth_session, Role::Admin)?;
    let created = lookups::create_song_tag(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_song_tag(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(input): Json<ColorInput>,
) -> AppResult<Json<song_tag::Model>> {
    require_role(&auth_session, Role::Admin)?;
    Ok(Json(lookups::update_song_tag(&state.db, id, input).await?))
}

pub async fn delete_song_tag(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&auth_session, Role::Admin)?;
    lookups::delete_song_tag(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
