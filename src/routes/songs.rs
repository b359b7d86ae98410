use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::user::{AuthSession, current_user, require_role},
    domain::validation::ValidationError,
    entities::{sea_orm_active_enums::Role, song},
    error::{AppError, AppResult},
    router::AppState,
    services::songs::{self, FileKind, SongInput, SongListing},
};

/// Chord sheets and rehearsal recordings; larger than axum's default.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct SongQuery {
    q: Option<String>,
    after: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/songs", get(list).post(create))
        .route("/songs/{id}", get(show).put(update).delete(remove))
        .route(
            "/songs/{id}/files/{kind}",
            post(upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

/// A one-character query answers 204 so the client keeps its current list.
pub async fn list(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Query(query): Query<SongQuery>,
) -> AppResult<Response> {
    current_user(&auth_session)?;
    let listing = songs::list(&state.db, query.q.as_deref(), query.after.as_deref()).await?;
    Ok(match listing {
        SongListing::Page(page) => Json(page).into_response(),
        SongListing::Ignored => StatusCode::NO_CONTENT.into_response(),
    })
}

pub async fn show(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<song::Model>> {
    current_user(&auth_session)?;
    Ok(Json(songs::get(&state.db, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<SongInput>,
) -> AppResult<(StatusCode, Json<song::Model>)> {
    require_role(&auth_session, Role::Leader)?;
    Ok((StatusCode::CREATED, Json(songs::create(&state.db, input).await?)))
}

pub async fn update(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(input): Json<SongInput>,
) -> AppResult<Json<song::Model>> {
    require_role(&auth_session, Role::Leader)?;
    Ok(Json(songs::update(&state.db, id, input).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&auth_session, Role::Leader)?;
    songs::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Stores the first `file` part of a multipart body.
pub async fn upload(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path((id, kind)): Path<(Uuid, FileKind)>,
    mut multipart: Multipart,
) -> AppResult<Json<song::Model>> {
    require_role(&auth_session, Role::Leader)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let song = songs::attach_file(&state.db, &state.config.upload_dir, id, kind, &bytes).await?;
        return Ok(Json(song));
    }

    Err(ValidationError::Required("file").into())
}
