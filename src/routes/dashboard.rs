use axum::{
    Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use minijinja::context;
use serde::Deserialize;

use crate::{
    auth::user::AuthSession,
    domain::availability,
    entities::sea_orm_active_enums::Role,
    error::{AppError, AppResult},
    router::AppState,
    services::{events, notifications, people},
};

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    error: Option<String>,
    next: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/dashboard", get(dashboard))
        .route("/people", get(roster))
}

fn render(state: &AppState, name: &str, ctx: minijinja::Value) -> AppResult<Html<String>> {
    let html = state
        .templates
        .get_template(name)
        .and_then(|tmpl| tmpl.render(ctx))
        .map_err(|e| AppError::Internal(format!("rendering {name}: {e}")))?;
    Ok(Html(html))
}

pub async fn index(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Query(params): Query<IndexParams>,
) -> AppResult<Response> {
    if auth_session.user.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }
    let html = render(
        &state,
        "index.html",
        context! { error => params.error, next => params.next },
    )?;
    Ok(html.into_response())
}

pub async fn dashboard(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Response> {
    let Some(user) = auth_session.user else {
        return Ok(Redirect::to("/?next=/dashboard").into_response());
    };

    let events = events::list_window(&state.db, availability::today()).await?;
    // Only admins have an inbox.
    let inbox = if user.role == Role::Admin {
        notifications::unread(&state.db).await?
    } else {
        Vec::new()
    };

    let html = render(
        &state,
        "dashboard.html",
        context! { user => user, events => events, notifications => inbox, active => "dashboard" },
    )?;
    Ok(html.into_response())
}

pub async fn roster(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> AppResult<Response> {
    let Some(user) = auth_session.user else {
        return Ok(Redirect::to("/?next=/people").into_response());
    };

    let people = people::roster(&state.db, availability::today()).await?;
    let html = render(
        &state,
        "people.html",
        context! { user => user, people => people, active => "people" },
    )?;
    Ok(html.into_response())
}
