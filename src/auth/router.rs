use axum::{
    Form, Json, Router,
    extract::State,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::info;

use super::user::{AuthSession, Credentials};
use crate::error::{AppError, AppResult};
use crate::router::AppState;
use crate::services::push_tokens;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(self::form::login))
        .route("/logout", get(self::form::logout))
        .route("/api/auth/login", post(self::api::login))
        .route("/api/auth/logout", post(self::api::logout))
}

mod api {
    use super::*;
    use crate::entities::user;

    pub async fn login(
        mut auth_session: AuthSession,
        Json(creds): Json<Credentials>,
    ) -> AppResult<Json<user::Model>> {
        let user = auth_session
            .authenticate(creds)
            .await?
            .ok_or(AppError::Unauthorized)?;
        auth_session.login(&user).await?;
        info!(user_id = %user.id, "signed in");
        Ok(Json(user))
    }

    /// Forgets the device's push token before ending the session so a
    /// signed-out phone stops receiving pushes.
    pub async fn logout(
        State(state): State<AppState>,
        mut auth_session: AuthSession,
    ) -> AppResult<impl IntoResponse> {
        if let Some(user) = &auth_session.user {
            push_tokens::remove(&state.db, user.id).await?;
        }
        auth_session.logout().await?;
        Ok(axum::http::StatusCode::NO_CONTENT)
    }
}

mod form {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct LoginForm {
        email: String,
        password: String,
        next: Option<String>,
    }

    pub async fn login(
        mut auth_session: AuthSession,
        Form(form): Form<LoginForm>,
    ) -> impl IntoResponse {
        let creds = Credentials {
            email: form.email,
            password: form.password,
        };
        let user = match auth_session.authenticate(creds).await {
            Ok(Some(user)) => user,
            Ok(None) => return Redirect::to("/?error=credentials").into_response(),
            Err(e) => return AppError::from(e).into_response(),
        };

        if let Err(e) = auth_session.login(&user).await {
            return AppError::from(e).into_response();
        }

        // Only same-site paths are followed after log in.
        match form.next.filter(|n| n.starts_with('/') && !n.starts_with("//")) {
            Some(next) => Redirect::to(&next).into_response(),
            None => Redirect::to("/dashboard").into_response(),
        }
    }

    pub async fn logout(mut auth_session: AuthSession) -> impl IntoResponse {
        match auth_session.logout().await {
            Ok(_) => Redirect::to("/").into_response(),
            Err(e) => AppError::from(e).into_response(),
        }
    }
}
