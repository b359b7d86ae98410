use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::auth::user::BackendError;
use crate::domain::{assignment::AlreadyAnswered, validation::ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    BadRequest(String),

    #[error("sign in required")]
    Unauthorized,

    #[error("not allowed for your role")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl From<AlreadyAnswered> for AppError {
    fn from(err: AlreadyAnswered) -> Self {
        AppError::Conflict(err.to_string())
    }
}

impl From<axum_login::Error<crate::auth::user::Backend>> for AppError {
    fn from(err: axum_login::Error<crate::auth::user::Backend>) -> Self {
        match err {
            axum_login::Error::Backend(err) => AppError::Backend(err),
            axum_login::Error::Session(err) => AppError::Internal(err.to_string()),
        }
    }
}

impl AppError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Database(_) | AppError::Backend(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "something went wrong".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
