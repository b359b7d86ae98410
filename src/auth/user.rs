use async_trait::async_trait;
use axum_login::{AuthUser, AuthnBackend, UserId};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use super::password::{self, PasswordError};
use crate::entities::{sea_orm_active_enums::Role, user};
use crate::error::AppError;

impl AuthUser for user::Model {
    type Id = Uuid;

    fn id(&self) -> Self::Id {
        self.id
    }

    // Changing the password invalidates every other session.
    fn session_auth_hash(&self) -> &[u8] {
        self.password_hash.as_bytes()
    }
}

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error(transparent)]
    Seaorm(sea_orm::DbErr),

    #[error(transparent)]
    Password(PasswordError),
}

#[derive(Debug, Clone)]
pub struct Backend {
    db: DatabaseConnection,
}

impl Backend {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthnBackend for Backend {
    type User = user::Model;
    type Credentials = Credentials;
    type Error = BackendError;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let email = creds.email.trim().to_lowercase();
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(Self::Error::Seaorm)?;

        let Some(user) = user else {
            debug!("login for unknown email");
            return Ok(None);
        };

        let matches = password::verify_blocking(creds.password, user.password_hash.clone())
            .await
            .map_err(Self::Error::Password)?;

        Ok(matches.then_some(user))
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        user::Entity::find_by_id(*user_id)
            .one(&self.db)
            .await
            .map_err(Self::Error::Seaorm)
    }
}

pub type AuthSession = axum_login::AuthSession<Backend>;

/// The signed-in user, or 401.
pub fn current_user(auth_session: &AuthSession) -> Result<user::Model, AppError> {
    auth_session.user.clone().ok_or(AppError::Unauthorized)
}

/// The signed-in user if their role is at least `min`; 401 or 403 otherwise.
pub fn require_role(auth_session: &AuthSession, min: Role) -> Result<user::Model, AppError> {
    let user = current_user(auth_session)?;
    if user.role < min {
        return Err(AppError::Forbidden);
    }
    Ok(user)
}
