use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::entities::{push_token, sea_orm_active_enums::Platform};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub token: String,
    pub platform: Platform,
}

/// Stores the caller's device token, replacing any earlier one.
pub async fn register(
    db: &DatabaseConnection,
    user_id: Uuid,
    registration: Registration,
) -> AppResult<push_token::Model> {
    let token = crate::domain::validation::required("token", &registration.token)?;
    let now = Utc::now();
    let model = push_token::ActiveModel {
        user_id: Set(user_id),
        token: Set(token),
        platform: Set(registration.platform),
        created_at: Set(now),
        updated_at: Set(now),
    };

    push_token::Entity::insert(model)
        .on_conflict(
            OnConflict::column(push_token::Column::UserId)
                .update_columns([
                    push_token::Column::Token,
                    push_token::Column::Platform,
                    push_token::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    debug!(%user_id, "push token registered");

    push_token::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("push token"))
}

pub async fn remove(db: &DatabaseConnection, user_id: Uuid) -> AppResult<()> {
    push_token::Entity::delete_by_id(user_id).exec(db).await?;
    Ok(())
}
