use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::notifications::{self, NewNotification};
use crate::domain::availability::DateSpan;
use crate::domain::validation;
use crate::entities::{blockout, sea_orm_active_enums::NotificationKind, user};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
pub struct NewBlockout {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

pub async fn list(db: &DatabaseConnection, user_id: Uuid) -> AppResult<Vec<blockout::Model>> {
    Ok(blockout::Entity::find()
        .filter(blockout::Column::UserId.eq(user_id))
        .order_by_asc(blockout::Column::StartDate)
        .all(db)
        .await?)
}

/// Records a blockout and tells the admins about it.
pub async fn add(
    db: &DatabaseConnection,
    user: &user::Model,
    input: NewBlockout,
) -> AppResult<blockout::Model> {
    let span = DateSpan::try_new(input.start, input.end)?;
    let reason = validation::optional(input.reason);
    let now = Utc::now();

    let txn = db.begin().await?;
    let created = blockout::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        start_date: Set(span.start),
        end_date: Set(span.end),
        reason: Set(reason.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    notifications::create(
        &txn,
        NewNotification {
            kind: NotificationKind::BlockoutCreated,
            user_id: user.id,
            user_name: user.name.clone(),
            assignment_id: None,
            event_title: None,
            dates: Some(format!("{} al {}", span.start, span.end)),
            reason,
        },
    )
    .await?;
    txn.commit().await?;

    info!(user_id = %user.id, start = %span.start, end = %span.end, "blockout added");
    Ok(created)
}

/// Removes one of the caller's own blockouts.
pub async fn remove(db: &DatabaseConnection, user_id: Uuid, id: Uuid) -> AppResult<()> {
    let result = blockout::Entity::delete_many()
        .filter(blockout::Column::Id.eq(id))
        .filter(blockout::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("blockout"));
    }
    Ok(())
}
