use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, sea_query::Expr,
};
use uuid::Uuid;

use crate::entities::{notification, sea_orm_active_enums::NotificationKind};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub user_id: Uuid,
    pub user_name: String,
    pub assignment_id: Option<Uuid>,
    pub event_title: Option<String>,
    pub dates: Option<String>,
    pub reason: Option<String>,
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    input: NewNotification,
) -> AppResult<notification::Model> {
    let now = Utc::now();
    Ok(notification::ActiveModel {
        id: Set(Uuid::new_v4()),
        kind: Set(input.kind),
        user_id: Set(input.user_id),
        user_name: Set(input.user_name),
        read: Set(false),
        assignment_id: Set(input.assignment_id),
        event_title: Set(input.event_title),
        dates: Set(input.dates),
        reason: Set(input.reason),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?)
}

/// The admin inbox: unread, newest first.
pub async fn unread(db: &DatabaseConnection) -> AppResult<Vec<notification::Model>> {
    Ok(notification::Entity::find()
        .filter(notification::Column::Read.eq(false))
        .order_by_desc(notification::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn mark_read(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let result = notification::Entity::update_many()
        .col_expr(notification::Column::Read, Expr::value(true))
        .col_expr(notification::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(notification::Column::Id.eq(id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("notification"));
    }
    Ok(())
}

pub async fn mark_all_read(db: &DatabaseConnection) -> AppResult<u64> {
    let result = notification::Entity::update_many()
        .col_expr(notification::Column::Read, Expr::value(true))
        .col_expr(notification::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(notification::Column::Read.eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    super::delete_by_id::<notification::Entity, _>(db, id, "notification").await
}
