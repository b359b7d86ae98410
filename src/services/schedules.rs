use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::assignment::{self, AlreadyAnswered, Response};
use crate::domain::validation;
use crate::entities::{
    event, schedule,
    sea_orm_active_enums::{AssignmentStatus, NotificationKind},
    team, user,
};
use crate::error::{AppError, AppResult};
use crate::services::notifications::{self, NewNotification};

pub const DECLINE_REASON: &str = "Rechazado por usuario";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub position: String,
}

/// An assignment as the assignee sees it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyAssignment {
    #[serde(flatten)]
    pub schedule: schedule::Model,
    pub event_title: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
}

pub async fn assign(
    db: &DatabaseConnection,
    event_id: Uuid,
    input: NewAssignment,
) -> AppResult<schedule::Model> {
    let position = validation::required("position", &input.position)?;
    super::find::<event::Entity, _>(db, event_id, "event").await?;
    super::find::<team::Entity, _>(db, input.team_id, "team").await?;
    let person = super::find::<user::Entity, _>(db, input.user_id, "user").await?;

    let now = Utc::now();
    let assignment = schedule::ActiveModel {
        id: Set(Uuid::new_v4()),
        event_id: Set(event_id),
        team_id: Set(input.team_id),
        user_id: Set(person.id),
        user_name: Set(person.name),
        position: Set(position),
        status: Set(AssignmentStatus::Pending),
        assigned_at: Set(now),
        responded_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(schedule_id = %assignment.id, %event_id, user_id = %assignment.user_id, "assignment created");
    Ok(assignment)
}

/// Removes an assignment regardless of its status.
pub async fn unassign(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    super::delete_by_id::<schedule::Entity, _>(db, id, "schedule").await
}

/// The person's assignments, most recently assigned first.
pub async fn for_user(db: &DatabaseConnection, user_id: Uuid) -> AppResult<Vec<MyAssignment>> {
    let rows = schedule::Entity::find()
        .filter(schedule::Column::UserId.eq(user_id))
        .find_also_related(event::Entity)
        .order_by_desc(schedule::Column::AssignedAt)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(schedule, event)| MyAssignment {
            schedule,
            event_title: event.as_ref().map(|e| e.title.clone()),
            event_date: event.map(|e| e.date),
        })
        .collect())
}

/// Confirms or declines an assignment on behalf of its assignee.
///
/// The status update is conditional on the row still being pending, so two
/// concurrent answers cannot both win. A decline also files one admin
/// notification inside the same transaction.
pub async fn respond(
    db: &DatabaseConnection,
    responder: &user::Model,
    id: Uuid,
    response: Response,
) -> AppResult<schedule::Model> {
    let current = super::find::<schedule::Entity, _>(db, id, "schedule").await?;
    if current.user_id != responder.id {
        return Err(AppError::Forbidden);
    }
    let next = assignment::respond(current.status, response)?;

    let txn = db.begin().await?;
    let now = Utc::now();
    let result = schedule::Entity::update_many()
        .col_expr(schedule::Column::Status, Expr::value(next))
        .col_expr(schedule::Column::RespondedAt, Expr::value(Some(now)))
        .col_expr(schedule::Column::UpdatedAt, Expr::value(now))
        .filter(schedule::Column::Id.eq(id))
        .filter(schedule::Column::Status.eq(AssignmentStatus::Pending))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        let answered = super::find::<schedule::Entity, _>(&txn, id, "schedule").await?;
        return Err(AlreadyAnswered(answered.status).into());
    }

    if next == AssignmentStatus::Declined {
        let event_title = event::Entity::find_by_id(current.event_id)
            .one(&txn)
            .await?
            .map(|e| e.title);
        notifications::create(
            &txn,
            NewNotification {
                kind: NotificationKind::AssignmentDeclined,
                user_id: responder.id,
                user_name: responder.name.clone(),
                assignment_id: Some(id),
                event_title,
                dates: None,
                reason: Some(DECLINE_REASON.to_string()),
            },
        )
        .await?;
    }
    txn.commit().await?;

    debug!(schedule_id = %id, status = ?next, "assignment answered");
    super::find::<schedule::Entity, _>(db, id, "schedule").await
}
