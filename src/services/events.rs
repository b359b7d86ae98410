use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::availability::{self, DateSpan};
use crate::domain::events_window::{self, PAST_LIMIT};
use crate::domain::order_of_service::{self, ItemFields, ServiceItem};
use crate::domain::validation;
use crate::entities::{
    blockout, event, location, schedule, sea_orm_active_enums::EventStatus, service_type,
    team_member, types::OrderOfService, user,
};
use crate::error::{AppError, AppResult};

pub const DEFAULT_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    #[serde(default)]
    pub service_type_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<EventStatus>,
}

#[derive(Debug, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: event::Model,
    pub schedules: Vec<schedule::Model>,
}

/// Someone who could be assigned to an event.
#[derive(Debug, Serialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub user: user::Model,
    pub available: bool,
}

/// An order-of-service edit. `expected_revision` lets a client insist on the
/// version it was looking at.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEdit {
    #[serde(flatten)]
    pub fields: ItemFields,
    #[serde(default)]
    pub expected_revision: Option<i32>,
}

/// Everything from the start of `today` on, plus the latest past events.
pub async fn list_window(db: &DatabaseConnection, today: NaiveDate) -> AppResult<Vec<event::Model>> {
    let cutoff = events_window::start_of_day(today);

    let future = event::Entity::find()
        .filter(event::Column::Date.gte(cutoff))
        .order_by_asc(event::Column::Date)
        .all(db)
        .await?;
    let past = event::Entity::find()
        .filter(event::Column::Date.lt(cutoff))
        .order_by_desc(event::Column::Date)
        .limit(PAST_LIMIT)
        .all(db)
        .await?;

    Ok(events_window::merge_window(future, past))
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> AppResult<event::Model> {
    super::find::<event::Entity, _>(db, id, "event").await
}

pub async fn detail(db: &DatabaseConnection, id: Uuid) -> AppResult<EventDetail> {
    let event = get(db, id).await?;
    let schedules = schedule::Entity::find()
        .filter(schedule::Column::EventId.eq(id))
        .order_by_asc(schedule::Column::AssignedAt)
        .all(db)
        .await?;
    Ok(EventDetail { event, schedules })
}

struct Snapshots {
    location_name: Option<String>,
    service_type_name: Option<String>,
    color: String,
}

/// Copies the names of the referenced lookups onto the event.
async fn snapshots(db: &DatabaseConnection, input: &EventInput) -> AppResult<Snapshots> {
    let location = match input.location_id {
        Some(id) => Some(super::find::<location::Entity, _>(db, id, "location").await?),
        None => None,
    };
    let service_type = match input.service_type_id {
        Some(id) => Some(super::find::<service_type::Entity, _>(db, id, "service type").await?),
        None => None,
    };

    Ok(Snapshots {
        location_name: location.map(|l| l.name),
        color: service_type
            .as_ref()
            .map(|t| t.color.clone())
            .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        service_type_name: service_type.map(|t| t.name),
    })
}

pub async fn create(db: &DatabaseConnection, input: EventInput) -> AppResult<event::Model> {
    let title = validation::required("title", &input.title)?;
    let snapshots = snapshots(db, &input).await?;
    let now = Utc::now();

    let event = event::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title),
        date: Set(input.date),
        description: Set(validation::optional(input.description)),
        location_id: Set(input.location_id),
        location_name: Set(snapshots.location_name),
        service_type_id: Set(input.service_type_id),
        service_type_name: Set(snapshots.service_type_name),
        color: Set(snapshots.color),
        status: Set(input.status.unwrap_or_default()),
        order_of_service: Set(OrderOfService::default()),
        oos_revision: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    debug!(event_id = %event.id, "event created");
    Ok(event)
}

pub async fn update(db: &DatabaseConnection, id: Uuid, input: EventInput) -> AppResult<event::Model> {
    let existing = get(db, id).await?;
    let title = validation::required("title", &input.title)?;
    let snapshots = snapshots(db, &input).await?;

    let mut model = existing.into_active_model();
    model.title = Set(title);
    model.date = Set(input.date);
    model.description = Set(validation::optional(input.description));
    model.location_id = Set(input.location_id);
    model.location_name = Set(snapshots.location_name);
    model.service_type_id = Set(input.service_type_id);
    model.service_type_name = Set(snapshots.service_type_name);
    model.color = Set(snapshots.color);
    if let Some(status) = input.status {
        model.status = Set(status);
    }
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}

/// Deletes the event together with its assignments.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let txn = db.begin().await?;
    schedule::Entity::delete_many()
        .filter(schedule::Column::EventId.eq(id))
        .exec(&txn)
        .await?;
    super::delete_by_id::<event::Entity, _>(&txn, id, "event").await?;
    txn.commit().await?;
    Ok(())
}

/// People who could serve at the event, flagged by their blockouts on its
/// calendar day. With `team_id`, only that team's members.
pub async fn candidates(
    db: &DatabaseConnection,
    event_id: Uuid,
    team_id: Option<Uuid>,
) -> AppResult<Vec<Candidate>> {
    let event = get(db, event_id).await?;
    let day = availability::calendar_day(event.date);

    let mut query = user::Entity::find().order_by_asc(user::Column::Name);
    if let Some(team_id) = team_id {
        let members: Vec<Uuid> = team_member::Entity::find()
            .filter(team_member::Column::TeamId.eq(team_id))
            .all(db)
            .await?
            .into_iter()
            .map(|m| m.user_id)
            .collect();
        query = query.filter(user::Column::Id.is_in(members));
    }
    let users = query.all(db).await?;

    let covering: Vec<blockout::Model> = blockout::Entity::find()
        .filter(blockout::Column::StartDate.lte(day))
        .filter(blockout::Column::EndDate.gte(day))
        .all(db)
        .await?;

    Ok(users
        .into_iter()
        .map(|user| {
            let spans: Vec<DateSpan> = covering
                .iter()
                .filter(|b| b.user_id == user.id)
                .map(blockout::Model::span)
                .collect();
            Candidate {
                available: availability::is_available(day, &spans),
                user,
            }
        })
        .collect())
}

/// Writes a new agenda only if nobody else wrote one since `event` was read.
async fn write_order(
    db: &DatabaseConnection,
    event: event::Model,
    items: Vec<ServiceItem>,
    expected_revision: Option<i32>,
) -> AppResult<event::Model> {
    if expected_revision.is_some_and(|rev| rev != event.oos_revision) {
        return Err(stale(event.id));
    }

    let result = event::Entity::update_many()
        .col_expr(
            event::Column::OrderOfService,
            Expr::value(OrderOfService(items)),
        )
        .col_expr(
            event::Column::OosRevision,
            Expr::value(event.oos_revision + 1),
        )
        .col_expr(event::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(event::Column::Id.eq(event.id))
        .filter(event::Column::OosRevision.eq(event.oos_revision))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(stale(event.id));
    }

    get(db, event.id).await
}

fn stale(event_id: Uuid) -> AppError {
    warn!(%event_id, "stale order of service write");
    AppError::Conflict("the order of service changed; reload and try again".into())
}

pub async fn add_item(
    db: &DatabaseConnection,
    event_id: Uuid,
    edit: OrderEdit,
) -> AppResult<event::Model> {
    let fields = edit.fields.validate()?;
    let event = get(db, event_id).await?;
    let (items, _) = order_of_service::append(&event.order_of_service.0, fields);
    write_order(db, event, items, edit.expected_revision).await
}

pub async fn update_item(
    db: &DatabaseConnection,
    event_id: Uuid,
    item_id: &str,
    edit: OrderEdit,
) -> AppResult<event::Model> {
    let fields = edit.fields.validate()?;
    let event = get(db, event_id).await?;
    let items = order_of_service::replace(&event.order_of_service.0, item_id, fields)
        .ok_or(AppError::NotFound("order of service item"))?;
    write_order(db, event, items, edit.expected_revision).await
}

pub async fn remove_item(
    db: &DatabaseConnection,
    event_id: Uuid,
    item_id: &str,
    expected_revision: Option<i32>,
) -> AppResult<event::Model> {
    let event = get(db, event_id).await?;
    let items = order_of_service::remove(&event.order_of_service.0, item_id)
        .ok_or(AppError::NotFound("order of service item"))?;
    write_order(db, event, items, expected_revision).await
}
