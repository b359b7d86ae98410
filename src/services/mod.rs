//! Database operations behind the HTTP handlers. Each function validates its
//! input, talks to the database and returns plain models.

pub mod announcements;
pub mod blockouts;
pub mod events;
pub mod lookups;
pub mod notifications;
pub mod people;
pub mod push_tokens;
pub mod schedules;
pub mod songs;
pub mod teams;

use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Loads a row by id or fails with 404.
pub(crate) async fn find<E, C>(db: &C, id: Uuid, what: &'static str) -> AppResult<E::Model>
where
    E: EntityTrait,
    C: ConnectionTrait,
    Uuid: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    E::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound(what))
}

/// Deletes a row by id; 404 when nothing was deleted.
pub(crate) async fn delete_by_id<E, C>(db: &C, id: Uuid, what: &'static str) -> AppResult<()>
where
    E: EntityTrait,
    C: ConnectionTrait,
    Uuid: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let result = E::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(what));
    }
    Ok(())
}
