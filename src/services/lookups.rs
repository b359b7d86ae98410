//! Admin-maintained reference lists: service types, locations, roles and
//! song tags.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, Set};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::validation;
use crate::entities::{location, role, service_type, song_tag, types::StringList};
use crate::error::AppResult;
use crate::services::teams::Positions;

/// Body shared by the two colored lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorInput {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationInput {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleInput {
    pub name: String,
    /// A list or comma separated text, like team positions.
    #[serde(default)]
    pub permissions: Positions,
}

impl ColorInput {
    fn clean(self) -> AppResult<(String, String)> {
        Ok((
            validation::required("name", &self.name)?,
            validation::color(&self.color)?,
        ))
    }
}

pub async fn service_types(db: &DatabaseConnection) -> AppResult<Vec<service_type::Model>> {
    Ok(service_type::Entity::find()
        .order_by_asc(service_type::Column::Name)
        .all(db)
        .await?)
}

pub async fn create_service_type(
    db: &DatabaseConnection,
    input: ColorInput,
) -> AppResult<service_type::Model> {
    let (name, color) = input.clean()?;
    let now = Utc::now();
    Ok(service_type::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        color: Set(color),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?)
}

pub async fn update_service_type(
    db: &DatabaseConnection,
    id: Uuid,
    input: ColorInput,
) -> AppResult<service_type::Model> {
    let existing = super::find::<service_type::Entity, _>(db, id, "service type").await?;
    let (name, color) = input.clean()?;
    let mut model = existing.into_active_model();
    model.name = Set(name);
    model.color = Set(color);
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}

pub async fn delete_service_type(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    super::delete_by_id::<service_type::Entity, _>(db, id, "service type").await
}

pub async fn song_tags(db: &DatabaseConnection) -> AppResult<Vec<song_tag::Model>> {
    Ok(song_tag::Entity::find()
        .order_by_asc(song_tag::Column::Name)
        .all(db)
        .await?)
}

pub async fn create_song_tag(db: &DatabaseConnection, input: ColorInput) -> AppResult<song_tag::Model> {
    let (name, color) = input.clean()?;
    let now = Utc::now();
    Ok(song_tag::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        color: Set(color),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?)
}

pub async fn update_song_tag(
    db: &DatabaseConnection,
    id: Uuid,
    input: ColorInput,
) -> AppResult<song_tag::Model> {
    let existing = super::find::<song_tag::Entity, _>(db, id, "song tag").await?;
    let (name, color) = input.clean()?;
    let mut model = existing.into_active_model();
    model.name = Set(name);
    model.color = Set(color);
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}

pub async fn delete_song_tag(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    super::delete_by_id::<song_tag::Entity, _>(db, id, "song tag").await
}

pub async fn locations(db: &DatabaseConnection) -> AppResult<Vec<location::Model>> {
    Ok(location::Entity::find()
        .order_by_asc(location::Column::Name)
        .all(db)
        .await?)
}

pub async fn create_location(
    db: &DatabaseConnection,
    input: LocationInput,
) -> AppResult<location::Model> {
    let name = validation::required("name", &input.name)?;
    let now = Utc::now();
    Ok(location::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        address: Set(validation::optional(input.address)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?)
}

pub async fn update_location(
    db: &DatabaseConnection,
    id: Uuid,
    input: LocationInput,
) -> AppResult<location::Model> {
    let existing = super::find::<location::Entity, _>(db, id, "location").await?;
    let name = validation::required("name", &input.name)?;
    let mut model = existing.into_active_model();
    model.name = Set(name);
    model.address = Set(validation::optional(input.address));
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}

pub async fn delete_location(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    super::delete_by_id::<location::Entity, _>(db, id, "location").await
}

pub async fn roles(db: &DatabaseConnection) -> AppResult<Vec<role::Model>> {
    Ok(role::Entity::find()
        .order_by_asc(role::Column::Name)
        .all(db)
        .await?)
}

pub async fn create_role(db: &DatabaseConnection, input: RoleInput) -> AppResult<role::Model> {
    let name = validation::required("name", &input.name)?;
    let now = Utc::now();
    Ok(role::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        permissions: Set(StringList(input.permissions.into_list())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?)
}

pub async fn update_role(
    db: &DatabaseConnection,
    id: Uuid,
    input: RoleInput,
) -> AppResult<role::Model> {
    let existing = super::find::<role::Entity, _>(db, id, "role").await?;
    let name = validation::required("name", &input.name)?;
    let mut model = existing.into_active_model();
    model.name = Set(name);
    model.permissions = Set(StringList(input.permissions.into_list()));
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}

pub async fn delete_role(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    super::delete_by_id::<role::Entity, _>(db, id, "role").await
}
