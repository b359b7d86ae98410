use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::password;
use crate::domain::availability::{self, DateSpan};
use crate::domain::validation::{self, ValidationError};
use crate::entities::{
    blockout, push_token, schedule, sea_orm_active_enums::Role, team_member, user,
};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAccount {
    pub user: user::Model,
    /// Shown once to the admin; the person changes it after signing in.
    pub temporary_password: String,
}

/// One roster row: the person plus their availability as of today.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    #[serde(flatten)]
    pub user: user::Model,
    pub available_today: bool,
    pub upcoming_blockouts: Vec<blockout::Model>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> AppResult<user::Model> {
    super::find::<user::Entity, _>(db, id, "person").await
}

pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> AppResult<Option<user::Model>> {
    Ok(user::Entity::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await?)
}

/// Creates an account on behalf of an admin. The admin's own session is not
/// involved; the generated password is returned once.
pub async fn create_account(
    db: &DatabaseConnection,
    input: NewPerson,
) -> AppResult<CreatedAccount> {
    let temporary_password = password::temporary();
    let user = insert_user(db, input, temporary_password.clone()).await?;
    Ok(CreatedAccount {
        user,
        temporary_password,
    })
}

/// Inserts a user with a chosen password. Used by account creation and the
/// first-admin bootstrap.
pub async fn insert_user(
    db: &DatabaseConnection,
    input: NewPerson,
    plain_password: String,
) -> AppResult<user::Model> {
    let name = validation::required("name", &input.name)?;
    let email = validation::email(&input.email)?;

    if find_by_email(db, &email).await?.is_some() {
        return Err(AppError::Conflict(format!("{email} is already registered")));
    }

    let password_hash = password::hash_blocking(plain_password)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let now = Utc::now();
    let user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        role: Set(input.role),
        phone: Set(validation::optional(input.phone)),
        password_hash: Set(password_hash),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(user_id = %user.id, role = ?user.role, "account created");
    Ok(user)
}

/// Creates the first admin when the directory is still empty.
pub async fn bootstrap_admin(
    db: &DatabaseConnection,
    email: &str,
    password: String,
) -> AppResult<Option<user::Model>> {
    if user::Entity::find().one(db).await?.is_some() {
        return Ok(None);
    }
    validation::new_password(&password, &password)?;
    let input = NewPerson {
        name: "Admin".into(),
        email: email.to_string(),
        role: Role::Admin,
        phone: None,
    };
    insert_user(db, input, password).await.map(Some)
}

/// Everyone ordered by name, with today's availability badge.
pub async fn roster(db: &DatabaseConnection, today: NaiveDate) -> AppResult<Vec<PersonSummary>> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Name)
        .all(db)
        .await?;

    let mut blockouts: HashMap<Uuid, Vec<blockout::Model>> = HashMap::new();
    for b in blockout::Entity::find()
        .filter(blockout::Column::EndDate.gte(today))
        .order_by_asc(blockout::Column::StartDate)
        .all(db)
        .await?
    {
        blockouts.entry(b.user_id).or_default().push(b);
    }

    Ok(users
        .into_iter()
        .map(|user| {
            let upcoming = blockouts.remove(&user.id).unwrap_or_default();
            let spans: Vec<DateSpan> = upcoming.iter().map(blockout::Model::span).collect();
            PersonSummary {
                available_today: availability::is_available(today, &spans),
                upcoming_blockouts: upcoming,
                user,
            }
        })
        .collect())
}

pub async fn update_profile(
    db: &DatabaseConnection,
    user: user::Model,
    update: ProfileUpdate,
) -> AppResult<user::Model> {
    let mut model = user.into_active_model();
    if let Some(name) = update.name {
        model.name = Set(validation::required("name", &name)?);
    }
    if update.phone.is_some() {
        model.phone = Set(validation::optional(update.phone));
    }
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}

/// Re-checks the current password before setting a new one.
pub async fn change_password(
    db: &DatabaseConnection,
    user: user::Model,
    change: PasswordChange,
) -> AppResult<user::Model> {
    validation::new_password(&change.new, &change.confirm)?;

    let matches = password::verify_blocking(change.current, user.password_hash.clone())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !matches {
        return Err(ValidationError::WrongPassword.into());
    }

    let password_hash = password::hash_blocking(change.new)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let mut model = user.into_active_model();
    model.password_hash = Set(password_hash);
    model.updated_at = Set(Utc::now());
    let user = model.update(db).await?;
    info!(user_id = %user.id, "password changed");
    Ok(user)
}

pub async fn set_role(db: &DatabaseConnection, id: Uuid, role: Role) -> AppResult<user::Model> {
    let mut model = get(db, id).await?.into_active_model();
    model.role = Set(role);
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}

/// Removes the person and everything that only makes sense with them.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let txn = db.begin().await?;
    blockout::Entity::delete_many()
        .filter(blockout::Column::UserId.eq(id))
        .exec(&txn)
        .await?;
    team_member::Entity::delete_many()
        .filter(team_member::Column::UserId.eq(id))
        .exec(&txn)
        .await?;
    schedule::Entity::delete_many()
        .filter(schedule::Column::UserId.eq(id))
        .exec(&txn)
        .await?;
    push_token::Entity::delete_by_id(id).exec(&txn).await?;
    super::delete_by_id::<user::Entity, _>(&txn, id, "person").await?;
    txn.commit().await?;
    info!(user_id = %id, "person deleted");
    Ok(())
}
