use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::OnConflict,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::domain::validation;
use crate::entities::{announcement, schedule, team, team_member, types::StringList, user};
use crate::error::AppResult;

/// Positions arrive either as a list or as the comma separated text of a form field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Positions {
    List(Vec<String>),
    Text(String),
}

impl Default for Positions {
    fn default() -> Self {
        Positions::List(Vec::new())
    }
}

impl Positions {
    pub fn into_list(self) -> Vec<String> {
        match self {
            Positions::List(list) => list
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            Positions::Text(text) => validation::comma_list(&text),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub positions: Positions,
}

#[derive(Debug, Serialize)]
pub struct TeamWithMembers {
    #[serde(flatten)]
    pub team: team::Model,
    pub members: Vec<Uuid>,
}

async fn members_of(db: &DatabaseConnection, team_id: Uuid) -> AppResult<Vec<Uuid>> {
    Ok(team_member::Entity::find()
        .filter(team_member::Column::TeamId.eq(team_id))
        .order_by_asc(team_member::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.user_id)
        .collect())
}

pub async fn list(db: &DatabaseConnection) -> AppResult<Vec<TeamWithMembers>> {
    let teams = team::Entity::find()
        .order_by_asc(team::Column::Name)
        .all(db)
        .await?;

    let mut members: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for m in team_member::Entity::find()
        .order_by_asc(team_member::Column::CreatedAt)
        .all(db)
        .await?
    {
        members.entry(m.team_id).or_default().push(m.user_id);
    }

    Ok(teams
        .into_iter()
        .map(|team| TeamWithMembers {
            members: members.remove(&team.id).unwrap_or_default(),
            team,
        })
        .collect())
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> AppResult<TeamWithMembers> {
    let team = super::find::<team::Entity, _>(db, id, "team").await?;
    Ok(TeamWithMembers {
        members: members_of(db, id).await?,
        team,
    })
}

/// Teams the user belongs to.
pub async fn team_ids_of(db: &DatabaseConnection, user_id: Uuid) -> AppResult<Vec<Uuid>> {
    Ok(team_member::Entity::find()
        .filter(team_member::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.team_id)
        .collect())
}

pub async fn create(db: &DatabaseConnection, input: TeamInput) -> AppResult<TeamWithMembers> {
    let now = Utc::now();
    let team = team::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(validation::required("name", &input.name)?),
        description: Set(validation::optional(input.description)),
        positions: Set(StringList(input.positions.into_list())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    Ok(TeamWithMembers {
        team,
        members: Vec::new(),
    })
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    input: TeamInput,
) -> AppResult<TeamWithMembers> {
    let mut model = super::find::<team::Entity, _>(db, id, "team")
        .await?
        .into_active_model();
    model.name = Set(validation::required("name", &input.name)?);
    model.description = Set(validation::optional(input.description));
    model.positions = Set(StringList(input.positions.into_list()));
    model.updated_at = Set(Utc::now());
    let team = model.update(db).await?;

    Ok(TeamWithMembers {
        members: members_of(db, id).await?,
        team,
    })
}

/// Deletes the team with its memberships, assignments and targeted
/// announcements.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let txn = db.begin().await?;
    team_member::Entity::delete_many()
        .filter(team_member::Column::TeamId.eq(id))
        .exec(&txn)
        .await?;
    schedule::Entity::delete_many()
        .filter(schedule::Column::TeamId.eq(id))
        .exec(&txn)
        .await?;
    announcement::Entity::delete_many()
        .filter(announcement::Column::TargetTeamId.eq(id))
        .exec(&txn)
        .await?;
    super::delete_by_id::<team::Entity, _>(&txn, id, "team").await?;
    txn.commit().await?;
    Ok(())
}

/// Adds a member. Adding someone already on the team is a no-op.
pub async fn add_member(
    db: &DatabaseConnection,
    team_id: Uuid,
    user_id: Uuid,
) -> AppResult<TeamWithMembers> {
    super::find::<team::Entity, _>(db, team_id, "team").await?;
    super::find::<user::Entity, _>(db, user_id, "person").await?;

    let now = Utc::now();
    let row = team_member::ActiveModel {
        team_id: Set(team_id),
        user_id: Set(user_id),
        created_at: Set(now),
        updated_at: Set(now),
    };
    team_member::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([team_member::Column::TeamId, team_member::Column::UserId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    debug!(%team_id, %user_id, "member added");

    get(db, team_id).await
}

/// Removes a member. Removing someone not on the team is a no-op.
pub async fn remove_member(
    db: &DatabaseConnection,
    team_id: Uuid,
    user_id: Uuid,
) -> AppResult<TeamWithMembers> {
    team_member::Entity::delete_many()
        .filter(team_member::Column::TeamId.eq(team_id))
        .filter(team_member::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    get(db, team_id).await
}

pub async fn toggle_member(
    db: &DatabaseConnection,
    team_id: Uuid,
    user_id: Uuid,
) -> AppResult<TeamWithMembers> {
    let is_member = team_member::Entity::find_by_id((team_id, user_id))
        .one(db)
        .await?
        .is_some();
    if is_member {
        remove_member(db, team_id, user_id).await
    } else {
        add_member(db, team_id, user_id).await
    }
}
