use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::validation::{self, ValidationError};
use crate::entities::{
    announcement,
    sea_orm_active_enums::{AnnouncementKind, Role},
    team, user,
};
use crate::error::AppResult;

pub const TARGET_ALL: &str = "all";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub details: Option<String>,
    /// `"all"` or a team id.
    #[serde(default = "target_all")]
    pub target: String,
    #[serde(default, rename = "type")]
    pub kind: AnnouncementKind,
}

fn target_all() -> String {
    TARGET_ALL.to_string()
}

/// Reads an announcement target; `None` addresses everyone.
pub fn parse_target(target: &str) -> Result<Option<Uuid>, ValidationError> {
    let target = target.trim();
    if target.is_empty() || target == TARGET_ALL {
        return Ok(None);
    }
    Uuid::parse_str(target)
        .map(Some)
        .map_err(|_| ValidationError::Target(target.to_string()))
}

struct CleanAnnouncement {
    title: String,
    content: String,
    details: Option<String>,
    target_team_id: Option<Uuid>,
    kind: AnnouncementKind,
}

async fn clean(db: &DatabaseConnection, input: AnnouncementInput) -> AppResult<CleanAnnouncement> {
    let target_team_id = parse_target(&input.target)?;
    if let Some(team_id) = target_team_id {
        super::find::<team::Entity, _>(db, team_id, "team").await?;
    }
    Ok(CleanAnnouncement {
        title: validation::required("title", &input.title)?,
        content: validation::required("content", &input.content)?,
        details: validation::optional(input.details),
        target_team_id,
        kind: input.kind,
    })
}

/// Newest first. Leaders and admins see everything; volunteers see
/// announcements for everyone and for their own teams.
pub async fn list_for(
    db: &DatabaseConnection,
    viewer: &user::Model,
) -> AppResult<Vec<announcement::Model>> {
    let mut query = announcement::Entity::find().order_by_desc(announcement::Column::CreatedAt);
    if viewer.role < Role::Leader {
        let teams = super::teams::team_ids_of(db, viewer.id).await?;
        query = query.filter(
            Condition::any()
                .add(announcement::Column::TargetTeamId.is_null())
                .add(announcement::Column::TargetTeamId.is_in(teams)),
        );
    }
    Ok(query.all(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> AppResult<announcement::Model> {
    super::find::<announcement::Entity, _>(db, id, "announcement").await
}

pub async fn create(
    db: &DatabaseConnection,
    author: &user::Model,
    input: AnnouncementInput,
) -> AppResult<announcement::Model> {
    let input = clean(db, input).await?;
    let now = Utc::now();
    let model = announcement::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        content: Set(input.content),
        details: Set(input.details),
        target_team_id: Set(input.target_team_id),
        kind: Set(input.kind),
        author_id: Set(Some(author.id)),
        author_name: Set(author.name.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(announcement_id = %model.id, target = ?model.target_team_id, "announcement published");
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    input: AnnouncementInput,
) -> AppResult<announcement::Model> {
    let existing = get(db, id).await?;
    let input = clean(db, input).await?;

    let mut model = existing.into_active_model();
    model.title = Set(input.title);
    model.content = Set(input.content);
    model.details = Set(input.details);
    model.target_team_id = Set(input.target_team_id);
    model.kind = Set(input.kind);
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    super::delete_by_id::<announcement::Entity, _>(db, id, "announcement").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets() {
        assert_eq!(parse_target("all"), Ok(None));
        assert_eq!(parse_target(""), Ok(None));

        let id = Uuid::new_v4();
        assert_eq!(parse_target(&id.to_string()), Ok(Some(id)));
        assert_eq!(
            parse_target("worship"),
            Err(ValidationError::Target("worship".into()))
        );
    }
}
