use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AnnouncementKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcements")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,
    /// `None` addresses everyone and reads back as `"all"`.
    #[serde(with = "target")]
    pub target_team_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: AnnouncementKind,
    pub author_id: Option<Uuid>,
    pub author_name: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TargetTeamId",
        to = "super::team::Column::Id",
        on_delete = "Cascade"
    )]
    Team,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// `"all"` on the wire for an announcement addressed to everyone.
mod target {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use uuid::Uuid;

    const ALL: &str = "all";

    pub fn serialize<S: Serializer>(
        target: &Option<Uuid>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match target {
            Some(team_id) => serializer.collect_str(team_id),
            None => serializer.serialize_str(ALL),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Uuid>, D::Error> {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None | Some(ALL) => Ok(None),
            Some(team_id) => Uuid::parse_str(team_id).map(Some).map_err(D::Error::custom),
        }
    }
}
