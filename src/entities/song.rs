use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "songs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub artist: Option<String>,
    pub key: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub lyrics: Option<String>,
    pub youtube_url: Option<String>,
    pub spotify_url: Option<String>,
    pub pdf_url: Option<String>,
    pub mp3_url: Option<String>,
    /// Normalized "title artist", rewritten on every save.
    #[serde(skip)]
    pub search_key: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
