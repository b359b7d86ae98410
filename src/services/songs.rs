use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::search::{self, PAGE_SIZE, SEARCH_WINDOW, SearchPlan};
use crate::domain::validation;
use crate::entities::song;
use crate::error::{AppError, AppResult};

/// Characters kept verbatim in upload URLs.
const URL_SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'.').remove(b'-');

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInput {
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub spotify_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongPage {
    pub songs: Vec<song::Model>,
    pub has_more: bool,
    /// Pass back as `after` to load the next page.
    pub next_after: Option<String>,
}

/// Position of the last song on a browse page. Titles repeat, so the id
/// breaks ties. Written as `{id}:{title}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongCursor {
    pub id: Uuid,
    pub title: String,
}

impl SongCursor {
    fn of(song: &song::Model) -> Self {
        Self {
            id: song.id,
            title: song.title.clone(),
        }
    }
}

impl fmt::Display for SongCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.title)
    }
}

impl FromStr for SongCursor {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::BadRequest(format!("invalid song cursor: {s}"));
        let (id, title) = s.split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            id: Uuid::parse_str(id).map_err(|_| invalid())?,
            title: title.to_string(),
        })
    }
}

#[derive(Debug)]
pub enum SongListing {
    Page(SongPage),
    /// The query was too short; nothing was fetched.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Mp3,
}

impl FileKind {
    fn label(self) -> &'static str {
        match self {
            FileKind::Pdf => "chords",
            FileKind::Mp3 => "audio",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Mp3 => "mp3",
        }
    }
}

pub async fn list(
    db: &DatabaseConnection,
    query: Option<&str>,
    after: Option<&str>,
) -> AppResult<SongListing> {
    match search::plan(query) {
        SearchPlan::Ignore => Ok(SongListing::Ignored),
        SearchPlan::Browse => browse(db, after).await.map(SongListing::Page),
        SearchPlan::Filter(needle) => {
            let window = song::Entity::find()
                .order_by_asc(song::Column::Title)
                .limit(SEARCH_WINDOW)
                .all(db)
                .await?;
            Ok(SongListing::Page(SongPage {
                songs: search::filter(window, &needle),
                has_more: false,
                next_after: None,
            }))
        }
    }
}

/// One page of the catalog ordered by title then id, starting after the
/// `after` cursor.
async fn browse(db: &DatabaseConnection, after: Option<&str>) -> AppResult<SongPage> {
    let mut query = song::Entity::find()
        .order_by_asc(song::Column::Title)
        .order_by_asc(song::Column::Id);
    if let Some(after) = after.filter(|a| !a.is_empty()) {
        let cursor: SongCursor = after.parse()?;
        query = query.filter(
            Condition::any()
                .add(song::Column::Title.gt(cursor.title.as_str()))
                .add(
                    Condition::all()
                        .add(song::Column::Title.eq(cursor.title.as_str()))
                        .add(song::Column::Id.gt(cursor.id)),
                ),
        );
    }
    let mut songs = query.limit(PAGE_SIZE + 1).all(db).await?;

    let has_more = songs.len() as u64 > PAGE_SIZE;
    songs.truncate(PAGE_SIZE as usize);
    let next_after = if has_more {
        songs.last().map(|s| SongCursor::of(s).to_string())
    } else {
        None
    };

    Ok(SongPage {
        songs,
        has_more,
        next_after,
    })
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> AppResult<song::Model> {
    super::find::<song::Entity, _>(db, id, "song").await
}

struct CleanSong {
    title: String,
    artist: Option<String>,
    key: Option<String>,
    lyrics: Option<String>,
    youtube_url: Option<String>,
    spotify_url: Option<String>,
}

impl SongInput {
    fn clean(self) -> AppResult<CleanSong> {
        Ok(CleanSong {
            title: validation::required("title", &self.title)?,
            artist: validation::optional(self.artist),
            key: validation::optional(self.key),
            lyrics: validation::optional(self.lyrics),
            youtube_url: validation::optional(self.youtube_url),
            spotify_url: validation::optional(self.spotify_url),
        })
    }
}

pub async fn create(db: &DatabaseConnection, input: SongInput) -> AppResult<song::Model> {
    let song = input.clean()?;
    let now = Utc::now();
    let model = song::ActiveModel {
        id: Set(Uuid::new_v4()),
        search_key: Set(search::search_key(&song.title, song.artist.as_deref())),
        title: Set(song.title),
        artist: Set(song.artist),
        key: Set(song.key),
        lyrics: Set(song.lyrics),
        youtube_url: Set(song.youtube_url),
        spotify_url: Set(song.spotify_url),
        pdf_url: Set(None),
        mp3_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    debug!(song_id = %model.id, "song created");
    Ok(model)
}

pub async fn update(db: &DatabaseConnection, id: Uuid, input: SongInput) -> AppResult<song::Model> {
    let existing = get(db, id).await?;
    let song = input.clean()?;

    let mut model = existing.into_active_model();
    model.search_key = Set(search::search_key(&song.title, song.artist.as_deref()));
    model.title = Set(song.title);
    model.artist = Set(song.artist);
    model.key = Set(song.key);
    model.lyrics = Set(song.lyrics);
    model.youtube_url = Set(song.youtube_url);
    model.spotify_url = Set(song.spotify_url);
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    super::delete_by_id::<song::Entity, _>(db, id, "song").await
}

/// Keeps letters and digits, everything else becomes `_`.
fn file_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Stores an uploaded chord sheet or recording under `upload_dir/songs` and
/// points the song at its public `/uploads` URL.
pub async fn attach_file(
    db: &DatabaseConnection,
    upload_dir: &Path,
    id: Uuid,
    kind: FileKind,
    bytes: &[u8],
) -> AppResult<song::Model> {
    if bytes.is_empty() {
        return Err(validation::ValidationError::Required("file").into());
    }
    let existing = get(db, id).await?;

    let file_name = format!(
        "{}_{}_{}.{}",
        file_stem(&existing.title),
        kind.label(),
        Utc::now().timestamp_millis(),
        kind.extension()
    );
    let dir = upload_dir.join("songs");
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Internal(format!("creating {}: {e}", dir.display())))?;
    let path = dir.join(&file_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::Internal(format!("writing {}: {e}", path.display())))?;
    info!(song_id = %id, path = %path.display(), "song file stored");

    let url = format!("/uploads/songs/{}", utf8_percent_encode(&file_name, URL_SAFE));
    let mut model = existing.into_active_model();
    match kind {
        FileKind::Pdf => model.pdf_url = Set(Some(url)),
        FileKind::Mp3 => model.mp3_url = Set(Some(url)),
    }
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}
