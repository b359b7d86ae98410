//! Editing the agenda of an event. The agenda is written back as a whole, so
//! every operation here returns a fresh list.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{ValidationError, optional, required};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    pub id: String,
    pub title: String,
    pub duration: String,
    #[serde(default)]
    pub song_id: Option<Uuid>,
    #[serde(default)]
    pub details: Option<String>,
}

/// The editable fields of a segment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFields {
    pub title: String,
    pub duration: String,
    #[serde(default)]
    pub song_id: Option<Uuid>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ItemFields {
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required("title", &self.title)?,
            duration: required("duration", &self.duration)?,
            song_id: self.song_id,
            details: optional(self.details),
        })
    }
}

impl ServiceItem {
    fn with_id(id: String, fields: ItemFields) -> Self {
        Self {
            id,
            title: fields.title,
            duration: fields.duration,
            song_id: fields.song_id,
            details: fields.details,
        }
    }
}

/// Appends a segment under a newly generated id.
pub fn append(items: &[ServiceItem], fields: ItemFields) -> (Vec<ServiceItem>, String) {
    let id = Uuid::new_v4().to_string();
    let mut updated = items.to_vec();
    updated.push(ServiceItem::with_id(id.clone(), fields));
    (updated, id)
}

/// Replaces the fields of segment `id` in place. `None` when no such segment.
pub fn replace(items: &[ServiceItem], id: &str, fields: ItemFields) -> Option<Vec<ServiceItem>> {
    if !items.iter().any(|item| item.id == id) {
        return None;
    }
    let mut fields = Some(fields);
    let updated = items
        .iter()
        .map(|item| match fields.take_if(|_| item.id == id) {
            Some(fields) => ServiceItem::with_id(item.id.clone(), fields),
            None => item.clone(),
        })
        .collect();
    Some(updated)
}

/// Drops segment `id`. `None` when no such segment.
pub fn remove(items: &[ServiceItem], id: &str) -> Option<Vec<ServiceItem>> {
    let updated: Vec<ServiceItem> = items.iter().filter(|item| item.id != id).cloned().collect();
    (updated.len() != items.len()).then_some(updated)
}
