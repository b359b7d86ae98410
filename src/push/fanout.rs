//! Decides who hears about a new assignment or announcement and hands the
//! messages to a [`PushSender`]. Every failure ends the fan-out for that
//! record; nothing is retried.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Local, Locale, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{PushError, PushMessage, PushSender, PushTicket, is_push_token, send_chunked};
use crate::entities::{announcement, event, push_token, schedule, team_member, team};

pub const ASSIGNMENT_TITLE: &str = "🔔 Nueva Asignación";
/// Announcement bodies are cut to this many characters.
pub const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Sent(Vec<PushTicket>),
    Skipped(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum FanoutError {
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Push(#[from] PushError),
}

/// Who an announcement is meant for.
#[derive(Debug, Clone, PartialEq)]
pub enum Audience {
    Everyone,
    Team { name: String, members: Vec<Uuid> },
}

/// The messages for one announcement plus who was left out.
#[derive(Debug, Clone, Default)]
pub struct Recipients {
    /// Users in the audience holding a token, valid or not.
    pub addressed: Vec<Uuid>,
    /// Users whose token failed the format check.
    pub invalid: Vec<Uuid>,
    pub messages: Vec<PushMessage>,
}

/// Day of the event as shown in the push body, e.g. `dom, 12 oct`.
pub fn format_event_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local)
        .format_localized("%a, %-d %b", Locale::es_ES)
        .to_string()
}

pub fn assignment_message(
    token: &str,
    event: &event::Model,
    assignment: &schedule::Model,
) -> PushMessage {
    PushMessage::new(
        token,
        ASSIGNMENT_TITLE.to_string(),
        format!(
            "{} - {}\nPosición: {}",
            event.title,
            format_event_date(event.date),
            assignment.position
        ),
        json!({
            "type": "assignment",
            "eventId": assignment.event_id,
            "scheduleId": assignment.id,
        }),
    )
}

pub fn announcement_title(title: &str, audience: &Audience) -> String {
    match audience {
        Audience::Everyone => format!("📢 {title}"),
        Audience::Team { name, .. } => format!("📢 {name}: {title}"),
    }
}

pub fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Resolves the audience against the registered tokens and builds one
/// message per valid token.
pub fn recipients(
    announcement: &announcement::Model,
    audience: &Audience,
    tokens: &[push_token::Model],
) -> Recipients {
    let members: Option<HashSet<Uuid>> = match audience {
        Audience::Everyone => None,
        Audience::Team { members, .. } => Some(members.iter().copied().collect()),
    };
    let title = announcement_title(&announcement.title, audience);
    let body = preview(&announcement.content);

    let mut out = Recipients::default();
    for token in tokens {
        if members.as_ref().is_some_and(|m| !m.contains(&token.user_id)) {
            continue;
        }
        out.addressed.push(token.user_id);
        if !is_push_token(&token.token) {
            out.invalid.push(token.user_id);
            continue;
        }
        out.messages.push(PushMessage::new(
            token.token.clone(),
            title.clone(),
            body.clone(),
            json!({
                "type": "announcement",
                "announcementId": announcement.id,
            }),
        ));
    }
    out
}

pub async fn notify_schedule_created(
    db: &DatabaseConnection,
    sender: &dyn PushSender,
    assignment: &schedule::Model,
) -> Result<Outcome, FanoutError> {
    info!(user_id = %assignment.user_id, "new assignment");

    let Some(token) = push_token::Entity::find_by_id(assignment.user_id)
        .one(db)
        .await?
    else {
        return Ok(Outcome::Skipped("no push token"));
    };
    if !is_push_token(&token.token) {
        warn!(user_id = %assignment.user_id, "invalid push token");
        return Ok(Outcome::Skipped("invalid push token"));
    }

    let Some(event) = event::Entity::find_by_id(assignment.event_id).one(db).await? else {
        return Ok(Outcome::Skipped("event not found"));
    };

    let message = assignment_message(&token.token, &event, assignment);
    let tickets = sender.send(std::slice::from_ref(&message)).await?;
    info!(tickets = tickets.len(), "assignment push sent");
    Ok(Outcome::Sent(tickets))
}

pub async fn notify_announcement_created(
    db: &DatabaseConnection,
    sender: &dyn PushSender,
    announcement: &announcement::Model,
) -> Result<Outcome, FanoutError> {
    info!(title = %announcement.title, "new announcement");

    let (audience, tokens) = match announcement.target_team_id {
        None => (
            Audience::Everyone,
            push_token::Entity::find().all(db).await?,
        ),
        Some(team_id) => {
            let Some(team) = team::Entity::find_by_id(team_id).one(db).await? else {
                return Ok(Outcome::Skipped("no target users"));
            };
            let members: Vec<Uuid> = team_member::Entity::find()
                .filter(team_member::Column::TeamId.eq(team_id))
                .all(db)
                .await?
                .into_iter()
                .map(|m| m.user_id)
                .collect();
            if members.is_empty() {
                return Ok(Outcome::Skipped("no target users"));
            }
            let tokens = push_token::Entity::find()
                .filter(push_token::Column::UserId.is_in(members.clone()))
                .all(db)
                .await?;
            (
                Audience::Team {
                    name: team.name,
                    members,
                },
                tokens,
            )
        }
    };

    let recipients = recipients(announcement, &audience, &tokens);
    if !recipients.invalid.is_empty() {
        warn!(count = recipients.invalid.len(), "skipping invalid push tokens");
    }
    if recipients.messages.is_empty() {
        return Ok(Outcome::Skipped("no valid push tokens"));
    }

    let tickets = send_chunked(sender, &recipients.messages).await;
    info!(sent = tickets.len(), "announcement pushes sent");
    Ok(Outcome::Sent(tickets))
}

fn log_outcome(kind: &'static str, result: Result<Outcome, FanoutError>) {
    match result {
        Ok(Outcome::Sent(tickets)) => info!(kind, tickets = tickets.len(), "fan-out done"),
        Ok(Outcome::Skipped(reason)) => info!(kind, reason, "fan-out skipped"),
        Err(e) => error!(kind, error = %e, "fan-out failed"),
    }
}

/// Runs the assignment fan-out in the background.
pub fn spawn_schedule_created(
    db: DatabaseConnection,
    sender: Arc<dyn PushSender>,
    assignment: schedule::Model,
) {
    tokio::spawn(async move {
        let result = notify_schedule_created(&db, sender.as_ref(), &assignment).await;
        log_outcome("assignment", result);
    });
}

/// Runs the announcement fan-out in the background.
pub fn spawn_announcement_created(
    db: DatabaseConnection,
    sender: Arc<dyn PushSender>,
    announcement: announcement::Model,
) {
    tokio::spawn(async move {
        let result = notify_announcement_created(&db, sender.as_ref(), &announcement).await;
        log_outcome("announcement", result);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::{AnnouncementKind, Platform};

    fn announcement(content: &str) -> announcement::Model {
        announcement::Model {
            id: Uuid::new_v4(),
            title: "Ensayo".into(),
            content: content.into(),
            details: None,
            target_team_id: None,
            kind: AnnouncementKind::Announcement,
            author_id: None,
            author_name: "Admin".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn token(user_id: Uuid, token: &str) -> push_token::Model {
        push_token::Model {
            user_id,
            token: token.into(),
            platform: Platform::Android,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn preview_truncates_long_content() {
        assert_eq!(preview("corto"), "corto");
        let exact = "a".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&exact), exact);
        let long = "é".repeat(PREVIEW_CHARS + 1);
        let cut = preview(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn team_titles_carry_the_team_name() {
        let team = Audience::Team {
            name: "Alabanza".into(),
            members: vec![],
        };
        assert_eq!(announcement_title("Ensayo", &Audience::Everyone), "📢 Ensayo");
        assert_eq!(announcement_title("Ensayo", &team), "📢 Alabanza: Ensayo");
    }

    #[test]
    fn everyone_addresses_every_token_holder() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let tokens = vec![
            token(a, "ExponentPushToken[a]"),
            token(b, "garbage"),
            token(c, "ExponentPushToken[c]"),
        ];
        let out = recipients(&announcement("hola"), &Audience::Everyone, &tokens);
        assert_eq!(out.addressed, vec![a, b, c]);
        assert_eq!(out.invalid, vec![b]);
        let to: Vec<_> = out.messages.iter().map(|m| m.to.as_str()).collect();
        assert_eq!(to, vec!["ExponentPushToken[a]", "ExponentPushToken[c]"]);
    }

    #[test]
    fn team_audience_is_members_with_tokens() {
        let (member, outsider, tokenless) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let tokens = vec![
            token(member, "ExpoPushToken[m]"),
            token(outsider, "ExpoPushToken[o]"),
        ];
        let audience = Audience::Team {
            name: "Medios".into(),
            members: vec![member, tokenless],
        };
        let out = recipients(&announcement("hola"), &audience, &tokens);
        assert_eq!(out.addressed, vec![member]);
        assert_eq!(out.messages.len(), 1);
        assert_eq!(out.messages[0].title, "📢 Medios: Ensayo");
        assert_eq!(out.messages[0].data["type"], "announcement");
    }
}
