mod common;

use chrono::{Duration, Utc};
use common::{db, event_on, give_token, member, RecordingSender};
use ministry::{
    domain::assignment::Response,
    entities::sea_orm_active_enums::{AssignmentStatus, NotificationKind},
    error::AppError,
    push::fanout::{self, Outcome, ASSIGNMENT_TITLE},
    services::{
        notifications,
        schedules::{self, NewAssignment, DECLINE_REASON},
        teams::{self, Positions, TeamInput},
    },
};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

async fn worship_team(db: &DatabaseConnection) -> Uuid {
    let input = TeamInput {
        name: "Alabanza".into(),
        description: None,
        positions: Positions::Text("Voz, Guitarra".into()),
    };
    teams::create(db, input).await.unwrap().team.id
}

#[tokio::test]
async fn decline_is_terminal_and_files_one_notification() {
    let db = db().await;
    let ana = member(&db, "Ana").await;
    let team_id = worship_team(&db).await;
    let event = event_on(&db, "Culto dominical", Utc::now() + Duration::days(3)).await;

    let assignment = schedules::assign(
        &db,
        event.id,
        NewAssignment {
            team_id,
            user_id: ana.id,
            position: "Voz".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(assignment.status, AssignmentStatus::Pending);
    assert_eq!(assignment.user_name, "Ana");

    let declined = schedules::respond(&db, &ana, assignment.id, Response::Decline)
        .await
        .unwrap();
    assert_eq!(declined.status, AssignmentStatus::Declined);
    assert!(declined.responded_at.is_some());

    let inbox = notifications::unread(&db).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::AssignmentDeclined);
    assert_eq!(inbox[0].assignment_id, Some(assignment.id));
    assert_eq!(inbox[0].event_title.as_deref(), Some("Culto dominical"));
    assert_eq!(inbox[0].reason.as_deref(), Some(DECLINE_REASON));

    let again = schedules::respond(&db, &ana, assignment.id, Response::Confirm).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
    assert_eq!(notifications::unread(&db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn only_the_assignee_may_respond() {
    let db = db().await;
    let ana = member(&db, "Ana").await;
    let luis = member(&db, "Luis").await;
    let team_id = worship_team(&db).await;
    let event = event_on(&db, "Ensayo", Utc::now() + Duration::days(1)).await;

    let assignment = schedules::assign(
        &db,
        event.id,
        NewAssignment {
            team_id,
            user_id: ana.id,
            position: "Guitarra".into(),
        },
    )
    .await
    .unwrap();

    let result = schedules::respond(&db, &luis, assignment.id, Response::Confirm).await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    let confirmed = schedules::respond(&db, &ana, assignment.id, Response::Confirm)
        .await
        .unwrap();
    assert_eq!(confirmed.status, AssignmentStatus::Confirmed);
    assert!(notifications::unread(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn assignment_push_goes_to_the_assignee() {
    let db = db().await;
    let sender = RecordingSender::default();
    let ana = member(&db, "Ana").await;
    let team_id = worship_team(&db).await;
    let event = event_on(&db, "Culto", Utc::now() + Duration::days(2)).await;
    let assignment = schedules::assign(
        &db,
        event.id,
        NewAssignment {
            team_id,
            user_id: ana.id,
            position: "Voz".into(),
        },
    )
    .await
    .unwrap();

    let outcome = fanout::notify_schedule_created(&db, &sender, &assignment)
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Skipped("no push token")));
    assert!(sender.messages().is_empty());

    give_token(&db, &ana, "ExponentPushToken[ana]").await;
    let outcome = fanout::notify_schedule_created(&db, &sender, &assignment)
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Sent(_)));

    let messages = sender.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, "ExponentPushToken[ana]");
    assert_eq!(messages[0].title, ASSIGNMENT_TITLE);
    assert!(messages[0].body.starts_with("Culto - "));
    assert!(messages[0].body.ends_with("\nPosición: Voz"));
    assert_eq!(messages[0].data["type"], "assignment");
    assert_eq!(messages[0].data["scheduleId"], assignment.id.to_string());
}

#[tokio::test]
async fn invalid_token_aborts_assignment_push() {
    let db = db().await;
    let sender = RecordingSender::default();
    let ana = member(&db, "Ana").await;
    let team_id = worship_team(&db).await;
    let event = event_on(&db, "Culto", Utc::now()).await;
    give_token(&db, &ana, "not-a-token").await;

    let assignment = schedules::assign(
        &db,
        event.id,
        NewAssignment {
            team_id,
            user_id: ana.id,
            position: "Voz".into(),
        },
    )
    .await
    .unwrap();

    let outcome = fanout::notify_schedule_created(&db, &sender, &assignment)
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Skipped("invalid push token")));
    assert!(sender.messages().is_empty());
}

#[tokio::test]
async fn my_assignments_list_the_newest_first() {
    let db = db().await;
    let ana = member(&db, "Ana").await;
    let team_id = worship_team(&db).await;
    let later = event_on(&db, "Vigilia", Utc::now() + Duration::days(10)).await;
    let sooner = event_on(&db, "Culto dominical", Utc::now() + Duration::days(2)).await;

    for event_id in [later.id, sooner.id] {
        let assignment = NewAssignment {
            team_id,
            user_id: ana.id,
            position: "Voz".into(),
        };
        schedules::assign(&db, event_id, assignment).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let titles: Vec<_> = schedules::for_user(&db, ana.id)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.event_title.unwrap_or_default())
        .collect();
    assert_eq!(titles, vec!["Culto dominical", "Vigilia"]);
}
