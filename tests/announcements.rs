mod common;

use axum::http::StatusCode;
use common::{app, db, give_token, member, person, RecordingSender};
use ministry::{
    entities::sea_orm_active_enums::{AnnouncementKind, Role},
    push::fanout::{self, Outcome},
    services::{
        announcements::{self, AnnouncementInput},
        teams::{self, Positions, TeamInput},
    },
};
use serde_json::{json, Value};

fn input(title: &str, content: &str, target: &str) -> AnnouncementInput {
    AnnouncementInput {
        title: title.into(),
        content: content.into(),
        details: None,
        target: target.into(),
        kind: AnnouncementKind::Announcement,
    }
}

#[tokio::test]
async fn everyone_with_a_valid_token_hears_a_general_announcement() {
    let db = db().await;
    let sender = RecordingSender::default();
    let pastor = person(&db, "Pastor", Role::Admin).await;
    let ana = member(&db, "Ana").await;
    let luis = member(&db, "Luis").await;
    let _silent = member(&db, "Marta").await;
    give_token(&db, &ana, "ExponentPushToken[ana]").await;
    give_token(&db, &luis, "garbage").await;

    let long = "x".repeat(150);
    let created = announcements::create(&db, &pastor, input("Retiro", &long, "all"))
        .await
        .unwrap();
    assert_eq!(created.target_team_id, None);
    assert_eq!(created.author_name, "Pastor");

    let outcome = fanout::notify_announcement_created(&db, &sender, &created)
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Sent(ref t) if t.len() == 1));

    let messages = sender.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, "ExponentPushToken[ana]");
    assert_eq!(messages[0].title, "📢 Retiro");
    assert_eq!(messages[0].body, format!("{}...", "x".repeat(100)));
}

#[tokio::test]
async fn team_announcements_reach_members_only() {
    let db = db().await;
    let sender = RecordingSender::default();
    let pastor = person(&db, "Pastor", Role::Admin).await;
    let ana = member(&db, "Ana").await;
    let luis = member(&db, "Luis").await;
    give_token(&db, &ana, "ExponentPushToken[ana]").await;
    give_token(&db, &luis, "ExponentPushToken[luis]").await;

    let team = teams::create(
        &db,
        TeamInput {
            name: "Alabanza".into(),
            description: None,
            positions: Positions::default(),
        },
    )
    .await
    .unwrap();
    teams::add_member(&db, team.team.id, ana.id).await.unwrap();

    let created = announcements::create(
        &db,
        &pastor,
        input("Ensayo", "Sábado 5pm", &team.team.id.to_string()),
    )
    .await
    .unwrap();
    fanout::notify_announcement_created(&db, &sender, &created)
        .await
        .unwrap();

    let messages = sender.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, "ExponentPushToken[ana]");
    assert_eq!(messages[0].title, "📢 Alabanza: Ensayo");
    assert_eq!(messages[0].body, "Sábado 5pm");

    // Volunteers only see what is addressed to them.
    let general = announcements::create(&db, &pastor, input("Aviso", "Para todos", "all"))
        .await
        .unwrap();
    let seen_by_luis: Vec<_> = announcements::list_for(&db, &luis)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(seen_by_luis, vec![general.id]);
    assert_eq!(announcements::list_for(&db, &ana).await.unwrap().len(), 2);
    assert_eq!(announcements::list_for(&db, &pastor).await.unwrap().len(), 2);
}

#[tokio::test]
async fn large_audiences_are_sent_in_relay_sized_batches() {
    let db = db().await;
    let sender = RecordingSender::default();
    let pastor = person(&db, "Pastor", Role::Admin).await;
    for i in 0..150 {
        let someone = member(&db, &format!("Persona{i}")).await;
        give_token(&db, &someone, &format!("ExponentPushToken[{i}]")).await;
    }

    let created = announcements::create(&db, &pastor, input("Culto", "Hoy", "all"))
        .await
        .unwrap();
    fanout::notify_announcement_created(&db, &sender, &created)
        .await
        .unwrap();

    assert_eq!(sender.batch_sizes(), vec![100, 50]);
}

#[tokio::test]
async fn an_empty_team_is_skipped() {
    let db = db().await;
    let sender = RecordingSender::default();
    let pastor = person(&db, "Pastor", Role::Admin).await;
    let team = teams::create(
        &db,
        TeamInput {
            name: "Sonido".into(),
            description: None,
            positions: Positions::default(),
        },
    )
    .await
    .unwrap();

    let created = announcements::create(
        &db,
        &pastor,
        input("Cables", "Revisar", &team.team.id.to_string()),
    )
    .await
    .unwrap();
    let outcome = fanout::notify_announcement_created(&db, &sender, &created)
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Skipped("no target users")));
    assert!(sender.messages().is_empty());
}

fn titles(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn volunteers_read_general_and_own_team_announcements() {
    let app = app().await;
    let leader = person(&app.db, "Lider", Role::Leader).await;
    let ana = person(&app.db, "Ana", Role::Volunteer).await;
    let luis = person(&app.db, "Luis", Role::Volunteer).await;
    let leader_cookie = app.login(&leader).await;
    let ana_cookie = app.login(&ana).await;
    let luis_cookie = app.login(&luis).await;

    let mut team_ids = Vec::new();
    for (name, who) in [("Alabanza", &ana), ("Sonido", &luis)] {
        let team = teams::create(
            &app.db,
            TeamInput {
                name: name.into(),
                description: None,
                positions: Positions::default(),
            },
        )
        .await
        .unwrap();
        teams::add_member(&app.db, team.team.id, who.id).await.unwrap();
        team_ids.push(team.team.id);
    }
    let (worship, sound) = (team_ids[0], team_ids[1]);

    let posts = [
        json!({ "title": "Ayuno", "content": "Martes", "target": "all" }),
        json!({ "title": "Ensayo", "content": "Sábado", "target": worship }),
        json!({ "title": "Cables", "content": "Revisar", "target": sound }),
    ];
    for post in posts {
        let (status, created) = app
            .request("POST", "/api/announcements", Some(&leader_cookie), Some(post.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["targetTeamId"], post["target"]);
    }

    let (status, seen) = app.request("GET", "/api/announcements", Some(&ana_cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    let mut seen = titles(&seen);
    seen.sort();
    assert_eq!(seen, vec!["Ayuno", "Ensayo"]);

    let (_, seen) = app.request("GET", "/api/announcements", Some(&luis_cookie), None).await;
    let mut seen = titles(&seen);
    seen.sort();
    assert_eq!(seen, vec!["Ayuno", "Cables"]);

    let (_, everything) = app.request("GET", "/api/announcements", Some(&leader_cookie), None).await;
    assert_eq!(titles(&everything).len(), 3);

    // Announcements addressed to a deleted team go with it.
    let (status, _) = app
        .request("DELETE", &format!("/api/teams/{worship}"), Some(&leader_cookie), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, everything) = app.request("GET", "/api/announcements", Some(&leader_cookie), None).await;
    let mut left = titles(&everything);
    left.sort();
    assert_eq!(left, vec!["Ayuno", "Cables"]);
}
