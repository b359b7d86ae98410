mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{PASSWORD, app, event_on, give_token, person, settle};
use ministry::entities::{push_token, sea_orm_active_enums::Role};
use sea_orm::EntityTrait;
use serde_json::json;

#[tokio::test]
async fn api_requires_a_session() {
    let app = app().await;

    let (status, body) = app.request("GET", "/api/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = app.request("GET", "/api/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let app = app().await;
    person(&app.db, "Ana", Role::Volunteer).await;

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "ana@example.org", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signed_in_user_sees_their_profile() {
    let app = app().await;
    let ana = person(&app.db, "Ana", Role::Volunteer).await;
    let cookie = app.login(&ana).await;

    let (status, body) = app.request("GET", "/api/me", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ana@example.org");
    assert_eq!(body["role"], "volunteer");
    assert!(body.get("passwordHash").is_none());

    let (status, body) = app
        .request("PUT", "/api/me", Some(&cookie), Some(json!({ "phone": "555-0101" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone"], "555-0101");
    assert_eq!(body["name"], "Ana");
}

#[tokio::test]
async fn volunteers_cannot_manage_events() {
    let app = app().await;
    let ana = person(&app.db, "Ana", Role::Volunteer).await;
    let cookie = app.login(&ana).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/events",
            Some(&cookie),
            Some(json!({ "title": "Culto", "date": "2025-10-12T15:00:00Z" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn admins_create_accounts_with_a_temporary_password() {
    let app = app().await;
    let admin = person(&app.db, "Pastor", Role::Admin).await;
    let cookie = app.login(&admin).await;

    let new_person = json!({ "name": "Luis", "email": "Luis@Example.org", "role": "leader" });
    let (status, body) = app
        .request("POST", "/api/people", Some(&cookie), Some(new_person.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "luis@example.org");
    assert_eq!(body["user"]["role"], "leader");
    assert!(body["temporaryPassword"].as_str().unwrap().len() >= 6);

    let (status, body) = app
        .request("POST", "/api/people", Some(&cookie), Some(new_person))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    // The admin is still signed in as themselves.
    let (_, me) = app.request("GET", "/api/me", Some(&cookie), None).await;
    assert_eq!(me["name"], "Pastor");
}

#[tokio::test]
async fn blockouts_show_up_in_the_admin_inbox() {
    let app = app().await;
    let admin = person(&app.db, "Pastor", Role::Admin).await;
    let ana = person(&app.db, "Ana", Role::Volunteer).await;
    let ana_cookie = app.login(&ana).await;
    let admin_cookie = app.login(&admin).await;

    let (status, _) = app
        .request(
            "POST",
            "/api/me/blockouts",
            Some(&ana_cookie),
            Some(json!({ "start": "2025-12-20", "end": "2025-12-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .request(
            "POST",
            "/api/me/blockouts",
            Some(&ana_cookie),
            Some(json!({ "start": "2025-12-20", "end": "2025-12-27", "reason": "Vacaciones" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["start"], "2025-12-20");

    let (status, _) = app.request("GET", "/api/notifications", Some(&ana_cookie), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, inbox) = app
        .request("GET", "/api/notifications", Some(&admin_cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox.as_array().unwrap().len(), 1);
    assert_eq!(inbox[0]["type"], "blockout_created");
    assert_eq!(inbox[0]["dates"], "2025-12-20 al 2025-12-27");
    assert_eq!(inbox[0]["userName"], "Ana");

    let (status, body) = app
        .request("POST", "/api/notifications/read-all", Some(&admin_cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);
}

#[tokio::test]
async fn assigning_pushes_and_declining_over_http() {
    let app = app().await;
    let leader = person(&app.db, "Lider", Role::Leader).await;
    let ana = person(&app.db, "Ana", Role::Volunteer).await;
    let leader_cookie = app.login(&leader).await;
    let ana_cookie = app.login(&ana).await;

    let (status, _) = app
        .request(
            "PUT",
            "/api/me/push-token",
            Some(&ana_cookie),
            Some(json!({ "token": "ExponentPushToken[ana]", "platform": "ios" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, team) = app
        .request(
            "POST",
            "/api/teams",
            Some(&leader_cookie),
            Some(json!({ "name": "Alabanza", "positions": "Voz, Piano" })),
        )
        .await;
    assert_eq!(team["positions"], json!(["Voz", "Piano"]));
    let event = event_on(&app.db, "Culto", Utc::now() + Duration::days(5)).await;

    let (status, assignment) = app
        .request(
            "POST",
            &format!("/api/events/{}/schedules", event.id),
            Some(&leader_cookie),
            Some(json!({ "teamId": team["id"], "userId": ana.id, "position": "Piano" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(assignment["status"], "pending");

    settle().await;
    let pushed = app.sender.messages();
    assert_eq!(pushed.len(), 1);
    assert_eq!(pushed[0].to, "ExponentPushToken[ana]");

    let id = assignment["id"].as_str().unwrap();
    let (status, _) = app
        .request("POST", &format!("/api/schedules/{id}/decline"), Some(&leader_cookie), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request("POST", &format!("/api/schedules/{id}/decline"), Some(&ana_cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "declined");

    let (status, _) = app
        .request("POST", &format!("/api/schedules/{id}/confirm"), Some(&ana_cookie), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, mine) = app.request("GET", "/api/me/schedules", Some(&ana_cookie), None).await;
    assert_eq!(mine[0]["eventTitle"], "Culto");
}

#[tokio::test]
async fn leaders_manage_team_membership() {
    let app = app().await;
    let leader = person(&app.db, "Lider", Role::Leader).await;
    let ana = person(&app.db, "Ana", Role::Volunteer).await;
    let leader_cookie = app.login(&leader).await;
    let ana_cookie = app.login(&ana).await;

    let (status, team) = app
        .request(
            "POST",
            "/api/teams",
            Some(&leader_cookie),
            Some(json!({ "name": "Alabanza", "positions": ["Voz"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let members = format!("/api/teams/{}/members/{}", team["id"].as_str().unwrap(), ana.id);
    let toggle = format!("{members}/toggle");

    let (status, _) = app.request("POST", &members, Some(&ana_cookie), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.request("POST", &members, Some(&leader_cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["members"], json!([ana.id]));

    // Adding twice keeps a single membership.
    let (_, body) = app.request("POST", &members, Some(&leader_cookie), None).await;
    assert_eq!(body["members"], json!([ana.id]));

    let (_, body) = app.request("POST", &toggle, Some(&leader_cookie), None).await;
    assert_eq!(body["members"], json!([]));

    let (status, body) = app.request("DELETE", &members, Some(&leader_cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["members"], json!([]));

    let (_, body) = app.request("POST", &toggle, Some(&leader_cookie), None).await;
    assert_eq!(body["members"], json!([ana.id]));
}

#[tokio::test]
async fn changing_the_password_checks_the_current_one() {
    let app = app().await;
    let ana = person(&app.db, "Ana", Role::Volunteer).await;
    let cookie = app.login(&ana).await;

    let attempts = [
        (json!({ "current": "wrong-pass", "new": "nuevo-123", "confirm": "nuevo-123" }),
            "current password is incorrect"),
        (json!({ "current": PASSWORD, "new": "nuevo-123", "confirm": "nuevo-456" }),
            "new passwords do not match"),
        (json!({ "current": PASSWORD, "new": "abc", "confirm": "abc" }),
            "password must be at least 6 characters"),
    ];
    for (body, message) in attempts {
        let (status, error) = app
            .request("POST", "/api/me/password", Some(&cookie), Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "VALIDATION_ERROR");
        assert_eq!(error["message"], message);
    }

    let (status, _) = app
        .request(
            "POST",
            "/api/me/password",
            Some(&cookie),
            Some(json!({ "current": PASSWORD, "new": "nuevo-123", "confirm": "nuevo-123" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let login = |password: &str| json!({ "email": "ana@example.org", "password": password });
    let (status, _) = app
        .request("POST", "/api/auth/login", None, Some(login(PASSWORD)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app
        .request("POST", "/api/auth/login", None, Some(login("nuevo-123")))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn logging_out_forgets_the_push_token() {
    let app = app().await;
    let ana = person(&app.db, "Ana", Role::Volunteer).await;
    let luis = person(&app.db, "Luis", Role::Volunteer).await;
    give_token(&app.db, &ana, "ExponentPushToken[ana]").await;
    give_token(&app.db, &luis, "ExponentPushToken[luis]").await;
    let cookie = app.login(&ana).await;

    let (status, _) = app.request("POST", "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let token = push_token::Entity::find_by_id(ana.id).one(&app.db).await.unwrap();
    assert!(token.is_none());
    let other = push_token::Entity::find_by_id(luis.id).one(&app.db).await.unwrap();
    assert!(other.is_some());

    let (status, _) = app.request("GET", "/api/me", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn single_letter_song_search_is_no_content() {
    let app = app().await;
    let reader = person(&app.db, "Lector", Role::Volunteer).await;
    let cookie = app.login(&reader).await;

    let (status, body) = app.request("GET", "/api/songs?q=a", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);

    let (status, body) = app.request("GET", "/api/songs", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasMore"], false);
}

#[tokio::test]
async fn dashboard_redirects_anonymous_visitors() {
    let app = app().await;
    let (status, _) = app.request("GET", "/dashboard", None, None).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}
