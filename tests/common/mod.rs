#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use ministry::{
    config::Config,
    database::setup_database,
    entities::{
        event,
        sea_orm_active_enums::{Platform, Role},
        user,
    },
    push::{PushError, PushMessage, PushSender, PushTicket},
    router::{AppState, create_router},
    services::{
        events::{self, EventInput},
        people::{self, NewPerson},
        push_tokens::{self, Registration},
    },
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use uuid::Uuid;

pub const PASSWORD: &str = "secret-123";

/// Records every batch instead of calling the relay.
#[derive(Default)]
pub struct RecordingSender {
    pub batches: Mutex<Vec<Vec<PushMessage>>>,
}

impl RecordingSender {
    pub fn messages(&self) -> Vec<PushMessage> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl PushSender for RecordingSender {
    async fn send(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        self.batches.lock().unwrap().push(messages.to_vec());
        Ok(messages
            .iter()
            .enumerate()
            .map(|(i, _)| PushTicket::Ok { id: format!("ticket-{i}") })
            .collect())
    }
}

pub struct TestApp {
    pub db: DatabaseConnection,
    pub sender: Arc<RecordingSender>,
    pub router: Router,
}

pub async fn db() -> DatabaseConnection {
    setup_database("sqlite::memory:").await.unwrap()
}

pub async fn app() -> TestApp {
    let db = db().await;
    let sender = Arc::new(RecordingSender::default());
    let state = AppState::new(
        db.clone(),
        sender.clone(),
        Config::for_database("sqlite::memory:"),
    );
    let router = create_router(state, MemoryStore::default());
    TestApp { db, sender, router }
}

pub async fn person(db: &DatabaseConnection, name: &str, role: Role) -> user::Model {
    let input = NewPerson {
        name: name.into(),
        email: format!("{}@example.org", name.to_lowercase()),
        role,
        phone: None,
    };
    people::insert_user(db, input, PASSWORD.into()).await.unwrap()
}

/// A person who never signs in; skips password hashing.
pub async fn member(db: &DatabaseConnection, name: &str) -> user::Model {
    let now = Utc::now();
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        email: Set(format!("{}@example.org", name.to_lowercase())),
        role: Set(Role::Volunteer),
        phone: Set(None),
        password_hash: Set(String::new()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn give_token(db: &DatabaseConnection, user: &user::Model, token: &str) {
    let registration = Registration {
        token: token.into(),
        platform: Platform::Android,
    };
    push_tokens::register(db, user.id, registration).await.unwrap();
}

pub async fn event_on(db: &DatabaseConnection, title: &str, date: DateTime<Utc>) -> event::Model {
    let input = EventInput {
        title: title.into(),
        date,
        description: None,
        location_id: None,
        service_type_id: None,
        status: None,
    };
    events::create(db, input).await.unwrap()
}

impl TestApp {
    /// Signs `user` in and returns the session cookie.
    pub async fn login(&self, user: &user::Model) -> String {
        let body = serde_json::json!({ "email": user.email, "password": PASSWORD });
        let response = self
            .router
            .clone()
            .oneshot(
                Request::post("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie")
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

/// Waits for background fan-out tasks to reach the recording sender.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
}
