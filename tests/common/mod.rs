// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use commandpost::config::Config;
use commandpost::db::{FirestoreDb, Stores};
use commandpost::models::article::DEFAULT_ARTICLE_IMAGE;
use commandpost::models::{Article, ArticleCategory, ExamTag, Role};
use commandpost::routes::create_router;
use commandpost::time_utils::MockClock;
use commandpost::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// 2026-01-01T00:00:00Z
#[allow(dead_code)]
pub const START: i64 = 1_767_225_600;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

#[allow(dead_code)]
pub fn start_time() -> DateTime<Utc> {
    DateTime::from_timestamp(START, 0).unwrap()
}

/// Router plus handles the tests poke at directly.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub clock: Arc<MockClock>,
}

/// Test app over in-memory stores and a mock clock.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with(Stores::memory())
}

#[allow(dead_code)]
pub fn create_test_app_with(stores: Stores) -> TestApp {
    let clock = Arc::new(MockClock::new(start_time()));
    let state = Arc::new(
        AppState::new(Config::test_default(), stores, clock.clone())
            .expect("test config is valid"),
    );

    TestApp {
        router: create_router(state.clone()),
        state,
        clock,
    }
}

/// Build a request with an optional bearer token and JSON body.
#[allow(dead_code)]
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and decode the JSON body (`Value::Null` if empty).
#[allow(dead_code)]
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Register through the API. Returns (token, identity id).
#[allow(dead_code)]
pub async fn register(app: &TestApp, name: &str, email: &str, password: &str) -> (String, String) {
    let (status, body) = send(
        &app.router,
        request(
            "POST",
            "/api/auth/register",
            None,
            Some(serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
                "examPreparation": ["CDS"]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    let token = body["data"]["token"].as_str().unwrap().to_string();
    let id = body["data"]["user"]["id"].as_str().unwrap().to_string();
    (token, id)
}

/// Flip a stored identity to the admin role.
#[allow(dead_code)]
pub async fn promote(app: &TestApp, id: &str) {
    let mut identity = app
        .state
        .stores
        .identities
        .find_by_id(id)
        .await
        .unwrap()
        .unwrap();
    identity.role = Role::Admin;
    app.state.stores.identities.save(&identity).await.unwrap();
}

#[allow(dead_code)]
pub fn test_article(id: &str, category: ArticleCategory, date: &str) -> Article {
    Article {
        id: id.to_string(),
        title: format!("Briefing {}", id),
        excerpt: "Weekly defence roundup".to_string(),
        content: "Exercise Tarang Shakti concluded with partner air forces.".to_string(),
        category,
        exam_tags: vec![ExamTag::Cds, ExamTag::Afcat],
        date: date.to_string(),
        image: DEFAULT_ARTICLE_IMAGE.to_string(),
        important_points: vec!["Multinational exercise".to_string()],
        exam_importance: Some("High for AFCAT GK".to_string()),
        created_at: format!("{}T00:00:00Z", date),
        updated_at: format!("{}T00:00:00Z", date),
    }
}

/// Insert an article directly into the store.
#[allow(dead_code)]
pub async fn seed_article(app: &TestApp, id: &str) -> Article {
    let article = test_article(id, ArticleCategory::AirForce, "2026-01-01");
    app.state.stores.articles.save(&article).await.unwrap();
    article
}
