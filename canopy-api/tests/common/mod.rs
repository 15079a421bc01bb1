#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use canopy_api::app;
use canopy_api::state::{AppState, AuthConfig};
use canopy_store::{admin_repo, Database};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret";
pub const ADMIN_EMAIL: &str = "admin@canopy.test";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// Fresh in-memory database with migrations applied and one active admin
/// account seeded.
pub async fn test_state() -> AppState {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();

    {
        let mut conn = db.acquire().await.unwrap();
        admin_repo::insert(&mut conn, &admin_user(ADMIN_EMAIL, ADMIN_PASSWORD, true))
            .await
            .unwrap();
    }

    AppState {
        db,
        auth: AuthConfig {
            secret: TEST_SECRET.to_string(),
            expiration: 3600,
        },
    }
}

pub async fn test_app() -> Router {
    app(test_state().await)
}

/// Minimum bcrypt cost keeps the suite fast; hash strength is irrelevant
/// here.
pub fn admin_user(email: &str, password: &str, is_active: bool) -> admin_repo::AdminUser {
    admin_repo::AdminUser {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: bcrypt::hash(password, 4).unwrap(),
        role: "ADMIN".to_string(),
        is_active,
        created_at: Utc::now(),
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Logs in through the real endpoint and returns the bearer token.
pub async fn login(app: &Router) -> String {
    let response = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}

pub async fn create_tech(app: &Router, token: &str, name: &str) -> Uuid {
    create_named(app, token, "/admin/service-techs", name).await
}

pub async fn create_offering(app: &Router, token: &str, name: &str) -> Uuid {
    create_named(app, token, "/admin/service-offerings", name).await
}

pub async fn create_mentor(app: &Router, token: &str, name: &str) -> Uuid {
    create_named(app, token, "/admin/mentors", name).await
}

async fn create_named(app: &Router, token: &str, uri: &str, name: &str) -> Uuid {
    let response = send(
        app,
        Method::POST,
        uri,
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["id"].as_str().unwrap().parse().unwrap()
}
