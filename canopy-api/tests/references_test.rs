mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{body_json, create_mentor, create_tech, login, send, test_app};

#[tokio::test]
async fn test_create_and_list_techs() {
    let app = test_app().await;
    let token = login(&app).await;

    create_tech(&app, &token, "Rust").await;
    create_tech(&app, &token, "React").await;

    let response = send(&app, Method::GET, "/admin/service-techs", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Rust"));
    assert!(names.contains(&"React"));
}

#[tokio::test]
async fn test_duplicate_tech_name_conflict() {
    let app = test_app().await;
    let token = login(&app).await;

    create_tech(&app, &token, "Rust").await;
    let response = send(
        &app,
        Method::POST,
        "/admin/service-techs",
        Some(&token),
        Some(json!({ "name": "Rust" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Service tech already exists");
}

#[tokio::test]
async fn test_duplicate_offering_name_conflict() {
    let app = test_app().await;
    let token = login(&app).await;

    let response = send(
        &app,
        Method::POST,
        "/admin/service-offerings",
        Some(&token),
        Some(json!({ "name": "Web development" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        &app,
        Method::POST,
        "/admin/service-offerings",
        Some(&token),
        Some(json!({ "name": "Web development" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Service offering already exists");
}

#[tokio::test]
async fn test_blank_name_rejected() {
    let app = test_app().await;
    let token = login(&app).await;

    let response = send(
        &app,
        Method::POST,
        "/admin/service-techs",
        Some(&token),
        Some(json!({ "name": "   " })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Name must not be empty");
}

#[tokio::test]
async fn test_mentor_name_is_normalized() {
    let app = test_app().await;
    let token = login(&app).await;

    let response = send(
        &app,
        Method::POST,
        "/admin/mentors",
        Some(&token),
        Some(json!({ "name": "  Jane DOE ", "photo_url": "https://img.canopy.test/jane.png" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["name"], "jane doe");

    // A differently-cased spelling collides with the stored form.
    let response = send(
        &app,
        Method::POST,
        "/admin/mentors",
        Some(&token),
        Some(json!({ "name": "JANE doe" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Mentor already exists");
}

#[tokio::test]
async fn test_mentors_listed_by_name() {
    let app = test_app().await;
    let token = login(&app).await;

    create_mentor(&app, &token, "Zoe").await;
    create_mentor(&app, &token, "Amy").await;

    let response = send(&app, Method::GET, "/admin/mentors", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["amy", "zoe"]);
}

#[tokio::test]
async fn test_mentor_get_and_update() {
    let app = test_app().await;
    let token = login(&app).await;

    let id = create_mentor(&app, &token, "Amy").await;
    let uri = format!("/admin/mentors/{}", id);

    let response = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Photo only: the name survives untouched.
    let response = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "photo_url": "https://img.canopy.test/amy.png" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "amy");
    assert_eq!(body["photo_url"], "https://img.canopy.test/amy.png");

    // New name is re-normalized.
    let response = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "name": " Amy SMITH " })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "amy smith");
}

#[tokio::test]
async fn test_mentor_rename_collision_conflict() {
    let app = test_app().await;
    let token = login(&app).await;

    create_mentor(&app, &token, "Amy").await;
    let id = create_mentor(&app, &token, "Zoe").await;

    let response = send(
        &app,
        Method::PUT,
        &format!("/admin/mentors/{}", id),
        Some(&token),
        Some(json!({ "name": "AMY" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Mentor already exists");
}

#[tokio::test]
async fn test_missing_mentor_not_found() {
    let app = test_app().await;
    let token = login(&app).await;

    let uri = format!("/admin/mentors/{}", uuid::Uuid::new_v4());
    let response = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Mentor not found");
}
