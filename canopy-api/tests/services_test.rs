mod common;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use common::{body_json, create_offering, create_tech, login, send, test_app};

fn price(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_create_service_resolves_links_and_price() {
    let app = test_app().await;
    let token = login(&app).await;

    let react = create_tech(&app, &token, "React").await;
    let rust = create_tech(&app, &token, "Rust").await;
    let web = create_offering(&app, &token, "Web development").await;

    let response = send(
        &app,
        Method::POST,
        "/admin/services",
        Some(&token),
        Some(json!({
            "title": "Storefront build",
            "description": "Full storefront",
            "base_price": 200,
            "discount_type": "PERCENTAGE",
            "discount_value": 10,
            "tech_ids": [rust, react],
            "offering_ids": [web],
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;

    assert_eq!(body["title"], "Storefront build");
    assert_eq!(price(&body["base_price"]), Decimal::from(200));
    assert_eq!(price(&body["effective_price"]), Decimal::from(180));
    // Names come back in request order.
    assert_eq!(body["techs"], json!(["Rust", "React"]));
    assert_eq!(body["offerings"], json!(["Web development"]));
    // The discount fields stay internal.
    assert!(body.get("discount_type").is_none());
    assert!(body.get("discount_value").is_none());
}

#[tokio::test]
async fn test_create_with_unknown_tech_persists_nothing() {
    let app = test_app().await;
    let token = login(&app).await;

    let rust = create_tech(&app, &token, "Rust").await;

    let response = send(
        &app,
        Method::POST,
        "/admin/services",
        Some(&token),
        Some(json!({
            "title": "Ghost",
            "base_price": 100,
            "tech_ids": [rust, uuid::Uuid::new_v4()],
            "offering_ids": [],
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "One or more tech IDs are invalid");

    let response = send(&app, Method::GET, "/admin/services", Some(&token), None).await;
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_rejects_negative_base_price() {
    let app = test_app().await;
    let token = login(&app).await;

    let response = send(
        &app,
        Method::POST,
        "/admin/services",
        Some(&token),
        Some(json!({ "title": "Cheap", "base_price": -1 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Base price must not be negative");
}

#[tokio::test]
async fn test_missing_service_not_found() {
    let app = test_app().await;
    let token = login(&app).await;

    let uri = format!("/admin/services/{}", uuid::Uuid::new_v4());
    let response = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Service not found");
}

#[tokio::test]
async fn test_patch_scalars_and_clear_offerings() {
    let app = test_app().await;
    let token = login(&app).await;

    let rust = create_tech(&app, &token, "Rust").await;
    let web = create_offering(&app, &token, "Web development").await;

    let response = send(
        &app,
        Method::POST,
        "/admin/services",
        Some(&token),
        Some(json!({
            "title": "Initial",
            "base_price": 200,
            "tech_ids": [rust],
            "offering_ids": [web],
        })),
    )
    .await;
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap();

    let response = send(
        &app,
        Method::PATCH,
        &format!("/admin/services/{}", id),
        Some(&token),
        Some(json!({
            "title": "Renamed",
            "discount_type": "AMOUNT",
            "discount_value": 50,
            "offering_ids": [],
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["title"], "Renamed");
    // Base price untouched, price recomputed against the new discount.
    assert_eq!(price(&body["base_price"]), Decimal::from(200));
    assert_eq!(price(&body["effective_price"]), Decimal::from(150));
    // Omitted tech set untouched, explicit empty offering set cleared.
    assert_eq!(body["techs"], json!(["Rust"]));
    assert_eq!(body["offerings"], json!([]));
}

#[tokio::test]
async fn test_patch_with_unknown_offering_changes_nothing() {
    let app = test_app().await;
    let token = login(&app).await;

    let response = send(
        &app,
        Method::POST,
        "/admin/services",
        Some(&token),
        Some(json!({ "title": "Atomic", "base_price": 100 })),
    )
    .await;
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap();

    let response = send(
        &app,
        Method::PATCH,
        &format!("/admin/services/{}", id),
        Some(&token),
        Some(json!({
            "title": "Should not stick",
            "offering_ids": [uuid::Uuid::new_v4()],
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "One or more offering IDs are invalid");

    // The scalar half of the update rolled back with the links.
    let response = send(
        &app,
        Method::GET,
        &format!("/admin/services/{}", id),
        Some(&token),
        None,
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["title"], "Atomic");
}

#[tokio::test]
async fn test_delete_service() {
    let app = test_app().await;
    let token = login(&app).await;

    let rust = create_tech(&app, &token, "Rust").await;
    let response = send(
        &app,
        Method::POST,
        "/admin/services",
        Some(&token),
        Some(json!({ "title": "Doomed", "base_price": 10, "tech_ids": [rust] })),
    )
    .await;
    let created = body_json(response).await;
    let uri = format!("/admin/services/{}", created["id"].as_str().unwrap());

    let response = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The referenced tech survives the owner.
    let response = send(&app, Method::GET, "/admin/service-techs", Some(&token), None).await;
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}
