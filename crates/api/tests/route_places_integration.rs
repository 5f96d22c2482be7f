//! Integration tests for route-place endpoints.
//!
//! Run with: cargo test --test route_places_integration

mod common;

use axum::http::{Method, StatusCode};
use common::{create_test_app, get_request, json_request, parse_id, parse_response_body, TestApp};
use domain::models::membership::MembershipStatus;
use serde_json::{json, Value};
use uuid::Uuid;

async fn save(app: &TestApp, user: Uuid, route_id: Uuid, pin: &str) -> (StatusCode, Value) {
    let response = app
        .send(json_request(
            Method::POST,
            &format!("/api/v1/routes/{route_id}/places"),
            json!({ "pin_place_id": pin, "nickname": "Stop" }),
            user,
        ))
        .await;
    let status = response.status();
    (status, parse_response_body(response).await)
}

#[tokio::test]
async fn test_save_route_places_in_sequence() {
    let app = create_test_app();
    let owner = app.user();
    let plan_id = app.create_plan(owner, "Jeju Trip", false).await;
    let route_id = app.create_route(owner, plan_id, "Day 1").await;
    app.place(plan_id, "p1");
    app.place(plan_id, "p2");

    let (status, first) = save(&app, owner, route_id, "p1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["sequence"], 1);
    assert_eq!(first["title"], "Place p1");
    assert_eq!(first["is_pin_place_deleted"], false);

    let (_, second) = save(&app, owner, route_id, "p2").await;
    assert_eq!(second["sequence"], 2);

    let response = app
        .send(get_request(&format!("/api/v1/routes/{route_id}/places"), owner))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let pins: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["pin_place_id"].as_str().unwrap())
        .collect();
    assert_eq!(pins, vec!["p1", "p2"]);
}

#[tokio::test]
async fn test_save_place_from_other_plan() {
    let app = create_test_app();
    let owner = app.user();
    let member = app.user();
    let plan_id = app.create_plan(owner, "Jeju Trip", false).await;
    let other_plan = app.create_plan(owner, "Busan", false).await;
    app.store
        .set_membership_status(plan_id, member, MembershipStatus::Member);
    let route_id = app.create_route(owner, plan_id, "Day 1").await;
    app.place(other_plan, "elsewhere");

    let (status, body) = save(&app, member, route_id, "elsewhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "saved place not found");
    assert_eq!(app.store.route_place_rows(route_id), 0);
}

#[tokio::test]
async fn test_removed_place_is_flagged() {
    let app = create_test_app();
    let owner = app.user();
    let plan_id = app.create_plan(owner, "Jeju Trip", true).await;
    let route_id = app.create_route(owner, plan_id, "Day 1").await;
    app.place(plan_id, "p1");
    save(&app, owner, route_id, "p1").await;
    app.store.remove_place(plan_id, "p1");

    let visitor = app.user();
    let response = app
        .send(get_request(&format!("/api/v1/routes/{route_id}/places"), visitor))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["data"][0]["is_pin_place_deleted"], true);
    assert!(body["data"][0]["title"].is_null());
}

#[tokio::test]
async fn test_update_route_place() {
    let app = create_test_app();
    let owner = app.user();
    let plan_id = app.create_plan(owner, "Jeju Trip", false).await;
    let route_id = app.create_route(owner, plan_id, "Day 1").await;
    app.place(plan_id, "p1");
    app.place(plan_id, "p2");
    let (_, saved) = save(&app, owner, route_id, "p1").await;
    let route_place_id = parse_id(&saved["id"]);
    let uri = format!("/api/v1/route-places/{route_place_id}");

    let response = app
        .send(json_request(
            Method::PATCH,
            &uri,
            json!({ "pin_place_id": "p2", "date": "2024-07-02" }),
            owner,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["pin_place_id"], "p2");
    assert_eq!(body["date"], "2024-07-02");
    assert_eq!(body["title"], "Place p2");

    let response = app
        .send(json_request(
            Method::PATCH,
            &uri,
            json!({ "pin_place_id": "missing" }),
            owner,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(json_request(
            Method::PATCH,
            &format!("/api/v1/route-places/{}", Uuid::new_v4()),
            json!({ "nickname": "Lunch" }),
            owner,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "route place not found");
}

#[tokio::test]
async fn test_delete_route_places() {
    let app = create_test_app();
    let owner = app.user();
    let plan_id = app.create_plan(owner, "Jeju Trip", false).await;
    let route_id = app.create_route(owner, plan_id, "Day 1").await;
    let other_route = app.create_route(owner, plan_id, "Day 2").await;
    app.place(plan_id, "p1");
    let (_, first) = save(&app, owner, route_id, "p1").await;
    let (_, foreign) = save(&app, owner, other_route, "p1").await;
    let first = parse_id(&first["id"]);
    let foreign = parse_id(&foreign["id"]);
    let uri = format!("/api/v1/routes/{route_id}/places/delete");

    let response = app
        .send(json_request(
            Method::POST,
            &uri,
            json!({ "route_place_ids": [first, foreign] }),
            owner,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.store.route_place_rows(route_id), 1);

    let response = app
        .send(json_request(
            Method::POST,
            &uri,
            json!({ "route_place_ids": [first] }),
            owner,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.store.route_place_rows(route_id), 0);
    assert_eq!(app.store.route_place_rows(other_route), 1);
}

#[tokio::test]
async fn test_outsider_cannot_edit_route_places() {
    let app = create_test_app();
    let owner = app.user();
    let outsider = app.user();
    let plan_id = app.create_plan(owner, "Jeju Trip", true).await;
    let route_id = app.create_route(owner, plan_id, "Day 1").await;
    app.place(plan_id, "p1");

    let (status, _) = save(&app, outsider, route_id, "p1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
