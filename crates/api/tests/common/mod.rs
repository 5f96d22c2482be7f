//! Shared helpers for the API integration tests.
//!
//! The router runs over the in-memory store, so no database is needed.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, Response},
    Router,
};
use domain::models::place::PlaceInfo;
use domain::services::Planner;
use domain::store::{InMemoryStore, Stores};
use fake::{faker::name::en::FirstName, Fake};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use trip_planner_api::{app::create_app, config::Config, extractors::USER_ID_HEADER};
use uuid::Uuid;

/// Application router plus a handle on the store behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

/// Configuration with embedded defaults.
pub fn test_config() -> Config {
    Config::load_for_test(&[("logging.format", "pretty")]).expect("Failed to build test config")
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(Arc::new(InMemoryStore::new()), &[])
}

/// Build a router over an existing store with extra config overrides, as a
/// restart with changed settings would.
pub fn create_test_app_with(store: Arc<InMemoryStore>, overrides: &[(&str, &str)]) -> TestApp {
    let mut settings = vec![("logging.format", "pretty")];
    settings.extend_from_slice(overrides);
    let config = Config::load_for_test(&settings).expect("Failed to build test config");
    let planner = Planner::new(Stores::in_memory(store.clone()), config.invite_settings());

    TestApp {
        router: create_app(config, planner, None),
        store,
    }
}

impl TestApp {
    /// Register an ACTIVE user with a generated nickname.
    pub fn user(&self) -> Uuid {
        let nickname: String = FirstName().fake();
        self.store.add_active_user(&nickname)
    }

    /// Save a place into a plan's catalog.
    pub fn place(&self, plan_id: Uuid, pin_place_id: &str) {
        self.store.insert_place(PlaceInfo {
            pin_place_id: pin_place_id.to_string(),
            plan_id,
            title: format!("Place {pin_place_id}"),
            address: Some("Jeju-si".to_string()),
            latitude: 33.4996,
            longitude: 126.5312,
            color: Some("#FF8800".to_string()),
        });
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Create a plan through the API and return its id.
    pub async fn create_plan(&self, owner: Uuid, name: &str, is_public: bool) -> Uuid {
        let response = self
            .send(json_request(
                Method::POST,
                "/api/v1/plans",
                serde_json::json!({ "name": name, "is_public": is_public }),
                owner,
            ))
            .await;
        assert_eq!(response.status(), 201, "plan creation failed");
        let body = parse_response_body(response).await;
        parse_id(&body["id"])
    }

    /// Issue an invite code through the API.
    pub async fn issue_code(&self, user: Uuid, plan_id: Uuid) -> String {
        let response = self
            .send(empty_request(
                Method::POST,
                &format!("/api/v1/plans/{plan_id}/invite-codes"),
                user,
            ))
            .await;
        assert_eq!(response.status(), 201, "invite code issue failed");
        let body = parse_response_body(response).await;
        body["code"].as_str().unwrap().to_string()
    }

    /// Create a route through the API and return its id.
    pub async fn create_route(&self, user: Uuid, plan_id: Uuid, name: &str) -> Uuid {
        let response = self
            .send(json_request(
                Method::POST,
                &format!("/api/v1/plans/{plan_id}/routes"),
                serde_json::json!({ "name": name }),
                user,
            ))
            .await;
        assert_eq!(response.status(), 201, "route creation failed");
        let body = parse_response_body(response).await;
        parse_id(&body["id"])
    }
}

pub fn json_request(method: Method, uri: &str, body: Value, user_id: Uuid) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header(USER_ID_HEADER, user_id.to_string())
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str, user_id: Uuid) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_ID_HEADER, user_id.to_string())
        .body(Body::empty())
        .unwrap()
}

pub fn get_request(uri: &str, user_id: Uuid) -> Request<Body> {
    empty_request(Method::GET, uri, user_id)
}

pub async fn parse_response_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

pub fn parse_id(value: &Value) -> Uuid {
    Uuid::parse_str(value.as_str().unwrap()).unwrap()
}
