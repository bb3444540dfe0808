use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use lendhub::api::router::ApiRoutes;
use lendhub::app_state::{AppState, SharedAppState};
use lendhub::services::authorization::store::ConfigStore;
use lendhub::services::AuthorizationService;
use lendhub::settings::config::Settings;
use lendhub::stop_flag::StopFlag;

use lendhub_core::authorization::RoleAssignment;
use lendhub_core::inventory::item::Item;
use lendhub_core::inventory::shared_inventory::{SharedBundles, SharedInventory};
use lendhub_core::loans::shared_loan_book::SharedLoanBook;
use lendhub_core::locations::location::Location;
use lendhub_core::locations::shared_locations::SharedLocations;

fn test_settings(auth_mode: &str) -> Settings {
    serde_json::from_value(serde_json::json!({
        "debug": false,
        "telemetry": null,
        "api": {
            "bind_address": "127.0.0.1:0",
            "auth_mode": auth_mode,
            "dev_user_email": "dev@localhost",
            "dev_user_name": "Dev User",
        },
        "scheduler": {
            "overdue_check": "5m",
            "retention_check": "1h",
        },
        "retention": {
            "closed_loan_days": 90,
        },
        "authorization_config": "config/authorization.yaml",
    }))
    .expect("test settings should deserialize")
}

/// App with a dev user assigned location_manager for loc-1 only.
async fn build_app(auth_mode: &str) -> (Router, SharedAppState) {
    let mut config = ConfigStore::default_config();
    config.assignments = HashMap::from([(
        "dev@localhost".to_string(),
        vec![RoleAssignment {
            role: "location_manager".to_string(),
            location: Some("loc-1".to_string()),
        }],
    )]);

    let state = Arc::new(AppState {
        settings: test_settings(auth_mode),
        stop_flag: StopFlag::new(),
        locations: SharedLocations::new(),
        inventory: SharedInventory::new(),
        bundles: SharedBundles::new(),
        loans: SharedLoanBook::new(),
        auth_service: Arc::new(AuthorizationService::from_config(config)),
    });

    state
        .locations
        .add_location(Location::new("Loc 1", None))
        .await;
    state
        .locations
        .add_location(Location::new("Loc 2", None))
        .await;

    (ApiRoutes::create(state.clone()), state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _state) = build_app("dev").await;
    let response = app.oneshot(get("/api/v1/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_view_allowed_with_matching_location_context() {
    let (app, _state) = build_app("dev").await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/authenticated/items")
        .header("x-lendhub-location", "loc-1")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_view_denied_without_location_context() {
    // The dev user only holds a location-scoped assignment; a check with
    // no location context must not match it.
    let (app, _state) = build_app("dev").await;
    let response = app
        .oneshot(get("/api/v1/authenticated/items"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_mutation_allowed_in_own_location() {
    let (app, state) = build_app("dev").await;
    let request = post_json(
        "/api/v1/authenticated/locations/loc-1/items",
        serde_json::json!({ "name": "Cordless Drill" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.inventory.len().await, 1);
}

#[tokio::test]
async fn test_mutation_denied_in_other_location() {
    let (app, state) = build_app("dev").await;
    let request = post_json(
        "/api/v1/authenticated/locations/loc-2/items",
        serde_json::json!({ "name": "Cordless Drill" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(state.inventory.is_empty().await);
}

#[tokio::test]
async fn test_scoped_viewer_sees_only_authorized_locations() {
    // A loc-1-only manager must not receive loc-2 records, whatever
    // location context the request carries.
    let (app, state) = build_app("dev").await;
    state.inventory.add_item(Item::new("Drill", "loc-1", None)).await;
    state.inventory.add_item(Item::new("Saw", "loc-2", None)).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/authenticated/items")
        .header("x-lendhub-location", "loc-1")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let listing: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let locations: Vec<&str> = listing["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["location_id"].as_str().unwrap())
        .collect();
    assert_eq!(locations, vec!["loc-1"]);
}

#[tokio::test]
async fn test_opening_hours_readable_across_locations() {
    let (app, _state) = build_app("dev").await;
    let response = app
        .oneshot(get("/api/v1/authenticated/locations/loc-2/hours"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_surface_denied_for_location_manager() {
    let (app, _state) = build_app("dev").await;
    let response = app
        .oneshot(get("/api/v1/authenticated/admin/roles"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bearer_mode_requires_authorization_header() {
    let (app, _state) = build_app("bearer").await;
    let response = app
        .oneshot(get("/api/v1/authenticated/items"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_revocation_is_effective_on_the_next_request() {
    let (app, state) = build_app("dev").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/authenticated/locations/loc-1/items",
            serde_json::json!({ "name": "Ladder" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    state
        .auth_service
        .revoke_role(
            "dev@localhost",
            "location_manager",
            Some("loc-1".to_string()),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(post_json(
            "/api/v1/authenticated/locations/loc-1/items",
            serde_json::json!({ "name": "Ladder" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_my_permissions_reflect_assignments() {
    let (app, _state) = build_app("dev").await;
    let response = app
        .oneshot(get("/api/v1/authenticated/me/permissions"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let permissions: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(permissions["global"].as_array().unwrap().is_empty());
    assert!(permissions["by_location"]["loc-1"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p == "inventory.manage"));
}
