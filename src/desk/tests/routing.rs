use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::desk::audit::AuditAction;
use crate::desk::router::FoundItemRequest;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("json body")))
        .expect("request builds")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

fn wallet_payload() -> Value {
    json!({
        "name": "Black Wallet",
        "description": "leather wallet found near library",
        "category": "wallet",
        "date_found": "2025-03-14",
        "location": "Library 3F",
        "contact": "09171234567",
        "estimated_value": "60",
    })
}

#[tokio::test]
async fn submit_route_creates_accepted_items() {
    let (desk, audit) = shared_desk();
    let router = router_with_desk(desk.clone());

    let response = router
        .oneshot(json_request("POST", "/api/v1/items", wallet_payload()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["accepted"], true);
    assert_eq!(payload["item"]["category"], "Wallet");
    assert_eq!(payload["item"]["status"], "active");
    assert_eq!(payload["item"]["estimated_value"], 60.0);
    assert_eq!(audit.actions(), vec![AuditAction::Accepted]);
}

#[tokio::test]
async fn submit_handler_returns_unprocessable_for_rejections() {
    let (desk, _) = shared_desk();
    let request = FoundItemRequest {
        name: "Banana".to_string(),
        description: "half-eaten banana".to_string(),
        location: "Cafeteria".to_string(),
        contact: "guard@campus.edu".to_string(),
        ..FoundItemRequest::default()
    };

    let response = crate::desk::router::submit_handler::<MemoryAuditLog>(
        State(desk.clone()),
        axum::Json(request),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["accepted"], false);
    assert_eq!(payload["reason"], "excluded category");
    assert!(payload.get("item").is_none());
    assert!(desk.lock().expect("desk lock").store().is_empty());
}

#[tokio::test]
async fn search_route_ranks_matches() {
    let (desk, _) = shared_desk();
    desk.lock()
        .expect("desk lock")
        .submit(wallet_report())
        .expect("submit");

    let response = router_with_desk(desk)
        .oneshot(json_request(
            "POST",
            "/api/v1/search",
            json!({ "name": "black wallet" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["threshold"], 0.25);
    assert_eq!(payload["matches"][0]["name"], "Black Wallet");
    assert_eq!(payload["matches"][0]["matched_terms"], json!(["black", "wallet"]));
}

#[tokio::test]
async fn blank_search_is_a_bad_request() {
    let (desk, _) = shared_desk();
    let response = router_with_desk(desk)
        .oneshot(json_request("POST", "/api/v1/search", json!({ "name": "  " })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "desk error: search query is blank");
}

#[tokio::test]
async fn delete_route_soft_removes_and_reports_repeats() {
    let (desk, _) = shared_desk();
    let id = {
        let mut guard = desk.lock().expect("desk lock");
        match guard.submit(wallet_report()).expect("submit") {
            crate::desk::SubmissionOutcome::Accepted { item, .. } => item.id().to_string(),
            other => panic!("unexpected outcome {other:?}"),
        }
    };
    let uri = format!("/api/v1/items/{id}");

    let first = router_with_desk(desk.clone())
        .oneshot(empty_request("DELETE", &uri))
        .await
        .expect("route executes");
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(read_json_body(first).await["already_removed"], false);

    let second = router_with_desk(desk.clone())
        .oneshot(empty_request("DELETE", &uri))
        .await
        .expect("route executes");
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(read_json_body(second).await["already_removed"], true);

    let listing = router_with_desk(desk)
        .oneshot(empty_request("GET", "/api/v1/items?include_removed=true"))
        .await
        .expect("route executes");
    let payload = read_json_body(listing).await;
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["items"][0]["status"], "removed");
}

#[tokio::test]
async fn delete_route_returns_not_found_for_unknown_ids() {
    let (desk, _) = shared_desk();
    let response = router_with_desk(desk)
        .oneshot(empty_request("DELETE", "/api/v1/items/nope"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn threshold_updates_ignore_out_of_range_values() {
    let (desk, audit) = shared_desk();

    let response = router_with_desk(desk.clone())
        .oneshot(json_request(
            "PUT",
            "/api/v1/settings/threshold",
            json!({ "threshold": 1.1 }),
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "threshold": 0.25, "applied": false }));

    let response = router_with_desk(desk.clone())
        .oneshot(json_request(
            "PUT",
            "/api/v1/settings/threshold",
            json!({ "threshold": 0.5 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(read_json_body(response).await["applied"], true);

    let response = router_with_desk(desk)
        .oneshot(empty_request("GET", "/api/v1/settings/threshold"))
        .await
        .expect("route executes");
    assert_eq!(read_json_body(response).await["threshold"], 0.5);
    assert_eq!(audit.actions(), vec![AuditAction::Config]);
}

#[tokio::test]
async fn reference_routes_describe_the_desk() {
    let (desk, _) = shared_desk();

    let categories = router_with_desk(desk.clone())
        .oneshot(empty_request("GET", "/api/v1/categories"))
        .await
        .expect("route executes");
    let payload = read_json_body(categories).await;
    assert_eq!(payload["categories"].as_array().map(Vec::len), Some(7));
    assert_eq!(payload["categories"][6], "Others");

    let criteria = router_with_desk(desk.clone())
        .oneshot(empty_request("GET", "/api/v1/criteria"))
        .await
        .expect("route executes");
    let payload = read_json_body(criteria).await;
    assert_eq!(payload["rules"].as_array().map(Vec::len), Some(8));
    assert_eq!(payload["minimum_value"], 50.0);

    let stats = router_with_desk(desk)
        .oneshot(empty_request("GET", "/api/v1/stats"))
        .await
        .expect("route executes");
    let payload = read_json_body(stats).await;
    assert_eq!(payload["total"], 0);
    assert_eq!(payload["active"], 0);
}

#[test]
fn request_values_fall_back_to_defaults() {
    let request: FoundItemRequest = serde_json::from_value(json!({
        "name": "Phone",
        "description": "black smartphone",
        "category": "Umbrellas",
        "location": "Gym",
        "contact": "0917",
        "estimated_value": "about fifty",
    }))
    .expect("request parses");
    let details = request.into_details(found_on());

    assert_eq!(details.category, crate::desk::Category::Others);
    assert_eq!(details.date_found, found_on());
    assert_eq!(details.estimated_value, 0.0);
    assert!(!details.perishable);

    let numeric: FoundItemRequest =
        serde_json::from_value(json!({ "estimated_value": -12.5 })).expect("request parses");
    assert_eq!(numeric.into_details(found_on()).estimated_value, 0.0);
}
