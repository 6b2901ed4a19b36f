//! Scan endpoints: recording, header fallback, windows, counts and deletion.

#![allow(clippy::panic)]

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};

use common::{app, create_code, scan_at, send, send_request, str_field, u64_field};

#[tokio::test]
async fn record_returns_created_event() {
    let app = app();
    let identifier = create_code(&app, json!({ "target_url": "https://example.com" })).await;
    let reply = send(
        &app,
        Method::POST,
        &format!("/api/v1/scans/{identifier}"),
        Some(json!({
            "ip_address": "192.0.2.44",
            "user_agent": "Mozilla/5.0",
            "location": { "latitude": 52.5, "longitude": 13.25 },
        })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let body = reply.json();
    assert_eq!(str_field(&body, "identifier"), identifier);
    assert_eq!(str_field(&body, "ip_address"), "192.0.2.44");
    assert!(body.get("recorded_at").and_then(Value::as_str).is_some());
}

#[tokio::test]
async fn headers_fill_missing_client_fields() {
    let app = app();
    let identifier = create_code(&app, json!({ "target_url": "https://example.com" })).await;
    let Ok(request) = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/scans/{identifier}"))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::USER_AGENT, "scanner/2.1")
        .header("x-forwarded-for", "198.51.100.23, 10.0.0.1")
        .body(Body::from("{}"))
    else {
        panic!("request should build");
    };
    let reply = send_request(&app, request).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let body = reply.json();
    assert_eq!(str_field(&body, "user_agent"), "scanner/2.1");
    assert_eq!(str_field(&body, "ip_address"), "198.51.100.23");
}

#[tokio::test]
async fn scan_of_unknown_code_is_not_found() {
    let app = app();
    let missing = uuid::Uuid::new_v4();
    let reply = send(
        &app,
        Method::POST,
        &format!("/api/v1/scans/{missing}"),
        Some(json!({})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.error_code(), 2001);
}

#[tokio::test]
async fn out_of_range_scan_location_is_rejected() {
    let app = app();
    let identifier = create_code(&app, json!({ "target_url": "https://example.com" })).await;
    let reply = send(
        &app,
        Method::POST,
        &format!("/api/v1/scans/{identifier}"),
        Some(json!({ "location": { "latitude": -95.0, "longitude": 0.0 } })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let count = send(
        &app,
        Method::GET,
        &format!("/api/v1/scans/{identifier}/count"),
        None,
    )
    .await;
    assert_eq!(u64_field(&count.json(), "scan_count"), 0);
}

#[tokio::test]
async fn windows_filter_list_and_count() {
    let app = app();
    let identifier = create_code(&app, json!({ "target_url": "https://example.com" })).await;
    scan_at(&app, &identifier, 1.0, 1.0).await;
    scan_at(&app, &identifier, 2.0, 2.0).await;

    let all = send(&app, Method::GET, &format!("/api/v1/scans/{identifier}"), None).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(u64_field(&all.json(), "total"), 2);

    let future = send(
        &app,
        Method::GET,
        &format!("/api/v1/scans/{identifier}?start_time=2999-01-01T00:00:00Z"),
        None,
    )
    .await;
    assert_eq!(u64_field(&future.json(), "total"), 0);

    let past = send(
        &app,
        Method::GET,
        &format!("/api/v1/scans/{identifier}/count?end_time=2000-01-01T00:00:00Z"),
        None,
    )
    .await;
    assert_eq!(u64_field(&past.json(), "scan_count"), 0);

    let inverted = send(
        &app,
        Method::GET,
        &format!(
            "/api/v1/scans/{identifier}/count?start_time=2030-01-01T00:00:00Z&end_time=2020-01-01T00:00:00Z"
        ),
        None,
    )
    .await;
    assert_eq!(inverted.status, StatusCode::OK);
    assert_eq!(u64_field(&inverted.json(), "scan_count"), 0);

    let wide = send(
        &app,
        Method::GET,
        &format!(
            "/api/v1/scans/{identifier}/count?start_time=2000-01-01T00:00:00Z&end_time=2999-01-01T00:00:00Z"
        ),
        None,
    )
    .await;
    assert_eq!(u64_field(&wide.json(), "scan_count"), 2);
}

#[tokio::test]
async fn delete_scans_keeps_code() {
    let app = app();
    let identifier = create_code(&app, json!({ "target_url": "https://example.com" })).await;
    scan_at(&app, &identifier, 1.0, 1.0).await;

    let reply = send(&app, Method::DELETE, &format!("/api/v1/scans/{identifier}"), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(u64_field(&reply.json(), "deleted"), 1);

    let again = send(&app, Method::DELETE, &format!("/api/v1/scans/{identifier}"), None).await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(u64_field(&again.json(), "deleted"), 0);

    let code = send(&app, Method::GET, &format!("/api/v1/codes/{identifier}"), None).await;
    assert_eq!(code.status, StatusCode::OK);
}
