//! End-to-end flow: issue a code, scan it from three places, map the scans.

#![allow(clippy::panic)]

mod common;

use axum::http::{Method, StatusCode, header};
use serde_json::json;

use common::{app, create_code, decode_png, scan_at, send, str_field, u64_field};

#[tokio::test]
async fn issue_scan_and_map() {
    let app = app();
    let reply = send(
        &app,
        Method::POST,
        "/api/v1/codes",
        Some(json!({
            "name": "Landing page",
            "target_url": "https://example.com",
            "version": 1,
            "module_size": 10,
            "border": 4,
        })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let created = reply.json();
    let identifier = str_field(&created, "identifier").to_string();
    let payload = str_field(&created, "encoded_payload").to_string();
    assert_eq!(payload, format!("https://example.com/?qr_id={identifier}"));

    let image = send(
        &app,
        Method::GET,
        &format!("/api/v1/codes/{identifier}/image"),
        None,
    )
    .await;
    assert_eq!(image.status, StatusCode::OK);
    assert_eq!(image.header(header::CONTENT_TYPE), "image/png");
    assert_eq!(decode_png(&image.body), payload);

    scan_at(&app, &identifier, 10.0, 20.0).await;
    scan_at(&app, &identifier, 10.0, 21.0).await;
    scan_at(&app, &identifier, 11.0, 20.0).await;

    let count = send(
        &app,
        Method::GET,
        &format!("/api/v1/scans/{identifier}/count"),
        None,
    )
    .await;
    assert_eq!(u64_field(&count.json(), "scan_count"), 3);

    let heat = send(
        &app,
        Method::GET,
        &format!("/api/v1/maps/heat/{identifier}"),
        None,
    )
    .await;
    assert_eq!(heat.status, StatusCode::OK);
    assert!(heat.header(header::CONTENT_TYPE).starts_with("text/html"));
    assert_eq!(
        heat.header(header::CONTENT_DISPOSITION),
        format!("attachment; filename=\"map_{identifier}_heat.html\"")
    );
    let heat_html = heat.text();
    assert!(heat_html.contains("L.heatLayer([[10.0,20.0],[10.0,21.0],[11.0,20.0]]"));

    let pin = send(
        &app,
        Method::GET,
        &format!("/api/v1/maps/pin/{identifier}"),
        None,
    )
    .await;
    assert_eq!(pin.status, StatusCode::OK);
    let pin_html = pin.text();
    assert_eq!(pin_html.matches("L.marker(").count(), 3);
    assert!(pin_html.contains("setView([10.0,20.0], 3)"));

    let cluster = send(
        &app,
        Method::GET,
        &format!("/api/v1/maps/cluster/{identifier}"),
        None,
    )
    .await;
    assert_eq!(cluster.status, StatusCode::OK);
    assert_eq!(cluster.text().matches("cluster.addLayer(").count(), 3);
}

#[tokio::test]
async fn located_code_joins_its_scans_on_the_map() {
    let app = app();
    let identifier = create_code(
        &app,
        json!({
            "target_url": "https://example.com/menu",
            "location": { "latitude": 40.5, "longitude": -3.75 },
        }),
    )
    .await;
    scan_at(&app, &identifier, 41.0, -3.5).await;

    let pin = send(
        &app,
        Method::GET,
        &format!("/api/v1/maps/pin/{identifier}"),
        None,
    )
    .await;
    let html = pin.text();
    assert_eq!(html.matches("L.marker(").count(), 2);
    assert!(html.contains("setView([40.5,-3.75], 3)"));
    assert!(html.contains("data:image/png;base64,"));
}
