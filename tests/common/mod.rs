//! Shared helpers for driving the router in-process.

#![allow(dead_code, clippy::panic)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use scanmap::api;
use scanmap::app_state::AppState;
use scanmap::domain::EmbeddingPolicy;
use scanmap::persistence::{MemoryStore, Store};

/// A response reduced to the parts tests look at.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        let Ok(value) = serde_json::from_slice(&self.body) else {
            panic!("body is not json: {}", String::from_utf8_lossy(&self.body));
        };
        value
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: header::HeaderName) -> String {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    /// Numeric code from an error body.
    pub fn error_code(&self) -> u64 {
        self.json()
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(Value::as_u64)
            .unwrap_or_default()
    }
}

pub fn app_with(embedding: EmbeddingPolicy) -> Router {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let Ok(state) = AppState::new(store, embedding) else {
        panic!("state should build");
    };
    api::build_router().with_state(state)
}

pub fn app() -> Router {
    app_with(EmbeddingPolicy::query_param())
}

pub async fn send_request(app: &Router, request: Request<Body>) -> Reply {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});
    let status = response.status();
    let headers = response.headers().clone();
    let Ok(collected) = response.into_body().collect().await else {
        panic!("body should collect");
    };
    Reply {
        status,
        headers,
        body: collected.to_bytes().to_vec(),
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Reply {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    };
    let Ok(request) = request else {
        panic!("request should build");
    };
    send_request(app, request).await
}

pub fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    let Some(s) = value.get(key).and_then(Value::as_str) else {
        panic!("missing string field {key} in {value}");
    };
    s
}

pub fn u64_field(value: &Value, key: &str) -> u64 {
    let Some(n) = value.get(key).and_then(Value::as_u64) else {
        panic!("missing numeric field {key} in {value}");
    };
    n
}

/// Creates a code and returns its identifier.
pub async fn create_code(app: &Router, body: Value) -> String {
    let reply = send(app, Method::POST, "/api/v1/codes", Some(body)).await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text());
    str_field(&reply.json(), "identifier").to_string()
}

/// Records a located scan.
pub async fn scan_at(app: &Router, identifier: &str, latitude: f64, longitude: f64) {
    let body = serde_json::json!({
        "ip_address": "203.0.113.10",
        "user_agent": "integration-test",
        "location": { "latitude": latitude, "longitude": longitude },
    });
    let reply = send(
        app,
        Method::POST,
        &format!("/api/v1/scans/{identifier}"),
        Some(body),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text());
}

/// Decodes the first QR symbol in a PNG.
pub fn decode_png(png: &[u8]) -> String {
    let Ok(img) = image::load_from_memory(png) else {
        panic!("png should load");
    };
    let gray = img.to_luma8();
    let (w, h) = gray.dimensions();
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(w as usize, h as usize, |x, y| {
            gray.get_pixel(x as u32, y as u32).0[0]
        });
    let grids = prepared.detect_grids();
    let Some(grid) = grids.first() else {
        panic!("no symbol found");
    };
    let Ok((_, content)) = grid.decode() else {
        panic!("symbol should decode");
    };
    content
}
