//! Scan handlers: record, list, count, delete.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::parse_identifier;
use crate::api::dto::{
    DeleteScansResponse, RecordScanRequest, ScanCountResponse, ScanListResponse, ScanResponse,
    TimeWindowParams,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ScanmapError};

/// First address in `X-Forwarded-For`, else `X-Real-IP`.
fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok())
        && let Some(first) = forwarded.split(',').next().map(str::trim)
        && !first.is_empty()
    {
        return Some(first.to_string());
    }
    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn header_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `POST /scans/{identifier}`: Record a scan.
///
/// # Errors
///
/// Returns [`ScanmapError::CodeNotFound`] if the code does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/scans/{identifier}",
    tag = "Scans",
    summary = "Record a scan",
    description = "Records one scan of the code. Missing `ip_address` and `user_agent` fall back to the `X-Forwarded-For`/`X-Real-IP` and `User-Agent` headers.",
    params(
        ("identifier" = uuid::Uuid, Path, description = "Code identifier"),
    ),
    request_body = RecordScanRequest,
    responses(
        (status = 201, description = "Scan recorded", body = ScanResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Code not found", body = ErrorResponse),
    )
)]
pub async fn record_scan(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    headers: HeaderMap,
    Json(req): Json<RecordScanRequest>,
) -> Result<impl IntoResponse, ScanmapError> {
    let identifier = parse_identifier(&identifier)?;
    let mut report = req.into_report()?;
    if report.ip_address.is_none() {
        report.ip_address = forwarded_ip(&headers);
    }
    if report.user_agent.is_none() {
        report.user_agent = header_user_agent(&headers);
    }

    let event = state.scan_service.record(identifier, report).await?;
    Ok((StatusCode::CREATED, Json(ScanResponse::from(event))))
}

/// `GET /scans/{identifier}`: List scans in a time window.
///
/// # Errors
///
/// Returns [`ScanmapError::CodeNotFound`] if the code does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/scans/{identifier}",
    tag = "Scans",
    summary = "List scans",
    params(
        ("identifier" = uuid::Uuid, Path, description = "Code identifier"),
        TimeWindowParams,
    ),
    responses(
        (status = 200, description = "Scans oldest first", body = ScanListResponse),
        (status = 404, description = "Code not found", body = ErrorResponse),
    )
)]
pub async fn list_scans(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(window): Query<TimeWindowParams>,
) -> Result<impl IntoResponse, ScanmapError> {
    let identifier = parse_identifier(&identifier)?;
    let scans = state
        .scan_service
        .list_for_code(identifier, window.into())
        .await?;
    let data: Vec<ScanResponse> = scans.into_iter().map(ScanResponse::from).collect();
    Ok(Json(ScanListResponse {
        total: data.len(),
        data,
    }))
}

/// `GET /scans/{identifier}/count`: Count scans in a time window.
///
/// # Errors
///
/// Returns [`ScanmapError::CodeNotFound`] if the code does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/scans/{identifier}/count",
    tag = "Scans",
    summary = "Count scans",
    params(
        ("identifier" = uuid::Uuid, Path, description = "Code identifier"),
        TimeWindowParams,
    ),
    responses(
        (status = 200, description = "Scan count", body = ScanCountResponse),
        (status = 404, description = "Code not found", body = ErrorResponse),
    )
)]
pub async fn count_scans(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(window): Query<TimeWindowParams>,
) -> Result<impl IntoResponse, ScanmapError> {
    let identifier = parse_identifier(&identifier)?;
    let scan_count = state.scan_service.count(identifier, window.into()).await?;
    Ok(Json(ScanCountResponse { scan_count }))
}

/// `DELETE /scans/{identifier}`: Delete every scan of a code.
///
/// # Errors
///
/// Returns [`ScanmapError::CodeNotFound`] if the code does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/scans/{identifier}",
    tag = "Scans",
    summary = "Delete scans",
    description = "Removes all scans of the code and keeps the code itself. Deleting zero scans succeeds.",
    params(
        ("identifier" = uuid::Uuid, Path, description = "Code identifier"),
    ),
    responses(
        (status = 200, description = "Scans deleted", body = DeleteScansResponse),
        (status = 404, description = "Code not found", body = ErrorResponse),
    )
)]
pub async fn delete_scans(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, ScanmapError> {
    let identifier = parse_identifier(&identifier)?;
    let deleted = state.scan_service.delete_all_for_code(identifier).await?;
    Ok(Json(DeleteScansResponse { deleted }))
}

/// Scan routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/scans/{identifier}",
            get(list_scans).post(record_scan).delete(delete_scans),
        )
        .route("/scans/{identifier}/count", get(count_scans))
}
