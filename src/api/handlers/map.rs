//! Map handler: renders a code and its scans as an HTML attachment.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use super::parse_identifier;
use crate::api::dto::TimeWindowParams;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ScanmapError};
use crate::map::MapMode;

/// `GET /maps/{mode}/{identifier}`: Download a map document.
///
/// # Errors
///
/// Returns [`ScanmapError::InvalidRequest`] for an unknown mode,
/// [`ScanmapError::CodeNotFound`] for an unknown code, and
/// [`ScanmapError::EmptyDataset`] when nothing in the window is located.
#[utoipa::path(
    get,
    path = "/api/v1/maps/{mode}/{identifier}",
    tag = "Maps",
    summary = "Render a map",
    description = "Renders the code (when created inside the window) and its scans inside the window as a Leaflet HTML page. `pin` shows annotated markers, `heat` a density layer, `cluster` grouped markers.",
    params(
        ("mode" = String, Path, description = "`pin`, `heat` or `cluster`"),
        ("identifier" = uuid::Uuid, Path, description = "Code identifier"),
        TimeWindowParams,
    ),
    responses(
        (status = 200, description = "HTML attachment named `map_{identifier}_{mode}.html`"),
        (status = 400, description = "Unknown mode or malformed identifier", body = ErrorResponse),
        (status = 404, description = "Code not found or nothing to plot", body = ErrorResponse),
    )
)]
pub async fn render_map(
    State(state): State<AppState>,
    Path((mode, identifier)): Path<(String, String)>,
    Query(window): Query<TimeWindowParams>,
) -> Result<impl IntoResponse, ScanmapError> {
    let mode: MapMode = mode.parse()?;
    let identifier = parse_identifier(&identifier)?;
    let doc = state
        .map_service
        .render_for_code(identifier, mode, window.into())
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", doc.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        doc.html,
    ))
}

/// Map routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/maps/{mode}/{identifier}", get(render_map))
}
