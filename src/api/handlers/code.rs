//! Code handlers: create, list, get, delete, image.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::parse_identifier;
use crate::api::dto::{CodeListResponse, CodeResponse, CreateCodeRequest, DeleteCodeResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ScanmapError};

/// `POST /codes`: Create a code.
///
/// # Errors
///
/// Returns [`ScanmapError`] on invalid input or encoding failure.
#[utoipa::path(
    post,
    path = "/api/v1/codes",
    tag = "Codes",
    summary = "Create a QR code",
    description = "Mints an identifier, embeds it according to the configured policy, renders the PNG and stores the code.",
    request_body = CreateCodeRequest,
    responses(
        (status = 201, description = "Code created", body = CodeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 422, description = "Data cannot be encoded", body = ErrorResponse),
    )
)]
pub async fn create_code(
    State(state): State<AppState>,
    Json(req): Json<CreateCodeRequest>,
) -> Result<impl IntoResponse, ScanmapError> {
    let request = req.into_domain()?;
    let code = state.code_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(CodeResponse::from(&code))))
}

/// `GET /codes`: List all codes.
///
/// # Errors
///
/// Returns [`ScanmapError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/v1/codes",
    tag = "Codes",
    summary = "List codes",
    description = "Returns every code in creation order.",
    responses(
        (status = 200, description = "Code list", body = CodeListResponse),
    )
)]
pub async fn list_codes(State(state): State<AppState>) -> Result<impl IntoResponse, ScanmapError> {
    let codes = state.code_service.list_all().await?;
    let data: Vec<CodeResponse> = codes.iter().map(CodeResponse::from).collect();
    Ok(Json(CodeListResponse {
        total: data.len(),
        data,
    }))
}

/// `GET /codes/{identifier}`: Code data.
///
/// # Errors
///
/// Returns [`ScanmapError::CodeNotFound`] if the code does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/codes/{identifier}",
    tag = "Codes",
    summary = "Get code",
    params(
        ("identifier" = uuid::Uuid, Path, description = "Code identifier"),
    ),
    responses(
        (status = 200, description = "Code data", body = CodeResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Code not found", body = ErrorResponse),
    )
)]
pub async fn get_code(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, ScanmapError> {
    let identifier = parse_identifier(&identifier)?;
    let code = state.code_service.get_by_identifier(identifier).await?;
    Ok(Json(CodeResponse::from(&code)))
}

/// `DELETE /codes/{identifier}`: Delete a code and its scans.
///
/// # Errors
///
/// Returns [`ScanmapError::CodeNotFound`] if the code does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/codes/{identifier}",
    tag = "Codes",
    summary = "Delete code",
    description = "Removes the code together with every scan recorded against it.",
    params(
        ("identifier" = uuid::Uuid, Path, description = "Code identifier"),
    ),
    responses(
        (status = 200, description = "Code deleted", body = DeleteCodeResponse),
        (status = 404, description = "Code not found", body = ErrorResponse),
    )
)]
pub async fn delete_code(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, ScanmapError> {
    let identifier = parse_identifier(&identifier)?;
    let removed_scans = state.code_service.delete(identifier).await?;
    Ok(Json(DeleteCodeResponse {
        identifier: *identifier.as_uuid(),
        removed_scans,
    }))
}

/// `GET /codes/{identifier}/image`: PNG shown inline.
///
/// # Errors
///
/// Returns [`ScanmapError::CodeNotFound`] if the code does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/codes/{identifier}/image",
    tag = "Codes",
    summary = "Fetch code image",
    params(
        ("identifier" = uuid::Uuid, Path, description = "Code identifier"),
    ),
    responses(
        (status = 200, description = "PNG image"),
        (status = 404, description = "Code not found", body = ErrorResponse),
    )
)]
pub async fn code_image(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, ScanmapError> {
    let identifier = parse_identifier(&identifier)?;
    let code = state.code_service.get_by_identifier(identifier).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], code.image_bytes))
}

/// `GET /codes/{identifier}/download`: PNG as an attachment.
///
/// # Errors
///
/// Returns [`ScanmapError::CodeNotFound`] if the code does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/codes/{identifier}/download",
    tag = "Codes",
    summary = "Download code image",
    params(
        ("identifier" = uuid::Uuid, Path, description = "Code identifier"),
    ),
    responses(
        (status = 200, description = "PNG attachment named `{identifier}.png`"),
        (status = 404, description = "Code not found", body = ErrorResponse),
    )
)]
pub async fn download_code(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, ScanmapError> {
    let identifier = parse_identifier(&identifier)?;
    let code = state.code_service.get_by_identifier(identifier).await?;
    let disposition = format!("attachment; filename=\"{identifier}.png\"");
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        code.image_bytes,
    ))
}

/// Code routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/codes", post(create_code).get(list_codes))
        .route("/codes/{identifier}", get(get_code).delete(delete_code))
        .route("/codes/{identifier}/image", get(code_image))
        .route("/codes/{identifier}/download", get(download_code))
}
