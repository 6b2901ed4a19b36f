//! OpenAPI document for the REST API.

use utoipa::OpenApi;

use crate::api::dto::{
    CodeListResponse, CodeResponse, CreateCodeRequest, DeleteCodeResponse, DeleteScansResponse,
    EncodingParamsDto, LocationDto, RecordScanRequest, ScanCountResponse, ScanListResponse,
    ScanResponse,
};
use crate::api::handlers::{code, map, scan, system};
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI documentation for every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "scanmap",
        description = "Issue QR codes, record their scans, and render scan maps."
    ),
    paths(
        code::create_code,
        code::list_codes,
        code::get_code,
        code::delete_code,
        code::code_image,
        code::download_code,
        scan::record_scan,
        scan::list_scans,
        scan::count_scans,
        scan::delete_scans,
        map::render_map,
        system::health_handler,
    ),
    components(schemas(
        CreateCodeRequest,
        CodeResponse,
        CodeListResponse,
        DeleteCodeResponse,
        EncodingParamsDto,
        LocationDto,
        RecordScanRequest,
        ScanResponse,
        ScanListResponse,
        ScanCountResponse,
        DeleteScansResponse,
        ErrorResponse,
        ErrorBody,
        system::HealthResponse,
    )),
    tags(
        (name = "Codes", description = "QR code issuing"),
        (name = "Scans", description = "Scan recording and queries"),
        (name = "Maps", description = "Map documents"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;
