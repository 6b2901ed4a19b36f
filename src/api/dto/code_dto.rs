//! Code DTOs for create, get, list and delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::LocationDto;
use crate::domain::{Code, CodeRequest, EncodingParams, MAX_VERSION, MIN_VERSION};
use crate::error::ScanmapError;

/// Request body for `POST /codes`.
///
/// Raster fields are optional and default to version 1, 10 px modules, a
/// 4-module border, black on white.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCodeRequest {
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Data the code resolves to, usually a URL.
    #[serde(alias = "data", alias = "url")]
    pub target_url: String,
    /// Minimum symbol version, `1..=40`.
    #[serde(default)]
    pub version: Option<u8>,
    /// Pixels per module.
    #[serde(default, alias = "box_size")]
    pub module_size: Option<u32>,
    /// Quiet zone width in modules.
    #[serde(default)]
    pub border: Option<u32>,
    /// Dark module color.
    #[serde(default, alias = "fill_color")]
    pub foreground: Option<String>,
    /// Light module color.
    #[serde(default, alias = "back_color")]
    pub background: Option<String>,
    /// Where the code is deployed.
    #[serde(default)]
    pub location: Option<LocationDto>,
}

impl CreateCodeRequest {
    /// Validates the body into a domain [`CodeRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::InvalidRequest`] for an empty target, a
    /// version outside `1..=40`, a zero module size, or coordinates out of
    /// range.
    pub fn into_domain(self) -> Result<CodeRequest, ScanmapError> {
        if self.target_url.trim().is_empty() {
            return Err(ScanmapError::InvalidRequest(
                "target_url must not be empty".to_string(),
            ));
        }

        let defaults = EncodingParams::default();
        let version = self.version.unwrap_or(defaults.version);
        if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
            return Err(ScanmapError::InvalidRequest(format!(
                "version {version} outside {MIN_VERSION}..={MAX_VERSION}"
            )));
        }
        let module_size = self.module_size.unwrap_or(defaults.module_size);
        if module_size == 0 {
            return Err(ScanmapError::InvalidRequest(
                "module_size must be at least 1".to_string(),
            ));
        }

        let location = self.location.map(LocationDto::validate).transpose()?;
        let name = self.name.filter(|n| !n.trim().is_empty());

        Ok(CodeRequest {
            name,
            target_url: self.target_url,
            params: EncodingParams {
                version,
                module_size,
                border: self.border.unwrap_or(defaults.border),
                foreground: self.foreground.unwrap_or(defaults.foreground),
                background: self.background.unwrap_or(defaults.background),
            },
            location,
        })
    }
}

/// Raster parameters echoed in code responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct EncodingParamsDto {
    /// Requested minimum version.
    pub version: u8,
    /// Pixels per module.
    pub module_size: u32,
    /// Quiet zone width in modules.
    pub border: u32,
    /// Dark module color.
    pub foreground: String,
    /// Light module color.
    pub background: String,
}

/// A code as returned by create, get and list.
#[derive(Debug, Serialize, ToSchema)]
pub struct CodeResponse {
    /// Public identifier.
    pub identifier: uuid::Uuid,
    /// Display name.
    pub name: Option<String>,
    /// Caller's target data.
    pub target_url: String,
    /// String actually placed in the symbol.
    pub encoded_payload: String,
    /// Identifier embedding mode (`query_param` or `record_only`).
    pub embedding: String,
    /// Raster parameters.
    pub params: EncodingParamsDto,
    /// Deployment location.
    pub location: Option<LocationDto>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Relative URL of the PNG image.
    pub image_url: String,
}

impl From<&Code> for CodeResponse {
    fn from(code: &Code) -> Self {
        Self {
            identifier: *code.identifier.as_uuid(),
            name: code.name.clone(),
            target_url: code.target_url.clone(),
            encoded_payload: code.encoded_payload.clone(),
            embedding: code.embedding.mode().to_string(),
            params: EncodingParamsDto {
                version: code.params.version,
                module_size: code.params.module_size,
                border: code.params.border,
                foreground: code.params.foreground.clone(),
                background: code.params.background.clone(),
            },
            location: code.location.map(LocationDto::from),
            created_at: code.created_at,
            image_url: format!("/api/v1/codes/{}/image", code.identifier),
        }
    }
}

/// List response for `GET /codes`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CodeListResponse {
    /// Codes ordered by creation.
    pub data: Vec<CodeResponse>,
    /// Number of codes.
    pub total: usize,
}

/// Response body for `DELETE /codes/{identifier}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteCodeResponse {
    /// Identifier of the removed code.
    pub identifier: uuid::Uuid,
    /// Number of scan events removed with it.
    pub removed_scans: u64,
}
