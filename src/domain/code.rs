//! The `Code` aggregate: a generated QR artifact plus its creation metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CodeIdentifier, Coordinates, EmbeddingPolicy};

/// Lowest QR symbol version.
pub const MIN_VERSION: u8 = 1;
/// Highest QR symbol version.
pub const MAX_VERSION: u8 = 40;

/// Raster parameters fixed at creation time.
///
/// `version` is the requested minimum; the encoder may grow past it when
/// the payload does not fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingParams {
    /// Requested symbol version, `1..=40`.
    pub version: u8,
    /// Pixels per module side, at least 1.
    pub module_size: u32,
    /// Quiet zone width in modules.
    pub border: u32,
    /// Dark module color (`#rrggbb`, `#rgb`, or a CSS color name).
    pub foreground: String,
    /// Light module color.
    pub background: String,
}

impl Default for EncodingParams {
    fn default() -> Self {
        Self {
            version: MIN_VERSION,
            module_size: 10,
            border: 4,
            foreground: "black".to_string(),
            background: "white".to_string(),
        }
    }
}

/// Caller input for creating a code.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeRequest {
    /// Optional display name.
    pub name: Option<String>,
    /// Data the code resolves to.
    pub target_url: String,
    /// Raster parameters.
    pub params: EncodingParams,
    /// Where the code is physically deployed.
    pub location: Option<Coordinates>,
}

/// A fully built code awaiting its surrogate key and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCode {
    /// Freshly minted identifier.
    pub identifier: CodeIdentifier,
    /// Optional display name.
    pub name: Option<String>,
    /// Caller's target data.
    pub target_url: String,
    /// String actually placed in the symbol.
    pub encoded_payload: String,
    /// PNG bytes.
    pub image_bytes: Vec<u8>,
    /// Raster parameters.
    pub params: EncodingParams,
    /// Embedding policy in force at creation.
    pub embedding: EmbeddingPolicy,
    /// Deployment location.
    pub location: Option<Coordinates>,
}

impl NewCode {
    /// Attaches the store-assigned key and creation time.
    #[must_use]
    pub fn into_code(self, id: i64, created_at: DateTime<Utc>) -> Code {
        Code {
            id,
            identifier: self.identifier,
            name: self.name,
            target_url: self.target_url,
            encoded_payload: self.encoded_payload,
            image_bytes: self.image_bytes,
            params: self.params,
            embedding: self.embedding,
            location: self.location,
            created_at,
        }
    }
}

/// A persisted, immutable code.
#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    /// Surrogate key assigned by the store.
    pub id: i64,
    /// Public identifier.
    pub identifier: CodeIdentifier,
    /// Optional display name.
    pub name: Option<String>,
    /// Caller's target data.
    pub target_url: String,
    /// String actually placed in the symbol.
    pub encoded_payload: String,
    /// PNG bytes.
    pub image_bytes: Vec<u8>,
    /// Raster parameters.
    pub params: EncodingParams,
    /// Embedding policy in force at creation.
    pub embedding: EmbeddingPolicy,
    /// Deployment location.
    pub location: Option<Coordinates>,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}

impl Code {
    /// Label used in map annotations: the name if set, else the identifier.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.identifier.to_string())
    }
}
