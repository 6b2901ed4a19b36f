//! Database rows for codes and scan events.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Code, CodeIdentifier, Coordinates, EmbeddingPolicy, EncodingParams, ScanEvent,
};
use crate::error::ScanmapError;

/// A row from the `codes` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CodeRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Public identifier.
    pub identifier: Uuid,
    /// Optional display name.
    pub name: Option<String>,
    /// Caller's target data.
    pub target_url: String,
    /// String placed in the symbol.
    pub encoded_payload: String,
    /// PNG bytes.
    pub image_bytes: Vec<u8>,
    /// Requested symbol version.
    pub version: i16,
    /// Pixels per module.
    pub module_size: i32,
    /// Quiet zone in modules.
    pub border: i32,
    /// Dark module color.
    pub foreground: String,
    /// Light module color.
    pub background: String,
    /// Embedding policy mode (`query_param` / `record_only`).
    pub embedding_mode: String,
    /// Query parameter name for `query_param`.
    pub embedding_param: Option<String>,
    /// Deployment latitude.
    pub latitude: Option<f64>,
    /// Deployment longitude.
    pub longitude: Option<f64>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CodeRow> for Code {
    type Error = ScanmapError;

    fn try_from(row: CodeRow) -> Result<Self, Self::Error> {
        let corrupt = |field: &str| {
            ScanmapError::PersistenceError(format!("corrupt {field} in code {}", row.identifier))
        };
        let version = u8::try_from(row.version).map_err(|_| corrupt("version"))?;
        let module_size = u32::try_from(row.module_size).map_err(|_| corrupt("module_size"))?;
        let border = u32::try_from(row.border).map_err(|_| corrupt("border"))?;
        let embedding =
            EmbeddingPolicy::from_parts(&row.embedding_mode, row.embedding_param.as_deref())
                .ok_or_else(|| corrupt("embedding"))?;

        Ok(Self {
            id: row.id,
            identifier: CodeIdentifier::from_uuid(row.identifier),
            name: row.name,
            target_url: row.target_url,
            encoded_payload: row.encoded_payload,
            image_bytes: row.image_bytes,
            params: EncodingParams {
                version,
                module_size,
                border,
                foreground: row.foreground,
                background: row.background,
            },
            embedding,
            location: Coordinates::from_parts(row.latitude, row.longitude),
            created_at: row.created_at,
        })
    }
}

/// A row from the `scan_events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScanRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Owning code's identifier.
    pub code_identifier: Uuid,
    /// Client network address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// Client latitude.
    pub latitude: Option<f64>,
    /// Client longitude.
    pub longitude: Option<f64>,
    /// Server-side insertion timestamp.
    pub recorded_at: DateTime<Utc>,
}

impl From<ScanRow> for ScanEvent {
    fn from(row: ScanRow) -> Self {
        Self {
            id: row.id,
            code_ref: CodeIdentifier::from_uuid(row.code_identifier),
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            location: Coordinates::from_parts(row.latitude, row.longitude),
            recorded_at: row.recorded_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn row() -> CodeRow {
        CodeRow {
            id: 7,
            identifier: Uuid::new_v4(),
            name: Some("lobby".to_string()),
            target_url: "https://example.com".to_string(),
            encoded_payload: "https://example.com/?qr_id=x".to_string(),
            image_bytes: vec![0x89, b'P'],
            version: 3,
            module_size: 10,
            border: 4,
            foreground: "black".to_string(),
            background: "white".to_string(),
            embedding_mode: "query_param".to_string(),
            embedding_param: Some("qr_id".to_string()),
            latitude: Some(1.5),
            longitude: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn code_row_converts() {
        let Ok(code) = Code::try_from(row()) else {
            panic!("conversion failed");
        };
        assert_eq!(code.params.version, 3);
        assert_eq!(code.embedding, EmbeddingPolicy::query_param());
        assert!(code.location.is_none());
    }

    #[test]
    fn negative_border_is_corrupt() {
        let bad = CodeRow {
            border: -1,
            ..row()
        };
        assert!(matches!(
            Code::try_from(bad),
            Err(ScanmapError::PersistenceError(_))
        ));
    }

    #[test]
    fn unknown_embedding_mode_is_corrupt() {
        let bad = CodeRow {
            embedding_mode: "sometimes".to_string(),
            ..row()
        };
        assert!(Code::try_from(bad).is_err());
    }
}
