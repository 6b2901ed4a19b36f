//! REST endpoint handlers organized by resource.

pub mod code;
pub mod map;
pub mod scan;
pub mod system;

use axum::Router;

use crate::app_state::AppState;
use crate::domain::CodeIdentifier;
use crate::error::ScanmapError;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(code::routes())
        .merge(scan::routes())
        .merge(map::routes())
}

/// Parses a path segment into a [`CodeIdentifier`].
///
/// # Errors
///
/// Returns [`ScanmapError::InvalidRequest`] if the segment is not a UUID.
pub(crate) fn parse_identifier(raw: &str) -> Result<CodeIdentifier, ScanmapError> {
    raw.parse::<CodeIdentifier>()
        .map_err(|e| ScanmapError::InvalidRequest(format!("malformed identifier {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_identifier_is_invalid_request() {
        assert!(matches!(
            parse_identifier("not-a-uuid"),
            Err(ScanmapError::InvalidRequest(_))
        ));
        let id = CodeIdentifier::new();
        assert!(matches!(parse_identifier(&id.to_string()), Ok(parsed) if parsed == id));
    }
}
