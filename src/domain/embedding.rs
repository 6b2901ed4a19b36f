//! Identifier embedding policy.
//!
//! Decides whether a freshly minted [`CodeIdentifier`] is written into the
//! encoded payload or tracked only in the persisted record. The policy is
//! chosen by configuration, resolved once per code at creation time, and
//! stored on the [`super::Code`] next to its encoding parameters.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::CodeIdentifier;

/// Default query parameter carrying the identifier.
pub const DEFAULT_QUERY_PARAM: &str = "qr_id";

/// How the identifier is bound into the encoded payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmbeddingPolicy {
    /// Append `?{name}={identifier}` to `http(s)` targets that do not already
    /// carry a `{name}` parameter. Anything else is encoded verbatim.
    QueryParam {
        /// Query parameter name.
        name: String,
    },
    /// Encode the caller's data verbatim; the identifier lives only in the
    /// persisted record.
    RecordOnly,
}

impl EmbeddingPolicy {
    /// Query-parameter policy using [`DEFAULT_QUERY_PARAM`].
    #[must_use]
    pub fn query_param() -> Self {
        Self::QueryParam {
            name: DEFAULT_QUERY_PARAM.to_string(),
        }
    }

    /// Short label used in configuration and storage (`query_param` or
    /// `record_only`).
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::QueryParam { .. } => "query_param",
            Self::RecordOnly => "record_only",
        }
    }

    /// Query parameter name, if any.
    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Self::QueryParam { name } => Some(name),
            Self::RecordOnly => None,
        }
    }

    /// Rebuilds a policy from its stored parts.
    ///
    /// Returns `None` for an unknown mode or a `query_param` mode without a
    /// parameter name.
    #[must_use]
    pub fn from_parts(mode: &str, param: Option<&str>) -> Option<Self> {
        match (mode, param) {
            ("record_only", _) => Some(Self::RecordOnly),
            ("query_param", Some(name)) if !name.is_empty() => Some(Self::QueryParam {
                name: name.to_string(),
            }),
            _ => None,
        }
    }

    /// Produces the string that goes into the symbol for `target`.
    #[must_use]
    pub fn payload_for(&self, target: &str, identifier: CodeIdentifier) -> String {
        let Self::QueryParam { name } = self else {
            return target.to_string();
        };

        let Ok(mut url) = Url::parse(target) else {
            tracing::debug!(%identifier, "target is not an absolute url; encoding verbatim");
            return target.to_string();
        };
        if !matches!(url.scheme(), "http" | "https") {
            return target.to_string();
        }
        if url.query_pairs().any(|(key, _)| key == name.as_str()) {
            return target.to_string();
        }

        url.query_pairs_mut()
            .append_pair(name, &identifier.to_string());
        url.to_string()
    }
}

impl Default for EmbeddingPolicy {
    fn default() -> Self {
        Self::query_param()
    }
}

impl fmt::Display for EmbeddingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueryParam { name } => write!(f, "query_param({name})"),
            Self::RecordOnly => write!(f, "record_only"),
        }
    }
}
