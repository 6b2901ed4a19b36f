//! Code identifiers and the generators that mint them.
//!
//! [`CodeIdentifier`] is a newtype wrapper around [`uuid::Uuid`] (v4, 128
//! random bits) so that code identifiers cannot be confused with other UUIDs
//! or with the store's surrogate keys. Identifiers are minted through an
//! injected [`IdentifierGenerator`], which lets tests supply deterministic
//! sequences and simulate collisions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque token correlating a code with its scans.
///
/// Minted once at code creation and immutable thereafter. Appears in the
/// public resolution path (`/scans/{identifier}`) and, depending on the
/// [`super::EmbeddingPolicy`], inside the encoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeIdentifier(uuid::Uuid);

impl CodeIdentifier {
    /// Creates a new random `CodeIdentifier` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `CodeIdentifier` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for CodeIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CodeIdentifier {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

impl From<uuid::Uuid> for CodeIdentifier {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<CodeIdentifier> for uuid::Uuid {
    fn from(id: CodeIdentifier) -> Self {
        id.0
    }
}

/// Source of fresh code identifiers.
pub trait IdentifierGenerator: fmt::Debug + Send + Sync {
    /// Returns a new identifier. Uniqueness is probabilistic; the code
    /// registry handles the rare collision reported by the store.
    fn mint(&self) -> CodeIdentifier;
}

/// Production generator backed by the runtime's random UUID v4 source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdentifierGenerator;

impl IdentifierGenerator for RandomIdentifierGenerator {
    fn mint(&self) -> CodeIdentifier {
        CodeIdentifier::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        let a = CodeIdentifier::new();
        let b = CodeIdentifier::new();
        assert_ne!(a, b);
    }

    #[test]
    fn display_parses_back() {
        let id = CodeIdentifier::new();
        let s = id.to_string();
        assert_eq!(s.len(), 36);
        let Ok(parsed) = s.parse::<CodeIdentifier>() else {
            panic!("identifier should parse");
        };
        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_garbage() {
        assert!("not-an-identifier".parse::<CodeIdentifier>().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = CodeIdentifier::new();
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, format!("\"{id}\""));
    }

    #[test]
    fn random_generator_mints_distinct_ids() {
        let generator = RandomIdentifierGenerator;
        assert_ne!(generator.mint(), generator.mint());
    }
}
