//! Code registry: mints, encodes, and persists codes.

use std::sync::Arc;

use crate::domain::{
    Code, CodeIdentifier, CodeRequest, EmbeddingPolicy, IdentifierGenerator, NewCode,
};
use crate::encoder;
use crate::error::ScanmapError;
use crate::persistence::Store;

/// Orchestration layer for code creation and lookup.
///
/// Stateless coordinator: owns the [`Store`], the [`IdentifierGenerator`]
/// and the embedding policy. Creation follows the pattern: mint → build
/// payload → encode → insert. A failed encode never reaches the store.
#[derive(Debug, Clone)]
pub struct CodeService {
    store: Arc<dyn Store>,
    generator: Arc<dyn IdentifierGenerator>,
    embedding: EmbeddingPolicy,
}

impl CodeService {
    /// Creates a new `CodeService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        generator: Arc<dyn IdentifierGenerator>,
        embedding: EmbeddingPolicy,
    ) -> Self {
        Self {
            store,
            generator,
            embedding,
        }
    }

    /// Returns the embedding policy applied to new codes.
    #[must_use]
    pub fn embedding(&self) -> &EmbeddingPolicy {
        &self.embedding
    }

    /// Creates, encodes, and persists a new code.
    ///
    /// If the store reports an identifier collision, a fresh identifier is
    /// minted and the insert retried once; a second collision is reported
    /// as [`ScanmapError::Internal`].
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::Encoding`] if the symbol cannot be built, or
    /// any store error.
    pub async fn create(&self, request: CodeRequest) -> Result<Code, ScanmapError> {
        let first = self.build(&request)?;
        let code = match self.store.insert_code(first).await {
            Err(ScanmapError::IdentifierCollision(identifier)) => {
                tracing::warn!(%identifier, "identifier collision, minting again");
                let retry = self.build(&request)?;
                match self.store.insert_code(retry).await {
                    Err(ScanmapError::IdentifierCollision(identifier)) => {
                        return Err(ScanmapError::Internal(format!(
                            "identifier collision persisted after retry: {identifier}"
                        )));
                    }
                    other => other?,
                }
            }
            other => other?,
        };

        tracing::info!(
            identifier = %code.identifier,
            version = code.params.version,
            embedding = code.embedding.mode(),
            "code created"
        );
        Ok(code)
    }

    fn build(&self, request: &CodeRequest) -> Result<NewCode, ScanmapError> {
        let identifier = self.generator.mint();
        let encoded_payload = self.embedding.payload_for(&request.target_url, identifier);
        let raster = encoder::encode(&encoded_payload, &request.params)?;
        if raster.version != request.params.version {
            tracing::debug!(
                %identifier,
                requested = request.params.version,
                used = raster.version,
                "symbol grown to fit payload"
            );
        }

        Ok(NewCode {
            identifier,
            name: request.name.clone(),
            target_url: request.target_url.clone(),
            encoded_payload,
            image_bytes: raster.png,
            params: request.params.clone(),
            embedding: self.embedding.clone(),
            location: request.location,
        })
    }

    /// Resolves an identifier to its code.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::CodeNotFound`] if no code carries the
    /// identifier.
    pub async fn get_by_identifier(&self, identifier: CodeIdentifier) -> Result<Code, ScanmapError> {
        self.store
            .get_code(identifier)
            .await?
            .ok_or(ScanmapError::CodeNotFound(identifier))
    }

    /// Lists every code ordered by surrogate id.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list_all(&self) -> Result<Vec<Code>, ScanmapError> {
        self.store.list_codes().await
    }

    /// Deletes a code and all of its scan events.
    ///
    /// Returns the number of scan events removed.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::CodeNotFound`] if no code carries the
    /// identifier.
    pub async fn delete(&self, identifier: CodeIdentifier) -> Result<u64, ScanmapError> {
        let removed = self
            .store
            .delete_code(identifier)
            .await?
            .ok_or(ScanmapError::CodeNotFound(identifier))?;
        tracing::info!(%identifier, removed_scans = removed, "code deleted");
        Ok(removed)
    }
}
