//! PostgreSQL implementation of the persistence layer.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::Store;
use super::models::{CodeRow, ScanRow};
use crate::config::ScanmapConfig;
use crate::domain::{Code, CodeIdentifier, NewCode, NewScanEvent, ScanEvent, TimeWindow};
use crate::error::ScanmapError;

const CODE_COLUMNS: &str = "id, identifier, name, target_url, encoded_payload, image_bytes, \
     version, module_size, border, foreground, background, embedding_mode, embedding_param, \
     latitude, longitude, created_at";

const SCAN_COLUMNS: &str =
    "id, code_identifier, ip_address, user_agent, latitude, longitude, recorded_at";

/// Inclusive window over `recorded_at`; binds are `$1` code, `$2` start, `$3` end.
/// An inverted window matches nothing because both bounds must hold.
const SCAN_WINDOW_FILTER: &str = "code_identifier = $1 \
     AND ($2::timestamptz IS NULL OR recorded_at >= $2) \
     AND ($3::timestamptz IS NULL OR recorded_at <= $3)";

fn persistence(e: sqlx::Error) -> ScanmapError {
    ScanmapError::PersistenceError(e.to_string())
}

/// PostgreSQL-backed store using `sqlx::PgPool`.
///
/// Scan events reference their code with `ON DELETE CASCADE`; code deletion
/// locks the code row inside a transaction so the removed-scan count covers
/// every scan the cascade removes.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using the pool settings in `config` and applies the
    /// embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::PersistenceError`] if the connection or a
    /// migration fails.
    pub async fn connect(config: &ScanmapConfig) -> Result<Self, ScanmapError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(persistence)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| ScanmapError::PersistenceError(e.to_string()))?;

        tracing::info!("postgres store ready");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn insert_code(&self, code: NewCode) -> Result<Code, ScanmapError> {
        let module_size = i32::try_from(code.params.module_size)
            .map_err(|_| ScanmapError::InvalidRequest("module_size too large".to_string()))?;
        let border = i32::try_from(code.params.border)
            .map_err(|_| ScanmapError::InvalidRequest("border too large".to_string()))?;
        let identifier = code.identifier;

        let sql = format!(
            "INSERT INTO codes (identifier, name, target_url, encoded_payload, image_bytes, \
             version, module_size, border, foreground, background, embedding_mode, \
             embedding_param, latitude, longitude) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {CODE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CodeRow>(&sql)
            .bind(identifier.as_uuid())
            .bind(&code.name)
            .bind(&code.target_url)
            .bind(&code.encoded_payload)
            .bind(&code.image_bytes)
            .bind(i16::from(code.params.version))
            .bind(module_size)
            .bind(border)
            .bind(&code.params.foreground)
            .bind(&code.params.background)
            .bind(code.embedding.mode())
            .bind(code.embedding.param_name())
            .bind(code.location.map(|c| c.latitude))
            .bind(code.location.map(|c| c.longitude))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e
                    && db.is_unique_violation()
                {
                    return ScanmapError::IdentifierCollision(identifier);
                }
                persistence(e)
            })?;

        Code::try_from(row)
    }

    async fn get_code(&self, identifier: CodeIdentifier) -> Result<Option<Code>, ScanmapError> {
        let sql = format!("SELECT {CODE_COLUMNS} FROM codes WHERE identifier = $1");
        let row = sqlx::query_as::<_, CodeRow>(&sql)
            .bind(identifier.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence)?;

        row.map(Code::try_from).transpose()
    }

    async fn list_codes(&self) -> Result<Vec<Code>, ScanmapError> {
        let sql = format!("SELECT {CODE_COLUMNS} FROM codes ORDER BY id ASC");
        let rows = sqlx::query_as::<_, CodeRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(persistence)?;

        rows.into_iter().map(Code::try_from).collect()
    }

    async fn delete_code(&self, identifier: CodeIdentifier) -> Result<Option<u64>, ScanmapError> {
        let mut tx = self.pool.begin().await.map_err(persistence)?;

        // Row lock conflicts with the FK key-share lock taken by scan inserts,
        // so no scan can commit between the count and the cascade.
        let locked = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM codes WHERE identifier = $1 FOR UPDATE",
        )
        .bind(identifier.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(persistence)?;

        if locked.is_none() {
            tx.rollback().await.map_err(persistence)?;
            return Ok(None);
        }

        let scans = sqlx::query("DELETE FROM scan_events WHERE code_identifier = $1")
            .bind(identifier.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(persistence)?;

        sqlx::query("DELETE FROM codes WHERE identifier = $1")
            .bind(identifier.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(persistence)?;

        tx.commit().await.map_err(persistence)?;
        Ok(Some(scans.rows_affected()))
    }

    async fn insert_scan(&self, scan: NewScanEvent) -> Result<ScanEvent, ScanmapError> {
        let code_ref = scan.code_ref;
        let sql = format!(
            "INSERT INTO scan_events (code_identifier, ip_address, user_agent, latitude, longitude) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {SCAN_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ScanRow>(&sql)
            .bind(code_ref.as_uuid())
            .bind(&scan.ip_address)
            .bind(&scan.user_agent)
            .bind(scan.location.map(|c| c.latitude))
            .bind(scan.location.map(|c| c.longitude))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e
                    && db.is_foreign_key_violation()
                {
                    return ScanmapError::CodeNotFound(code_ref);
                }
                persistence(e)
            })?;

        Ok(ScanEvent::from(row))
    }

    async fn list_scans(
        &self,
        identifier: CodeIdentifier,
        window: TimeWindow,
    ) -> Result<Vec<ScanEvent>, ScanmapError> {
        let sql = format!(
            "SELECT {SCAN_COLUMNS} FROM scan_events WHERE {SCAN_WINDOW_FILTER} \
             ORDER BY recorded_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, ScanRow>(&sql)
            .bind(identifier.as_uuid())
            .bind(window.start)
            .bind(window.end)
            .fetch_all(&self.pool)
            .await
            .map_err(persistence)?;

        Ok(rows.into_iter().map(ScanEvent::from).collect())
    }

    async fn count_scans(
        &self,
        identifier: CodeIdentifier,
        window: TimeWindow,
    ) -> Result<u64, ScanmapError> {
        let sql = format!("SELECT COUNT(*) FROM scan_events WHERE {SCAN_WINDOW_FILTER}");
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(identifier.as_uuid())
            .bind(window.start)
            .bind(window.end)
            .fetch_one(&self.pool)
            .await
            .map_err(persistence)?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn delete_scans(&self, identifier: CodeIdentifier) -> Result<u64, ScanmapError> {
        let result = sqlx::query("DELETE FROM scan_events WHERE code_identifier = $1")
            .bind(identifier.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(persistence)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_filter_bounds_are_inclusive_and_optional() {
        assert!(SCAN_WINDOW_FILTER.starts_with("code_identifier = $1"));
        assert!(SCAN_WINDOW_FILTER.contains("$2::timestamptz IS NULL OR recorded_at >= $2"));
        assert!(SCAN_WINDOW_FILTER.contains("$3::timestamptz IS NULL OR recorded_at <= $3"));
        assert_eq!(SCAN_WINDOW_FILTER.matches(" AND ").count(), 2);
    }
}
