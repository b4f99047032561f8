//! Progress document storage
//!
//! Each user's [`ProgressAggregate`] is one versioned document. Writes are
//! read-modify-write with an optimistic version check: a save succeeds only
//! if the stored version still equals the version that was loaded.

use async_trait::async_trait;
use fitness_progress_shared::{ProgressAggregate, ProgressError, ProgressResult};
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

/// Persistence for progress aggregates, keyed by user id
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Load the aggregate for a user, if one was ever saved
    async fn load(&self, user_id: Uuid) -> ProgressResult<Option<ProgressAggregate>>;

    /// Persist the aggregate
    ///
    /// `aggregate.version` must match the stored version (0 for a document
    /// that was never saved). Returns the stored aggregate carrying its new
    /// version.
    async fn save(&self, aggregate: &ProgressAggregate) -> ProgressResult<ProgressAggregate>;

    /// Verify the store is reachable
    async fn health_check(&self) -> ProgressResult<()>;
}

fn storage_error(err: sqlx::Error) -> ProgressError {
    warn!("Progress storage error: {}", err);
    ProgressError::StorageUnavailable(err.to_string())
}

// ============================================================================
// PostgreSQL
// ============================================================================

/// Progress document row
#[derive(Debug, sqlx::FromRow)]
struct ProgressRow {
    document: Json<ProgressAggregate>,
    version: i64,
}

/// JSONB-backed progress store
#[derive(Clone)]
pub struct PgProgressStore {
    pool: PgPool,
}

impl PgProgressStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn stored_version(&self, user_id: Uuid) -> ProgressResult<i64> {
        let version: Option<i64> =
            sqlx::query_scalar(r#"SELECT version FROM progress_documents WHERE user_id = $1"#)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_error)?;

        Ok(version.unwrap_or(0))
    }
}

#[async_trait]
impl ProgressStore for PgProgressStore {
    async fn load(&self, user_id: Uuid) -> ProgressResult<Option<ProgressAggregate>> {
        let row = sqlx::query_as::<_, ProgressRow>(
            r#"
            SELECT document, version
            FROM progress_documents
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(|row| {
            let mut aggregate = row.document.0;
            aggregate.version = row.version;
            aggregate
        }))
    }

    async fn save(&self, aggregate: &ProgressAggregate) -> ProgressResult<ProgressAggregate> {
        let expected = aggregate.version;
        let mut stored = aggregate.clone();
        stored.version = expected + 1;

        let written: Option<i64> = if expected == 0 {
            sqlx::query_scalar(
                r#"
                INSERT INTO progress_documents (user_id, document, version, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (user_id) DO NOTHING
                RETURNING version
                "#,
            )
            .bind(stored.user_id)
            .bind(Json(&stored))
            .bind(stored.version)
            .bind(stored.created_at)
            .bind(stored.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?
        } else {
            sqlx::query_scalar(
                r#"
                UPDATE progress_documents SET
                    document = $2,
                    version = $3,
                    updated_at = $4
                WHERE user_id = $1 AND version = $5
                RETURNING version
                "#,
            )
            .bind(stored.user_id)
            .bind(Json(&stored))
            .bind(stored.version)
            .bind(stored.updated_at)
            .bind(expected)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?
        };

        match written {
            Some(_) => Ok(stored),
            None => {
                let actual = self.stored_version(stored.user_id).await?;
                warn!(user_id = %stored.user_id, expected, actual, "Progress write conflict");
                Err(ProgressError::ConcurrencyConflict { expected, actual })
            }
        }
    }

    async fn health_check(&self) -> ProgressResult<()> {
        crate::db::health_check(&self.pool)
            .await
            .map_err(|e| ProgressError::StorageUnavailable(e.to_string()))
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Process-local progress store with the same versioning contract
#[derive(Default)]
pub struct MemoryProgressStore {
    documents: RwLock<HashMap<Uuid, ProgressAggregate>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn load(&self, user_id: Uuid) -> ProgressResult<Option<ProgressAggregate>> {
        Ok(self.documents.read().await.get(&user_id).cloned())
    }

    async fn save(&self, aggregate: &ProgressAggregate) -> ProgressResult<ProgressAggregate> {
        let mut documents = self.documents.write().await;
        let actual = documents
            .get(&aggregate.user_id)
            .map(|doc| doc.version)
            .unwrap_or(0);

        if actual != aggregate.version {
            warn!(
                user_id = %aggregate.user_id,
                expected = aggregate.version,
                actual,
                "Progress write conflict"
            );
            return Err(ProgressError::ConcurrencyConflict {
                expected: aggregate.version,
                actual,
            });
        }

        let mut stored = aggregate.clone();
        stored.version = actual + 1;
        documents.insert(stored.user_id, stored.clone());
        Ok(stored)
    }

    async fn health_check(&self) -> ProgressResult<()> {
        Ok(())
    }
}
