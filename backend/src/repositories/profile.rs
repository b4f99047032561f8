//! Training profile lookup
//!
//! Profiles are written by the program onboarding forms; the progress view
//! only reads the weekly frequency and body measurements from them.

use async_trait::async_trait;
use fitness_progress_shared::{Program, ProgressError, ProgressResult, TrainingProfile};
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Read access to per-program profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Profile for a user; `None` when the user has not completed onboarding
    async fn training_profile(&self, user_id: Uuid) -> ProgressResult<Option<TrainingProfile>>;
}

/// Training profile row
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProfileRow {
    program: String,
    days_per_week: Option<i32>,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    gender: Option<String>,
}

impl TryFrom<ProfileRow> for TrainingProfile {
    type Error = ProgressError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let program = row.program.parse::<Program>().map_err(|_| {
            ProgressError::StorageUnavailable(format!("Stored profile has unknown program '{}'", row.program))
        })?;

        Ok(TrainingProfile {
            program,
            days_per_week: row.days_per_week,
            weight_kg: row.weight_kg,
            height_cm: row.height_cm,
            gender: row.gender,
        })
    }
}

/// PostgreSQL profile store
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn training_profile(&self, user_id: Uuid) -> ProgressResult<Option<TrainingProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT program, days_per_week, weight_kg, height_cm, gender
            FROM training_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ProgressError::StorageUnavailable(e.to_string()))?;

        row.map(TrainingProfile::try_from).transpose()
    }
}

/// In-memory profile store
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, TrainingProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user_id: Uuid, profile: TrainingProfile) {
        self.profiles.write().await.insert(user_id, profile);
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn training_profile(&self, user_id: Uuid) -> ProgressResult<Option<TrainingProfile>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }
}
