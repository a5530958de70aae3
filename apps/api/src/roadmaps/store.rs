//! RoadmapStore: append-only store of generated roadmaps.
//!
//! There is no update operation and no uniqueness on (role, user_profile):
//! every `create` appends a new record. `list` returns newest first, so the
//! first element for a profile is its most recent roadmap.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::roadmap::{NewRoadmap, Roadmap, RoadmapFilter, RoadmapRow};

#[async_trait]
pub trait RoadmapStore: Send + Sync {
    /// Assigns id and timestamps. Rejects empty steps, a missing user
    /// profile or a blank role with `Validation` before touching storage.
    async fn create(&self, roadmap: NewRoadmap) -> Result<Roadmap, AppError>;

    /// Exact match on each supplied filter field, newest first.
    async fn list(&self, filter: &RoadmapFilter) -> Result<Vec<Roadmap>, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Roadmap, AppError>;
}

pub(crate) fn roadmap_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Roadmap {id} not found"))
}

#[derive(Clone)]
pub struct PgRoadmapStore {
    pool: PgPool,
}

impl PgRoadmapStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoadmapStore for PgRoadmapStore {
    async fn create(&self, roadmap: NewRoadmap) -> Result<Roadmap, AppError> {
        let roadmap = roadmap.validate()?;

        let row = sqlx::query_as::<_, RoadmapRow>(
            r#"
            INSERT INTO roadmaps (id, role, user_profile, steps)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&roadmap.role)
        .bind(roadmap.user_profile)
        .bind(Json(&roadmap.steps))
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Created roadmap {} ({} steps) for profile {} and role {}",
            row.id,
            row.steps.0.len(),
            row.user_profile,
            row.role
        );
        Ok(row.into())
    }

    async fn list(&self, filter: &RoadmapFilter) -> Result<Vec<Roadmap>, AppError> {
        let rows = sqlx::query_as::<_, RoadmapRow>(
            r#"
            SELECT * FROM roadmaps
            WHERE ($1::text IS NULL OR role = $1)
              AND ($2::uuid IS NULL OR user_profile = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(&filter.role_id)
        .bind(filter.user_profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Roadmap::from).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Roadmap, AppError> {
        sqlx::query_as::<_, RoadmapRow>("SELECT * FROM roadmaps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Roadmap::from)
            .ok_or_else(|| roadmap_not_found(id))
    }
}
