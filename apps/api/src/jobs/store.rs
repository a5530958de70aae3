use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{JobFilter, JobPatch, JobPosting, NewJobPosting};

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn list(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, AppError>;

    async fn create(&self, job: NewJobPosting) -> Result<JobPosting, AppError>;

    /// NotFound if `id` is not stored.
    async fn update(&self, id: Uuid, patch: JobPatch) -> Result<JobPosting, AppError>;

    /// Idempotent.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

pub(crate) fn job_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Job {id} not found"))
}

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn list(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, AppError> {
        let (floor, ceiling) = match filter.salary {
            Some(window) => (Some(window.floor), Some(window.ceiling)),
            None => (None, None),
        };

        Ok(sqlx::query_as::<_, JobPosting>(
            r#"
            SELECT * FROM job_postings
            WHERE ($1::text IS NULL OR location = $1)
              AND ($2::uuid IS NULL OR role_id = $2)
              AND ($3::float8 IS NULL OR (salary_min >= $3 AND salary_max <= $4))
            ORDER BY created_at, id
            "#,
        )
        .bind(&filter.location)
        .bind(filter.role_id)
        .bind(floor)
        .bind(ceiling)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create(&self, job: NewJobPosting) -> Result<JobPosting, AppError> {
        let created = sqlx::query_as::<_, JobPosting>(
            r#"
            INSERT INTO job_postings
                (id, role_id, employer, location, salary_min, salary_max, shift, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job.role_id)
        .bind(&job.employer)
        .bind(&job.location)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.shift)
        .bind(&job.status)
        .fetch_one(&self.pool)
        .await?;

        info!("Created job posting {} for role {}", created.id, created.role_id);
        Ok(created)
    }

    async fn update(&self, id: Uuid, patch: JobPatch) -> Result<JobPosting, AppError> {
        sqlx::query_as::<_, JobPosting>(
            r#"
            UPDATE job_postings SET
                role_id = COALESCE($2, role_id),
                employer = COALESCE($3, employer),
                location = COALESCE($4, location),
                salary_min = COALESCE($5, salary_min),
                salary_max = COALESCE($6, salary_max),
                shift = COALESCE($7, shift),
                status = COALESCE($8, status),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.role_id)
        .bind(patch.employer)
        .bind(patch.location)
        .bind(patch.salary_min)
        .bind(patch.salary_max)
        .bind(patch.shift)
        .bind(patch.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| job_not_found(id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM job_postings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
