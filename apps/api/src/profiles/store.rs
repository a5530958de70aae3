//! ProfileStore: owns seeker profile records.
//!
//! Saving is split into two explicit operations, `create` (store assigns the
//! id) and `upsert` (caller supplies the id). `save_profile` is the single
//! entry point and picks one of them purely on whether the profile carries
//! an id.
//!
//! NOTE: `upsert` with an id that was never stored succeeds as a creation
//! under that id. This makes client retries idempotent, but a client that
//! invents ids can overwrite another profile with the same id.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ProfilePatch, SeekerProfile};

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Inserts a new record under a fresh id. Any id on `profile` is ignored.
    async fn create(&self, profile: SeekerProfile) -> Result<SeekerProfile, AppError>;

    /// Atomically replaces the record with `id`, or inserts it under that id.
    /// Concurrent upserts of the same id resolve last-writer-wins.
    async fn upsert(&self, id: Uuid, profile: SeekerProfile) -> Result<SeekerProfile, AppError>;

    /// Changes only the supplied fields. NotFound if `id` is not stored.
    async fn patch(&self, id: Uuid, patch: ProfilePatch) -> Result<SeekerProfile, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<SeekerProfile, AppError>;

    async fn list(&self) -> Result<Vec<SeekerProfile>, AppError>;

    /// Idempotent; deleting an unknown id is not an error.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

/// Which branch `save_profile` took.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(SeekerProfile),
    Upserted(SeekerProfile),
}

impl SaveOutcome {
    pub fn into_profile(self) -> SeekerProfile {
        match self {
            SaveOutcome::Created(p) | SaveOutcome::Upserted(p) => p,
        }
    }
}

/// Persists `profile`: upsert when it carries an id, create otherwise.
pub async fn save_profile(
    store: &dyn ProfileStore,
    profile: SeekerProfile,
) -> Result<SaveOutcome, AppError> {
    match profile.id {
        Some(id) => store.upsert(id, profile).await.map(SaveOutcome::Upserted),
        None => store.create(profile).await.map(SaveOutcome::Created),
    }
}

pub(crate) fn profile_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Profile {id} not found"))
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL backend
// ────────────────────────────────────────────────────────────────────────────

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
    async fn create(&self, profile: SeekerProfile) -> Result<SeekerProfile, AppError> {
        let created = sqlx::query_as::<_, SeekerProfile>(
            r#"
            INSERT INTO seeker_profiles
                (id, name, contact, location, skills, interests, personality, experience_years)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&profile.name)
        .bind(&profile.contact)
        .bind(&profile.location)
        .bind(&profile.skills)
        .bind(&profile.interests)
        .bind(&profile.personality)
        .bind(profile.experience_years)
        .fetch_one(&self.pool)
        .await?;

        info!("Created profile {:?}", created.id);
        Ok(created)
    }

    async fn upsert(&self, id: Uuid, profile: SeekerProfile) -> Result<SeekerProfile, AppError> {
        // Single statement so the insert-or-update is atomic per id.
        let saved = sqlx::query_as::<_, SeekerProfile>(
            r#"
            INSERT INTO seeker_profiles
                (id, name, contact, location, skills, interests, personality, experience_years)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                contact = EXCLUDED.contact,
                location = EXCLUDED.location,
                skills = EXCLUDED.skills,
                interests = EXCLUDED.interests,
                personality = EXCLUDED.personality,
                experience_years = EXCLUDED.experience_years,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&profile.name)
        .bind(&profile.contact)
        .bind(&profile.location)
        .bind(&profile.skills)
        .bind(&profile.interests)
        .bind(&profile.personality)
        .bind(profile.experience_years)
        .fetch_one(&self.pool)
        .await?;

        info!("Upserted profile {id}");
        Ok(saved)
    }

    async fn patch(&self, id: Uuid, patch: ProfilePatch) -> Result<SeekerProfile, AppError> {
        sqlx::query_as::<_, SeekerProfile>(
            r#"
            UPDATE seeker_profiles SET
                name = COALESCE($2, name),
                contact = COALESCE($3, contact),
                location = COALESCE($4, location),
                skills = COALESCE($5, skills),
                interests = COALESCE($6, interests),
                personality = COALESCE($7, personality),
                experience_years = COALESCE($8, experience_years),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.contact)
        .bind(patch.location)
        .bind(patch.skills)
        .bind(patch.interests)
        .bind(patch.personality)
        .bind(patch.experience_years)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| profile_not_found(id))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<SeekerProfile, AppError> {
        sqlx::query_as::<_, SeekerProfile>("SELECT * FROM seeker_profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| profile_not_found(id))
    }

    async fn list(&self) -> Result<Vec<SeekerProfile>, AppError> {
        Ok(
            sqlx::query_as::<_, SeekerProfile>("SELECT * FROM seeker_profiles ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM seeker_profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
