//! In-memory stores and a scripted agent for unit and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::agent_client::{AgentGateway, AgentRoadmapDraft, RoleCandidate, RoleFit};
use crate::errors::AppError;
use crate::jobs::store::{job_not_found, JobStore};
use crate::models::job::{JobFilter, JobPatch, JobPosting, NewJobPosting};
use crate::models::profile::{ProfilePatch, SeekerProfile};
use crate::models::roadmap::{NewRoadmap, Roadmap, RoadmapFilter, RoadmapStep};
use crate::models::role::{NewRoleTemplate, RoleFilter, RoleTemplate};
use crate::profiles::store::{profile_not_found, ProfileStore};
use crate::roadmaps::store::{roadmap_not_found, RoadmapStore};
use crate::roles::catalog::{duplicate_title, role_not_found, RoleCatalog};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Profiles
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryProfileStore {
    records: RwLock<Vec<SeekerProfile>>,
}

impl InMemoryProfileStore {
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn create(&self, profile: SeekerProfile) -> Result<SeekerProfile, AppError> {
        let now = Utc::now();
        let created = SeekerProfile {
            id: Some(Uuid::new_v4()),
            created_at: Some(now),
            updated_at: Some(now),
            ..profile
        };
        self.records.write().await.push(created.clone());
        Ok(created)
    }

    async fn upsert(&self, id: Uuid, profile: SeekerProfile) -> Result<SeekerProfile, AppError> {
        let now = Utc::now();
        let mut records = self.records.write().await;
        let existing = records.iter().position(|p| p.id == Some(id));
        let saved = SeekerProfile {
            id: Some(id),
            created_at: existing.map_or(Some(now), |i| records[i].created_at),
            updated_at: Some(now),
            ..profile
        };
        match existing {
            Some(i) => records[i] = saved.clone(),
            None => records.push(saved.clone()),
        }
        Ok(saved)
    }

    async fn patch(&self, id: Uuid, patch: ProfilePatch) -> Result<SeekerProfile, AppError> {
        let mut records = self.records.write().await;
        let profile = records
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or_else(|| profile_not_found(id))?;
        patch.apply_to(profile);
        profile.updated_at = Some(Utc::now());
        Ok(profile.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<SeekerProfile, AppError> {
        self.records
            .read()
            .await
            .iter()
            .find(|p| p.id == Some(id))
            .cloned()
            .ok_or_else(|| profile_not_found(id))
    }

    async fn list(&self) -> Result<Vec<SeekerProfile>, AppError> {
        Ok(self.records.read().await.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.records.write().await.retain(|p| p.id != Some(id));
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Roles
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRoleCatalog {
    records: RwLock<Vec<RoleTemplate>>,
}

#[async_trait]
impl RoleCatalog for InMemoryRoleCatalog {
    async fn list(&self, filter: &RoleFilter) -> Result<Vec<RoleTemplate>, AppError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<RoleTemplate, AppError> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| role_not_found(id))
    }

    async fn create(&self, role: NewRoleTemplate) -> Result<RoleTemplate, AppError> {
        role.validate()?;
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.title == role.title) {
            return Err(AppError::Validation(duplicate_title(&role.title)));
        }
        let now = Utc::now();
        let created = RoleTemplate {
            id: Uuid::new_v4(),
            title: role.title,
            description: role.description,
            skills: role.skills,
            personality: role.personality,
            environment: role.environment,
            roadmap: role.roadmap,
            created_at: now,
            updated_at: now,
        };
        records.push(created.clone());
        Ok(created)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Roadmaps
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRoadmapStore {
    records: RwLock<Vec<Roadmap>>,
}

impl InMemoryRoadmapStore {
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl RoadmapStore for InMemoryRoadmapStore {
    async fn create(&self, roadmap: NewRoadmap) -> Result<Roadmap, AppError> {
        let roadmap = roadmap.validate()?;
        let now = Utc::now();
        let created = Roadmap {
            id: Uuid::new_v4(),
            role: roadmap.role,
            user_profile: roadmap.user_profile,
            steps: roadmap.steps,
            created_at: now,
            updated_at: now,
        };
        self.records.write().await.push(created.clone());
        Ok(created)
    }

    async fn list(&self, filter: &RoadmapFilter) -> Result<Vec<Roadmap>, AppError> {
        // Insertion order reversed stands in for created_at DESC.
        Ok(self
            .records
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Roadmap, AppError> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| roadmap_not_found(id))
    }
}

/// Validates like the real store, then fails every write as storage would.
pub struct FailingRoadmapStore;

#[async_trait]
impl RoadmapStore for FailingRoadmapStore {
    async fn create(&self, roadmap: NewRoadmap) -> Result<Roadmap, AppError> {
        roadmap.validate()?;
        Err(AppError::Persistence(sqlx::Error::PoolTimedOut))
    }

    async fn list(&self, _filter: &RoadmapFilter) -> Result<Vec<Roadmap>, AppError> {
        Err(AppError::Persistence(sqlx::Error::PoolTimedOut))
    }

    async fn get_by_id(&self, _id: Uuid) -> Result<Roadmap, AppError> {
        Err(AppError::Persistence(sqlx::Error::PoolTimedOut))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryJobStore {
    records: RwLock<Vec<JobPosting>>,
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn list(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, AppError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|j| filter.matches(j))
            .cloned()
            .collect())
    }

    async fn create(&self, job: NewJobPosting) -> Result<JobPosting, AppError> {
        let now = Utc::now();
        let created = JobPosting {
            id: Uuid::new_v4(),
            role_id: job.role_id,
            employer: job.employer,
            location: job.location,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            shift: job.shift,
            status: job.status,
            created_at: now,
            updated_at: now,
        };
        self.records.write().await.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, patch: JobPatch) -> Result<JobPosting, AppError> {
        let mut records = self.records.write().await;
        let job = records
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| job_not_found(id))?;
        patch.apply_to(job);
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.records.write().await.retain(|j| j.id != id);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Agent
// ────────────────────────────────────────────────────────────────────────────

/// Scripted agent. `drafting` returns fixed steps; `failing` returns
/// Upstream for every call.
pub struct StubAgent {
    draft: Option<AgentRoadmapDraft>,
    calls: AtomicUsize,
    last_hint: Mutex<Option<String>>,
}

impl StubAgent {
    pub fn drafting(titles: &[&str], selected_role_id: Option<&str>) -> Self {
        let steps = titles
            .iter()
            .map(|t| RoadmapStep {
                title: t.to_string(),
                description: format!("Learn {t}"),
                duration_weeks: 2,
                resources: vec![],
            })
            .collect();
        StubAgent {
            draft: Some(AgentRoadmapDraft {
                steps,
                selected_role_id: selected_role_id.map(str::to_string),
                summary: Some("stub".into()),
            }),
            calls: AtomicUsize::new(0),
            last_hint: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        StubAgent {
            draft: None,
            calls: AtomicUsize::new(0),
            last_hint: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn last_hint(&self) -> Option<String> {
        self.last_hint.lock().await.clone()
    }

    fn unavailable() -> AppError {
        AppError::Upstream("agent unavailable".into())
    }
}

#[async_trait]
impl AgentGateway for StubAgent {
    async fn recommend_role_fit(&self, _profile: &SeekerProfile) -> Result<RoleFit, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let draft = self.draft.as_ref().ok_or_else(Self::unavailable)?;
        let role_id = draft.selected_role_id.clone().unwrap_or_else(|| "r1".into());
        Ok(RoleFit {
            summary: "stub fit".into(),
            role_candidates: vec![RoleCandidate {
                role_id: role_id.clone(),
                title: "Stock Controller".into(),
                match_score: 0.8,
                rationale: "skills overlap".into(),
            }],
            selected_role_id: Some(role_id),
        })
    }

    async fn draft_roadmap(
        &self,
        _profile: &SeekerProfile,
        role_id_hint: Option<&str>,
    ) -> Result<AgentRoadmapDraft, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_hint.lock().await = role_id_hint.map(str::to_string);
        self.draft.clone().ok_or_else(Self::unavailable)
    }
}

/// Application state backed entirely by in-memory stores.
pub fn in_memory_state(agent: StubAgent) -> AppState {
    AppState {
        profiles: Arc::new(InMemoryProfileStore::default()),
        roles: Arc::new(InMemoryRoleCatalog::default()),
        roadmaps: Arc::new(InMemoryRoadmapStore::default()),
        jobs: Arc::new(InMemoryJobStore::default()),
        agent: Arc::new(agent),
    }
}
