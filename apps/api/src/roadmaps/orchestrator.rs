//! Roadmap Orchestrator: the generate-and-save workflow.
//!
//! Flow: load profile → fetch draft from agent → resolve role id → persist.
//!
//! The stages are independent operations with no cross-step transaction.
//! Nothing is written before the persist stage, so a failure anywhere
//! earlier leaves no trace and the request can be repeated. A repeated
//! request after an ambiguous outcome may create a second roadmap; no
//! duplicate suppression is done. Invalidating any cached roadmap listing
//! is the caller's job.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::agent_client::{AgentGateway, AgentRoadmapDraft, RoleFit};
use crate::errors::AppError;
use crate::models::non_blank;
use crate::models::profile::SeekerProfile;
use crate::models::roadmap::{NewRoadmap, Roadmap, RoadmapStep};
use crate::profiles::store::ProfileStore;
use crate::roadmaps::store::RoadmapStore;

/// Explicit request context: which profile, and optionally which role the
/// user already picked. Replaces any ambient session state.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapRequest {
    pub profile_id: Uuid,
    #[serde(default, alias = "roleIdHint")]
    pub role_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    Load,
    Fetch,
    Resolve,
    Persist,
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStage::Load => "load",
            WorkflowStage::Fetch => "fetch",
            WorkflowStage::Resolve => "resolve",
            WorkflowStage::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// Picks the canonical role id: caller hint first, then the agent's
/// selection. Blank values count as absent.
pub fn resolve_role_id(
    role_id_hint: Option<&str>,
    agent_selected: Option<&str>,
) -> Result<String, AppError> {
    non_blank(role_id_hint.map(str::to_string))
        .or_else(|| non_blank(agent_selected.map(str::to_string)))
        .ok_or_else(|| AppError::Validation("missing role identifier".to_string()))
}

#[derive(Clone)]
pub struct RoadmapOrchestrator {
    profiles: Arc<dyn ProfileStore>,
    agent: Arc<dyn AgentGateway>,
    roadmaps: Arc<dyn RoadmapStore>,
}

impl RoadmapOrchestrator {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        agent: Arc<dyn AgentGateway>,
        roadmaps: Arc<dyn RoadmapStore>,
    ) -> Self {
        Self {
            profiles,
            agent,
            roadmaps,
        }
    }

    /// Runs the full workflow and returns the newly persisted roadmap.
    ///
    /// Errors propagate with their original kind: NotFound (profile),
    /// Upstream/Validation (agent), Validation (no role id), Persistence.
    pub async fn generate_and_save_roadmap(
        &self,
        request: &RoadmapRequest,
    ) -> Result<Roadmap, AppError> {
        let profile = self.load_profile(request.profile_id).await?;
        let draft = self
            .fetch_draft(request.profile_id, &profile, request.role_id.as_deref())
            .await?;
        let role = self.resolve(request, &draft)?;
        self.persist(role, request.profile_id, draft.steps).await
    }

    /// Loads the profile and asks the agent which roles fit it.
    pub async fn recommend_role(&self, profile_id: Uuid) -> Result<RoleFit, AppError> {
        let profile = self.load_profile(profile_id).await?;
        let fit = self
            .agent
            .recommend_role_fit(&profile)
            .await
            .map_err(|e| stage_failed(WorkflowStage::Fetch, profile_id, e))?;

        info!(
            "Role fit for profile {profile_id}: {} candidates, selected {:?}",
            fit.role_candidates.len(),
            fit.selected_role_id
        );
        Ok(fit)
    }

    async fn load_profile(&self, profile_id: Uuid) -> Result<SeekerProfile, AppError> {
        self.profiles
            .get_by_id(profile_id)
            .await
            .map_err(|e| stage_failed(WorkflowStage::Load, profile_id, e))
    }

    async fn fetch_draft(
        &self,
        profile_id: Uuid,
        profile: &SeekerProfile,
        role_id_hint: Option<&str>,
    ) -> Result<AgentRoadmapDraft, AppError> {
        let draft = self
            .agent
            .draft_roadmap(profile, role_id_hint)
            .await
            .map_err(|e| stage_failed(WorkflowStage::Fetch, profile_id, e))?;

        info!(
            "Agent drafted {} steps (selected role {:?})",
            draft.steps.len(),
            draft.selected_role_id
        );
        Ok(draft)
    }

    fn resolve(
        &self,
        request: &RoadmapRequest,
        draft: &AgentRoadmapDraft,
    ) -> Result<String, AppError> {
        resolve_role_id(request.role_id.as_deref(), draft.selected_role_id.as_deref())
            .map_err(|e| stage_failed(WorkflowStage::Resolve, request.profile_id, e))
    }

    /// Pure append; never looks for an existing roadmap to replace.
    async fn persist(
        &self,
        role: String,
        profile_id: Uuid,
        steps: Vec<RoadmapStep>,
    ) -> Result<Roadmap, AppError> {
        let roadmap = self
            .roadmaps
            .create(NewRoadmap {
                role: Some(role),
                user_profile: Some(profile_id),
                steps,
            })
            .await
            .map_err(|e| stage_failed(WorkflowStage::Persist, profile_id, e))?;

        info!(
            "Saved roadmap {} for profile {profile_id} (role {})",
            roadmap.id, roadmap.role
        );
        Ok(roadmap)
    }
}

fn stage_failed(stage: WorkflowStage, profile_id: Uuid, err: AppError) -> AppError {
    warn!("Roadmap workflow stage '{stage}' failed for profile {profile_id}: {err}");
    err
}
