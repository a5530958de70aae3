use std::sync::Arc;

use crate::agent_client::AgentGateway;
use crate::jobs::store::JobStore;
use crate::profiles::store::ProfileStore;
use crate::roadmaps::orchestrator::RoadmapOrchestrator;
use crate::roadmaps::store::RoadmapStore;
use crate::roles::catalog::RoleCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every store sits behind a trait object so tests can swap in memory-backed ones.
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub roles: Arc<dyn RoleCatalog>,
    pub roadmaps: Arc<dyn RoadmapStore>,
    pub jobs: Arc<dyn JobStore>,
    /// The only path to the recommendation agent.
    pub agent: Arc<dyn AgentGateway>,
}

impl AppState {
    pub fn orchestrator(&self) -> RoadmapOrchestrator {
        RoadmapOrchestrator::new(
            self.profiles.clone(),
            self.agent.clone(),
            self.roadmaps.clone(),
        )
    }
}
