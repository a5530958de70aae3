use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::roadmap::{NewRoadmap, Roadmap, RoadmapFilter, RoadmapQuery};
use crate::roadmaps::orchestrator::RoadmapRequest;
use crate::state::AppState;

/// GET /api/v1/roadmaps?roleId=&userProfileId=
///
/// Newest first; the first entry for a profile is its current roadmap.
pub async fn handle_list_roadmaps(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RoadmapQuery>,
) -> Result<Json<Vec<Roadmap>>, AppError> {
    let filter = RoadmapFilter::try_from(query)?;
    Ok(Json(state.roadmaps.list(&filter).await?))
}

/// GET /api/v1/roadmaps/:id
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Roadmap>, AppError> {
    Ok(Json(state.roadmaps.get_by_id(id).await?))
}

/// POST /api/v1/roadmaps
pub async fn handle_create_roadmap(
    State(state): State<AppState>,
    AppJson(roadmap): AppJson<NewRoadmap>,
) -> Result<(StatusCode, Json<Roadmap>), AppError> {
    let created = state.roadmaps.create(roadmap).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/v1/roadmaps/generate
///
/// Full workflow: load profile → agent draft → resolve role → persist.
/// Clients should refetch their roadmap listing afterwards.
pub async fn handle_generate_roadmap(
    State(state): State<AppState>,
    AppJson(request): AppJson<RoadmapRequest>,
) -> Result<(StatusCode, Json<Roadmap>), AppError> {
    let roadmap = state.orchestrator().generate_and_save_roadmap(&request).await?;
    Ok((StatusCode::CREATED, Json(roadmap)))
}
