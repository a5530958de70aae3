use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::agent_client::RoleFit;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::profile::{ProfilePatch, SeekerProfile};
use crate::profiles::store::{save_profile, SaveOutcome};
use crate::state::AppState;

/// GET /api/v1/profiles
pub async fn handle_list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<SeekerProfile>>, AppError> {
    Ok(Json(state.profiles.list().await?))
}

/// POST /api/v1/profiles
///
/// Without an id in the body: creates a profile (201).
/// With an id: upserts under that id (200), creating it if unknown.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    AppJson(profile): AppJson<SeekerProfile>,
) -> Result<(StatusCode, Json<SeekerProfile>), AppError> {
    let outcome = save_profile(state.profiles.as_ref(), profile).await?;
    let status = match outcome {
        SaveOutcome::Created(_) => StatusCode::CREATED,
        SaveOutcome::Upserted(_) => StatusCode::OK,
    };
    Ok((status, Json(outcome.into_profile())))
}

/// GET /api/v1/profiles/:id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<SeekerProfile>, AppError> {
    Ok(Json(state.profiles.get_by_id(id).await?))
}

/// PUT /api/v1/profiles/:id
pub async fn handle_update_profile(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<ProfilePatch>,
) -> Result<Json<SeekerProfile>, AppError> {
    Ok(Json(state.profiles.patch(id, patch).await?))
}

/// DELETE /api/v1/profiles/:id
pub async fn handle_delete_profile(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.profiles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/profiles/:id/role-fit
///
/// Asks the agent which roles fit the stored profile.
pub async fn handle_role_fit(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<RoleFit>, AppError> {
    Ok(Json(state.orchestrator().recommend_role(id).await?))
}
