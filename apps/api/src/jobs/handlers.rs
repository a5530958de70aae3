use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::job::{JobFilter, JobPatch, JobPosting, JobQuery, NewJobPosting};
use crate::state::AppState;

/// GET /api/v1/jobs?location=&roleId=&salaryMin=&salaryMax=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<JobQuery>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    let filter = JobFilter::try_from(query)?;
    Ok(Json(state.jobs.list(&filter).await?))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AppJson(job): AppJson<NewJobPosting>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    Ok((StatusCode::CREATED, Json(state.jobs.create(job).await?)))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<JobPatch>,
) -> Result<Json<JobPosting>, AppError> {
    Ok(Json(state.jobs.update(id, patch).await?))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.jobs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
