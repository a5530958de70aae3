use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::role::{NewRoleTemplate, RoleFilter, RoleTemplate};
use crate::state::AppState;

/// GET /api/v1/roles?mobility=&skill=
pub async fn handle_list_roles(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<RoleFilter>,
) -> Result<Json<Vec<RoleTemplate>>, AppError> {
    Ok(Json(state.roles.list(&filter.normalized()).await?))
}

/// GET /api/v1/roles/:id
pub async fn handle_get_role(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<RoleTemplate>, AppError> {
    Ok(Json(state.roles.get_by_id(id).await?))
}

/// POST /api/v1/roles
pub async fn handle_create_role(
    State(state): State<AppState>,
    AppJson(role): AppJson<NewRoleTemplate>,
) -> Result<(StatusCode, Json<RoleTemplate>), AppError> {
    let created = state.roles.create(role).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
