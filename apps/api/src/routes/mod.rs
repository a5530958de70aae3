pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::profiles::handlers as profiles;
use crate::roadmaps::handlers as roadmaps;
use crate::roles::handlers as roles;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Profiles
        .route(
            "/profiles",
            get(profiles::handle_list_profiles).post(profiles::handle_save_profile),
        )
        .route(
            "/profiles/:id",
            get(profiles::handle_get_profile)
                .put(profiles::handle_update_profile)
                .delete(profiles::handle_delete_profile),
        )
        .route("/profiles/:id/role-fit", post(profiles::handle_role_fit))
        // Role catalog
        .route(
            "/roles",
            get(roles::handle_list_roles).post(roles::handle_create_role),
        )
        .route("/roles/:id", get(roles::handle_get_role))
        // Roadmaps
        .route(
            "/roadmaps",
            get(roadmaps::handle_list_roadmaps).post(roadmaps::handle_create_roadmap),
        )
        .route("/roadmaps/generate", post(roadmaps::handle_generate_roadmap))
        .route("/roadmaps/:id", get(roadmaps::handle_get_roadmap))
        // Jobs
        .route(
            "/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/jobs/:id",
            put(jobs::handle_update_job).delete(jobs::handle_delete_job),
        )
}
