//! Starter data for local development, applied with `jobsupi-api --seed`.
//!
//! Safe to run repeatedly: a role whose title already exists is skipped
//! together with its job posting. Nothing is deleted.

use tracing::info;

use crate::errors::AppError;
use crate::jobs::store::JobStore;
use crate::models::job::{NewJobPosting, DEFAULT_JOB_STATUS};
use crate::models::roadmap::RoadmapStep;
use crate::models::role::{NewRoleTemplate, RoleEnvironment, RoleFilter, RoleSkills};
use crate::roles::catalog::RoleCatalog;

const SAMPLE_EMPLOYER: &str = "Sample Employer";
const SAMPLE_LOCATION: &str = "Kolkata";
const SAMPLE_SALARY: (f64, f64) = (15_000.0, 20_000.0);

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: usize,
    pub roles_skipped: usize,
    pub jobs_created: usize,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn starter_roles() -> Vec<NewRoleTemplate> {
    vec![NewRoleTemplate {
        title: "MERN Support Intern".into(),
        description: Some(
            "Support the MERN stack portal with frontend and backend fixes.".into(),
        ),
        skills: RoleSkills {
            must_have: strings(&["javascript", "html"]),
            nice_to_have: strings(&["mongodb"]),
        },
        personality: strings(&["detail-oriented", "curious"]),
        environment: RoleEnvironment {
            mobility: Some("low".into()),
        },
        roadmap: vec![
            RoadmapStep {
                title: "Frontend refresh".into(),
                description: "Revisit React and Tailwind basics to support UI fixes in the portal."
                    .into(),
                duration_weeks: 2,
                resources: strings(&["React snippets", "Vite/Tailwind crash course"]),
            },
            RoadmapStep {
                title: "API ticket drills".into(),
                description: "Shadow senior developers triaging API bugs and log agent issues."
                    .into(),
                duration_weeks: 2,
                resources: strings(&["Postman collections", "GitHub issue templates"]),
            },
        ],
    }]
}

/// Creates each starter role that is not yet in the catalog, plus one open
/// job posting for it.
pub async fn seed_starter_data(
    roles: &dyn RoleCatalog,
    jobs: &dyn JobStore,
) -> Result<SeedReport, AppError> {
    let existing = roles.list(&RoleFilter::default()).await?;
    let mut report = SeedReport::default();

    for role in starter_roles() {
        if existing.iter().any(|r| r.title == role.title) {
            info!("Seed role '{}' already present, skipping", role.title);
            report.roles_skipped += 1;
            continue;
        }

        let created = roles.create(role).await?;
        report.roles_created += 1;

        jobs.create(NewJobPosting {
            role_id: created.id,
            employer: Some(SAMPLE_EMPLOYER.into()),
            location: Some(SAMPLE_LOCATION.into()),
            salary_min: Some(SAMPLE_SALARY.0),
            salary_max: Some(SAMPLE_SALARY.1),
            shift: None,
            status: DEFAULT_JOB_STATUS.into(),
        })
        .await?;
        report.jobs_created += 1;
    }

    info!(
        "Seed completed: {} roles created, {} skipped, {} jobs created",
        report.roles_created, report.roles_skipped, report.jobs_created
    );
    Ok(report)
}
