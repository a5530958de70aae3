use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::non_blank;

pub const DEFAULT_JOB_STATUS: &str = "open";

fn default_status() -> String {
    DEFAULT_JOB_STATUS.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: Uuid,
    #[serde(rename = "role")]
    pub role_id: Uuid,
    pub employer: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub shift: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobPosting {
    #[serde(rename = "role")]
    pub role_id: Uuid,
    pub employer: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub shift: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(rename = "role")]
    pub role_id: Option<Uuid>,
    pub employer: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub shift: Option<String>,
    pub status: Option<String>,
}

impl JobPatch {
    pub fn apply_to(self, job: &mut JobPosting) {
        if let Some(role_id) = self.role_id {
            job.role_id = role_id;
        }
        if let Some(employer) = self.employer {
            job.employer = Some(employer);
        }
        if let Some(location) = self.location {
            job.location = Some(location);
        }
        if let Some(min) = self.salary_min {
            job.salary_min = Some(min);
        }
        if let Some(max) = self.salary_max {
            job.salary_max = Some(max);
        }
        if let Some(shift) = self.shift {
            job.shift = Some(shift);
        }
        if let Some(status) = self.status {
            job.status = status;
        }
    }
}

/// Inclusive salary window. Active whenever either bound was requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryWindow {
    pub floor: f64,
    pub ceiling: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub location: Option<String>,
    pub role_id: Option<Uuid>,
    pub salary: Option<SalaryWindow>,
}

impl JobFilter {
    /// A job missing either salary bound never falls inside an active window.
    pub fn matches(&self, job: &JobPosting) -> bool {
        let location_ok = self
            .location
            .as_deref()
            .map_or(true, |l| job.location.as_deref() == Some(l));
        let role_ok = self.role_id.map_or(true, |r| job.role_id == r);
        let salary_ok = self.salary.map_or(true, |w| match (job.salary_min, job.salary_max) {
            (Some(min), Some(max)) => min >= w.floor && max <= w.ceiling,
            _ => false,
        });
        location_ok && role_ok && salary_ok
    }
}

/// Raw query string of `GET /jobs`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub location: Option<String>,
    pub role_id: Option<String>,
    pub salary_min: Option<String>,
    pub salary_max: Option<String>,
}

impl TryFrom<JobQuery> for JobFilter {
    type Error = AppError;

    fn try_from(query: JobQuery) -> Result<Self, Self::Error> {
        let role_id = non_blank(query.role_id)
            .map(|raw| {
                Uuid::parse_str(raw.trim())
                    .map_err(|_| AppError::Validation(format!("roleId '{raw}' is not a valid id")))
            })
            .transpose()?;
        let salary_min = parse_amount("salaryMin", query.salary_min)?;
        let salary_max = parse_amount("salaryMax", query.salary_max)?;
        let salary = if salary_min.is_some() || salary_max.is_some() {
            Some(SalaryWindow {
                floor: salary_min.unwrap_or(0.0),
                ceiling: salary_max.unwrap_or(f64::INFINITY),
            })
        } else {
            None
        };
        Ok(JobFilter {
            location: non_blank(query.location),
            role_id,
            salary,
        })
    }
}

fn parse_amount(name: &str, raw: Option<String>) -> Result<Option<f64>, AppError> {
    non_blank(raw)
        .map(|raw| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| !v.is_nan())
                .ok_or_else(|| AppError::Validation(format!("{name} '{raw}' is not a number")))
        })
        .transpose()
}
