use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::non_blank;

pub const DEFAULT_DURATION_WEEKS: u32 = 1;

fn default_duration_weeks() -> u32 {
    DEFAULT_DURATION_WEEKS
}

/// Whole weeks for a step. Missing, non-finite and sub-one values become
/// `DEFAULT_DURATION_WEEKS`; fractions are rounded.
pub fn positive_weeks(raw: Option<f64>) -> u32 {
    match raw {
        Some(weeks) if weeks.is_finite() && weeks >= 1.0 => {
            weeks.round().min(u32::MAX as f64) as u32
        }
        _ => DEFAULT_DURATION_WEEKS,
    }
}

fn deserialize_duration_weeks<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(positive_weeks)
}

/// One learning step. Shared by persisted roadmaps and role template defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStep {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(
        default = "default_duration_weeks",
        deserialize_with = "deserialize_duration_weeks"
    )]
    pub duration_weeks: u32,
    #[serde(default)]
    pub resources: Vec<String>,
}

/// A persisted roadmap. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub id: Uuid,
    /// Role identifier as supplied at creation; not guaranteed to resolve to
    /// a role template.
    pub role: String,
    pub user_profile: Uuid,
    pub steps: Vec<RoadmapStep>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct RoadmapRow {
    pub id: Uuid,
    pub role: String,
    pub user_profile: Uuid,
    pub steps: Json<Vec<RoadmapStep>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoadmapRow> for Roadmap {
    fn from(row: RoadmapRow) -> Self {
        Roadmap {
            id: row.id,
            role: row.role,
            user_profile: row.user_profile,
            steps: row.steps.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Body of `POST /roadmaps`. Required fields are optional here so that a
/// missing value surfaces as a validation error from the store rather than a
/// body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoadmap {
    pub role: Option<String>,
    pub user_profile: Option<Uuid>,
    #[serde(default)]
    pub steps: Vec<RoadmapStep>,
}

/// A `NewRoadmap` that passed `validate`.
#[derive(Debug, Clone)]
pub struct ValidRoadmap {
    pub role: String,
    pub user_profile: Uuid,
    pub steps: Vec<RoadmapStep>,
}

impl NewRoadmap {
    pub fn validate(self) -> Result<ValidRoadmap, AppError> {
        let role = non_blank(self.role)
            .ok_or_else(|| AppError::Validation("role is required".to_string()))?;
        let user_profile = self
            .user_profile
            .ok_or_else(|| AppError::Validation("userProfile is required".to_string()))?;
        if self.steps.is_empty() {
            return Err(AppError::Validation(
                "roadmap must contain at least one step".to_string(),
            ));
        }
        let steps = self
            .steps
            .into_iter()
            .map(|step| RoadmapStep {
                duration_weeks: step.duration_weeks.max(DEFAULT_DURATION_WEEKS),
                ..step
            })
            .collect();
        Ok(ValidRoadmap {
            role,
            user_profile,
            steps,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoadmapFilter {
    pub role_id: Option<String>,
    pub user_profile_id: Option<Uuid>,
}

impl RoadmapFilter {
    pub fn matches(&self, roadmap: &Roadmap) -> bool {
        self.role_id.as_deref().map_or(true, |r| roadmap.role == r)
            && self
                .user_profile_id
                .map_or(true, |p| roadmap.user_profile == p)
    }
}

/// Raw query string of `GET /roadmaps`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapQuery {
    pub role_id: Option<String>,
    pub user_profile_id: Option<String>,
}

impl TryFrom<RoadmapQuery> for RoadmapFilter {
    type Error = AppError;

    fn try_from(query: RoadmapQuery) -> Result<Self, Self::Error> {
        let user_profile_id = non_blank(query.user_profile_id)
            .map(|raw| {
                Uuid::parse_str(raw.trim()).map_err(|_| {
                    AppError::Validation(format!("userProfileId '{raw}' is not a valid id"))
                })
            })
            .transpose()?;
        Ok(RoadmapFilter {
            role_id: non_blank(query.role_id),
            user_profile_id,
        })
    }
}
