use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::non_blank;
use crate::models::roadmap::RoadmapStep;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSkills {
    #[serde(default)]
    pub must_have: Vec<String>,
    #[serde(default)]
    pub nice_to_have: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleEnvironment {
    pub mobility: Option<String>,
}

/// A catalog entry describing a job role and its default learning path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleTemplate {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub skills: RoleSkills,
    pub personality: Vec<String>,
    pub environment: RoleEnvironment,
    pub roadmap: Vec<RoadmapStep>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat database shape of a role template.
#[derive(Debug, FromRow)]
pub struct RoleRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub must_have: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub personality: Vec<String>,
    pub mobility: Option<String>,
    pub roadmap: Json<Vec<RoadmapStep>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoleRow> for RoleTemplate {
    fn from(row: RoleRow) -> Self {
        RoleTemplate {
            id: row.id,
            title: row.title,
            description: row.description,
            skills: RoleSkills {
                must_have: row.must_have,
                nice_to_have: row.nice_to_have,
            },
            personality: row.personality,
            environment: RoleEnvironment {
                mobility: row.mobility,
            },
            roadmap: row.roadmap.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Body of `POST /roles`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoleTemplate {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub skills: RoleSkills,
    #[serde(default)]
    pub personality: Vec<String>,
    #[serde(default)]
    pub environment: RoleEnvironment,
    #[serde(default)]
    pub roadmap: Vec<RoadmapStep>,
}

impl NewRoleTemplate {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("role title is required".to_string()));
        }
        Ok(())
    }
}

/// Query options of `GET /roles`. Both are exact, case-sensitive matches.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RoleFilter {
    /// Matches `environment.mobility`.
    pub mobility: Option<String>,
    /// Matches when present in `skills.mustHave`.
    pub skill: Option<String>,
}

impl RoleFilter {
    pub fn normalized(self) -> Self {
        RoleFilter {
            mobility: non_blank(self.mobility),
            skill: non_blank(self.skill),
        }
    }

    pub fn matches(&self, role: &RoleTemplate) -> bool {
        let mobility_ok = self
            .mobility
            .as_deref()
            .map_or(true, |m| role.environment.mobility.as_deref() == Some(m));
        let skill_ok = self
            .skill
            .as_deref()
            .map_or(true, |s| role.skills.must_have.iter().any(|have| have == s));
        mobility_ok && skill_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(mobility: &str, must_have: &[&str]) -> RoleTemplate {
        RoleTemplate {
            id: Uuid::new_v4(),
            title: "Warehouse Associate".into(),
            description: None,
            skills: RoleSkills {
                must_have: must_have.iter().map(|s| s.to_string()).collect(),
                nice_to_have: vec!["forklift".into()],
            },
            personality: vec![],
            environment: RoleEnvironment {
                mobility: Some(mobility.into()),
            },
            roadmap: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_skill_filter_is_exact_and_case_sensitive() {
        let filter = RoleFilter {
            mobility: None,
            skill: Some("inventory".into()),
        };
        assert!(filter.matches(&role("high", &["inventory", "packing"])));
        assert!(!filter.matches(&role("high", &["Inventory"])));
        assert!(!filter.matches(&role("high", &["inventory management"])));
    }

    #[test]
    fn test_skill_filter_ignores_nice_to_have() {
        let filter = RoleFilter {
            mobility: None,
            skill: Some("forklift".into()),
        };
        assert!(!filter.matches(&role("low", &["packing"])));
    }

    #[test]
    fn test_mobility_and_skill_combine() {
        let filter = RoleFilter {
            mobility: Some("low".into()),
            skill: Some("html".into()),
        };
        assert!(filter.matches(&role("low", &["html"])));
        assert!(!filter.matches(&role("high", &["html"])));
    }

    #[test]
    fn test_blank_params_normalize_to_absent() {
        let filter = RoleFilter {
            mobility: Some(String::new()),
            skill: Some(" ".into()),
        }
        .normalized();
        assert_eq!(filter, RoleFilter::default());
    }

    #[test]
    fn test_nested_json_shape() {
        let json = serde_json::json!({
            "title": "MERN Support Intern",
            "skills": { "mustHave": ["javascript"], "niceToHave": ["mongodb"] },
            "environment": { "mobility": "low" },
            "roadmap": [{ "title": "Frontend refresh", "description": "React basics" }]
        });
        let new: NewRoleTemplate = serde_json::from_value(json).unwrap();
        assert!(new.validate().is_ok());
        assert_eq!(new.skills.must_have, vec!["javascript"]);
        assert_eq!(new.environment.mobility.as_deref(), Some("low"));
        assert_eq!(new.roadmap[0].duration_weeks, 1);
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let new = NewRoleTemplate {
            title: "   ".into(),
            ..Default::default()
        };
        assert!(matches!(new.validate(), Err(AppError::Validation(_))));
    }
}
