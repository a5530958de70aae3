use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job seeker's self-reported attributes.
///
/// `id` is absent until the profile is first persisted. Clients may send it
/// as `_id` for compatibility with older payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SeekerProfile {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub contact: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub personality: Vec<String>,
    pub experience_years: Option<f64>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `PUT /profiles/:id`. Only supplied fields are changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub personality: Option<Vec<String>>,
    pub experience_years: Option<f64>,
}

impl ProfilePatch {
    /// Applies the supplied fields onto `profile` in place.
    pub fn apply_to(self, profile: &mut SeekerProfile) {
        if let Some(name) = self.name {
            profile.name = Some(name);
        }
        if let Some(contact) = self.contact {
            profile.contact = Some(contact);
        }
        if let Some(location) = self.location {
            profile.location = Some(location);
        }
        if let Some(skills) = self.skills {
            profile.skills = skills;
        }
        if let Some(interests) = self.interests {
            profile.interests = interests;
        }
        if let Some(personality) = self.personality {
            profile.personality = personality;
        }
        if let Some(years) = self.experience_years {
            profile.experience_years = Some(years);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_default_to_empty() {
        let profile: SeekerProfile = serde_json::from_str(r#"{"name": "Asha"}"#).unwrap();
        assert!(profile.id.is_none());
        assert!(profile.skills.is_empty());
        assert!(profile.interests.is_empty());
        assert!(profile.personality.is_empty());
    }

    #[test]
    fn test_accepts_legacy_underscore_id() {
        let id = Uuid::new_v4();
        let json = serde_json::json!({ "_id": id, "skills": ["inventory"] });
        let profile: SeekerProfile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.id, Some(id));
    }

    #[test]
    fn test_serializes_camel_case_and_ignores_client_timestamps() {
        let json = serde_json::json!({
            "experienceYears": 2.5,
            "createdAt": "2020-01-01T00:00:00Z"
        });
        let profile: SeekerProfile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.experience_years, Some(2.5));
        assert!(profile.created_at.is_none());

        let out = serde_json::to_value(&profile).unwrap();
        assert_eq!(out["experienceYears"], 2.5);
        assert!(out.get("id").is_none());
    }

    #[test]
    fn test_patch_only_touches_supplied_fields() {
        let mut profile = SeekerProfile {
            name: Some("Ravi".into()),
            skills: vec!["packing".into()],
            ..Default::default()
        };
        let patch: ProfilePatch =
            serde_json::from_value(serde_json::json!({ "location": "Kolkata" })).unwrap();
        patch.apply_to(&mut profile);

        assert_eq!(profile.name.as_deref(), Some("Ravi"));
        assert_eq!(profile.location.as_deref(), Some("Kolkata"));
        assert_eq!(profile.skills, vec!["packing"]);
    }
}
