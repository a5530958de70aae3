//! Normalization of agent replies into the persistence shape.
//!
//! The agent and the store evolved separately, so a roadmap reply may name
//! the same data in several ways. Every rule for reconciling them lives here.
//!
//! Duration precedence, per step:
//! 1. `durationWeeks` (canonical) when present,
//! 2. else `duration_weeks` (alternate),
//! 3. else `DEFAULT_DURATION_WEEKS`.
//!
//! A resolved value below 1 is raised to 1.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::agent_client::{AgentError, AgentRoadmapDraft, RoleCandidate, RoleFit};
use crate::models::non_blank;
use crate::models::roadmap::{positive_weeks, RoadmapStep, DEFAULT_DURATION_WEEKS};

// ────────────────────────────────────────────────────────────────────────────
// Raw reply shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RawStep {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "durationWeeks")]
    pub duration_weeks_canonical: Option<f64>,
    #[serde(default, rename = "duration_weeks")]
    pub duration_weeks_alternate: Option<f64>,
    #[serde(default)]
    pub resources: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct RawRoadmapReply {
    /// The agent's own name for the step list.
    #[serde(default)]
    pub roadmap: Option<Vec<RawStep>>,
    #[serde(default)]
    pub steps: Option<Vec<RawStep>>,
    #[serde(default, alias = "selectedRoleId")]
    pub selected_role_id: Option<String>,
    /// Older agent builds report the selection here instead.
    #[serde(default, alias = "roleId")]
    pub role_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct RawRoleFitReply {
    #[serde(alias = "roleCandidates")]
    pub role_candidates: Vec<RoleCandidate>,
    #[serde(default, alias = "selectedRoleId")]
    pub selected_role_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Step normalization
// ────────────────────────────────────────────────────────────────────────────

/// Which field a step's duration was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationSource {
    Canonical,
    Alternate,
    Default,
}

/// Applies the duration precedence policy. Returns whole weeks, at least 1.
pub fn resolve_duration_weeks(
    canonical: Option<f64>,
    alternate: Option<f64>,
) -> (u32, DurationSource) {
    let (raw, source) = match (canonical, alternate) {
        (Some(weeks), _) => (weeks, DurationSource::Canonical),
        (None, Some(weeks)) => (weeks, DurationSource::Alternate),
        (None, None) => (DEFAULT_DURATION_WEEKS as f64, DurationSource::Default),
    };

    (positive_weeks(Some(raw)), source)
}

pub fn normalize_step(raw: RawStep) -> RoadmapStep {
    let (duration_weeks, source) =
        resolve_duration_weeks(raw.duration_weeks_canonical, raw.duration_weeks_alternate);
    if source == DurationSource::Default {
        debug!("Step '{}' has no duration; defaulting to {duration_weeks}", raw.title);
    }

    RoadmapStep {
        title: raw.title,
        description: raw.description,
        duration_weeks,
        resources: raw.resources.unwrap_or_default(),
    }
}

/// Turns a raw roadmap reply into a draft. Fails when no steps remain.
pub fn normalize_roadmap_reply(raw: RawRoadmapReply) -> Result<AgentRoadmapDraft, AgentError> {
    log_agent_errors("roadmap", raw.errors.as_deref());

    let steps: Vec<RoadmapStep> = raw
        .roadmap
        .or(raw.steps)
        .unwrap_or_default()
        .into_iter()
        .map(normalize_step)
        .collect();

    if steps.is_empty() {
        return Err(AgentError::EmptyRoadmap);
    }

    Ok(AgentRoadmapDraft {
        steps,
        selected_role_id: non_blank(raw.selected_role_id).or_else(|| non_blank(raw.role_id)),
        summary: raw.summary,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Body parsing
// ────────────────────────────────────────────────────────────────────────────

/// Not JSON at all is an upstream fault; JSON of the wrong shape is a
/// validation fault.
fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, AgentError> {
    let value: Value = serde_json::from_str(body).map_err(AgentError::Unparsable)?;
    serde_json::from_value(value).map_err(AgentError::Shape)
}

pub fn parse_roadmap_reply(body: &str) -> Result<AgentRoadmapDraft, AgentError> {
    normalize_roadmap_reply(parse_body::<RawRoadmapReply>(body)?)
}

pub fn parse_role_fit_reply(body: &str) -> Result<RoleFit, AgentError> {
    let raw: RawRoleFitReply = parse_body(body)?;
    log_agent_errors("role-fit", raw.errors.as_deref());

    Ok(RoleFit {
        summary: raw.summary.unwrap_or_default(),
        role_candidates: raw.role_candidates,
        selected_role_id: non_blank(raw.selected_role_id),
    })
}

fn log_agent_errors(endpoint: &str, errors: Option<&[String]>) {
    for err in errors.unwrap_or_default() {
        warn!("Agent {endpoint} reported: {err}");
    }
}
