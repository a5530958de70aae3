/// Agent Client: the single point of entry for calls to the recommendation agent.
///
/// ARCHITECTURAL RULE: No other module may call the agent service directly.
/// Workflows depend on the `AgentGateway` trait; `AgentClient` is the HTTP
/// implementation wired in at startup.
///
/// Timeout and retry policy: every attempt is bounded by the configured
/// timeout. Transport failures, 429 and 5xx are retried with exponential
/// backoff up to `max_retries` extra attempts. Both endpoints are pure reads
/// on the agent side, so repeating them has no side effects.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::profile::SeekerProfile;
use crate::models::roadmap::RoadmapStep;

pub mod normalize;

const ROLE_FIT_PATH: &str = "/agents/role-fit";
const ROADMAP_PATH: &str = "/agents/roadmap";
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Agent returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Agent reply is not valid JSON: {0}")]
    Unparsable(serde_json::Error),

    #[error("Agent reply has an unexpected shape: {0}")]
    Shape(serde_json::Error),

    #[error("empty roadmap")]
    EmptyRoadmap,
}

impl From<AgentError> for AppError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Http(_) | AgentError::Api { .. } | AgentError::Unparsable(_) => {
                AppError::Upstream(err.to_string())
            }
            AgentError::Shape(_) | AgentError::EmptyRoadmap => AppError::Validation(err.to_string()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Normalized reply types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCandidate {
    #[serde(alias = "role_id")]
    pub role_id: String,
    pub title: String,
    /// 0.0 – 1.0
    #[serde(alias = "match_score")]
    pub match_score: f64,
    pub rationale: String,
}

/// Role-fit result, passed through from the agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleFit {
    pub summary: String,
    pub role_candidates: Vec<RoleCandidate>,
    pub selected_role_id: Option<String>,
}

/// A roadmap draft after normalization. `steps` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRoadmapDraft {
    pub steps: Vec<RoadmapStep>,
    pub selected_role_id: Option<String>,
    pub summary: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Gateway trait
// ────────────────────────────────────────────────────────────────────────────

/// Carried in `AppState` as `Arc<dyn AgentGateway>`.
#[async_trait]
pub trait AgentGateway: Send + Sync {
    /// Upstream on transport/status failure, Validation on a reply that does
    /// not fit the role-fit shape.
    async fn recommend_role_fit(&self, profile: &SeekerProfile) -> Result<RoleFit, AppError>;

    /// Fails with `Validation("empty roadmap")` when no steps survive
    /// normalization.
    async fn draft_roadmap(
        &self,
        profile: &SeekerProfile,
        role_id_hint: Option<&str>,
    ) -> Result<AgentRoadmapDraft, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Request wire format (agent's snake_case schema)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AgentConstraints<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct AgentSeekerProfile<'a> {
    skills: &'a [String],
    interests: &'a [String],
    personality: &'a [String],
    experience_years: u32,
    constraints: AgentConstraints<'a>,
}

impl<'a> From<&'a SeekerProfile> for AgentSeekerProfile<'a> {
    fn from(profile: &'a SeekerProfile) -> Self {
        AgentSeekerProfile {
            skills: &profile.skills,
            interests: &profile.interests,
            personality: &profile.personality,
            // The agent only accepts whole, non-negative years.
            experience_years: profile
                .experience_years
                .filter(|y| y.is_finite() && *y > 0.0)
                .map(|y| y.floor().min(u32::MAX as f64) as u32)
                .unwrap_or(0),
            constraints: AgentConstraints {
                location: profile.location.as_deref(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct RoleFitRequest<'a> {
    seeker_profile: AgentSeekerProfile<'a>,
}

#[derive(Debug, Serialize)]
struct RoadmapRequest<'a> {
    seeker_profile: AgentSeekerProfile<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role_id: Option<&'a str>,
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AgentClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl AgentClient {
    pub fn new(base_url: &str, timeout: Duration, max_retries: u32) -> Result<Self, AgentError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        })
    }

    #[cfg(test)]
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs `body` and returns the raw reply text of the first successful
    /// attempt.
    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<String, AgentError> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error: Option<AgentError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.retry_backoff * (1 << (attempt - 1));
                warn!(
                    "Agent call to {path} attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(AgentError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                warn!("Agent {path} returned {status}: {message}");
                last_error = Some(AgentError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(AgentError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let text = response.text().await?;
            debug!("Agent call to {path} succeeded ({} bytes)", text.len());
            return Ok(text);
        }

        Err(last_error.unwrap_or(AgentError::Api {
            status: 503,
            message: format!("no attempt reached {url}"),
        }))
    }
}

#[async_trait]
impl AgentGateway for AgentClient {
    async fn recommend_role_fit(&self, profile: &SeekerProfile) -> Result<RoleFit, AppError> {
        let request = RoleFitRequest {
            seeker_profile: profile.into(),
        };
        let body = self.post_json(ROLE_FIT_PATH, &request).await?;
        Ok(normalize::parse_role_fit_reply(&body)?)
    }

    async fn draft_roadmap(
        &self,
        profile: &SeekerProfile,
        role_id_hint: Option<&str>,
    ) -> Result<AgentRoadmapDraft, AppError> {
        let request = RoadmapRequest {
            seeker_profile: profile.into(),
            role_id: role_id_hint,
        };
        let body = self.post_json(ROADMAP_PATH, &request).await?;
        Ok(normalize::parse_roadmap_reply(&body)?)
    }
}
