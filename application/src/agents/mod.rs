//! Decision agents
//!
//! One agent per domain category, all interchangeable through the
//! [`DecisionAgent`] capability contract. Every agent can be backed by an
//! injected remote [`DecisionSource`]; when the source is absent or
//! degraded it falls back to the deterministic rule logic in
//! [`atrium_domain::rules`], so a round always gets a well-formed decision
//! from every healthy agent.

pub mod comfort;
pub mod emergency;
pub mod energy;
pub mod environmental;
pub mod occupancy;
pub mod security;

pub use comfort::ComfortAgent;
pub use emergency::EmergencyAgent;
pub use energy::EnergyAgent;
pub use environmental::EnvironmentalAgent;
pub use occupancy::OccupancyAgent;
pub use security::SecurityAgent;

use crate::ports::decision_source::{DecisionSource, RawDecision, SourceError};
use crate::rate_limit::RateLimiter;
use async_trait::async_trait;
use atrium_domain::{AgentCategory, AgentDecision, AgentProfile, ContextSnapshot};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Errors an agent may surface to the coordinator.
///
/// The built-in agents recover internally (remote failures fall back to
/// rules), but the contract admits failure so purely remote custom agents
/// can be excluded from a round without aborting it.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Decision source error: {0}")]
    Source(#[from] SourceError),

    #[error("Agent failure: {0}")]
    Failed(String),
}

/// Capability contract every agent variant implements
#[async_trait]
pub trait DecisionAgent: Send + Sync {
    fn agent_id(&self) -> &str;

    fn category(&self) -> AgentCategory;

    /// Fixed priority weight used for conflict resolution
    fn priority_weight(&self) -> f64 {
        AgentProfile::for_category(self.category()).priority_weight
    }

    /// Produce this agent's decision for one context snapshot.
    ///
    /// Must tolerate missing context fields: absent sensors or devices
    /// mean "no applicable action", not an error.
    async fn propose(&self, snapshot: &ContextSnapshot) -> Result<AgentDecision, AgentError>;
}

/// Remote backing shared by the built-in variants: a decision source plus
/// an optional admission gate in front of it
pub(crate) struct RemoteBacking {
    pub source: Arc<dyn DecisionSource>,
    pub limiter: Option<Arc<RateLimiter>>,
}

/// Ask the remote source for a decision, if one is configured and healthy.
///
/// Returns `None` on any failure so the caller can fall back to rules.
pub(crate) async fn try_remote(
    backing: Option<&RemoteBacking>,
    agent_id: &str,
    category: AgentCategory,
    instructions: &str,
    snapshot: &ContextSnapshot,
) -> Option<AgentDecision> {
    let backing = backing?;
    if !backing.source.is_available() {
        return None;
    }

    if let Some(limiter) = &backing.limiter {
        limiter.acquire().await;
    }

    match backing.source.generate(instructions, snapshot).await {
        Ok(raw) => Some(decision_from_raw(agent_id, category, raw)),
        Err(e) => {
            warn!("{agent_id}: remote decision failed ({e}), using rule fallback");
            None
        }
    }
}

/// Shape a sanitized remote payload into a domain decision, clamping any
/// out-of-range confidence or score values
pub(crate) fn decision_from_raw(
    agent_id: &str,
    category: AgentCategory,
    raw: RawDecision,
) -> AgentDecision {
    let profile = AgentProfile::for_category(category);
    AgentDecision::new(agent_id, category, profile.priority_weight)
        .with_actions(raw.actions)
        .with_reasoning(raw.reasoning)
        .with_scores(raw.scores.clamped())
        .with_confidence(raw.confidence.clamp(0.0, 1.0))
}

/// The full built-in agent roster, rule-based only
pub fn default_agents() -> Vec<Arc<dyn DecisionAgent>> {
    vec![
        Arc::new(SecurityAgent::new()),
        Arc::new(ComfortAgent::new()),
        Arc::new(EnergyAgent::new()),
        Arc::new(EmergencyAgent::new()),
        Arc::new(EnvironmentalAgent::new()),
        Arc::new(OccupancyAgent::new()),
    ]
}
