//! Occupancy agent

use super::{try_remote, AgentError, DecisionAgent, RemoteBacking};
use crate::ports::decision_source::DecisionSource;
use crate::rate_limit::RateLimiter;
use async_trait::async_trait;
use atrium_domain::{rules, AgentCategory, AgentDecision, ContextSnapshot};
use std::sync::Arc;

const INSTRUCTIONS: &str = "You are the occupancy agent for a smart building. \
Scale building systems with actual occupancy, prepare spaces for use, and \
optimize for both occupied and vacant periods.";

/// Agent focused on occupancy patterns and space utilization
pub struct OccupancyAgent {
    agent_id: String,
    backing: Option<RemoteBacking>,
}

impl OccupancyAgent {
    pub fn new() -> Self {
        Self {
            agent_id: "occupancy_agent".to_string(),
            backing: None,
        }
    }

    pub fn with_source(
        mut self,
        source: Arc<dyn DecisionSource>,
        limiter: Option<Arc<RateLimiter>>,
    ) -> Self {
        self.backing = Some(RemoteBacking { source, limiter });
        self
    }
}

impl Default for OccupancyAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionAgent for OccupancyAgent {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn category(&self) -> AgentCategory {
        AgentCategory::Occupancy
    }

    async fn propose(&self, snapshot: &ContextSnapshot) -> Result<AgentDecision, AgentError> {
        if let Some(decision) = try_remote(
            self.backing.as_ref(),
            &self.agent_id,
            self.category(),
            INSTRUCTIONS,
            snapshot,
        )
        .await
        {
            return Ok(decision);
        }
        Ok(rules::occupancy(&self.agent_id, snapshot))
    }
}
