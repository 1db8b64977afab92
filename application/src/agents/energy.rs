//! Energy efficiency agent

use super::{try_remote, AgentError, DecisionAgent, RemoteBacking};
use crate::ports::decision_source::DecisionSource;
use crate::rate_limit::RateLimiter;
use async_trait::async_trait;
use atrium_domain::{rules, AgentCategory, AgentDecision, ContextSnapshot};
use std::sync::Arc;

const INSTRUCTIONS: &str = "You are the energy agent for a smart building. \
Minimize energy consumption without compromising critical operations: shed \
non-essential load in unoccupied areas and optimize HVAC and lighting for \
actual occupancy.";

/// Agent focused on energy efficiency and conservation
pub struct EnergyAgent {
    agent_id: String,
    backing: Option<RemoteBacking>,
}

impl EnergyAgent {
    pub fn new() -> Self {
        Self {
            agent_id: "energy_agent".to_string(),
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

impl Default for EnergyAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionAgent for EnergyAgent {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn category(&self) -> AgentCategory {
        AgentCategory::EnergyEfficiency
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
        Ok(rules::energy(&self.agent_id, snapshot))
    }
}
