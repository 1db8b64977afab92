//! Environmental agent

use super::{try_remote, AgentError, DecisionAgent, RemoteBacking};
use crate::ports::decision_source::DecisionSource;
use crate::rate_limit::RateLimiter;
use async_trait::async_trait;
use atrium_domain::{rules, AgentCategory, AgentDecision, ContextSnapshot};
use std::sync::Arc;

const INSTRUCTIONS: &str = "You are the environmental agent for a smart \
building. Maintain healthy air quality, keep humidity in the optimal band, \
and ensure adequate ventilation for occupants while staying mindful of \
energy use.";

/// Agent focused on environmental conditions and air quality
pub struct EnvironmentalAgent {
    agent_id: String,
    backing: Option<RemoteBacking>,
}

impl EnvironmentalAgent {
    pub fn new() -> Self {
        Self {
            agent_id: "environmental_agent".to_string(),
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

impl Default for EnvironmentalAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionAgent for EnvironmentalAgent {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn category(&self) -> AgentCategory {
        AgentCategory::Environmental
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
        Ok(rules::environmental(&self.agent_id, snapshot))
    }
}
