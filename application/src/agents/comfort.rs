//! Comfort agent

use super::{try_remote, AgentError, DecisionAgent, RemoteBacking};
use crate::ports::decision_source::DecisionSource;
use crate::rate_limit::RateLimiter;
use async_trait::async_trait;
use atrium_domain::{rules, AgentCategory, AgentDecision, ContextSnapshot};
use std::sync::Arc;

const INSTRUCTIONS: &str = "You are the comfort agent for a smart building. \
Keep temperature within the comfort range, ensure adequate lighting and air \
circulation for occupants, and respond to occupancy patterns without \
compromising safety.";

/// Agent focused on occupant comfort optimization
pub struct ComfortAgent {
    agent_id: String,
    backing: Option<RemoteBacking>,
}

impl ComfortAgent {
    pub fn new() -> Self {
        Self {
            agent_id: "comfort_agent".to_string(),
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

impl Default for ComfortAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionAgent for ComfortAgent {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn category(&self) -> AgentCategory {
        AgentCategory::Comfort
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
        Ok(rules::comfort(&self.agent_id, snapshot))
    }
}
