//! Emergency response agent

use super::{try_remote, AgentError, DecisionAgent, RemoteBacking};
use crate::ports::decision_source::DecisionSource;
use crate::rate_limit::RateLimiter;
use async_trait::async_trait;
use atrium_domain::{rules, AgentCategory, AgentDecision, ContextSnapshot};
use std::sync::Arc;

const INSTRUCTIONS: &str = "You are the emergency agent for a smart building. \
Safety takes absolute priority: respond immediately to hazardous conditions, \
keep emergency lighting and exits available, and override other concerns in a \
crisis.";

/// Agent focused on emergency response and safety
pub struct EmergencyAgent {
    agent_id: String,
    backing: Option<RemoteBacking>,
}

impl EmergencyAgent {
    pub fn new() -> Self {
        Self {
            agent_id: "emergency_agent".to_string(),
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

impl Default for EmergencyAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionAgent for EmergencyAgent {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn category(&self) -> AgentCategory {
        AgentCategory::EmergencyResponse
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
        Ok(rules::emergency(&self.agent_id, snapshot))
    }
}
