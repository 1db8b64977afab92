//! Security agent

use super::{try_remote, AgentError, DecisionAgent, RemoteBacking};
use crate::ports::decision_source::DecisionSource;
use crate::rate_limit::RateLimiter;
use async_trait::async_trait;
use atrium_domain::{rules, AgentCategory, AgentDecision, ContextSnapshot};
use std::sync::Arc;

const INSTRUCTIONS: &str = "You are the security agent for a smart building. \
Maintain adequate lighting for surveillance, keep security devices powered, \
and balance security needs with energy efficiency. Security requirements take \
precedence in emergencies.";

/// Agent focused on security and surveillance requirements
pub struct SecurityAgent {
    agent_id: String,
    backing: Option<RemoteBacking>,
}

impl SecurityAgent {
    pub fn new() -> Self {
        Self {
            agent_id: "security_agent".to_string(),
            backing: None,
        }
    }

    /// Back this agent with a remote decision source
    pub fn with_source(
        mut self,
        source: Arc<dyn DecisionSource>,
        limiter: Option<Arc<RateLimiter>>,
    ) -> Self {
        self.backing = Some(RemoteBacking { source, limiter });
        self
    }
}

impl Default for SecurityAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionAgent for SecurityAgent {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn category(&self) -> AgentCategory {
        AgentCategory::Security
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
        Ok(rules::security(&self.agent_id, snapshot))
    }
}
