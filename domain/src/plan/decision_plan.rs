//! Decision plan entity
//!
//! One plan per {round × strategy}: the resolved action list plus the source
//! agent decisions, a composite score, and metadata the coordinator enriches
//! after scoring (recommendation, rank).

use crate::agent::decision::{AgentDecision, DeviceAction};
use crate::resolution::resolver::Resolution;
use crate::resolution::strategy::ResolutionStrategy;
use crate::slo::evaluation::SloEvaluation;
use crate::util::timestamp_ms;
use serde::{Deserialize, Serialize};

/// How a plan should be taken to execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExecutionRecommendation {
    /// Execute without a human in the loop
    Auto,
    /// Good plan, but a human should look first
    Review,
    /// Requires manual evaluation
    Manual,
}

impl ExecutionRecommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionRecommendation::Auto => "AUTO",
            ExecutionRecommendation::Review => "REVIEW",
            ExecutionRecommendation::Manual => "MANUAL",
        }
    }
}

impl std::fmt::Display for ExecutionRecommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Plan metadata, enriched by the coordinator after scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub resolution_strategy: ResolutionStrategy,
    pub conflicts_resolved: usize,
    pub total_actions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<ExecutionRecommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation_reason: Option<String>,
    /// 1-based rank among sibling plans of the same round
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_plans: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slo_violations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_violations: Option<usize>,
}

/// A candidate action plan produced by one resolution strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionPlan {
    /// Encodes the strategy and a round timestamp, e.g. `safety_first_142530`
    pub plan_id: String,
    /// The full set of agent decisions this plan was resolved from
    pub agent_decisions: Vec<AgentDecision>,
    /// Resolved, conflict-free action list
    pub actions: Vec<DeviceAction>,
    pub reasoning: String,
    /// Composite score in [0, 1], populated by the scorer
    pub score: f64,
    /// Mean agent confidence in [0, 1], populated by the scorer
    pub confidence: f64,
    /// SLO evaluation of the simulated post-action state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slo_compliance: Option<SloEvaluation>,
    pub metadata: PlanMetadata,
    pub created_at_ms: u64,
}

impl DecisionPlan {
    /// Build an unscored plan from a resolution outcome
    pub fn new(
        plan_id: impl Into<String>,
        agent_decisions: Vec<AgentDecision>,
        resolution: Resolution,
    ) -> Self {
        let reasoning = format!(
            "Plan resolved using {} strategy with {} actions",
            resolution.strategy,
            resolution.actions.len()
        );

        Self {
            plan_id: plan_id.into(),
            agent_decisions,
            metadata: PlanMetadata {
                resolution_strategy: resolution.strategy,
                conflicts_resolved: resolution.conflicts.len(),
                total_actions: resolution.actions.len(),
                recommendation: None,
                recommendation_reason: None,
                rank: None,
                total_plans: None,
                slo_violations: None,
                critical_violations: None,
            },
            actions: resolution.actions,
            reasoning,
            score: 0.0,
            confidence: 0.0,
            slo_compliance: None,
            created_at_ms: timestamp_ms(),
        }
    }

    /// The attached recommendation, defaulting to manual review when the
    /// coordinator has not annotated the plan yet
    pub fn recommendation(&self) -> ExecutionRecommendation {
        self.metadata
            .recommendation
            .unwrap_or(ExecutionRecommendation::Manual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::category::AgentCategory;
    use crate::agent::decision::ActionVerb;

    #[test]
    fn test_new_plan_captures_resolution() {
        let resolution = Resolution {
            strategy: ResolutionStrategy::SafetyFirst,
            actions: vec![DeviceAction::new("hvac-1", ActionVerb::TurnOn)],
            conflicts: Vec::new(),
        };
        let decisions = vec![AgentDecision::new(
            "emergency_agent",
            AgentCategory::EmergencyResponse,
            1.0,
        )];

        let plan = DecisionPlan::new("safety_first_120000", decisions, resolution);

        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.metadata.total_actions, 1);
        assert_eq!(plan.metadata.conflicts_resolved, 0);
        assert!(plan.reasoning.contains("safety_first"));
        assert_eq!(plan.recommendation(), ExecutionRecommendation::Manual);
    }
}
