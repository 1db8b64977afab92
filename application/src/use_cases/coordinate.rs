//! Multi-agent coordination use case
//!
//! One coordination round: invoke every registered agent concurrently,
//! resolve conflicts under each requested strategy, score the resulting
//! plans against the active SLOs, and rank them with execution
//! recommendations attached.

use crate::agents::DecisionAgent;
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAudit};
use atrium_domain::{
    resolve, score_plan, AgentDecision, ContextSnapshot, DecisionPlan, ExecutionRecommendation,
    ResolutionStrategy, Slo,
};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

// Fixed recommendation thresholds
const AUTO_SCORE: f64 = 0.9;
const AUTO_CONFIDENCE: f64 = 0.85;
const REVIEW_SCORE: f64 = 0.7;
const REVIEW_CONFIDENCE: f64 = 0.7;

/// Key metrics of the best plan of a round
#[derive(Debug, Clone, serde::Serialize)]
pub struct BestPlanSummary {
    pub plan_id: String,
    pub score: f64,
    pub confidence: f64,
    pub recommendation: ExecutionRecommendation,
    pub total_actions: usize,
    pub slo_violations: usize,
}

/// Round summary for callers deciding what to do with the ranked plans
#[derive(Debug, Clone, serde::Serialize)]
pub struct CoordinationSummary {
    pub total_plans: usize,
    pub best_plan: Option<BestPlanSummary>,
    /// Whether the best plan cleared the AUTO thresholds
    pub auto_executable: bool,
    /// Whether any of the top three plans is flagged for review
    pub requires_review: bool,
}

/// Coordinates decisions from all registered agents
pub struct MultiAgentCoordinator {
    agents: Vec<Arc<dyn DecisionAgent>>,
    audit: Arc<dyn AuditLogger>,
}

impl MultiAgentCoordinator {
    /// Strategies a round compares by default
    pub const DEFAULT_STRATEGIES: [ResolutionStrategy; 3] = [
        ResolutionStrategy::PriorityWeighted,
        ResolutionStrategy::SafetyFirst,
        ResolutionStrategy::EnergyBalance,
    ];

    pub fn new(agents: Vec<Arc<dyn DecisionAgent>>) -> Self {
        Self {
            agents,
            audit: Arc::new(NoAudit),
        }
    }

    /// Coordinator over the built-in rule-based agent roster
    pub fn with_default_agents() -> Self {
        Self::new(crate::agents::default_agents())
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Run one coordination round.
    ///
    /// Returns one scored plan per requested strategy, ranked by score
    /// descending (ties keep strategy submission order). Individual agent
    /// failures are logged and excluded; a round with zero responding
    /// agents still yields plans: empty, zero-confidence, and flagged for
    /// manual review.
    pub async fn coordinate(
        &self,
        snapshot: &ContextSnapshot,
        slos: &[Slo],
        strategies: &[ResolutionStrategy],
    ) -> Vec<DecisionPlan> {
        info!(
            "Coordinating room {} with {} agents and {} strategies",
            snapshot.room.id,
            self.agents.len(),
            strategies.len()
        );

        let decisions = self.collect_decisions(snapshot).await;
        for decision in &decisions {
            self.audit
                .log(AuditEvent::agent_decision(snapshot.room.id, decision));
        }

        let stamp = chrono::Utc::now().format("%H%M%S");
        let mut plans: Vec<DecisionPlan> = strategies
            .iter()
            .map(|&strategy| {
                let resolution = resolve(&decisions, strategy);
                let mut plan = DecisionPlan::new(
                    format!("{strategy}_{stamp}"),
                    decisions.clone(),
                    resolution,
                );
                score_plan(&mut plan, snapshot, slos);
                debug!(
                    "Plan {} scored {:.3} (confidence {:.3})",
                    plan.plan_id, plan.score, plan.confidence
                );
                plan
            })
            .collect();

        // Stable sort: exact score ties preserve strategy submission order
        plans.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        annotate_recommendations(&mut plans);

        for plan in &plans {
            self.audit.log(AuditEvent::plan_ranked(snapshot.room.id, plan));
        }

        plans
    }

    /// Fan out to every agent concurrently, then restore registration order
    /// so downstream resolution is deterministic.
    async fn collect_decisions(&self, snapshot: &ContextSnapshot) -> Vec<AgentDecision> {
        let mut join_set = JoinSet::new();

        for (index, agent) in self.agents.iter().enumerate() {
            let agent = Arc::clone(agent);
            let snapshot = snapshot.clone();
            join_set.spawn(async move {
                let result = agent.propose(&snapshot).await;
                (index, agent.agent_id().to_string(), result)
            });
        }

        let mut indexed = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, agent_id, Ok(decision))) => {
                    debug!("Agent {agent_id} proposed {} actions", decision.actions.len());
                    indexed.push((index, decision));
                }
                Ok((_, agent_id, Err(e))) => {
                    warn!("Agent {agent_id} failed and is excluded from this round: {e}");
                }
                Err(e) => {
                    warn!("Agent task join error: {e}");
                }
            }
        }

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, decision)| decision).collect()
    }
}

/// Attach execution recommendations, rank, and violation counts to ranked plans
fn annotate_recommendations(plans: &mut [DecisionPlan]) {
    let total = plans.len();

    for (i, plan) in plans.iter_mut().enumerate() {
        let (recommendation, reason) = if plan.score >= AUTO_SCORE && plan.confidence >= AUTO_CONFIDENCE
        {
            (
                ExecutionRecommendation::Auto,
                "High confidence and SLO compliance",
            )
        } else if plan.score >= REVIEW_SCORE && plan.confidence >= REVIEW_CONFIDENCE {
            (
                ExecutionRecommendation::Review,
                "Good plan, recommended for manual review",
            )
        } else {
            (
                ExecutionRecommendation::Manual,
                "Requires manual evaluation",
            )
        };

        plan.metadata.recommendation = Some(recommendation);
        plan.metadata.recommendation_reason = Some(reason.to_string());
        plan.metadata.rank = Some(i + 1);
        plan.metadata.total_plans = Some(total);

        if let Some(compliance) = &plan.slo_compliance {
            plan.metadata.slo_violations = Some(compliance.violation_count());
            plan.metadata.critical_violations = Some(compliance.critical_violation_count());
        }
    }
}

/// Summarize a ranked plan list for the caller
pub fn summarize(plans: &[DecisionPlan]) -> CoordinationSummary {
    let best_plan = plans.first().map(|plan| BestPlanSummary {
        plan_id: plan.plan_id.clone(),
        score: plan.score,
        confidence: plan.confidence,
        recommendation: plan.recommendation(),
        total_actions: plan.actions.len(),
        slo_violations: plan.metadata.slo_violations.unwrap_or(0),
    });

    CoordinationSummary {
        total_plans: plans.len(),
        auto_executable: best_plan
            .as_ref()
            .is_some_and(|p| p.recommendation == ExecutionRecommendation::Auto),
        requires_review: plans
            .iter()
            .take(3)
            .any(|p| p.recommendation() == ExecutionRecommendation::Review),
        best_plan,
    }
}
