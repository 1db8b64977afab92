//! Audit logging port
//!
//! Decision and execution milestones are reported to an audit sink as
//! structured events. The JSONL file adapter lives in infrastructure;
//! [`NoAudit`] is the default no-op sink.

use atrium_domain::{AgentDecision, DecisionPlan, ExecutionPlan};

/// One audit record: an event type plus a JSON payload
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_type: String,
    pub payload: serde_json::Value,
}

impl AuditEvent {
    pub fn new(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }

    /// One agent's decision for a round, keyed by agent and room
    pub fn agent_decision(room_id: i64, decision: &AgentDecision) -> Self {
        Self::new(
            "agent_decision",
            serde_json::json!({
                "agent_id": decision.agent_id,
                "agent_type": decision.category,
                "room_id": room_id,
                "confidence": decision.confidence,
                "scores": decision.scores,
                "action_count": decision.actions.len(),
                "reasoning": decision.reasoning,
            }),
        )
    }

    /// A scored and ranked plan from a coordination round
    pub fn plan_ranked(room_id: i64, plan: &DecisionPlan) -> Self {
        Self::new(
            "plan_ranked",
            serde_json::json!({
                "room_id": room_id,
                "plan_id": plan.plan_id,
                "strategy": plan.metadata.resolution_strategy,
                "score": plan.score,
                "confidence": plan.confidence,
                "rank": plan.metadata.rank,
                "recommendation": plan.metadata.recommendation,
                "total_actions": plan.actions.len(),
            }),
        )
    }

    /// Terminal state of an execution plan
    pub fn execution_finished(execution: &ExecutionPlan) -> Self {
        Self::new(
            "execution_finished",
            serde_json::json!({
                "plan_id": execution.plan_id,
                "mode": execution.mode,
                "status": execution.status,
                "completed_actions": execution.completed_actions(),
                "failed_actions": execution.failed_actions(),
                "duration_ms": execution.duration_ms(),
                "approved_by": execution.approval.approved_by,
            }),
        )
    }
}

/// Sink for audit events
pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

/// Default sink that drops every event
pub struct NoAudit;

impl AuditLogger for NoAudit {
    fn log(&self, _event: AuditEvent) {}
}
