//! Execution plan entities
//!
//! An [`ExecutionPlan`] wraps one chosen decision plan for the execution
//! phase and tracks per-action results. State machine:
//!
//! ```text
//! PENDING ──▶ IN_PROGRESS ──▶ COMPLETED | FAILED
//!    └──────────────────────▶ CANCELLED (manual)
//! ```
//!
//! A plan is COMPLETED unless *every* action failed; partial failure is
//! still a completion.

use crate::core::error::DomainError;
use crate::plan::decision_plan::DecisionPlan;
use crate::util::timestamp_ms;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Execution gating mode for a submitted plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExecutionMode {
    /// Execute immediately, no human in the loop
    Auto,
    /// Requires explicit approval
    Manual,
    /// Requires approval after review
    Review,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Auto => "AUTO",
            ExecutionMode::Manual => "MANUAL",
            ExecutionMode::Review => "REVIEW",
        }
    }

    /// Every mode except AUTO gates execution behind approval
    pub fn requires_approval(&self) -> bool {
        !matches!(self, ExecutionMode::Auto)
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUTO" => Ok(ExecutionMode::Auto),
            "MANUAL" => Ok(ExecutionMode::Manual),
            "REVIEW" => Ok(ExecutionMode::Review),
            other => Err(DomainError::UnknownExecutionMode(other.to_string())),
        }
    }
}

/// Status of a plan or of a single action within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::InProgress => "in_progress",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Completed | ExecutionStatus::Failed | ExecutionStatus::Cancelled
        )
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of executing one device action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub action: crate::agent::decision::DeviceAction,
    pub status: ExecutionStatus,
    pub started_at_ms: Option<u64>,
    pub ended_at_ms: Option<u64>,
    /// Failure detail, set only when status is FAILED
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Opaque payload from the device controller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}

impl ActionResult {
    pub fn new(action: crate::agent::decision::DeviceAction) -> Self {
        Self {
            action,
            status: ExecutionStatus::Pending,
            started_at_ms: None,
            ended_at_ms: None,
            error: None,
            response: None,
        }
    }

    pub fn mark_started(&mut self) {
        self.status = ExecutionStatus::InProgress;
        self.started_at_ms = Some(timestamp_ms());
    }

    pub fn mark_completed(&mut self, response: serde_json::Value) {
        self.status = ExecutionStatus::Completed;
        self.response = Some(response);
        self.ended_at_ms = Some(timestamp_ms());
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = ExecutionStatus::Failed;
        self.error = Some(error.into());
        self.ended_at_ms = Some(timestamp_ms());
    }

    pub fn mark_cancelled(&mut self) {
        self.status = ExecutionStatus::Cancelled;
        self.ended_at_ms = Some(timestamp_ms());
    }

    /// Wall-clock duration, available once the action has both timestamps
    pub fn duration_ms(&self) -> Option<u64> {
        match (self.started_at_ms, self.ended_at_ms) {
            (Some(start), Some(end)) => Some(end.saturating_sub(start)),
            _ => None,
        }
    }
}

/// Approval state of a gated plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Approval {
    pub required: bool,
    pub granted: bool,
    pub approved_by: Option<String>,
    pub approved_at_ms: Option<u64>,
}

/// One decision plan submitted for execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub plan_id: String,
    pub plan: DecisionPlan,
    pub mode: ExecutionMode,
    pub status: ExecutionStatus,
    pub approval: Approval,
    /// Who submitted the plan, for the audit trail
    pub executor: Option<String>,
    pub action_results: Vec<ActionResult>,
    pub started_at_ms: Option<u64>,
    pub ended_at_ms: Option<u64>,
}

impl ExecutionPlan {
    pub fn new(plan: DecisionPlan, mode: ExecutionMode) -> Self {
        let action_results = plan
            .actions
            .iter()
            .cloned()
            .map(ActionResult::new)
            .collect();

        Self {
            plan_id: plan.plan_id.clone(),
            plan,
            mode,
            status: ExecutionStatus::Pending,
            approval: Approval {
                required: mode.requires_approval(),
                ..Approval::default()
            },
            executor: None,
            action_results,
            started_at_ms: None,
            ended_at_ms: None,
        }
    }

    /// Still gated: approval required and not yet granted
    pub fn awaiting_approval(&self) -> bool {
        self.approval.required && !self.approval.granted
    }

    pub fn grant_approval(&mut self, approved_by: impl Into<String>) {
        self.approval.granted = true;
        self.approval.approved_by = Some(approved_by.into());
        self.approval.approved_at_ms = Some(timestamp_ms());
    }

    pub fn completed_actions(&self) -> usize {
        self.action_results
            .iter()
            .filter(|r| r.status == ExecutionStatus::Completed)
            .count()
    }

    pub fn failed_actions(&self) -> usize {
        self.action_results
            .iter()
            .filter(|r| r.status == ExecutionStatus::Failed)
            .count()
    }

    /// Share of actions that reached a terminal state, as a percentage
    pub fn progress_percentage(&self) -> f64 {
        if self.action_results.is_empty() {
            return 0.0;
        }
        let finished = self
            .action_results
            .iter()
            .filter(|r| r.status.is_terminal())
            .count();
        finished as f64 / self.action_results.len() as f64 * 100.0
    }

    pub fn duration_ms(&self) -> Option<u64> {
        match (self.started_at_ms, self.ended_at_ms) {
            (Some(start), Some(end)) => Some(end.saturating_sub(start)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::category::AgentCategory;
    use crate::agent::decision::{ActionVerb, AgentDecision, DeviceAction};
    use crate::resolution::resolver::Resolution;
    use crate::resolution::strategy::ResolutionStrategy;

    fn plan_with_actions(count: usize) -> DecisionPlan {
        let actions = (0..count)
            .map(|i| DeviceAction::new(format!("dev-{i}"), ActionVerb::TurnOn))
            .collect();
        DecisionPlan::new(
            "safety_first_120000",
            vec![AgentDecision::new("a", AgentCategory::Security, 0.9)],
            Resolution {
                strategy: ResolutionStrategy::SafetyFirst,
                actions,
                conflicts: Vec::new(),
            },
        )
    }

    #[test]
    fn test_auto_mode_needs_no_approval() {
        let plan = ExecutionPlan::new(plan_with_actions(1), ExecutionMode::Auto);
        assert!(!plan.approval.required);
        assert!(!plan.awaiting_approval());
    }

    #[test]
    fn test_gated_modes_start_awaiting_approval() {
        for mode in [ExecutionMode::Manual, ExecutionMode::Review] {
            let mut plan = ExecutionPlan::new(plan_with_actions(1), mode);
            assert!(plan.awaiting_approval(), "{mode}");

            plan.grant_approval("ops@example.com");
            assert!(!plan.awaiting_approval());
            assert_eq!(plan.approval.approved_by.as_deref(), Some("ops@example.com"));
        }
    }

    #[test]
    fn test_progress_tracks_terminal_actions() {
        let mut plan = ExecutionPlan::new(plan_with_actions(4), ExecutionMode::Auto);
        assert_eq!(plan.progress_percentage(), 0.0);

        plan.action_results[0].mark_completed(serde_json::json!({}));
        plan.action_results[1].mark_failed("no route to device");
        assert_eq!(plan.progress_percentage(), 50.0);
        assert_eq!(plan.completed_actions(), 1);
        assert_eq!(plan.failed_actions(), 1);
    }

    #[test]
    fn test_empty_plan_progress_is_zero() {
        let plan = ExecutionPlan::new(plan_with_actions(0), ExecutionMode::Auto);
        assert_eq!(plan.progress_percentage(), 0.0);
    }

    #[test]
    fn test_status_terminality() {
        assert!(!ExecutionStatus::Pending.is_terminal());
        assert!(!ExecutionStatus::InProgress.is_terminal());
        assert!(ExecutionStatus::Completed.is_terminal());
        assert!(ExecutionStatus::Failed.is_terminal());
        assert!(ExecutionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("AUTO".parse::<ExecutionMode>().unwrap(), ExecutionMode::Auto);
        assert!("YOLO".parse::<ExecutionMode>().is_err());
        assert!(ExecutionMode::Review.requires_approval());
        assert!(!ExecutionMode::Auto.requires_approval());
    }
}
