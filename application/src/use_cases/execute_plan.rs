//! Plan execution engine
//!
//! State machine per submitted plan: approval-gated plans wait in an
//! active-executions registry; executing plans fan their actions out to the
//! device controller under a bounded-concurrency semaphore, track every
//! action's outcome, and land in a history list once terminal.
//!
//! Cancellation marks the plan CANCELLED immediately and trips a
//! cancellation token so queued actions never start; actions already in
//! flight run to completion but can no longer change the plan's terminal
//! state.
//!
//! The history list is unbounded, which is acceptable for this simulation
//! core; a real deployment would cap it.

use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAudit};
use crate::ports::device_controller::DeviceController;
use atrium_domain::{
    util::timestamp_ms, ActionResult, DecisionPlan, ExecutionMode, ExecutionPlan, ExecutionStatus,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const DEFAULT_MAX_PARALLEL_ACTIONS: usize = 5;
/// Rolling window for the recent success rate
const SUCCESS_RATE_WINDOW: usize = 10;

/// Summary of engine activity
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExecutionSummary {
    pub active_executions: usize,
    pub pending_approval: usize,
    /// Completed fraction of the last [`SUCCESS_RATE_WINDOW`] executions
    pub recent_success_rate: f64,
    pub average_execution_time_ms: f64,
}

struct ActiveExecution {
    plan: ExecutionPlan,
    cancel: CancellationToken,
}

#[derive(Default)]
struct EngineState {
    active: HashMap<String, ActiveExecution>,
    history: Vec<ExecutionPlan>,
}

/// Executes decision plans against the device controller
pub struct ExecutionEngine {
    controller: Arc<dyn DeviceController>,
    audit: Arc<dyn AuditLogger>,
    max_parallel_actions: usize,
    state: Arc<Mutex<EngineState>>,
}

impl ExecutionEngine {
    pub fn new(controller: Arc<dyn DeviceController>) -> Self {
        Self {
            controller,
            audit: Arc::new(NoAudit),
            max_parallel_actions: DEFAULT_MAX_PARALLEL_ACTIONS,
            state: Arc::new(Mutex::new(EngineState::default())),
        }
    }

    /// Cap on simultaneously in-flight device actions (default 5); excess
    /// actions queue behind a semaphore rather than being dropped
    pub fn with_max_parallel_actions(mut self, max: usize) -> Self {
        self.max_parallel_actions = max.max(1);
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit a plan for execution.
    ///
    /// AUTO-mode plans execute immediately and the returned plan is
    /// terminal. Any other mode registers the plan PENDING in the active
    /// registry and returns it awaiting approval.
    pub async fn submit(
        &self,
        plan: DecisionPlan,
        mode: ExecutionMode,
        executor: Option<&str>,
    ) -> ExecutionPlan {
        let mut execution = ExecutionPlan::new(plan, mode);
        execution.executor = executor.map(str::to_string);
        execution.started_at_ms = Some(timestamp_ms());
        let plan_id = execution.plan_id.clone();

        let awaiting = execution.awaiting_approval();
        let snapshot = execution.clone();
        self.state().active.insert(
            plan_id.clone(),
            ActiveExecution {
                plan: execution,
                cancel: CancellationToken::new(),
            },
        );

        if awaiting {
            info!("Plan {plan_id} registered, awaiting approval");
            return snapshot;
        }

        self.run(&plan_id).await.unwrap_or(snapshot)
    }

    /// Approve a pending plan and execute it.
    ///
    /// Returns `None` when the plan id is unknown or the plan is not
    /// waiting for approval (already executing, terminal, or cancelled).
    pub async fn approve_and_execute(
        &self,
        plan_id: &str,
        approved_by: &str,
    ) -> Option<ExecutionPlan> {
        {
            let mut state = self.state();
            let entry = state.active.get_mut(plan_id)?;
            if !entry.plan.awaiting_approval() {
                return None;
            }
            entry.plan.grant_approval(approved_by);
        }

        info!("Plan {plan_id} approved by {approved_by}");
        self.run(plan_id).await
    }

    /// Cancel a plan still in the active registry.
    ///
    /// Returns false for unknown ids (never started, or already terminal
    /// and moved to history). In-flight actions are not interrupted, but
    /// queued actions will not start and the plan's CANCELLED state is
    /// final.
    pub fn cancel(&self, plan_id: &str) -> bool {
        let mut state = self.state();
        let Some(mut entry) = state.active.remove(plan_id) else {
            return false;
        };

        entry.cancel.cancel();
        entry.plan.status = ExecutionStatus::Cancelled;
        entry.plan.ended_at_ms = Some(timestamp_ms());

        info!("Plan {plan_id} cancelled");
        self.audit.log(AuditEvent::execution_finished(&entry.plan));
        state.history.push(entry.plan);
        true
    }

    /// Current view of a plan, active or historical
    pub fn get_status(&self, plan_id: &str) -> Option<ExecutionPlan> {
        let state = self.state();
        if let Some(entry) = state.active.get(plan_id) {
            return Some(entry.plan.clone());
        }
        state
            .history
            .iter()
            .find(|p| p.plan_id == plan_id)
            .cloned()
    }

    /// All registered plans still waiting for approval
    pub fn get_pending_approvals(&self) -> Vec<ExecutionPlan> {
        self.state()
            .active
            .values()
            .filter(|e| e.plan.awaiting_approval())
            .map(|e| e.plan.clone())
            .collect()
    }

    /// Engine-wide activity summary
    pub fn get_execution_summary(&self) -> ExecutionSummary {
        let state = self.state();

        let pending_approval = state
            .active
            .values()
            .filter(|e| e.plan.awaiting_approval())
            .count();

        let recent: Vec<_> = state
            .history
            .iter()
            .rev()
            .take(SUCCESS_RATE_WINDOW)
            .collect();
        let recent_success_rate = if recent.is_empty() {
            0.0
        } else {
            let successful = recent
                .iter()
                .filter(|p| p.status == ExecutionStatus::Completed)
                .count();
            successful as f64 / recent.len() as f64
        };

        let completed_durations: Vec<u64> = state
            .history
            .iter()
            .filter(|p| p.status == ExecutionStatus::Completed)
            .filter_map(|p| p.duration_ms())
            .collect();
        let average_execution_time_ms = if completed_durations.is_empty() {
            0.0
        } else {
            completed_durations.iter().sum::<u64>() as f64 / completed_durations.len() as f64
        };

        ExecutionSummary {
            active_executions: state.active.len(),
            pending_approval,
            recent_success_rate,
            average_execution_time_ms,
        }
    }

    /// Execute all actions of a registered plan and finalize it.
    async fn run(&self, plan_id: &str) -> Option<ExecutionPlan> {
        let (actions, cancel) = {
            let mut state = self.state();
            let entry = state.active.get_mut(plan_id)?;
            entry.plan.status = ExecutionStatus::InProgress;
            (entry.plan.plan.actions.clone(), entry.cancel.clone())
        };

        let semaphore = Arc::new(Semaphore::new(self.max_parallel_actions));
        let mut join_set = JoinSet::new();

        for (index, action) in actions.into_iter().enumerate() {
            let controller = Arc::clone(&self.controller);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();
            let state = Arc::clone(&self.state);
            let plan_id = plan_id.to_string();

            join_set.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };

                if cancel.is_cancelled() {
                    with_action(&state, &plan_id, index, ActionResult::mark_cancelled);
                    return;
                }

                with_action(&state, &plan_id, index, ActionResult::mark_started);
                debug!("Executing action {index} of plan {plan_id}");

                match controller.execute(&action).await {
                    Ok(response) => {
                        with_action(&state, &plan_id, index, |r| r.mark_completed(response));
                    }
                    Err(e) => {
                        with_action(&state, &plan_id, index, |r| r.mark_failed(e.to_string()));
                    }
                }
            });
        }

        // Successes and failures are both awaited; no early abort
        while let Some(joined) = join_set.join_next().await {
            if let Err(e) = joined {
                warn!("Action task join error: {e}");
            }
        }

        let finished = {
            let mut state = self.state();
            match state.active.remove(plan_id) {
                Some(mut entry) => {
                    let total = entry.plan.action_results.len();
                    let failed = entry.plan.failed_actions();

                    // Partial failure still counts as completion; only a
                    // fully failed plan is FAILED
                    entry.plan.status = if total > 0 && failed == total {
                        ExecutionStatus::Failed
                    } else {
                        ExecutionStatus::Completed
                    };
                    entry.plan.ended_at_ms = Some(timestamp_ms());

                    let snapshot = entry.plan.clone();
                    state.history.push(entry.plan);
                    snapshot
                }
                // Cancelled mid-run: the cancelled state in history is final
                None => state
                    .history
                    .iter()
                    .find(|p| p.plan_id == plan_id)
                    .cloned()?,
            }
        };

        info!(
            "Plan {plan_id} finished: {} ({}/{} actions completed)",
            finished.status,
            finished.completed_actions(),
            finished.action_results.len()
        );
        self.audit.log(AuditEvent::execution_finished(&finished));

        Some(finished)
    }
}

/// Apply `f` to one action result of a still-active plan. Updates for plans
/// already moved to history are dropped by design.
fn with_action(
    state: &Arc<Mutex<EngineState>>,
    plan_id: &str,
    index: usize,
    f: impl FnOnce(&mut ActionResult),
) {
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(entry) = state.active.get_mut(plan_id)
        && let Some(result) = entry.plan.action_results.get_mut(index)
    {
        f(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::device_controller::DeviceError;
    use async_trait::async_trait;
    use atrium_domain::{
        resolve, ActionVerb, AgentCategory, AgentDecision, DeviceAction, ResolutionStrategy,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Controller that fails for device ids listed in `failing`
    struct FakeController {
        failing: Vec<String>,
        calls: AtomicUsize,
    }

    impl FakeController {
        fn reliable() -> Self {
            Self {
                failing: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing_for(ids: &[&str]) -> Self {
            Self {
                failing: ids.iter().map(|s| s.to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DeviceController for FakeController {
        async fn execute(
            &self,
            action: &DeviceAction,
        ) -> Result<serde_json::Value, DeviceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(&action.device_id) {
                return Err(DeviceError::Communication(format!(
                    "no route to {}",
                    action.device_id
                )));
            }
            Ok(serde_json::json!({ "device_id": action.device_id, "status": "success" }))
        }
    }

    fn plan_with_actions(device_ids: &[&str]) -> DecisionPlan {
        let decisions = vec![AgentDecision::new(
            "security_agent",
            AgentCategory::Security,
            0.9,
        )
        .with_actions(
            device_ids
                .iter()
                .map(|id| DeviceAction::new(*id, ActionVerb::TurnOn))
                .collect(),
        )];
        let resolution = resolve(&decisions, ResolutionStrategy::PriorityWeighted);
        DecisionPlan::new("priority_weighted_101010", decisions, resolution)
    }

    #[tokio::test]
    async fn test_auto_plan_completes_all_actions() {
        let engine = ExecutionEngine::new(Arc::new(FakeController::reliable()));

        let finished = engine
            .submit(
                plan_with_actions(&["a", "b", "c"]),
                ExecutionMode::Auto,
                None,
            )
            .await;

        assert_eq!(finished.status, ExecutionStatus::Completed);
        assert_eq!(finished.completed_actions(), 3);
        assert_eq!(finished.progress_percentage(), 100.0);
        // Terminal plans live in history, not the active registry
        assert_eq!(engine.get_execution_summary().active_executions, 0);
        assert!(engine.get_status(&finished.plan_id).is_some());
    }

    #[tokio::test]
    async fn test_partial_failure_still_completes() {
        let engine = ExecutionEngine::new(Arc::new(FakeController::failing_for(&["b"])));

        let finished = engine
            .submit(
                plan_with_actions(&["a", "b", "c"]),
                ExecutionMode::Auto,
                None,
            )
            .await;

        assert_eq!(finished.status, ExecutionStatus::Completed);
        assert_eq!(finished.completed_actions(), 2);
        assert_eq!(finished.failed_actions(), 1);
        let failed = finished
            .action_results
            .iter()
            .find(|r| r.status == ExecutionStatus::Failed)
            .unwrap();
        assert!(failed.error.as_deref().unwrap().contains("no route"));
    }

    #[tokio::test]
    async fn test_all_actions_failing_fails_the_plan() {
        let engine = ExecutionEngine::new(Arc::new(FakeController::failing_for(&["a", "b"])));

        let finished = engine
            .submit(plan_with_actions(&["a", "b"]), ExecutionMode::Auto, None)
            .await;

        assert_eq!(finished.status, ExecutionStatus::Failed);
        assert_eq!(finished.failed_actions(), 2);
    }

    #[tokio::test]
    async fn test_empty_plan_completes_trivially() {
        let engine = ExecutionEngine::new(Arc::new(FakeController::reliable()));
        let finished = engine
            .submit(plan_with_actions(&[]), ExecutionMode::Auto, None)
            .await;
        assert_eq!(finished.status, ExecutionStatus::Completed);
    }

    #[tokio::test]
    async fn test_manual_plan_waits_for_approval() {
        let controller = Arc::new(FakeController::reliable());
        let engine = ExecutionEngine::new(Arc::clone(&controller) as Arc<dyn DeviceController>);

        let pending = engine
            .submit(
                plan_with_actions(&["a"]),
                ExecutionMode::Manual,
                Some("operator"),
            )
            .await;

        assert_eq!(pending.status, ExecutionStatus::Pending);
        assert!(pending.awaiting_approval());
        // Nothing ran yet
        assert_eq!(controller.calls.load(Ordering::SeqCst), 0);
        assert_eq!(engine.get_pending_approvals().len(), 1);

        let finished = engine
            .approve_and_execute(&pending.plan_id, "ops@example.com")
            .await
            .unwrap();

        assert_eq!(finished.status, ExecutionStatus::Completed);
        assert!(finished.approval.granted);
        assert_eq!(
            finished.approval.approved_by.as_deref(),
            Some("ops@example.com")
        );
        assert_eq!(controller.calls.load(Ordering::SeqCst), 1);
        assert!(engine.get_pending_approvals().is_empty());
    }

    #[tokio::test]
    async fn test_approving_unknown_plan_returns_none() {
        let engine = ExecutionEngine::new(Arc::new(FakeController::reliable()));
        assert!(engine.approve_and_execute("nope", "ops").await.is_none());
    }

    #[tokio::test]
    async fn test_cancel_pending_plan() {
        let engine = ExecutionEngine::new(Arc::new(FakeController::reliable()));

        let pending = engine
            .submit(plan_with_actions(&["a"]), ExecutionMode::Review, None)
            .await;

        assert!(engine.cancel(&pending.plan_id));

        let status = engine.get_status(&pending.plan_id).unwrap();
        assert_eq!(status.status, ExecutionStatus::Cancelled);
        assert!(status.ended_at_ms.is_some());
        assert_eq!(engine.get_execution_summary().active_executions, 0);

        // Second cancel: the plan is no longer active
        assert!(!engine.cancel(&pending.plan_id));
        // And it can no longer be approved
        assert!(engine
            .approve_and_execute(&pending.plan_id, "ops")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_cancel_unknown_plan_returns_false() {
        let engine = ExecutionEngine::new(Arc::new(FakeController::reliable()));
        assert!(!engine.cancel("ghost"));
    }

    #[tokio::test]
    async fn test_success_rate_over_recent_history() {
        let engine = ExecutionEngine::new(Arc::new(FakeController::failing_for(&["bad"])));

        for _ in 0..2 {
            engine
                .submit(plan_with_actions(&["ok"]), ExecutionMode::Auto, None)
                .await;
        }
        // Every action fails -> plan FAILED
        let mut failed = plan_with_actions(&["bad"]);
        failed.plan_id = "all_bad_101010".to_string();
        engine.submit(failed, ExecutionMode::Auto, None).await;

        let summary = engine.get_execution_summary();
        assert!((summary.recent_success_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.pending_approval, 0);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        use tokio::sync::Mutex as AsyncMutex;

        struct CountingController {
            in_flight: AsyncMutex<usize>,
            peak: AtomicUsize,
        }

        #[async_trait]
        impl DeviceController for CountingController {
            async fn execute(
                &self,
                _action: &DeviceAction,
            ) -> Result<serde_json::Value, DeviceError> {
                {
                    let mut in_flight = self.in_flight.lock().await;
                    *in_flight += 1;
                    self.peak.fetch_max(*in_flight, Ordering::SeqCst);
                }
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                {
                    let mut in_flight = self.in_flight.lock().await;
                    *in_flight -= 1;
                }
                Ok(serde_json::json!({}))
            }
        }

        let controller = Arc::new(CountingController {
            in_flight: AsyncMutex::new(0),
            peak: AtomicUsize::new(0),
        });
        let engine = ExecutionEngine::new(Arc::clone(&controller) as Arc<dyn DeviceController>)
            .with_max_parallel_actions(2);

        let ids: Vec<String> = (0..8).map(|i| format!("dev-{i}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let finished = engine
            .submit(plan_with_actions(&id_refs), ExecutionMode::Auto, None)
            .await;

        assert_eq!(finished.status, ExecutionStatus::Completed);
        assert!(controller.peak.load(Ordering::SeqCst) <= 2);
    }
}
