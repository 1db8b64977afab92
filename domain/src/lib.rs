//! Domain layer for atrium
//!
//! This crate contains the core business logic, entities, and value objects
//! for multi-agent smart-building coordination. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Coordination round
//!
//! One round takes an immutable [`ContextSnapshot`] of a room, collects a
//! decision from every agent category, resolves per-device conflicts under
//! one or more [`ResolutionStrategy`] variants, and scores each candidate
//! [`DecisionPlan`] against the active service-level objectives.
//!
//! ## Simulation before execution
//!
//! Plans are scored against a *projected* snapshot: a pure transform applies
//! the plan's actions and a simple environmental response to a copy of the
//! world state, and the SLO engine re-evaluates the outcome. The live
//! snapshot is never mutated.

pub mod agent;
pub mod context;
pub mod core;
pub mod execution;
pub mod plan;
pub mod resolution;
pub mod slo;
pub mod util;

// Re-export commonly used types
pub use agent::{
    category::AgentCategory,
    decision::{ActionVerb, AgentDecision, DeviceAction, ScoreVector},
    profile::AgentProfile,
    rules,
};
pub use context::{
    simulate::project_plan_outcome,
    snapshot::{ContextSnapshot, DeviceState, DeviceType, PowerState, RoomInfo, SensorReadings},
};
pub use core::error::DomainError;
pub use execution::entities::{
    ActionResult, Approval, ExecutionMode, ExecutionPlan, ExecutionStatus,
};
pub use plan::{
    decision_plan::{DecisionPlan, ExecutionRecommendation, PlanMetadata},
    scorer::score_plan,
};
pub use resolution::{
    resolver::{resolve, ConflictReport, Resolution},
    strategy::ResolutionStrategy,
};
pub use slo::{
    evaluation::{evaluate, CategoryScores, Priority, Severity, SloEvaluation, SloResult, Violation},
    objective::{Slo, SloCategory, SloMetric},
};
