//! Application layer for atrium
//!
//! This crate contains use cases, port definitions, and the agent capability
//! contract. It depends only on the domain layer; adapters for the ports
//! live in the infrastructure crate.

pub mod agents;
pub mod ports;
pub mod rate_limit;
pub mod use_cases;

// Re-export commonly used types
pub use agents::{
    default_agents, AgentError, ComfortAgent, DecisionAgent, EmergencyAgent, EnergyAgent,
    EnvironmentalAgent, OccupancyAgent, SecurityAgent,
};
pub use ports::{
    audit_logger::{AuditEvent, AuditLogger, NoAudit},
    decision_source::{DecisionSource, RawDecision, SourceError},
    device_controller::{DeviceController, DeviceError},
};
pub use rate_limit::RateLimiter;
pub use use_cases::coordinate::{
    summarize, BestPlanSummary, CoordinationSummary, MultiAgentCoordinator,
};
pub use use_cases::execute_plan::{ExecutionEngine, ExecutionSummary};
