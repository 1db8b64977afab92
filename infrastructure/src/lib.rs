//! Infrastructure layer for atrium
//!
//! Adapters for the application ports: the simulated device controller,
//! decision-payload parsing (with an optional HTTP-backed remote source),
//! file configuration, the JSONL audit logger, and scenario loading.

pub mod audit;
pub mod config;
pub mod devices;
pub mod llm;
pub mod scenario;

// Re-export commonly used types
pub use audit::jsonl::JsonlAuditLogger;
pub use config::{file_config::FileConfig, loader::ConfigLoader};
pub use devices::simulated::SimulatedDeviceController;
pub use llm::payload::parse_decision_payload;
#[cfg(feature = "remote-llm")]
pub use llm::http::HttpDecisionSource;
pub use scenario::{Scenario, ScenarioError};
