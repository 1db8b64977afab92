//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod audit_logger;
pub mod decision_source;
pub mod device_controller;
