//! Device controller port
//!
//! The execution engine drives device actions through this interface:
//! action in, success payload or failure out. The simulated adapter lives
//! in the infrastructure crate; a real implementation would speak MQTT,
//! CoAP, or similar behind the same contract.

use async_trait::async_trait;
use atrium_domain::DeviceAction;
use thiserror::Error;

/// Errors surfaced by a device controller
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Device communication failure: {0}")]
    Communication(String),

    #[error("Unknown device: {0}")]
    UnknownDevice(String),
}

/// Executes individual device actions
#[async_trait]
pub trait DeviceController: Send + Sync {
    /// Execute one action and return the device's response payload.
    ///
    /// A transient failure is an `Err`; it marks that action FAILED without
    /// aborting sibling actions.
    async fn execute(&self, action: &DeviceAction) -> Result<serde_json::Value, DeviceError>;
}
