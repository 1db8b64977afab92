//! Decision source port
//!
//! Defines the interface to a remote decision producer (typically an LLM).
//! The core never depends on a concrete provider: agents receive an
//! injected `DecisionSource` and fall back to rule logic when it is absent
//! or degraded.

use async_trait::async_trait;
use atrium_domain::{ContextSnapshot, DeviceAction, ScoreVector};
use thiserror::Error;

/// Errors that can occur while obtaining a remote decision
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Decision source unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Timeout")]
    Timeout,
}

/// A sanitized decision payload from a remote source.
///
/// Adapters are responsible for filling missing fields with these defaults
/// rather than failing the round: no actions, a placeholder reasoning
/// string, confidence 0.5, and a uniform 0.5 score vector. Out-of-range
/// numbers are clamped into [0, 1] downstream.
#[derive(Debug, Clone)]
pub struct RawDecision {
    pub actions: Vec<DeviceAction>,
    pub reasoning: String,
    pub confidence: f64,
    pub scores: ScoreVector,
}

impl Default for RawDecision {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
            reasoning: "Unable to parse agent reasoning".to_string(),
            confidence: 0.5,
            scores: ScoreVector::uniform(0.5),
        }
    }
}

/// Gateway to a remote decision producer
#[async_trait]
pub trait DecisionSource: Send + Sync {
    /// Produce a decision for the given instructions and context.
    ///
    /// Implementations should sanitize provider output into a well-formed
    /// [`RawDecision`] and only error on transport-level failures.
    async fn generate(
        &self,
        instructions: &str,
        snapshot: &ContextSnapshot,
    ) -> Result<RawDecision, SourceError>;

    /// Cheap availability probe; agents skip the source entirely when this
    /// returns false
    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_decision_defaults() {
        let raw = RawDecision::default();
        assert!(raw.actions.is_empty());
        assert_eq!(raw.confidence, 0.5);
        assert_eq!(raw.scores, ScoreVector::uniform(0.5));
    }
}
