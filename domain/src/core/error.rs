//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown resolution strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown execution mode: {0}")]
    UnknownExecutionMode(String),

    #[error("Unknown agent category: {0}")]
    UnknownCategory(String),
}
