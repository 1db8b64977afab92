//! Service-level objectives and their evaluation

pub mod evaluation;
pub mod objective;
