//! Room context: immutable snapshots and world-state projection

pub mod simulate;
pub mod snapshot;
