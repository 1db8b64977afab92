//! Device controller adapters

pub mod simulated;
