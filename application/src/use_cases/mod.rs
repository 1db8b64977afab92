//! Use cases orchestrating the domain logic

pub mod coordinate;
pub mod execute_plan;
