//! Decision plans and plan scoring

pub mod decision_plan;
pub mod scorer;
