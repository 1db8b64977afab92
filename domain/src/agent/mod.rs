//! Agent domain: categories, profiles, decisions, and rule-based fallbacks

pub mod category;
pub mod decision;
pub mod profile;
pub mod rules;
