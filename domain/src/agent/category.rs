//! Agent categories
//!
//! Each agent belongs to exactly one domain category. The category drives
//! the safety ordering used by the safety-first resolution strategy.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Domain concern an agent is responsible for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentCategory {
    Security,
    Comfort,
    EnergyEfficiency,
    EmergencyResponse,
    Environmental,
    Occupancy,
}

impl AgentCategory {
    /// All categories, in registration order
    pub const ALL: [AgentCategory; 6] = [
        AgentCategory::Security,
        AgentCategory::Comfort,
        AgentCategory::EnergyEfficiency,
        AgentCategory::EmergencyResponse,
        AgentCategory::Environmental,
        AgentCategory::Occupancy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentCategory::Security => "security",
            AgentCategory::Comfort => "comfort",
            AgentCategory::EnergyEfficiency => "energy_efficiency",
            AgentCategory::EmergencyResponse => "emergency_response",
            AgentCategory::Environmental => "environmental",
            AgentCategory::Occupancy => "occupancy",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentCategory::Security => "Security Guardian",
            AgentCategory::Comfort => "Comfort Optimizer",
            AgentCategory::EnergyEfficiency => "Energy Saver",
            AgentCategory::EmergencyResponse => "Emergency Handler",
            AgentCategory::Environmental => "Environment Controller",
            AgentCategory::Occupancy => "Occupancy Coordinator",
        }
    }

    /// Total ordering used by the safety-first strategy: lower sorts first.
    ///
    /// Emergency > security > environmental > comfort > occupancy > energy.
    pub fn safety_rank(&self) -> usize {
        match self {
            AgentCategory::EmergencyResponse => 0,
            AgentCategory::Security => 1,
            AgentCategory::Environmental => 2,
            AgentCategory::Comfort => 3,
            AgentCategory::Occupancy => 4,
            AgentCategory::EnergyEfficiency => 5,
        }
    }
}

impl std::fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgentCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "security" => Ok(AgentCategory::Security),
            "comfort" => Ok(AgentCategory::Comfort),
            "energy_efficiency" => Ok(AgentCategory::EnergyEfficiency),
            "emergency_response" => Ok(AgentCategory::EmergencyResponse),
            "environmental" => Ok(AgentCategory::Environmental),
            "occupancy" => Ok(AgentCategory::Occupancy),
            other => Err(DomainError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_rank_ordering() {
        assert!(
            AgentCategory::EmergencyResponse.safety_rank()
                < AgentCategory::Security.safety_rank()
        );
        assert!(
            AgentCategory::Comfort.safety_rank() < AgentCategory::EnergyEfficiency.safety_rank()
        );
    }

    #[test]
    fn test_round_trip_parse() {
        for category in AgentCategory::ALL {
            assert_eq!(category.as_str().parse::<AgentCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!("janitorial".parse::<AgentCategory>().is_err());
    }
}
