//! Resolution strategies
//!
//! Modeled as a closed enum so strategy dispatch is checked exhaustively at
//! compile time rather than through string-keyed lookup.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How conflicting per-device proposals are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// The action from the agent with the highest fixed priority weight wins
    PriorityWeighted,
    /// An action survives only with votes from at least two distinct agents
    MajorityVote,
    /// Devices are assigned in safety-category order, first claim wins
    SafetyFirst,
    /// Non-energy actions pass through; energy actions fill unclaimed devices
    EnergyBalance,
}

impl ResolutionStrategy {
    /// All strategies, in the order plans are typically compared
    pub const ALL: [ResolutionStrategy; 4] = [
        ResolutionStrategy::PriorityWeighted,
        ResolutionStrategy::MajorityVote,
        ResolutionStrategy::SafetyFirst,
        ResolutionStrategy::EnergyBalance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStrategy::PriorityWeighted => "priority_weighted",
            ResolutionStrategy::MajorityVote => "majority_vote",
            ResolutionStrategy::SafetyFirst => "safety_first",
            ResolutionStrategy::EnergyBalance => "energy_balance",
        }
    }
}

impl std::fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResolutionStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "priority_weighted" => Ok(ResolutionStrategy::PriorityWeighted),
            "majority_vote" => Ok(ResolutionStrategy::MajorityVote),
            "safety_first" => Ok(ResolutionStrategy::SafetyFirst),
            "energy_balance" => Ok(ResolutionStrategy::EnergyBalance),
            other => Err(DomainError::UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_parse() {
        for strategy in ResolutionStrategy::ALL {
            assert_eq!(
                strategy.as_str().parse::<ResolutionStrategy>().unwrap(),
                strategy
            );
        }
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let err = "coin_flip".parse::<ResolutionStrategy>().unwrap_err();
        assert!(err.to_string().contains("coin_flip"));
    }
}
