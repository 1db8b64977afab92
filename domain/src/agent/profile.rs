//! Static per-category agent profiles
//!
//! Profiles carry the fixed priority weight and descriptive metadata for
//! each agent category. Weights are configuration-time constants in [0, 1];
//! the priority-weighted resolution strategy uses them to break per-device
//! conflicts.

use super::category::AgentCategory;

/// Configuration profile for one agent category
#[derive(Debug, Clone, Copy)]
pub struct AgentProfile {
    pub category: AgentCategory,
    pub name: &'static str,
    pub description: &'static str,
    pub priority_weight: f64,
    pub goals: &'static [&'static str],
}

const PROFILES: [AgentProfile; 6] = [
    AgentProfile {
        category: AgentCategory::Security,
        name: "Security Guardian",
        description: "Ensures physical security and surveillance requirements",
        priority_weight: 0.9,
        goals: &[
            "Maintain adequate lighting for surveillance",
            "Ensure security devices have power",
            "Respond to security alerts",
        ],
    },
    AgentProfile {
        category: AgentCategory::Comfort,
        name: "Comfort Optimizer",
        description: "Optimizes temperature, lighting, and air quality for occupants",
        priority_weight: 0.7,
        goals: &[
            "Maintain optimal temperature for occupants",
            "Ensure adequate lighting for activities",
            "Optimize air quality and circulation",
        ],
    },
    AgentProfile {
        category: AgentCategory::EnergyEfficiency,
        name: "Energy Saver",
        description: "Minimizes energy consumption while maintaining essential services",
        priority_weight: 0.6,
        goals: &[
            "Minimize overall energy consumption",
            "Reduce unnecessary power usage",
            "Balance efficiency with requirements",
        ],
    },
    AgentProfile {
        category: AgentCategory::EmergencyResponse,
        name: "Emergency Handler",
        description: "Handles emergency situations and safety protocols",
        priority_weight: 1.0,
        goals: &[
            "Ensure occupant safety",
            "Execute emergency protocols",
            "Maintain emergency systems",
        ],
    },
    AgentProfile {
        category: AgentCategory::Environmental,
        name: "Environment Controller",
        description: "Monitors and controls environmental conditions",
        priority_weight: 0.6,
        goals: &[
            "Maintain air quality standards",
            "Control temperature and humidity",
            "Respond to environmental changes",
        ],
    },
    AgentProfile {
        category: AgentCategory::Occupancy,
        name: "Occupancy Coordinator",
        description: "Optimizes room usage and occupancy-based services",
        priority_weight: 0.7,
        goals: &[
            "Scale systems based on actual occupancy",
            "Optimize for both occupied and vacant periods",
            "Coordinate occupancy-based services",
        ],
    },
];

impl AgentProfile {
    /// Look up the static profile for a category
    pub fn for_category(category: AgentCategory) -> &'static AgentProfile {
        match category {
            AgentCategory::Security => &PROFILES[0],
            AgentCategory::Comfort => &PROFILES[1],
            AgentCategory::EnergyEfficiency => &PROFILES[2],
            AgentCategory::EmergencyResponse => &PROFILES[3],
            AgentCategory::Environmental => &PROFILES[4],
            AgentCategory::Occupancy => &PROFILES[5],
        }
    }

    /// All profiles, in registration order
    pub fn all() -> &'static [AgentProfile] {
        &PROFILES
    }

    /// Profiles sorted by priority weight, highest first
    pub fn by_priority() -> Vec<&'static AgentProfile> {
        let mut sorted: Vec<_> = PROFILES.iter().collect();
        sorted.sort_by(|a, b| {
            b.priority_weight
                .partial_cmp(&a.priority_weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }
}
