//! Conflict resolver
//!
//! Groups all proposed device actions by target device across the round's
//! agent decisions and resolves multi-proposer devices per strategy.
//!
//! Determinism: devices are grouped preserving first-submission order, and
//! ties fall to the earlier submission, so resolution is a pure function of
//! the ordered decision list.

use super::strategy::ResolutionStrategy;
use crate::agent::category::AgentCategory;
use crate::agent::decision::{AgentDecision, DeviceAction};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Minimum distinct backers for an action to survive majority voting.
///
/// A fixed constant, not a fraction of the agent count: with six agents two
/// votes already pass. Kept literal for compatibility with the established
/// behavior.
const MAJORITY_VOTE_THRESHOLD: usize = 2;

/// Record of one resolved multi-proposer conflict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictReport {
    pub device_id: String,
    pub contenders: Vec<AgentCategory>,
    pub winner: AgentCategory,
    pub strategy: ResolutionStrategy,
}

/// Outcome of running one strategy over a decision set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    pub strategy: ResolutionStrategy,
    pub actions: Vec<DeviceAction>,
    pub conflicts: Vec<ConflictReport>,
}

/// Resolve per-device conflicts across `decisions` under `strategy`.
///
/// A device proposed by exactly one agent passes through unchanged under
/// every strategy.
pub fn resolve(decisions: &[AgentDecision], strategy: ResolutionStrategy) -> Resolution {
    match strategy {
        ResolutionStrategy::PriorityWeighted => resolve_priority_weighted(decisions),
        ResolutionStrategy::MajorityVote => resolve_majority_vote(decisions),
        ResolutionStrategy::SafetyFirst => resolve_safety_first(decisions),
        ResolutionStrategy::EnergyBalance => resolve_energy_balance(decisions),
    }
}

struct Claim<'a> {
    action: &'a DeviceAction,
    category: AgentCategory,
    priority: f64,
}

/// Group actions by device, preserving first-seen device order
fn claims_by_device<'a>(decisions: &'a [AgentDecision]) -> Vec<(&'a str, Vec<Claim<'a>>)> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<Claim<'a>>> = HashMap::new();

    for decision in decisions {
        for action in &decision.actions {
            let device_id = action.device_id.as_str();
            let entry = grouped.entry(device_id).or_default();
            if entry.is_empty() {
                order.push(device_id);
            }
            entry.push(Claim {
                action,
                category: decision.category,
                priority: decision.priority_weight,
            });
        }
    }

    order
        .into_iter()
        .map(|device_id| {
            let claims = grouped.remove(device_id).unwrap_or_default();
            (device_id, claims)
        })
        .collect()
}

fn resolve_priority_weighted(decisions: &[AgentDecision]) -> Resolution {
    let mut actions = Vec::new();
    let mut conflicts = Vec::new();

    for (device_id, claims) in claims_by_device(decisions) {
        if claims.len() == 1 {
            actions.push(claims[0].action.clone());
            continue;
        }

        // Strictly-greater comparison keeps the earliest submission on ties
        let mut winner = &claims[0];
        for claim in &claims[1..] {
            if claim.priority > winner.priority {
                winner = claim;
            }
        }

        actions.push(winner.action.clone());
        conflicts.push(ConflictReport {
            device_id: device_id.to_string(),
            contenders: claims.iter().map(|c| c.category).collect(),
            winner: winner.category,
            strategy: ResolutionStrategy::PriorityWeighted,
        });
    }

    Resolution {
        strategy: ResolutionStrategy::PriorityWeighted,
        actions,
        conflicts,
    }
}

fn resolve_majority_vote(decisions: &[AgentDecision]) -> Resolution {
    struct Ballot<'a> {
        action: &'a DeviceAction,
        voters: HashSet<&'a str>,
    }

    let mut order: Vec<(String, String)> = Vec::new();
    let mut ballots: HashMap<(String, String), Ballot<'_>> = HashMap::new();

    for decision in decisions {
        for action in &decision.actions {
            let key = (action.device_id.clone(), action.verb.as_str().to_string());
            match ballots.get_mut(&key) {
                Some(ballot) => {
                    ballot.voters.insert(decision.agent_id.as_str());
                }
                None => {
                    order.push(key.clone());
                    let mut voters = HashSet::new();
                    voters.insert(decision.agent_id.as_str());
                    ballots.insert(key, Ballot { action, voters });
                }
            }
        }
    }

    let actions = order
        .iter()
        .filter_map(|key| {
            let ballot = ballots.get(key)?;
            (ballot.voters.len() >= MAJORITY_VOTE_THRESHOLD).then(|| ballot.action.clone())
        })
        .collect();

    Resolution {
        strategy: ResolutionStrategy::MajorityVote,
        actions,
        conflicts: Vec::new(),
    }
}

fn resolve_safety_first(decisions: &[AgentDecision]) -> Resolution {
    // Stable sort: equal-rank decisions stay in submission order
    let mut ordered: Vec<&AgentDecision> = decisions.iter().collect();
    ordered.sort_by_key(|d| d.category.safety_rank());

    let mut assigned: HashSet<&str> = HashSet::new();
    let mut actions = Vec::new();

    for decision in ordered {
        for action in &decision.actions {
            if assigned.insert(action.device_id.as_str()) {
                actions.push(action.clone());
            }
            // Later claims on an assigned device are discarded entirely;
            // this strategy produces no conflict report.
        }
    }

    Resolution {
        strategy: ResolutionStrategy::SafetyFirst,
        actions,
        conflicts: Vec::new(),
    }
}

fn resolve_energy_balance(decisions: &[AgentDecision]) -> Resolution {
    let mut actions: Vec<DeviceAction> = Vec::new();
    let mut energy_actions: Vec<&DeviceAction> = Vec::new();

    for decision in decisions {
        if decision.category == AgentCategory::EnergyEfficiency {
            energy_actions.extend(decision.actions.iter());
        } else {
            actions.extend(decision.actions.iter().cloned());
        }
    }

    let claimed: HashSet<String> = actions.iter().map(|a| a.device_id.clone()).collect();
    for action in energy_actions {
        if !claimed.contains(action.device_id.as_str()) {
            actions.push(action.clone());
        }
    }

    Resolution {
        strategy: ResolutionStrategy::EnergyBalance,
        actions,
        conflicts: Vec::new(),
    }
}
