//! Agent decision value objects
//!
//! An [`AgentDecision`] is the output of one agent for one context snapshot:
//! a list of proposed [`DeviceAction`]s plus reasoning, a per-category
//! [`ScoreVector`], and a confidence value. Decisions are ephemeral: they
//! are created per round, consumed by the conflict resolver, and then only
//! retained inside the decision plans built from them.

use super::category::AgentCategory;
use crate::util::timestamp_ms;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Action verb understood by the device layer.
///
/// The set is open: verbs the simulation does not recognize are carried as
/// [`ActionVerb::Other`] and treated as no-ops when projecting world state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionVerb {
    TurnOn,
    TurnOff,
    Dim,
    SetTemperature,
    IncreaseVentilation,
    Other(String),
}

impl ActionVerb {
    pub fn as_str(&self) -> &str {
        match self {
            ActionVerb::TurnOn => "turn_on",
            ActionVerb::TurnOff => "turn_off",
            ActionVerb::Dim => "dim",
            ActionVerb::SetTemperature => "set_temperature",
            ActionVerb::IncreaseVentilation => "increase_ventilation",
            ActionVerb::Other(verb) => verb,
        }
    }
}

impl std::fmt::Display for ActionVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionVerb {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "turn_on" => ActionVerb::TurnOn,
            "turn_off" => ActionVerb::TurnOff,
            "dim" => ActionVerb::Dim,
            "set_temperature" => ActionVerb::SetTemperature,
            "increase_ventilation" => ActionVerb::IncreaseVentilation,
            other => ActionVerb::Other(other.to_string()),
        })
    }
}

impl Serialize for ActionVerb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionVerb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or(ActionVerb::Other(s)))
    }
}

/// A single proposed device action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceAction {
    /// Target device identifier
    pub device_id: String,
    /// What to do with the device
    #[serde(rename = "action")]
    pub verb: ActionVerb,
    /// Verb-specific parameters (e.g. `brightness`, `temperature`)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parameters: HashMap<String, serde_json::Value>,
    /// Optional per-action priority override in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    /// Optional human-readable justification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DeviceAction {
    pub fn new(device_id: impl Into<String>, verb: ActionVerb) -> Self {
        Self {
            device_id: device_id.into(),
            verb,
            parameters: HashMap::new(),
            priority: None,
            reason: None,
        }
    }

    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Numeric parameter lookup
    pub fn param_f64(&self, key: &str) -> Option<f64> {
        self.parameters.get(key).and_then(|v| v.as_f64())
    }

    /// String parameter lookup
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(|v| v.as_str())
    }
}

/// Per-category score vector attached to a decision, each value in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub comfort: f64,
    pub energy: f64,
    pub reliability: f64,
    pub security: f64,
}

impl ScoreVector {
    pub fn new(comfort: f64, energy: f64, reliability: f64, security: f64) -> Self {
        Self {
            comfort,
            energy,
            reliability,
            security,
        }
    }

    /// All four scores set to the same value
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Clamp every component into [0, 1]
    pub fn clamped(self) -> Self {
        Self {
            comfort: self.comfort.clamp(0.0, 1.0),
            energy: self.energy.clamp(0.0, 1.0),
            reliability: self.reliability.clamp(0.0, 1.0),
            security: self.security.clamp(0.0, 1.0),
        }
    }
}

impl Default for ScoreVector {
    fn default() -> Self {
        Self::uniform(0.5)
    }
}

/// One agent's proposal for a coordination round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDecision {
    /// Identifier of the proposing agent (e.g. "security_agent")
    pub agent_id: String,
    /// Category of the proposing agent
    pub category: AgentCategory,
    /// The agent's fixed priority weight in [0, 1]
    pub priority_weight: f64,
    /// Proposed device actions
    pub actions: Vec<DeviceAction>,
    /// Free-text explanation of the proposal
    pub reasoning: String,
    /// Per-category score vector
    pub scores: ScoreVector,
    /// Confidence in this proposal, in [0, 1]
    pub confidence: f64,
    /// Creation time, milliseconds since epoch
    pub timestamp_ms: u64,
}

impl AgentDecision {
    pub fn new(
        agent_id: impl Into<String>,
        category: AgentCategory,
        priority_weight: f64,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            category,
            priority_weight,
            actions: Vec::new(),
            reasoning: String::new(),
            scores: ScoreVector::default(),
            confidence: 0.5,
            timestamp_ms: timestamp_ms(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<DeviceAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    pub fn with_scores(mut self, scores: ScoreVector) -> Self {
        self.scores = scores;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Whether the agent proposed nothing for this round
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
