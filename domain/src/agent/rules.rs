//! Deterministic rule-based decision logic, one function per agent category.
//!
//! These are the fallbacks agents use when no remote decision source is
//! configured or the source is degraded. Each function is a pure map from a
//! context snapshot to a well-formed [`AgentDecision`]: missing sensor or
//! device data means "nothing to do here", never an error, and the score and
//! confidence fields are always populated so downstream scoring never has to
//! special-case a degraded agent.

use super::category::AgentCategory;
use super::decision::{ActionVerb, AgentDecision, DeviceAction, ScoreVector};
use super::profile::AgentProfile;
use crate::context::snapshot::{ContextSnapshot, DeviceType};

fn base_decision(agent_id: &str, category: AgentCategory) -> AgentDecision {
    let profile = AgentProfile::for_category(category);
    AgentDecision::new(agent_id, category, profile.priority_weight)
}

fn join_reasoning(parts: Vec<String>, quiet_default: &str) -> String {
    if parts.is_empty() {
        quiet_default.to_string()
    } else {
        parts.join("; ")
    }
}

/// Security: keep surveillance lighting and security devices powered.
pub fn security(agent_id: &str, snapshot: &ContextSnapshot) -> AgentDecision {
    let mut actions = Vec::new();
    let mut reasoning = Vec::new();

    let lighting: Vec<_> = snapshot.devices_of_type(&DeviceType::Lighting).collect();
    let has_security_slo = snapshot
        .slos
        .iter()
        .any(|slo| slo.name.to_lowercase().contains("security"));

    // A security SLO demands at least one light on for surveillance
    if has_security_slo && !lighting.is_empty() && lighting.iter().all(|d| !d.is_on()) {
        actions.push(
            DeviceAction::new(&lighting[0].id, ActionVerb::TurnOn)
                .with_param("brightness", 0.3)
                .with_priority(0.9),
        );
        reasoning.push("Activating minimum lighting for security surveillance".to_string());
    }

    for device in snapshot.devices_of_type(&DeviceType::Security) {
        if !device.is_on() {
            actions.push(DeviceAction::new(&device.id, ActionVerb::TurnOn).with_priority(0.8));
            reasoning.push(format!("Activating {} for security coverage", device.name));
        }
    }

    base_decision(agent_id, AgentCategory::Security)
        .with_actions(actions)
        .with_reasoning(join_reasoning(reasoning, "Security conditions maintained"))
        .with_scores(ScoreVector::new(0.2, 0.1, 0.9, 1.0))
        .with_confidence(0.7)
}

/// Emergency response: react to hazardous CO2 and extreme temperature.
pub fn emergency(agent_id: &str, snapshot: &ContextSnapshot) -> AgentDecision {
    let mut actions = Vec::new();
    let mut reasoning = Vec::new();

    if snapshot.sensors.co2() > 1000.0 {
        for hvac in snapshot.devices_of_type(&DeviceType::Hvac) {
            actions.push(
                DeviceAction::new(&hvac.id, ActionVerb::Other("emergency_ventilation".to_string()))
                    .with_param("mode", "max_ventilation")
                    .with_priority(1.0),
            );
        }
        reasoning.push("Emergency ventilation activated - high CO2 levels detected".to_string());
    }

    if snapshot.sensors.temperature() > 35.0 {
        reasoning.push("Extreme temperature detected - emergency cooling required".to_string());
    }

    base_decision(agent_id, AgentCategory::EmergencyResponse)
        .with_actions(actions)
        .with_reasoning(join_reasoning(reasoning, "No emergency conditions detected"))
        .with_scores(ScoreVector::new(0.3, 0.2, 1.0, 0.9))
        .with_confidence(0.9)
}

/// Environmental: humidity band control and CO2-driven ventilation.
pub fn environmental(agent_id: &str, snapshot: &ContextSnapshot) -> AgentDecision {
    let mut actions = Vec::new();
    let mut reasoning = Vec::new();

    let humidity = snapshot.sensors.humidity();
    let hvac: Vec<_> = snapshot.devices_of_type(&DeviceType::Hvac).collect();

    if humidity > 70.0 {
        for device in &hvac {
            actions.push(
                DeviceAction::new(&device.id, ActionVerb::Other("dehumidify".to_string()))
                    .with_param("target_humidity", 60.0)
                    .with_priority(0.6),
            );
        }
        reasoning.push("High humidity detected - activating dehumidification".to_string());
    } else if humidity < 30.0 {
        for device in &hvac {
            actions.push(
                DeviceAction::new(&device.id, ActionVerb::Other("humidify".to_string()))
                    .with_param("target_humidity", 45.0)
                    .with_priority(0.6),
            );
        }
        reasoning.push("Low humidity detected - activating humidification".to_string());
    }

    if snapshot.sensors.co2() > 800.0 {
        for device in &hvac {
            actions.push(
                DeviceAction::new(&device.id, ActionVerb::IncreaseVentilation)
                    .with_param("ventilation_level", "high")
                    .with_priority(0.7),
            );
        }
        reasoning.push("Elevated CO2 levels - increasing ventilation".to_string());
    }

    base_decision(agent_id, AgentCategory::Environmental)
        .with_actions(actions)
        .with_reasoning(join_reasoning(reasoning, "Environmental conditions optimal"))
        .with_scores(ScoreVector::new(0.8, 0.5, 0.7, 0.3))
        .with_confidence(0.7)
}

/// Occupancy: scale lighting/ventilation with headcount, keep surveillance
/// lighting and security devices on.
pub fn occupancy(agent_id: &str, snapshot: &ContextSnapshot) -> AgentDecision {
    let mut actions = Vec::new();
    let mut reasoning = Vec::new();

    let occupancy = snapshot.sensors.occupancy();
    let lighting: Vec<_> = snapshot.devices_of_type(&DeviceType::Lighting).collect();

    if occupancy == 0 {
        for light in lighting.iter().filter(|d| d.is_on()) {
            actions.push(
                DeviceAction::new(&light.id, ActionVerb::Dim)
                    .with_param("brightness", 0.1)
                    .with_priority(0.6),
            );
        }
        reasoning.push("Dimming lights for unoccupied space".to_string());
    } else if occupancy > 5 {
        for hvac in snapshot.devices_of_type(&DeviceType::Hvac) {
            actions.push(
                DeviceAction::new(&hvac.id, ActionVerb::IncreaseVentilation)
                    .with_param("ventilation_level", "high")
                    .with_priority(0.7),
            );
        }
        reasoning.push("Increasing ventilation for high occupancy".to_string());
    }

    let lights_on = lighting.iter().filter(|d| d.is_on()).count();
    if lights_on == 0 && !lighting.is_empty() {
        actions.push(
            DeviceAction::new(&lighting[0].id, ActionVerb::TurnOn)
                .with_priority(0.9)
                .with_reason(
                    "Security requirement: At least one light must be on for surveillance",
                ),
        );
        reasoning.push("Activated minimum lighting for security compliance".to_string());
    } else {
        reasoning.push(format!(
            "Security OK: {lights_on} lights currently on for surveillance."
        ));
    }

    for device in snapshot.devices_of_type(&DeviceType::Security) {
        if !device.is_on() {
            actions.push(
                DeviceAction::new(&device.id, ActionVerb::TurnOn)
                    .with_priority(0.8)
                    .with_reason("Security device must remain operational"),
            );
        }
    }

    base_decision(agent_id, AgentCategory::Occupancy)
        .with_actions(actions)
        .with_reasoning(join_reasoning(
            reasoning,
            "Occupancy-based optimization complete",
        ))
        .with_scores(ScoreVector::new(0.7, 0.8, 0.6, 0.5))
        .with_confidence(0.7)
}

/// Comfort: hold temperature near target, circulate air when occupied.
pub fn comfort(agent_id: &str, snapshot: &ContextSnapshot) -> AgentDecision {
    let mut actions = Vec::new();

    let current = snapshot.sensors.temperature();
    // Meeting spaces run slightly cooler
    let is_meeting_room = snapshot.slos.iter().any(|slo| {
        let name = slo.name.to_lowercase();
        name.contains("meeting") || name.contains("conference")
    });
    let target = if is_meeting_room { 22.0 } else { 23.0 };
    let tolerance = 1.0;

    if (current - target).abs() > tolerance {
        let reason = if current < target {
            format!("Temperature {current}°C below comfort range. Heating required.")
        } else {
            format!("Temperature {current}°C above comfort range. Cooling required.")
        };
        for hvac in snapshot.devices_of_type(&DeviceType::Hvac) {
            actions.push(DeviceAction::new(&hvac.id, ActionVerb::TurnOn).with_reason(&reason));
        }
    }

    let occupancy = snapshot.sensors.occupancy();
    if occupancy > 0 {
        for airflow in snapshot.devices_of_type(&DeviceType::AirFlow) {
            if !airflow.is_on() {
                actions.push(
                    DeviceAction::new(&airflow.id, ActionVerb::TurnOn)
                        .with_reason("Air circulation required for occupied room"),
                );
            }
        }
    }

    base_decision(agent_id, AgentCategory::Comfort)
        .with_actions(actions)
        .with_reasoning(format!(
            "Comfort optimization: Target temp {target}°C, Current {current}°C, Occupancy {occupancy}"
        ))
        .with_scores(ScoreVector::new(1.0, 0.4, 0.7, 0.3))
        .with_confidence(0.5)
}

/// Energy: shed excess load in unoccupied rooms, keeping one light for
/// surveillance.
pub fn energy(agent_id: &str, snapshot: &ContextSnapshot) -> AgentDecision {
    let mut actions = Vec::new();

    let occupancy = snapshot.sensors.occupancy();
    if occupancy == 0 {
        let lights_on: Vec<_> = snapshot
            .devices_of_type(&DeviceType::Lighting)
            .filter(|d| d.is_on())
            .collect();

        // Keep one light on for surveillance; everything beyond that is waste
        if lights_on.len() > 1 {
            for light in &lights_on[1..] {
                actions.push(
                    DeviceAction::new(&light.id, ActionVerb::TurnOff).with_reason(
                        "Energy saving: Room unoccupied, excess lighting not needed",
                    ),
                );
            }
        }

        for airflow in snapshot.devices_of_type(&DeviceType::AirFlow) {
            if airflow.is_on() {
                actions.push(
                    DeviceAction::new(&airflow.id, ActionVerb::TurnOff)
                        .with_reason("Energy saving: Room unoccupied"),
                );
            }
        }

        for hvac in snapshot.devices_of_type(&DeviceType::Hvac) {
            if hvac.is_on() {
                actions.push(
                    DeviceAction::new(&hvac.id, ActionVerb::TurnOff)
                        .with_reason("Energy saving: HVAC not needed for unoccupied room"),
                );
            }
        }
    }

    let devices_on = snapshot.on_count();
    base_decision(agent_id, AgentCategory::EnergyEfficiency)
        .with_actions(actions)
        .with_reasoning(format!(
            "Energy optimization: {devices_on} devices active, Occupancy: {occupancy}"
        ))
        .with_scores(ScoreVector::new(0.3, 1.0, 0.6, 0.4))
        .with_confidence(0.5)
}
