//! Scenario files
//!
//! A scenario is a JSON stand-in for the persistence collaborator: room,
//! devices, sensor readings, and SLOs, from which one context snapshot per
//! round is built. The CLI ships a demo scenario and accepts user files.

use atrium_domain::{
    ContextSnapshot, DeviceState, DeviceType, RoomInfo, SensorReadings, Slo,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Could not read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse scenario file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Room scenario: the inputs of a coordination round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub room: RoomInfo,
    #[serde(default)]
    pub devices: Vec<DeviceState>,
    #[serde(default)]
    pub sensors: SensorReadings,
    /// SLOs for the round; when empty, the system defaults apply
    #[serde(default)]
    pub slos: Vec<Slo>,
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Effective SLO set: the scenario's own, or the system defaults
    pub fn slos(&self) -> Vec<Slo> {
        if self.slos.is_empty() {
            Slo::system_defaults()
        } else {
            self.slos.clone()
        }
    }

    /// Build a fresh snapshot for one coordination round
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot::new(self.room.clone())
            .with_devices(self.devices.clone())
            .with_sensors(self.sensors.clone())
            .with_slos(self.slos())
    }

    /// Built-in demo: a warm, stuffy office in the evening
    pub fn demo() -> Self {
        Self {
            room: RoomInfo::new(1, "Open Office West"),
            devices: vec![
                DeviceState::new("hvac-west", "West HVAC", DeviceType::Hvac)
                    .with_target_temperature(23.0),
                DeviceState::new("vent-west", "West Vent", DeviceType::AirFlow),
                DeviceState::new("light-w1", "Window row lights", DeviceType::Lighting)
                    .powered_on(),
                DeviceState::new("light-w2", "Door row lights", DeviceType::Lighting),
                DeviceState::new("cam-west", "West camera", DeviceType::Security),
                DeviceState::new("exit-west", "Exit sign", DeviceType::Emergency).powered_on(),
            ],
            sensors: SensorReadings {
                temperature: Some(27.5),
                humidity: Some(58.0),
                co2: Some(1050.0),
                occupancy: Some(6),
                light_level: Some(320.0),
            },
            slos: Vec::new(),
        }
    }
}
