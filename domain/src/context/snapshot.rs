//! Context snapshot entities
//!
//! A [`ContextSnapshot`] is the immutable input to one coordination round:
//! room identity, device states, a sensor reading set, and the active SLOs.
//! It is produced externally per round and never mutated by the core;
//! simulation works on value copies (see [`crate::context::simulate`]).

use crate::slo::objective::Slo;
use crate::util::timestamp_ms;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of controllable device
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Hvac,
    Lighting,
    AirFlow,
    Security,
    Emergency,
    Other(String),
}

impl DeviceType {
    pub fn as_str(&self) -> &str {
        match self {
            DeviceType::Hvac => "HVAC",
            DeviceType::Lighting => "Lighting",
            DeviceType::AirFlow => "AirFlow",
            DeviceType::Security => "Security",
            DeviceType::Emergency => "Emergency",
            DeviceType::Other(kind) => kind,
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "HVAC" => DeviceType::Hvac,
            "Lighting" => DeviceType::Lighting,
            "AirFlow" => DeviceType::AirFlow,
            "Security" => DeviceType::Security,
            "Emergency" => DeviceType::Emergency,
            other => DeviceType::Other(other.to_string()),
        })
    }
}

impl Serialize for DeviceType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeviceType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or(DeviceType::Other(s)))
    }
}

/// On/off state of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PowerState {
    #[serde(rename = "ON")]
    On,
    #[default]
    #[serde(rename = "OFF")]
    Off,
}

impl PowerState {
    pub fn is_on(&self) -> bool {
        matches!(self, PowerState::On)
    }
}

/// Observed state of a single device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceState {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    #[serde(rename = "status", default)]
    pub power: PowerState,
    /// Current brightness in [0, 1], lighting devices only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    /// Configured target temperature, HVAC devices only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_temperature: Option<f64>,
}

impl DeviceState {
    pub fn new(id: impl Into<String>, name: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            device_type,
            power: PowerState::Off,
            brightness: None,
            target_temperature: None,
        }
    }

    pub fn powered_on(mut self) -> Self {
        self.power = PowerState::On;
        self
    }

    pub fn with_target_temperature(mut self, temperature: f64) -> Self {
        self.target_temperature = Some(temperature);
        self
    }

    pub fn is_on(&self) -> bool {
        self.power.is_on()
    }
}

/// Sensor reading set for one room.
///
/// Every field is optional: a missing reading is normal (degraded input,
/// not an error) and each accessor substitutes a nominal default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorReadings {
    /// Degrees Celsius
    pub temperature: Option<f64>,
    /// Relative humidity, percent
    pub humidity: Option<f64>,
    /// Parts per million
    pub co2: Option<f64>,
    /// Number of people present
    pub occupancy: Option<u32>,
    /// Lux
    pub light_level: Option<f64>,
}

impl SensorReadings {
    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(22.0)
    }

    pub fn humidity(&self) -> f64 {
        self.humidity.unwrap_or(50.0)
    }

    pub fn co2(&self) -> f64 {
        self.co2.unwrap_or(400.0)
    }

    pub fn occupancy(&self) -> u32 {
        self.occupancy.unwrap_or(0)
    }

    pub fn light_level(&self) -> f64 {
        self.light_level.unwrap_or(300.0)
    }

    /// Reading by metric name, for generic SLO evaluation
    pub fn value_of(&self, metric: &str) -> f64 {
        match metric {
            "temperature" => self.temperature(),
            "humidity" => self.humidity(),
            "co2" => self.co2(),
            "occupancy" => f64::from(self.occupancy()),
            "light_level" => self.light_level(),
            _ => 0.0,
        }
    }
}

/// Room identity and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomInfo {
    pub id: i64,
    pub name: String,
}

impl RoomInfo {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Immutable input to one coordination round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub room: RoomInfo,
    pub devices: Vec<DeviceState>,
    pub sensors: SensorReadings,
    /// SLOs active for this round, available to agent rule logic
    #[serde(default)]
    pub slos: Vec<Slo>,
    pub timestamp_ms: u64,
}

impl ContextSnapshot {
    pub fn new(room: RoomInfo) -> Self {
        Self {
            room,
            devices: Vec::new(),
            sensors: SensorReadings::default(),
            slos: Vec::new(),
            timestamp_ms: timestamp_ms(),
        }
    }

    pub fn with_devices(mut self, devices: Vec<DeviceState>) -> Self {
        self.devices = devices;
        self
    }

    pub fn with_sensors(mut self, sensors: SensorReadings) -> Self {
        self.sensors = sensors;
        self
    }

    pub fn with_slos(mut self, slos: Vec<Slo>) -> Self {
        self.slos = slos;
        self
    }

    pub fn device(&self, id: &str) -> Option<&DeviceState> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn devices_of_type<'a>(
        &'a self,
        device_type: &'a DeviceType,
    ) -> impl Iterator<Item = &'a DeviceState> {
        self.devices
            .iter()
            .filter(move |d| &d.device_type == device_type)
    }

    /// Number of devices currently powered on
    pub fn on_count(&self) -> usize {
        self.devices.iter().filter(|d| d.is_on()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_defaults_apply_when_missing() {
        let sensors = SensorReadings::default();
        assert_eq!(sensors.temperature(), 22.0);
        assert_eq!(sensors.humidity(), 50.0);
        assert_eq!(sensors.co2(), 400.0);
        assert_eq!(sensors.occupancy(), 0);
        assert_eq!(sensors.light_level(), 300.0);
    }

    #[test]
    fn test_device_status_serde_uses_on_off() {
        let device = DeviceState::new("light-1", "Ceiling", DeviceType::Lighting).powered_on();
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["status"], "ON");
        assert_eq!(json["type"], "Lighting");

        let back: DeviceState = serde_json::from_value(json).unwrap();
        assert!(back.is_on());
    }

    #[test]
    fn test_devices_of_type_filters() {
        let snapshot = ContextSnapshot::new(RoomInfo::new(1, "Lab")).with_devices(vec![
            DeviceState::new("hvac-1", "HVAC", DeviceType::Hvac),
            DeviceState::new("light-1", "Light", DeviceType::Lighting).powered_on(),
        ]);

        assert_eq!(snapshot.devices_of_type(&DeviceType::Lighting).count(), 1);
        assert_eq!(snapshot.on_count(), 1);
        assert!(snapshot.device("hvac-1").is_some());
        assert!(snapshot.device("nope").is_none());
    }
}
