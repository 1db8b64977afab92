//! Simulated device controller
//!
//! Stands in for real device I/O: per-type nominal latency capped to keep
//! rounds fast, a small random transient-failure rate, and verb-specific
//! response payloads. A real controller would speak MQTT or CoAP behind
//! the same port.

use async_trait::async_trait;
use atrium_application::ports::device_controller::{DeviceController, DeviceError};
use atrium_domain::{ActionVerb, DeviceAction, DeviceState, DeviceType};
use std::collections::HashMap;
use std::time::Duration;

const DEFAULT_FAILURE_RATE: f64 = 0.05;
const DEFAULT_LATENCY_CAP: Duration = Duration::from_secs(2);

/// Simulated controller implementing the device port
pub struct SimulatedDeviceController {
    /// Known device id → type, for latency and power lookups
    inventory: HashMap<String, DeviceType>,
    failure_rate: f64,
    latency_cap: Duration,
}

impl SimulatedDeviceController {
    pub fn new() -> Self {
        Self {
            inventory: HashMap::new(),
            failure_rate: DEFAULT_FAILURE_RATE,
            latency_cap: DEFAULT_LATENCY_CAP,
        }
    }

    /// Register the room's devices so latency and power simulation can key
    /// off their types; actions on unknown devices use defaults
    pub fn with_inventory(mut self, devices: &[DeviceState]) -> Self {
        self.inventory = devices
            .iter()
            .map(|d| (d.id.clone(), d.device_type.clone()))
            .collect();
        self
    }

    /// Transient-failure injection rate (default 5 %)
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Cap on the simulated communication delay (default 2 s)
    pub fn with_latency_cap(mut self, cap: Duration) -> Self {
        self.latency_cap = cap;
        self
    }

    /// Zero-latency, zero-failure controller for tests and dry runs
    pub fn instant() -> Self {
        Self::new()
            .with_failure_rate(0.0)
            .with_latency_cap(Duration::ZERO)
    }

    /// Nominal per-type operation latency; capped before sleeping
    fn nominal_latency(device_type: &DeviceType) -> Duration {
        match device_type {
            DeviceType::Hvac => Duration::from_secs(10),
            DeviceType::Lighting => Duration::from_secs(3),
            DeviceType::AirFlow => Duration::from_secs(5),
            DeviceType::Security => Duration::from_secs(5),
            DeviceType::Emergency => Duration::from_secs(15),
            DeviceType::Other(_) => Duration::from_secs(3),
        }
    }

    /// Typical power draw when on, in watts
    fn power_draw_watts(device_type: &DeviceType) -> f64 {
        match device_type {
            DeviceType::Hvac => 2500.0,
            DeviceType::Lighting => 60.0,
            DeviceType::AirFlow => 150.0,
            DeviceType::Security => 25.0,
            DeviceType::Emergency => 100.0,
            DeviceType::Other(_) => 50.0,
        }
    }

    fn fan_speed_for_level(level: &str) -> u32 {
        match level {
            "low" => 1,
            "medium" => 2,
            "high" => 3,
            "max" => 4,
            _ => 2,
        }
    }

    /// Air flow per ventilation level, CFM
    fn air_flow_for_level(level: &str) -> f64 {
        match level {
            "low" => 100.0,
            "medium" => 200.0,
            "high" => 350.0,
            "max" => 500.0,
            _ => 200.0,
        }
    }

    fn build_response(action: &DeviceAction, device_type: &DeviceType) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert("device_id".into(), action.device_id.clone().into());
        body.insert(
            "timestamp".into(),
            chrono::Utc::now().to_rfc3339().into(),
        );
        body.insert("status".into(), "success".into());

        match &action.verb {
            ActionVerb::TurnOn => {
                body.insert("new_status".into(), "ON".into());
                body.insert(
                    "power_consumption".into(),
                    Self::power_draw_watts(device_type).into(),
                );
            }
            ActionVerb::TurnOff => {
                body.insert("new_status".into(), "OFF".into());
                body.insert("power_consumption".into(), 0.0.into());
            }
            ActionVerb::Dim => {
                let brightness = action.param_f64("brightness").unwrap_or(0.5);
                body.insert("new_status".into(), "ON".into());
                body.insert("brightness".into(), brightness.into());
                body.insert(
                    "power_consumption".into(),
                    (Self::power_draw_watts(device_type) * brightness).into(),
                );
            }
            ActionVerb::SetTemperature => {
                let target = action.param_f64("temperature").unwrap_or(23.0);
                body.insert("target_temperature".into(), target.into());
                // The room lags behind the new setpoint
                body.insert("current_temperature".into(), (target - 1.0).into());
                body.insert("heating_cooling_active".into(), true.into());
            }
            ActionVerb::IncreaseVentilation => {
                let level = action.param_str("ventilation_level").unwrap_or("medium");
                body.insert("ventilation_level".into(), level.into());
                body.insert("fan_speed".into(), Self::fan_speed_for_level(level).into());
                body.insert(
                    "air_flow_rate".into(),
                    Self::air_flow_for_level(level).into(),
                );
            }
            ActionVerb::Other(_) => {}
        }

        serde_json::Value::Object(body)
    }
}

impl Default for SimulatedDeviceController {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceController for SimulatedDeviceController {
    async fn execute(&self, action: &DeviceAction) -> Result<serde_json::Value, DeviceError> {
        let device_type = self
            .inventory
            .get(&action.device_id)
            .cloned()
            .unwrap_or(DeviceType::Other("Unknown".to_string()));

        let latency = Self::nominal_latency(&device_type).min(self.latency_cap);
        if latency > Duration::ZERO {
            tokio::time::sleep(latency).await;
        }

        if self.failure_rate > 0.0 && rand::random::<f64>() < self.failure_rate {
            return Err(DeviceError::Communication(format!(
                "Simulated device communication failure for {}",
                action.device_id
            )));
        }

        Ok(Self::build_response(action, &device_type))
    }
}
