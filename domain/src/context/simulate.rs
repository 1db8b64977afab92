//! World-state projection
//!
//! Pure transform used by the plan scorer: apply a candidate plan's actions
//! to a copy of the current snapshot, then apply a simple environmental
//! response. The input snapshot is never mutated; callers get a new value.

use super::snapshot::{ContextSnapshot, DeviceType, PowerState};
use crate::agent::decision::{ActionVerb, DeviceAction};

/// Fraction of the gap to the HVAC target temperature closed per step
const HVAC_APPROACH_FACTOR: f64 = 0.2;
/// CO2 reduction per active airflow device, ppm
const CO2_REDUCTION_PER_AIRFLOW: f64 = 50.0;
/// CO2 never simulated below outdoor baseline
const CO2_FLOOR_PPM: f64 = 350.0;
/// Humidity drop while any HVAC runs, percentage points
const HVAC_DEHUMIDIFY_STEP: f64 = 2.0;
const HUMIDITY_FLOOR: f64 = 30.0;

/// Project the outcome of executing `actions` against `snapshot`.
///
/// Returns a new snapshot; the input is untouched. Unrecognized verbs and
/// actions targeting unknown devices are no-ops.
pub fn project_plan_outcome(snapshot: &ContextSnapshot, actions: &[DeviceAction]) -> ContextSnapshot {
    let mut projected = snapshot.clone();

    for action in actions {
        apply_action(&mut projected, action);
    }
    apply_environmental_response(&mut projected);

    projected
}

fn apply_action(state: &mut ContextSnapshot, action: &DeviceAction) {
    let Some(device) = state.devices.iter_mut().find(|d| d.id == action.device_id) else {
        return;
    };

    match &action.verb {
        ActionVerb::TurnOn => device.power = PowerState::On,
        ActionVerb::TurnOff => device.power = PowerState::Off,
        ActionVerb::Dim => {
            device.power = PowerState::On;
            device.brightness = Some(action.param_f64("brightness").unwrap_or(0.5));
        }
        ActionVerb::SetTemperature => {
            device.target_temperature = Some(action.param_f64("temperature").unwrap_or(23.0));
        }
        ActionVerb::IncreaseVentilation => device.power = PowerState::On,
        // Forward-compatible: verbs the simulation does not know leave state as-is
        ActionVerb::Other(_) => {}
    }
}

fn apply_environmental_response(state: &mut ContextSnapshot) {
    let hvac_targets: Vec<f64> = state
        .devices
        .iter()
        .filter(|d| d.device_type == DeviceType::Hvac && d.is_on())
        .map(|d| d.target_temperature.unwrap_or(23.0))
        .collect();

    if !hvac_targets.is_empty() {
        let target = hvac_targets.iter().sum::<f64>() / hvac_targets.len() as f64;
        let current = state.sensors.temperature();
        state.sensors.temperature = Some(current + (target - current) * HVAC_APPROACH_FACTOR);

        let humidity = state.sensors.humidity();
        state.sensors.humidity = Some((humidity - HVAC_DEHUMIDIFY_STEP).max(HUMIDITY_FLOOR));
    }

    let airflow_on = state
        .devices
        .iter()
        .filter(|d| d.device_type == DeviceType::AirFlow && d.is_on())
        .count();

    if airflow_on > 0 {
        let co2 = state.sensors.co2();
        state.sensors.co2 =
            Some((co2 - CO2_REDUCTION_PER_AIRFLOW * airflow_on as f64).max(CO2_FLOOR_PPM));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::snapshot::{DeviceState, RoomInfo, SensorReadings};

    fn snapshot() -> ContextSnapshot {
        ContextSnapshot::new(RoomInfo::new(1, "Lab"))
            .with_devices(vec![
                DeviceState::new("hvac-1", "HVAC", DeviceType::Hvac).with_target_temperature(20.0),
                DeviceState::new("fan-1", "Fan", DeviceType::AirFlow),
                DeviceState::new("light-1", "Light", DeviceType::Lighting),
            ])
            .with_sensors(SensorReadings {
                temperature: Some(30.0),
                humidity: Some(55.0),
                co2: Some(900.0),
                occupancy: Some(3),
                light_level: None,
            })
    }

    #[test]
    fn test_input_snapshot_is_untouched() {
        let before = snapshot();
        let actions = vec![DeviceAction::new("hvac-1", ActionVerb::TurnOn)];
        let after = project_plan_outcome(&before, &actions);

        assert!(!before.device("hvac-1").unwrap().is_on());
        assert!(after.device("hvac-1").unwrap().is_on());
        assert_eq!(before.sensors.temperature(), 30.0);
    }

    #[test]
    fn test_hvac_moves_temperature_twenty_percent_toward_target() {
        let actions = vec![DeviceAction::new("hvac-1", ActionVerb::TurnOn)];
        let after = project_plan_outcome(&snapshot(), &actions);

        // 30 + (20 - 30) * 0.2 = 28
        assert!((after.sensors.temperature() - 28.0).abs() < 1e-9);
        // HVAC dehumidifies slightly
        assert_eq!(after.sensors.humidity(), 53.0);
    }

    #[test]
    fn test_airflow_reduces_co2_with_floor() {
        let actions = vec![DeviceAction::new("fan-1", ActionVerb::TurnOn)];
        let after = project_plan_outcome(&snapshot(), &actions);
        assert_eq!(after.sensors.co2(), 850.0);

        let mut low = snapshot();
        low.sensors.co2 = Some(360.0);
        let after = project_plan_outcome(&low, &actions);
        assert_eq!(after.sensors.co2(), 350.0);
    }

    #[test]
    fn test_dim_defaults_brightness() {
        let actions = vec![DeviceAction::new("light-1", ActionVerb::Dim)];
        let after = project_plan_outcome(&snapshot(), &actions);
        let light = after.device("light-1").unwrap();
        assert!(light.is_on());
        assert_eq!(light.brightness, Some(0.5));
    }

    #[test]
    fn test_unrecognized_verb_is_noop() {
        let actions =
            vec![DeviceAction::new("light-1", ActionVerb::Other("defrag".to_string()))];
        let after = project_plan_outcome(&snapshot(), &actions);
        assert!(!after.device("light-1").unwrap().is_on());
    }

    #[test]
    fn test_unknown_device_is_noop() {
        let actions = vec![DeviceAction::new("ghost-9", ActionVerb::TurnOn)];
        let after = project_plan_outcome(&snapshot(), &actions);
        assert_eq!(after.on_count(), 0);
    }
}
