//! SLO evaluation engine
//!
//! Evaluates a room snapshot against a set of declared objectives. Each
//! known metric has a dedicated evaluator producing a compliance score in
//! [0, 1], a recommendation, and a priority tag; unknown metrics fall back
//! to a generic numeric comparison. Scores aggregate into a weighted
//! overall compliance, a violation list, and per-category roll-ups.

use super::objective::{Slo, SloCategory, SloMetric};
use crate::context::snapshot::{ContextSnapshot, DeviceType};
use crate::util::timestamp_ms;
use serde::{Deserialize, Serialize};

/// Compliance below this is recorded as a violation (strictly below;
/// a score of exactly 0.8 is compliant).
const VIOLATION_THRESHOLD: f64 = 0.8;

/// Severity of a recorded violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Severity derived from a compliance score
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            Severity::Critical
        } else if score < 0.6 {
            Severity::High
        } else if score < 0.8 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attention priority attached to a single SLO result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Outcome of evaluating one SLO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SloResult {
    pub slo_name: String,
    pub metric: SloMetric,
    pub expected: String,
    pub actual: String,
    pub compliance: f64,
    pub recommendation: String,
    pub priority: Priority,
}

/// An SLO whose compliance fell below the violation threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub slo_name: String,
    pub expected: String,
    pub actual: String,
    pub severity: Severity,
    pub recommendation: String,
}

/// Per-category compliance roll-up.
///
/// A category with no evaluated SLO scores 1.0, an optimistic default for
/// unmeasured categories. This inflates overall category scores when few
/// SLOs are configured and is a deliberate policy choice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryScores {
    pub comfort: f64,
    pub energy: f64,
    pub security: f64,
    pub environmental: f64,
}

impl Default for CategoryScores {
    fn default() -> Self {
        Self {
            comfort: 1.0,
            energy: 1.0,
            security: 1.0,
            environmental: 1.0,
        }
    }
}

/// Full evaluation of a snapshot against its SLOs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SloEvaluation {
    /// Weighted compliance over active SLOs, in [0, 1]; 0 when no SLO is active
    pub overall_compliance: f64,
    pub results: Vec<SloResult>,
    pub violations: Vec<Violation>,
    pub category_scores: CategoryScores,
    pub evaluated_at_ms: u64,
}

impl SloEvaluation {
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn critical_violation_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Critical)
            .count()
    }
}

/// Evaluate the snapshot's state against the given SLOs.
///
/// Inactive SLOs are skipped entirely. The overall score is
/// `Σ(compliance·weight) / Σ(weight)` over active SLOs; an empty or fully
/// inactive set yields 0 rather than dividing by zero.
pub fn evaluate(snapshot: &ContextSnapshot, slos: &[Slo]) -> SloEvaluation {
    let mut results = Vec::new();
    let mut violations = Vec::new();
    let mut weighted_score = 0.0;
    let mut total_weight = 0.0;

    for slo in slos.iter().filter(|s| s.active) {
        let result = evaluate_one(slo, snapshot);

        weighted_score += result.compliance * slo.weight;
        total_weight += slo.weight;

        if result.compliance < VIOLATION_THRESHOLD {
            violations.push(Violation {
                slo_name: result.slo_name.clone(),
                expected: result.expected.clone(),
                actual: result.actual.clone(),
                severity: Severity::from_score(result.compliance),
                recommendation: result.recommendation.clone(),
            });
        }

        results.push(result);
    }

    let overall_compliance = if total_weight > 0.0 {
        weighted_score / total_weight
    } else {
        0.0
    };

    SloEvaluation {
        overall_compliance,
        category_scores: roll_up_categories(&results),
        results,
        violations,
        evaluated_at_ms: timestamp_ms(),
    }
}

fn evaluate_one(slo: &Slo, snapshot: &ContextSnapshot) -> SloResult {
    match &slo.metric {
        SloMetric::TemperatureComfort => evaluate_temperature(slo, snapshot),
        SloMetric::HumidityControl => evaluate_humidity(slo, snapshot),
        SloMetric::AirQualityCo2 => evaluate_co2(slo, snapshot),
        SloMetric::SecurityLighting => evaluate_security_lighting(slo, snapshot),
        SloMetric::EmergencyReadiness => evaluate_emergency_readiness(slo, snapshot),
        SloMetric::EnergyEfficiency => evaluate_energy_efficiency(slo, snapshot),
        SloMetric::OccupancyOptimization => evaluate_occupancy_optimization(slo, snapshot),
        SloMetric::Custom(_) => evaluate_generic(slo, snapshot),
    }
}

/// Full compliance inside [min_temp, max_temp]; outside, linear decay to
/// zero over a 5 °C band beyond the nearest bound.
fn evaluate_temperature(slo: &Slo, snapshot: &ContextSnapshot) -> SloResult {
    let current = snapshot.sensors.temperature();
    let min_temp = slo.config_value("min_temp", 22.0);
    let max_temp = slo.config_value("max_temp", 24.0);

    let (compliance, recommendation) = if (min_temp..=max_temp).contains(&current) {
        (1.0, "Temperature within comfort range".to_string())
    } else if current < min_temp {
        let deviation = min_temp - current;
        (
            (1.0 - deviation / 5.0).max(0.0),
            format!("Temperature too low. Increase heating by {deviation:.1}°C"),
        )
    } else {
        let deviation = current - max_temp;
        (
            (1.0 - deviation / 5.0).max(0.0),
            format!("Temperature too high. Increase cooling by {deviation:.1}°C"),
        )
    };

    SloResult {
        slo_name: slo.name.clone(),
        metric: slo.metric.clone(),
        expected: format!("{min_temp}-{max_temp}°C"),
        actual: format!("{current}°C"),
        compliance,
        recommendation,
        priority: if compliance < 0.6 {
            Priority::High
        } else if compliance < 0.8 {
            Priority::Medium
        } else {
            Priority::Low
        },
    }
}

/// Full compliance inside [min_humidity, max_humidity]; linear decay over a
/// 30-percentage-point band beyond the nearest bound.
fn evaluate_humidity(slo: &Slo, snapshot: &ContextSnapshot) -> SloResult {
    let current = snapshot.sensors.humidity();
    let min_humidity = slo.config_value("min_humidity", 40.0);
    let max_humidity = slo.config_value("max_humidity", 60.0);

    let (compliance, recommendation) = if (min_humidity..=max_humidity).contains(&current) {
        (1.0, "Humidity levels optimal".to_string())
    } else if current < min_humidity {
        let deviation = min_humidity - current;
        (
            (1.0 - deviation / 30.0).max(0.0),
            format!("Humidity too low. Increase by {deviation:.1}%"),
        )
    } else {
        let deviation = current - max_humidity;
        (
            (1.0 - deviation / 30.0).max(0.0),
            format!("Humidity too high. Reduce by {deviation:.1}%"),
        )
    };

    SloResult {
        slo_name: slo.name.clone(),
        metric: slo.metric.clone(),
        expected: format!("{min_humidity}-{max_humidity}%"),
        actual: format!("{current}%"),
        compliance,
        recommendation,
        priority: Priority::Medium,
    }
}

/// Full compliance at or below max_co2; above it a convex penalty
/// `1 - ((co2 - max) / 1000)^1.5` floored at zero, so small excursions are
/// barely penalized and large ones heavily.
fn evaluate_co2(slo: &Slo, snapshot: &ContextSnapshot) -> SloResult {
    let current = snapshot.sensors.co2();
    let max_co2 = slo.config_value("max_co2", 800.0);

    let (compliance, recommendation) = if current <= max_co2 {
        (1.0, "CO2 levels within acceptable range".to_string())
    } else {
        let excess = current - max_co2;
        (
            (1.0 - (excess / 1000.0).powf(1.5)).max(0.0),
            format!("CO2 levels too high. Increase ventilation to reduce by {excess}ppm"),
        )
    };

    SloResult {
        slo_name: slo.name.clone(),
        metric: slo.metric.clone(),
        expected: format!("≤{max_co2}ppm"),
        actual: format!("{current}ppm"),
        compliance,
        recommendation,
        priority: if current > 1200.0 {
            Priority::High
        } else if current > max_co2 {
            Priority::Medium
        } else {
            Priority::Low
        },
    }
}

/// Fraction of the required minimum lights that are actually on, capped at 1
fn evaluate_security_lighting(slo: &Slo, snapshot: &ContextSnapshot) -> SloResult {
    let lighting: Vec<_> = snapshot.devices_of_type(&DeviceType::Lighting).collect();
    let lights_on = lighting.iter().filter(|d| d.is_on()).count() as f64;
    let min_lights = slo.config_value("min_lights", 1.0);

    let (compliance, recommendation) = if lights_on >= min_lights {
        (1.0, "Security lighting requirements met".to_string())
    } else {
        (
            lights_on / min_lights,
            format!(
                "Insufficient lighting for security. Need {} more lights",
                min_lights - lights_on
            ),
        )
    };

    SloResult {
        slo_name: slo.name.clone(),
        metric: slo.metric.clone(),
        expected: format!("≥{min_lights} lights on"),
        actual: format!("{}/{} lights on", lights_on, lighting.len()),
        compliance,
        recommendation,
        priority: if compliance < 0.5 {
            Priority::High
        } else {
            Priority::Medium
        },
    }
}

/// Fraction of required emergency/security devices that are on
fn evaluate_emergency_readiness(slo: &Slo, snapshot: &ContextSnapshot) -> SloResult {
    let emergency: Vec<_> = snapshot
        .devices
        .iter()
        .filter(|d| {
            d.device_type == DeviceType::Emergency || d.device_type == DeviceType::Security
        })
        .collect();
    let devices_on = emergency.iter().filter(|d| d.is_on()).count() as f64;
    let required = slo.config_value("required_devices", emergency.len() as f64);

    let (compliance, recommendation) = if devices_on >= required {
        (1.0, "Emergency systems operational".to_string())
    } else {
        (
            devices_on / required,
            format!(
                "Emergency readiness compromised. {} devices offline",
                required - devices_on
            ),
        )
    };

    SloResult {
        slo_name: slo.name.clone(),
        metric: slo.metric.clone(),
        expected: format!("{required} emergency devices active"),
        actual: format!("{}/{} devices active", devices_on, emergency.len()),
        compliance,
        recommendation,
        priority: if compliance < 0.8 {
            Priority::High
        } else {
            Priority::Medium
        },
    }
}

/// Unoccupied rooms should run at most `max_devices_unoccupied` devices;
/// occupied rooms are compared against an occupancy-normalized expected
/// on-fraction (occupancy / 5, capped at 1) with a 20 % tolerance band.
fn evaluate_energy_efficiency(slo: &Slo, snapshot: &ContextSnapshot) -> SloResult {
    let occupancy = snapshot.sensors.occupancy();
    let devices_on = snapshot.on_count() as f64;
    let total_devices = snapshot.devices.len() as f64;
    let max_unoccupied = slo.config_value("max_devices_unoccupied", 1.0);

    let (compliance, recommendation) = if occupancy == 0 {
        let compliance = if devices_on <= max_unoccupied {
            1.0
        } else {
            (1.0 - (devices_on - max_unoccupied) / total_devices).max(0.0)
        };
        (
            compliance,
            format!("Unoccupied room has {devices_on} devices on. Target: ≤{max_unoccupied}"),
        )
    } else {
        let expected = (f64::from(occupancy) / 5.0).min(1.0);
        let actual = if total_devices > 0.0 {
            devices_on / total_devices
        } else {
            0.0
        };

        if actual <= expected + 0.2 {
            (
                1.0,
                "Energy usage optimized for current occupancy".to_string(),
            )
        } else {
            (
                (1.0 - (actual - expected)).max(0.0),
                format!("Energy usage high for {occupancy} occupants. Consider reducing device usage"),
            )
        }
    };

    SloResult {
        slo_name: slo.name.clone(),
        metric: slo.metric.clone(),
        expected: format!("≤{max_unoccupied} devices when unoccupied"),
        actual: format!("{devices_on}/{total_devices} devices on, occupancy: {occupancy}"),
        compliance,
        recommendation,
        priority: if compliance < 0.7 {
            Priority::Medium
        } else {
            Priority::Low
        },
    }
}

/// Unoccupied: average of HVAC-on and lighting-on compliance against the
/// configured maxima. Occupied: total active HVAC+lighting ratio compared
/// against the occupancy-normalized expectation with a 30 % tolerance band.
fn evaluate_occupancy_optimization(slo: &Slo, snapshot: &ContextSnapshot) -> SloResult {
    let occupancy = snapshot.sensors.occupancy();
    let hvac_on = snapshot
        .devices_of_type(&DeviceType::Hvac)
        .filter(|d| d.is_on())
        .count();
    let lights_on = snapshot
        .devices_of_type(&DeviceType::Lighting)
        .filter(|d| d.is_on())
        .count();

    let (compliance, recommendation) = if occupancy == 0 {
        let max_hvac = slo.config_value("max_hvac_unoccupied", 0.0);
        let max_lights = slo.config_value("max_lights_unoccupied", 1.0);

        let hvac_compliance = if hvac_on as f64 <= max_hvac { 1.0 } else { 0.5 };
        let light_compliance = if lights_on as f64 <= max_lights { 1.0 } else { 0.7 };

        (
            (hvac_compliance + light_compliance) / 2.0,
            "Optimize for unoccupied space".to_string(),
        )
    } else {
        let expected = f64::from(occupancy.min(5)) / 5.0;
        let total_systems = snapshot
            .devices
            .iter()
            .filter(|d| {
                d.device_type == DeviceType::Hvac || d.device_type == DeviceType::Lighting
            })
            .count() as f64;
        let actual = if total_systems > 0.0 {
            (hvac_on + lights_on) as f64 / total_systems
        } else {
            0.0
        };

        let compliance = if (actual - expected).abs() <= 0.3 {
            1.0
        } else {
            (1.0 - (actual - expected).abs()).max(0.0)
        };
        (compliance, format!("Optimization for {occupancy} occupants"))
    };

    SloResult {
        slo_name: slo.name.clone(),
        metric: slo.metric.clone(),
        expected: format!("Optimized for {occupancy} occupants"),
        actual: format!("{hvac_on} HVAC, {lights_on} lights active"),
        compliance,
        recommendation,
        priority: Priority::Medium,
    }
}

/// Generic numeric comparison for metrics the engine does not recognize
fn evaluate_generic(slo: &Slo, snapshot: &ContextSnapshot) -> SloResult {
    let actual = snapshot.sensors.value_of(slo.metric.as_str());
    let target = slo.target_value;

    let compliance = if target > 0.0 {
        (actual / target).min(1.0)
    } else if actual == target {
        1.0
    } else {
        0.5
    };

    SloResult {
        slo_name: slo.name.clone(),
        metric: slo.metric.clone(),
        expected: format!("{target}"),
        actual: format!("{actual}"),
        compliance,
        recommendation: format!("Current {}: {actual}, Target: {target}", slo.metric),
        priority: Priority::Low,
    }
}

/// Arithmetic mean of evaluated SLOs per category; categories with no
/// mapped SLO keep the optimistic 1.0 default.
fn roll_up_categories(results: &[SloResult]) -> CategoryScores {
    let mut sums = [(0.0f64, 0usize); 4];

    for result in results {
        let idx = match result.metric.category() {
            SloCategory::Comfort => 0,
            SloCategory::Energy => 1,
            SloCategory::Security => 2,
            SloCategory::Environmental => 3,
        };
        sums[idx].0 += result.compliance;
        sums[idx].1 += 1;
    }

    let average = |(sum, count): (f64, usize)| if count > 0 { sum / count as f64 } else { 1.0 };

    CategoryScores {
        comfort: average(sums[0]),
        energy: average(sums[1]),
        security: average(sums[2]),
        environmental: average(sums[3]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::snapshot::{DeviceState, RoomInfo, SensorReadings};

    fn snapshot_with(sensors: SensorReadings, devices: Vec<DeviceState>) -> ContextSnapshot {
        ContextSnapshot::new(RoomInfo::new(1, "Lab"))
            .with_sensors(sensors)
            .with_devices(devices)
    }

    fn temperature_slo() -> Slo {
        Slo::new("Temperature Comfort", SloMetric::TemperatureComfort)
            .with_weight(0.25)
            .with_config("min_temp", 22.0)
            .with_config("max_temp", 24.0)
    }

    fn sensors(temperature: f64) -> SensorReadings {
        SensorReadings {
            temperature: Some(temperature),
            ..SensorReadings::default()
        }
    }

    #[test]
    fn test_temperature_at_bounds_is_fully_compliant() {
        for temp in [22.0, 24.0, 23.0] {
            let evaluation = evaluate(&snapshot_with(sensors(temp), vec![]), &[temperature_slo()]);
            assert_eq!(evaluation.results[0].compliance, 1.0, "temp {temp}");
        }
    }

    #[test]
    fn test_temperature_linear_decay() {
        // 2.5°C below the lower bound sits at the midpoint of the decay band
        let evaluation = evaluate(&snapshot_with(sensors(19.5), vec![]), &[temperature_slo()]);
        assert!((evaluation.results[0].compliance - 0.5).abs() < 1e-9);

        // 5°C and beyond bottoms out at zero
        let evaluation = evaluate(&snapshot_with(sensors(17.0), vec![]), &[temperature_slo()]);
        assert_eq!(evaluation.results[0].compliance, 0.0);

        let evaluation = evaluate(&snapshot_with(sensors(10.0), vec![]), &[temperature_slo()]);
        assert_eq!(evaluation.results[0].compliance, 0.0);
    }

    #[test]
    fn test_compliance_of_exactly_point_eight_is_not_a_violation() {
        // 1°C above the upper bound: 1 - 1/5 == 0.8 exactly
        let evaluation = evaluate(&snapshot_with(sensors(25.0), vec![]), &[temperature_slo()]);
        assert_eq!(evaluation.results[0].compliance, 0.8);
        assert!(evaluation.violations.is_empty());

        // Just past it, the violation is recorded with medium severity
        let evaluation = evaluate(&snapshot_with(sensors(25.1), vec![]), &[temperature_slo()]);
        assert_eq!(evaluation.violation_count(), 1);
        assert_eq!(evaluation.violations[0].severity, Severity::Medium);
    }

    #[test]
    fn test_co2_convex_penalty() {
        let slo = Slo::new("Air Quality", SloMetric::AirQualityCo2).with_config("max_co2", 800.0);

        let at = |co2: f64| {
            let readings = SensorReadings {
                co2: Some(co2),
                ..SensorReadings::default()
            };
            evaluate(&snapshot_with(readings, vec![]), std::slice::from_ref(&slo)).results[0]
                .compliance
        };

        assert_eq!(at(800.0), 1.0);
        let small_excess = at(900.0);
        let large_excess = at(1300.0);
        assert!(small_excess < 1.0);
        assert!(large_excess < 1.0);
        // Convexity: a small excursion is barely penalized relative to a large one
        assert!(small_excess > large_excess);
        assert!((small_excess - (1.0 - 0.1f64.powf(1.5))).abs() < 1e-9);
    }

    #[test]
    fn test_humidity_band_decay() {
        let slo = Slo::new("Humidity", SloMetric::HumidityControl)
            .with_config("min_humidity", 40.0)
            .with_config("max_humidity", 60.0);

        let at = |humidity: f64| {
            let readings = SensorReadings {
                humidity: Some(humidity),
                ..SensorReadings::default()
            };
            evaluate(&snapshot_with(readings, vec![]), std::slice::from_ref(&slo)).results[0]
                .compliance
        };

        assert_eq!(at(50.0), 1.0);
        assert_eq!(at(40.0), 1.0);
        assert!((at(75.0) - 0.5).abs() < 1e-9);
        assert_eq!(at(90.0), 0.0);
    }

    #[test]
    fn test_security_lighting_fraction() {
        let slo = Slo::new("Security Lighting", SloMetric::SecurityLighting)
            .with_config("min_lights", 2.0);

        let devices = vec![
            DeviceState::new("l1", "L1", DeviceType::Lighting).powered_on(),
            DeviceState::new("l2", "L2", DeviceType::Lighting),
            DeviceState::new("l3", "L3", DeviceType::Lighting),
        ];
        let evaluation = evaluate(
            &snapshot_with(SensorReadings::default(), devices),
            std::slice::from_ref(&slo),
        );
        assert_eq!(evaluation.results[0].compliance, 0.5);

        let devices = vec![
            DeviceState::new("l1", "L1", DeviceType::Lighting).powered_on(),
            DeviceState::new("l2", "L2", DeviceType::Lighting).powered_on(),
        ];
        let evaluation = evaluate(
            &snapshot_with(SensorReadings::default(), devices),
            std::slice::from_ref(&slo),
        );
        assert_eq!(evaluation.results[0].compliance, 1.0);
    }

    #[test]
    fn test_emergency_readiness_counts_security_and_emergency_devices() {
        let slo = Slo::new("Readiness", SloMetric::EmergencyReadiness);
        let devices = vec![
            DeviceState::new("cam", "Camera", DeviceType::Security).powered_on(),
            DeviceState::new("exit", "Exit light", DeviceType::Emergency),
        ];
        let evaluation = evaluate(
            &snapshot_with(SensorReadings::default(), devices),
            std::slice::from_ref(&slo),
        );
        // 1 of 2 required devices on
        assert_eq!(evaluation.results[0].compliance, 0.5);
    }

    #[test]
    fn test_energy_efficiency_unoccupied() {
        let slo = Slo::new("Energy", SloMetric::EnergyEfficiency)
            .with_config("max_devices_unoccupied", 1.0);

        let devices = vec![
            DeviceState::new("a", "A", DeviceType::Lighting).powered_on(),
            DeviceState::new("b", "B", DeviceType::Lighting).powered_on(),
            DeviceState::new("c", "C", DeviceType::Hvac).powered_on(),
            DeviceState::new("d", "D", DeviceType::AirFlow),
        ];
        let evaluation = evaluate(
            &snapshot_with(SensorReadings::default(), devices),
            std::slice::from_ref(&slo),
        );
        // 3 on with 1 allowed over 4 devices: 1 - 2/4 = 0.5
        assert_eq!(evaluation.results[0].compliance, 0.5);
    }

    #[test]
    fn test_energy_efficiency_occupied_tolerance() {
        let slo = Slo::new("Energy", SloMetric::EnergyEfficiency);
        let readings = SensorReadings {
            occupancy: Some(5),
            ..SensorReadings::default()
        };
        let devices = vec![
            DeviceState::new("a", "A", DeviceType::Lighting).powered_on(),
            DeviceState::new("b", "B", DeviceType::Hvac).powered_on(),
        ];
        // Expected fraction is 1.0 at 5 occupants; everything on is within tolerance
        let evaluation = evaluate(&snapshot_with(readings, devices), std::slice::from_ref(&slo));
        assert_eq!(evaluation.results[0].compliance, 1.0);
    }

    #[test]
    fn test_occupancy_optimization_unoccupied_averages_subscores() {
        let slo = Slo::new("Occupancy", SloMetric::OccupancyOptimization)
            .with_config("max_hvac_unoccupied", 0.0)
            .with_config("max_lights_unoccupied", 1.0);

        let devices = vec![
            DeviceState::new("h", "HVAC", DeviceType::Hvac).powered_on(),
            DeviceState::new("l", "Light", DeviceType::Lighting),
        ];
        let evaluation = evaluate(
            &snapshot_with(SensorReadings::default(), devices),
            std::slice::from_ref(&slo),
        );
        // HVAC over budget (0.5), lighting within budget (1.0) -> 0.75
        assert_eq!(evaluation.results[0].compliance, 0.75);
    }

    #[test]
    fn test_generic_metric_fallback() {
        let slo = Slo::new("Light floor", SloMetric::Custom("light_level".to_string()))
            .with_target(600.0);
        let readings = SensorReadings {
            light_level: Some(300.0),
            ..SensorReadings::default()
        };
        let evaluation = evaluate(&snapshot_with(readings, vec![]), std::slice::from_ref(&slo));
        assert_eq!(evaluation.results[0].compliance, 0.5);

        let zero_target = Slo::new("Noise", SloMetric::Custom("noise".to_string()));
        let evaluation = evaluate(
            &snapshot_with(SensorReadings::default(), vec![]),
            std::slice::from_ref(&zero_target),
        );
        // Unknown sensor reads 0, target 0: exact match
        assert_eq!(evaluation.results[0].compliance, 1.0);
    }

    #[test]
    fn test_no_active_slos_yields_zero_overall() {
        let snapshot = snapshot_with(SensorReadings::default(), vec![]);
        let evaluation = evaluate(&snapshot, &[]);
        assert_eq!(evaluation.overall_compliance, 0.0);

        let inactive = vec![temperature_slo().inactive()];
        let evaluation = evaluate(&snapshot, &inactive);
        assert_eq!(evaluation.overall_compliance, 0.0);
        assert!(evaluation.results.is_empty());
    }

    #[test]
    fn test_overall_compliance_normalizes_by_active_weight() {
        // All SLOs exactly on target: overall must be exactly 1.0 despite
        // weights summing to less than 1
        let slos = vec![
            temperature_slo().with_weight(0.3),
            Slo::new("Humidity", SloMetric::HumidityControl).with_weight(0.2),
        ];
        let readings = SensorReadings {
            temperature: Some(23.0),
            humidity: Some(50.0),
            ..SensorReadings::default()
        };
        let evaluation = evaluate(&snapshot_with(readings, vec![]), &slos);
        assert_eq!(evaluation.overall_compliance, 1.0);
    }

    #[test]
    fn test_bounds_hold_for_pathological_inputs() {
        let slos = Slo::system_defaults();
        let readings = SensorReadings {
            temperature: Some(-40.0),
            humidity: Some(150.0),
            co2: Some(50_000.0),
            occupancy: Some(500),
            light_level: Some(0.0),
        };
        let evaluation = evaluate(&snapshot_with(readings, vec![]), &slos);

        assert!((0.0..=1.0).contains(&evaluation.overall_compliance));
        for result in &evaluation.results {
            assert!((0.0..=1.0).contains(&result.compliance), "{}", result.slo_name);
        }
    }

    #[test]
    fn test_category_roll_up_defaults_unmeasured_to_one() {
        let evaluation = evaluate(
            &snapshot_with(sensors(30.0), vec![]),
            &[temperature_slo()],
        );
        assert!(evaluation.category_scores.comfort < 1.0);
        assert_eq!(evaluation.category_scores.energy, 1.0);
        assert_eq!(evaluation.category_scores.security, 1.0);
        assert_eq!(evaluation.category_scores.environmental, 1.0);
    }

    #[test]
    fn test_severity_ladder() {
        assert_eq!(Severity::from_score(0.1), Severity::Critical);
        assert_eq!(Severity::from_score(0.45), Severity::High);
        assert_eq!(Severity::from_score(0.7), Severity::Medium);
        assert_eq!(Severity::from_score(0.9), Severity::Low);
    }

    #[test]
    fn test_warm_stuffy_meeting_room_scenario() {
        // A warm, stuffy, well-occupied room: temperature far out of band,
        // CO2 moderately elevated. Overall compliance lands below 0.5 and
        // the temperature objective is the critical violation; the CO2
        // penalty is convex, so 150 ppm of excess stays above the
        // violation cutoff.
        let slos = vec![
            temperature_slo(),
            Slo::new("Air Quality CO2", SloMetric::AirQualityCo2)
                .with_weight(0.20)
                .with_config("max_co2", 800.0),
        ];
        let readings = SensorReadings {
            temperature: Some(28.5),
            co2: Some(950.0),
            occupancy: Some(7),
            ..SensorReadings::default()
        };
        let evaluation = evaluate(&snapshot_with(readings, vec![]), &slos);

        assert!(evaluation.overall_compliance < 0.5);
        assert!(!evaluation.violations.is_empty());
        assert!(evaluation
            .violations
            .iter()
            .any(|v| matches!(v.severity, Severity::Critical | Severity::High)));

        let co2_result = evaluation
            .results
            .iter()
            .find(|r| r.metric == SloMetric::AirQualityCo2)
            .unwrap();
        assert!(co2_result.compliance < 1.0);
        assert!(co2_result.compliance > 0.8);
    }
}
