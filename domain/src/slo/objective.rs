//! SLO entity and metric taxonomy

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Category an SLO metric rolls up into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SloCategory {
    Comfort,
    Energy,
    Security,
    Environmental,
}

/// Known SLO metrics plus an open end for user-defined ones.
///
/// A metric name the engine does not recognize falls back to the generic
/// numeric evaluator rather than failing the round.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SloMetric {
    TemperatureComfort,
    HumidityControl,
    AirQualityCo2,
    SecurityLighting,
    EmergencyReadiness,
    EnergyEfficiency,
    OccupancyOptimization,
    Custom(String),
}

impl SloMetric {
    pub fn as_str(&self) -> &str {
        match self {
            SloMetric::TemperatureComfort => "temperature_comfort",
            SloMetric::HumidityControl => "humidity_control",
            SloMetric::AirQualityCo2 => "air_quality_co2",
            SloMetric::SecurityLighting => "security_lighting",
            SloMetric::EmergencyReadiness => "emergency_readiness",
            SloMetric::EnergyEfficiency => "energy_efficiency",
            SloMetric::OccupancyOptimization => "occupancy_optimization",
            SloMetric::Custom(name) => name,
        }
    }

    /// Category this metric rolls up into.
    ///
    /// Custom metrics count as environmental.
    pub fn category(&self) -> SloCategory {
        match self {
            SloMetric::TemperatureComfort | SloMetric::HumidityControl => SloCategory::Comfort,
            SloMetric::AirQualityCo2 | SloMetric::OccupancyOptimization | SloMetric::Custom(_) => {
                SloCategory::Environmental
            }
            SloMetric::EnergyEfficiency => SloCategory::Energy,
            SloMetric::SecurityLighting | SloMetric::EmergencyReadiness => SloCategory::Security,
        }
    }
}

impl std::fmt::Display for SloMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SloMetric {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "temperature_comfort" => SloMetric::TemperatureComfort,
            "humidity_control" => SloMetric::HumidityControl,
            "air_quality_co2" => SloMetric::AirQualityCo2,
            "security_lighting" => SloMetric::SecurityLighting,
            "emergency_readiness" => SloMetric::EmergencyReadiness,
            "energy_efficiency" => SloMetric::EnergyEfficiency,
            "occupancy_optimization" => SloMetric::OccupancyOptimization,
            other => SloMetric::Custom(other.to_string()),
        })
    }
}

impl Serialize for SloMetric {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SloMetric {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or(SloMetric::Custom(s)))
    }
}

/// A declared service-level objective.
///
/// Persisted externally; the engine treats SLOs as read-only input per
/// round. Weights of active SLOs need not sum to 1; aggregation divides by
/// the active weight sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub metric: SloMetric,
    #[serde(default)]
    pub target_value: f64,
    /// Aggregation weight in [0, 1]
    pub weight: f64,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Metric-specific thresholds (e.g. `min_temp`, `max_co2`)
    #[serde(default)]
    pub config: HashMap<String, f64>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub system_defined: bool,
}

fn default_active() -> bool {
    true
}

impl Slo {
    pub fn new(name: impl Into<String>, metric: SloMetric) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            metric,
            target_value: 0.0,
            weight: 1.0,
            active: true,
            config: HashMap::new(),
            created_by: "system".to_string(),
            system_defined: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_target(mut self, target_value: f64) -> Self {
        self.target_value = target_value;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: f64) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    fn system(mut self) -> Self {
        self.system_defined = true;
        self
    }

    /// Threshold lookup with a metric-specific default
    pub fn config_value(&self, key: &str, default: f64) -> f64 {
        self.config.get(key).copied().unwrap_or(default)
    }

    /// The built-in smart-building SLO catalogue.
    ///
    /// Weights sum to 1.0 but nothing relies on that; aggregation
    /// normalizes regardless.
    pub fn system_defaults() -> Vec<Slo> {
        vec![
            Slo::new("Temperature Comfort", SloMetric::TemperatureComfort)
                .with_description("Maintain temperature within comfort range for occupants")
                .with_target(23.0)
                .with_weight(0.25)
                .with_config("min_temp", 22.0)
                .with_config("max_temp", 24.0)
                .system(),
            Slo::new("Energy Efficiency", SloMetric::EnergyEfficiency)
                .with_description("Optimize energy usage based on occupancy patterns")
                .with_target(0.8)
                .with_weight(0.20)
                .with_config("max_devices_unoccupied", 1.0)
                .with_config("efficiency_threshold", 0.7)
                .system(),
            Slo::new("Security Lighting", SloMetric::SecurityLighting)
                .with_description("Maintain minimum lighting for security surveillance")
                .with_target(1.0)
                .with_weight(0.15)
                .with_config("min_lights", 1.0)
                .system(),
            Slo::new("Air Quality CO2", SloMetric::AirQualityCo2)
                .with_description("Maintain CO2 levels below threshold for health")
                .with_target(800.0)
                .with_weight(0.20)
                .with_config("max_co2", 800.0)
                .system(),
            Slo::new("Occupancy Optimization", SloMetric::OccupancyOptimization)
                .with_description("Scale building systems based on occupancy levels")
                .with_target(1.0)
                .with_weight(0.10)
                .with_config("max_hvac_unoccupied", 0.0)
                .with_config("max_lights_unoccupied", 1.0)
                .system(),
            Slo::new("Humidity Control", SloMetric::HumidityControl)
                .with_description("Maintain optimal humidity levels for comfort")
                .with_target(50.0)
                .with_weight(0.10)
                .with_config("min_humidity", 40.0)
                .with_config("max_humidity", 60.0)
                .system(),
        ]
    }
}
