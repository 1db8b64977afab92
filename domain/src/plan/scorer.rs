//! Decision plan scorer
//!
//! Projects a plan's actions onto the current snapshot, re-evaluates the
//! SLOs on the simulated outcome, and folds SLO compliance, agent
//! confidence, and a capped complexity penalty into one composite score.

use super::decision_plan::DecisionPlan;
use crate::context::simulate::project_plan_outcome;
use crate::context::snapshot::ContextSnapshot;
use crate::slo::evaluation;
use crate::slo::objective::Slo;

// Fixed scoring constants; plans are only comparable across strategies
// because every plan is scored with the same weights.
const SLO_WEIGHT: f64 = 0.7;
const CONFIDENCE_WEIGHT: f64 = 0.3;
const COMPLEXITY_PENALTY_PER_ACTION: f64 = 0.02;
const COMPLEXITY_PENALTY_CAP: f64 = 0.1;

/// Score `plan` against `snapshot` and `slos`, populating its `score`,
/// `confidence`, and `slo_compliance` fields. Returns the composite score,
/// always within [0, 1].
pub fn score_plan(plan: &mut DecisionPlan, snapshot: &ContextSnapshot, slos: &[Slo]) -> f64 {
    let projected = project_plan_outcome(snapshot, &plan.actions);
    let compliance = evaluation::evaluate(&projected, slos);
    let slo_score = compliance.overall_compliance;

    // Mean confidence across contributing decisions; an agent-less plan has
    // zero confidence by definition.
    let agent_confidence = if plan.agent_decisions.is_empty() {
        0.0
    } else {
        plan.agent_decisions.iter().map(|d| d.confidence).sum::<f64>()
            / plan.agent_decisions.len() as f64
    };

    let complexity_penalty =
        (plan.actions.len() as f64 * COMPLEXITY_PENALTY_PER_ACTION).min(COMPLEXITY_PENALTY_CAP);

    let composite = (slo_score * SLO_WEIGHT + agent_confidence * CONFIDENCE_WEIGHT
        - complexity_penalty)
        .clamp(0.0, 1.0);

    plan.score = composite;
    plan.confidence = agent_confidence;
    plan.slo_compliance = Some(compliance);

    composite
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::category::AgentCategory;
    use crate::agent::decision::{ActionVerb, AgentDecision, DeviceAction};
    use crate::context::snapshot::{DeviceState, DeviceType, RoomInfo, SensorReadings};
    use crate::resolution::resolver::Resolution;
    use crate::resolution::strategy::ResolutionStrategy;
    use crate::slo::objective::SloMetric;

    fn snapshot() -> ContextSnapshot {
        ContextSnapshot::new(RoomInfo::new(1, "Lab"))
            .with_devices(vec![
                DeviceState::new("hvac-1", "HVAC", DeviceType::Hvac).with_target_temperature(23.0),
                DeviceState::new("fan-1", "Fan", DeviceType::AirFlow),
            ])
            .with_sensors(SensorReadings {
                temperature: Some(28.0),
                co2: Some(900.0),
                occupancy: Some(2),
                ..SensorReadings::default()
            })
    }

    fn plan_with(actions: Vec<DeviceAction>, decisions: Vec<AgentDecision>) -> DecisionPlan {
        DecisionPlan::new(
            "priority_weighted_120000",
            decisions,
            Resolution {
                strategy: ResolutionStrategy::PriorityWeighted,
                actions,
                conflicts: Vec::new(),
            },
        )
    }

    fn confident_decision(confidence: f64) -> AgentDecision {
        AgentDecision::new("comfort_agent", AgentCategory::Comfort, 0.7)
            .with_confidence(confidence)
    }

    #[test]
    fn test_score_stays_in_unit_interval() {
        let slos = vec![
            Slo::new("Temperature", SloMetric::TemperatureComfort)
                .with_config("min_temp", 22.0)
                .with_config("max_temp", 24.0),
        ];

        // Many actions and rock-bottom confidence would push the raw
        // composite negative without the clamp
        let actions: Vec<_> = (0..10)
            .map(|i| DeviceAction::new(format!("ghost-{i}"), ActionVerb::TurnOn))
            .collect();
        let mut plan = plan_with(actions, vec![confident_decision(0.0)]);

        let mut cold = snapshot();
        cold.sensors.temperature = Some(5.0);
        let score = score_plan(&mut plan, &cold, &slos);

        assert!((0.0..=1.0).contains(&score));
        assert_eq!(plan.score, score);
    }

    #[test]
    fn test_scoring_simulates_actions_before_evaluating() {
        let slos = vec![
            Slo::new("Temperature", SloMetric::TemperatureComfort)
                .with_config("min_temp", 22.0)
                .with_config("max_temp", 30.0),
        ];

        // Turning the HVAC on moves 28° toward the 23° target before the
        // SLO engine sees it, so both plans stay compliant but the scored
        // evaluation reflects the projected temperature.
        let mut plan = plan_with(
            vec![DeviceAction::new("hvac-1", ActionVerb::TurnOn)],
            vec![confident_decision(0.8)],
        );
        score_plan(&mut plan, &snapshot(), &slos);

        let compliance = plan.slo_compliance.expect("scorer populates compliance");
        assert!(compliance.results[0].actual.starts_with("27"));
    }

    #[test]
    fn test_complexity_penalty_is_capped() {
        // With zero SLOs the slo_score term is 0, isolating the rest
        let decisions = vec![confident_decision(1.0)];

        let mut small = plan_with(
            vec![DeviceAction::new("ghost", ActionVerb::TurnOn)],
            decisions.clone(),
        );
        let small_score = score_plan(&mut small, &snapshot(), &[]);
        // 0.3 * 1.0 - 0.02
        assert!((small_score - 0.28).abs() < 1e-9);

        let actions: Vec<_> = (0..20)
            .map(|i| DeviceAction::new(format!("ghost-{i}"), ActionVerb::TurnOn))
            .collect();
        let mut large = plan_with(actions, decisions);
        let large_score = score_plan(&mut large, &snapshot(), &[]);
        // Penalty caps at 0.1 no matter how many actions pile up
        assert!((large_score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_agentless_plan_has_zero_confidence() {
        let mut plan = plan_with(Vec::new(), Vec::new());
        score_plan(&mut plan, &snapshot(), &[]);
        assert_eq!(plan.confidence, 0.0);
        assert_eq!(plan.score, 0.0);
    }

    #[test]
    fn test_confidence_is_mean_across_decisions() {
        let mut plan = plan_with(
            Vec::new(),
            vec![confident_decision(0.6), confident_decision(1.0)],
        );
        score_plan(&mut plan, &snapshot(), &[]);
        assert!((plan.confidence - 0.8).abs() < 1e-9);
    }
}
