//! Decision payload parsing
//!
//! A remote decision source answers with a JSON object carrying
//! `decisions`, `reasoning`, `confidence`, and `scores`. Providers are not
//! trusted to follow the contract: missing keys take documented defaults,
//! out-of-range numbers are clamped into [0, 1], and an unparseable payload
//! degrades to a conservative maintain-current-state decision rather than
//! failing the round.

use atrium_application::ports::decision_source::RawDecision;
use atrium_domain::{ActionVerb, DeviceAction, ScoreVector};
use tracing::warn;

/// Parse and sanitize a raw response body into a [`RawDecision`].
pub fn parse_decision_payload(text: &str) -> RawDecision {
    let value: serde_json::Value = match serde_json::from_str(text.trim()) {
        Ok(value) => value,
        Err(e) => {
            warn!("Decision payload is not valid JSON ({e}), using fallback decision");
            return fallback_decision();
        }
    };

    let Some(object) = value.as_object() else {
        warn!("Decision payload is not a JSON object, using fallback decision");
        return fallback_decision();
    };

    let actions = object
        .get("decisions")
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    match serde_json::from_value::<DeviceAction>(entry.clone()) {
                        Ok(action) => Some(action),
                        Err(e) => {
                            warn!("Skipping malformed action entry: {e}");
                            None
                        }
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let reasoning = object
        .get("reasoning")
        .and_then(|v| v.as_str())
        .unwrap_or("Unable to parse agent reasoning")
        .to_string();

    let confidence = sanitize_unit(object.get("confidence"), 0.5);

    let scores = match object.get("scores").and_then(|v| v.as_object()) {
        Some(scores) => ScoreVector {
            comfort: sanitize_unit(scores.get("comfort"), 0.5),
            energy: sanitize_unit(scores.get("energy"), 0.5),
            reliability: sanitize_unit(scores.get("reliability"), 0.5),
            security: sanitize_unit(scores.get("security"), 0.5),
        },
        None => ScoreVector::uniform(0.5),
    };

    RawDecision {
        actions,
        reasoning,
        confidence,
        scores,
    }
}

/// Missing or non-numeric values take the default; numeric values are
/// clamped into [0, 1]
fn sanitize_unit(value: Option<&serde_json::Value>, default: f64) -> f64 {
    match value.and_then(|v| v.as_f64()) {
        Some(number) => number.clamp(0.0, 1.0),
        None => default,
    }
}

/// Conservative decision used when the payload cannot be parsed at all:
/// hold current device state with low confidence.
fn fallback_decision() -> RawDecision {
    RawDecision {
        actions: vec![DeviceAction::new(
            "system",
            ActionVerb::Other("maintain_current_state".to_string()),
        )
        .with_priority(0.5)],
        reasoning:
            "Fallback decision due to decision source failure. Maintaining current device states for safety."
                .to_string(),
        confidence: 0.3,
        scores: ScoreVector::new(0.5, 0.5, 0.8, 0.7),
    }
}
