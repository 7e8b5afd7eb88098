use std::collections::BTreeMap;

use super::domain::{
    ControlSelection, Designation, MonitoringPlan, ResolvedControl, ReviewCadence, RiskTier,
};

/// Derive the ongoing-oversight plan from the computed tier and control set.
///
/// Deterministic over its inputs: signals are collected per distinct control
/// type in catalog order and deduplicated, so recomputes reproduce the plan
/// byte for byte.
pub fn derive_plan(
    tier: RiskTier,
    selections: &[ControlSelection],
    controls: &BTreeMap<String, ResolvedControl>,
) -> MonitoringPlan {
    let review_cadence = cadence_for_tier(tier);

    let mut monitored_signals = Vec::new();
    for selection in selections {
        let control = match controls.get(&selection.control_id) {
            Some(control) => control,
            None => continue,
        };
        let signal = match control.control_type.as_str() {
            "technical" => format!("{}: operational metrics and alert volume", control.name),
            _ => format!("{}: evidence freshness", control.name),
        };
        if !monitored_signals.contains(&signal) {
            monitored_signals.push(signal);
        }
    }

    let mut reassessment_triggers = vec![
        "Material change to data categories or jurisdictions".to_string(),
        "Change of model source or autonomy level".to_string(),
    ];
    if selections
        .iter()
        .any(|selection| selection.designation == Designation::Required)
    {
        reassessment_triggers
            .push("Any required control falling out of implementation".to_string());
    }
    if tier >= RiskTier::High {
        reassessment_triggers.push("Any AI incident, however minor".to_string());
    }

    MonitoringPlan {
        review_cadence,
        monitored_signals,
        reassessment_triggers,
    }
}

const fn cadence_for_tier(tier: RiskTier) -> ReviewCadence {
    match tier {
        RiskTier::Regulated => ReviewCadence::Monthly,
        RiskTier::High => ReviewCadence::Quarterly,
        RiskTier::Medium => ReviewCadence::SemiAnnual,
        RiskTier::Low => ReviewCadence::Annual,
    }
}
