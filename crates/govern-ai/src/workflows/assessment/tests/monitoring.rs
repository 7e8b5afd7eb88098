use super::common::{catalog_of, resolved_control};
use crate::workflows::assessment::domain::{ControlSelection, Designation, ReviewCadence, RiskTier};
use crate::workflows::assessment::monitoring::derive_plan;

fn selection(control_id: &str, designation: Designation) -> ControlSelection {
    ControlSelection {
        control_id: control_id.to_string(),
        designation,
        reasoning: vec!["why".to_string()],
        rule_ids: vec!["R-1".to_string()],
    }
}

#[test]
fn review_cadence_tracks_the_risk_tier() {
    let controls = catalog_of(&[]);
    let cases = [
        (RiskTier::Regulated, ReviewCadence::Monthly),
        (RiskTier::High, ReviewCadence::Quarterly),
        (RiskTier::Medium, ReviewCadence::SemiAnnual),
        (RiskTier::Low, ReviewCadence::Annual),
    ];
    for (tier, cadence) in cases {
        let plan = derive_plan(tier, &[], &controls);
        assert_eq!(plan.review_cadence, cadence, "tier {tier:?}");
    }
}

#[test]
fn signals_are_deduplicated_and_skip_unknown_controls() {
    let controls = catalog_of(&[resolved_control("CTL-A", &["GOVERN-1.1"])]);
    let selections = vec![
        selection("CTL-A", Designation::Recommended),
        selection("CTL-A", Designation::Recommended),
        selection("CTL-MISSING", Designation::Required),
    ];

    let plan = derive_plan(RiskTier::Medium, &selections, &controls);

    assert_eq!(plan.monitored_signals.len(), 1);
    assert!(plan.monitored_signals[0].starts_with("Control CTL-A"));
}

#[test]
fn required_selections_add_the_implementation_trigger() {
    let controls = catalog_of(&[resolved_control("CTL-A", &["GOVERN-1.1"])]);

    let without = derive_plan(
        RiskTier::Low,
        &[selection("CTL-A", Designation::Recommended)],
        &controls,
    );
    assert!(!without
        .reassessment_triggers
        .iter()
        .any(|trigger| trigger.contains("required control")));

    let with = derive_plan(
        RiskTier::Low,
        &[selection("CTL-A", Designation::Required)],
        &controls,
    );
    assert!(with
        .reassessment_triggers
        .iter()
        .any(|trigger| trigger.contains("required control")));
}

#[test]
fn elevated_tiers_treat_every_incident_as_a_trigger() {
    let controls = catalog_of(&[]);

    let low = derive_plan(RiskTier::Medium, &[], &controls);
    assert!(!low
        .reassessment_triggers
        .iter()
        .any(|trigger| trigger.contains("incident")));

    let high = derive_plan(RiskTier::High, &[], &controls);
    assert!(high
        .reassessment_triggers
        .iter()
        .any(|trigger| trigger.contains("incident")));
}
