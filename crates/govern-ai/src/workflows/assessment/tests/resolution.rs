use super::common::{all_group, any_group, condition, context, rule};
use crate::workflows::assessment::domain::{ConditionGroup, ConditionOperator, Designation};
use crate::workflows::assessment::facts::{FactContext, FactValue};
use crate::workflows::assessment::resolution::resolve_controls;

fn high_tier_context() -> FactContext {
    context(&[("risk.tier", FactValue::from("HIGH"))])
}

fn tier_is_high() -> ConditionGroup {
    all_group(vec![condition(
        "risk.tier",
        ConditionOperator::Eq,
        Some(FactValue::from("HIGH")),
    )])
}

#[test]
fn later_required_rule_upgrades_an_optional_selection() {
    let ctx = high_tier_context();
    let rules = vec![
        rule("R-OPT", 100, tier_is_high(), &["CTL-X"], Designation::Optional),
        rule("R-REQ", 90, tier_is_high(), &["CTL-X"], Designation::Required),
    ];

    let selections = resolve_controls(&ctx, &rules);

    assert_eq!(selections.len(), 1);
    let selection = &selections[0];
    assert_eq!(selection.control_id, "CTL-X");
    assert_eq!(selection.designation, Designation::Required);
    // Priority 90 ran first, so its id leads the contribution list.
    assert_eq!(selection.rule_ids, vec!["R-REQ", "R-OPT"]);
    assert_eq!(selection.reasoning.len(), 2);
}

#[test]
fn designation_never_downgrades() {
    let ctx = high_tier_context();
    let rules = vec![
        rule("R-REQ", 10, tier_is_high(), &["CTL-X"], Designation::Required),
        rule("R-OPT", 20, tier_is_high(), &["CTL-X"], Designation::Optional),
    ];

    let selections = resolve_controls(&ctx, &rules);

    assert_eq!(selections[0].designation, Designation::Required);
    assert_eq!(selections[0].rule_ids, vec!["R-REQ", "R-OPT"]);
}

#[test]
fn disabled_rules_never_contribute() {
    let ctx = high_tier_context();
    let mut disabled = rule("R-OFF", 1, tier_is_high(), &["CTL-X"], Designation::Required);
    disabled.enabled = false;
    let rules = vec![
        disabled,
        rule("R-ON", 2, tier_is_high(), &["CTL-Y"], Designation::Optional),
    ];

    let selections = resolve_controls(&ctx, &rules);

    assert_eq!(selections.len(), 1);
    assert_eq!(selections[0].control_id, "CTL-Y");
}

#[test]
fn non_matching_rules_are_skipped() {
    let ctx = high_tier_context();
    let rules = vec![
        rule(
            "R-LOW",
            1,
            all_group(vec![condition(
                "risk.tier",
                ConditionOperator::Eq,
                Some(FactValue::from("LOW")),
            )]),
            &["CTL-A"],
            Designation::Required,
        ),
        rule("R-HIGH", 2, tier_is_high(), &["CTL-B"], Designation::Required),
    ];

    let selections = resolve_controls(&ctx, &rules);

    assert_eq!(selections.len(), 1);
    assert_eq!(selections[0].control_id, "CTL-B");
}

#[test]
fn selections_keep_first_match_order() {
    let ctx = high_tier_context();
    let rules = vec![
        rule("R-2", 20, tier_is_high(), &["CTL-B", "CTL-C"], Designation::Optional),
        rule("R-1", 10, tier_is_high(), &["CTL-A", "CTL-B"], Designation::Optional),
    ];

    let selections = resolve_controls(&ctx, &rules);

    let order: Vec<&str> = selections
        .iter()
        .map(|selection| selection.control_id.as_str())
        .collect();
    assert_eq!(order, vec!["CTL-A", "CTL-B", "CTL-C"]);
}

#[test]
fn equal_priority_rules_keep_catalog_order() {
    let ctx = high_tier_context();
    let rules = vec![
        rule("R-FIRST", 50, tier_is_high(), &["CTL-X"], Designation::Optional),
        rule("R-SECOND", 50, tier_is_high(), &["CTL-X"], Designation::Optional),
    ];

    let selections = resolve_controls(&ctx, &rules);

    assert_eq!(selections[0].rule_ids, vec!["R-FIRST", "R-SECOND"]);
}

#[test]
fn explanation_falls_back_to_the_rule_name() {
    let ctx = high_tier_context();
    let mut explained = rule("R-EXP", 1, tier_is_high(), &["CTL-X"], Designation::Required);
    explained.actions.explanation = Some("tier demands it".to_string());
    let named = rule("R-NAMED", 2, tier_is_high(), &["CTL-X"], Designation::Optional);

    let selections = resolve_controls(&ctx, &[explained, named]);

    assert_eq!(
        selections[0].reasoning,
        vec!["tier demands it".to_string(), "rule R-NAMED".to_string()]
    );
}

#[test]
fn resolution_is_idempotent_including_ordering() {
    let ctx = high_tier_context();
    let rules = vec![
        rule("R-1", 10, tier_is_high(), &["CTL-A", "CTL-B"], Designation::Recommended),
        rule("R-2", 10, any_group(vec![condition(
            "risk.tier",
            ConditionOperator::In,
            Some(FactValue::List(vec!["HIGH".to_string(), "REGULATED".to_string()])),
        )]), &["CTL-B"], Designation::Required),
        rule("R-3", 30, tier_is_high(), &["CTL-C"], Designation::Optional),
    ];

    let first = resolve_controls(&ctx, &rules);
    let second = resolve_controls(&ctx, &rules);

    assert_eq!(first, second);
}

#[test]
fn empty_rule_set_produces_no_selections() {
    let ctx = high_tier_context();
    assert!(resolve_controls(&ctx, &[]).is_empty());
}
