use std::collections::HashMap;

use super::conditions::evaluate_group;
use super::domain::{ControlSelection, Rule};
use super::facts::FactContext;

/// Evaluate the rule catalog against a fact context and accumulate control
/// selections.
///
/// Rules run in ascending `priority` order (ties keep catalog order, which
/// fixes the first-seen ordering of `reasoning` and `rule_ids`). A control
/// touched by several rules keeps the highest designation seen; downgrades
/// never occur. The returned selections are in order of first match.
pub fn resolve_controls(context: &FactContext, rules: &[Rule]) -> Vec<ControlSelection> {
    let mut ordered: Vec<&Rule> = rules.iter().filter(|rule| rule.enabled).collect();
    ordered.sort_by_key(|rule| rule.priority);

    let mut selections: Vec<ControlSelection> = Vec::new();
    let mut index_by_control: HashMap<String, usize> = HashMap::new();

    for rule in ordered {
        if !evaluate_group(&rule.conditions, context) {
            continue;
        }

        let reason = rule
            .actions
            .explanation
            .clone()
            .unwrap_or_else(|| rule.name.clone());

        for control_id in &rule.actions.select_controls {
            match index_by_control.get(control_id) {
                Some(&index) => {
                    let selection = &mut selections[index];
                    selection.reasoning.push(reason.clone());
                    if !selection.rule_ids.contains(&rule.rule_id) {
                        selection.rule_ids.push(rule.rule_id.clone());
                    }
                    if rule.actions.designation > selection.designation {
                        selection.designation = rule.actions.designation;
                    }
                }
                None => {
                    index_by_control.insert(control_id.clone(), selections.len());
                    selections.push(ControlSelection {
                        control_id: control_id.clone(),
                        designation: rule.actions.designation,
                        reasoning: vec![reason.clone()],
                        rule_ids: vec![rule.rule_id.clone()],
                    });
                }
            }
        }
    }

    selections
}
