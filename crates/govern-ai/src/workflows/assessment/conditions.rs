use super::domain::{Condition, ConditionGroup, ConditionOperator};
use super::facts::{FactContext, FactValue};

/// Evaluate one atomic condition against the fact context.
///
/// Total: unknown paths, shape mismatches, and unsupported operators all
/// evaluate to `false` rather than raising.
pub fn evaluate_condition(condition: &Condition, context: &FactContext) -> bool {
    let actual = context.resolve(&condition.field);
    let expected = condition.value.as_ref();

    match condition.operator {
        ConditionOperator::Eq => actual == expected,
        ConditionOperator::Neq => actual != expected,
        ConditionOperator::In => match (expected, actual) {
            (Some(FactValue::List(options)), Some(FactValue::Text(value))) => {
                options.iter().any(|option| option == value)
            }
            _ => false,
        },
        ConditionOperator::Contains => match (actual, expected) {
            (Some(FactValue::List(items)), Some(FactValue::Text(value))) => {
                items.iter().any(|item| item == value)
            }
            (Some(FactValue::Text(haystack)), Some(FactValue::Text(needle))) => {
                haystack.contains(needle.as_str())
            }
            _ => false,
        },
        ConditionOperator::Gte => match (numeric(actual), numeric(expected)) {
            (Some(actual), Some(expected)) => actual >= expected,
            _ => false,
        },
        ConditionOperator::Lte => match (numeric(actual), numeric(expected)) {
            (Some(actual), Some(expected)) => actual <= expected,
            _ => false,
        },
        ConditionOperator::Exists => value_exists(actual),
        ConditionOperator::NotExists => !value_exists(actual),
        ConditionOperator::Unknown => false,
    }
}

/// Combine atomic conditions with ALL/ANY semantics.
///
/// `all` takes precedence when both keys are present. An empty `all` list is
/// vacuously true; an empty `any` list is false; a group with neither key is
/// false.
pub fn evaluate_group(group: &ConditionGroup, context: &FactContext) -> bool {
    if let Some(all) = &group.all {
        return all
            .iter()
            .all(|condition| evaluate_condition(condition, context));
    }
    if let Some(any) = &group.any {
        return any
            .iter()
            .any(|condition| evaluate_condition(condition, context));
    }
    false
}

/// Per-type presence rule: arrays exist when non-empty; scalars exist unless
/// missing or literally `false`. Number zero and the empty string both count
/// as existing.
fn value_exists(value: Option<&FactValue>) -> bool {
    match value {
        None => false,
        Some(FactValue::List(items)) => !items.is_empty(),
        Some(FactValue::Flag(flag)) => *flag,
        Some(_) => true,
    }
}

fn numeric(value: Option<&FactValue>) -> Option<f64> {
    value.and_then(FactValue::as_number)
}
