use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{AnswerSet, RiskScoreOutcome, SubjectKind};

/// Value stored at one fact path.
///
/// Deserialization is untagged so operator-supplied catalogs can write plain
/// JSON literals for condition values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, FactValue>),
}

impl FactValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FactValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Text(value.to_string())
    }
}

impl From<f64> for FactValue {
    fn from(value: f64) -> Self {
        FactValue::Number(value)
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        FactValue::Flag(value)
    }
}

impl From<Vec<String>> for FactValue {
    fn from(value: Vec<String>) -> Self {
        FactValue::List(value)
    }
}

/// Immutable snapshot of facts evaluated by the rule engine.
///
/// Built once per computation run; rules receive it by reference and never
/// mutate it. The whole snapshot serializes to JSON for audit trails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactContext {
    root: BTreeMap<String, FactValue>,
}

impl FactContext {
    pub fn builder() -> FactContextBuilder {
        FactContextBuilder::default()
    }

    /// Walk a dotted path through nested maps.
    ///
    /// Any missing or non-map intermediate short-circuits to `None`, so rules
    /// referencing unknown fields fail closed instead of failing the run.
    pub fn resolve(&self, path: &str) -> Option<&FactValue> {
        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            match current {
                FactValue::Map(map) => current = map.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Assemble the whitelisted fact snapshot for one computation run.
    pub fn from_assessment(
        subject: SubjectKind,
        answers: &AnswerSet,
        risk: &RiskScoreOutcome,
    ) -> Self {
        let mut builder = Self::builder()
            .set("subject.kind", subject.label())
            .set("risk.tier", risk.tier.label())
            .set("risk.score", f64::from(risk.score));

        let categories = answers
            .list("data_profile", "categories")
            .unwrap_or_default();
        let regulated = categories
            .iter()
            .any(|category| matches!(category.as_str(), "phi" | "financial" | "biometric"));
        builder = builder
            .set("data.categories", categories)
            .set("data.regulated", regulated);

        if let Some(autonomy) = answers.text("system_profile", "autonomy") {
            builder = builder.set("system.autonomy", autonomy);
        }
        if let Some(exposure) = answers.text("system_profile", "exposure") {
            builder = builder.set("system.exposure", exposure);
        }
        if let Some(users) = answers.number("system_profile", "monthly_active_users") {
            builder = builder.set("system.monthly_active_users", users);
        }
        if let Some(source) = answers.text("system_profile", "model_source") {
            builder = builder.set("system.model_source", source);
        }

        for question in ["ai_policy", "model_inventory", "incident_response"] {
            if let Some(flag) = answers.flag("governance", question) {
                builder = builder.set(&format!("governance.{question}"), flag);
            }
        }

        if let Some(jurisdictions) = answers.list("deployment", "jurisdictions") {
            builder = builder.set("deployment.jurisdictions", jurisdictions);
        }
        if let Some(vendor) = answers.text("deployment", "preferred_vendor") {
            builder = builder.set("deployment.preferred_vendor", vendor);
        }

        builder.build()
    }
}

/// Builder assembling the nested fact record at one boundary.
///
/// Dotted paths create intermediate maps; a scalar already stored at an
/// intermediate segment is replaced by a map, keeping the builder total.
#[derive(Debug, Default)]
pub struct FactContextBuilder {
    root: BTreeMap<String, FactValue>,
}

impl FactContextBuilder {
    pub fn set(mut self, path: &str, value: impl Into<FactValue>) -> Self {
        let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return self;
        }
        insert_at(&mut self.root, &segments, value.into());
        self
    }

    pub fn build(self) -> FactContext {
        FactContext { root: self.root }
    }
}

fn insert_at(map: &mut BTreeMap<String, FactValue>, segments: &[&str], value: FactValue) {
    let (head, rest) = match segments.split_first() {
        Some(parts) => parts,
        None => return,
    };

    if rest.is_empty() {
        map.insert(head.to_string(), value);
        return;
    }

    let slot = map
        .entry(head.to_string())
        .or_insert_with(|| FactValue::Map(BTreeMap::new()));
    if !matches!(slot, FactValue::Map(_)) {
        *slot = FactValue::Map(BTreeMap::new());
    }
    if let FactValue::Map(inner) = slot {
        insert_at(inner, rest, value);
    }
}
