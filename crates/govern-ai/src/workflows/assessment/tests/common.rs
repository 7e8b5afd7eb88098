use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::workflows::assessment::catalog::{ControlCatalog, RuleCatalog};
use crate::workflows::assessment::domain::{
    AnswerSet, AssessmentId, AssessmentSubmission, Condition, ConditionGroup, ConditionOperator,
    Designation, ResolvedControl, Rule, RuleActions, SubjectKind,
};
use crate::workflows::assessment::facts::{FactContext, FactValue};
use crate::workflows::assessment::repository::{
    AssessmentRecord, AssessmentRepository, EscalationError, EscalationPublisher, GovernanceAlert,
    RepositoryError,
};
use crate::workflows::assessment::router::assessment_router;
use crate::workflows::assessment::service::AssessmentService;

pub(super) fn answers(entries: &[(&str, &str, Value)]) -> AnswerSet {
    let mut steps: BTreeMap<String, BTreeMap<String, Value>> = BTreeMap::new();
    for (step, question, value) in entries {
        steps
            .entry(step.to_string())
            .or_default()
            .insert(question.to_string(), value.clone());
    }
    AnswerSet(steps)
}

/// Public chatbot on a third-party model, regulated data, EU reach.
pub(super) fn high_risk_answers() -> AnswerSet {
    answers(&[
        ("data_profile", "categories", json!(["pii", "phi"])),
        ("system_profile", "autonomy", json!("full_automation")),
        ("system_profile", "exposure", json!("public")),
        ("system_profile", "monthly_active_users", json!(250_000)),
        ("system_profile", "model_source", json!("third_party")),
        ("governance", "ai_policy", json!(false)),
        ("deployment", "jurisdictions", json!(["us", "eu"])),
        ("deployment", "preferred_vendor", json!("aws")),
    ])
}

/// Internal advisory tool with mature governance.
pub(super) fn low_risk_answers() -> AnswerSet {
    answers(&[
        ("data_profile", "categories", json!(["none"])),
        ("system_profile", "autonomy", json!("advisory")),
        ("system_profile", "exposure", json!("internal")),
        ("system_profile", "monthly_active_users", json!(40)),
        ("system_profile", "model_source", json!("in_house")),
        ("governance", "ai_policy", json!(true)),
        ("governance", "model_inventory", json!(true)),
        ("governance", "incident_response", json!(true)),
        ("deployment", "jurisdictions", json!(["us"])),
    ])
}

pub(super) fn submission(answers: AnswerSet) -> AssessmentSubmission {
    AssessmentSubmission {
        subject: SubjectKind::Product,
        answers,
    }
}

pub(super) fn context(entries: &[(&str, FactValue)]) -> FactContext {
    let mut builder = FactContext::builder();
    for (path, value) in entries {
        builder = builder.set(path, value.clone());
    }
    builder.build()
}

pub(super) fn condition(
    field: &str,
    operator: ConditionOperator,
    value: Option<FactValue>,
) -> Condition {
    Condition {
        field: field.to_string(),
        operator,
        value,
    }
}

pub(super) fn all_group(conditions: Vec<Condition>) -> ConditionGroup {
    ConditionGroup {
        all: Some(conditions),
        any: None,
    }
}

pub(super) fn any_group(conditions: Vec<Condition>) -> ConditionGroup {
    ConditionGroup {
        all: None,
        any: Some(conditions),
    }
}

pub(super) fn rule(
    rule_id: &str,
    priority: i32,
    conditions: ConditionGroup,
    controls: &[&str],
    designation: Designation,
) -> Rule {
    Rule {
        rule_id: rule_id.to_string(),
        name: format!("rule {rule_id}"),
        priority,
        conditions,
        actions: RuleActions {
            select_controls: controls.iter().map(|id| id.to_string()).collect(),
            designation,
            explanation: None,
        },
        enabled: true,
    }
}

pub(super) fn resolved_control(control_id: &str, framework_refs: &[&str]) -> ResolvedControl {
    ResolvedControl {
        control_id: control_id.to_string(),
        name: format!("Control {control_id}"),
        description: "generic description".to_string(),
        implementation_steps: vec!["step one".to_string()],
        implementation_level: "system".to_string(),
        control_type: "technical".to_string(),
        framework_refs: framework_refs.iter().map(|r| r.to_string()).collect(),
        evidence_artifacts: vec!["artifact".to_string()],
        implementation_vendor: None,
        implementation_service: None,
    }
}

pub(super) fn catalog_of(
    controls: &[ResolvedControl],
) -> BTreeMap<String, ResolvedControl> {
    controls
        .iter()
        .map(|control| (control.control_id.clone(), control.clone()))
        .collect()
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryRepository, MemoryEscalations>,
    Arc<MemoryRepository>,
    Arc<MemoryEscalations>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let escalations = Arc::new(MemoryEscalations::default());
    let service = AssessmentService::new(
        repository.clone(),
        escalations.clone(),
        RuleCatalog::standard(),
        ControlCatalog::standard(),
    );
    (service, repository, escalations)
}

pub(super) fn assessment_router_with_service(
    service: AssessmentService<MemoryRepository, MemoryEscalations>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.assessment_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.assessment_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.assessment_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryEscalations {
    events: Arc<Mutex<Vec<GovernanceAlert>>>,
}

impl MemoryEscalations {
    pub(super) fn events(&self) -> Vec<GovernanceAlert> {
        self.events.lock().expect("escalation mutex poisoned").clone()
    }
}

impl EscalationPublisher for MemoryEscalations {
    fn publish(&self, alert: GovernanceAlert) -> Result<(), EscalationError> {
        self.events
            .lock()
            .expect("escalation mutex poisoned")
            .push(alert);
        Ok(())
    }
}
