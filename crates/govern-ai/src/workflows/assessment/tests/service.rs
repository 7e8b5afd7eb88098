use super::common::{build_service, high_risk_answers, low_risk_answers, submission};
use crate::workflows::assessment::domain::{AssessmentId, Designation, RiskTier};
use crate::workflows::assessment::repository::{AssessmentRepository, RepositoryError};
use crate::workflows::assessment::service::AssessmentServiceError;

#[test]
fn submit_stores_a_record_without_a_result() {
    let (service, repository, _) = build_service();

    let record = service
        .submit(submission(low_risk_answers()))
        .expect("submission stored");

    assert!(record.result.is_none());
    let stored = repository
        .fetch(&record.assessment_id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.assessment_id, record.assessment_id);
}

#[test]
fn compute_persists_the_full_bundle() {
    let (service, repository, _) = build_service();
    let record = service
        .submit(submission(high_risk_answers()))
        .expect("submission stored");

    let result = service.compute(&record.assessment_id).expect("computes");

    assert!(!result.control_selections.is_empty());
    assert!(!result.framework_findings.is_empty());
    assert!(!result.risk_drivers.is_empty());

    let stored = repository
        .fetch(&record.assessment_id)
        .expect("fetch succeeds")
        .expect("record present")
        .result
        .expect("bundle persisted");
    assert_eq!(stored.risk_tier, result.risk_tier);
    assert_eq!(stored.control_selections, result.control_selections);
    assert_eq!(stored.framework_findings, result.framework_findings);
}

#[test]
fn recompute_replaces_the_bundle_and_stays_deterministic() {
    let (service, _, _) = build_service();
    let record = service
        .submit(submission(high_risk_answers()))
        .expect("submission stored");

    let first = service.compute(&record.assessment_id).expect("computes");
    let second = service.compute(&record.assessment_id).expect("recomputes");

    assert_eq!(first.risk_score, second.risk_score);
    assert_eq!(first.risk_tier, second.risk_tier);
    assert_eq!(first.risk_drivers, second.risk_drivers);
    assert_eq!(first.control_selections, second.control_selections);
    assert_eq!(first.framework_findings, second.framework_findings);
    assert_eq!(first.monitoring_plan, second.monitoring_plan);
}

#[test]
fn regulated_tier_publishes_exactly_one_escalation() {
    let (service, _, escalations) = build_service();
    let record = service
        .submit(submission(high_risk_answers()))
        .expect("submission stored");

    let result = service.compute(&record.assessment_id).expect("computes");
    assert_eq!(result.risk_tier, RiskTier::Regulated);

    let events = escalations.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].template, "regulated_tier_reached");
    assert_eq!(events[0].assessment_id, record.assessment_id);
}

#[test]
fn low_risk_computation_does_not_escalate() {
    let (service, _, escalations) = build_service();
    let record = service
        .submit(submission(low_risk_answers()))
        .expect("submission stored");

    let result = service.compute(&record.assessment_id).expect("computes");

    assert_eq!(result.risk_tier, RiskTier::Low);
    assert!(escalations.events().is_empty());
}

#[test]
fn compute_on_unknown_id_reports_not_found() {
    let (service, _, _) = build_service();

    let error = service
        .compute(&AssessmentId("asm-unknown".to_string()))
        .expect_err("unknown id rejected");

    assert!(matches!(
        error,
        AssessmentServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn high_risk_bundle_carries_required_obligations() {
    let (service, _, _) = build_service();
    let record = service
        .submit(submission(high_risk_answers()))
        .expect("submission stored");

    let result = service.compute(&record.assessment_id).expect("computes");

    // Full automation plus EU reach make oversight and conformity mandatory.
    for control_id in ["HUM-01", "EUA-01", "MON-01"] {
        let selection = result
            .control_selections
            .iter()
            .find(|selection| selection.control_id == control_id)
            .unwrap_or_else(|| panic!("{control_id} selected"));
        assert_eq!(selection.designation, Designation::Required, "{control_id}");
    }

    // The aws preference flows through to vendor-specific findings.
    assert!(result
        .framework_findings
        .iter()
        .any(|finding| finding.implementation_vendor.as_deref() == Some("aws")));
}
