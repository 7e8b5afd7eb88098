use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::catalog::{ControlCatalog, RuleCatalog};
use super::domain::{AssessmentId, AssessmentSubmission, ComputedResult, RiskTier};
use super::facts::FactContext;
use super::mapper::map_findings;
use super::monitoring::derive_plan;
use super::repository::{
    AssessmentRecord, AssessmentRepository, EscalationError, EscalationPublisher, GovernanceAlert,
    RepositoryError,
};
use super::resolution::resolve_controls;
use super::scoring::score_answers;

/// Service composing the scorer, rule engine, and mapper over the active
/// catalogs. The decision stages themselves stay pure; this layer owns id
/// assignment, persistence, and escalation.
pub struct AssessmentService<R, E> {
    repository: Arc<R>,
    escalations: Arc<E>,
    rules: Arc<RuleCatalog>,
    controls: Arc<ControlCatalog>,
    default_vendor: Option<String>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asm-{id:06}"))
}

impl<R, E> AssessmentService<R, E>
where
    R: AssessmentRepository + 'static,
    E: EscalationPublisher + 'static,
{
    pub fn new(
        repository: Arc<R>,
        escalations: Arc<E>,
        rules: RuleCatalog,
        controls: ControlCatalog,
    ) -> Self {
        Self {
            repository,
            escalations,
            rules: Arc::new(rules),
            controls: Arc::new(controls),
            default_vendor: None,
        }
    }

    /// Fallback cloud vendor applied when the questionnaire names none.
    pub fn with_default_vendor(mut self, vendor: Option<String>) -> Self {
        self.default_vendor = vendor;
        self
    }

    /// Store a new submission, returning the repository-backed record.
    pub fn submit(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = AssessmentRecord {
            assessment_id: next_assessment_id(),
            submission,
            result: None,
        };
        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Run the three-stage computation and persist the bundle wholesale.
    ///
    /// Safe to invoke repeatedly: identical answers and catalogs reproduce an
    /// identical bundle (up to `computed_at`), and the stored result is
    /// replaced, never merged.
    pub fn compute(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<ComputedResult, AssessmentServiceError> {
        let mut record = self
            .repository
            .fetch(assessment_id)?
            .ok_or(RepositoryError::NotFound)?;

        let result = self.compute_bundle(&record.submission);
        record.result = Some(result.clone());
        self.repository.update(record)?;

        if result.risk_tier == RiskTier::Regulated {
            let mut details = BTreeMap::new();
            details.insert("tier".to_string(), result.risk_tier.label().to_string());
            details.insert("score".to_string(), result.risk_score.to_string());
            self.escalations.publish(GovernanceAlert {
                template: "regulated_tier_reached".to_string(),
                assessment_id: assessment_id.clone(),
                details,
            })?;
        }

        info!(
            assessment_id = %assessment_id.0,
            tier = result.risk_tier.label(),
            score = result.risk_score,
            selections = result.control_selections.len(),
            findings = result.framework_findings.len(),
            "assessment computed"
        );

        Ok(result)
    }

    /// Fetch an assessment record for API responses.
    pub fn get(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(assessment_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// The pure computation pipeline, independent of persistence.
    pub fn compute_bundle(&self, submission: &AssessmentSubmission) -> ComputedResult {
        let risk = score_answers(&submission.answers);
        let context = FactContext::from_assessment(submission.subject, &submission.answers, &risk);
        let selections = resolve_controls(&context, &self.rules.rules);

        let vendor = submission
            .answers
            .text("deployment", "preferred_vendor")
            .or(self.default_vendor.as_deref());
        let resolved = self.controls.resolved_for_vendor(vendor);
        let findings = map_findings(&selections, &resolved);
        let monitoring_plan = derive_plan(risk.tier, &selections, &resolved);

        ComputedResult {
            risk_tier: risk.tier,
            risk_score: risk.score,
            risk_drivers: risk.drivers,
            control_selections: selections,
            framework_findings: findings,
            monitoring_plan,
            computed_at: Utc::now(),
        }
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Escalation(#[from] EscalationError),
}
