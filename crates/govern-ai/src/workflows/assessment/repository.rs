use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{AssessmentId, AssessmentSubmission, ComputedResult};

/// Repository record containing the submission and the latest computed bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub assessment_id: AssessmentId,
    pub submission: AssessmentSubmission,
    pub result: Option<ComputedResult>,
}

impl AssessmentRecord {
    pub fn status_view(&self) -> AssessmentStatusView {
        AssessmentStatusView {
            assessment_id: self.assessment_id.clone(),
            subject: self.submission.subject.label(),
            risk_tier: self
                .result
                .as_ref()
                .map(|result| result.risk_tier.label()),
            risk_score: self.result.as_ref().map(|result| result.risk_score),
            computed: self.result.is_some(),
        }
    }
}

/// Sanitized representation of an assessment's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStatusView {
    pub assessment_id: AssessmentId,
    pub subject: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_tier: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<i16>,
    pub computed: bool,
}

/// Storage abstraction so the service module can be exercised in isolation.
///
/// `update` carries upsert-the-whole-record semantics: recompute replaces the
/// stored bundle wholesale rather than merging into it.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound escalation hook notified when a computation lands in the
/// regulated tier.
pub trait EscalationPublisher: Send + Sync {
    fn publish(&self, alert: GovernanceAlert) -> Result<(), EscalationError>;
}

/// Alert payload handed to the escalation transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceAlert {
    pub template: String,
    pub assessment_id: AssessmentId,
    pub details: BTreeMap<String, String>,
}

/// Escalation dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum EscalationError {
    #[error("escalation transport unavailable: {0}")]
    Transport(String),
}
