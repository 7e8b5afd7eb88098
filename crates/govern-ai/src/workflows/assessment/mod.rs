//! AI-governance assessment intake, decision core, and reporting.
//!
//! The decision core is three composable, pure stages: risk scoring over raw
//! answers, rule resolution over the assembled fact context, and the
//! control-to-framework fan-out. The service module composes them over the
//! active catalogs and owns persistence and escalation; everything inside the
//! stages is total and side-effect free.

pub mod catalog;
pub(crate) mod conditions;
pub mod domain;
pub mod export;
pub mod facts;
pub(crate) mod mapper;
pub(crate) mod monitoring;
pub mod repository;
pub(crate) mod resolution;
pub mod router;
pub(crate) mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, ControlCatalog, RuleCatalog};
pub use conditions::{evaluate_condition, evaluate_group};
pub use domain::{
    AnswerSet, AssessmentId, AssessmentSubmission, ComputedResult, Condition, ConditionGroup,
    ConditionOperator, ControlCatalogEntry, ControlSelection, Designation, FrameworkFinding,
    MonitoringPlan, ResolvedControl, ReviewCadence, RiskDriver, RiskFactorKind, RiskScoreOutcome,
    RiskTier, Rule, RuleActions, SubjectKind, VendorGuidance,
};
pub use export::write_findings_csv;
pub use facts::{FactContext, FactContextBuilder, FactValue};
pub use mapper::map_findings;
pub use monitoring::derive_plan;
pub use repository::{
    AssessmentRecord, AssessmentRepository, AssessmentStatusView, EscalationError,
    EscalationPublisher, GovernanceAlert, RepositoryError,
};
pub use resolution::resolve_controls;
pub use router::assessment_router;
pub use scoring::score_answers;
pub use service::{AssessmentService, AssessmentServiceError};
