use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::facts::FactValue;

/// Identifier wrapper for submitted assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Whether an assessment covers the organization as a whole or a single AI product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Organization,
    Product,
}

impl SubjectKind {
    pub const fn label(self) -> &'static str {
        match self {
            SubjectKind::Organization => "organization",
            SubjectKind::Product => "product",
        }
    }
}

/// Raw questionnaire answers keyed by step identifier, then question key.
///
/// Values arrive as arbitrary JSON from the wizard UI; the typed accessors
/// degrade to `None` on any shape mismatch rather than failing the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerSet(pub BTreeMap<String, BTreeMap<String, Value>>);

impl AnswerSet {
    pub fn text(&self, step: &str, question: &str) -> Option<&str> {
        self.raw(step, question).and_then(Value::as_str)
    }

    pub fn flag(&self, step: &str, question: &str) -> Option<bool> {
        self.raw(step, question).and_then(Value::as_bool)
    }

    pub fn number(&self, step: &str, question: &str) -> Option<f64> {
        self.raw(step, question).and_then(Value::as_f64)
    }

    /// String entries of an array answer; non-string entries are skipped.
    pub fn list(&self, step: &str, question: &str) -> Option<Vec<String>> {
        let items = self.raw(step, question)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        )
    }

    fn raw(&self, step: &str, question: &str) -> Option<&Value> {
        self.0.get(step).and_then(|step| step.get(question))
    }
}

/// Inbound request to assess a subject against the active catalogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub subject: SubjectKind,
    pub answers: AnswerSet,
}

/// Obligation level attached to a selected control.
///
/// Variant order carries the upgrade ranking: a selection touched by several
/// rules keeps the highest designation and never downgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Designation {
    Optional,
    Recommended,
    Required,
}

impl Designation {
    pub const fn label(self) -> &'static str {
        match self {
            Designation::Optional => "OPTIONAL",
            Designation::Recommended => "RECOMMENDED",
            Designation::Required => "REQUIRED",
        }
    }
}

/// Discrete risk classification derived from the numeric score and override rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Regulated,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
            RiskTier::Regulated => "REGULATED",
        }
    }
}

/// Comparison operator of an atomic rule condition.
///
/// `Unknown` absorbs operator strings this engine does not support so that a
/// newer catalog degrades to a non-matching condition instead of a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Eq,
    Neq,
    In,
    Contains,
    Gte,
    Lte,
    Exists,
    NotExists,
    #[serde(other)]
    Unknown,
}

/// One atomic predicate over a fact-context path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FactValue>,
}

/// Conjunction (`all`) or disjunction (`any`) of atomic conditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<Condition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any: Option<Vec<Condition>>,
}

/// What a matching rule contributes to the accumulated selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleActions {
    pub select_controls: Vec<String>,
    pub designation: Designation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One declarative catalog rule mapping fact conditions to control selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub rule_id: String,
    pub name: String,
    /// Lower values are evaluated earlier; ties keep catalog order.
    pub priority: i32,
    pub conditions: ConditionGroup,
    pub actions: RuleActions,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Accumulated outcome for a single control across all matching rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSelection {
    pub control_id: String,
    pub designation: Designation,
    /// One entry per contributing rule, in evaluation order.
    pub reasoning: Vec<String>,
    /// Contributing rule ids, deduplicated, in first-seen order.
    pub rule_ids: Vec<String>,
}

/// Cloud-vendor specific implementation guidance attached to a catalog control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorGuidance {
    pub service: String,
    pub description: String,
    pub steps: Vec<String>,
}

/// Read-only reference data describing one governance control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlCatalogEntry {
    pub control_id: String,
    pub name: String,
    pub description: String,
    pub implementation_steps: Vec<String>,
    pub implementation_level: String,
    pub control_type: String,
    pub framework_refs: Vec<String>,
    pub evidence_artifacts: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vendor_guidance: BTreeMap<String, VendorGuidance>,
}

/// Catalog entry after the caller applied any vendor guidance overlay.
///
/// The mapper copies these fields verbatim; vendor selection never happens
/// inside the mapper itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedControl {
    pub control_id: String,
    pub name: String,
    pub description: String,
    pub implementation_steps: Vec<String>,
    pub implementation_level: String,
    pub control_type: String,
    pub framework_refs: Vec<String>,
    pub evidence_artifacts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_service: Option<String>,
}

/// One (control, framework reference) pair emitted for compliance reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkFinding {
    pub finding: String,
    pub framework_ref: String,
    pub control_id: String,
    pub control_name: String,
    pub designation: Designation,
    pub evidence: Vec<String>,
    pub description: String,
    pub implementation_steps: Vec<String>,
    pub implementation_level: String,
    pub control_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_service: Option<String>,
}

/// Factors permitted to contribute to the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorKind {
    DataSensitivity,
    SystemAutonomy,
    DeploymentExposure,
    UserScale,
    ModelProvenance,
    GovernanceMaturity,
    JurisdictionalScope,
}

/// Signed contribution of one factor, retained for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDriver {
    pub factor: RiskFactorKind,
    pub contribution: i16,
    pub explanation: String,
}

/// Score, tier, and per-factor drivers produced by the scoring stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreOutcome {
    pub tier: RiskTier,
    pub score: i16,
    pub drivers: Vec<RiskDriver>,
}

/// Review cadence attached to the derived monitoring plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewCadence {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl ReviewCadence {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewCadence::Monthly => "monthly",
            ReviewCadence::Quarterly => "quarterly",
            ReviewCadence::SemiAnnual => "semi_annual",
            ReviewCadence::Annual => "annual",
        }
    }
}

/// Ongoing-oversight plan derived from the tier and resolved control set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringPlan {
    pub review_cadence: ReviewCadence,
    pub monitored_signals: Vec<String>,
    pub reassessment_triggers: Vec<String>,
}

/// The full governance artifact bundle persisted per computation run.
///
/// Replaced wholesale on recompute; callers that carry fields forward do so
/// before persisting, never by mutating a stored bundle in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedResult {
    pub risk_tier: RiskTier,
    pub risk_score: i16,
    pub risk_drivers: Vec<RiskDriver>,
    pub control_selections: Vec<ControlSelection>,
    pub framework_findings: Vec<FrameworkFinding>,
    pub monitoring_plan: MonitoringPlan,
    pub computed_at: DateTime<Utc>,
}
