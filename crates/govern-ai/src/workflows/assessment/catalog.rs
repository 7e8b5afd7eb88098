use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    Condition, ConditionGroup, ConditionOperator, ControlCatalogEntry, Designation, ResolvedControl,
    Rule, RuleActions, VendorGuidance,
};
use super::facts::FactValue;

/// Error raised while loading an operator-supplied catalog document.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("catalog contains duplicate id '{0}'")]
    DuplicateId(String),
}

/// Versioned set of declarative rules evaluated per computation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCatalog {
    pub version: String,
    pub rules: Vec<Rule>,
}

impl RuleCatalog {
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(raw)?;
        let mut seen = BTreeMap::new();
        for rule in &catalog.rules {
            if seen.insert(rule.rule_id.clone(), ()).is_some() {
                return Err(CatalogError::DuplicateId(rule.rule_id.clone()));
            }
        }
        Ok(catalog)
    }

    /// The built-in seed rule set shipped with the service.
    pub fn standard() -> Self {
        Self {
            version: "2025.3".to_string(),
            rules: vec![
                rule(
                    "R-BASELINE",
                    "Baseline governance posture",
                    10,
                    ConditionGroup {
                        all: Some(Vec::new()),
                        any: None,
                    },
                    &["GOV-01", "GOV-02"],
                    Designation::Recommended,
                    Some("Every assessed subject maintains a baseline governance posture"),
                ),
                rule(
                    "R-TIER-ELEVATED",
                    "Elevated risk tier",
                    20,
                    all(vec![cond_in("risk.tier", &["HIGH", "REGULATED"])]),
                    &["GOV-01", "RSK-01"],
                    Designation::Required,
                    Some("Elevated risk tier requires formal governance and recurring risk review"),
                ),
                rule(
                    "R-TIER-MEDIUM",
                    "Medium risk tier",
                    21,
                    all(vec![cond_eq("risk.tier", "MEDIUM")]),
                    &["RSK-01"],
                    Designation::Recommended,
                    Some("Medium risk tier benefits from a recurring risk review"),
                ),
                rule(
                    "R-REGULATED-DATA",
                    "Regulated data categories",
                    30,
                    all(vec![cond_eq_flag("data.regulated", true)]),
                    &["DAT-01", "DAT-02"],
                    Designation::Required,
                    Some("Regulated data categories require protection safeguards and a privacy impact assessment"),
                ),
                rule(
                    "R-PERSONAL-DATA",
                    "Personal data processing",
                    31,
                    all(vec![cond_contains("data.categories", "pii")]),
                    &["DAT-02"],
                    Designation::Recommended,
                    Some("Personal data processing warrants a privacy impact assessment"),
                ),
                rule(
                    "R-FULL-AUTOMATION",
                    "Fully automated decisions",
                    40,
                    all(vec![cond_eq("system.autonomy", "full_automation")]),
                    &["HUM-01", "MON-01"],
                    Designation::Required,
                    Some("Unsupervised automation requires oversight checkpoints and continuous monitoring"),
                ),
                rule(
                    "R-HUMAN-IN-LOOP",
                    "Human-in-the-loop decisions",
                    41,
                    all(vec![cond_eq("system.autonomy", "human_in_loop")]),
                    &["HUM-01"],
                    Designation::Recommended,
                    None,
                ),
                rule(
                    "R-PUBLIC-EXPOSURE",
                    "Public-facing deployment",
                    50,
                    all(vec![cond_eq("system.exposure", "public")]),
                    &["TRN-01"],
                    Designation::Required,
                    Some("Public-facing AI systems must disclose automated interaction"),
                ),
                rule(
                    "R-EXTERNAL-MODEL",
                    "External model provenance",
                    60,
                    all(vec![cond_in(
                        "system.model_source",
                        &["third_party", "fine_tuned"],
                    )]),
                    &["VND-01"],
                    Designation::Required,
                    Some("Externally sourced models require a documented vendor evaluation"),
                ),
                rule(
                    "R-EU-JURISDICTION",
                    "EU jurisdiction",
                    70,
                    all(vec![cond_contains("deployment.jurisdictions", "eu")]),
                    &["EUA-01", "TRN-01"],
                    Designation::Required,
                    Some("EU operation requires an AI Act conformity review and user disclosure"),
                ),
                rule(
                    "R-NO-INCIDENT-RESPONSE",
                    "Missing incident response",
                    80,
                    all(vec![cond(
                        "governance.incident_response",
                        ConditionOperator::NotExists,
                        None,
                    )]),
                    &["INC-01"],
                    Designation::Required,
                    Some("No AI incident response practice on record"),
                ),
                rule(
                    "R-USER-SCALE",
                    "Significant user scale",
                    90,
                    all(vec![cond(
                        "system.monthly_active_users",
                        ConditionOperator::Gte,
                        Some(FactValue::Number(10_000.0)),
                    )]),
                    &["LOG-01", "MON-01"],
                    Designation::Recommended,
                    Some("Significant user scale warrants decision logging and monitoring"),
                ),
                rule(
                    "R-LOGGING-BASELINE",
                    "Audit logging baseline",
                    100,
                    ConditionGroup {
                        all: Some(Vec::new()),
                        any: None,
                    },
                    &["LOG-01"],
                    Designation::Optional,
                    None,
                ),
            ],
        }
    }
}

/// Versioned reference data for all known controls, keyed by control id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlCatalog {
    pub version: String,
    pub controls: Vec<ControlCatalogEntry>,
}

impl ControlCatalog {
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(raw)?;
        let mut seen = BTreeMap::new();
        for control in &catalog.controls {
            if seen.insert(control.control_id.clone(), ()).is_some() {
                return Err(CatalogError::DuplicateId(control.control_id.clone()));
            }
        }
        Ok(catalog)
    }

    /// Apply the preferred-vendor guidance overlay, producing the view the
    /// mapper consumes. Controls without guidance for `vendor` keep their
    /// generic description and steps.
    pub fn resolved_for_vendor(&self, vendor: Option<&str>) -> BTreeMap<String, ResolvedControl> {
        self.controls
            .iter()
            .map(|entry| {
                let overlay = vendor.and_then(|vendor| entry.vendor_guidance.get(vendor));
                let resolved = match overlay {
                    Some(guidance) => ResolvedControl {
                        control_id: entry.control_id.clone(),
                        name: entry.name.clone(),
                        description: guidance.description.clone(),
                        implementation_steps: guidance.steps.clone(),
                        implementation_level: entry.implementation_level.clone(),
                        control_type: entry.control_type.clone(),
                        framework_refs: entry.framework_refs.clone(),
                        evidence_artifacts: entry.evidence_artifacts.clone(),
                        implementation_vendor: vendor.map(str::to_string),
                        implementation_service: Some(guidance.service.clone()),
                    },
                    None => ResolvedControl {
                        control_id: entry.control_id.clone(),
                        name: entry.name.clone(),
                        description: entry.description.clone(),
                        implementation_steps: entry.implementation_steps.clone(),
                        implementation_level: entry.implementation_level.clone(),
                        control_type: entry.control_type.clone(),
                        framework_refs: entry.framework_refs.clone(),
                        evidence_artifacts: entry.evidence_artifacts.clone(),
                        implementation_vendor: None,
                        implementation_service: None,
                    },
                };
                (entry.control_id.clone(), resolved)
            })
            .collect()
    }

    /// The built-in seed control set shipped with the service.
    pub fn standard() -> Self {
        Self {
            version: "2025.3".to_string(),
            controls: vec![
                control(
                    "GOV-01",
                    "AI Governance Policy",
                    "Documented organizational policy covering acceptable AI use, accountability, and review cadence.",
                    &[
                        "Draft and ratify an organization-wide AI use policy",
                        "Assign an accountable owner for AI governance",
                        "Schedule an annual policy review",
                    ],
                    "organizational",
                    "administrative",
                    &["GOVERN-1.1", "GOVERN-1.2"],
                    &["Ratified policy document", "Review meeting minutes"],
                    BTreeMap::new(),
                ),
                control(
                    "GOV-02",
                    "AI System Inventory",
                    "Maintained register of deployed AI systems with owners, purposes, and data categories.",
                    &[
                        "Enumerate deployed and in-development AI systems",
                        "Record owner, purpose, and data categories per system",
                        "Review the register quarterly",
                    ],
                    "organizational",
                    "administrative",
                    &["GOVERN-1.6", "MAP-1.3"],
                    &["System register export"],
                    BTreeMap::new(),
                ),
                control(
                    "RSK-01",
                    "Recurring Risk Review",
                    "Scheduled reassessment of AI risk posture with documented sign-off.",
                    &[
                        "Define the review cadence appropriate to the risk tier",
                        "Reassess against the current questionnaire",
                        "Record sign-off from the accountable owner",
                    ],
                    "organizational",
                    "administrative",
                    &["MAP-1.1", "MEASURE-1.1"],
                    &["Signed review record"],
                    BTreeMap::new(),
                ),
                control(
                    "DAT-01",
                    "Sensitive Data Safeguards",
                    "Encryption, access control, and minimization for regulated data used by AI systems.",
                    &[
                        "Classify data flows feeding the system",
                        "Encrypt regulated data at rest and in transit",
                        "Restrict access by role and log every access",
                    ],
                    "system",
                    "technical",
                    &["MAP-2.2", "MANAGE-2.1"],
                    &["Data flow diagram", "Access control matrix"],
                    vendor_overlays(&[
                        (
                            "aws",
                            "AWS KMS with Macie",
                            "Encrypt with KMS customer-managed keys and enable Macie discovery over S3 data sources.",
                            &[
                                "Create customer-managed KMS keys per data domain",
                                "Enable Macie on buckets feeding training and inference",
                            ],
                        ),
                        (
                            "azure",
                            "Azure Key Vault with Purview",
                            "Encrypt with Key Vault managed keys and register data sources in Microsoft Purview.",
                            &[
                                "Store encryption keys in Key Vault with rotation",
                                "Scan AI data sources with Purview classification",
                            ],
                        ),
                        (
                            "gcp",
                            "Cloud KMS with Sensitive Data Protection",
                            "Encrypt with Cloud KMS and run Sensitive Data Protection discovery on feeding datasets.",
                            &[
                                "Configure CMEK on storage feeding the system",
                                "Schedule Sensitive Data Protection scans",
                            ],
                        ),
                    ]),
                ),
                control(
                    "DAT-02",
                    "Privacy Impact Assessment",
                    "Documented assessment of privacy risks and mitigations for personal data processing.",
                    &[
                        "Map personal data elements and lawful bases",
                        "Assess re-identification and inference risks",
                        "Document mitigations and residual risk acceptance",
                    ],
                    "organizational",
                    "administrative",
                    &["MAP-2.3", "MEASURE-2.10"],
                    &["Completed PIA document"],
                    BTreeMap::new(),
                ),
                control(
                    "MON-01",
                    "Continuous Model Monitoring",
                    "Automated monitoring of model quality, drift, and anomalous output in production.",
                    &[
                        "Define quality and drift metrics with thresholds",
                        "Alert the owning team on threshold breach",
                        "Review monitoring dashboards at the set cadence",
                    ],
                    "system",
                    "technical",
                    &["MEASURE-2.6", "MANAGE-4.1"],
                    &["Monitoring dashboard", "Alert runbook"],
                    vendor_overlays(&[
                        (
                            "aws",
                            "SageMaker Model Monitor",
                            "Monitor data quality and drift with SageMaker Model Monitor schedules.",
                            &[
                                "Baseline the training distribution",
                                "Create monitoring schedules with CloudWatch alarms",
                            ],
                        ),
                        (
                            "azure",
                            "Azure ML Model Monitoring",
                            "Enable Azure ML model monitoring signals for drift and data quality.",
                            &[
                                "Configure drift and quality signals on the endpoint",
                                "Route alerts through Azure Monitor action groups",
                            ],
                        ),
                        (
                            "gcp",
                            "Vertex AI Model Monitoring",
                            "Enable Vertex AI Model Monitoring for skew and drift detection.",
                            &[
                                "Attach monitoring jobs to the prediction endpoint",
                                "Alert via Cloud Monitoring notification channels",
                            ],
                        ),
                    ]),
                ),
                control(
                    "HUM-01",
                    "Human Oversight Checkpoint",
                    "Defined human review point with authority to override or halt automated decisions.",
                    &[
                        "Identify decisions requiring human confirmation",
                        "Grant reviewers override and halt authority",
                        "Audit override usage monthly",
                    ],
                    "process",
                    "administrative",
                    &["GOVERN-3.2", "MANAGE-2.2"],
                    &["Oversight procedure", "Override audit log"],
                    BTreeMap::new(),
                ),
                control(
                    "TRN-01",
                    "Automated Interaction Disclosure",
                    "Users are informed when they interact with or are subject to an AI system.",
                    &[
                        "Add disclosure copy at every AI interaction surface",
                        "Provide a route to a human alternative where feasible",
                    ],
                    "system",
                    "administrative",
                    &["GOVERN-4.2", "MAP-5.2"],
                    &["Disclosure screenshots"],
                    BTreeMap::new(),
                ),
                control(
                    "VND-01",
                    "Third-Party Model Evaluation",
                    "Documented evaluation of externally sourced models covering provenance, terms, and known limitations.",
                    &[
                        "Record model provenance and license terms",
                        "Review the provider's published limitations and evals",
                        "Define an exit plan for provider failure",
                    ],
                    "organizational",
                    "administrative",
                    &["GOVERN-6.1", "MAP-4.1"],
                    &["Vendor evaluation record"],
                    BTreeMap::new(),
                ),
                control(
                    "INC-01",
                    "AI Incident Response Runbook",
                    "Runbook covering detection, containment, and disclosure of AI-specific incidents.",
                    &[
                        "Extend the incident taxonomy with AI failure modes",
                        "Define containment steps including model rollback",
                        "Rehearse the runbook with a tabletop exercise",
                    ],
                    "organizational",
                    "administrative",
                    &["GOVERN-1.5", "MANAGE-4.3"],
                    &["Published runbook", "Tabletop exercise notes"],
                    BTreeMap::new(),
                ),
                control(
                    "EUA-01",
                    "EU AI Act Conformity Review",
                    "Classification of the system under the EU AI Act with documented conformity obligations.",
                    &[
                        "Classify the system against the Act's risk categories",
                        "Document applicable conformity obligations",
                        "Track obligations to closure before EU operation",
                    ],
                    "organizational",
                    "administrative",
                    &["GOVERN-1.1", "MAP-1.1"],
                    &["Classification memo", "Obligation tracker"],
                    BTreeMap::new(),
                ),
                control(
                    "LOG-01",
                    "Decision Audit Logging",
                    "Durable, queryable log of automated decisions with inputs and model version.",
                    &[
                        "Log decision inputs, outputs, and model version",
                        "Retain logs per the applicable retention schedule",
                    ],
                    "system",
                    "technical",
                    &["MEASURE-2.5", "MANAGE-4.1"],
                    &["Log schema", "Retention configuration"],
                    vendor_overlays(&[
                        (
                            "aws",
                            "CloudWatch Logs",
                            "Ship decision records to CloudWatch Logs with a retention policy and Insights queries.",
                            &[
                                "Create a decision log group with retention",
                                "Define Insights queries for audit requests",
                            ],
                        ),
                        (
                            "azure",
                            "Azure Monitor Logs",
                            "Ship decision records to a Log Analytics workspace with retention and KQL queries.",
                            &[
                                "Create a Log Analytics workspace table for decisions",
                                "Define KQL queries for audit requests",
                            ],
                        ),
                        (
                            "gcp",
                            "Cloud Logging",
                            "Ship decision records to Cloud Logging with a bucket retention policy.",
                            &[
                                "Route decision entries to a dedicated log bucket",
                                "Set bucket retention per the schedule",
                            ],
                        ),
                    ]),
                ),
            ],
        }
    }
}

fn all(conditions: Vec<Condition>) -> ConditionGroup {
    ConditionGroup {
        all: Some(conditions),
        any: None,
    }
}

fn cond(field: &str, operator: ConditionOperator, value: Option<FactValue>) -> Condition {
    Condition {
        field: field.to_string(),
        operator,
        value,
    }
}

fn cond_eq(field: &str, value: &str) -> Condition {
    cond(field, ConditionOperator::Eq, Some(FactValue::from(value)))
}

fn cond_eq_flag(field: &str, value: bool) -> Condition {
    cond(field, ConditionOperator::Eq, Some(FactValue::Flag(value)))
}

fn cond_in(field: &str, options: &[&str]) -> Condition {
    let options = options.iter().map(|option| option.to_string()).collect();
    cond(field, ConditionOperator::In, Some(FactValue::List(options)))
}

fn cond_contains(field: &str, value: &str) -> Condition {
    cond(
        field,
        ConditionOperator::Contains,
        Some(FactValue::from(value)),
    )
}

#[allow(clippy::too_many_arguments)]
fn rule(
    rule_id: &str,
    name: &str,
    priority: i32,
    conditions: ConditionGroup,
    select_controls: &[&str],
    designation: Designation,
    explanation: Option<&str>,
) -> Rule {
    Rule {
        rule_id: rule_id.to_string(),
        name: name.to_string(),
        priority,
        conditions,
        actions: RuleActions {
            select_controls: select_controls.iter().map(|id| id.to_string()).collect(),
            designation,
            explanation: explanation.map(str::to_string),
        },
        enabled: true,
    }
}

#[allow(clippy::too_many_arguments)]
fn control(
    control_id: &str,
    name: &str,
    description: &str,
    implementation_steps: &[&str],
    implementation_level: &str,
    control_type: &str,
    framework_refs: &[&str],
    evidence_artifacts: &[&str],
    vendor_guidance: BTreeMap<String, VendorGuidance>,
) -> ControlCatalogEntry {
    ControlCatalogEntry {
        control_id: control_id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        implementation_steps: implementation_steps
            .iter()
            .map(|step| step.to_string())
            .collect(),
        implementation_level: implementation_level.to_string(),
        control_type: control_type.to_string(),
        framework_refs: framework_refs.iter().map(|r| r.to_string()).collect(),
        evidence_artifacts: evidence_artifacts
            .iter()
            .map(|artifact| artifact.to_string())
            .collect(),
        vendor_guidance,
    }
}

fn vendor_overlays(
    entries: &[(&str, &str, &str, &[&str])],
) -> BTreeMap<String, VendorGuidance> {
    entries
        .iter()
        .map(|(vendor, service, description, steps)| {
            (
                vendor.to_string(),
                VendorGuidance {
                    service: service.to_string(),
                    description: description.to_string(),
                    steps: steps.iter().map(|step| step.to_string()).collect(),
                },
            )
        })
        .collect()
}
