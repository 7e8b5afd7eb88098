use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use serde_json::json;

use govern_ai::error::AppError;
use govern_ai::workflows::assessment::{
    write_findings_csv, AnswerSet, AssessmentService, AssessmentSubmission, ComputedResult,
    ControlCatalog, RuleCatalog, SubjectKind,
};

use crate::infra::{InMemoryAssessmentRepository, LoggingEscalationPublisher};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Preferred cloud vendor for implementation guidance
    #[arg(long)]
    vendor: Option<String>,
    /// Write the framework findings to a CSV file at this path
    #[arg(long)]
    export_findings: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Path to a JSON answers file (step -> question -> value)
    #[arg(long)]
    answers: PathBuf,
    /// Assessment subject
    #[arg(long, value_enum, default_value = "product")]
    subject: SubjectArg,
    /// Preferred cloud vendor for implementation guidance
    #[arg(long)]
    vendor: Option<String>,
    /// Write the framework findings to a CSV file at this path
    #[arg(long)]
    export_findings: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub(crate) enum SubjectArg {
    Product,
    Organization,
}

impl From<SubjectArg> for SubjectKind {
    fn from(value: SubjectArg) -> Self {
        match value {
            SubjectArg::Product => SubjectKind::Product,
            SubjectArg::Organization => SubjectKind::Organization,
        }
    }
}

fn demo_service(
    vendor: Option<String>,
) -> AssessmentService<InMemoryAssessmentRepository, LoggingEscalationPublisher> {
    AssessmentService::new(
        Arc::new(InMemoryAssessmentRepository::default()),
        Arc::new(LoggingEscalationPublisher),
        RuleCatalog::standard(),
        ControlCatalog::standard(),
    )
    .with_default_vendor(vendor)
}

/// Sample questionnaire for the demo: a public support chatbot built on a
/// third-party model, handling personal data across the US and EU.
fn demo_answers() -> AnswerSet {
    let mut steps: BTreeMap<String, BTreeMap<String, serde_json::Value>> = BTreeMap::new();
    steps.insert(
        "data_profile".to_string(),
        BTreeMap::from([("categories".to_string(), json!(["pii", "financial"]))]),
    );
    steps.insert(
        "system_profile".to_string(),
        BTreeMap::from([
            ("autonomy".to_string(), json!("human_in_loop")),
            ("exposure".to_string(), json!("public")),
            ("monthly_active_users".to_string(), json!(85_000)),
            ("model_source".to_string(), json!("third_party")),
        ]),
    );
    steps.insert(
        "governance".to_string(),
        BTreeMap::from([("ai_policy".to_string(), json!(true))]),
    );
    steps.insert(
        "deployment".to_string(),
        BTreeMap::from([("jurisdictions".to_string(), json!(["us", "eu"]))]),
    );
    AnswerSet(steps)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = demo_service(args.vendor);
    let submission = AssessmentSubmission {
        subject: SubjectKind::Product,
        answers: demo_answers(),
    };

    println!("== AI governance assessment demo ==");
    println!("subject: {}", submission.subject.label());

    let result = service.compute_bundle(&submission);
    print_bundle(&result);
    export_if_requested(&result, args.export_findings)?;
    Ok(())
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let file = File::open(&args.answers)?;
    let answers: AnswerSet = serde_json::from_reader(file).map_err(AppError::Answers)?;

    let service = demo_service(args.vendor);
    let submission = AssessmentSubmission {
        subject: args.subject.into(),
        answers,
    };

    println!("== AI governance assessment ==");
    println!("subject: {}", submission.subject.label());

    let result = service.compute_bundle(&submission);
    print_bundle(&result);
    export_if_requested(&result, args.export_findings)?;
    Ok(())
}

fn print_bundle(result: &ComputedResult) {
    println!(
        "risk: {} (score {}/25)",
        result.risk_tier.label(),
        result.risk_score
    );

    println!("drivers:");
    for driver in &result.risk_drivers {
        println!(
            "  {:+3}  {:?}: {}",
            driver.contribution, driver.factor, driver.explanation
        );
    }

    println!("controls:");
    for selection in &result.control_selections {
        println!(
            "  [{}] {} (rules: {})",
            selection.designation.label(),
            selection.control_id,
            selection.rule_ids.join(", ")
        );
        for reason in &selection.reasoning {
            println!("      - {reason}");
        }
    }

    println!(
        "framework findings: {} across {} controls",
        result.framework_findings.len(),
        result.control_selections.len()
    );

    println!(
        "monitoring: review {} / {} signals / {} reassessment triggers",
        result.monitoring_plan.review_cadence.label(),
        result.monitoring_plan.monitored_signals.len(),
        result.monitoring_plan.reassessment_triggers.len()
    );
}

fn export_if_requested(
    result: &ComputedResult,
    path: Option<PathBuf>,
) -> Result<(), AppError> {
    if let Some(path) = path {
        let file = File::create(&path)?;
        write_findings_csv(&result.framework_findings, file)?;
        println!(
            "exported {} findings to {}",
            result.framework_findings.len(),
            path.display()
        );
    }
    Ok(())
}
