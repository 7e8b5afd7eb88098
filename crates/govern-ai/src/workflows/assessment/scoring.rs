use super::domain::{AnswerSet, RiskDriver, RiskFactorKind, RiskScoreOutcome, RiskTier};

const SCORE_FLOOR: i16 = 1;
const SCORE_CEILING: i16 = 25;
const DATA_SENSITIVITY_CAP: i16 = 10;
const JURISDICTION_CAP: i16 = 4;

const MEDIUM_THRESHOLD: i16 = 7;
const HIGH_THRESHOLD: i16 = 13;
const REGULATED_THRESHOLD: i16 = 19;

/// Compute the bounded risk score, tier, and per-factor drivers from answers.
///
/// Pure function of the answer set: absent or malformed answers contribute
/// nothing, the summed score is clamped to 1..=25, and the regulated-data +
/// EU-jurisdiction override outranks the threshold table.
pub fn score_answers(answers: &AnswerSet) -> RiskScoreOutcome {
    let mut drivers = Vec::new();
    let mut total: i16 = SCORE_FLOOR;

    let categories = answers
        .list("data_profile", "categories")
        .unwrap_or_default();
    let sensitivity: i16 = categories
        .iter()
        .map(|category| match category.as_str() {
            "pii" => 3,
            "phi" => 5,
            "financial" => 4,
            "biometric" => 5,
            _ => 0,
        })
        .sum();
    if sensitivity > 0 {
        let capped = sensitivity.min(DATA_SENSITIVITY_CAP);
        drivers.push(RiskDriver {
            factor: RiskFactorKind::DataSensitivity,
            contribution: capped,
            explanation: format!("processes sensitive data: {}", categories.join(", ")),
        });
        total += capped;
    }

    if let Some(autonomy) = answers.text("system_profile", "autonomy") {
        let (contribution, note) = match autonomy {
            "full_automation" => (5, "system acts without human review"),
            "human_in_loop" => (2, "human review gates system actions"),
            "advisory" => (1, "system output is advisory only"),
            _ => (0, ""),
        };
        if contribution > 0 {
            drivers.push(RiskDriver {
                factor: RiskFactorKind::SystemAutonomy,
                contribution,
                explanation: note.to_string(),
            });
            total += contribution;
        }
    }

    if let Some(exposure) = answers.text("system_profile", "exposure") {
        let contribution = match exposure {
            "public" => 4,
            "partner" => 2,
            "internal" => 1,
            _ => 0,
        };
        if contribution > 0 {
            drivers.push(RiskDriver {
                factor: RiskFactorKind::DeploymentExposure,
                contribution,
                explanation: format!("{exposure} deployment surface"),
            });
            total += contribution;
        }
    }

    if let Some(users) = answers.number("system_profile", "monthly_active_users") {
        let contribution = if users >= 1_000_000.0 {
            3
        } else if users >= 10_000.0 {
            2
        } else if users > 0.0 {
            1
        } else {
            0
        };
        if contribution > 0 {
            drivers.push(RiskDriver {
                factor: RiskFactorKind::UserScale,
                contribution,
                explanation: format!("{users:.0} monthly active users"),
            });
            total += contribution;
        }
    }

    if let Some(source) = answers.text("system_profile", "model_source") {
        let (contribution, note) = match source {
            "third_party" => (2, "relies on a third-party model"),
            "fine_tuned" => (1, "fine-tunes an external base model"),
            _ => (0, ""),
        };
        if contribution > 0 {
            drivers.push(RiskDriver {
                factor: RiskFactorKind::ModelProvenance,
                contribution,
                explanation: note.to_string(),
            });
            total += contribution;
        }
    }

    let mut maturity: i16 = 0;
    let mut practices = Vec::new();
    for (question, credit, label) in [
        ("ai_policy", -2, "AI policy"),
        ("incident_response", -2, "incident response"),
        ("model_inventory", -1, "model inventory"),
    ] {
        if answers.flag("governance", question) == Some(true) {
            maturity += credit;
            practices.push(label);
        }
    }
    if maturity != 0 {
        drivers.push(RiskDriver {
            factor: RiskFactorKind::GovernanceMaturity,
            contribution: maturity,
            explanation: format!("established practices: {}", practices.join(", ")),
        });
        total += maturity;
    }

    let jurisdictions = answers
        .list("deployment", "jurisdictions")
        .unwrap_or_default();
    let reach: i16 = jurisdictions
        .iter()
        .map(|code| if code == "eu" { 3 } else { 1 })
        .sum();
    if reach > 0 {
        let capped = reach.min(JURISDICTION_CAP);
        drivers.push(RiskDriver {
            factor: RiskFactorKind::JurisdictionalScope,
            contribution: capped,
            explanation: format!("operates in: {}", jurisdictions.join(", ")),
        });
        total += capped;
    }

    let score = total.clamp(SCORE_FLOOR, SCORE_CEILING);
    let tier = if regulated_override(&categories, &jurisdictions) {
        RiskTier::Regulated
    } else {
        tier_for_score(score)
    };

    drivers.sort_by_key(|driver| -driver.contribution.abs());

    RiskScoreOutcome {
        tier,
        score,
        drivers,
    }
}

/// Regulated data processed under EU jurisdiction forces the highest tier
/// regardless of the numeric score.
fn regulated_override(categories: &[String], jurisdictions: &[String]) -> bool {
    let regulated_data = categories
        .iter()
        .any(|category| matches!(category.as_str(), "phi" | "financial" | "biometric"));
    regulated_data && jurisdictions.iter().any(|code| code == "eu")
}

fn tier_for_score(score: i16) -> RiskTier {
    if score >= REGULATED_THRESHOLD {
        RiskTier::Regulated
    } else if score >= HIGH_THRESHOLD {
        RiskTier::High
    } else if score >= MEDIUM_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}
