use std::io::Write;

use serde::Serialize;

use super::domain::FrameworkFinding;

/// Flattened CSV row for auditors; list fields are joined with `"; "`.
#[derive(Debug, Serialize)]
struct FindingRow<'a> {
    framework_ref: &'a str,
    control_id: &'a str,
    control_name: &'a str,
    designation: &'a str,
    finding: &'a str,
    implementation_level: &'a str,
    control_type: &'a str,
    implementation_vendor: &'a str,
    implementation_service: &'a str,
    evidence: String,
    implementation_steps: String,
}

/// Write one header row plus one record per framework finding.
pub fn write_findings_csv<W: Write>(
    findings: &[FrameworkFinding],
    writer: W,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for finding in findings {
        csv_writer.serialize(FindingRow {
            framework_ref: &finding.framework_ref,
            control_id: &finding.control_id,
            control_name: &finding.control_name,
            designation: finding.designation.label(),
            finding: &finding.finding,
            implementation_level: &finding.implementation_level,
            control_type: &finding.control_type,
            implementation_vendor: finding.implementation_vendor.as_deref().unwrap_or(""),
            implementation_service: finding.implementation_service.as_deref().unwrap_or(""),
            evidence: finding.evidence.join("; "),
            implementation_steps: finding.implementation_steps.join("; "),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
