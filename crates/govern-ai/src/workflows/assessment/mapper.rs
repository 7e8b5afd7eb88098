use std::collections::BTreeMap;

use tracing::warn;

use super::domain::{ControlSelection, FrameworkFinding, ResolvedControl};

/// Expand resolved control selections into per-framework findings.
///
/// One finding per (selection, framework reference) pair, copying the
/// catalog's descriptive fields verbatim. Vendor substitution happened before
/// this call; the mapper is vendor-agnostic.
///
/// A selection whose control id is absent from the catalog yields zero
/// findings. That is a catalog-maintenance problem, not a runtime fault, so
/// it is logged at warn level and otherwise dropped.
pub fn map_findings(
    selections: &[ControlSelection],
    controls: &BTreeMap<String, ResolvedControl>,
) -> Vec<FrameworkFinding> {
    let mut findings = Vec::new();

    for selection in selections {
        let control = match controls.get(&selection.control_id) {
            Some(control) => control,
            None => {
                warn!(
                    control_id = %selection.control_id,
                    rule_ids = ?selection.rule_ids,
                    "selected control missing from catalog; dropping from findings"
                );
                continue;
            }
        };

        let finding_text = selection
            .reasoning
            .first()
            .cloned()
            .unwrap_or_else(|| format!("Control required: {}", control.name));

        for framework_ref in &control.framework_refs {
            findings.push(FrameworkFinding {
                finding: finding_text.clone(),
                framework_ref: framework_ref.clone(),
                control_id: control.control_id.clone(),
                control_name: control.name.clone(),
                designation: selection.designation,
                evidence: control.evidence_artifacts.clone(),
                description: control.description.clone(),
                implementation_steps: control.implementation_steps.clone(),
                implementation_level: control.implementation_level.clone(),
                control_type: control.control_type.clone(),
                implementation_vendor: control.implementation_vendor.clone(),
                implementation_service: control.implementation_service.clone(),
            });
        }
    }

    findings
}
