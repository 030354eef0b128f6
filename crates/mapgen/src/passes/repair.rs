//! Bounded validate/repair loop.

use crate::context::GenerationContext;
use crate::diagnostics::GenerationDiagnostics;
use crate::error::GenerationError;
use crate::repair::apply_hard_constraint_repairs;
use crate::validation::validate_hard_constraints;

pub(crate) fn run(
    context: &mut GenerationContext<'_>,
    diagnostics: &mut GenerationDiagnostics,
) -> Result<(), GenerationError> {
    let mut issues = validate_hard_constraints(context)?;
    let max_attempts = context.config.pipeline.max_repair_attempts;

    let mut attempt = 1;
    while attempt <= max_attempts && !issues.is_empty() {
        let actions = apply_hard_constraint_repairs(context, &issues, attempt)?;
        let progressed = actions.iter().any(|action| action.applied);
        diagnostics.applied_repairs.extend(actions);
        issues = validate_hard_constraints(context)?;
        log::debug!("repair attempt {attempt} left {} issue(s)", issues.len());
        if !progressed {
            break;
        }
        attempt += 1;
    }

    if !issues.is_empty() {
        log::warn!("{} hard constraint issue(s) survived repair", issues.len());
        diagnostics.warn(format!(
            "Generation completed with {} unresolved hard constraint issue(s).",
            issues.len()
        ));
    }
    diagnostics.hard_constraint_issues = issues;
    Ok(())
}
