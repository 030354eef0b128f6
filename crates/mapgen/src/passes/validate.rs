//! Records the current hard-constraint issues without changing the map.

use crate::context::GenerationContext;
use crate::diagnostics::GenerationDiagnostics;
use crate::error::GenerationError;
use crate::validation::validate_hard_constraints;

pub(crate) fn run(
    context: &mut GenerationContext<'_>,
    diagnostics: &mut GenerationDiagnostics,
) -> Result<(), GenerationError> {
    diagnostics.hard_constraint_issues = validate_hard_constraints(context)?;
    log::debug!("validation found {} issue(s)", diagnostics.hard_constraint_issues.len());
    Ok(())
}
