//! Refreshes the recorded route and scores the finished map against the soft goals.

use crate::context::GenerationContext;
use crate::diagnostics::GenerationDiagnostics;
use crate::error::GenerationError;
use crate::scoring::{overall_score, score_soft_goals};

pub(crate) fn run(
    context: &mut GenerationContext<'_>,
    diagnostics: &mut GenerationDiagnostics,
) -> Result<(), GenerationError> {
    context.state.primary_path_cells = context.scan_path_cells();
    let scores = score_soft_goals(context)?;
    let overall = overall_score(&scores);
    log::debug!("soft goal overall score {overall:.3}");
    diagnostics.soft_goal_scores = scores;
    diagnostics.overall_soft_goal_score = Some(overall);
    Ok(())
}
