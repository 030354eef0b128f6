//! Resets the grid and state, then resolves the template prepass.

use crate::context::{GenerationContext, GenerationState, filled_grid};
use crate::diagnostics::GenerationDiagnostics;
use crate::error::GenerationError;

pub(crate) fn run(
    context: &mut GenerationContext<'_>,
    _diagnostics: &mut GenerationDiagnostics,
) -> Result<(), GenerationError> {
    context.grid = filled_grid(
        context.config.dimensions.width,
        context.config.dimensions.height,
        context.base_tile(),
    );
    context.building_placements.clear();
    context.state = GenerationState::default();

    if let Some(template_id) = &context.config.template_id {
        let template = context.catalog.template(template_id)?;
        context.state.active_template_id = Some(template.id.clone());
        context.state.template_hints = Some(template.hints.normalized());
    }
    Ok(())
}
