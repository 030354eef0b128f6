//! Grid shape and tile-id checks.

use crate::context::GenerationContext;
use crate::diagnostics::ValidationIssue;
use crate::types::GridPoint;

use super::ConstraintId;

pub(super) fn bounded_map(context: &GenerationContext<'_>) -> Vec<ValidationIssue> {
    let expected_width = context.config.dimensions.width as usize;
    let expected_height = context.config.dimensions.height as usize;
    let mut issues = Vec::new();

    if context.grid.len() != expected_height {
        issues.push(ValidationIssue::error(
            ConstraintId::BoundedMap,
            format!(
                "Grid height {} does not match expected {expected_height}.",
                context.grid.len()
            ),
        ));
    }

    for (y, row) in context.grid.iter().enumerate().take(expected_height) {
        let row_width = row.len();
        if row_width != expected_width {
            let x = row_width.saturating_sub(1).min(expected_width.saturating_sub(1));
            issues.push(
                ValidationIssue::error(
                    ConstraintId::BoundedMap,
                    format!("Grid row {y} width {row_width} does not match expected {expected_width}."),
                )
                .with_cells(vec![GridPoint::new(x as i32, y as i32)]),
            );
        }
    }

    issues
}

pub(super) fn known_tile_ids_only(context: &GenerationContext<'_>) -> Vec<ValidationIssue> {
    let registry = context.registry();
    let invalid: Vec<GridPoint> = context
        .all_cells()
        .filter(|&point| !context.tile_at(point).is_some_and(|tile| registry.is_known(tile)))
        .collect();

    if invalid.is_empty() {
        return Vec::new();
    }
    vec![
        ValidationIssue::error(
            ConstraintId::KnownTileIdsOnly,
            format!("Found {} cells with unknown tile ids.", invalid.len()),
        )
        .with_cells(invalid),
    ]
}
