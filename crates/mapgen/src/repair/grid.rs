//! Grid shape normalization and unknown-tile cleanup.

use crate::context::{GenerationContext, filled_grid};

/// Rebuilds the grid at the configured size when its shape drifted, keeping overlapping cells.
pub(super) fn normalize_grid_bounds(context: &mut GenerationContext<'_>) -> bool {
    let width = context.width() as usize;
    let height = context.height() as usize;
    let well_formed = context.grid.len() == height && context.grid.iter().all(|row| row.len() == width);
    if well_formed {
        return false;
    }

    let mut grid = filled_grid(width as u32, height as u32, context.base_tile());
    for (row, source) in grid.iter_mut().zip(&context.grid) {
        for (slot, &tile) in row.iter_mut().zip(source) {
            *slot = tile;
        }
    }
    context.grid = grid;
    true
}

/// Replaces tiles the registry does not know with base terrain; returns the cell count.
pub(super) fn replace_unknown_tile_ids(context: &mut GenerationContext<'_>) -> usize {
    let registry = context.registry();
    let base = context.base_tile();
    let mut replaced = 0;
    for tile in context.grid.iter_mut().flatten() {
        if !registry.is_known(*tile) {
            *tile = base;
            replaced += 1;
        }
    }
    replaced
}
