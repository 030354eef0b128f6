//! Spawn-cell walkability repair.

use crate::context::GenerationContext;
use crate::validation::find_spawn_cell;

/// Paves the spawn cell when it is blocked and opens one escape neighbor when it is boxed in.
pub(super) fn enforce_spawn_safety(context: &mut GenerationContext<'_>) -> usize {
    let Some(spawn) = find_spawn_cell(context) else {
        return 0;
    };
    if !context.in_bounds(spawn) {
        return 0;
    }

    let registry = context.registry();
    let path_tile = context.path_tile();
    let walkable = |context: &GenerationContext<'_>, point| {
        context.tile_at(point).is_some_and(|tile| registry.is_walkable(tile))
    };

    let mut changed = 0;
    if !walkable(context, spawn) {
        context.set_tile(spawn, path_tile);
        changed += 1;
    }
    let neighbors = spawn.neighbors();
    if !neighbors.iter().any(|&next| walkable(context, next))
        && let Some(&exit) = neighbors.iter().find(|&&next| context.in_bounds(next))
    {
        context.set_tile(exit, path_tile);
        changed += 1;
    }
    changed
}
