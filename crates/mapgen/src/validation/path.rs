//! Primary-path connectivity and spawn-cell checks.

use std::collections::{BTreeSet, VecDeque};

use crate::context::GenerationContext;
use crate::diagnostics::ValidationIssue;
use crate::types::GridPoint;

use super::ConstraintId;

/// 4-connected components of `cells`, each in BFS discovery order, seeded in input order.
pub fn path_components(cells: &[GridPoint]) -> Vec<Vec<GridPoint>> {
    let cell_set: BTreeSet<GridPoint> = cells.iter().copied().collect();
    let mut visited = BTreeSet::new();
    let mut components = Vec::new();

    for &start in cells {
        if !visited.insert(start) {
            continue;
        }
        let mut component = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for next in current.neighbors() {
                if cell_set.contains(&next) && visited.insert(next) {
                    component.push(next);
                    queue.push_back(next);
                }
            }
        }
        components.push(component);
    }

    components
}

pub(super) fn reachable_critical_path(context: &GenerationContext<'_>) -> Vec<ValidationIssue> {
    let path_cells = context.scan_path_cells();
    let Some(first) = path_cells.first() else {
        return vec![ValidationIssue::error(
            ConstraintId::ReachableCriticalPath,
            "Primary path tiles are missing.",
        )];
    };

    let reached: BTreeSet<GridPoint> = path_components(&path_cells)
        .into_iter()
        .find(|component| component.first() == Some(first))
        .map(|component| component.into_iter().collect())
        .unwrap_or_default();
    if reached.len() != path_cells.len() {
        let unreachable: Vec<GridPoint> =
            path_cells.iter().copied().filter(|cell| !reached.contains(cell)).collect();
        return vec![
            ValidationIssue::error(
                ConstraintId::ReachableCriticalPath,
                format!("Primary path is disconnected ({} unreachable cells).", unreachable.len()),
            )
            .with_cells(unreachable),
        ];
    }

    let touches_left = path_cells.iter().any(|cell| cell.x == 0);
    let touches_right = path_cells.iter().any(|cell| cell.x == context.width() - 1);
    if !touches_left || !touches_right {
        return vec![ValidationIssue::error(
            ConstraintId::ReachableCriticalPath,
            "Primary path must reach both map edges.",
        )];
    }

    Vec::new()
}

/// Smallest x, then smallest y, among recorded path cells; falls back to a grid scan.
pub fn find_spawn_cell(context: &GenerationContext<'_>) -> Option<GridPoint> {
    let by_column = |cell: &&GridPoint| (cell.x, cell.y);
    context
        .state
        .primary_path_cells
        .iter()
        .min_by_key(by_column)
        .copied()
        .or_else(|| context.scan_path_cells().iter().min_by_key(by_column).copied())
}

pub(super) fn spawn_safety(context: &GenerationContext<'_>) -> Vec<ValidationIssue> {
    let Some(spawn) = find_spawn_cell(context) else {
        return vec![ValidationIssue::error(
            ConstraintId::SpawnSafety,
            "Spawn cell cannot be resolved without a primary path.",
        )];
    };

    let failure = |message: &str| {
        vec![ValidationIssue::error(ConstraintId::SpawnSafety, message).with_cells(vec![spawn])]
    };

    if !context.in_bounds(spawn) {
        return failure("Spawn cell is out of bounds.");
    }

    let registry = context.registry();
    let walkable = |point: GridPoint| {
        context.in_bounds(point) && context.tile_at(point).is_some_and(|tile| registry.is_walkable(tile))
    };
    if !walkable(spawn) {
        return failure("Spawn cell is not walkable.");
    }
    if !spawn.neighbors().into_iter().any(walkable) {
        return failure("Spawn cell has no walkable escape neighbor.");
    }

    Vec::new()
}
