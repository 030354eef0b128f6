//! Critical-path reconnection by Manhattan carving.

use crate::context::GenerationContext;
use crate::types::GridPoint;
use crate::validation::path_components;

/// Paves an L-shaped route from `start` to `end`: along x first, then along y.
/// Returns how many cells changed to the path tile.
pub fn carve_manhattan(context: &mut GenerationContext<'_>, start: GridPoint, end: GridPoint) -> usize {
    let path_tile = context.path_tile();
    let mut changed = 0;
    let mut pave = |context: &mut GenerationContext<'_>, point: GridPoint| {
        if context.tile_at(point).is_some_and(|tile| tile != path_tile) && context.set_tile(point, path_tile) {
            changed += 1;
        }
    };

    let mut cursor = start;
    pave(context, cursor);
    while cursor.x != end.x {
        cursor.x += (end.x - cursor.x).signum();
        pave(context, cursor);
    }
    while cursor.y != end.y {
        cursor.y += (end.y - cursor.y).signum();
        pave(context, cursor);
    }
    changed
}

/// Joins every path component to the one with the smallest representative, then extends the
/// route to both side edges. Returns the number of newly paved cells.
pub(super) fn reconnect_path_components(context: &mut GenerationContext<'_>) -> usize {
    let mut changed = 0;
    let mut path_cells = context.scan_path_cells();
    if path_cells.is_empty() {
        let middle = context.height() / 2;
        let end = GridPoint::new(context.width() - 1, middle);
        changed += carve_manhattan(context, GridPoint::new(0, middle), end);
        path_cells = context.scan_path_cells();
    }

    let mut components = path_components(&path_cells);
    components.sort_by_key(|component| representative(component));
    if let Some((main, rest)) = components.split_first() {
        let anchor = main[0];
        for component in rest {
            changed += carve_manhattan(context, anchor, component[0]);
        }
    }

    let path_cells = context.scan_path_cells();
    let left_most = path_cells.iter().copied().reduce(|best, cell| if cell.x < best.x { cell } else { best });
    let right_most = path_cells.iter().copied().reduce(|best, cell| if cell.x > best.x { cell } else { best });
    if let Some(left) = left_most
        && left.x > 0
    {
        changed += carve_manhattan(context, left, GridPoint::new(0, left.y));
    }
    if let Some(right) = right_most {
        let edge = context.width() - 1;
        if right.x < edge {
            changed += carve_manhattan(context, right, GridPoint::new(edge, right.y));
        }
    }
    changed
}

/// Smallest x, then smallest y, within a component.
fn representative(component: &[GridPoint]) -> (i32, i32) {
    component.iter().map(|cell| (cell.x, cell.y)).min().unwrap_or((i32::MAX, i32::MAX))
}
