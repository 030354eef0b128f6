//! Scatters flowers, tree clusters and, for wet archetypes, small ponds off the route.

use crate::context::GenerationContext;
use crate::diagnostics::GenerationDiagnostics;
use crate::error::GenerationError;
use crate::registry::tile_ids;
use crate::types::GridPoint;

const FLOWER_CHANCE: f64 = 0.045;
const TREE_CHANCE: f64 = 0.65;
const AREA_PER_TREE_CLUSTER: i32 = 180;
const AREA_PER_POND: i32 = 300;

pub(crate) fn run(
    context: &mut GenerationContext<'_>,
    _diagnostics: &mut GenerationDiagnostics,
) -> Result<(), GenerationError> {
    let mut rng = context.rng.fork("paintBiomes");
    let (width, height) = (context.width(), context.height());
    let base = context.base_tile();
    let path = context.path_cell_set();

    for cell in context.all_cells().collect::<Vec<_>>() {
        if !path.contains(&cell) && context.tile_at(cell) == Some(base) && rng.chance(FLOWER_CHANCE) {
            context.set_tile(cell, tile_ids::FLOWER);
        }
    }

    let clusters = (context.area() / AREA_PER_TREE_CLUSTER).max(2);
    for _ in 0..clusters {
        let center = GridPoint::new(rng.int(1, width - 2), rng.int(1, height - 2));
        let radius_x = rng.int(2, 4);
        let radius_y = rng.int(2, 3);
        for y in center.y - radius_y..=center.y + radius_y {
            for x in center.x - radius_x..=center.x + radius_x {
                let cell = GridPoint::new(x, y);
                if !context.in_bounds(cell) || path.contains(&cell) {
                    continue;
                }
                let nx = (f64::from(x - center.x) / f64::from(radius_x)).abs();
                let ny = (f64::from(y - center.y) / f64::from(radius_y)).abs();
                if nx + ny <= 1.25 && rng.chance(TREE_CHANCE) {
                    context.set_tile(cell, tile_ids::TREE);
                }
            }
        }
    }

    paint_ponds(context)
}

fn paint_ponds(context: &mut GenerationContext<'_>) -> Result<(), GenerationError> {
    let archetype = context.archetype;
    let water_tiles = &archetype.tile_roles.optional_water_tile_ids;
    if water_tiles.is_empty() {
        return Ok(());
    }

    let mut rng = context.rng.fork("paintBiomes:water");
    let (width, height) = (context.width(), context.height());
    let base = context.base_tile();
    let path = context.path_cell_set();
    let ponds = (context.area() / AREA_PER_POND).max(1);

    for _ in 0..ponds {
        let water = *rng.pick(water_tiles)?;
        let center = GridPoint::new(rng.int(2, width - 3), rng.int(2, height - 3));
        let radius_x = rng.int(1, 2);
        let radius_y = rng.int(1, 2);
        for y in center.y - radius_y..=center.y + radius_y {
            for x in center.x - radius_x..=center.x + radius_x {
                let cell = GridPoint::new(x, y);
                let paintable = matches!(
                    context.tile_at(cell),
                    Some(tile) if tile == base || tile == tile_ids::FLOWER
                );
                if !paintable || path.iter().any(|&route| route.manhattan(cell) <= 1) {
                    continue;
                }
                let nx = f64::from(x - center.x) / f64::from(radius_x);
                let ny = f64::from(y - center.y) / f64::from(radius_y);
                if nx * nx + ny * ny <= 1.0 {
                    context.set_tile(cell, water);
                }
            }
        }
    }
    Ok(())
}
