//! Places archetype building quotas inside the town district and opens a path at each door.

use std::collections::BTreeSet;

use crate::context::{ClaimedCells, GenerationContext};
use crate::diagnostics::GenerationDiagnostics;
use crate::error::GenerationError;
use crate::footprint::{PlacementCell, RotatedFootprint, door_fronts, stamp_building};
use crate::registry::tile_ids;
use crate::rng::SeededRng;
use crate::types::{BuildingRotation, GeneratedBuildingPlacement, GridPoint, ReservedDistrict};

const PLACEMENT_ATTEMPTS: usize = 40;

/// Placed before anything else, in this order.
pub const REQUIRED_ORDER: [&str; 7] =
    ["pokecenter", "pokemart", "gym", "lab", "house-large", "house-small", "gate"];
/// Decorative structures, shuffled after the required ones.
pub const DECORATIVE_ORDER: [&str; 4] = ["cave-entrance", "pond", "fence-h", "fence-v"];

/// Door neighbors probed when opening a path: south, north, east, west.
const DOOR_EXITS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

pub(crate) fn run(
    context: &mut GenerationContext<'_>,
    diagnostics: &mut GenerationDiagnostics,
) -> Result<(), GenerationError> {
    let mut rng = context.rng.fork("placeBuildings");
    let Some(town) = context.town_district().cloned() else {
        diagnostics.warn("Town district missing before building placement.");
        return Ok(());
    };

    let mut claimed = context.claimed_cells()?;
    let mut queue = Vec::new();
    for building_id in REQUIRED_ORDER.into_iter().chain(DECORATIVE_ORDER) {
        let Some(target) = context.archetype.building_target(building_id) else {
            continue;
        };
        let extra = if target.max > target.min {
            rng.int(0, (target.max - target.min) as i32) as u32
        } else {
            0
        };
        queue.extend((0..target.min + extra).map(|_| building_id));
    }

    let (mut ordered, mut tail): (Vec<&str>, Vec<&str>) =
        queue.into_iter().partition(|id| REQUIRED_ORDER.contains(id));
    rng.shuffle(&mut tail);
    ordered.extend(tail);

    for building_id in ordered {
        if let Some(placement) = try_place(context, &mut rng, &mut claimed, &town, building_id)? {
            context.building_placements.push(placement);
        }
    }

    for target in &context.archetype.building_targets {
        let placed = context
            .building_placements
            .iter()
            .filter(|placement| placement.building_id == target.building_id)
            .count();
        if placed < target.range.min as usize {
            diagnostics.warn(format!(
                "Could not place required building {} ({placed}/{}).",
                target.building_id, target.range.min
            ));
        }
    }
    Ok(())
}

fn try_place(
    context: &mut GenerationContext<'_>,
    rng: &mut SeededRng,
    claimed: &mut ClaimedCells,
    town: &ReservedDistrict,
    building_id: &str,
) -> Result<Option<GeneratedBuildingPlacement>, GenerationError> {
    let building = context.registry().building(building_id)?;
    let base = context.base_tile();

    for _ in 0..PLACEMENT_ATTEMPTS {
        let rotation = BuildingRotation::from_quarter_turns(rng.int(0, 3) as u8);
        let footprint = RotatedFootprint::new(building, rotation)?;
        let min_x = town.x + 1;
        let max_x = town.x + town.width - footprint.width as i32 - 1;
        let min_y = town.y + 1;
        let max_y = town.y + town.height - footprint.height as i32 - 1;
        if max_x < min_x || max_y < min_y {
            return Ok(None);
        }

        let anchor = GridPoint::new(rng.int(min_x, max_x), rng.int(min_y, max_y));
        let cells = footprint.cells_at(anchor);
        let on_open_ground = cells.iter().all(|cell| {
            matches!(context.tile_at(cell.point), Some(tile) if tile == base || tile == tile_ids::FLOWER)
        });
        let fronts = door_fronts(&cells, context.width() as usize, context.height() as usize);
        if !on_open_ground || !claimed.admits(&cells, &fronts) {
            continue;
        }

        stamp_building(&mut context.grid, building, rotation, anchor)?;
        claimed.claim(&cells, fronts);
        let own: BTreeSet<GridPoint> = cells.iter().map(|cell| cell.point).collect();
        open_door_exits(context, &cells, &own, &claimed.occupied);

        log::debug!("placed {building_id} at {anchor} rotated {}", rotation.quarter_turns());
        return Ok(Some(GeneratedBuildingPlacement {
            building_id: building_id.to_string(),
            rotation,
            anchor,
        }));
    }
    Ok(None)
}

/// Paves the first in-bounds exterior neighbor of every door unless another building sits there.
fn open_door_exits(
    context: &mut GenerationContext<'_>,
    cells: &[PlacementCell],
    own: &BTreeSet<GridPoint>,
    occupied: &BTreeSet<GridPoint>,
) {
    let path_tile = context.path_tile();
    for door in cells.iter().filter(|cell| cell.tile_id == tile_ids::DOOR) {
        let exit = DOOR_EXITS
            .iter()
            .map(|&(dx, dy)| GridPoint::new(door.point.x + dx, door.point.y + dy))
            .find(|&next| context.in_bounds(next) && !own.contains(&next));
        if let Some(exit) = exit
            && !occupied.contains(&exit)
        {
            context.set_tile(exit, path_tile);
        }
    }
}
