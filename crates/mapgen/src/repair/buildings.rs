//! Door connection, footprint relocation and forced quota placement.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::mem;

use crate::context::{ClaimedCells, GenerationContext};
use crate::error::GenerationError;
use crate::footprint::{RotatedFootprint, door_fronts, stamp_building};
use crate::registry::tile_ids;
use crate::types::{BuildingRotation, GeneratedBuildingPlacement, GridPoint};
use crate::validation::{door_cells, footprint_cells};

use super::carve_manhattan;

/// Links every door lacking an exterior path neighbor to the nearest path cell.
/// Returns the number of doors connected.
pub(super) fn connect_building_doors(context: &mut GenerationContext<'_>) -> Result<usize, GenerationError> {
    let path_tile = context.path_tile();
    let occupied = context.occupied_building_cells()?;
    let placements = context.building_placements.clone();
    let mut connected = 0;

    for placement in &placements {
        let (doors, own_cells) = door_cells(context, placement)?;
        for door in doors {
            let exterior = |next: &GridPoint| context.in_bounds(*next) && !own_cells.contains(next);
            if door.neighbors().into_iter().filter(exterior).any(|next| context.is_path(next)) {
                continue;
            }
            let Some(exit) = door
                .neighbors()
                .into_iter()
                .filter(exterior)
                .find(|next| !occupied.contains(next))
            else {
                continue;
            };

            context.set_tile(exit, path_tile);
            match route_around_buildings(context, &occupied, exit) {
                Some(route) => {
                    for cell in route {
                        context.set_tile(cell, path_tile);
                    }
                }
                None => {
                    let nearest = context
                        .scan_path_cells()
                        .into_iter()
                        .filter(|cell| *cell != exit)
                        .min_by_key(|cell| (cell.manhattan(exit), cell.x, cell.y));
                    if let Some(target) = nearest {
                        carve_manhattan(context, exit, target);
                    }
                }
            }
            connected += 1;
        }
    }
    Ok(connected)
}

/// Shortest walk from `start` to the closest other path cell that never crosses a building.
/// The returned cells exclude `start` and the reached path cell.
fn route_around_buildings(
    context: &GenerationContext<'_>,
    occupied: &BTreeSet<GridPoint>,
    start: GridPoint,
) -> Option<Vec<GridPoint>> {
    let mut came_from = BTreeMap::from([(start, start)]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for next in current.neighbors() {
            if !context.in_bounds(next) || occupied.contains(&next) || came_from.contains_key(&next) {
                continue;
            }
            came_from.insert(next, current);
            if context.is_path(next) {
                let mut route = Vec::new();
                let mut step = current;
                while step != start {
                    route.push(step);
                    step = came_from[&step];
                }
                return Some(route);
            }
            queue.push_back(next);
        }
    }
    None
}

/// Keeps fully contained placements; anything overhanging the map is cleared and re-placed
/// deterministically, or dropped when no spot fits. Returns the number of placements touched.
pub(super) fn relocate_building_footprints(
    context: &mut GenerationContext<'_>,
) -> Result<usize, GenerationError> {
    let (width, height) = (context.width() as usize, context.height() as usize);
    let mut claimed = ClaimedCells::default();
    let mut overhanging = Vec::new();
    for (index, placement) in context.building_placements.iter().enumerate() {
        let cells = footprint_cells(context, placement)?;
        if cells.iter().all(|cell| context.in_bounds(cell.point)) {
            claimed.claim(&cells, door_fronts(&cells, width, height));
        } else {
            overhanging.push(index);
        }
    }
    if overhanging.is_empty() {
        return Ok(0);
    }

    let base = context.base_tile();
    let mut kept = Vec::with_capacity(context.building_placements.len());
    for (index, placement) in mem::take(&mut context.building_placements).into_iter().enumerate() {
        if !overhanging.contains(&index) {
            kept.push(placement);
            continue;
        }
        for cell in footprint_cells(context, &placement)? {
            context.set_tile(cell.point, base);
        }
        match place_deterministically(context, &mut claimed, &placement.building_id)? {
            Some(moved) => {
                log::debug!("relocated {} from {} to {}", placement.building_id, placement.anchor, moved.anchor);
                kept.push(moved);
            }
            None => log::debug!("dropped {} at {}", placement.building_id, placement.anchor),
        }
    }
    context.building_placements = kept;
    Ok(overhanging.len())
}

/// Tops every building quota up to its minimum with deterministic placements.
/// Returns the number of buildings added.
pub(super) fn force_required_structures(context: &mut GenerationContext<'_>) -> Result<usize, GenerationError> {
    let mut claimed = context.claimed_cells()?;
    let archetype = context.archetype;
    let mut added = 0;

    for target in archetype.building_targets.iter().filter(|target| target.range.min > 0) {
        let mut placed = context
            .building_placements
            .iter()
            .filter(|placement| placement.building_id == target.building_id)
            .count();
        while placed < target.range.min as usize {
            let Some(placement) = place_deterministically(context, &mut claimed, &target.building_id)? else {
                break;
            };
            context.building_placements.push(placement);
            placed += 1;
            added += 1;
        }
    }
    Ok(added)
}

/// First fit scanning rotations 0..3, then rows, then columns. Cells must be unclaimed base
/// terrain or flowers and every door needs an unbuilt front. Stamps the building and claims its
/// cells; the caller records the placement.
fn place_deterministically(
    context: &mut GenerationContext<'_>,
    claimed: &mut ClaimedCells,
    building_id: &str,
) -> Result<Option<GeneratedBuildingPlacement>, GenerationError> {
    let building = context.registry().building(building_id)?;
    let base = context.base_tile();
    let (width, height) = (context.width() as usize, context.height() as usize);

    for turns in 0..4 {
        let rotation = BuildingRotation::from_quarter_turns(turns);
        let footprint = RotatedFootprint::new(building, rotation)?;
        let max_x = context.width() - footprint.width as i32;
        let max_y = context.height() - footprint.height as i32;
        for y in 0..=max_y {
            for x in 0..=max_x {
                let anchor = GridPoint::new(x, y);
                let cells = footprint.cells_at(anchor);
                let on_open_ground = cells.iter().all(|cell| {
                    matches!(context.tile_at(cell.point), Some(tile) if tile == base || tile == tile_ids::FLOWER)
                });
                if !on_open_ground {
                    continue;
                }
                let fronts = door_fronts(&cells, width, height);
                let has_door = cells.iter().any(|cell| cell.tile_id == tile_ids::DOOR);
                if (has_door && fronts.is_empty()) || !claimed.admits(&cells, &fronts) {
                    continue;
                }
                stamp_building(&mut context.grid, building, rotation, anchor)?;
                claimed.claim(&cells, fronts);
                return Ok(Some(GeneratedBuildingPlacement {
                    building_id: building_id.to_string(),
                    rotation,
                    anchor,
                }));
            }
        }
    }
    Ok(None)
}
