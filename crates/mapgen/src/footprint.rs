//! Building footprint rotation, placement-cell expansion and stamping.

use crate::error::GenerationError;
use crate::registry::{BuildingDefinition, FootprintMatrix, tile_ids};
use crate::types::{BuildingRotation, GridPoint, TileGrid, TileId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotatedFootprint {
    pub width: usize,
    pub height: usize,
    pub tiles: FootprintMatrix,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementCell {
    pub point: GridPoint,
    pub tile_id: TileId,
}

/// One clockwise quarter turn: `next[x][h - 1 - y] = tiles[y][x]`.
fn rotate_once(tiles: &FootprintMatrix) -> FootprintMatrix {
    let height = tiles.len();
    let width = tiles.first().map_or(0, Vec::len);
    let mut next = vec![vec![None; height]; width];
    for (y, row) in tiles.iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            next[x][height - 1 - y] = cell;
        }
    }
    next
}

impl RotatedFootprint {
    pub fn new(
        building: &BuildingDefinition,
        rotation: BuildingRotation,
    ) -> Result<Self, GenerationError> {
        if building.width() == 0 || building.height() == 0 {
            return Err(GenerationError::EmptyFootprint(building.id.clone()));
        }
        let mut tiles = building.tiles.clone();
        for _ in 0..rotation.quarter_turns() {
            tiles = rotate_once(&tiles);
        }
        Ok(Self { width: tiles.first().map_or(0, Vec::len), height: tiles.len(), tiles })
    }

    /// Every non-empty cell offset by `anchor`, including cells that fall off the map.
    pub fn cells_at(&self, anchor: GridPoint) -> Vec<PlacementCell> {
        let mut cells = Vec::new();
        for (local_y, row) in self.tiles.iter().enumerate() {
            for (local_x, cell) in row.iter().enumerate() {
                if let Some(tile_id) = *cell {
                    cells.push(PlacementCell {
                        point: GridPoint::new(anchor.x + local_x as i32, anchor.y + local_y as i32),
                        tile_id,
                    });
                }
            }
        }
        cells
    }
}

pub fn in_bounds(point: GridPoint, width: usize, height: usize) -> bool {
    point.x >= 0 && point.y >= 0 && (point.x as usize) < width && (point.y as usize) < height
}

/// Non-empty footprint cells clipped to a `width` x `height` map.
pub fn placement_cells(
    building: &BuildingDefinition,
    rotation: BuildingRotation,
    anchor: GridPoint,
    width: usize,
    height: usize,
) -> Result<Vec<PlacementCell>, GenerationError> {
    let footprint = RotatedFootprint::new(building, rotation)?;
    Ok(footprint
        .cells_at(anchor)
        .into_iter()
        .filter(|cell| in_bounds(cell.point, width, height))
        .collect())
}

/// In-bounds neighbors of door cells that fall outside the footprint itself.
pub fn door_fronts(cells: &[PlacementCell], width: usize, height: usize) -> Vec<GridPoint> {
    let mut fronts = Vec::new();
    for door in cells.iter().filter(|cell| cell.tile_id == tile_ids::DOOR) {
        for next in door.point.neighbors() {
            let own = cells.iter().any(|cell| cell.point == next);
            if !own && in_bounds(next, width, height) && !fronts.contains(&next) {
                fronts.push(next);
            }
        }
    }
    fronts
}

/// Writes the in-bounds footprint cells into `grid` and returns how many were written.
pub fn stamp_building(
    grid: &mut TileGrid,
    building: &BuildingDefinition,
    rotation: BuildingRotation,
    anchor: GridPoint,
) -> Result<usize, GenerationError> {
    let height = grid.len();
    let width = grid.first().map_or(0, Vec::len);
    let cells = placement_cells(building, rotation, anchor, width, height)?;
    for cell in &cells {
        if let Some(slot) =
            grid.get_mut(cell.point.y as usize).and_then(|row| row.get_mut(cell.point.x as usize))
        {
            *slot = cell.tile_id;
        }
    }
    Ok(cells.len())
}
