//! Mutable state threaded through every pass of a single generation run.

use std::collections::BTreeSet;

use crate::config::RandomGenerationConfig;
use crate::error::GenerationError;
use crate::footprint::{self, PlacementCell, door_fronts, placement_cells};
use crate::presets::{GenerationCatalog, GenerationTemplateHints, RandomMapArchetype};
use crate::registry::TileRegistry;
use crate::rng::SeededRng;
use crate::types::{GeneratedBuildingPlacement, GridPoint, ReservedDistrict, TileGrid, TileId};

pub const TOWN_DISTRICT_ID: &str = "town";
pub const ROUTE_EAST_DISTRICT_ID: &str = "route_east";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationState {
    pub primary_path_cells: Vec<GridPoint>,
    pub reserved_districts: Vec<ReservedDistrict>,
    pub encounter_anchor_cells: Vec<GridPoint>,
    pub active_template_id: Option<String>,
    pub template_hints: Option<GenerationTemplateHints>,
}

/// Owned by the orchestrator for one run; passes borrow it mutably one at a time.
pub struct GenerationContext<'a> {
    pub config: &'a RandomGenerationConfig,
    pub catalog: &'a GenerationCatalog,
    pub archetype: &'a RandomMapArchetype,
    pub rng: SeededRng,
    pub grid: TileGrid,
    pub building_placements: Vec<GeneratedBuildingPlacement>,
    pub state: GenerationState,
}

impl<'a> GenerationContext<'a> {
    pub fn new(
        config: &'a RandomGenerationConfig,
        catalog: &'a GenerationCatalog,
    ) -> Result<Self, GenerationError> {
        let dimensions = config.dimensions.validate()?;
        let archetype = catalog.archetype(&config.archetype_id)?;
        if !catalog.registry.is_known(config.base_fill_tile_id) {
            return Err(GenerationError::UnknownBaseTile(config.base_fill_tile_id));
        }
        Ok(Self {
            config,
            catalog,
            archetype,
            rng: SeededRng::new(config.seed.clone()),
            grid: filled_grid(dimensions.width, dimensions.height, config.base_fill_tile_id),
            building_placements: Vec::new(),
            state: GenerationState::default(),
        })
    }

    pub fn width(&self) -> i32 {
        self.config.dimensions.width as i32
    }

    pub fn height(&self) -> i32 {
        self.config.dimensions.height as i32
    }

    pub fn area(&self) -> i32 {
        self.width() * self.height()
    }

    pub fn registry(&self) -> &'a TileRegistry {
        &self.catalog.registry
    }

    pub fn base_tile(&self) -> TileId {
        self.config.base_fill_tile_id
    }

    pub fn path_tile(&self) -> TileId {
        self.archetype.tile_roles.primary_path_tile_id
    }

    pub fn in_bounds(&self, point: GridPoint) -> bool {
        footprint::in_bounds(point, self.width() as usize, self.height() as usize)
    }

    pub fn tile_at(&self, point: GridPoint) -> Option<TileId> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        self.grid.get(point.y as usize)?.get(point.x as usize).copied()
    }

    /// Writes `tile_id` when `point` exists in the grid; returns whether it did.
    pub fn set_tile(&mut self, point: GridPoint, tile_id: TileId) -> bool {
        if point.x < 0 || point.y < 0 {
            return false;
        }
        match self.grid.get_mut(point.y as usize).and_then(|row| row.get_mut(point.x as usize)) {
            Some(slot) => {
                *slot = tile_id;
                true
            }
            None => false,
        }
    }

    pub fn is_path(&self, point: GridPoint) -> bool {
        self.tile_at(point) == Some(self.path_tile())
    }

    pub fn town_district(&self) -> Option<&ReservedDistrict> {
        self.state.reserved_districts.iter().find(|district| district.id == TOWN_DISTRICT_ID)
    }

    pub fn template_hints(&self) -> Option<&GenerationTemplateHints> {
        self.state.template_hints.as_ref()
    }

    /// In-bounds cells covered by every placed footprint.
    pub fn occupied_building_cells(&self) -> Result<BTreeSet<GridPoint>, GenerationError> {
        let width = self.width() as usize;
        let height = self.height() as usize;
        let mut occupied = BTreeSet::new();
        for placement in &self.building_placements {
            let building = self.registry().building(&placement.building_id)?;
            for cell in placement_cells(building, placement.rotation, placement.anchor, width, height)? {
                occupied.insert(cell.point);
            }
        }
        Ok(occupied)
    }

    /// Footprint cells of every placement plus the clear cells in front of their doors.
    pub fn claimed_cells(&self) -> Result<ClaimedCells, GenerationError> {
        let (width, height) = (self.width() as usize, self.height() as usize);
        let mut claimed = ClaimedCells::default();
        for placement in &self.building_placements {
            let building = self.registry().building(&placement.building_id)?;
            let cells = placement_cells(building, placement.rotation, placement.anchor, width, height)?;
            let fronts = door_fronts(&cells, width, height);
            claimed.claim(&cells, fronts);
        }
        Ok(claimed)
    }

    /// Path cells found by a row-major scan of the grid.
    pub fn scan_path_cells(&self) -> Vec<GridPoint> {
        let path_tile = self.path_tile();
        let mut cells = Vec::new();
        for (y, row) in self.grid.iter().enumerate() {
            for (x, &tile) in row.iter().enumerate() {
                if tile == path_tile {
                    cells.push(GridPoint::new(x as i32, y as i32));
                }
            }
        }
        cells
    }

    pub fn path_cell_set(&self) -> BTreeSet<GridPoint> {
        self.state.primary_path_cells.iter().copied().collect()
    }

    pub fn all_cells(&self) -> impl Iterator<Item = GridPoint> + use<> {
        let width = self.width();
        (0..self.height()).flat_map(move |y| (0..width).map(move |x| GridPoint::new(x, y)))
    }
}

/// Cells new buildings must stay off: existing footprints and the fronts of their doors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimedCells {
    pub occupied: BTreeSet<GridPoint>,
    pub fronts: BTreeSet<GridPoint>,
}

impl ClaimedCells {
    /// A candidate fits when it covers no claimed cell and its own door fronts are not built on.
    pub fn admits(&self, cells: &[PlacementCell], fronts: &[GridPoint]) -> bool {
        cells
            .iter()
            .all(|cell| !self.occupied.contains(&cell.point) && !self.fronts.contains(&cell.point))
            && fronts.iter().all(|front| !self.occupied.contains(front))
    }

    pub fn claim(&mut self, cells: &[PlacementCell], fronts: Vec<GridPoint>) {
        self.occupied.extend(cells.iter().map(|cell| cell.point));
        self.fronts.extend(fronts);
    }
}

pub fn filled_grid(width: u32, height: u32, tile_id: TileId) -> TileGrid {
    vec![vec![tile_id; width as usize]; height as usize]
}
