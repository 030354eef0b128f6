//! Density control run after raw placement: town street cleanup plus trainer and encounter clamps.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::iter;

use crate::context::GenerationContext;
use crate::diagnostics::GenerationDiagnostics;
use crate::error::GenerationError;
use crate::math::clamp_i32;
use crate::registry::tile_ids;
use crate::rng::SeededRng;
use crate::types::{GridPoint, TileId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DensityAdjustment {
    pub removed: usize,
    pub added: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DensityBounds {
    pub min: usize,
    pub max: usize,
}

impl DensityBounds {
    pub fn contains(self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

pub fn trainer_bounds(path_cell_count: usize) -> DensityBounds {
    let path_cells = path_cell_count.max(1) as f64;
    let min = ((path_cells * 0.04).floor() as usize).max(1);
    let max = ((path_cells * 0.16).ceil() as usize).max(min);
    DensityBounds { min, max }
}

/// Area-relative encounter band; the lower bound wins when the range inverts on tiny maps.
pub fn encounter_bounds(area: usize) -> DensityBounds {
    let area = area as f64;
    let min = clamp_i32((area * 0.035).floor() as i32, 8, (area * 0.1).floor() as i32) as usize;
    let max = ((area * 0.14).floor() as usize).max(min);
    DensityBounds { min, max }
}

struct BalanceInputs {
    occupied: BTreeSet<GridPoint>,
    town_buffer: BTreeSet<GridPoint>,
    path_cells: Vec<GridPoint>,
    path_set: BTreeSet<GridPoint>,
}

pub(crate) fn run(
    context: &mut GenerationContext<'_>,
    diagnostics: &mut GenerationDiagnostics,
) -> Result<(), GenerationError> {
    let path_cells = context.state.primary_path_cells.clone();
    let inputs = BalanceInputs {
        occupied: context.occupied_building_cells()?,
        town_buffer: town_path_buffer(context),
        path_set: path_cells.iter().copied().collect(),
        path_cells,
    };

    let cleared = clear_town_path_clutter(context, &inputs);
    let trainers = clamp_trainer_density(context, &inputs)?;
    let encounters = clamp_encounter_density(context, &inputs);

    if cleared > 0
        || trainers != DensityAdjustment::default()
        || encounters != DensityAdjustment::default()
    {
        diagnostics.warn(format!(
            "Balance pass adjusted clutter:{cleared} trainers:-{}/+{} encounters:-{}/+{}.",
            trainers.removed, trainers.added, encounters.removed, encounters.added
        ));
    }
    Ok(())
}

/// Path cells inside the town district plus their in-bounds 4-neighbors.
fn town_path_buffer(context: &GenerationContext<'_>) -> BTreeSet<GridPoint> {
    let Some(town) = context.town_district() else {
        return BTreeSet::new();
    };
    let mut buffer = BTreeSet::new();
    for &cell in context.state.primary_path_cells.iter().filter(|&&cell| town.contains(cell)) {
        let cross = iter::once(cell).chain(cell.neighbors());
        buffer.extend(cross.filter(|&next| context.in_bounds(next)));
    }
    buffer
}

fn min_path_distance(cell: GridPoint, path_cells: &[GridPoint]) -> u32 {
    path_cells.iter().map(|&path| path.manhattan(cell)).min().unwrap_or(u32::MAX)
}

fn clear_town_path_clutter(context: &mut GenerationContext<'_>, inputs: &BalanceInputs) -> usize {
    let base = context.base_tile();
    let mut cleared = 0;
    for &cell in inputs.town_buffer.difference(&inputs.occupied) {
        if context.tile_at(cell).is_some_and(|tile| tile_ids::TOWN_PATH_CLUTTER.contains(&tile)) {
            context.set_tile(cell, base);
            cleared += 1;
        }
    }
    cleared
}

fn cells_with(context: &GenerationContext<'_>, tiles: &[TileId]) -> Vec<GridPoint> {
    context
        .all_cells()
        .filter(|&cell| context.tile_at(cell).is_some_and(|tile| tiles.contains(&tile)))
        .collect()
}

/// Drops the `excess` highest-ranked cells: town-buffer cells first, then nearest to the path.
fn remove_excess(
    context: &mut GenerationContext<'_>,
    rng: &mut SeededRng,
    mut cells: Vec<GridPoint>,
    excess: usize,
    inputs: &BalanceInputs,
) -> usize {
    rng.shuffle(&mut cells);
    cells.sort_by_key(|&cell| {
        (
            Reverse(inputs.town_buffer.contains(&cell)),
            min_path_distance(cell, &inputs.path_cells),
            cell.y,
            cell.x,
        )
    });
    let base = context.base_tile();
    let mut removed = 0;
    for &cell in cells.iter().take(excess) {
        context.set_tile(cell, base);
        removed += 1;
    }
    removed
}

fn is_free_for_top_up(cell: GridPoint, inputs: &BalanceInputs) -> bool {
    !inputs.occupied.contains(&cell)
        && !inputs.town_buffer.contains(&cell)
        && !inputs.path_set.contains(&cell)
}

fn top_up_candidates(
    context: &GenerationContext<'_>,
    inputs: &BalanceInputs,
    allowed: &[TileId],
    distance: (u32, u32),
) -> Vec<GridPoint> {
    context
        .all_cells()
        .filter(|&cell| is_free_for_top_up(cell, inputs))
        .filter(|&cell| context.tile_at(cell).is_some_and(|tile| allowed.contains(&tile)))
        .filter(|&cell| {
            let to_path = min_path_distance(cell, &inputs.path_cells);
            to_path >= distance.0 && to_path <= distance.1
        })
        .collect()
}

fn clamp_trainer_density(
    context: &mut GenerationContext<'_>,
    inputs: &BalanceInputs,
) -> Result<DensityAdjustment, GenerationError> {
    let bounds = trainer_bounds(inputs.path_cells.len());
    let mut rng = context.rng.fork("balance:trainers");
    let trainers = cells_with(context, &tile_ids::TRAINERS);
    let mut adjustment = DensityAdjustment::default();

    if trainers.len() > bounds.max {
        let excess = trainers.len() - bounds.max;
        adjustment.removed = remove_excess(context, &mut rng, trainers.clone(), excess, inputs);
    }

    let remaining = trainers.len() - adjustment.removed;
    if remaining < bounds.min && !inputs.path_cells.is_empty() {
        let allowed = [context.base_tile(), tile_ids::FLOWER, tile_ids::TREE];
        let mut candidates = top_up_candidates(context, inputs, &allowed, (1, 1));
        rng.shuffle(&mut candidates);
        for &cell in candidates.iter().take(bounds.min - remaining) {
            let trainer = *rng.pick(&tile_ids::TRAINERS)?;
            context.set_tile(cell, trainer);
            adjustment.added += 1;
        }
    }

    log::debug!(
        "trainer density {}..={}: -{} +{}",
        bounds.min,
        bounds.max,
        adjustment.removed,
        adjustment.added
    );
    Ok(adjustment)
}

fn clamp_encounter_density(
    context: &mut GenerationContext<'_>,
    inputs: &BalanceInputs,
) -> DensityAdjustment {
    let bounds = encounter_bounds(context.area() as usize);
    let archetype = context.archetype;
    let options = archetype.tile_roles.encounter_tiles();
    let mut rng = context.rng.fork("balance:encounters");
    let encounters = cells_with(context, options);
    let mut adjustment = DensityAdjustment::default();

    if encounters.len() > bounds.max {
        let excess = encounters.len() - bounds.max;
        adjustment.removed = remove_excess(context, &mut rng, encounters.clone(), excess, inputs);
    }

    let remaining = encounters.len() - adjustment.removed;
    if remaining < bounds.min && !inputs.path_cells.is_empty() {
        let Some(&patch_tile) = options.first() else {
            return adjustment;
        };
        let needed = bounds.min - remaining;
        let base = context.base_tile();

        let mut preferred = top_up_candidates(context, inputs, &[base, tile_ids::FLOWER], (2, 7));
        rng.shuffle(&mut preferred);
        for &cell in preferred.iter().take(needed) {
            context.set_tile(cell, patch_tile);
            adjustment.added += 1;
        }

        if adjustment.added < needed {
            let allowed = [base, tile_ids::FLOWER, tile_ids::TREE];
            let mut fallback = top_up_candidates(context, inputs, &allowed, (1, 9));
            rng.shuffle(&mut fallback);
            for &cell in fallback.iter().take(needed - adjustment.added) {
                context.set_tile(cell, patch_tile);
                adjustment.added += 1;
            }
        }
    }

    log::debug!(
        "encounter density {}..={}: -{} +{}",
        bounds.min,
        bounds.max,
        adjustment.removed,
        adjustment.added
    );
    adjustment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ConfigOverrides, GenerationDimensions, RandomGenerationConfig,
        create_default_random_generation_config,
    };
    use crate::context::TOWN_DISTRICT_ID;
    use crate::presets::GenerationCatalog;
    use crate::types::ReservedDistrict;

    fn config(width: u32, height: u32) -> RandomGenerationConfig {
        create_default_random_generation_config(
            ConfigOverrides {
                seed: Some("balance".into()),
                dimensions: Some(GenerationDimensions { width, height }),
                ..ConfigOverrides::default()
            },
            &GenerationCatalog::builtin(),
        )
        .expect("config")
    }

    fn carve_row(context: &mut GenerationContext<'_>, y: i32) {
        for x in 0..context.width() {
            context.set_tile(GridPoint::new(x, y), tile_ids::PATH);
        }
        context.state.primary_path_cells = context.scan_path_cells();
    }

    #[test]
    fn trainer_band_scales_with_path_length() {
        assert_eq!(trainer_bounds(0), DensityBounds { min: 1, max: 1 });
        assert_eq!(trainer_bounds(25), DensityBounds { min: 1, max: 4 });
        assert_eq!(trainer_bounds(60), DensityBounds { min: 2, max: 10 });
    }

    #[test]
    fn encounter_band_keeps_the_floor_on_tiny_maps() {
        assert_eq!(encounter_bounds(25), DensityBounds { min: 8, max: 8 });
        assert_eq!(encounter_bounds(450), DensityBounds { min: 15, max: 63 });
        assert_eq!(encounter_bounds(600), DensityBounds { min: 21, max: 84 });
    }

    #[test]
    fn excess_trainers_are_trimmed_nearest_first() {
        let catalog = GenerationCatalog::builtin();
        let config = config(20, 10);
        let mut context = GenerationContext::new(&config, &catalog).expect("context");
        carve_row(&mut context, 5);
        for x in 0..10 {
            context.set_tile(GridPoint::new(x * 2, 4), tile_ids::TRAINER_UP);
        }
        context.set_tile(GridPoint::new(3, 0), tile_ids::TRAINER_DOWN);

        let mut diagnostics = GenerationDiagnostics::default();
        run(&mut context, &mut diagnostics).expect("balance");

        let remaining = cells_with(&context, &tile_ids::TRAINERS);
        assert_eq!(remaining.len(), trainer_bounds(20).max);
        assert!(remaining.contains(&GridPoint::new(3, 0)), "farthest trainer should survive");
        assert!(diagnostics.warnings[0].contains("trainers:-7/+0"));
    }

    #[test]
    fn sparse_maps_are_topped_up_and_reported() {
        let catalog = GenerationCatalog::builtin();
        let config = config(25, 18);
        let mut context = GenerationContext::new(&config, &catalog).expect("context");
        carve_row(&mut context, 9);

        let mut diagnostics = GenerationDiagnostics::default();
        run(&mut context, &mut diagnostics).expect("balance");

        let trainers = cells_with(&context, &tile_ids::TRAINERS);
        assert!(trainer_bounds(25).contains(trainers.len()));
        assert!(trainers.iter().all(|cell| cell.y == 8 || cell.y == 10));
        let encounters = cells_with(&context, &tile_ids::DEFAULT_ENCOUNTERS);
        assert!(encounter_bounds(450).contains(encounters.len()));
        assert_eq!(
            diagnostics.warnings,
            vec!["Balance pass adjusted clutter:0 trainers:-0/+1 encounters:-0/+15.".to_string()]
        );
    }

    #[test]
    fn town_streets_are_cleared_of_clutter() {
        let catalog = GenerationCatalog::builtin();
        let config = config(20, 10);
        let mut context = GenerationContext::new(&config, &catalog).expect("context");
        carve_row(&mut context, 5);
        context.state.reserved_districts.push(ReservedDistrict {
            id: TOWN_DISTRICT_ID.into(),
            x: 0,
            y: 2,
            width: 6,
            height: 6,
        });
        context.set_tile(GridPoint::new(2, 4), tile_ids::SIGN);
        context.set_tile(GridPoint::new(3, 6), tile_ids::FLOWER);
        context.set_tile(GridPoint::new(12, 6), tile_ids::FLOWER);

        let inputs = BalanceInputs {
            occupied: BTreeSet::new(),
            town_buffer: town_path_buffer(&context),
            path_cells: context.state.primary_path_cells.clone(),
            path_set: context.path_cell_set(),
        };
        assert_eq!(clear_town_path_clutter(&mut context, &inputs), 2);
        assert_eq!(context.tile_at(GridPoint::new(12, 6)), Some(tile_ids::FLOWER));
    }

    #[test]
    fn balancing_is_deterministic() {
        let catalog = GenerationCatalog::builtin();
        let config = config(25, 18);
        let build = || {
            let mut context = GenerationContext::new(&config, &catalog).expect("context");
            carve_row(&mut context, 9);
            run(&mut context, &mut GenerationDiagnostics::default()).expect("balance");
            context.grid
        };
        assert_eq!(build(), build());
    }
}
