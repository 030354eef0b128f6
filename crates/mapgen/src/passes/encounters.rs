//! Paints encounter patches beside every third route cell outside town, biased by template zone.

use crate::context::GenerationContext;
use crate::diagnostics::GenerationDiagnostics;
use crate::error::GenerationError;
use crate::math::clamp_i32;
use crate::presets::EncounterZoneBias;
use crate::registry::tile_ids;
use crate::types::GridPoint;

const PATCH_CHANCE: f64 = 0.4;
const ALTERNATE_TILE_CHANCE: f64 = 0.18;

fn zone_allows(zone: EncounterZoneBias, cell: GridPoint, width: i32) -> bool {
    match zone {
        EncounterZoneBias::East => cell.x >= (f64::from(width) * 0.45).floor() as i32,
        EncounterZoneBias::West => cell.x <= (f64::from(width) * 0.55).ceil() as i32,
        EncounterZoneBias::Balanced => true,
    }
}

pub(crate) fn run(
    context: &mut GenerationContext<'_>,
    _diagnostics: &mut GenerationDiagnostics,
) -> Result<(), GenerationError> {
    let mut rng = context.rng.fork("placeEncounters");
    let (width, height) = (context.width(), context.height());
    let archetype = context.archetype;
    let options = archetype.tile_roles.encounter_tiles();
    let Some((&primary_tile, alternates)) = options.split_first() else {
        return Ok(());
    };
    let buildings = context.occupied_building_cells()?;
    let zone = context.template_hints().map(|hints| hints.zone()).unwrap_or_default();
    let town = context.town_district().cloned();
    let base = context.base_tile();

    let zoned: Vec<GridPoint> = context
        .state
        .primary_path_cells
        .iter()
        .copied()
        .filter(|&cell| zone_allows(zone, cell, width))
        .collect();
    let mut anchors_source =
        if zoned.is_empty() { context.state.primary_path_cells.clone() } else { zoned };
    anchors_source.retain(|&cell| town.as_ref().is_none_or(|town| !town.contains(cell)));
    anchors_source.sort_by_key(|cell| cell.x);

    let mut anchors = Vec::new();
    for (index, &anchor) in anchors_source.iter().enumerate() {
        if index % 3 != 0 || !rng.chance(PATCH_CHANCE) {
            continue;
        }

        let patch_width = rng.int(2, 4);
        let patch_height = rng.int(2, 3);
        let side = *rng.pick(&[-1, 1])?;
        let start_x = clamp_i32(anchor.x + rng.int(-1, 1), 1, width - patch_width - 1);
        let start_y =
            clamp_i32(anchor.y + side * rng.int(2, 4), 1, height - patch_height - 1);
        let tile = if !alternates.is_empty() && rng.chance(ALTERNATE_TILE_CHANCE) {
            *rng.pick(alternates)?
        } else {
            primary_tile
        };

        let mut painted = false;
        for y in start_y..start_y + patch_height {
            for x in start_x..start_x + patch_width {
                let cell = GridPoint::new(x, y);
                if context.is_path(cell) || buildings.contains(&cell) {
                    continue;
                }
                if matches!(context.tile_at(cell), Some(current) if current == base || current == tile_ids::FLOWER)
                {
                    context.set_tile(cell, tile);
                    painted = true;
                }
            }
        }
        if painted {
            anchors.push(anchor);
        }
    }

    log::debug!("painted {} encounter patches", anchors.len());
    context.state.encounter_anchor_cells = anchors;
    Ok(())
}
