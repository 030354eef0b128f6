//! Scatters signs, NPCs, trainers and items on free cells bordering the route.

use std::collections::BTreeSet;

use crate::context::GenerationContext;
use crate::diagnostics::GenerationDiagnostics;
use crate::error::GenerationError;
use crate::registry::tile_ids;
use crate::rng::SeededRng;
use crate::types::{GridPoint, TileId};

/// Neighbor order used when collecting candidates: north, south, west, east.
const ROUTE_SIDES: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

#[derive(Clone, Copy)]
enum EntityKind {
    Sign,
    Npc,
    Trainer,
    Item,
}

impl EntityKind {
    fn tile(self, index: usize, rng: &mut SeededRng) -> Result<TileId, GenerationError> {
        Ok(match self {
            EntityKind::Sign => tile_ids::SIGN,
            EntityKind::Npc => tile_ids::NPC,
            EntityKind::Trainer => *rng.pick(&tile_ids::TRAINERS)?,
            EntityKind::Item if index % 2 == 0 => tile_ids::ITEM,
            EntityKind::Item => tile_ids::HIDDEN_ITEM,
        })
    }
}

pub(crate) fn run(
    context: &mut GenerationContext<'_>,
    _diagnostics: &mut GenerationDiagnostics,
) -> Result<(), GenerationError> {
    let mut rng = context.rng.fork("placeInteractivesAndEntities");
    let occupied = context.occupied_building_cells()?;
    let path = context.path_cell_set();
    let base = context.base_tile();

    let mut seen = BTreeSet::new();
    let mut available = Vec::new();
    for &cell in &context.state.primary_path_cells {
        for (dx, dy) in ROUTE_SIDES {
            let next = GridPoint::new(cell.x + dx, cell.y + dy);
            if !context.in_bounds(next) || path.contains(&next) || occupied.contains(&next) {
                continue;
            }
            let open = matches!(
                context.tile_at(next),
                Some(tile) if tile == base || tile == tile_ids::FLOWER || tile == tile_ids::TALL_GRASS
            );
            if open && seen.insert(next) {
                available.push(next);
            }
        }
    }
    rng.shuffle(&mut available);

    let mut remaining = available.into_iter();
    let path_tile = context.path_tile();
    for (kind, min, max) in [
        (EntityKind::Sign, 2, 4),
        (EntityKind::Npc, 2, 4),
        (EntityKind::Trainer, 3, 6),
        (EntityKind::Item, 2, 4),
    ] {
        let count = rng.int(min, max) as usize;
        for (index, cell) in remaining.by_ref().take(count).enumerate() {
            if context.tile_at(cell) == Some(path_tile) {
                continue;
            }
            let tile = kind.tile(index, &mut rng)?;
            context.set_tile(cell, tile);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverrides, create_default_random_generation_config};
    use crate::passes::{carve_paths, initialize};
    use crate::presets::GenerationCatalog;

    #[test]
    fn entities_border_the_route_and_respect_counts() {
        let catalog = GenerationCatalog::builtin();
        let config = create_default_random_generation_config(
            ConfigOverrides { seed: Some("entities".into()), ..ConfigOverrides::default() },
            &catalog,
        )
        .expect("config");
        let mut context = GenerationContext::new(&config, &catalog).expect("context");
        let mut diagnostics = GenerationDiagnostics::default();
        initialize::run(&mut context, &mut diagnostics).expect("initialize");
        carve_paths::run(&mut context, &mut diagnostics).expect("carve");
        run(&mut context, &mut diagnostics).expect("entities");

        let path = context.path_cell_set();
        let count_of = |tiles: &[TileId]| {
            context
                .all_cells()
                .filter(|&cell| context.tile_at(cell).is_some_and(|tile| tiles.contains(&tile)))
                .inspect(|cell| assert!(cell.neighbors().iter().any(|next| path.contains(next))))
                .count()
        };
        assert!((2..=4).contains(&count_of(&[tile_ids::SIGN])));
        assert!((2..=4).contains(&count_of(&[tile_ids::NPC])));
        assert!((3..=6).contains(&count_of(&tile_ids::TRAINERS)));
        assert!((2..=4).contains(&count_of(&[tile_ids::ITEM, tile_ids::HIDDEN_ITEM])));
    }
}
