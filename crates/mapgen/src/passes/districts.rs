//! Reserves the town block beside the route and the open route district east of it.

use crate::context::{GenerationContext, ROUTE_EAST_DISTRICT_ID, TOWN_DISTRICT_ID};
use crate::diagnostics::GenerationDiagnostics;
use crate::error::GenerationError;
use crate::math::{clamp_i32, round_half_up};
use crate::types::{GridPoint, ReservedDistrict};

const DEFAULT_TOWN_WIDTH_RATIO: f64 = 0.3;
const DEFAULT_TOWN_HEIGHT_RATIO: f64 = 0.5;
const DEFAULT_TOWN_ANCHOR_X_RATIO: f64 = 0.18;

/// Town size from a ratio, held to 8..=14 by 7..=12 and shrunk to fit tiny maps.
fn town_size(width: i32, height: i32, width_ratio: f64, height_ratio: f64) -> (i32, i32) {
    let town_width = clamp_i32((f64::from(width) * width_ratio).floor() as i32, 8, 14);
    let town_height = clamp_i32((f64::from(height) * height_ratio).floor() as i32, 7, 12);
    (town_width.min(width - 2).max(1), town_height.min(height - 2).max(1))
}

fn first_path_row(cells: &[GridPoint], x: i32) -> Option<i32> {
    cells.iter().find(|cell| cell.x == x).map(|cell| cell.y)
}

pub(crate) fn run(
    context: &mut GenerationContext<'_>,
    _diagnostics: &mut GenerationDiagnostics,
) -> Result<(), GenerationError> {
    let mut rng = context.rng.fork("reserveDistricts");
    let (width, height) = (context.width(), context.height());
    let town_hint = context.template_hints().and_then(|hints| hints.town);
    let (town_width, town_height) = town_size(
        width,
        height,
        town_hint.map_or(DEFAULT_TOWN_WIDTH_RATIO, |hint| hint.width_ratio),
        town_hint.map_or(DEFAULT_TOWN_HEIGHT_RATIO, |hint| hint.height_ratio),
    );
    let anchor_x_ratio = town_hint.map_or(DEFAULT_TOWN_ANCHOR_X_RATIO, |hint| hint.anchor_x_ratio);
    let anchor_x = clamp_i32(
        (f64::from(width) * anchor_x_ratio).floor() as i32 + rng.int(-2, 2),
        1,
        width - town_width - 1,
    );

    let path_y = first_path_row(&context.state.primary_path_cells, anchor_x).unwrap_or(height / 2);
    let from_path = path_y - town_height / 2;
    let from_ratio = town_hint.map_or(from_path, |hint| {
        (f64::from(height) * hint.anchor_y_ratio).floor() as i32 - town_height / 2
    });
    let anchor_y = clamp_i32(
        round_half_up(f64::from(from_path + from_ratio) / 2.0),
        1,
        height - town_height - 1,
    );

    let base = context.base_tile();
    let path_tile = context.path_tile();
    // The route keeps running through town; everything else inside the block is cleared.
    for y in anchor_y..anchor_y + town_height {
        for x in anchor_x..anchor_x + town_width {
            let cell = GridPoint::new(x, y);
            if !context.is_path(cell) {
                context.set_tile(cell, base);
            }
        }
    }

    let road_y = clamp_i32(path_y, anchor_y + 1, anchor_y + town_height - 2);
    let road_x = clamp_i32(anchor_x + town_width / 2, anchor_x + 1, anchor_x + town_width - 2);
    for x in anchor_x..anchor_x + town_width {
        context.set_tile(GridPoint::new(x, road_y), path_tile);
    }
    for y in anchor_y..anchor_y + town_height {
        context.set_tile(GridPoint::new(road_x, y), path_tile);
    }

    let town = ReservedDistrict {
        id: TOWN_DISTRICT_ID.to_string(),
        x: anchor_x,
        y: anchor_y,
        width: town_width,
        height: town_height,
    };
    log::debug!("town district {}x{} at ({anchor_x}, {anchor_y})", town.width, town.height);
    context.state.reserved_districts = vec![
        town,
        ReservedDistrict {
            id: ROUTE_EAST_DISTRICT_ID.to_string(),
            x: anchor_x + town_width,
            y: 1,
            width: (width - (anchor_x + town_width) - 1).max(0),
            height: height - 2,
        },
    ];
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverrides, GenerationDimensions, create_default_random_generation_config};
    use crate::passes::{carve_paths, initialize};
    use crate::presets::GenerationCatalog;

    #[test]
    fn town_size_respects_bounds_and_tiny_maps() {
        assert_eq!(town_size(25, 18, 0.3, 0.5), (8, 9));
        assert_eq!(town_size(60, 40, 0.5, 0.65), (14, 12));
        assert_eq!(town_size(5, 5, 0.3, 0.5), (3, 3));
    }

    #[test]
    fn districts_stay_inside_the_map_with_a_road_cross() {
        let catalog = GenerationCatalog::builtin();
        for (width, height) in [(25, 18), (10, 9), (5, 5), (60, 40)] {
            let config = create_default_random_generation_config(
                ConfigOverrides {
                    seed: Some("districts".into()),
                    dimensions: Some(GenerationDimensions { width, height }),
                    template_id: Some("cliffside_detour".into()),
                    ..ConfigOverrides::default()
                },
                &catalog,
            )
            .expect("config");
            let mut context = GenerationContext::new(&config, &catalog).expect("context");
            let mut diagnostics = GenerationDiagnostics::default();
            initialize::run(&mut context, &mut diagnostics).expect("initialize");
            carve_paths::run(&mut context, &mut diagnostics).expect("carve");
            run(&mut context, &mut diagnostics).expect("districts");

            let town = context.town_district().expect("town").clone();
            assert!(town.x >= 0 && town.y >= 0);
            assert!(town.x + town.width <= context.width());
            assert!(town.y + town.height <= context.height());
            let road_cells = (town.x..town.x + town.width)
                .flat_map(|x| (town.y..town.y + town.height).map(move |y| GridPoint::new(x, y)))
                .filter(|&cell| context.is_path(cell))
                .count() as i32;
            assert!(road_cells >= town.width.max(town.height), "town should carry its road cross");
            assert_eq!(context.state.reserved_districts[1].id, ROUTE_EAST_DISTRICT_ID);
            assert!(context.state.primary_path_cells.iter().all(|&cell| context.is_path(cell)));
        }
    }
}
