//! Placed-building containment, door access and quota checks.

use std::collections::BTreeSet;

use crate::context::GenerationContext;
use crate::diagnostics::ValidationIssue;
use crate::error::GenerationError;
use crate::footprint::{PlacementCell, RotatedFootprint};
use crate::registry::tile_ids;
use crate::types::{GeneratedBuildingPlacement, GridPoint};

use super::ConstraintId;

/// Unclipped footprint cells of one placement.
pub fn footprint_cells(
    context: &GenerationContext<'_>,
    placement: &GeneratedBuildingPlacement,
) -> Result<Vec<PlacementCell>, GenerationError> {
    let building = context.registry().building(&placement.building_id)?;
    Ok(RotatedFootprint::new(building, placement.rotation)?.cells_at(placement.anchor))
}

/// In-bounds door cells of a placement paired with the placement's in-bounds footprint.
pub fn door_cells(
    context: &GenerationContext<'_>,
    placement: &GeneratedBuildingPlacement,
) -> Result<(Vec<GridPoint>, BTreeSet<GridPoint>), GenerationError> {
    let cells: Vec<PlacementCell> = footprint_cells(context, placement)?
        .into_iter()
        .filter(|cell| context.in_bounds(cell.point))
        .collect();
    let doors = cells
        .iter()
        .filter(|cell| cell.tile_id == tile_ids::DOOR)
        .map(|cell| cell.point)
        .collect();
    Ok((doors, cells.iter().map(|cell| cell.point).collect()))
}

pub(super) fn building_footprints_in_bounds(
    context: &GenerationContext<'_>,
) -> Result<Vec<ValidationIssue>, GenerationError> {
    let mut outside = Vec::new();
    for placement in &context.building_placements {
        outside.extend(
            footprint_cells(context, placement)?
                .into_iter()
                .map(|cell| cell.point)
                .filter(|&point| !context.in_bounds(point)),
        );
    }

    if outside.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![
        ValidationIssue::error(
            ConstraintId::BuildingFootprintsInBounds,
            format!("Found {} building footprint cells outside map bounds.", outside.len()),
        )
        .with_cells(outside),
    ])
}

pub(super) fn building_door_connectivity(
    context: &GenerationContext<'_>,
) -> Result<Vec<ValidationIssue>, GenerationError> {
    let mut disconnected = Vec::new();
    for placement in &context.building_placements {
        let (doors, own_cells) = door_cells(context, placement)?;
        for door in doors {
            let connected = door.neighbors().into_iter().any(|next| {
                context.in_bounds(next) && !own_cells.contains(&next) && context.is_path(next)
            });
            if !connected {
                disconnected.push(door);
            }
        }
    }

    if disconnected.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![
        ValidationIssue::error(
            ConstraintId::BuildingDoorConnectivity,
            format!("Found {} building doors without path adjacency.", disconnected.len()),
        )
        .with_cells(disconnected),
    ])
}

pub(super) fn min_required_structures(context: &GenerationContext<'_>) -> Vec<ValidationIssue> {
    let missing: Vec<String> = context
        .archetype
        .building_targets
        .iter()
        .filter(|target| target.range.min > 0)
        .filter_map(|target| {
            let placed = context
                .building_placements
                .iter()
                .filter(|placement| placement.building_id == target.building_id)
                .count();
            (placed < target.range.min as usize)
                .then(|| format!("{} ({placed}/{})", target.building_id, target.range.min))
        })
        .collect();

    if missing.is_empty() {
        return Vec::new();
    }
    vec![ValidationIssue::error(
        ConstraintId::MinRequiredStructures,
        format!("Missing required structures: {}.", missing.join(", ")),
    )]
}

#[cfg(test)]
mod tests {
    use super::super::test_support::config;
    use super::*;
    use crate::footprint::stamp_building;
    use crate::presets::GenerationCatalog;
    use crate::types::BuildingRotation;

    fn house_at(x: i32, y: i32) -> GeneratedBuildingPlacement {
        GeneratedBuildingPlacement {
            building_id: "house-small".into(),
            rotation: BuildingRotation::R0,
            anchor: GridPoint::new(x, y),
        }
    }

    #[test]
    fn overhanging_footprint_cells_are_counted() {
        let catalog = GenerationCatalog::builtin();
        let config = config(8, 6);
        let mut context = GenerationContext::new(&config, &catalog).expect("context");
        context.building_placements.push(house_at(6, 4));

        let issues = building_footprints_in_bounds(&context).expect("known building");
        assert_eq!(issues[0].message, "Found 5 building footprint cells outside map bounds.");
    }

    #[test]
    fn door_needs_path_outside_its_own_footprint() {
        let catalog = GenerationCatalog::builtin();
        let config = config(8, 6);
        let mut context = GenerationContext::new(&config, &catalog).expect("context");
        let placement = house_at(2, 1);
        let building = catalog.registry.building("house-small").expect("builtin");
        stamp_building(&mut context.grid, building, placement.rotation, placement.anchor)
            .expect("stamp");
        context.building_placements.push(placement);

        let issues = building_door_connectivity(&context).expect("known building");
        assert_eq!(issues[0].message, "Found 1 building doors without path adjacency.");
        assert_eq!(issues[0].cells, Some(vec![GridPoint::new(3, 3)]));

        context.set_tile(GridPoint::new(3, 4), tile_ids::PATH);
        assert!(building_door_connectivity(&context).expect("known building").is_empty());
    }

    #[test]
    fn quota_shortfall_lists_each_building() {
        let catalog = GenerationCatalog::builtin();
        let config = config(8, 6);
        let mut context = GenerationContext::new(&config, &catalog).expect("context");
        context.building_placements.push(house_at(0, 0));
        let issues = min_required_structures(&context);
        assert_eq!(
            issues[0].message,
            "Missing required structures: pokecenter (0/1), pokemart (0/1)."
        );
    }
}
