//! Repair actions keyed 1:1 to constraint ids, applied in registry order once per round.

mod buildings;
mod grid;
mod path;
mod spawn;

use std::collections::BTreeSet;

use crate::context::GenerationContext;
use crate::diagnostics::{GenerationRepairAction, ValidationIssue};
use crate::error::GenerationError;
use crate::validation::ConstraintId;

pub use path::carve_manhattan;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepairKind {
    NormalizeGridBounds,
    ReplaceUnknownTileIds,
    ReconnectCriticalPath,
    ConnectBuildingDoors,
    RelocateBuildingFootprints,
    ForceRequiredStructures,
    EnforceSpawnSafety,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepairDescriptor {
    pub issue: ConstraintId,
    pub id_prefix: &'static str,
    pub kind: RepairKind,
}

pub const REPAIR_REGISTRY: [RepairDescriptor; 7] = [
    RepairDescriptor {
        issue: ConstraintId::BoundedMap,
        id_prefix: "repair-bounded-map",
        kind: RepairKind::NormalizeGridBounds,
    },
    RepairDescriptor {
        issue: ConstraintId::KnownTileIdsOnly,
        id_prefix: "repair-known-tile-ids",
        kind: RepairKind::ReplaceUnknownTileIds,
    },
    RepairDescriptor {
        issue: ConstraintId::ReachableCriticalPath,
        id_prefix: "repair-reconnect-critical-path",
        kind: RepairKind::ReconnectCriticalPath,
    },
    RepairDescriptor {
        issue: ConstraintId::BuildingDoorConnectivity,
        id_prefix: "repair-building-door-connectivity",
        kind: RepairKind::ConnectBuildingDoors,
    },
    RepairDescriptor {
        issue: ConstraintId::BuildingFootprintsInBounds,
        id_prefix: "repair-building-footprints",
        kind: RepairKind::RelocateBuildingFootprints,
    },
    RepairDescriptor {
        issue: ConstraintId::MinRequiredStructures,
        id_prefix: "repair-force-required-structures",
        kind: RepairKind::ForceRequiredStructures,
    },
    RepairDescriptor {
        issue: ConstraintId::SpawnSafety,
        id_prefix: "repair-spawn-safety",
        kind: RepairKind::EnforceSpawnSafety,
    },
];

impl RepairKind {
    /// Number of changes made; zero means the grid and placements are untouched.
    fn run(self, context: &mut GenerationContext<'_>) -> Result<usize, GenerationError> {
        match self {
            RepairKind::NormalizeGridBounds => Ok(usize::from(grid::normalize_grid_bounds(context))),
            RepairKind::ReplaceUnknownTileIds => Ok(grid::replace_unknown_tile_ids(context)),
            RepairKind::ReconnectCriticalPath => Ok(path::reconnect_path_components(context)),
            RepairKind::ConnectBuildingDoors => buildings::connect_building_doors(context),
            RepairKind::RelocateBuildingFootprints => buildings::relocate_building_footprints(context),
            RepairKind::ForceRequiredStructures => buildings::force_required_structures(context),
            RepairKind::EnforceSpawnSafety => Ok(spawn::enforce_spawn_safety(context)),
        }
    }

    fn describe(self, changes: usize) -> String {
        match self {
            RepairKind::NormalizeGridBounds => "Normalize grid bounds to configured dimensions.".into(),
            RepairKind::ReplaceUnknownTileIds => {
                format!("Replace unknown tile ids with base terrain ({changes} cells).")
            }
            RepairKind::ReconnectCriticalPath => "Reconnect disconnected primary path segments.".into(),
            RepairKind::ConnectBuildingDoors => "Connect building doors to nearby path cells.".into(),
            RepairKind::RelocateBuildingFootprints => {
                format!("Relocate or remove out-of-bounds buildings ({changes} placements).")
            }
            RepairKind::ForceRequiredStructures => {
                format!("Force minimum required buildings when placement is possible ({changes} added).")
            }
            RepairKind::EnforceSpawnSafety => "Enforce walkable and escapable spawn cell.".into(),
        }
    }
}

/// Runs every registered repair whose issue is present and records one action per entry,
/// then refreshes the recorded path cells from the grid.
pub fn apply_hard_constraint_repairs(
    context: &mut GenerationContext<'_>,
    issues: &[ValidationIssue],
    attempt: u32,
) -> Result<Vec<GenerationRepairAction>, GenerationError> {
    let present: BTreeSet<ConstraintId> = issues.iter().map(|issue| issue.id).collect();
    let mut actions = Vec::with_capacity(REPAIR_REGISTRY.len());

    for repair in REPAIR_REGISTRY {
        let changes =
            if present.contains(&repair.issue) { repair.kind.run(context)? } else { 0 };
        actions.push(GenerationRepairAction {
            id: format!("{}-{attempt}", repair.id_prefix),
            description: repair.kind.describe(changes),
            applied: changes > 0,
            attempt,
        });
    }

    context.state.primary_path_cells = context.scan_path_cells();
    Ok(actions)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::{
        ConfigOverrides, GenerationDimensions, RandomGenerationConfig,
        create_default_random_generation_config,
    };
    use crate::presets::GenerationCatalog;

    pub(crate) fn config(width: u32, height: u32) -> RandomGenerationConfig {
        create_default_random_generation_config(
            ConfigOverrides {
                seed: Some("repair".into()),
                dimensions: Some(GenerationDimensions { width, height }),
                ..ConfigOverrides::default()
            },
            &GenerationCatalog::builtin(),
        )
        .expect("config")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::config;
    use super::*;
    use crate::presets::GenerationCatalog;
    use crate::types::GridPoint;
    use crate::validation::validate_hard_constraints;

    #[test]
    fn every_constraint_has_exactly_one_repair() {
        for constraint in ConstraintId::ALL {
            let count = REPAIR_REGISTRY.iter().filter(|repair| repair.issue == constraint).count();
            assert_eq!(count, 1, "{constraint}");
        }
    }

    #[test]
    fn every_registered_repair_is_recorded_even_when_idle() {
        let catalog = GenerationCatalog::builtin();
        let config = config(12, 9);
        let mut context = GenerationContext::new(&config, &catalog).expect("context");
        let actions = apply_hard_constraint_repairs(&mut context, &[], 3).expect("repairs");

        assert_eq!(actions.len(), REPAIR_REGISTRY.len());
        assert!(actions.iter().all(|action| !action.applied && action.attempt == 3));
        assert_eq!(actions[0].id, "repair-bounded-map-3");
        assert_eq!(actions[1].description, "Replace unknown tile ids with base terrain (0 cells).");
    }

    #[test]
    fn empty_map_is_repaired_into_a_valid_route() {
        let catalog = GenerationCatalog::builtin();
        let mut config = config(25, 18);
        config.hard_constraint_policy.insert(ConstraintId::MinRequiredStructures, false);
        let mut context = GenerationContext::new(&config, &catalog).expect("context");

        let issues = validate_hard_constraints(&context).expect("validate");
        let actions = apply_hard_constraint_repairs(&mut context, &issues, 1).expect("repairs");
        let reconnect = &actions[2];
        assert!(reconnect.applied, "an empty map needs a carved route");
        assert_eq!(context.state.primary_path_cells.len(), 25);
        assert!(context.state.primary_path_cells.iter().all(|cell| cell.y == 9));
        assert!(validate_hard_constraints(&context).expect("validate").is_empty());
    }

    #[test]
    fn repairs_are_idempotent_once_issues_clear() {
        let catalog = GenerationCatalog::builtin();
        let config = config(10, 6);
        let mut context = GenerationContext::new(&config, &catalog).expect("context");
        for x in 0..10 {
            context.set_tile(GridPoint::new(x, 2), 2);
        }
        let before = context.grid.clone();
        let actions = apply_hard_constraint_repairs(&mut context, &[], 1).expect("repairs");
        assert!(actions.iter().all(|action| !action.applied));
        assert_eq!(context.grid, before);
    }
}
