//! Hard-constraint validators keyed by a closed set of constraint ids.

mod buildings;
mod path;
mod structure;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::GenerationContext;
use crate::diagnostics::ValidationIssue;
use crate::error::GenerationError;

pub use buildings::{door_cells, footprint_cells};
pub use path::{find_spawn_cell, path_components};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintId {
    BoundedMap,
    KnownTileIdsOnly,
    ReachableCriticalPath,
    BuildingFootprintsInBounds,
    BuildingDoorConnectivity,
    MinRequiredStructures,
    SpawnSafety,
}

impl ConstraintId {
    pub const ALL: [ConstraintId; 7] = [
        ConstraintId::BoundedMap,
        ConstraintId::KnownTileIdsOnly,
        ConstraintId::ReachableCriticalPath,
        ConstraintId::BuildingFootprintsInBounds,
        ConstraintId::BuildingDoorConnectivity,
        ConstraintId::MinRequiredStructures,
        ConstraintId::SpawnSafety,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintId::BoundedMap => "boundedMap",
            ConstraintId::KnownTileIdsOnly => "knownTileIdsOnly",
            ConstraintId::ReachableCriticalPath => "reachableCriticalPath",
            ConstraintId::BuildingFootprintsInBounds => "buildingFootprintsInBounds",
            ConstraintId::BuildingDoorConnectivity => "buildingDoorConnectivity",
            ConstraintId::MinRequiredStructures => "minRequiredStructures",
            ConstraintId::SpawnSafety => "spawnSafety",
        }
    }

    fn validate(
        self,
        context: &GenerationContext<'_>,
    ) -> Result<Vec<ValidationIssue>, GenerationError> {
        match self {
            ConstraintId::BoundedMap => Ok(structure::bounded_map(context)),
            ConstraintId::KnownTileIdsOnly => Ok(structure::known_tile_ids_only(context)),
            ConstraintId::ReachableCriticalPath => Ok(path::reachable_critical_path(context)),
            ConstraintId::BuildingFootprintsInBounds => {
                buildings::building_footprints_in_bounds(context)
            }
            ConstraintId::BuildingDoorConnectivity => buildings::building_door_connectivity(context),
            ConstraintId::MinRequiredStructures => Ok(buildings::min_required_structures(context)),
            ConstraintId::SpawnSafety => Ok(path::spawn_safety(context)),
        }
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstraintId {
    type Err = GenerationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ConstraintId::ALL
            .into_iter()
            .find(|constraint| constraint.as_str() == value)
            .ok_or_else(|| GenerationError::UnknownConstraint(value.to_string()))
    }
}

/// Constraints the archetype requires that the config has not switched off, in archetype order.
pub fn active_constraints(context: &GenerationContext<'_>) -> Vec<ConstraintId> {
    context
        .archetype
        .required_hard_constraints
        .iter()
        .copied()
        .filter(|&constraint| context.config.constraint_enabled(constraint))
        .collect()
}

pub fn validate_hard_constraints(
    context: &GenerationContext<'_>,
) -> Result<Vec<ValidationIssue>, GenerationError> {
    let mut issues = Vec::new();
    for constraint in active_constraints(context) {
        issues.extend(constraint.validate(context)?);
    }
    Ok(issues)
}


#[cfg(test)]
mod tests {
    use super::test_support::config;
    use super::*;
    use crate::diagnostics::Severity;
    use crate::presets::GenerationCatalog;
    use crate::types::GridPoint;

    #[test]
    fn constraint_ids_round_trip_through_strings() {
        for constraint in ConstraintId::ALL {
            assert_eq!(constraint.as_str().parse::<ConstraintId>(), Ok(constraint));
        }
        assert_eq!(
            "noLava".parse::<ConstraintId>(),
            Err(GenerationError::UnknownConstraint("noLava".into()))
        );
    }

    #[test]
    fn fresh_grid_only_fails_path_and_structure_checks() {
        let catalog = GenerationCatalog::builtin();
        let config = config(10, 8);
        let context = GenerationContext::new(&config, &catalog).expect("context");
        let issues = validate_hard_constraints(&context).expect("validators run");
        let ids: Vec<ConstraintId> = issues.iter().map(|issue| issue.id).collect();

        assert_eq!(
            ids,
            vec![
                ConstraintId::ReachableCriticalPath,
                ConstraintId::MinRequiredStructures,
                ConstraintId::SpawnSafety
            ]
        );
        assert!(issues.iter().all(|issue| issue.severity == Severity::Error));
    }

    #[test]
    fn disabled_constraints_are_not_evaluated() {
        let catalog = GenerationCatalog::builtin();
        let mut config = config(10, 8);
        config.hard_constraint_policy.insert(ConstraintId::MinRequiredStructures, false);
        config.hard_constraint_policy.insert(ConstraintId::SpawnSafety, false);
        let context = GenerationContext::new(&config, &catalog).expect("context");

        assert!(!active_constraints(&context).contains(&ConstraintId::SpawnSafety));
        let issues = validate_hard_constraints(&context).expect("validators run");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Primary path tiles are missing.");
    }

    #[test]
    fn straight_row_satisfies_path_constraints() {
        let catalog = GenerationCatalog::builtin();
        let config = config(10, 8);
        let mut context = GenerationContext::new(&config, &catalog).expect("context");
        for x in 0..10 {
            context.set_tile(GridPoint::new(x, 4), 2);
        }
        context.state.primary_path_cells = context.scan_path_cells();

        let issues = validate_hard_constraints(&context).expect("validators run");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, ConstraintId::MinRequiredStructures);
        assert_eq!(
            issues[0].message,
            "Missing required structures: pokecenter (0/1), pokemart (0/1), house-small (0/1)."
        );
    }
}
