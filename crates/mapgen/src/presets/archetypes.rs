use std::collections::BTreeMap;

use crate::config::GenerationDimensions;
use crate::pipeline::PassId;
use crate::registry::tile_ids;
use crate::scoring::SoftGoalId;
use crate::types::TileId;
use crate::validation::ConstraintId;

use super::{BuildingTarget, BuildingTargetRange, RandomMapArchetype, TileRoleSet};

pub const DEFAULT_ARCHETYPE_ID: &str = "town_route_basic";

struct ArchetypeRow {
    id: &'static str,
    label: &'static str,
    description: &'static str,
    dimensions: (u32, u32),
    water: &'static [TileId],
    encounters: &'static [TileId],
    /// routeReadability, biomeVariety, townCoherence, encounterPacing, landmarkVisibility
    weights: [f64; 5],
    targets: &'static [(&'static str, u32, u32)],
}

const ARCHETYPES: &[ArchetypeRow] = &[
    ArchetypeRow {
        id: DEFAULT_ARCHETYPE_ID,
        label: "Town + Route (Basic)",
        description: "Starter town on the west side with a single readable route heading east.",
        dimensions: (25, 18),
        water: &[],
        encounters: &[tile_ids::TALL_GRASS, tile_ids::RARE_GRASS],
        weights: [1.2, 1.0, 1.1, 1.0, 0.9],
        targets: &[("pokecenter", 1, 1), ("pokemart", 1, 1), ("house-small", 1, 3)],
    },
    ArchetypeRow {
        id: "coastal_town_route",
        label: "Coastal Town Route",
        description: "Harbor town with a shoreline route, ponds and surf-side encounters.",
        dimensions: (30, 20),
        water: &[tile_ids::WATER],
        encounters: &[tile_ids::TALL_GRASS, tile_ids::RARE_GRASS],
        weights: [1.0, 1.3, 1.0, 1.1, 1.0],
        targets: &[("pokecenter", 1, 1), ("pokemart", 0, 1), ("house-small", 1, 2), ("pond", 0, 1)],
    },
    ArchetypeRow {
        id: "forest_town_route",
        label: "Forest Town Route",
        description: "Woodland hamlet with a winding route through dense tree cover.",
        dimensions: (26, 18),
        water: &[],
        encounters: &[tile_ids::TALL_GRASS, tile_ids::RARE_GRASS],
        weights: [0.9, 1.4, 1.0, 1.2, 0.8],
        targets: &[("pokecenter", 1, 1), ("house-small", 1, 2), ("house-large", 0, 1)],
    },
    ArchetypeRow {
        id: "meadow_outskirts_route",
        label: "Meadow Outskirts Route",
        description: "Open farmland outskirts with fenced plots and a gentle route.",
        dimensions: (30, 20),
        water: &[],
        encounters: &[tile_ids::TALL_GRASS, tile_ids::RARE_GRASS],
        weights: [1.3, 1.1, 1.2, 0.9, 1.0],
        targets: &[
            ("pokecenter", 1, 1),
            ("pokemart", 1, 1),
            ("house-small", 1, 2),
            ("fence-h", 0, 2),
        ],
    },
    ArchetypeRow {
        id: "canyon_corridor_route",
        label: "Canyon Corridor Route",
        description: "Narrow canyon outpost guarding a long corridor with cave landmarks.",
        dimensions: (32, 16),
        water: &[],
        encounters: &[tile_ids::TALL_GRASS, 15],
        weights: [1.1, 0.9, 0.9, 1.4, 1.2],
        targets: &[("pokecenter", 1, 1), ("gate", 0, 1), ("cave-entrance", 0, 1)],
    },
];

pub(crate) fn default_pass_order() -> Vec<PassId> {
    PassId::ALL.to_vec()
}

pub fn builtin_archetypes() -> Vec<RandomMapArchetype> {
    ARCHETYPES
        .iter()
        .map(|row| RandomMapArchetype {
            id: row.id.to_string(),
            label: row.label.to_string(),
            description: row.description.to_string(),
            recommended_dimensions: GenerationDimensions {
                width: row.dimensions.0,
                height: row.dimensions.1,
            },
            pass_order: default_pass_order(),
            required_hard_constraints: ConstraintId::ALL.to_vec(),
            soft_goal_weights: SoftGoalId::ALL.into_iter().zip(row.weights).collect::<BTreeMap<_, _>>(),
            building_targets: row
                .targets
                .iter()
                .map(|&(building_id, min, max)| BuildingTarget {
                    building_id: building_id.to_string(),
                    range: BuildingTargetRange { min, max },
                })
                .collect(),
            tile_roles: TileRoleSet {
                base_terrain_tile_id: tile_ids::GRASS,
                primary_path_tile_id: tile_ids::PATH,
                optional_water_tile_ids: row.water.to_vec(),
                optional_encounter_tile_ids: row.encounters.to_vec(),
            },
        })
        .collect()
}
