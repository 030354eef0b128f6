//! Static archetype and template tables, bundled with the tile registry into a catalog.

mod archetypes;
mod templates;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::GenerationDimensions;
use crate::error::GenerationError;
use crate::pipeline::PassId;
use crate::registry::{TileRegistry, tile_ids};
use crate::scoring::SoftGoalId;
use crate::types::TileId;
use crate::validation::ConstraintId;

pub use archetypes::{DEFAULT_ARCHETYPE_ID, builtin_archetypes};
pub use templates::builtin_templates;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingTargetRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingTarget {
    pub building_id: String,
    #[serde(flatten)]
    pub range: BuildingTargetRange,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRoleSet {
    pub base_terrain_tile_id: TileId,
    pub primary_path_tile_id: TileId,
    #[serde(default)]
    pub optional_water_tile_ids: Vec<TileId>,
    #[serde(default)]
    pub optional_encounter_tile_ids: Vec<TileId>,
}

impl TileRoleSet {
    /// Encounter tiles to paint; the first entry is the default patch tile.
    pub fn encounter_tiles(&self) -> &[TileId] {
        if self.optional_encounter_tile_ids.is_empty() {
            &tile_ids::DEFAULT_ENCOUNTERS
        } else {
            &self.optional_encounter_tile_ids
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomMapArchetype {
    pub id: String,
    pub label: String,
    pub description: String,
    pub recommended_dimensions: GenerationDimensions,
    pub pass_order: Vec<PassId>,
    pub required_hard_constraints: Vec<ConstraintId>,
    pub soft_goal_weights: BTreeMap<SoftGoalId, f64>,
    /// Authored order drives placement and forced-repair order.
    pub building_targets: Vec<BuildingTarget>,
    pub tile_roles: TileRoleSet,
}

impl RandomMapArchetype {
    pub fn soft_goal_weight(&self, goal: SoftGoalId) -> f64 {
        self.soft_goal_weights.get(&goal).copied().unwrap_or(1.0)
    }

    pub fn building_target(&self, building_id: &str) -> Option<BuildingTargetRange> {
        self.building_targets
            .iter()
            .find(|target| target.building_id == building_id)
            .map(|target| target.range)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncounterZoneBias {
    #[default]
    Balanced,
    West,
    East,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryPathHint {
    pub start_y_ratio: f64,
    pub min_y_ratio: f64,
    pub max_y_ratio: f64,
    pub meander_chance: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownHint {
    pub anchor_x_ratio: f64,
    pub anchor_y_ratio: f64,
    pub width_ratio: f64,
    pub height_ratio: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationTemplateHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_path: Option<PrimaryPathHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town: Option<TownHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounter_zone: Option<EncounterZoneBias>,
}

impl GenerationTemplateHints {
    /// Clamps every ratio into the range the passes can honor and fills the encounter bias.
    pub fn normalized(&self) -> Self {
        let primary_path = self.primary_path.map(|hint| PrimaryPathHint {
            start_y_ratio: hint.start_y_ratio.clamp(0.1, 0.9),
            min_y_ratio: hint.min_y_ratio.min(hint.max_y_ratio).clamp(0.08, 0.92),
            max_y_ratio: hint.min_y_ratio.max(hint.max_y_ratio).clamp(0.08, 0.92),
            meander_chance: hint.meander_chance.clamp(0.05, 0.85),
        });
        let town = self.town.map(|hint| TownHint {
            anchor_x_ratio: hint.anchor_x_ratio.clamp(0.05, 0.9),
            anchor_y_ratio: hint.anchor_y_ratio.clamp(0.1, 0.9),
            width_ratio: hint.width_ratio.clamp(0.2, 0.5),
            height_ratio: hint.height_ratio.clamp(0.25, 0.65),
        });
        Self {
            primary_path,
            town,
            encounter_zone: Some(self.encounter_zone.unwrap_or_default()),
        }
    }

    pub fn zone(&self) -> EncounterZoneBias {
        self.encounter_zone.unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationTemplate {
    pub id: String,
    pub label: String,
    pub description: String,
    pub hints: GenerationTemplateHints,
}

/// Everything a run looks up by id: tiles, buildings, archetypes and templates.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationCatalog {
    pub registry: TileRegistry,
    pub archetypes: Vec<RandomMapArchetype>,
    pub templates: Vec<GenerationTemplate>,
}

impl GenerationCatalog {
    pub fn builtin() -> Self {
        Self::with_registry(TileRegistry::builtin())
    }

    pub fn with_registry(registry: TileRegistry) -> Self {
        Self { registry, archetypes: builtin_archetypes(), templates: builtin_templates() }
    }

    pub fn archetype(&self, id: &str) -> Result<&RandomMapArchetype, GenerationError> {
        self.archetypes
            .iter()
            .find(|archetype| archetype.id == id)
            .ok_or_else(|| GenerationError::UnknownArchetype(id.to_string()))
    }

    pub fn template(&self, id: &str) -> Result<&GenerationTemplate, GenerationError> {
        self.templates
            .iter()
            .find(|template| template.id == id)
            .ok_or_else(|| GenerationError::UnknownTemplate(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_resolves_default_archetype() {
        let catalog = GenerationCatalog::builtin();
        let archetype = catalog.archetype(DEFAULT_ARCHETYPE_ID).expect("default archetype exists");
        assert_eq!(archetype.recommended_dimensions, GenerationDimensions { width: 25, height: 18 });
        assert_eq!(archetype.required_hard_constraints, ConstraintId::ALL.to_vec());
        assert_eq!(
            catalog.archetype("lunar_base"),
            Err(GenerationError::UnknownArchetype("lunar_base".into()))
        );
    }

    #[test]
    fn default_archetype_carries_its_building_quotas() {
        let catalog = GenerationCatalog::builtin();
        let archetype = catalog.archetype(DEFAULT_ARCHETYPE_ID).expect("default archetype exists");
        let quotas: Vec<(&str, u32, u32)> = archetype
            .building_targets
            .iter()
            .map(|target| (target.building_id.as_str(), target.range.min, target.range.max))
            .collect();
        assert_eq!(quotas, vec![("pokecenter", 1, 1), ("pokemart", 1, 1), ("house-small", 1, 3)]);
        assert_eq!(archetype.building_target("house-small"), Some(BuildingTargetRange { min: 1, max: 3 }));
    }

    #[test]
    fn every_archetype_building_target_exists_in_registry() {
        let catalog = GenerationCatalog::builtin();
        for archetype in &catalog.archetypes {
            assert!(!archetype.pass_order.is_empty(), "{} has no passes", archetype.id);
            for target in &archetype.building_targets {
                assert!(
                    catalog.registry.building(&target.building_id).is_ok(),
                    "{} references unknown building {}",
                    archetype.id,
                    target.building_id
                );
                assert!(target.range.min <= target.range.max);
            }
            for tile in archetype.tile_roles.encounter_tiles() {
                assert!(catalog.registry.is_known(*tile));
            }
        }
    }

    #[test]
    fn template_hints_normalize_into_safe_ranges() {
        let hints = GenerationTemplateHints {
            primary_path: Some(PrimaryPathHint {
                start_y_ratio: 0.0,
                min_y_ratio: 0.95,
                max_y_ratio: 0.01,
                meander_chance: 1.0,
            }),
            town: Some(TownHint {
                anchor_x_ratio: 0.99,
                anchor_y_ratio: 0.0,
                width_ratio: 0.9,
                height_ratio: 0.1,
            }),
            encounter_zone: None,
        };
        let normalized = hints.normalized();
        let path = normalized.primary_path.expect("path hint kept");
        assert_eq!(path.start_y_ratio, 0.1);
        assert_eq!(path.min_y_ratio, 0.08);
        assert_eq!(path.max_y_ratio, 0.92);
        assert_eq!(path.meander_chance, 0.85);
        let town = normalized.town.expect("town hint kept");
        assert_eq!(town.anchor_x_ratio, 0.9);
        assert_eq!(town.anchor_y_ratio, 0.1);
        assert_eq!(town.width_ratio, 0.5);
        assert_eq!(town.height_ratio, 0.25);
        assert_eq!(normalized.encounter_zone, Some(EncounterZoneBias::Balanced));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let catalog = GenerationCatalog::builtin();
        assert!(catalog.template("compact_town_spine").is_ok());
        assert_eq!(
            catalog.template("nowhere"),
            Err(GenerationError::UnknownTemplate("nowhere".into()))
        );
    }
}
