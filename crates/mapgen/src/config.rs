//! Generation run configuration, defaults derived from archetype presets, and overrides.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::pipeline::PassId;
use crate::presets::{DEFAULT_ARCHETYPE_ID, GenerationCatalog};
use crate::scoring::SoftGoalId;
use crate::types::TileId;
use crate::validation::ConstraintId;

pub const MIN_DIMENSION: u32 = 5;
pub const MAX_DIMENSION: u32 = 100;
pub const DEFAULT_MAX_REPAIR_ATTEMPTS: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationDimensions {
    pub width: u32,
    pub height: u32,
}

impl GenerationDimensions {
    pub fn validate(self) -> Result<Self, GenerationError> {
        let range = MIN_DIMENSION..=MAX_DIMENSION;
        if range.contains(&self.width) && range.contains(&self.height) {
            Ok(self)
        } else {
            Err(GenerationError::InvalidDimensions {
                width: self.width,
                height: self.height,
                min: MIN_DIMENSION,
                max: MAX_DIMENSION,
            })
        }
    }

    pub fn area(self) -> u32 {
        self.width * self.height
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationPipelineOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_order_override: Option<Vec<PassId>>,
    pub max_repair_attempts: u32,
}

impl Default for GenerationPipelineOptions {
    fn default() -> Self {
        Self { pass_order_override: None, max_repair_attempts: DEFAULT_MAX_REPAIR_ATTEMPTS }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomGenerationConfig {
    pub seed: String,
    pub dimensions: GenerationDimensions,
    pub archetype_id: String,
    #[serde(default)]
    pub template_id: Option<String>,
    pub base_fill_tile_id: TileId,
    #[serde(default = "default_hard_constraint_policy")]
    pub hard_constraint_policy: BTreeMap<ConstraintId, bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_goal_weights_override: Option<BTreeMap<SoftGoalId, f64>>,
    #[serde(default)]
    pub pipeline: GenerationPipelineOptions,
}

impl RandomGenerationConfig {
    /// Constraints missing from the policy map count as enabled.
    pub fn constraint_enabled(&self, constraint: ConstraintId) -> bool {
        self.hard_constraint_policy.get(&constraint).copied().unwrap_or(true)
    }

    pub fn disabled_constraints(&self) -> Vec<ConstraintId> {
        self.hard_constraint_policy
            .iter()
            .filter(|&(_, &enabled)| !enabled)
            .map(|(&constraint, _)| constraint)
            .collect()
    }
}

pub fn default_hard_constraint_policy() -> BTreeMap<ConstraintId, bool> {
    ConstraintId::ALL.into_iter().map(|constraint| (constraint, true)).collect()
}

/// Partial config; unset fields fall back to the chosen archetype's presets.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverrides {
    pub seed: Option<String>,
    pub dimensions: Option<GenerationDimensions>,
    pub archetype_id: Option<String>,
    pub template_id: Option<String>,
    pub base_fill_tile_id: Option<TileId>,
    pub hard_constraint_policy: Option<BTreeMap<ConstraintId, bool>>,
    pub soft_goal_weights_override: Option<BTreeMap<SoftGoalId, f64>>,
    pub pass_order_override: Option<Vec<PassId>>,
    pub max_repair_attempts: Option<u32>,
}

impl ConfigOverrides {
    /// Fields set in `other` win.
    pub fn merged_with(self, other: ConfigOverrides) -> ConfigOverrides {
        ConfigOverrides {
            seed: other.seed.or(self.seed),
            dimensions: other.dimensions.or(self.dimensions),
            archetype_id: other.archetype_id.or(self.archetype_id),
            template_id: other.template_id.or(self.template_id),
            base_fill_tile_id: other.base_fill_tile_id.or(self.base_fill_tile_id),
            hard_constraint_policy: other.hard_constraint_policy.or(self.hard_constraint_policy),
            soft_goal_weights_override: other
                .soft_goal_weights_override
                .or(self.soft_goal_weights_override),
            pass_order_override: other.pass_order_override.or(self.pass_order_override),
            max_repair_attempts: other.max_repair_attempts.or(self.max_repair_attempts),
        }
    }
}

/// Fills unset fields from the archetype's recommended dimensions and tile roles.
///
/// Without an explicit seed the current epoch milliseconds are used, so callers that need
/// reproducible output must pass one.
pub fn create_default_random_generation_config(
    overrides: ConfigOverrides,
    catalog: &GenerationCatalog,
) -> Result<RandomGenerationConfig, GenerationError> {
    let archetype_id = overrides.archetype_id.unwrap_or_else(|| DEFAULT_ARCHETYPE_ID.to_string());
    let archetype = catalog.archetype(&archetype_id)?;
    let base_fill_tile_id =
        overrides.base_fill_tile_id.unwrap_or(archetype.tile_roles.base_terrain_tile_id);
    if !catalog.registry.is_known(base_fill_tile_id) {
        return Err(GenerationError::UnknownBaseTile(base_fill_tile_id));
    }

    Ok(RandomGenerationConfig {
        seed: overrides.seed.unwrap_or_else(runtime_seed),
        dimensions: overrides.dimensions.unwrap_or(archetype.recommended_dimensions),
        base_fill_tile_id,
        archetype_id,
        template_id: overrides.template_id,
        hard_constraint_policy: overrides
            .hard_constraint_policy
            .unwrap_or_else(default_hard_constraint_policy),
        soft_goal_weights_override: overrides.soft_goal_weights_override,
        pipeline: GenerationPipelineOptions {
            pass_order_override: overrides.pass_order_override,
            max_repair_attempts: overrides
                .max_repair_attempts
                .unwrap_or(DEFAULT_MAX_REPAIR_ATTEMPTS),
        },
    })
}

fn runtime_seed() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    millis.to_string()
}
