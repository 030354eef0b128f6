//! The finished map handed back to callers.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::context::GenerationContext;
use crate::diagnostics::GenerationDiagnostics;
use crate::types::{GeneratedBuildingPlacement, GridPoint, TileGrid};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomGenerationResult {
    pub grid: TileGrid,
    pub width: u32,
    pub height: u32,
    pub display_name: String,
    pub archetype_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub seed: String,
    pub building_placements: Vec<GeneratedBuildingPlacement>,
    pub primary_path_cells: Vec<GridPoint>,
    pub diagnostics: GenerationDiagnostics,
}

impl RandomGenerationResult {
    pub(crate) fn from_run(context: GenerationContext<'_>, diagnostics: GenerationDiagnostics) -> Self {
        Self {
            width: context.config.dimensions.width,
            height: context.config.dimensions.height,
            display_name: format!("Generated {}", context.archetype.label),
            archetype_id: context.archetype.id.clone(),
            template_id: context.state.active_template_id,
            seed: context.config.seed.clone(),
            building_placements: context.building_placements,
            primary_path_cells: context.state.primary_path_cells,
            grid: context.grid,
            diagnostics,
        }
    }

    /// Every field except pass timings, in a fixed little-endian layout.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.width.to_le_bytes());
        bytes.extend(self.height.to_le_bytes());
        for row in &self.grid {
            bytes.extend((row.len() as u32).to_le_bytes());
            for &tile in row {
                bytes.extend(tile.to_le_bytes());
            }
        }
        push_str(&mut bytes, &self.archetype_id);
        push_str(&mut bytes, self.template_id.as_deref().unwrap_or(""));
        push_str(&mut bytes, &self.seed);

        bytes.extend((self.building_placements.len() as u32).to_le_bytes());
        for placement in &self.building_placements {
            push_str(&mut bytes, &placement.building_id);
            bytes.push(placement.rotation.quarter_turns());
            bytes.extend(placement.anchor.x.to_le_bytes());
            bytes.extend(placement.anchor.y.to_le_bytes());
        }

        bytes.extend((self.primary_path_cells.len() as u32).to_le_bytes());
        for cell in &self.primary_path_cells {
            bytes.extend(cell.x.to_le_bytes());
            bytes.extend(cell.y.to_le_bytes());
        }

        let diagnostics = &self.diagnostics;
        bytes.extend((diagnostics.warnings.len() as u32).to_le_bytes());
        for warning in &diagnostics.warnings {
            push_str(&mut bytes, warning);
        }
        bytes.extend((diagnostics.hard_constraint_issues.len() as u32).to_le_bytes());
        for issue in &diagnostics.hard_constraint_issues {
            push_str(&mut bytes, issue.id.as_str());
            push_str(&mut bytes, &issue.message);
        }
        bytes.extend((diagnostics.applied_repairs.len() as u32).to_le_bytes());
        for action in &diagnostics.applied_repairs {
            push_str(&mut bytes, &action.id);
            bytes.push(u8::from(action.applied));
        }
        for score in &diagnostics.soft_goal_scores {
            push_str(&mut bytes, score.id.as_str());
            bytes.extend(score.score.to_bits().to_le_bytes());
            bytes.extend(score.weight.to_bits().to_le_bytes());
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn push_str(bytes: &mut Vec<u8>, value: &str) {
    bytes.extend((value.len() as u32).to_le_bytes());
    bytes.extend(value.as_bytes());
}
