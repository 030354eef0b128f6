//! Soft-goal scoring: non-blocking quality signals weighted per archetype.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::balance::encounter_bounds;
use crate::context::GenerationContext;
use crate::diagnostics::SoftGoalScore;
use crate::error::GenerationError;
use crate::math::clamp_f64;
use crate::types::{GridPoint, TileId};
use crate::validation::footprint_cells;

/// Distinct non-path tile kinds that count as a fully varied map.
const VARIETY_TARGET: f64 = 8.0;
/// Footprint cells this close to the route keep a building in view.
const LANDMARK_RADIUS: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoftGoalId {
    RouteReadability,
    BiomeVariety,
    TownCoherence,
    EncounterPacing,
    LandmarkVisibility,
}

impl SoftGoalId {
    pub const ALL: [SoftGoalId; 5] = [
        SoftGoalId::RouteReadability,
        SoftGoalId::BiomeVariety,
        SoftGoalId::TownCoherence,
        SoftGoalId::EncounterPacing,
        SoftGoalId::LandmarkVisibility,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SoftGoalId::RouteReadability => "routeReadability",
            SoftGoalId::BiomeVariety => "biomeVariety",
            SoftGoalId::TownCoherence => "townCoherence",
            SoftGoalId::EncounterPacing => "encounterPacing",
            SoftGoalId::LandmarkVisibility => "landmarkVisibility",
        }
    }

    fn score(self, context: &GenerationContext<'_>) -> Result<f64, GenerationError> {
        Ok(match self {
            SoftGoalId::RouteReadability => route_readability(context),
            SoftGoalId::BiomeVariety => biome_variety(context),
            SoftGoalId::TownCoherence => town_coherence(context),
            SoftGoalId::EncounterPacing => encounter_pacing(context),
            SoftGoalId::LandmarkVisibility => landmark_visibility(context)?,
        })
    }
}

impl fmt::Display for SoftGoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Config overrides win over archetype weights; goals without either weigh 1.
pub fn soft_goal_weight(context: &GenerationContext<'_>, goal: SoftGoalId) -> f64 {
    context
        .config
        .soft_goal_weights_override
        .as_ref()
        .and_then(|weights| weights.get(&goal).copied())
        .unwrap_or_else(|| context.archetype.soft_goal_weight(goal))
}

pub fn score_soft_goals(context: &GenerationContext<'_>) -> Result<Vec<SoftGoalScore>, GenerationError> {
    SoftGoalId::ALL
        .into_iter()
        .map(|id| {
            let score = clamp_f64(id.score(context)?, 0.0, 1.0);
            let weight = soft_goal_weight(context, id);
            Ok(SoftGoalScore { id, score, weight, weighted_score: score * weight })
        })
        .collect()
}

/// Weighted mean of the scores; zero when every weight is zero.
pub fn overall_score(scores: &[SoftGoalScore]) -> f64 {
    let total_weight: f64 = scores.iter().map(|score| score.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    scores.iter().map(|score| score.weighted_score).sum::<f64>() / total_weight
}

/// A route no longer than the map is wide scores 1; every detour lowers it.
fn route_readability(context: &GenerationContext<'_>) -> f64 {
    let path_len = context.scan_path_cells().len();
    if path_len == 0 {
        return 0.0;
    }
    (f64::from(context.width()) / path_len as f64).min(1.0)
}

fn biome_variety(context: &GenerationContext<'_>) -> f64 {
    let path_tile = context.path_tile();
    let kinds: BTreeSet<TileId> =
        context.grid.iter().flatten().copied().filter(|&tile| tile != path_tile).collect();
    kinds.len() as f64 / VARIETY_TARGET
}

fn town_coherence(context: &GenerationContext<'_>) -> f64 {
    let Some(town) = context.town_district() else {
        return 0.0;
    };
    let placements = &context.building_placements;
    if placements.is_empty() {
        return 0.0;
    }
    let inside = placements.iter().filter(|placement| town.contains(placement.anchor)).count();
    inside as f64 / placements.len() as f64
}

fn encounter_pacing(context: &GenerationContext<'_>) -> f64 {
    let encounter_tiles = context.archetype.tile_roles.encounter_tiles();
    let count = context.grid.iter().flatten().filter(|tile| encounter_tiles.contains(tile)).count();
    let bounds = encounter_bounds(context.area() as usize);
    if bounds.contains(count) {
        1.0
    } else if count < bounds.min {
        count as f64 / bounds.min as f64
    } else {
        bounds.max as f64 / count as f64
    }
}

fn landmark_visibility(context: &GenerationContext<'_>) -> Result<f64, GenerationError> {
    let placements = &context.building_placements;
    if placements.is_empty() {
        return Ok(0.0);
    }
    let path_cells = context.scan_path_cells();
    let near_path = |point: GridPoint| path_cells.iter().any(|cell| cell.manhattan(point) <= LANDMARK_RADIUS);

    let mut visible = 0;
    for placement in placements {
        if footprint_cells(context, placement)?.iter().any(|cell| near_path(cell.point)) {
            visible += 1;
        }
    }
    Ok(f64::from(visible) / placements.len() as f64)
}
