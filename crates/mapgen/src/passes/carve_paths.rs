//! Carves the primary route from the west edge to the east edge in one of four styles.

use std::collections::BTreeSet;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::context::GenerationContext;
use crate::diagnostics::GenerationDiagnostics;
use crate::error::GenerationError;
use crate::math::{clamp_f64, clamp_i32, lerp, round_half_up, smoothstep};
use crate::presets::EncounterZoneBias;
use crate::rng::SeededRng;
use crate::scoring::SoftGoalId;
use crate::types::GridPoint;

const DEFAULT_MEANDER_CHANCE: f64 = 0.35;
const DEFAULT_TOWN_INFLUENCE: f64 = 0.24;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteStyle {
    StraightSpine,
    GentleSCurve,
    SegmentedBends,
    BranchSpurs,
}

impl RouteStyle {
    pub const ALL: [RouteStyle; 4] = [
        RouteStyle::StraightSpine,
        RouteStyle::GentleSCurve,
        RouteStyle::SegmentedBends,
        RouteStyle::BranchSpurs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RouteStyle::StraightSpine => "straightSpine",
            RouteStyle::GentleSCurve => "gentleSCurve",
            RouteStyle::SegmentedBends => "segmentedBends",
            RouteStyle::BranchSpurs => "branchSpurs",
        }
    }
}

/// Inclusive row band the route is kept inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Band {
    min: i32,
    max: i32,
}

impl Band {
    fn clamp(self, y: i32) -> i32 {
        clamp_i32(y, self.min, self.max)
    }

    fn span(self) -> i32 {
        (self.max - self.min).max(1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PathProfile {
    style: RouteStyle,
    amplitude: i32,
    segment_count: i32,
    meander_chance: f64,
    spur_chance: f64,
    max_spurs: usize,
    spur_length: (i32, i32),
    spur_lateral_chance: f64,
}

struct RouteFrame {
    width: i32,
    band: Band,
    start_y: i32,
    center_y: i32,
    zone: EncounterZoneBias,
}

fn style_weights(
    context: &GenerationContext<'_>,
    meander: f64,
    zone: EncounterZoneBias,
) -> [(RouteStyle, f64); 4] {
    let weight = |goal| context.archetype.soft_goal_weight(goal);
    let readability_bias = clamp_f64(weight(SoftGoalId::RouteReadability) - 1.0, 0.0, 0.5);
    let variety_bias = clamp_f64(weight(SoftGoalId::BiomeVariety) - 1.0, 0.0, 0.6);
    let pacing_bias = clamp_f64(weight(SoftGoalId::EncounterPacing) - 1.0, 0.0, 0.6);
    let zone_bonus = if zone == EncounterZoneBias::Balanced { 0.2 } else { 0.45 };

    [
        (RouteStyle::StraightSpine, 1.1 + (1.0 - meander) * 1.3 + readability_bias * 1.8),
        (RouteStyle::GentleSCurve, 0.8 + meander * 1.05 + zone_bonus),
        (RouteStyle::SegmentedBends, 0.75 + meander * 1.35 + pacing_bias * 1.25),
        (RouteStyle::BranchSpurs, 0.45 + meander * 0.95 + variety_bias * 1.15),
    ]
}

fn pick_route_style(rng: &mut SeededRng, weights: [(RouteStyle, f64); 4]) -> RouteStyle {
    let weights = weights.map(|(style, weight)| (style, weight.max(0.01)));
    let total: f64 = weights.iter().map(|(_, weight)| weight).sum();
    let roll = rng.next_f64() * total;
    let mut cumulative = 0.0;
    for (style, weight) in weights {
        cumulative += weight;
        if roll <= cumulative {
            return style;
        }
    }
    RouteStyle::BranchSpurs
}

fn zone_scale(zone: EncounterZoneBias, progress: f64, low: f64, high: f64) -> f64 {
    match zone {
        EncounterZoneBias::East => lerp(low, high, progress),
        EncounterZoneBias::West => lerp(high, low, progress),
        EncounterZoneBias::Balanced => 1.0,
    }
}

fn progress(x: i32, width: i32) -> f64 {
    if width <= 1 { 0.0 } else { f64::from(x) / f64::from(width - 1) }
}

fn target_series(
    frame: &RouteFrame,
    profile: &PathProfile,
    rng: &mut SeededRng,
) -> Result<Vec<i32>, GenerationError> {
    let RouteFrame { width, band, start_y, center_y, zone } = *frame;
    let mut targets = Vec::with_capacity(width as usize);

    match profile.style {
        RouteStyle::StraightSpine => {
            let mut current = start_y;
            for x in 0..width {
                if x > 0 && rng.chance(profile.meander_chance * 0.3) {
                    let step = match (center_y - current).signum() {
                        0 => *rng.pick(&[-1, 1])?,
                        direction => direction,
                    };
                    current = band.clamp(current + step);
                }
                targets.push(current);
            }
        }
        RouteStyle::GentleSCurve => {
            let phase = match zone {
                EncounterZoneBias::East => PI * 0.2,
                EncounterZoneBias::West => -PI * 0.2,
                EncounterZoneBias::Balanced => 0.0,
            };
            let direction = if rng.chance(0.5) { 1.0 } else { -1.0 };
            for x in 0..width {
                let progress = progress(x, width);
                let bias = zone_scale(zone, progress, 0.8, 1.2);
                let wave = (progress * PI * 2.0 + phase).sin();
                let jitter = if rng.chance(profile.meander_chance * 0.25) {
                    *rng.pick(&[-1, 0, 1])?
                } else {
                    0
                };
                let offset = direction * wave * f64::from(profile.amplitude) * bias;
                targets.push(band.clamp(round_half_up(f64::from(center_y) + offset + f64::from(jitter))));
            }
        }
        RouteStyle::SegmentedBends => {
            let segment_count = profile.segment_count.max(2);
            let width_segments = (segment_count - 1).max(1);
            let max_offset = (f64::from(band.span()) * 0.45).floor() as i32;
            let mut controls = vec![GridPoint::new(0, start_y)];
            let mut previous_y = start_y;
            for index in 1..segment_count {
                let x = round_half_up(f64::from(index * (width - 1)) / f64::from(width_segments));
                let multiplier =
                    zone_scale(zone, f64::from(x) / f64::from((width - 1).max(1)), 0.8, 1.25);
                let offset = rng.int(-profile.amplitude, profile.amplitude);
                let bounded =
                    clamp_i32(round_half_up(f64::from(offset) * multiplier), -max_offset, max_offset);
                previous_y = band.clamp(previous_y + bounded);
                controls.push(GridPoint::new(x, previous_y));
            }
            if let Some(last) = controls.last_mut() {
                let settled = round_half_up(f64::from(last.y + center_y) / 2.0);
                *last = GridPoint::new(width - 1, band.clamp(settled));
            }

            for x in 0..width {
                let mut segment = 0;
                while segment + 2 < controls.len() && x > controls[segment + 1].x {
                    segment += 1;
                }
                let left = controls[segment];
                let right = controls[(segment + 1).min(controls.len() - 1)];
                let t = smoothstep(f64::from(x - left.x) / f64::from((right.x - left.x).max(1)));
                targets.push(band.clamp(round_half_up(lerp(f64::from(left.y), f64::from(right.y), t))));
            }
        }
        RouteStyle::BranchSpurs => {
            let pull_chance = profile.meander_chance
                * if zone == EncounterZoneBias::Balanced { 0.55 } else { 0.75 };
            let mut current = start_y;
            for x in 0..width {
                let progress = progress(x, width);
                let center_pull =
                    band.clamp(round_half_up(lerp(f64::from(current), f64::from(center_y), 0.18)));
                current = if rng.chance(pull_chance) {
                    let step = match zone {
                        EncounterZoneBias::East => if progress > 0.5 { 1 } else { -1 },
                        EncounterZoneBias::West => if progress < 0.5 { 1 } else { -1 },
                        EncounterZoneBias::Balanced => *rng.pick(&[-1, 1])?,
                    };
                    band.clamp(center_pull + step)
                } else {
                    center_pull
                };
                targets.push(current);
            }
        }
    }

    Ok(targets)
}

pub(crate) fn run(
    context: &mut GenerationContext<'_>,
    _diagnostics: &mut GenerationDiagnostics,
) -> Result<(), GenerationError> {
    let width = context.width();
    let height = context.height();
    let hints = context.template_hints().copied();
    let path_hint = hints.and_then(|hints| hints.primary_path);
    let town_hint = hints.and_then(|hints| hints.town);
    let zone = hints.map(|hints| hints.zone()).unwrap_or_default();
    let style_seed = format!(
        "{}:{}",
        context.config.archetype_id,
        context.state.active_template_id.as_deref().unwrap_or("none")
    );

    let band = match path_hint {
        Some(hint) => {
            let min = clamp_i32((f64::from(height) * hint.min_y_ratio).floor() as i32, 1, height - 2);
            let max = clamp_i32((f64::from(height) * hint.max_y_ratio).ceil() as i32, min, height - 2);
            Band { min, max }
        }
        None => Band {
            min: ((f64::from(height) * 0.2).floor() as i32).max(1),
            max: ((f64::from(height) * 0.8).ceil() as i32).min(height - 2),
        },
    };
    let seeded_start_y = match path_hint {
        Some(hint) => round_half_up(f64::from(height) * hint.start_y_ratio),
        None => height / 2,
    };
    let town_center_y = band.clamp(match town_hint {
        Some(hint) => round_half_up(f64::from(height) * hint.anchor_y_ratio),
        None => round_half_up(f64::from(height) / 2.0),
    });
    let meander = path_hint.map_or(DEFAULT_MEANDER_CHANCE, |hint| hint.meander_chance);

    let mut profile_rng = context.rng.fork(&format!("carvePrimaryPaths:{style_seed}:profile"));
    let style = pick_route_style(&mut profile_rng, style_weights(context, meander, zone));
    let profile = build_profile(context, style, meander, band, width, height);
    log::debug!("carving {} route for {style_seed}", style.as_str());

    let mut rng = context.rng.fork(&format!("carvePrimaryPaths:{style_seed}:{}:carve", style.as_str()));
    let start_y = band.clamp(seeded_start_y + rng.int(-2, 2));
    let center_y = band.clamp(round_half_up(f64::from(start_y * 2 + town_center_y) / 3.0));
    let frame = RouteFrame { width, band, start_y, center_y, zone };
    let targets = target_series(&frame, &profile, &mut rng)?;

    let mut path_cells = Vec::new();

    let west_influence = town_hint.map_or(DEFAULT_TOWN_INFLUENCE, |hint| {
        clamp_f64(hint.anchor_x_ratio + hint.width_ratio * 0.6, 0.15, 0.7)
    });
    let mut spine = Vec::with_capacity(width as usize);
    let mut current_y = targets.first().copied().unwrap_or(start_y);
    for x in 0..width {
        let pull = 1.0 - clamp_f64(progress(x, width) / west_influence, 0.0, 1.0);
        let series_y = targets.get(x as usize).copied().unwrap_or(current_y);
        let target_y = band.clamp(round_half_up(lerp(
            f64::from(series_y),
            f64::from(town_center_y),
            pull * 0.35,
        )));
        let step = if target_y > current_y { 1 } else { -1 };
        while current_y != target_y {
            stamp(context, &mut path_cells, GridPoint::new(x, current_y));
            current_y += step;
        }
        stamp(context, &mut path_cells, GridPoint::new(x, current_y));
        spine.push(GridPoint::new(x, current_y));
    }

    if style == RouteStyle::BranchSpurs {
        let mut anchors: Vec<GridPoint> =
            spine.into_iter().filter(|cell| cell.x > 2 && cell.x < width - 3).collect();
        rng.shuffle(&mut anchors);
        let mut carved = 0;
        for anchor in anchors {
            if carved >= profile.max_spurs {
                break;
            }
            if !rng.chance(profile.spur_chance) {
                continue;
            }

            let preferred = if anchor.y < center_y { 1 } else { -1 };
            let mut direction = if rng.chance(0.2) { -preferred } else { preferred };
            let (min_length, max_length) = profile.spur_length;
            let length = rng.int(min_length, min_length.max(max_length));
            let (mut x, mut y) = (anchor.x, anchor.y);
            for _ in 0..length {
                y = band.clamp(y + direction);
                if y == band.min || y == band.max {
                    direction = -direction;
                }
                stamp(context, &mut path_cells, GridPoint::new(x, y));

                if rng.chance(profile.spur_lateral_chance) {
                    let lateral = match zone {
                        EncounterZoneBias::East => *rng.pick(&[0, 1, 1])?,
                        EncounterZoneBias::West => *rng.pick(&[0, -1, -1])?,
                        EncounterZoneBias::Balanced => *rng.pick(&[-1, 0, 1])?,
                    };
                    x = clamp_i32(x + lateral, 1, width - 2);
                    stamp(context, &mut path_cells, GridPoint::new(x, y));
                }
            }
            carved += 1;
        }
    }

    let mut seen = BTreeSet::new();
    path_cells.retain(|&cell| seen.insert(cell));
    context.state.primary_path_cells = path_cells;
    Ok(())
}

fn stamp(context: &mut GenerationContext<'_>, cells: &mut Vec<GridPoint>, point: GridPoint) {
    let path_tile = context.path_tile();
    context.set_tile(point, path_tile);
    cells.push(point);
}

fn build_profile(
    context: &GenerationContext<'_>,
    style: RouteStyle,
    meander: f64,
    band: Band,
    width: i32,
    height: i32,
) -> PathProfile {
    let weight = |goal| context.archetype.soft_goal_weight(goal);
    let readability_scale =
        clamp_f64(1.3 - (weight(SoftGoalId::RouteReadability) - 1.0) * 0.75, 0.7, 1.3);
    let amplitude_base = ((f64::from(band.span()) * (0.12 + meander * 0.3) * readability_scale)
        .floor() as i32)
        .max(1);
    let segment_base = clamp_i32(
        round_half_up(2.0 + meander * 5.0 + weight(SoftGoalId::EncounterPacing)),
        2,
        6,
    );
    let spur_base = clamp_f64(
        meander * 0.35 + (weight(SoftGoalId::BiomeVariety) - 1.0) * 0.2,
        0.08,
        0.45,
    );
    let spur_cap = ((f64::from(height) * 0.35).floor() as i32).max(4);

    PathProfile {
        style,
        amplitude: if style == RouteStyle::StraightSpine {
            ((f64::from(amplitude_base) * 0.55).floor() as i32).max(1)
        } else {
            amplitude_base
        },
        segment_count: if style == RouteStyle::SegmentedBends {
            segment_base
        } else {
            (segment_base - 1).max(2)
        },
        meander_chance: meander,
        spur_chance: if style == RouteStyle::BranchSpurs {
            clamp_f64(spur_base + 0.12, 0.12, 0.6)
        } else {
            spur_base
        },
        max_spurs: clamp_i32(width / 8, 1, 5) as usize,
        spur_length: (2, clamp_i32(round_half_up(3.0 + meander * 6.0), 3, spur_cap)),
        spur_lateral_chance: if style == RouteStyle::BranchSpurs { 0.35 } else { 0.2 },
    }
}
