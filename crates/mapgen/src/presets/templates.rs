use super::{
    EncounterZoneBias, GenerationTemplate, GenerationTemplateHints, PrimaryPathHint, TownHint,
};

struct TemplateRow {
    id: &'static str,
    label: &'static str,
    description: &'static str,
    /// start, min, max row ratios then meander chance
    path: [f64; 4],
    /// anchor x, anchor y, width, height ratios
    town: [f64; 4],
    zone: EncounterZoneBias,
}

const TEMPLATES: &[TemplateRow] = &[
    TemplateRow {
        id: "compact_town_spine",
        label: "Compact Town Spine",
        description: "Centered route spine with a compact west-side town core and balanced encounters.",
        path: [0.5, 0.35, 0.65, 0.28],
        town: [0.18, 0.5, 0.28, 0.46],
        zone: EncounterZoneBias::Balanced,
    },
    TemplateRow {
        id: "northern_crossing",
        label: "Northern Crossing",
        description: "Upper-route traversal with a north-leaning town placement and east-heavy encounters.",
        path: [0.32, 0.16, 0.5, 0.4],
        town: [0.22, 0.34, 0.32, 0.44],
        zone: EncounterZoneBias::East,
    },
    TemplateRow {
        id: "southern_wilds",
        label: "Southern Wilds",
        description: "Lower-route arc with broader town footprint and west-weighted encounter fields.",
        path: [0.68, 0.45, 0.84, 0.34],
        town: [0.16, 0.66, 0.34, 0.5],
        zone: EncounterZoneBias::West,
    },
    TemplateRow {
        id: "central_switchbacks",
        label: "Central Switchbacks",
        description: "Mid-map switchback route with medium meander and a compact central town block.",
        path: [0.52, 0.26, 0.74, 0.46],
        town: [0.28, 0.5, 0.26, 0.38],
        zone: EncounterZoneBias::Balanced,
    },
    TemplateRow {
        id: "riverbend_market",
        label: "Riverbend Market",
        description: "Path bends north then east; larger riverside town with east-leaning encounters.",
        path: [0.44, 0.24, 0.66, 0.38],
        town: [0.2, 0.46, 0.36, 0.52],
        zone: EncounterZoneBias::East,
    },
    TemplateRow {
        id: "cliffside_detour",
        label: "Cliffside Detour",
        description: "Upper-lane detour with tighter vertical movement and a smaller west ridge town.",
        path: [0.3, 0.12, 0.48, 0.32],
        town: [0.14, 0.3, 0.24, 0.34],
        zone: EncounterZoneBias::West,
    },
    TemplateRow {
        id: "eastward_promontory",
        label: "Eastward Promontory",
        description: "Route trends toward the east edge, with a modest town plateau and eastern wild zones.",
        path: [0.5, 0.3, 0.7, 0.24],
        town: [0.3, 0.54, 0.3, 0.4],
        zone: EncounterZoneBias::East,
    },
    TemplateRow {
        id: "westwood_weave",
        label: "Westwood Weave",
        description: "Forest-edge weave pattern with heavier meander and broad west-side encounter pockets.",
        path: [0.56, 0.3, 0.82, 0.5],
        town: [0.18, 0.58, 0.32, 0.46],
        zone: EncounterZoneBias::West,
    },
    TemplateRow {
        id: "twin_meadow_lane",
        label: "Twin Meadow Lane",
        description: "Gentle dual-lane feel with low meander and a wider but shallower town footprint.",
        path: [0.48, 0.34, 0.62, 0.2],
        town: [0.24, 0.48, 0.4, 0.32],
        zone: EncounterZoneBias::Balanced,
    },
    TemplateRow {
        id: "lowland_bypass",
        label: "Lowland Bypass",
        description: "Lower bypass route hugging southern terrain with mid-size town and west encounter bias.",
        path: [0.7, 0.52, 0.86, 0.3],
        town: [0.22, 0.68, 0.3, 0.42],
        zone: EncounterZoneBias::West,
    },
    TemplateRow {
        id: "highland_sweep",
        label: "Highland Sweep",
        description: "Northern highland sweep with broad arc movement, larger hill town, and eastern encounters.",
        path: [0.28, 0.1, 0.46, 0.42],
        town: [0.26, 0.3, 0.34, 0.5],
        zone: EncounterZoneBias::East,
    },
];

pub fn builtin_templates() -> Vec<GenerationTemplate> {
    TEMPLATES
        .iter()
        .map(|row| {
            let [start_y_ratio, min_y_ratio, max_y_ratio, meander_chance] = row.path;
            let [anchor_x_ratio, anchor_y_ratio, width_ratio, height_ratio] = row.town;
            GenerationTemplate {
                id: row.id.to_string(),
                label: row.label.to_string(),
                description: row.description.to_string(),
                hints: GenerationTemplateHints {
                    primary_path: Some(PrimaryPathHint {
                        start_y_ratio,
                        min_y_ratio,
                        max_y_ratio,
                        meander_chance,
                    }),
                    town: Some(TownHint { anchor_x_ratio, anchor_y_ratio, width_ratio, height_ratio }),
                    encounter_zone: Some(row.zone),
                },
            }
        })
        .collect()
}
