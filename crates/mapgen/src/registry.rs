//! Tile and building lookup tables consumed by the generator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::types::TileId;

pub mod tile_ids {
    use crate::types::TileId;

    pub const WATER: TileId = 0;
    pub const GRASS: TileId = 1;
    pub const PATH: TileId = 2;
    pub const TREE: TileId = 3;
    pub const DOOR: TileId = 4;
    pub const WALL: TileId = 6;
    pub const TALL_GRASS: TileId = 7;
    pub const ROCK: TileId = 8;
    pub const SIGN: TileId = 9;
    pub const NPC: TileId = 10;
    pub const FLOWER: TileId = 19;
    pub const TRAINER_UP: TileId = 20;
    pub const TRAINER_DOWN: TileId = 21;
    pub const TRAINER_LEFT: TileId = 22;
    pub const TRAINER_RIGHT: TileId = 23;
    pub const SURF_WATER: TileId = 25;
    pub const RARE_GRASS: TileId = 28;
    pub const HIDDEN_ITEM: TileId = 40;
    pub const ITEM: TileId = 42;

    pub const TRAINERS: [TileId; 4] = [TRAINER_UP, TRAINER_DOWN, TRAINER_LEFT, TRAINER_RIGHT];
    pub const DEFAULT_ENCOUNTERS: [TileId; 2] = [TALL_GRASS, RARE_GRASS];

    /// Decoration kept off town streets.
    pub const TOWN_PATH_CLUTTER: [TileId; 12] = [
        TREE,
        TALL_GRASS,
        SIGN,
        NPC,
        FLOWER,
        TRAINER_UP,
        TRAINER_DOWN,
        TRAINER_LEFT,
        TRAINER_RIGHT,
        RARE_GRASS,
        HIDDEN_ITEM,
        ITEM,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileCategory {
    Terrain,
    Encounter,
    Interactive,
    Entity,
    Trainer,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDefinition {
    pub id: TileId,
    pub name: String,
    pub color: String,
    pub walkable: bool,
    pub category: TileCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounter: Option<String>,
    #[serde(default)]
    pub is_overlay: bool,
}

/// Rotation-0 footprint; `None` cells are left untouched when stamped.
pub type FootprintMatrix = Vec<Vec<Option<TileId>>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingDefinition {
    pub id: String,
    pub name: String,
    pub tiles: FootprintMatrix,
}

impl BuildingDefinition {
    pub fn width(&self) -> usize {
        self.tiles.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.tiles.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileRegistry {
    tiles: BTreeMap<TileId, TileDefinition>,
    buildings: Vec<BuildingDefinition>,
}

#[derive(Deserialize)]
struct RegistryFile {
    tiles: Vec<TileDefinition>,
    #[serde(default)]
    buildings: Vec<BuildingDefinition>,
}

impl TileRegistry {
    pub fn new(
        tiles: Vec<TileDefinition>,
        buildings: Vec<BuildingDefinition>,
    ) -> Result<Self, GenerationError> {
        let mut by_id = BTreeMap::new();
        for tile in tiles {
            let id = tile.id;
            if by_id.insert(id, tile).is_some() {
                return Err(GenerationError::InvalidRegistry(format!("duplicate tile id {id}")));
            }
        }
        for (index, building) in buildings.iter().enumerate() {
            if buildings[..index].iter().any(|other| other.id == building.id) {
                return Err(GenerationError::InvalidRegistry(format!(
                    "duplicate building id `{}`",
                    building.id
                )));
            }
            let width = building.width();
            if building.tiles.iter().any(|row| row.len() != width) {
                return Err(GenerationError::InvalidRegistry(format!(
                    "building `{}` has ragged footprint rows",
                    building.id
                )));
            }
        }
        Ok(Self { tiles: by_id, buildings })
    }

    /// Parses the editor's registry JSON; `metadata` and `categories` are ignored.
    pub fn from_json(json: &str) -> Result<Self, GenerationError> {
        let file: RegistryFile = serde_json::from_str(json)
            .map_err(|err| GenerationError::InvalidRegistry(err.to_string()))?;
        Self::new(file.tiles, file.buildings)
    }

    pub fn builtin() -> Self {
        let tiles = BUILTIN_TILES
            .iter()
            .map(|&(id, name, color, walkable, category)| TileDefinition {
                id,
                name: name.to_string(),
                color: color.to_string(),
                walkable,
                category,
                encounter: None,
                is_overlay: OVERLAY_TILE_IDS.contains(&id),
            })
            .map(|tile| (tile.id, tile))
            .collect();
        Self { tiles, buildings: builtin_buildings() }
    }

    pub fn tile(&self, id: TileId) -> Option<&TileDefinition> {
        self.tiles.get(&id)
    }

    pub fn is_known(&self, id: TileId) -> bool {
        self.tiles.contains_key(&id)
    }

    pub fn is_walkable(&self, id: TileId) -> bool {
        self.tiles.get(&id).is_some_and(|tile| tile.walkable)
    }

    pub fn category(&self, id: TileId) -> Option<TileCategory> {
        self.tiles.get(&id).map(|tile| tile.category)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &TileDefinition> {
        self.tiles.values()
    }

    pub fn buildings(&self) -> &[BuildingDefinition] {
        &self.buildings
    }

    pub fn building(&self, id: &str) -> Result<&BuildingDefinition, GenerationError> {
        self.buildings
            .iter()
            .find(|building| building.id == id)
            .ok_or_else(|| GenerationError::UnknownBuilding(id.to_string()))
    }
}

const OVERLAY_TILE_IDS: [TileId; 6] = [3, 8, 19, 26, 27, 49];

const BUILTIN_TILES: &[(TileId, &str, &str, bool, TileCategory)] = &[
    (0, "Water", "#1a4a7a", false, TileCategory::Terrain),
    (1, "Grass", "#2d5a27", true, TileCategory::Terrain),
    (2, "Path", "#c9a86c", true, TileCategory::Terrain),
    (3, "Tree", "#1a4a1a", false, TileCategory::Terrain),
    (4, "Door", "#8b4513", true, TileCategory::Interactive),
    (5, "Bridge", "#6b4423", true, TileCategory::Terrain),
    (6, "Wall", "#555555", false, TileCategory::Terrain),
    (7, "Tall Grass", "#1a8a1a", true, TileCategory::Encounter),
    (8, "Rock", "#696969", false, TileCategory::Terrain),
    (9, "Sign", "#8b7355", false, TileCategory::Interactive),
    (10, "NPC", "#ff6b6b", false, TileCategory::Entity),
    (11, "Shop", "#ffd93d", false, TileCategory::Entity),
    (12, "Heal", "#6bcb77", false, TileCategory::Entity),
    (13, "Item", "#9d4edd", true, TileCategory::Entity),
    (14, "Key Item", "#e040fb", true, TileCategory::Entity),
    (15, "Cave", "#2c2c2c", true, TileCategory::Encounter),
    (16, "Warp", "#00cec9", true, TileCategory::Interactive),
    (17, "Water Edge", "#2980b9", false, TileCategory::Terrain),
    (18, "Fence", "#795548", false, TileCategory::Terrain),
    (19, "Flower", "#e84393", true, TileCategory::Terrain),
    (20, "Trainer Up", "#ff922b", false, TileCategory::Trainer),
    (21, "Trainer Down", "#ff922b", false, TileCategory::Trainer),
    (22, "Trainer Left", "#ff922b", false, TileCategory::Trainer),
    (23, "Trainer Right", "#ff922b", false, TileCategory::Trainer),
    (24, "Gym Leader", "#ff1744", false, TileCategory::Trainer),
    (25, "Surf Water", "#1e90ff", false, TileCategory::Encounter),
    (26, "Strength Rock", "#8d6e63", false, TileCategory::Interactive),
    (27, "Cut Tree", "#4caf50", false, TileCategory::Interactive),
    (28, "Rare Grass", "#ffd700", true, TileCategory::Encounter),
    (29, "Legendary", "#ff00ff", true, TileCategory::Encounter),
    (30, "Villain Boss", "#800080", false, TileCategory::Trainer),
    (31, "Villain Up", "#4a0080", false, TileCategory::Trainer),
    (32, "Villain Down", "#4a0080", false, TileCategory::Trainer),
    (33, "Villain Left", "#4a0080", false, TileCategory::Trainer),
    (34, "Villain Right", "#4a0080", false, TileCategory::Trainer),
    (35, "Minion Up", "#6a0dad", false, TileCategory::Trainer),
    (36, "Minion Down", "#6a0dad", false, TileCategory::Trainer),
    (37, "Minion Left", "#6a0dad", false, TileCategory::Trainer),
    (38, "Minion Right", "#6a0dad", false, TileCategory::Trainer),
    (39, "Rival", "#dc143c", false, TileCategory::Trainer),
    (40, "Hidden Item", "#4682b4", true, TileCategory::Entity),
    (41, "PC", "#a9a9a9", false, TileCategory::Interactive),
    (42, "Pokeball", "#ff0000", true, TileCategory::Entity),
    (43, "Elite 4", "#c0c0c0", false, TileCategory::Trainer),
    (44, "Champion", "#ffd700", false, TileCategory::Trainer),
    (45, "Champion Alt", "#ffd700", false, TileCategory::Trainer),
    (46, "Rival Final", "#dc143c", false, TileCategory::Trainer),
    (47, "Prof Oak", "#8b4513", false, TileCategory::Entity),
    (48, "Mom", "#dda0dd", false, TileCategory::Entity),
    (49, "Statue", "#d4af37", false, TileCategory::Interactive),
    (50, "Badge", "#00ced1", true, TileCategory::Entity),
];

// Doors sit on the outer edge of each footprint so they can face a street.
fn builtin_buildings() -> Vec<BuildingDefinition> {
    const W: Option<TileId> = Some(6);
    const D: Option<TileId> = Some(4);
    const T: Option<TileId> = Some(3);
    const N: Option<TileId> = None;

    fn define(id: &str, name: &str, rows: &[&[Option<TileId>]]) -> BuildingDefinition {
        BuildingDefinition {
            id: id.to_string(),
            name: name.to_string(),
            tiles: rows.iter().map(|row| row.to_vec()).collect(),
        }
    }

    vec![
        define("pokecenter", "Pokecenter", &[
            &[W, W, W, W],
            &[W, Some(12), Some(12), W],
            &[W, W, W, W],
            &[W, D, D, W],
        ]),
        define("pokemart", "Pokemart", &[
            &[W, W, W, W],
            &[W, Some(11), Some(11), W],
            &[W, W, W, W],
            &[W, D, W, W],
        ]),
        define("gym", "Gym", &[
            &[W, W, W, W, W],
            &[W, W, Some(49), W, W],
            &[W, W, W, W, W],
            &[W, W, W, W, W],
            &[W, W, D, W, W],
        ]),
        define("house-small", "House Small", &[&[W, W, W], &[W, W, W], &[W, D, W]]),
        define("house-large", "House Large", &[
            &[N, W, W, N],
            &[W, W, W, W],
            &[W, W, W, W],
            &[W, D, W, W],
        ]),
        define("lab", "Lab", &[
            &[W, W, W, W, W],
            &[W, Some(41), W, Some(41), W],
            &[W, W, W, W, W],
            &[W, W, D, W, W],
        ]),
        define("cave-entrance", "Cave Entrance", &[&[T, T, T], &[Some(8), Some(15), Some(8)]]),
        define("gate", "Gate", &[&[W, W, W, W], &[W, Some(16), Some(16), W], &[W, W, W, W]]),
        define("pond", "Pond", &[
            &[Some(17), Some(0), Some(0), Some(17)],
            &[Some(0), Some(0), Some(0), Some(0)],
            &[Some(17), Some(0), Some(0), Some(17)],
        ]),
        define("fence-h", "Fence H", &[&[Some(18), Some(18), Some(18), Some(18)]]),
        define("fence-v", "Fence V", &[&[Some(18)], &[Some(18)], &[Some(18)], &[Some(18)]]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_covers_ids_zero_through_fifty() {
        let registry = TileRegistry::builtin();
        assert_eq!(registry.tiles().count(), 51);
        for id in 0..=50 {
            assert!(registry.is_known(id), "tile {id} should be registered");
        }
        assert!(!registry.is_known(51));
        assert!(registry.is_walkable(tile_ids::PATH));
        assert!(!registry.is_walkable(tile_ids::TREE));
        assert!(registry.tile(tile_ids::FLOWER).is_some_and(|tile| tile.is_overlay));
        assert_eq!(registry.category(tile_ids::TRAINER_LEFT), Some(TileCategory::Trainer));
    }

    #[test]
    fn builtin_buildings_have_rectangular_footprints_and_edge_doors() {
        let registry = TileRegistry::builtin();
        assert_eq!(registry.buildings().len(), 11);
        for building in registry.buildings() {
            let width = building.width();
            assert!(width > 0 && building.height() > 0, "{} footprint is empty", building.id);
            assert!(building.tiles.iter().all(|row| row.len() == width));
            for (y, row) in building.tiles.iter().enumerate() {
                for (x, cell) in row.iter().enumerate() {
                    if *cell == Some(tile_ids::DOOR) {
                        let on_edge = x == 0 || y == 0 || x + 1 == width || y + 1 == building.height();
                        assert!(on_edge, "{} door at ({x}, {y}) is enclosed", building.id);
                    }
                }
            }
        }
    }

    #[test]
    fn unknown_building_lookup_is_an_error() {
        let registry = TileRegistry::builtin();
        assert_eq!(
            registry.building("castle"),
            Err(GenerationError::UnknownBuilding("castle".to_string()))
        );
        assert!(registry.building("gym").is_ok());
    }

    #[test]
    fn registry_json_parses_editor_format() {
        let json = r##"{
            "metadata": { "id": "custom", "name": "Custom", "version": "1" },
            "categories": [{ "id": "terrain", "label": "Terrain", "showInPalette": true }],
            "tiles": [
                { "id": 1, "name": "Grass", "color": "#00ff00", "walkable": true, "category": "terrain" },
                { "id": 2, "name": "Path", "color": "#cccccc", "walkable": true, "category": "terrain" },
                { "id": 4, "name": "Door", "color": "#884400", "walkable": true, "category": "interactive" }
            ],
            "buildings": [
                { "id": "hut", "name": "Hut", "tiles": [[6, 6], [4, null]] }
            ]
        }"##;
        let registry = TileRegistry::from_json(json).expect("registry json should parse");
        assert_eq!(registry.tiles().count(), 3);
        let hut = registry.building("hut").expect("hut is registered");
        assert_eq!(hut.tiles, vec![vec![Some(6), Some(6)], vec![Some(4), None]]);
    }

    #[test]
    fn registry_rejects_duplicate_tiles_and_ragged_footprints() {
        let tile = TileDefinition {
            id: 1,
            name: "Grass".into(),
            color: "#000".into(),
            walkable: true,
            category: TileCategory::Terrain,
            encounter: None,
            is_overlay: false,
        };
        assert!(matches!(
            TileRegistry::new(vec![tile.clone(), tile.clone()], Vec::new()),
            Err(GenerationError::InvalidRegistry(_))
        ));

        let ragged = BuildingDefinition {
            id: "odd".into(),
            name: "Odd".into(),
            tiles: vec![vec![Some(6), Some(6)], vec![Some(6)]],
        };
        assert!(matches!(
            TileRegistry::new(vec![tile], vec![ragged]),
            Err(GenerationError::InvalidRegistry(_))
        ));
    }
}
