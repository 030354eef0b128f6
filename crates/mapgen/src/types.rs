//! Shared grid primitives and identifiers used across the generation pipeline.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Tile ids are registry keys; the grid stores them verbatim.
pub type TileId = u16;

/// Row-major tile grid, `grid[y][x]`.
pub type TileGrid = Vec<Vec<TileId>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: GridPoint) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// 4-neighbors in +x, -x, +y, -y order.
    pub fn neighbors(self) -> [GridPoint; 4] {
        [
            GridPoint::new(self.x + 1, self.y),
            GridPoint::new(self.x - 1, self.y),
            GridPoint::new(self.x, self.y + 1),
            GridPoint::new(self.x, self.y - 1),
        ]
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Quarter-turn clockwise rotation count applied to a building footprint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuildingRotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl BuildingRotation {
    pub const ALL: [BuildingRotation; 4] =
        [BuildingRotation::R0, BuildingRotation::R90, BuildingRotation::R180, BuildingRotation::R270];

    pub fn quarter_turns(self) -> u8 {
        match self {
            BuildingRotation::R0 => 0,
            BuildingRotation::R90 => 1,
            BuildingRotation::R180 => 2,
            BuildingRotation::R270 => 3,
        }
    }

    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => BuildingRotation::R0,
            1 => BuildingRotation::R90,
            2 => BuildingRotation::R180,
            _ => BuildingRotation::R270,
        }
    }
}

// Serialized as the bare 0..=3 integer the editor uses.
impl Serialize for BuildingRotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.quarter_turns())
    }
}

impl<'de> Deserialize<'de> for BuildingRotation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let turns = u8::deserialize(deserializer)?;
        if turns > 3 {
            return Err(de::Error::custom(format!("rotation {turns} is not in 0..=3")));
        }
        Ok(BuildingRotation::from_quarter_turns(turns))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedBuildingPlacement {
    pub building_id: String,
    pub rotation: BuildingRotation,
    pub anchor: GridPoint,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedDistrict {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ReservedDistrict {
    pub fn contains(&self, point: GridPoint) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_round_trips_through_quarter_turns() {
        for rotation in BuildingRotation::ALL {
            assert_eq!(BuildingRotation::from_quarter_turns(rotation.quarter_turns()), rotation);
        }
        assert_eq!(BuildingRotation::from_quarter_turns(5), BuildingRotation::R90);
    }

    #[test]
    fn rotation_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<BuildingRotation>("4").is_err());
        assert_eq!(
            serde_json::from_str::<BuildingRotation>("3").expect("rotation parses"),
            BuildingRotation::R270
        );
    }

    #[test]
    fn district_contains_is_half_open() {
        let district = ReservedDistrict { id: "town".into(), x: 2, y: 3, width: 4, height: 2 };
        assert!(district.contains(GridPoint::new(2, 3)));
        assert!(district.contains(GridPoint::new(5, 4)));
        assert!(!district.contains(GridPoint::new(6, 4)));
        assert!(!district.contains(GridPoint::new(5, 5)));
    }
}
