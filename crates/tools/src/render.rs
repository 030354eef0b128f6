//! Plain-text rendering of a generated grid.

use mapgen::registry::{TileCategory, tile_ids};
use mapgen::{TileId, TileRegistry};

pub fn glyph(registry: &TileRegistry, tile_id: TileId) -> char {
    if tile_id == tile_ids::PATH {
        return '=';
    }
    match registry.category(tile_id) {
        Some(TileCategory::Terrain) if registry.is_walkable(tile_id) => '.',
        Some(TileCategory::Terrain) => '#',
        Some(TileCategory::Encounter) => '"',
        Some(TileCategory::Interactive) => '+',
        Some(TileCategory::Entity) => '@',
        Some(TileCategory::Trainer) => '!',
        None => '?',
    }
}

/// One line per grid row, newline-terminated.
pub fn render_ascii(grid: &[Vec<TileId>], registry: &TileRegistry) -> String {
    let mut out = String::new();
    for row in grid {
        out.extend(row.iter().map(|&tile_id| glyph(registry, tile_id)));
        out.push('\n');
    }
    out
}
