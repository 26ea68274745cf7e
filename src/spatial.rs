//! Spatial queries over the tile grid.
//!
//! Every radius check in the simulation uses Euclidean distance, and only
//! active tiles count as effect sources.

use serde::{Deserialize, Serialize};

use crate::catalog::BuildingKind;
use crate::world::{Grid, GRID_SIZE};

/// Position of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: u32,
    pub y: u32,
}

impl TilePos {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(self) -> bool {
        self.x < GRID_SIZE as u32 && self.y < GRID_SIZE as u32
    }
}

/// Euclidean distance between two grid coordinates.
pub fn distance(a: TilePos, b: TilePos) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    (dx * dx + dy * dy).sqrt()
}

/// True iff one of the 4 orthogonal neighbors is a road tile.
pub fn has_adjacent_road(pos: TilePos, grid: &Grid) -> bool {
    const DIRS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
    DIRS.iter().any(|&(dx, dy)| {
        let nx = pos.x as i64 + dx;
        let ny = pos.y as i64 + dy;
        if nx < 0 || ny < 0 || nx >= GRID_SIZE as i64 || ny >= GRID_SIZE as i64 {
            return false;
        }
        let neighbor = grid.tile(TilePos::new(nx as u32, ny as u32));
        neighbor.building == Some(BuildingKind::Road)
    })
}

/// True iff any active tile of one of the accepted kinds lies at
/// distance <= radius. Inactive instances do not count as sources.
pub fn is_within_radius_of(pos: TilePos, grid: &Grid, kinds: &[BuildingKind], radius: f64) -> bool {
    grid.tiles().any(|tile| {
        tile.active
            && tile.building.map_or(false, |kind| kinds.contains(&kind))
            && distance(pos, tile.pos) <= radius
    })
}

/// All grid coordinates within the distance, excluding `pos` itself,
/// in row-major order. Used for placement previews.
pub fn tiles_within_radius(pos: TilePos, radius: f64) -> Vec<TilePos> {
    let mut result = Vec::new();
    for y in 0..GRID_SIZE as u32 {
        for x in 0..GRID_SIZE as u32 {
            let candidate = TilePos::new(x, y);
            if candidate == pos {
                continue;
            }
            if distance(pos, candidate) <= radius {
                result.push(candidate);
            }
        }
    }
    result
}
