//! Authoritative game state: the tile grid and everything the cycle
//! transition reads and writes.
//!
//! `GameState` is a plain value. Entry points in [`crate::engine`] take it
//! through well-defined mutations; everything else reads it by reference or
//! works on a clone. The whole structure serializes with serde and is the
//! persistence record.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{self, BuildingKind};
use crate::spatial::TilePos;

pub const GRID_SIZE: usize = 10;
pub const STARTING_MONEY: i64 = 500;

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub pos: TilePos,
    pub building: Option<BuildingKind>,
    pub active: bool,
    pub pollution: f64,
    pub happiness: f64,
    pub water_supplied: bool,
    pub powered: bool,
    pub road_connected: bool,
    pub abandoned: bool,
    /// Transient presentation flag; cleared at the start of the next cycle.
    #[serde(default)]
    pub just_placed: bool,
}

impl Tile {
    fn empty(pos: TilePos) -> Self {
        Self {
            pos,
            building: None,
            active: false,
            pollution: 0.0,
            happiness: 0.0,
            water_supplied: false,
            powered: false,
            road_connected: false,
            abandoned: false,
            just_placed: false,
        }
    }

    /// Reset to an empty cell, keeping only the position.
    pub fn clear(&mut self) {
        *self = Tile::empty(self.pos);
    }

    pub fn is_empty(&self) -> bool {
        self.building.is_none()
    }

    pub fn is_residential(&self) -> bool {
        self.building.map_or(false, BuildingKind::is_residential)
    }
}

/// The 10x10 tile grid. Value semantics: cloning the grid snapshots it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new() -> Self {
        let mut tiles = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
        for y in 0..GRID_SIZE as u32 {
            for x in 0..GRID_SIZE as u32 {
                tiles.push(Tile::empty(TilePos::new(x, y)));
            }
        }
        Self { tiles }
    }

    fn index(pos: TilePos) -> usize {
        debug_assert!(pos.in_bounds(), "tile position out of bounds: {pos:?}");
        pos.y as usize * GRID_SIZE + pos.x as usize
    }

    pub fn tile(&self, pos: TilePos) -> &Tile {
        &self.tiles[Self::index(pos)]
    }

    pub fn tile_mut(&mut self, pos: TilePos) -> &mut Tile {
        &mut self.tiles[Self::index(pos)]
    }

    /// Row-major iteration over all 100 tiles.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    pub fn positions() -> impl Iterator<Item = TilePos> {
        (0..GRID_SIZE as u32)
            .flat_map(|y| (0..GRID_SIZE as u32).map(move |x| TilePos::new(x, y)))
    }

    pub fn count(&self, kind: BuildingKind) -> u32 {
        self.tiles().filter(|t| t.building == Some(kind)).count() as u32
    }

    pub fn count_active(&self, kind: BuildingKind) -> u32 {
        self.tiles()
            .filter(|t| t.building == Some(kind) && t.active)
            .count() as u32
    }

    pub fn residential_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles().filter(|t| t.is_residential())
    }

    pub fn clear_just_placed(&mut self) {
        for tile in self.tiles_mut() {
            tile.just_placed = false;
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

/// Consecutive low-happiness cycle counters, one per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakGrid(pub [[u32; GRID_SIZE]; GRID_SIZE]);

impl StreakGrid {
    pub fn new() -> Self {
        Self([[0; GRID_SIZE]; GRID_SIZE])
    }

    pub fn get(&self, pos: TilePos) -> u32 {
        self.0[pos.y as usize][pos.x as usize]
    }

    pub fn set(&mut self, pos: TilePos, value: u32) {
        self.0[pos.y as usize][pos.x as usize] = value;
    }

    pub fn reset(&mut self, pos: TilePos) {
        self.set(pos, 0);
    }
}

impl Default for StreakGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// City-wide adverse conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrisisState {
    /// Consecutive cycles with average happiness below 40. Sticky until
    /// a cycle recovers, then reset to 0.
    pub protest_cycles: u32,
    /// Average pollution above 80, recomputed fresh each cycle.
    pub environmental_crisis: bool,
    /// Money balance negative, recomputed fresh each cycle.
    pub economic_collapse: bool,
}

/// Observable facts emitted by entry points for presentation banners and
/// animations. The core schedules nothing; consumers decide what to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    MissionCompleted { id: String },
    LevelUp { level: u32 },
    GameCompleted,
    TileAbandoned { pos: TilePos },
    ProtestStarted,
    CitizenRevolt,
    ProtestEnded,
    EnvironmentalCrisisStarted,
    EnvironmentalCrisisEnded,
    EconomicCollapseStarted,
    EconomicCollapseEnded,
}

/// The single authoritative snapshot of a running game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub grid: Grid,
    pub money: i64,
    pub xp: i64,
    pub level: u32,
    pub cycles: u64,
    pub total_income_earned: i64,
    pub current_mission_index: usize,
    pub completed_missions: Vec<String>,
    pub unlocked_buildings: Vec<BuildingKind>,
    pub selected_building: Option<BuildingKind>,
    pub demolish_mode: bool,
    pub avg_happiness: u32,
    pub avg_pollution: u32,
    pub last_cycle_income: i64,
    pub game_complete: bool,
    /// Sustain-objective counters keyed by `<mission id>_<objective index>`.
    pub sustain_counters: HashMap<String, u32>,
    pub crisis: CrisisState,
    pub low_happiness_streaks: StreakGrid,
    pub abandoned_count: u32,
}

impl GameState {
    /// A fresh game: empty grid, starting funds, the four level-1 kinds
    /// unlocked, mission pointer at the first mission.
    pub fn new_game() -> Self {
        Self {
            grid: Grid::new(),
            money: STARTING_MONEY,
            xp: 0,
            level: 1,
            cycles: 0,
            total_income_earned: 0,
            current_mission_index: 0,
            completed_missions: Vec::new(),
            unlocked_buildings: vec![
                BuildingKind::Road,
                BuildingKind::Residential,
                BuildingKind::WaterPlant,
                BuildingKind::SolarPlant,
            ],
            selected_building: None,
            demolish_mode: false,
            avg_happiness: 0,
            avg_pollution: 0,
            last_cycle_income: 0,
            game_complete: false,
            sustain_counters: HashMap::new(),
            crisis: CrisisState::default(),
            low_happiness_streaks: StreakGrid::new(),
            abandoned_count: 0,
        }
    }

    pub fn is_unlocked(&self, kind: BuildingKind) -> bool {
        self.unlocked_buildings.contains(&kind)
    }

    /// Merge reward unlocks without duplicating entries.
    pub fn unlock(&mut self, kinds: &[BuildingKind]) {
        for &kind in kinds {
            if !self.unlocked_buildings.contains(&kind) {
                self.unlocked_buildings.push(kind);
            }
        }
    }

    pub fn recompute_level(&mut self) -> u32 {
        self.level = catalog::level_for_xp(self.xp);
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_positions_match_storage() {
        let grid = Grid::new();
        for pos in Grid::positions() {
            assert_eq!(grid.tile(pos).pos, pos, "tile position must match its slot");
        }
        assert_eq!(grid.tiles().count(), GRID_SIZE * GRID_SIZE);
    }

    #[test]
    fn empty_tiles_are_inert() {
        let grid = Grid::new();
        for tile in grid.tiles() {
            assert!(tile.is_empty());
            assert!(!tile.active);
            assert_eq!(tile.pollution, 0.0);
            assert_eq!(tile.happiness, 0.0);
        }
    }

    #[test]
    fn unlock_is_idempotent() {
        let mut state = GameState::new_game();
        let before = state.unlocked_buildings.len();
        state.unlock(&[BuildingKind::Factory, BuildingKind::Factory]);
        state.unlock(&[BuildingKind::Factory, BuildingKind::Road]);
        assert_eq!(state.unlocked_buildings.len(), before + 1);
    }

    #[test]
    fn clearing_a_tile_keeps_its_position() {
        let mut grid = Grid::new();
        let pos = TilePos::new(3, 7);
        let tile = grid.tile_mut(pos);
        tile.building = Some(BuildingKind::Factory);
        tile.abandoned = true;
        tile.clear();
        assert_eq!(grid.tile(pos).pos, pos);
        assert!(grid.tile(pos).is_empty());
        assert!(!grid.tile(pos).abandoned);
    }
}
