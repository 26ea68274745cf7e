//! Dependency resolution: which tiles have their prerequisites satisfied.
//!
//! Runs after any topology change (placement or demolition), never on the
//! cycle timer. The prerequisite check is hardcoded per kind; the catalog's
//! `needs` list is display data only.

use std::fmt;

use serde::Serialize;

use crate::catalog::BuildingKind;
use crate::spatial::{self, TilePos};
use crate::world::Grid;

pub const UTILITY_RADIUS: f64 = 3.0;

const WATER_SOURCES: [BuildingKind; 1] = [BuildingKind::WaterPlant];
const POWER_SOURCES: [BuildingKind; 2] = [BuildingKind::SolarPlant, BuildingKind::WindTurbine];

/// A prerequisite a tile can be missing. `Display` renders the UI hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    RoadAccess,
    Water,
    Power,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::RoadAccess => write!(f, "needs road access"),
            Requirement::Water => write!(f, "needs water supply within {UTILITY_RADIUS}"),
            Requirement::Power => write!(f, "needs power within {UTILITY_RADIUS}"),
        }
    }
}

/// Outcome of a prerequisite check, with the missing list for UI hints.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    pub missing: Vec<Requirement>,
}

impl DependencyReport {
    pub fn satisfied(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check the hardcoded prerequisites of `kind` as if it stood at `pos`.
///
/// Also valid for prospective placements: the tile at `pos` need not hold
/// `kind` (previews call this before building).
pub fn check(kind: BuildingKind, pos: TilePos, grid: &Grid) -> DependencyReport {
    let mut missing = Vec::new();
    if kind != BuildingKind::Road && !spatial::has_adjacent_road(pos, grid) {
        missing.push(Requirement::RoadAccess);
    }
    let needs_water = matches!(
        kind,
        BuildingKind::Residential | BuildingKind::GreenTower | BuildingKind::Factory
    );
    let needs_power = matches!(
        kind,
        BuildingKind::Residential
            | BuildingKind::GreenTower
            | BuildingKind::Hospital
            | BuildingKind::School
            | BuildingKind::EcoDome
    );
    if needs_water && !spatial::is_within_radius_of(pos, grid, &WATER_SOURCES, UTILITY_RADIUS) {
        missing.push(Requirement::Water);
    }
    if needs_power && !spatial::is_within_radius_of(pos, grid, &POWER_SOURCES, UTILITY_RADIUS) {
        missing.push(Requirement::Power);
    }
    DependencyReport { missing }
}

/// Recompute `road_connected`, `water_supplied`, `powered`, and `active`
/// for every non-empty tile.
///
/// Each pass reads one immutable snapshot, so the sweep is order
/// independent. Utility buildings depend only on road adjacency and
/// stabilize in the first pass; consumers of their radius effects stabilize
/// in the second, which is the fixed point.
pub fn resolve(grid: &Grid) -> Grid {
    let once = resolve_pass(grid);
    resolve_pass(&once)
}

fn resolve_pass(grid: &Grid) -> Grid {
    let mut next = grid.clone();
    for tile in next.tiles_mut() {
        let Some(kind) = tile.building else { continue };
        let report = check(kind, tile.pos, grid);
        tile.active = report.satisfied();
        tile.road_connected =
            kind == BuildingKind::Road || spatial::has_adjacent_road(tile.pos, grid);
        tile.water_supplied =
            spatial::is_within_radius_of(tile.pos, grid, &WATER_SOURCES, UTILITY_RADIUS);
        tile.powered = spatial::is_within_radius_of(tile.pos, grid, &POWER_SOURCES, UTILITY_RADIUS);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(grid: &mut Grid, x: u32, y: u32, kind: BuildingKind) {
        grid.tile_mut(TilePos::new(x, y)).building = Some(kind);
    }

    #[test]
    fn roads_are_trivially_active() {
        let mut grid = Grid::new();
        place(&mut grid, 5, 5, BuildingKind::Road);
        let resolved = resolve(&grid);
        let road = resolved.tile(TilePos::new(5, 5));
        assert!(road.active);
        assert!(road.road_connected);
    }

    #[test]
    fn residential_reports_missing_water_and_power() {
        let mut grid = Grid::new();
        place(&mut grid, 5, 5, BuildingKind::Road);
        place(&mut grid, 5, 6, BuildingKind::Residential);
        let resolved = resolve(&grid);
        let house = resolved.tile(TilePos::new(5, 6));
        assert!(!house.active);
        let report = check(BuildingKind::Residential, TilePos::new(5, 6), &resolved);
        assert_eq!(report.missing, vec![Requirement::Water, Requirement::Power]);
    }

    #[test]
    fn utilities_activate_their_consumers_in_one_resolve() {
        let mut grid = Grid::new();
        place(&mut grid, 5, 5, BuildingKind::Road);
        place(&mut grid, 5, 6, BuildingKind::Residential);
        place(&mut grid, 4, 5, BuildingKind::WaterPlant);
        place(&mut grid, 6, 5, BuildingKind::SolarPlant);
        let resolved = resolve(&grid);
        let house = resolved.tile(TilePos::new(5, 6));
        assert!(house.water_supplied);
        assert!(house.powered);
        assert!(house.active, "house should activate once utilities resolve");
    }

    #[test]
    fn resolver_is_idempotent() {
        let mut grid = Grid::new();
        place(&mut grid, 2, 2, BuildingKind::Road);
        place(&mut grid, 2, 3, BuildingKind::Residential);
        place(&mut grid, 3, 2, BuildingKind::WaterPlant);
        place(&mut grid, 1, 2, BuildingKind::SolarPlant);
        place(&mut grid, 7, 7, BuildingKind::Factory);
        let once = resolve(&grid);
        let twice = resolve(&once);
        assert_eq!(once, twice, "resolving twice must not change the grid");
    }

    #[test]
    fn disconnected_factory_is_inactive() {
        let mut grid = Grid::new();
        place(&mut grid, 0, 0, BuildingKind::Factory);
        let resolved = resolve(&grid);
        assert!(!resolved.tile(TilePos::new(0, 0)).active);
        let report = check(BuildingKind::Factory, TilePos::new(0, 0), &resolved);
        assert_eq!(report.missing, vec![Requirement::RoadAccess, Requirement::Water]);
    }
}
