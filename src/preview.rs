//! Read models for placement previews and tile tooltips.
//!
//! Everything here is derived from the live grid; nothing mutates state.

use serde::Serialize;

use crate::catalog::{self, BuildingKind};
use crate::spatial::{self, TilePos};
use crate::systems::happiness;
use crate::world::Grid;

/// Tiles a polluting building would affect if placed at `pos`. Empty for
/// non-polluting kinds.
pub fn pollution_preview(pos: TilePos, kind: BuildingKind) -> Vec<TilePos> {
    let def = catalog::def(kind);
    if def.pollution <= 0 {
        return Vec::new();
    }
    let radius = if def.radius > 0.0 { def.radius } else { 2.0 };
    spatial::tiles_within_radius(pos, radius)
}

/// One line of a tile's happiness tooltip.
#[derive(Debug, Clone, Serialize)]
pub struct BreakdownItem {
    pub label: String,
    pub value: i64,
}

/// Itemized happiness contributions for the tile at `pos`: the base score,
/// each nearby active source's rounded falloff, and the flat connection
/// penalties.
pub fn happiness_breakdown(pos: TilePos, grid: &Grid) -> Vec<BreakdownItem> {
    let tile = grid.tile(pos);
    let mut items = vec![BreakdownItem {
        label: "Base".to_string(),
        value: happiness::BASE_HAPPINESS as i64,
    }];
    for source in grid.tiles() {
        if !source.active || source.pos == pos {
            continue;
        }
        let effect = happiness::neighbor_effect(source, spatial::distance(pos, source.pos));
        if effect != 0.0 {
            let kind = source.building.expect("active tile has a building");
            items.push(BreakdownItem {
                label: format!("{} nearby", kind.label()),
                value: effect.round() as i64,
            });
        }
    }
    if !tile.water_supplied {
        items.push(BreakdownItem {
            label: "No water".to_string(),
            value: -(happiness::NO_WATER_PENALTY as i64),
        });
    }
    if !tile.powered {
        items.push(BreakdownItem {
            label: "No power".to_string(),
            value: -(happiness::NO_POWER_PENALTY as i64),
        });
    }
    if !tile.road_connected {
        items.push(BreakdownItem {
            label: "No road".to_string(),
            value: -(happiness::NO_ROAD_PENALTY as i64),
        });
    }
    items
}

/// How a factory at `pos` weighs on the active homes around it.
#[derive(Debug, Clone, Serialize)]
pub struct NeighborhoodImpact {
    pub affected_homes: u32,
    pub estimated_income_delta: i64,
}

fn residential_delta(pos: TilePos, grid: &Grid, magnitude: f64, radius: f64) -> NeighborhoodImpact {
    let mut affected_homes = 0;
    let mut delta = 0.0;
    for tile in grid.residential_tiles() {
        if !tile.active {
            continue;
        }
        let dist = spatial::distance(pos, tile.pos);
        if dist > radius {
            continue;
        }
        affected_homes += 1;
        let swing = magnitude * (1.0 - dist / (radius + 1.0));
        let base = catalog::def(tile.building.expect("residential tile has a building")).income;
        delta += base as f64 * (swing / 100.0);
    }
    NeighborhoodImpact {
        affected_homes,
        estimated_income_delta: delta.round() as i64,
    }
}

/// Homes an active factory at `pos` would depress, and the income lost.
pub fn factory_impact(pos: TilePos, grid: &Grid) -> NeighborhoodImpact {
    let mut impact = residential_delta(pos, grid, 25.0, 2.0);
    impact.estimated_income_delta = -impact.estimated_income_delta;
    impact
}

/// Homes a park at `pos` would lift, and the income gained.
pub fn park_benefit(pos: TilePos, grid: &Grid) -> NeighborhoodImpact {
    residential_delta(pos, grid, 20.0, 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency;

    #[test]
    fn preview_is_empty_for_clean_buildings() {
        assert!(pollution_preview(TilePos::new(5, 5), BuildingKind::Park).is_empty());
        assert!(!pollution_preview(TilePos::new(5, 5), BuildingKind::Factory).is_empty());
    }

    #[test]
    fn breakdown_lists_connection_penalties() {
        let mut grid = Grid::new();
        grid.tile_mut(TilePos::new(4, 4)).building = Some(BuildingKind::Residential);
        let grid = dependency::resolve(&grid);
        let items = happiness_breakdown(TilePos::new(4, 4), &grid);
        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Base", "No water", "No power", "No road"]);
    }
}
