//! Happiness pass: residential-class tiles score their neighborhood.
//!
//! Every residential tile starts from a base of 80, accumulates radial
//! falloff from nearby active amenities and hazards, then loses flat
//! penalties for missing utilities. An active environmental crisis costs a
//! further flat 20.

use anyhow::Result;

use crate::catalog::BuildingKind;
use crate::spatial::distance;
use crate::world::{Grid, Tile};

use super::{falloff, CycleContext, CycleFrame, System};

pub const BASE_HAPPINESS: f64 = 80.0;
pub const NO_WATER_PENALTY: f64 = 20.0;
pub const NO_POWER_PENALTY: f64 = 20.0;
pub const NO_ROAD_PENALTY: f64 = 15.0;
pub const CRISIS_PENALTY: f64 = 20.0;

const FACTORY: (f64, f64) = (-25.0, 2.0);
const PARK: (f64, f64) = (20.0, 2.0);
const HOSPITAL: (f64, f64) = (12.0, 3.0);
const SCHOOL: (f64, f64) = (12.0, 3.0);
const TRANSIT: (f64, f64) = (8.0, 4.0);
const RECYCLING: (f64, f64) = (10.0, 2.0);
const ECO_DOME: (f64, f64) = (25.0, 5.0);

pub(crate) fn neighbor_effect(source: &Tile, dist: f64) -> f64 {
    let (magnitude, radius) = match source.building {
        Some(BuildingKind::Factory) => FACTORY,
        Some(BuildingKind::Park) => PARK,
        Some(BuildingKind::Hospital) => HOSPITAL,
        Some(BuildingKind::School) => SCHOOL,
        Some(BuildingKind::Transit) => TRANSIT,
        Some(BuildingKind::Recycling) => RECYCLING,
        Some(BuildingKind::EcoDome) => ECO_DOME,
        _ => return 0.0,
    };
    falloff(magnitude, dist, radius)
}

/// Neighborhood score for one residential-class tile, before any
/// environmental-crisis penalty.
pub(crate) fn tile_happiness(tile: &Tile, grid: &Grid) -> f64 {
    let mut score = BASE_HAPPINESS;
    for source in grid.tiles() {
        if !source.active || source.pos == tile.pos {
            continue;
        }
        score += neighbor_effect(source, distance(tile.pos, source.pos));
    }
    if !tile.water_supplied {
        score -= NO_WATER_PENALTY;
    }
    if !tile.powered {
        score -= NO_POWER_PENALTY;
    }
    if !tile.road_connected {
        score -= NO_ROAD_PENALTY;
    }
    score.clamp(0.0, 100.0)
}

#[derive(Default)]
pub struct HappinessSystem;

impl HappinessSystem {
    pub fn new() -> Self {
        Self
    }
}

impl System for HappinessSystem {
    fn name(&self) -> &'static str {
        "happiness"
    }

    fn run(&mut self, ctx: &CycleContext, frame: &mut CycleFrame) -> Result<()> {
        let snapshot = frame.grid.clone();
        for tile in frame.grid.tiles_mut() {
            if !tile.is_residential() {
                continue;
            }
            let mut score = tile_happiness(snapshot.tile(tile.pos), &snapshot);
            if ctx.crisis.environmental_crisis {
                score = (score - CRISIS_PENALTY).clamp(0.0, 100.0);
            }
            tile.happiness = score;
        }
        Ok(())
    }
}
