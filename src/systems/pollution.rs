//! Pollution pass: every tile accumulates signed contributions from every
//! active source within that source's effect radius.

use anyhow::Result;

use crate::catalog::BuildingKind;
use crate::spatial::distance;
use crate::world::Tile;

use super::{falloff, CycleContext, CycleFrame, System};

/// (magnitude, radius) pairs of the pollution field. Factories are the
/// dominant positive source; the rest mitigate.
const FACTORY: (f64, f64) = (40.0, 2.0);
const PARK: (f64, f64) = (-15.0, 2.0);
const RECYCLING: (f64, f64) = (-20.0, 2.0);
const TRANSIT: (f64, f64) = (-10.0, 4.0);
const ECO_DOME: (f64, f64) = (-30.0, 4.0);
const WIND_TURBINE: (f64, f64) = (-5.0, 3.0);

fn contribution(source: &Tile, dist: f64) -> f64 {
    let (magnitude, radius) = match source.building {
        Some(BuildingKind::Factory) => FACTORY,
        Some(BuildingKind::Park) => PARK,
        Some(BuildingKind::Recycling) => RECYCLING,
        Some(BuildingKind::Transit) => TRANSIT,
        Some(BuildingKind::EcoDome) => ECO_DOME,
        Some(BuildingKind::WindTurbine) => WIND_TURBINE,
        _ => return 0.0,
    };
    falloff(magnitude, dist, radius)
}

#[derive(Default)]
pub struct PollutionSystem;

impl PollutionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl System for PollutionSystem {
    fn name(&self) -> &'static str {
        "pollution"
    }

    fn run(&mut self, _ctx: &CycleContext, frame: &mut CycleFrame) -> Result<()> {
        let snapshot = frame.grid.clone();
        for tile in frame.grid.tiles_mut() {
            let mut total = 0.0;
            for source in snapshot.tiles() {
                if !source.active {
                    continue;
                }
                total += contribution(source, distance(tile.pos, source.pos));
            }
            tile.pollution = total.clamp(0.0, 100.0);
        }
        Ok(())
    }
}
