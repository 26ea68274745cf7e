//! Income pass: sums per-tile income, dampened by active crises.

use anyhow::Result;

use crate::catalog::BuildingKind;
use crate::world::Tile;

use super::{CycleContext, CycleFrame, System};

/// Residential income is scaled by this once protests have started.
pub const PROTEST_DAMPING: f64 = 0.7;
/// After three protest cycles the revolt scaling supersedes the above.
pub const REVOLT_DAMPING: f64 = 0.5;
/// An environmental crisis scales the whole cycle's income.
pub const CRISIS_DAMPING: f64 = 0.8;

/// Income of a single tile, before city-wide dampening. Inactive tiles earn
/// nothing; abandoned or deeply unhappy residential tiles earn nothing.
pub(crate) fn tile_income(tile: &Tile) -> f64 {
    if !tile.active {
        return 0.0;
    }
    match tile.building {
        Some(BuildingKind::Residential) | Some(BuildingKind::GreenTower) => {
            if tile.abandoned || tile.happiness < 25.0 {
                return 0.0;
            }
            let base = if tile.building == Some(BuildingKind::Residential) {
                8.0
            } else {
                20.0
            };
            base * (tile.happiness / 100.0)
        }
        Some(BuildingKind::Factory) => 30.0,
        Some(BuildingKind::WindTurbine) => 5.0,
        Some(BuildingKind::Transit) => 10.0,
        Some(BuildingKind::EcoDome) => 30.0,
        _ => 0.0,
    }
}

#[derive(Default)]
pub struct IncomeSystem;

impl IncomeSystem {
    pub fn new() -> Self {
        Self
    }
}

impl System for IncomeSystem {
    fn name(&self) -> &'static str {
        "income"
    }

    fn run(&mut self, ctx: &CycleContext, frame: &mut CycleFrame) -> Result<()> {
        let mut total = 0.0;
        for tile in frame.grid.tiles() {
            let mut income = tile_income(tile);
            if tile.is_residential() {
                if ctx.crisis.protest_cycles >= 3 {
                    income *= REVOLT_DAMPING;
                } else if ctx.crisis.protest_cycles >= 1 {
                    income *= PROTEST_DAMPING;
                }
            }
            total += income;
        }
        if ctx.crisis.environmental_crisis {
            total *= CRISIS_DAMPING;
        }
        frame.income = total;
        Ok(())
    }
}
