//! Bookkeeping pass: rolls the per-tile results up into the city averages.

use anyhow::Result;

use crate::world::GRID_SIZE;

use super::{CycleContext, CycleFrame, System};

#[derive(Default)]
pub struct BookkeepingSystem;

impl BookkeepingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl System for BookkeepingSystem {
    fn name(&self) -> &'static str {
        "bookkeeping"
    }

    fn run(&mut self, _ctx: &CycleContext, frame: &mut CycleFrame) -> Result<()> {
        let residential: Vec<f64> = frame
            .grid
            .residential_tiles()
            .map(|t| t.happiness)
            .collect();
        frame.avg_happiness = if residential.is_empty() {
            0
        } else {
            (residential.iter().sum::<f64>() / residential.len() as f64).round() as u32
        };

        let total_pollution: f64 = frame.grid.tiles().map(|t| t.pollution).sum();
        frame.avg_pollution =
            (total_pollution / (GRID_SIZE * GRID_SIZE) as f64).round() as u32;
        Ok(())
    }
}
