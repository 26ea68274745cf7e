//! The per-cycle passes, run in fixed order by the engine:
//! pollution -> happiness -> abandonment -> income -> bookkeeping.
//!
//! Each pass reads the previous pass's fully materialized grid; within a
//! pass every tile is evaluated independently.

pub mod abandonment;
pub mod bookkeeping;
pub mod happiness;
pub mod income;
pub mod pollution;

pub use abandonment::AbandonmentSystem;
pub use bookkeeping::BookkeepingSystem;
pub use happiness::HappinessSystem;
pub use income::IncomeSystem;
pub use pollution::PollutionSystem;

use anyhow::Result;

use crate::spatial::TilePos;
use crate::world::{CrisisState, Grid, StreakGrid};

/// Read-only context for one cycle: the crisis flags as they stood when the
/// cycle started. Flags are recomputed from the cycle's results afterwards.
pub struct CycleContext {
    pub cycle: u64,
    pub crisis: CrisisState,
}

/// The working state a cycle's passes accumulate into.
pub struct CycleFrame {
    pub grid: Grid,
    pub streaks: StreakGrid,
    /// Unrounded running income total; the engine rounds once at the end.
    pub income: f64,
    pub newly_abandoned: Vec<TilePos>,
    pub abandoned_count: u32,
    pub avg_happiness: u32,
    pub avg_pollution: u32,
}

impl CycleFrame {
    pub fn new(grid: Grid, streaks: StreakGrid) -> Self {
        Self {
            grid,
            streaks,
            income: 0.0,
            newly_abandoned: Vec::new(),
            abandoned_count: 0,
            avg_happiness: 0,
            avg_pollution: 0,
        }
    }
}

pub trait System: Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&mut self, ctx: &CycleContext, frame: &mut CycleFrame) -> Result<()>;
}

/// Linear radial decay: full magnitude at distance 0, zero past the radius.
pub(crate) fn falloff(magnitude: f64, dist: f64, radius: f64) -> f64 {
    if dist > radius {
        0.0
    } else {
        magnitude * (1.0 - dist / (radius + 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falloff_decays_linearly_and_cuts_off() {
        assert_eq!(falloff(40.0, 0.0, 2.0), 40.0);
        assert!((falloff(40.0, 1.0, 2.0) - 40.0 * (2.0 / 3.0)).abs() < 1e-9);
        assert!((falloff(40.0, 2.0, 2.0) - 40.0 / 3.0).abs() < 1e-9);
        assert_eq!(falloff(40.0, 2.1, 2.0), 0.0);
    }
}
