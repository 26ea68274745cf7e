//! Abandonment pass: residential tiles stuck below the happiness floor for
//! enough consecutive cycles are abandoned; recovery clears the flag.

use anyhow::Result;

use super::{CycleContext, CycleFrame, System};

/// Happiness below this floor counts toward the abandonment streak.
pub const HAPPINESS_FLOOR: f64 = 25.0;
/// Consecutive low-happiness cycles before a tile is abandoned.
pub const ABANDON_AFTER: u32 = 4;

#[derive(Default)]
pub struct AbandonmentSystem;

impl AbandonmentSystem {
    pub fn new() -> Self {
        Self
    }
}

impl System for AbandonmentSystem {
    fn name(&self) -> &'static str {
        "abandonment"
    }

    fn run(&mut self, _ctx: &CycleContext, frame: &mut CycleFrame) -> Result<()> {
        let streaks = &mut frame.streaks;
        for tile in frame.grid.tiles_mut() {
            if !tile.is_residential() {
                continue;
            }
            if tile.happiness < HAPPINESS_FLOOR {
                let streak = streaks.get(tile.pos) + 1;
                streaks.set(tile.pos, streak);
                if streak >= ABANDON_AFTER {
                    if !tile.abandoned {
                        frame.newly_abandoned.push(tile.pos);
                    }
                    tile.abandoned = true;
                }
            } else {
                streaks.reset(tile.pos);
                tile.abandoned = false;
            }
            if tile.abandoned {
                frame.abandoned_count += 1;
            }
        }
        Ok(())
    }
}
