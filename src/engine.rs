//! The game controller: owns the authoritative [`GameState`] and exposes
//! the only mutation entry points — placement, demolition, selection, and
//! the cycle tick.
//!
//! Rejected actions leave the state untouched and say why. The cycle
//! transition itself is delegated to the ordered systems in
//! [`crate::systems`].

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::catalog::{self, BuildingKind};
use crate::dependency;
use crate::missions::{self, Mission};
use crate::spatial::TilePos;
use crate::systems::{
    AbandonmentSystem, BookkeepingSystem, CycleContext, CycleFrame, HappinessSystem, IncomeSystem,
    PollutionSystem, System,
};
use crate::world::{CrisisState, GameEvent, GameState};

/// Average happiness below this marks a protest cycle.
pub const PROTEST_THRESHOLD: u32 = 40;
/// Average pollution above this raises the environmental crisis.
pub const POLLUTION_CRISIS_THRESHOLD: u32 = 80;
/// Cost multiplier while the environmental crisis is active.
pub const CRISIS_COST_MULTIPLIER: f64 = 1.2;
/// Fraction of the catalog cost refunded on demolition, floored.
pub const DEMOLISH_REFUND: f64 = 0.5;

/// Why an entry point refused to change the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    OutOfBounds,
    NothingSelected,
    TileOccupied,
    EmptyTile,
    EconomicCollapse,
    InsufficientFunds { required: i64 },
}

/// Result of a placement or demolition attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlaceOutcome {
    Applied { events: Vec<GameEvent> },
    Rejected { rejection: RejectReason },
}

impl PlaceOutcome {
    fn rejected(rejection: RejectReason) -> Self {
        PlaceOutcome::Rejected { rejection }
    }

    pub fn applied(&self) -> bool {
        matches!(self, PlaceOutcome::Applied { .. })
    }
}

/// Per-system timing of one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct SystemRunReport {
    pub name: &'static str,
    pub duration_ms: f64,
}

/// Everything external collaborators need to present one finished cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleSummary {
    pub cycle: u64,
    pub income: i64,
    pub avg_happiness: u32,
    pub avg_pollution: u32,
    pub newly_abandoned: Vec<TilePos>,
    pub events: Vec<GameEvent>,
    pub system_reports: Vec<SystemRunReport>,
}

pub struct Engine {
    state: GameState,
    missions: Vec<Mission>,
    systems: Vec<Box<dyn System>>,
}

impl Engine {
    /// Fresh game with the standard campaign.
    pub fn new() -> Self {
        Self::from_state(GameState::new_game())
    }

    /// Resume from a persisted snapshot, standard campaign.
    pub fn from_state(state: GameState) -> Self {
        Self::with_missions(state, missions::campaign())
    }

    pub fn with_missions(state: GameState, missions: Vec<Mission>) -> Self {
        let systems: Vec<Box<dyn System>> = vec![
            Box::new(PollutionSystem::new()),
            Box::new(HappinessSystem::new()),
            Box::new(AbandonmentSystem::new()),
            Box::new(IncomeSystem::new()),
            Box::new(BookkeepingSystem::new()),
        ];
        Self {
            state,
            missions,
            systems,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scenario setup; the entry points below remain the
    /// supported mutation surface.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Cloned snapshot for asynchronous persistence; never blocks the tick.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn current_mission(&self) -> Option<&Mission> {
        missions::current_mission(&self.state, &self.missions)
    }

    pub fn select_building(&mut self, kind: Option<BuildingKind>) {
        self.state.selected_building = kind;
        self.state.demolish_mode = false;
    }

    pub fn toggle_demolish(&mut self) {
        self.state.demolish_mode = !self.state.demolish_mode;
        self.state.selected_building = None;
    }

    /// Catalog cost of `kind` right now, inflated 20% during an
    /// environmental crisis.
    pub fn cost_of(&self, kind: BuildingKind) -> i64 {
        let base = catalog::def(kind).cost;
        if self.state.crisis.environmental_crisis {
            (base as f64 * CRISIS_COST_MULTIPLIER).ceil() as i64
        } else {
            base
        }
    }

    /// Place the selected building at `pos`, or demolish there when
    /// demolish mode is on.
    pub fn place_building(&mut self, pos: TilePos) -> PlaceOutcome {
        if self.state.demolish_mode {
            return self.demolish(pos);
        }
        if !pos.in_bounds() {
            return PlaceOutcome::rejected(RejectReason::OutOfBounds);
        }
        let Some(kind) = self.state.selected_building else {
            return PlaceOutcome::rejected(RejectReason::NothingSelected);
        };
        if self.state.crisis.economic_collapse {
            return PlaceOutcome::rejected(RejectReason::EconomicCollapse);
        }
        if !self.state.grid.tile(pos).is_empty() {
            return PlaceOutcome::rejected(RejectReason::TileOccupied);
        }
        let cost = self.cost_of(kind);
        if self.state.money < cost {
            return PlaceOutcome::rejected(RejectReason::InsufficientFunds { required: cost });
        }

        let tile = self.state.grid.tile_mut(pos);
        tile.building = Some(kind);
        tile.just_placed = true;
        self.state.low_happiness_streaks.reset(pos);
        self.state.grid = dependency::resolve(&self.state.grid);
        self.state.money -= cost;
        debug!(?kind, x = pos.x, y = pos.y, cost, "placed building");
        let events = missions::evaluate(&mut self.state, &self.missions);
        PlaceOutcome::Applied { events }
    }

    /// Clear the tile at `pos` and refund half its catalog cost.
    pub fn demolish(&mut self, pos: TilePos) -> PlaceOutcome {
        if !pos.in_bounds() {
            return PlaceOutcome::rejected(RejectReason::OutOfBounds);
        }
        let Some(kind) = self.state.grid.tile(pos).building else {
            return PlaceOutcome::rejected(RejectReason::EmptyTile);
        };
        let refund = (catalog::def(kind).cost as f64 * DEMOLISH_REFUND).floor() as i64;
        self.state.grid.tile_mut(pos).clear();
        self.state.low_happiness_streaks.reset(pos);
        self.state.grid = dependency::resolve(&self.state.grid);
        self.state.money += refund;
        debug!(?kind, x = pos.x, y = pos.y, refund, "demolished building");
        let events = missions::evaluate(&mut self.state, &self.missions);
        PlaceOutcome::Applied { events }
    }

    /// Run one simulation cycle. Returns `None` once the game is complete;
    /// the state machine is terminal and the tick is a no-op.
    pub fn advance_cycle(&mut self) -> Result<Option<CycleSummary>> {
        if self.state.game_complete {
            return Ok(None);
        }

        self.state.grid.clear_just_placed();
        let ctx = CycleContext {
            cycle: self.state.cycles + 1,
            crisis: self.state.crisis,
        };
        let mut frame = CycleFrame::new(
            self.state.grid.clone(),
            self.state.low_happiness_streaks,
        );

        let mut system_reports = Vec::with_capacity(self.systems.len());
        for system in &mut self.systems {
            let start = Instant::now();
            system.run(&ctx, &mut frame)?;
            system_reports.push(SystemRunReport {
                name: system.name(),
                duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
            });
        }

        let income = frame.income.round() as i64;
        let previous = self.state.crisis;
        let mut crisis = CrisisState {
            protest_cycles: if frame.avg_happiness < PROTEST_THRESHOLD {
                previous.protest_cycles + 1
            } else {
                0
            },
            environmental_crisis: frame.avg_pollution > POLLUTION_CRISIS_THRESHOLD,
            economic_collapse: false,
        };
        let money = self.state.money + income;
        crisis.economic_collapse = money < 0;

        let mut events = crisis_transitions(previous, crisis);
        for &pos in &frame.newly_abandoned {
            events.push(GameEvent::TileAbandoned { pos });
        }

        self.state.grid = frame.grid;
        self.state.low_happiness_streaks = frame.streaks;
        self.state.money = money;
        self.state.cycles += 1;
        self.state.total_income_earned += income;
        self.state.avg_happiness = frame.avg_happiness;
        self.state.avg_pollution = frame.avg_pollution;
        self.state.last_cycle_income = income;
        self.state.crisis = crisis;
        self.state.abandoned_count = frame.abandoned_count;

        events.extend(missions::evaluate(&mut self.state, &self.missions));

        debug!(
            cycle = self.state.cycles,
            income,
            happiness = frame.avg_happiness,
            pollution = frame.avg_pollution,
            "cycle complete"
        );

        Ok(Some(CycleSummary {
            cycle: self.state.cycles,
            income,
            avg_happiness: frame.avg_happiness,
            avg_pollution: frame.avg_pollution,
            newly_abandoned: frame.newly_abandoned,
            events,
            system_reports,
        }))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn crisis_transitions(previous: CrisisState, current: CrisisState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if previous.protest_cycles == 0 && current.protest_cycles > 0 {
        events.push(GameEvent::ProtestStarted);
    }
    if previous.protest_cycles < 3 && current.protest_cycles >= 3 {
        events.push(GameEvent::CitizenRevolt);
    }
    if previous.protest_cycles > 0 && current.protest_cycles == 0 {
        events.push(GameEvent::ProtestEnded);
    }
    if !previous.environmental_crisis && current.environmental_crisis {
        events.push(GameEvent::EnvironmentalCrisisStarted);
    }
    if previous.environmental_crisis && !current.environmental_crisis {
        events.push(GameEvent::EnvironmentalCrisisEnded);
    }
    if !previous.economic_collapse && current.economic_collapse {
        events.push(GameEvent::EconomicCollapseStarted);
    }
    if previous.economic_collapse && !current.economic_collapse {
        events.push(GameEvent::EconomicCollapseEnded);
    }
    events
}
