//! Sequential mission campaign and objective evaluation.
//!
//! Missions are attempted strictly in order; only the mission at the
//! current index is evaluated, on every placement, demolition, and cycle.
//! Completion grants the reward, advances the pointer, and past the last
//! mission the state machine is terminal.

use serde::Serialize;

use crate::catalog::{self, BuildingKind};
use crate::spatial;
use crate::world::{GameEvent, GameState, Grid};

/// City-wide metric referenced by maintain objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Happiness,
    Pollution,
    CycleIncome,
}

impl Metric {
    fn value(self, state: &GameState) -> i64 {
        match self {
            Metric::Happiness => state.avg_happiness as i64,
            Metric::Pollution => state.avg_pollution as i64,
            Metric::CycleIncome => state.last_cycle_income,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Metric::Happiness => "happiness",
            Metric::Pollution => "pollution",
            Metric::CycleIncome => "cycle income",
        }
    }
}

/// One-shot structural predicates over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralTarget {
    /// Every residential-class tile is active (and at least one exists).
    AllResidentialActive,
    /// Every non-road building is active.
    AllPowered,
    /// Every non-empty tile is active.
    AllBuildingsActive,
    /// Residential-class tiles with happiness above 75.
    HappyResidentialCount,
    /// Active residential-class tiles.
    TotalResidential,
    /// Every factory has an active recycling center within radius 2.
    AllFactoriesRecycled,
}

/// Condition tracked by a sustain objective across consecutive evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SustainCondition {
    HappinessAtLeast(u32),
    PollutionAtMost(u32),
    IncomeAtLeast(i64),
    AllPowered,
    WindIncomeAtLeast(i64),
    TransitIncomeAtLeast(i64),
    AllHappyAtLeast(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Objective {
    BuildCount { kind: BuildingKind, count: u32 },
    BuildActive { kind: BuildingKind, count: u32 },
    RadiusCoverage { source: BuildingKind, target: BuildingKind, radius: f64, count: u32 },
    MaintainMin { metric: Metric, value: i64 },
    MaintainMax { metric: Metric, value: i64 },
    EarnTotal { total: i64 },
    ReachValue { target: StructuralTarget, count: u32 },
    SustainCycles { condition: SustainCondition, cycles: u32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct Reward {
    pub xp: i64,
    pub money: i64,
    pub unlocks: &'static [BuildingKind],
}

#[derive(Debug, Clone, Serialize)]
pub struct Mission {
    pub id: &'static str,
    pub level_required: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub objectives: Vec<Objective>,
    pub reward: Reward,
}

/// Progress of one objective, for mission panels and hints.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveProgress {
    pub current: i64,
    pub target: i64,
    pub label: String,
}

fn sustain_key(mission_id: &str, index: usize) -> String {
    format!("{mission_id}_{index}")
}

fn non_road_buildings_active(grid: &Grid) -> bool {
    let mut any = false;
    for tile in grid.tiles() {
        match tile.building {
            None | Some(BuildingKind::Road) => continue,
            Some(_) => {
                any = true;
                if !tile.active {
                    return false;
                }
            }
        }
    }
    any
}

fn structural_value(target: StructuralTarget, grid: &Grid) -> i64 {
    match target {
        StructuralTarget::AllResidentialActive => {
            let mut any = false;
            for tile in grid.residential_tiles() {
                any = true;
                if !tile.active {
                    return 0;
                }
            }
            any as i64
        }
        StructuralTarget::AllPowered => non_road_buildings_active(grid) as i64,
        StructuralTarget::AllBuildingsActive => {
            let mut any = false;
            for tile in grid.tiles() {
                if tile.is_empty() {
                    continue;
                }
                any = true;
                if !tile.active {
                    return 0;
                }
            }
            any as i64
        }
        StructuralTarget::HappyResidentialCount => grid
            .residential_tiles()
            .filter(|t| t.happiness > 75.0)
            .count() as i64,
        StructuralTarget::TotalResidential => grid
            .residential_tiles()
            .filter(|t| t.active)
            .count() as i64,
        StructuralTarget::AllFactoriesRecycled => {
            let mut any = false;
            for tile in grid.tiles() {
                if tile.building != Some(BuildingKind::Factory) {
                    continue;
                }
                any = true;
                let recycled = spatial::is_within_radius_of(
                    tile.pos,
                    grid,
                    &[BuildingKind::Recycling],
                    2.0,
                );
                if !recycled {
                    return 0;
                }
            }
            any as i64
        }
    }
}

fn sustain_holds(condition: SustainCondition, state: &GameState) -> bool {
    match condition {
        SustainCondition::HappinessAtLeast(min) => state.avg_happiness >= min,
        SustainCondition::PollutionAtMost(max) => state.avg_pollution <= max,
        SustainCondition::IncomeAtLeast(min) => state.last_cycle_income >= min,
        SustainCondition::AllPowered => non_road_buildings_active(&state.grid),
        SustainCondition::WindIncomeAtLeast(min) => {
            let income = state.grid.count_active(BuildingKind::WindTurbine) as i64
                * catalog::def(BuildingKind::WindTurbine).income;
            income >= min
        }
        SustainCondition::TransitIncomeAtLeast(min) => {
            let income = state.grid.count_active(BuildingKind::Transit) as i64
                * catalog::def(BuildingKind::Transit).income;
            income >= min
        }
        SustainCondition::AllHappyAtLeast(min) => {
            let mut any = false;
            for tile in state.grid.residential_tiles() {
                any = true;
                if tile.happiness < min as f64 {
                    return false;
                }
            }
            any
        }
    }
}

fn radius_coverage_count(
    source: BuildingKind,
    target: BuildingKind,
    radius: f64,
    grid: &Grid,
) -> i64 {
    grid.tiles()
        .filter(|t| t.building == Some(target))
        .filter(|t| spatial::is_within_radius_of(t.pos, grid, &[source], radius))
        .count() as i64
}

/// Evaluate the current mission. Sustain counters are updated for every
/// sustain objective of that mission, whether or not the mission completes.
/// Returns the observable events (mission completion, level up, terminal
/// completion).
pub fn evaluate(state: &mut GameState, missions: &[Mission]) -> Vec<GameEvent> {
    if state.game_complete {
        return Vec::new();
    }
    let Some(mission) = missions.get(state.current_mission_index) else {
        return Vec::new();
    };

    let mut all_met = true;
    for (index, objective) in mission.objectives.iter().enumerate() {
        let met = match objective {
            Objective::SustainCycles { condition, cycles } => {
                let holds = sustain_holds(*condition, state);
                let counter = state
                    .sustain_counters
                    .entry(sustain_key(mission.id, index))
                    .or_insert(0);
                *counter = if holds { *counter + 1 } else { 0 };
                *counter >= *cycles
            }
            Objective::BuildCount { kind, count } => state.grid.count(*kind) >= *count,
            Objective::BuildActive { kind, count } => state.grid.count_active(*kind) >= *count,
            Objective::RadiusCoverage {
                source,
                target,
                radius,
                count,
            } => radius_coverage_count(*source, *target, *radius, &state.grid) >= *count as i64,
            Objective::MaintainMin { metric, value } => metric.value(state) >= *value,
            Objective::MaintainMax { metric, value } => metric.value(state) <= *value,
            Objective::EarnTotal { total } => state.total_income_earned >= *total,
            Objective::ReachValue { target, count } => {
                structural_value(*target, &state.grid) >= *count as i64
            }
        };
        all_met &= met;
    }

    if !all_met {
        return Vec::new();
    }

    let mut events = Vec::new();
    let previous_level = state.level;
    state.xp += mission.reward.xp;
    state.money += mission.reward.money;
    state.unlock(mission.reward.unlocks);
    let level = state.recompute_level();
    state.completed_missions.push(mission.id.to_string());
    tracing::info!(mission = mission.id, xp = state.xp, "mission completed");
    events.push(GameEvent::MissionCompleted {
        id: mission.id.to_string(),
    });
    if level > previous_level {
        tracing::info!(level, "level up");
        events.push(GameEvent::LevelUp { level });
    }

    let was_last = state.current_mission_index + 1 >= missions.len();
    state.current_mission_index += 1;
    if was_last {
        state.game_complete = true;
        events.push(GameEvent::GameCompleted);
    }
    events
}

pub fn current_mission<'a>(state: &GameState, missions: &'a [Mission]) -> Option<&'a Mission> {
    if state.game_complete {
        return None;
    }
    missions.get(state.current_mission_index)
}

/// Progress of `mission.objectives[index]` against the live state. Sustain
/// progress reads the counter of the given mission and objective index.
pub fn objective_progress(mission: &Mission, index: usize, state: &GameState) -> ObjectiveProgress {
    let objective = &mission.objectives[index];
    match objective {
        Objective::BuildCount { kind, count } => {
            let current = state.grid.count(*kind) as i64;
            ObjectiveProgress {
                current,
                target: *count as i64,
                label: format!("Build {}: {}/{}", kind.label(), current, count),
            }
        }
        Objective::BuildActive { kind, count } => {
            let current = state.grid.count_active(*kind) as i64;
            ObjectiveProgress {
                current,
                target: *count as i64,
                label: format!("Active {}: {}/{}", kind.label(), current, count),
            }
        }
        Objective::RadiusCoverage {
            source,
            target,
            radius,
            count,
        } => {
            let current = radius_coverage_count(*source, *target, *radius, &state.grid);
            ObjectiveProgress {
                current,
                target: *count as i64,
                label: format!(
                    "{} covering {}: {}/{}",
                    source.label(),
                    target.label(),
                    current,
                    count
                ),
            }
        }
        Objective::MaintainMin { metric, value } => {
            let current = metric.value(state);
            ObjectiveProgress {
                current,
                target: *value,
                label: format!("{} at least {}: {}", metric.label(), value, current),
            }
        }
        Objective::MaintainMax { metric, value } => {
            let current = metric.value(state);
            ObjectiveProgress {
                current,
                target: *value,
                label: format!("{} at most {}: {}", metric.label(), value, current),
            }
        }
        Objective::EarnTotal { total } => {
            let current = state.total_income_earned.min(*total);
            ObjectiveProgress {
                current,
                target: *total,
                label: format!("Earn ${}/{}", state.total_income_earned, total),
            }
        }
        Objective::ReachValue { target, count } => {
            let current = structural_value(*target, &state.grid);
            let label = match target {
                StructuralTarget::HappyResidentialCount => {
                    format!("Happy homes: {current}/{count}")
                }
                StructuralTarget::TotalResidential => {
                    format!("Active homes: {current}/{count}")
                }
                StructuralTarget::AllResidentialActive => {
                    format!("All homes active: {}", if current >= 1 { "yes" } else { "no" })
                }
                StructuralTarget::AllPowered => {
                    format!("All buildings supplied: {}", if current >= 1 { "yes" } else { "no" })
                }
                StructuralTarget::AllBuildingsActive => {
                    format!("Whole city active: {}", if current >= 1 { "yes" } else { "no" })
                }
                StructuralTarget::AllFactoriesRecycled => {
                    format!("Factories recycled: {}", if current >= 1 { "yes" } else { "no" })
                }
            };
            ObjectiveProgress {
                current,
                target: *count as i64,
                label,
            }
        }
        Objective::SustainCycles { condition, cycles } => {
            let counter = state
                .sustain_counters
                .get(&sustain_key(mission.id, index))
                .copied()
                .unwrap_or(0);
            let what = match condition {
                SustainCondition::HappinessAtLeast(min) => format!("happiness {min}+"),
                SustainCondition::PollutionAtMost(max) => format!("pollution under {max}"),
                SustainCondition::IncomeAtLeast(min) => format!("income {min}+"),
                SustainCondition::AllPowered => "all buildings supplied".to_string(),
                SustainCondition::WindIncomeAtLeast(min) => format!("wind income {min}+"),
                SustainCondition::TransitIncomeAtLeast(min) => format!("transit income {min}+"),
                SustainCondition::AllHappyAtLeast(min) => format!("every home at {min}+"),
            };
            ObjectiveProgress {
                current: counter as i64,
                target: *cycles as i64,
                label: format!("{what}: {counter}/{cycles} cycles"),
            }
        }
    }
}

/// The campaign, in play order. Rewards cross each level threshold with (or
/// before) the mission that unlocks that level's buildings.
pub fn campaign() -> Vec<Mission> {
    vec![
        Mission {
            id: "m01_paving",
            level_required: 1,
            title: "Paving the Way",
            description: "Lay the first streets of the new city.",
            objectives: vec![Objective::BuildCount {
                kind: BuildingKind::Road,
                count: 4,
            }],
            reward: Reward {
                xp: 50,
                money: 100,
                unlocks: &[],
            },
        },
        Mission {
            id: "m02_first_homes",
            level_required: 1,
            title: "First Homes",
            description: "House the first settlers and keep them supplied.",
            objectives: vec![
                Objective::BuildActive {
                    kind: BuildingKind::Residential,
                    count: 2,
                },
                Objective::RadiusCoverage {
                    source: BuildingKind::WaterPlant,
                    target: BuildingKind::Residential,
                    radius: 3.0,
                    count: 2,
                },
            ],
            reward: Reward {
                xp: 60,
                money: 150,
                unlocks: &[BuildingKind::Factory],
            },
        },
        Mission {
            id: "m03_working_city",
            level_required: 2,
            title: "Working City",
            description: "Industry pays the bills.",
            objectives: vec![
                Objective::BuildActive {
                    kind: BuildingKind::Factory,
                    count: 1,
                },
                Objective::MaintainMin {
                    metric: Metric::CycleIncome,
                    value: 40,
                },
            ],
            reward: Reward {
                xp: 80,
                money: 200,
                unlocks: &[],
            },
        },
        Mission {
            id: "m04_growing",
            level_required: 2,
            title: "Growing Population",
            description: "More homes, all of them served.",
            objectives: vec![
                Objective::ReachValue {
                    target: StructuralTarget::TotalResidential,
                    count: 4,
                },
                Objective::ReachValue {
                    target: StructuralTarget::AllResidentialActive,
                    count: 1,
                },
                Objective::EarnTotal { total: 300 },
            ],
            reward: Reward {
                xp: 120,
                money: 150,
                unlocks: &[],
            },
        },
        Mission {
            id: "m05_clean_streets",
            level_required: 3,
            title: "Clean Streets",
            description: "Prosperity is worthless under a smog cloud.",
            objectives: vec![
                Objective::MaintainMax {
                    metric: Metric::Pollution,
                    value: 30,
                },
                Objective::MaintainMin {
                    metric: Metric::Happiness,
                    value: 55,
                },
            ],
            reward: Reward {
                xp: 150,
                money: 200,
                unlocks: &[BuildingKind::Park],
            },
        },
        Mission {
            id: "m06_green_spaces",
            level_required: 4,
            title: "Green Spaces",
            description: "Bring the parks to the people.",
            objectives: vec![
                Objective::BuildActive {
                    kind: BuildingKind::Park,
                    count: 2,
                },
                Objective::RadiusCoverage {
                    source: BuildingKind::Park,
                    target: BuildingKind::Residential,
                    radius: 2.0,
                    count: 3,
                },
            ],
            reward: Reward {
                xp: 250,
                money: 250,
                unlocks: &[BuildingKind::Hospital],
            },
        },
        Mission {
            id: "m07_healthy",
            level_required: 5,
            title: "Healthy Citizens",
            description: "Care for the city and keep spirits high.",
            objectives: vec![
                Objective::BuildActive {
                    kind: BuildingKind::Hospital,
                    count: 1,
                },
                Objective::SustainCycles {
                    condition: SustainCondition::HappinessAtLeast(60),
                    cycles: 3,
                },
            ],
            reward: Reward {
                xp: 350,
                money: 300,
                unlocks: &[BuildingKind::School],
            },
        },
        Mission {
            id: "m08_educated",
            level_required: 6,
            title: "Educated Minds",
            description: "A school, and homes worth coming back to.",
            objectives: vec![
                Objective::BuildActive {
                    kind: BuildingKind::School,
                    count: 1,
                },
                Objective::ReachValue {
                    target: StructuralTarget::HappyResidentialCount,
                    count: 3,
                },
            ],
            reward: Reward {
                xp: 430,
                money: 300,
                unlocks: &[BuildingKind::WindTurbine],
            },
        },
        Mission {
            id: "m09_winds",
            level_required: 7,
            title: "Winds of Change",
            description: "Turn the breeze into steady revenue.",
            objectives: vec![
                Objective::BuildActive {
                    kind: BuildingKind::WindTurbine,
                    count: 2,
                },
                Objective::SustainCycles {
                    condition: SustainCondition::WindIncomeAtLeast(10),
                    cycles: 2,
                },
            ],
            reward: Reward {
                xp: 520,
                money: 350,
                unlocks: &[BuildingKind::Recycling],
            },
        },
        Mission {
            id: "m10_circular",
            level_required: 8,
            title: "Circular Economy",
            description: "Industry stays, the waste does not.",
            objectives: vec![
                Objective::BuildActive {
                    kind: BuildingKind::Recycling,
                    count: 1,
                },
                Objective::ReachValue {
                    target: StructuralTarget::AllFactoriesRecycled,
                    count: 1,
                },
                Objective::MaintainMax {
                    metric: Metric::Pollution,
                    value: 25,
                },
            ],
            reward: Reward {
                xp: 660,
                money: 400,
                unlocks: &[BuildingKind::Transit, BuildingKind::GreenTower],
            },
        },
        Mission {
            id: "m11_metropolis",
            level_required: 9,
            title: "Metropolis",
            description: "Density and motion, without the noise.",
            objectives: vec![
                Objective::BuildActive {
                    kind: BuildingKind::Transit,
                    count: 1,
                },
                Objective::BuildActive {
                    kind: BuildingKind::GreenTower,
                    count: 1,
                },
                Objective::SustainCycles {
                    condition: SustainCondition::TransitIncomeAtLeast(10),
                    cycles: 2,
                },
            ],
            reward: Reward {
                xp: 840,
                money: 500,
                unlocks: &[BuildingKind::EcoDome],
            },
        },
        Mission {
            id: "m12_ecotopia",
            level_required: 10,
            title: "Ecotopia",
            description: "A city that sustains itself, and everyone in it.",
            objectives: vec![
                Objective::BuildActive {
                    kind: BuildingKind::EcoDome,
                    count: 1,
                },
                Objective::ReachValue {
                    target: StructuralTarget::AllBuildingsActive,
                    count: 1,
                },
                Objective::SustainCycles {
                    condition: SustainCondition::AllHappyAtLeast(70),
                    cycles: 3,
                },
                Objective::EarnTotal { total: 3000 },
            ],
            reward: Reward {
                xp: 1000,
                money: 1000,
                unlocks: &[],
            },
        },
    ]
}
