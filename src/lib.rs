pub mod catalog;
pub mod config;
pub mod dependency;
pub mod engine;
pub mod missions;
pub mod preview;
pub mod snapshot;
pub mod spatial;
pub mod systems;
pub mod web;
pub mod world;

pub use catalog::BuildingKind;
pub use engine::{CycleSummary, Engine, PlaceOutcome, RejectReason};
pub use spatial::TilePos;
pub use world::{GameEvent, GameState};
