use ecopolis::{
    catalog::BuildingKind,
    engine::Engine,
    snapshot,
    spatial::TilePos,
    world::GameState,
};
use tempfile::tempdir;

fn place(engine: &mut Engine, kind: BuildingKind, x: u32, y: u32) {
    engine.select_building(Some(kind));
    let outcome = engine.place_building(TilePos::new(x, y));
    assert!(outcome.applied(), "placement of {kind:?} at ({x},{y}) failed");
}

fn played_state() -> GameState {
    let mut engine = Engine::new();
    place(&mut engine, BuildingKind::Road, 5, 5);
    place(&mut engine, BuildingKind::Residential, 5, 6);
    place(&mut engine, BuildingKind::WaterPlant, 4, 5);
    place(&mut engine, BuildingKind::SolarPlant, 6, 5);
    for _ in 0..5 {
        engine.advance_cycle().expect("cycle runs");
    }
    engine.snapshot()
}

#[test]
fn a_played_game_round_trips_through_disk() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("city.json");
    let state = played_state();

    snapshot::save_game(&path, &state).expect("save succeeds");
    let loaded = snapshot::load_game(&path).expect("load succeeds");
    assert_eq!(loaded, state, "every field must survive the round trip");
}

#[test]
fn a_resumed_game_continues_deterministically() {
    let state = played_state();
    let json = serde_json::to_string(&state).expect("encode");
    let restored: GameState = serde_json::from_str(&json).expect("decode");

    let mut original = Engine::from_state(state);
    let mut resumed = Engine::from_state(restored);
    for _ in 0..3 {
        original.advance_cycle().expect("cycle runs");
        resumed.advance_cycle().expect("cycle runs");
    }
    assert_eq!(
        original.state(),
        resumed.state(),
        "a restored snapshot must evolve identically"
    );
}

#[test]
fn absent_save_starts_a_fresh_city() {
    let dir = tempdir().expect("tempdir");
    let state = snapshot::load_or_new(&dir.path().join("never_written.json"));
    assert_eq!(state, GameState::new_game());
    assert_eq!(state.money, 500);
    assert_eq!(state.cycles, 0);
    assert!(state.unlocked_buildings.contains(&BuildingKind::Road));
    assert!(!state.unlocked_buildings.contains(&BuildingKind::EcoDome));
}

#[test]
fn tampered_save_falls_back_to_fresh() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("city.json");
    std::fs::write(&path, "{\"cycle\": 3}").expect("write stub");
    assert_eq!(snapshot::load_or_new(&path), GameState::new_game());
}
