use ecopolis::{
    catalog::{self, BuildingKind},
    dependency::{self, Requirement},
    engine::{Engine, RejectReason},
    spatial::TilePos,
    world::STARTING_MONEY,
    PlaceOutcome,
};

fn place(engine: &mut Engine, kind: BuildingKind, x: u32, y: u32) -> PlaceOutcome {
    engine.select_building(Some(kind));
    engine.place_building(TilePos::new(x, y))
}

#[test]
fn first_road_costs_ten_and_activates() {
    let mut engine = Engine::new();
    let outcome = place(&mut engine, BuildingKind::Road, 5, 5);
    assert!(outcome.applied());
    assert_eq!(engine.state().money, STARTING_MONEY - 10);
    let tile = engine.state().grid.tile(TilePos::new(5, 5));
    assert!(tile.active, "roads have no prerequisites");
    assert!(tile.road_connected);
    assert!(tile.just_placed);
}

#[test]
fn residential_without_utilities_stays_inactive() {
    let mut engine = Engine::new();
    place(&mut engine, BuildingKind::Road, 5, 5);
    place(&mut engine, BuildingKind::Residential, 5, 6);

    let house = engine.state().grid.tile(TilePos::new(5, 6));
    assert!(!house.active);
    assert!(house.road_connected);

    let report = dependency::check(
        BuildingKind::Residential,
        TilePos::new(5, 6),
        &engine.state().grid,
    );
    assert_eq!(report.missing, vec![Requirement::Water, Requirement::Power]);
}

#[test]
fn utilities_within_range_flip_the_house_active() {
    let mut engine = Engine::new();
    place(&mut engine, BuildingKind::Road, 5, 5);
    place(&mut engine, BuildingKind::Residential, 5, 6);
    place(&mut engine, BuildingKind::WaterPlant, 4, 5);
    place(&mut engine, BuildingKind::SolarPlant, 6, 5);

    let house = engine.state().grid.tile(TilePos::new(5, 6));
    assert!(house.water_supplied);
    assert!(house.powered);
    assert!(house.active);

    // next cycle: base 80 with no amenities or penalties in range
    engine.advance_cycle().expect("cycle runs");
    let house = engine.state().grid.tile(TilePos::new(5, 6));
    assert_eq!(house.happiness, 80.0);
}

#[test]
fn demolition_refunds_half_the_catalog_cost_floored() {
    let mut engine = Engine::new();
    let before = engine.state().money;
    place(&mut engine, BuildingKind::SolarPlant, 3, 3);
    let outcome = engine.demolish(TilePos::new(3, 3));
    assert!(outcome.applied());

    let cost = catalog::def(BuildingKind::SolarPlant).cost;
    let refund = cost / 2;
    assert_eq!(engine.state().money, before - cost + refund);
    assert!(engine.state().grid.tile(TilePos::new(3, 3)).is_empty());
}

#[test]
fn demolish_mode_routes_placement_clicks() {
    let mut engine = Engine::new();
    place(&mut engine, BuildingKind::Road, 2, 2);
    engine.toggle_demolish();
    assert!(engine.state().demolish_mode);
    assert!(engine.state().selected_building.is_none());

    let outcome = engine.place_building(TilePos::new(2, 2));
    assert!(outcome.applied());
    assert!(engine.state().grid.tile(TilePos::new(2, 2)).is_empty());
}

#[test]
fn rejections_leave_the_state_untouched() {
    let mut engine = Engine::new();
    place(&mut engine, BuildingKind::Road, 1, 1);
    let snapshot = engine.snapshot();

    // no selection
    engine.select_building(None);
    let outcome = engine.place_building(TilePos::new(0, 0));
    assert!(matches!(
        outcome,
        PlaceOutcome::Rejected {
            rejection: RejectReason::NothingSelected
        }
    ));

    // occupied tile
    engine.select_building(Some(BuildingKind::Road));
    let outcome = engine.place_building(TilePos::new(1, 1));
    assert!(matches!(
        outcome,
        PlaceOutcome::Rejected {
            rejection: RejectReason::TileOccupied
        }
    ));

    // out of bounds
    let outcome = engine.place_building(TilePos::new(10, 0));
    assert!(matches!(
        outcome,
        PlaceOutcome::Rejected {
            rejection: RejectReason::OutOfBounds
        }
    ));

    // demolishing an empty tile
    let outcome = engine.demolish(TilePos::new(9, 9));
    assert!(matches!(
        outcome,
        PlaceOutcome::Rejected {
            rejection: RejectReason::EmptyTile
        }
    ));

    engine.select_building(None);
    assert_eq!(engine.state().grid, snapshot.grid);
    assert_eq!(engine.state().money, snapshot.money);
}

#[test]
fn insufficient_funds_reports_the_required_amount() {
    let mut engine = Engine::new();
    engine.state_mut().money = 40;
    let outcome = place(&mut engine, BuildingKind::Residential, 0, 0);
    assert!(matches!(
        outcome,
        PlaceOutcome::Rejected {
            rejection: RejectReason::InsufficientFunds { required: 50 }
        }
    ));
    assert_eq!(engine.state().money, 40);
}

#[test]
fn grid_stays_ten_by_ten_through_play() {
    let mut engine = Engine::new();
    place(&mut engine, BuildingKind::Road, 0, 0);
    place(&mut engine, BuildingKind::Road, 9, 9);
    engine.advance_cycle().expect("cycle runs");
    assert_eq!(engine.state().grid.tiles().count(), 100);
    for tile in engine.state().grid.tiles() {
        assert!(tile.pos.in_bounds());
    }
}
