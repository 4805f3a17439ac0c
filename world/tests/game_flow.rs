use prairie_burn_core::{
    CellCoord, CellState, Command, Direction, Event, GamePhase, LevelLayout, MoveIntent,
    PlayerAction, Rejection, TerrainType,
};
use prairie_burn_world::{apply, query, Config, FixedOrder, World};

const P: TerrainType = TerrainType::Prairie;
const O: TerrainType = TerrainType::OtherPlant;

fn world(size: u32, terrain: Vec<TerrainType>, start: CellCoord, divisor: u32) -> World {
    let layout = LevelLayout::new(size, terrain, start).expect("valid layout");
    World::with_random(&layout, Config::new(10, divisor, 0), Box::new(FixedOrder))
}

/// Two prairie cells on the top row above two other plants, player on the left.
fn split_field(divisor: u32) -> World {
    world(2, vec![P, P, O, O], CellCoord::new(0, 0), divisor)
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn step(direction: Direction) -> Command {
    Command::PlayerInput {
        movement: Some(MoveIntent::Step(direction)),
        action: None,
    }
}

fn act(action: PlayerAction) -> Command {
    Command::PlayerInput {
        movement: None,
        action: Some(action),
    }
}

#[test]
fn step_advances_fire_and_evades_it() {
    let mut world = world(5, vec![P; 25], CellCoord::new(0, 0), 0);
    assert_eq!(
        run(&mut world, Command::BeginPlay),
        vec![Event::PhaseChanged {
            phase: GamePhase::Playing
        }]
    );
    assert_eq!(
        run(&mut world, act(PlayerAction::Ignite)),
        vec![Event::CellIgnited {
            cell: CellCoord::new(1, 0)
        }]
    );

    let events = run(&mut world, step(Direction::South));

    assert_eq!(
        events,
        vec![
            Event::PlayerTurned {
                facing: Direction::South
            },
            Event::PlayerMoved {
                from: CellCoord::new(0, 0),
                to: CellCoord::new(0, 1),
            },
            Event::TimeAdvanced { turn: 1 },
            Event::CellBurnedOut {
                cell: CellCoord::new(1, 0)
            },
            Event::FireSpread {
                from: CellCoord::new(1, 0),
                to: CellCoord::new(1, 1),
            },
            Event::PlayerRelocated {
                from: CellCoord::new(0, 1),
                to: CellCoord::new(0, 0),
            },
        ]
    );
    assert_eq!(query::turn(&world), 1);
    assert_eq!(query::phase(&world), GamePhase::Playing);
    assert_eq!(query::burning_cells(&world), &[CellCoord::new(1, 1)]);
}

#[test]
fn blocked_step_keeps_time_still() {
    let mut world = world(3, vec![P; 9], CellCoord::new(1, 1), 0);
    let _ = run(&mut world, Command::BeginPlay);
    let _ = run(
        &mut world,
        Command::IgniteCell {
            cell: CellCoord::new(1, 0),
        },
    );
    assert_eq!(query::player(&world).facing, Direction::East);

    let events = run(&mut world, step(Direction::North));

    assert_eq!(
        events,
        vec![
            Event::PlayerTurned {
                facing: Direction::North
            },
            Event::PlayerBlocked {
                direction: Direction::North
            },
        ]
    );
    assert_eq!(query::player(&world).cell, CellCoord::new(1, 1));
    assert_eq!(query::player(&world).facing, Direction::North);
    assert_eq!(query::turn(&world), 0);
    assert_eq!(
        query::cell_state(&world, CellCoord::new(1, 0)),
        Some(CellState::Burning)
    );
}

#[test]
fn turning_and_acting_never_advance_time() {
    let mut world = world(3, vec![P; 9], CellCoord::new(1, 1), 0);
    let _ = run(&mut world, Command::BeginPlay);

    let events = run(
        &mut world,
        Command::PlayerInput {
            movement: Some(MoveIntent::Face(Direction::North)),
            action: Some(PlayerAction::Ignite),
        },
    );

    assert_eq!(
        events,
        vec![
            Event::PlayerTurned {
                facing: Direction::North
            },
            Event::CellIgnited {
                cell: CellCoord::new(1, 0)
            },
        ]
    );
    assert_eq!(query::turn(&world), 0);
}

#[test]
fn burning_every_prairie_wins() {
    let mut world = split_field(1);
    assert_eq!(query::water_remaining(&world), 2);

    let _ = run(
        &mut world,
        Command::WetCell {
            cell: CellCoord::new(0, 1),
        },
    );
    let events = run(
        &mut world,
        Command::WetCell {
            cell: CellCoord::new(1, 1),
        },
    );
    assert_eq!(
        events,
        vec![
            Event::CellWetted {
                cell: CellCoord::new(1, 1)
            },
            Event::WaterQuotaChanged { remaining: 0 },
        ]
    );

    let _ = run(&mut world, Command::BeginPlay);
    let _ = run(&mut world, act(PlayerAction::Ignite));
    let events = run(&mut world, step(Direction::South));

    assert!(events.contains(&Event::FireSpread {
        from: CellCoord::new(1, 0),
        to: CellCoord::new(0, 0),
    }));
    assert!(events.contains(&Event::PlayerRelocated {
        from: CellCoord::new(0, 1),
        to: CellCoord::new(1, 1),
    }));
    assert_eq!(
        events.last(),
        Some(&Event::PhaseChanged {
            phase: GamePhase::Won
        })
    );
    assert_eq!(query::phase(&world), GamePhase::Won);
}

/// The last prairie and an other plant catch fire on the same step.
#[test]
fn consuming_the_prairie_wins_even_when_other_plants_burn() {
    let mut world = world(
        3,
        vec![P, P, O, O, O, P, O, O, O],
        CellCoord::new(0, 0),
        3,
    );
    let _ = run(
        &mut world,
        Command::WetCell {
            cell: CellCoord::new(1, 1),
        },
    );
    let _ = run(&mut world, Command::BeginPlay);
    for cell in [CellCoord::new(1, 0), CellCoord::new(2, 1)] {
        assert_eq!(
            run(&mut world, Command::IgniteCell { cell }),
            vec![Event::CellIgnited { cell }]
        );
    }

    let events = run(&mut world, step(Direction::South));

    assert!(events.contains(&Event::FireSpread {
        from: CellCoord::new(1, 0),
        to: CellCoord::new(0, 0),
    }));
    assert!(events.contains(&Event::FireSpread {
        from: CellCoord::new(2, 1),
        to: CellCoord::new(2, 0),
    }));
    assert!(events.contains(&Event::PlayerRelocated {
        from: CellCoord::new(0, 1),
        to: CellCoord::new(0, 2),
    }));
    assert_eq!(
        events.last(),
        Some(&Event::PhaseChanged {
            phase: GamePhase::Won
        })
    );
    assert!(query::grid(&world).is_any_other_plant_burned());
    assert!(query::grid(&world).is_all_prairie_burned());
    assert_eq!(query::phase(&world), GamePhase::Won);
}

#[test]
fn burning_other_plants_loses_and_freezes_the_level() {
    let mut world = split_field(0);
    let _ = run(&mut world, Command::BeginPlay);
    let _ = run(&mut world, act(PlayerAction::Ignite));

    let events = run(&mut world, step(Direction::South));

    assert!(events.contains(&Event::FireSpread {
        from: CellCoord::new(1, 0),
        to: CellCoord::new(1, 1),
    }));
    assert_eq!(
        events.last(),
        Some(&Event::PhaseChanged {
            phase: GamePhase::Lost
        })
    );

    assert!(run(&mut world, step(Direction::North)).is_empty());
    assert!(run(&mut world, Command::BeginPlay).is_empty());
    assert_eq!(query::phase(&world), GamePhase::Lost);
    assert_eq!(query::turn(&world), 1);
}

#[test]
fn setup_water_is_rationed() {
    let mut world = world(2, vec![P; 4], CellCoord::new(0, 0), 2);
    assert_eq!(query::water_remaining(&world), 2);

    for remaining in [1, 0] {
        let events = run(&mut world, act(PlayerAction::Water));
        assert_eq!(
            events,
            vec![
                Event::CellWetted {
                    cell: CellCoord::new(1, 0)
                },
                Event::WaterQuotaChanged { remaining },
            ]
        );
    }

    let events = run(&mut world, act(PlayerAction::Water));
    assert_eq!(
        events,
        vec![Event::ActionRejected {
            action: PlayerAction::Water,
            cell: Some(CellCoord::new(1, 0)),
            reason: Rejection::QuotaExhausted,
        }]
    );

    let _ = run(&mut world, Command::BeginPlay);
    let events = run(&mut world, act(PlayerAction::Water));
    assert_eq!(
        events,
        vec![Event::CellWetted {
            cell: CellCoord::new(1, 0)
        }]
    );
    assert_eq!(query::water_remaining(&world), 0);
}

#[test]
fn water_past_the_edge_costs_nothing() {
    let mut world = world(2, vec![P; 4], CellCoord::new(1, 0), 2);
    assert_eq!(query::facing_cell(&world), None);

    let events = run(&mut world, act(PlayerAction::Water));

    assert_eq!(
        events,
        vec![Event::ActionRejected {
            action: PlayerAction::Water,
            cell: None,
            reason: Rejection::OutOfBounds,
        }]
    );
    assert_eq!(query::water_remaining(&world), 2);
}

#[test]
fn setup_forbids_ignition() {
    let mut world = world(2, vec![P; 4], CellCoord::new(0, 0), 0);

    let events = run(
        &mut world,
        Command::IgniteCell {
            cell: CellCoord::new(1, 1),
        },
    );

    assert_eq!(
        events,
        vec![Event::ActionRejected {
            action: PlayerAction::Ignite,
            cell: Some(CellCoord::new(1, 1)),
            reason: Rejection::WrongPhase,
        }]
    );
    assert_eq!(
        query::cell_state(&world, CellCoord::new(1, 1)),
        Some(CellState::Dry)
    );
}

#[test]
fn play_begins_only_once() {
    let mut world = world(2, vec![P; 4], CellCoord::new(0, 0), 0);
    let _ = run(&mut world, Command::BeginPlay);

    assert_eq!(
        run(&mut world, Command::BeginPlay),
        vec![Event::BeginPlayRejected {
            reason: Rejection::WrongPhase
        }]
    );
}

#[test]
fn queries_describe_the_loaded_level() {
    let world = split_field(2);

    assert_eq!(query::grid_size(&world), 2);
    assert_eq!(query::terrain(&world, CellCoord::new(1, 1)), Some(O));
    assert_eq!(query::terrain(&world, CellCoord::new(2, 2)), None);
    assert_eq!(query::player(&world).facing, Direction::East);
    assert_eq!(query::facing_cell(&world), Some(CellCoord::new(1, 0)));
    assert_eq!(query::grid(&world).terrain().prairie_count(), 2);
    assert_eq!(
        query::grid_view(&world)
            .iter()
            .filter(|(_, terrain, state)| *terrain == P && *state == CellState::Dry)
            .count(),
        2
    );
}
