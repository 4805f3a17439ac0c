use prairie_burn_core::{
    CellCoord, CellState, Command, Direction, Event, GamePhase, MoveIntent, PlayerAction,
    Rejection,
};
use prairie_burn_system_controls::{ControlInput, ControlKey, Controls};
use prairie_burn_system_levels::authored;
use prairie_burn_world::{self as world, query, Config, FixedOrder, World};

fn first_level() -> World {
    let layout = authored(1).expect("authored level").expect("valid layout");
    World::with_random(&layout, Config::default(), Box::new(FixedOrder))
}

/// Runs one frame: controls see last frame's events, the world applies the commands.
fn frame(world: &mut World, controls: &mut Controls, events: &mut Vec<Event>, input: ControlInput) {
    let mut commands = Vec::new();
    controls.handle(events, input, &mut commands);
    events.clear();
    for command in commands {
        world::apply(world, command, events);
    }
}

#[test]
fn arrows_step_and_modifier_turns() {
    let mut controls = Controls::new();
    let mut out = Vec::new();

    controls.handle(&[], ControlInput::key(ControlKey::Left), &mut out);
    controls.handle(&[], ControlInput::new(Some(ControlKey::Down), true), &mut out);

    assert_eq!(
        out,
        vec![
            Command::PlayerInput {
                movement: Some(MoveIntent::Step(Direction::West)),
                action: None,
            },
            Command::PlayerInput {
                movement: Some(MoveIntent::Face(Direction::South)),
                action: None,
            },
        ]
    );
}

#[test]
fn fire_is_ignored_during_setup() {
    let mut controls = Controls::new();
    let mut out = Vec::new();

    controls.handle(&[], ControlInput::key(ControlKey::Fire), &mut out);

    assert!(out.is_empty());
}

#[test]
fn start_is_ignored_while_playing() {
    let mut controls = Controls::new();
    let mut out = Vec::new();
    let events = [Event::PhaseChanged {
        phase: GamePhase::Playing,
    }];

    controls.handle(&events, ControlInput::key(ControlKey::Start), &mut out);
    controls.handle(&[], ControlInput::key(ControlKey::Fire), &mut out);

    assert_eq!(
        out,
        vec![Command::PlayerInput {
            movement: None,
            action: Some(PlayerAction::Ignite),
        }]
    );
}

#[test]
fn ended_game_silences_every_key() {
    let mut controls = Controls::new();
    let mut out = Vec::new();
    let events = [Event::PhaseChanged {
        phase: GamePhase::Lost,
    }];

    controls.handle(&events, ControlInput::key(ControlKey::Water), &mut out);
    controls.handle(&[], ControlInput::key(ControlKey::Up), &mut out);

    assert!(out.is_empty());
}

#[test]
fn setup_flow_spends_quota_and_starts_play() {
    let mut world = first_level();
    let mut controls = Controls::new();
    let mut events = Vec::new();
    assert_eq!(query::water_remaining(&world), 4);

    for _ in 0..4 {
        frame(
            &mut world,
            &mut controls,
            &mut events,
            ControlInput::key(ControlKey::Water),
        );
    }
    assert_eq!(query::water_remaining(&world), 0);
    assert_eq!(
        query::cell_state(&world, CellCoord::new(3, 2)),
        Some(CellState::Wet)
    );

    frame(
        &mut world,
        &mut controls,
        &mut events,
        ControlInput::key(ControlKey::Start),
    );
    assert_eq!(query::phase(&world), GamePhase::Playing);
    assert!(events.contains(&Event::PhaseChanged {
        phase: GamePhase::Playing
    }));

    frame(
        &mut world,
        &mut controls,
        &mut events,
        ControlInput::key(ControlKey::Fire),
    );
    assert_eq!(
        events,
        vec![Event::ActionRejected {
            action: PlayerAction::Ignite,
            cell: Some(CellCoord::new(3, 2)),
            reason: Rejection::NotDry,
        }]
    );
    assert_eq!(controls.phase(), GamePhase::Playing);
}

#[test]
fn turning_in_place_keeps_the_clock_still() {
    let mut world = first_level();
    let mut controls = Controls::new();
    let mut events = Vec::new();

    frame(
        &mut world,
        &mut controls,
        &mut events,
        ControlInput::new(Some(ControlKey::Down), true),
    );

    assert_eq!(events, vec![Event::PlayerTurned {
        facing: Direction::South
    }]);
    assert_eq!(query::player(&world).cell, CellCoord::new(2, 2));
    assert_eq!(query::turn(&world), 0);
}
