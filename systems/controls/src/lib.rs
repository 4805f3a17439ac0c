#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure controls system translating key presses into world commands.

use prairie_burn_core::{Command, Direction, Event, GamePhase, MoveIntent, PlayerAction};

/// Keys understood by the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlKey {
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Pour water on the faced cell.
    Water,
    /// Light the faced cell.
    Fire,
    /// Leave setup and start the fire phase.
    Start,
}

impl ControlKey {
    /// Direction bound to an arrow key.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::North),
            Self::Down => Some(Direction::South),
            Self::Left => Some(Direction::West),
            Self::Right => Some(Direction::East),
            Self::Water | Self::Fire | Self::Start => None,
        }
    }
}

/// Input snapshot distilled from a single adapter key event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    /// Key pressed on this frame, if any.
    pub key: Option<ControlKey>,
    /// Turn in place instead of stepping when an arrow is pressed.
    pub turn_only: bool,
}

impl ControlInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(key: Option<ControlKey>, turn_only: bool) -> Self {
        Self { key, turn_only }
    }

    /// Plain key press without modifiers.
    #[must_use]
    pub const fn key(key: ControlKey) -> Self {
        Self::new(Some(key), false)
    }
}

/// Controls system that tracks the game phase and emits player commands.
#[derive(Clone, Debug)]
pub struct Controls {
    phase: GamePhase,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

impl Controls {
    /// Creates a controls system for a level in setup.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: GamePhase::Setup,
        }
    }

    /// Phase last observed through world events.
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Consumes world events and the latest key press to emit commands.
    pub fn handle(&mut self, events: &[Event], input: ControlInput, out: &mut Vec<Command>) {
        for event in events {
            if let Event::PhaseChanged { phase } = event {
                self.phase = *phase;
            }
        }

        if self.phase.is_terminal() {
            return;
        }

        let Some(key) = input.key else {
            return;
        };

        if let Some(direction) = key.direction() {
            let intent = if input.turn_only {
                MoveIntent::Face(direction)
            } else {
                MoveIntent::Step(direction)
            };
            out.push(Command::PlayerInput {
                movement: Some(intent),
                action: None,
            });
            return;
        }

        match (key, self.phase) {
            (ControlKey::Water, _) => out.push(Command::PlayerInput {
                movement: None,
                action: Some(PlayerAction::Water),
            }),
            (ControlKey::Fire, GamePhase::Playing) => out.push(Command::PlayerInput {
                movement: None,
                action: Some(PlayerAction::Ignite),
            }),
            (ControlKey::Start, GamePhase::Setup) => out.push(Command::BeginPlay),
            _ => {}
        }
    }
}
