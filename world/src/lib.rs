#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Prairie Burn.
//!
//! The [`World`] owns the terrain, the cell state machine and the player, and
//! sequences every turn. Adapters and systems mutate it exclusively through
//! [`apply`] and read it through the [`query`] module.

mod grid;
mod player;
mod random;
mod terrain;

pub use grid::{GridState, Spread, StepReport};
pub use player::Player;
pub use random::{FixedOrder, SeededRandom, DEFAULT_SEED};
pub use terrain::TerrainGrid;

use prairie_burn_core::{
    CellCoord, Command, Event, GamePhase, LevelLayout, MoveIntent, PlayerAction, RandomSource,
    Rejection, DEFAULT_WET_DURATION, WELCOME_BANNER,
};

const DEFAULT_WATER_QUOTA_DIVISOR: u32 = 2;

/// Tunable rules applied when a world is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    wet_duration: u32,
    water_quota_divisor: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub const fn new(wet_duration: u32, water_quota_divisor: u32, rng_seed: u64) -> Self {
        Self {
            wet_duration,
            water_quota_divisor,
            rng_seed,
        }
    }

    /// Returns a copy using `rng_seed`.
    #[must_use]
    pub const fn with_seed(self, rng_seed: u64) -> Self {
        Self { rng_seed, ..self }
    }

    /// Steps a watered cell stays wet.
    #[must_use]
    pub const fn wet_duration(&self) -> u32 {
        self.wet_duration
    }

    /// Prairie cells per setup water placement.
    #[must_use]
    pub const fn water_quota_divisor(&self) -> u32 {
        self.water_quota_divisor
    }

    /// Seed for the fire and evasion random source.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_WET_DURATION,
            DEFAULT_WATER_QUOTA_DIVISOR,
            DEFAULT_SEED,
        )
    }
}

/// Represents the authoritative Prairie Burn world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: GridState,
    player: Player,
    phase: GamePhase,
    turn: u64,
    water_remaining: u32,
    random: Box<dyn RandomSource>,
}

impl World {
    /// Creates a world in the setup phase using a seeded random source.
    #[must_use]
    pub fn new(layout: &LevelLayout, config: Config) -> Self {
        Self::with_random(
            layout,
            config,
            Box::new(SeededRandom::from_seed(config.rng_seed())),
        )
    }

    /// Creates a world in the setup phase using the provided random source.
    #[must_use]
    pub fn with_random(
        layout: &LevelLayout,
        config: Config,
        random: Box<dyn RandomSource>,
    ) -> Self {
        let terrain = TerrainGrid::from_layout(layout);
        let prairie = u32::try_from(terrain.prairie_count()).unwrap_or(u32::MAX);
        let water_remaining = prairie
            .checked_div(config.water_quota_divisor())
            .unwrap_or(0);

        log::info!(
            "level loaded: {size}x{size}, {prairie} prairie cells, {water_remaining} water placements",
            size = terrain.size()
        );

        Self {
            banner: WELCOME_BANNER,
            grid: GridState::new(terrain, config.wet_duration()),
            player: Player::new(layout.start()),
            phase: GamePhase::Setup,
            turn: 0,
            water_remaining,
            random,
        }
    }

    fn resolve_movement(&mut self, intent: MoveIntent, out_events: &mut Vec<Event>) -> bool {
        let from = self.player.cell();
        let facing = self.player.facing();
        let moved = self.player.attempt_move(intent, &self.grid);

        if self.player.facing() != facing {
            out_events.push(Event::PlayerTurned {
                facing: self.player.facing(),
            });
        }

        if moved {
            out_events.push(Event::PlayerMoved {
                from,
                to: self.player.cell(),
            });
        } else if let MoveIntent::Step(direction) = intent {
            out_events.push(Event::PlayerBlocked { direction });
        }

        moved
    }

    fn resolve_action(&mut self, action: PlayerAction, out_events: &mut Vec<Event>) {
        let target = self.player.facing_cell(&self.grid);
        match action {
            PlayerAction::Water => self.water(target, out_events),
            PlayerAction::Ignite => self.ignite(target, out_events),
        }
    }

    fn water(&mut self, target: Option<CellCoord>, out_events: &mut Vec<Event>) {
        let result = self.try_water(target);
        report_action(PlayerAction::Water, target, result, out_events);
        if result.is_err() {
            return;
        }

        if self.phase == GamePhase::Setup {
            self.water_remaining = self.water_remaining.saturating_sub(1);
            out_events.push(Event::WaterQuotaChanged {
                remaining: self.water_remaining,
            });
        }
    }

    fn try_water(&mut self, target: Option<CellCoord>) -> Result<CellCoord, Rejection> {
        match self.phase {
            GamePhase::Setup if self.water_remaining == 0 => return Err(Rejection::QuotaExhausted),
            GamePhase::Setup | GamePhase::Playing => {}
            GamePhase::Won | GamePhase::Lost => return Err(Rejection::WrongPhase),
        }
        let cell = target.ok_or(Rejection::OutOfBounds)?;
        self.grid.try_wet(cell).map(|()| cell)
    }

    fn ignite(&mut self, target: Option<CellCoord>, out_events: &mut Vec<Event>) {
        let result = self.try_light(target);
        report_action(PlayerAction::Ignite, target, result, out_events);
    }

    fn try_light(&mut self, target: Option<CellCoord>) -> Result<CellCoord, Rejection> {
        if self.phase != GamePhase::Playing {
            return Err(Rejection::WrongPhase);
        }
        let cell = target.ok_or(Rejection::OutOfBounds)?;
        self.grid.try_ignite(cell).map(|()| cell)
    }

    fn begin_play(&mut self, out_events: &mut Vec<Event>) {
        let rejection = match self.phase {
            GamePhase::Setup if self.water_remaining > 0 => Some(Rejection::QuotaRemaining),
            GamePhase::Setup => None,
            GamePhase::Playing | GamePhase::Won | GamePhase::Lost => Some(Rejection::WrongPhase),
        };

        if let Some(reason) = rejection {
            out_events.push(Event::BeginPlayRejected { reason });
            return;
        }

        self.enter_phase(GamePhase::Playing, out_events);
    }

    fn advance_turn(&mut self, out_events: &mut Vec<Event>) {
        self.turn = self.turn.saturating_add(1);
        out_events.push(Event::TimeAdvanced { turn: self.turn });

        let report = self.grid.advance_time_step(self.random.as_mut());
        log::debug!(
            "turn {}: {} dried, {} burned out, {} spread",
            self.turn,
            report.dried.len(),
            report.burned_out.len(),
            report.spread.len()
        );
        out_events.extend(
            report
                .dried
                .iter()
                .map(|cell| Event::WaterEvaporated { cell: *cell }),
        );
        out_events.extend(
            report
                .burned_out
                .iter()
                .map(|cell| Event::CellBurnedOut { cell: *cell }),
        );
        out_events.extend(report.spread.iter().map(|spread| Event::FireSpread {
            from: spread.from,
            to: spread.to,
        }));

        if self.grid.is_fire_adjacent(self.player.cell()) {
            let from = self.player.cell();
            if self
                .player
                .relocate_to_random_safe_neighbor(&self.grid, self.random.as_mut())
            {
                out_events.push(Event::PlayerRelocated {
                    from,
                    to: self.player.cell(),
                });
            } else {
                log::debug!("player trapped by fire at {from}");
            }
        }

        if self.grid.is_all_prairie_burned() {
            self.enter_phase(GamePhase::Won, out_events);
        } else if self.grid.is_any_other_plant_burned() {
            self.enter_phase(GamePhase::Lost, out_events);
        }
    }

    fn enter_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        log::info!("phase {:?} -> {:?} at turn {}", self.phase, phase, self.turn);
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands are ignored once the level has been won or lost.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.phase.is_terminal() {
        log::trace!("ignoring {command:?} after the level ended");
        return;
    }

    match command {
        Command::PlayerInput { movement, action } => {
            let stepped =
                movement.map_or(false, |intent| world.resolve_movement(intent, out_events));
            if let Some(action) = action {
                world.resolve_action(action, out_events);
            }
            if stepped && world.phase == GamePhase::Playing {
                world.advance_turn(out_events);
            }
        }
        Command::WetCell { cell } => world.water(Some(cell), out_events),
        Command::IgniteCell { cell } => world.ignite(Some(cell), out_events),
        Command::BeginPlay => world.begin_play(out_events),
    }
}

fn report_action(
    action: PlayerAction,
    target: Option<CellCoord>,
    result: Result<CellCoord, Rejection>,
    out_events: &mut Vec<Event>,
) {
    match (action, result) {
        (PlayerAction::Water, Ok(cell)) => out_events.push(Event::CellWetted { cell }),
        (PlayerAction::Ignite, Ok(cell)) => {
            log::debug!("fire started at {cell}");
            out_events.push(Event::CellIgnited { cell });
        }
        (action, Err(reason)) => {
            log::trace!("{action:?} on {target:?} rejected: {reason:?}");
            out_events.push(Event::ActionRejected {
                action,
                cell: target,
                reason,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{GridState, World};
    use prairie_burn_core::{
        CellCoord, CellState, GamePhase, GridView, PlayerSnapshot, TerrainType,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the cell state machine.
    #[must_use]
    pub fn grid(world: &World) -> &GridState {
        &world.grid
    }

    /// Captures a read-only view of terrain and cell states.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Number of rows and columns in the level.
    #[must_use]
    pub fn grid_size(world: &World) -> u32 {
        world.grid.size()
    }

    /// Terrain at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn terrain(world: &World, cell: CellCoord) -> Option<TerrainType> {
        world.grid.terrain().terrain(cell)
    }

    /// State at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn cell_state(world: &World, cell: CellCoord) -> Option<CellState> {
        world.grid.state(cell)
    }

    /// Cells burning during the current step.
    #[must_use]
    pub fn burning_cells(world: &World) -> &[CellCoord] {
        world.grid.burning_cells()
    }

    /// Player position and facing.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Cell in front of the player, if it lies on the grid.
    #[must_use]
    pub fn facing_cell(world: &World) -> Option<CellCoord> {
        world.player.facing_cell(&world.grid)
    }

    /// Active phase of the level.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Number of steps taken since play began.
    #[must_use]
    pub fn turn(world: &World) -> u64 {
        world.turn
    }

    /// Water placements left in the setup quota.
    #[must_use]
    pub fn water_remaining(world: &World) -> u32 {
        world.water_remaining
    }
}
