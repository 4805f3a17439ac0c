#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Prairie Burn engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing player intent, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing every
//! state transition. Systems consume event streams, query immutable views such
//! as [`GridView`], and respond exclusively with new command batches.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Prairie Burn.";

/// Number of time steps a wet cell stays wet before drying out.
pub const DEFAULT_WET_DURATION: u32 = 10;

/// Largest grid edge a level may have.
pub const MAX_LEVEL_SIZE: u32 = 128;

/// Describes the active phase of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Water cells are being placed before the fire season starts.
    Setup,
    /// The player moves, waters and ignites; movement advances time.
    Playing,
    /// Every prairie cell was consumed by fire.
    Won,
    /// Fire reached a cell that is not prairie.
    Lost,
}

impl GamePhase {
    /// Reports whether the phase ends the level.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Static terrain assigned to a cell when the level is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    /// Bare ground that never appears in the authored levels.
    Empty,
    /// Fuel the player is meant to burn.
    Prairie,
    /// Vegetation that must never catch fire.
    OtherPlant,
}

/// Dynamic moisture and fire state of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Untouched cell that can be ignited or reached by spreading fire.
    Dry,
    /// Watered cell; blocks fire until it dries out again.
    Wet,
    /// Cell on fire during the current step.
    Burning,
    /// Spent cell. Terminal.
    Burned,
}

impl CellState {
    /// Reports whether fire has reached the cell, counting active flames.
    #[must_use]
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Burning | Self::Burned)
    }
}

/// Cardinal directions the player can face and move in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Neighbour enumeration order used for adjacency scans.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell one step away in `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant. The
    /// upper grid bound is the caller's concern.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerSnapshot {
    /// Cell currently occupied by the player.
    pub cell: CellCoord,
    /// Direction the player faces.
    pub facing: Direction,
}

/// Movement half of a player input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveIntent {
    /// Face `direction` and try to step into the adjacent cell.
    Step(Direction),
    /// Face `direction` without moving.
    Face(Direction),
}

impl MoveIntent {
    /// Direction the player faces after the intent is applied.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Step(direction) | Self::Face(direction) => direction,
        }
    }
}

/// Action performed on the cell the player faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Soak the faced cell.
    Water,
    /// Light the faced cell.
    Ignite,
}

/// Reasons an action was turned into a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// The target lies outside the grid.
    OutOfBounds,
    /// Ignition targets must be prairie.
    NotPrairie,
    /// Ignition targets must be dry.
    NotDry,
    /// Burning or burned cells cannot be watered.
    Scorched,
    /// No water placements remain in the setup quota.
    QuotaExhausted,
    /// Setup cannot end while water placements remain.
    QuotaRemaining,
    /// The action is not available in the current phase.
    WrongPhase,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// A single player input event.
    ///
    /// The movement is resolved first, then the action on the faced cell, then
    /// the time step when a step succeeded during play.
    PlayerInput {
        /// Optional move or turn request.
        movement: Option<MoveIntent>,
        /// Optional water or fire action aimed at the faced cell.
        action: Option<PlayerAction>,
    },
    /// Soaks the provided cell.
    WetCell {
        /// Target cell.
        cell: CellCoord,
    },
    /// Sets the provided cell on fire.
    IgniteCell {
        /// Target cell.
        cell: CellCoord,
    },
    /// Ends the setup phase.
    BeginPlay,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Announces that the level entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: GamePhase,
    },
    /// Confirms that the player turned to a new facing.
    PlayerTurned {
        /// Direction the player now faces.
        facing: Direction,
    },
    /// Confirms that the player stepped between two cells.
    PlayerMoved {
        /// Cell occupied before the step.
        from: CellCoord,
        /// Cell occupied after the step.
        to: CellCoord,
    },
    /// Reports that a step was refused by fire or the grid edge.
    PlayerBlocked {
        /// Direction of the refused step.
        direction: Direction,
    },
    /// Reports that the player was pushed away from adjacent flames.
    PlayerRelocated {
        /// Cell occupied before the push.
        from: CellCoord,
        /// Cell occupied after the push.
        to: CellCoord,
    },
    /// Confirms that water was placed on a cell.
    CellWetted {
        /// Cell that became wet.
        cell: CellCoord,
    },
    /// Confirms that a fire was started.
    CellIgnited {
        /// Cell that started burning.
        cell: CellCoord,
    },
    /// Reports the remaining setup water placements.
    WaterQuotaChanged {
        /// Placements left before play may begin.
        remaining: u32,
    },
    /// Reports that an action was a no-op.
    ActionRejected {
        /// Action that was attempted.
        action: PlayerAction,
        /// Targeted cell, when one existed.
        cell: Option<CellCoord>,
        /// Why nothing happened.
        reason: Rejection,
    },
    /// Reports that the setup phase could not end.
    BeginPlayRejected {
        /// Why the phase did not change.
        reason: Rejection,
    },
    /// Indicates that the simulation advanced by one step.
    TimeAdvanced {
        /// Turn counter after the step.
        turn: u64,
    },
    /// Reports that a wet cell dried out.
    WaterEvaporated {
        /// Cell that returned to dry.
        cell: CellCoord,
    },
    /// Reports that a burning cell finished burning.
    CellBurnedOut {
        /// Cell that is now burned.
        cell: CellCoord,
    },
    /// Reports that fire jumped from a burning cell to a neighbour.
    FireSpread {
        /// Cell that was burning at the start of the step.
        from: CellCoord,
        /// Neighbour that caught fire.
        to: CellCoord,
    },
}

/// Source of randomness used by the simulation.
///
/// Fire spread shuffles neighbour candidates and fire evasion picks one safe
/// cell. Tests swap in an order-preserving implementation for determinism.
pub trait RandomSource: fmt::Debug {
    /// Reorders `cells` in place.
    fn shuffle(&mut self, cells: &mut [CellCoord]);

    /// Picks an index in `0..len`. `len` is never zero.
    fn choose_index(&mut self, len: usize) -> usize;
}

/// Errors reported when assembling a [`LevelLayout`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// Grids must contain at least one cell.
    #[error("level size must be positive")]
    ZeroSize,
    /// The grid edge exceeds [`MAX_LEVEL_SIZE`].
    #[error("level size {size} exceeds the limit of {}", MAX_LEVEL_SIZE)]
    TooLarge {
        /// Requested grid edge length.
        size: u64,
    },
    /// The terrain buffer does not cover the square grid.
    #[error("expected {expected} terrain cells, received {actual}")]
    TerrainLength {
        /// Cell count implied by the size.
        expected: usize,
        /// Cell count supplied.
        actual: usize,
    },
    /// The start position lies outside the grid.
    #[error("start position {start} lies outside a {size}x{size} grid")]
    StartOutOfBounds {
        /// Offending start cell.
        start: CellCoord,
        /// Grid edge length.
        size: u32,
    },
    /// The start position is not on prairie.
    #[error("start position {start} is not prairie")]
    StartNotPrairie {
        /// Offending start cell.
        start: CellCoord,
    },
}

/// Terrain and start position for a single level.
///
/// Grids are square. Terrain is stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelLayout {
    size: u32,
    terrain: Vec<TerrainType>,
    start: CellCoord,
}

impl LevelLayout {
    /// Validates and assembles a level layout.
    pub fn new(size: u32, terrain: Vec<TerrainType>, start: CellCoord) -> Result<Self, LayoutError> {
        if size == 0 {
            return Err(LayoutError::ZeroSize);
        }
        if size > MAX_LEVEL_SIZE {
            return Err(LayoutError::TooLarge {
                size: u64::from(size),
            });
        }

        let expected = usize::try_from(u64::from(size) * u64::from(size)).unwrap_or(usize::MAX);
        if terrain.len() != expected {
            return Err(LayoutError::TerrainLength {
                expected,
                actual: terrain.len(),
            });
        }

        if start.column() >= size || start.row() >= size {
            return Err(LayoutError::StartOutOfBounds { start, size });
        }

        let layout = Self {
            size,
            terrain,
            start,
        };
        if layout.terrain_at(start) != Some(TerrainType::Prairie) {
            return Err(LayoutError::StartNotPrairie { start });
        }

        Ok(layout)
    }

    /// Number of rows and columns in the grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Row-major terrain buffer.
    #[must_use]
    pub fn terrain(&self) -> &[TerrainType] {
        &self.terrain
    }

    /// Cell the player starts on.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Terrain at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn terrain_at(&self, cell: CellCoord) -> Option<TerrainType> {
        cell_index(self.size, cell).and_then(|index| self.terrain.get(index).copied())
    }

    /// Number of prairie cells in the layout.
    #[must_use]
    pub fn prairie_count(&self) -> usize {
        self.terrain
            .iter()
            .filter(|terrain| **terrain == TerrainType::Prairie)
            .count()
    }
}

/// Read-only view into the terrain and state grids.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    terrain: &'a [TerrainType],
    states: &'a [CellState],
    size: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new view backed by the provided row-major slices.
    #[must_use]
    pub fn new(terrain: &'a [TerrainType], states: &'a [CellState], size: u32) -> Self {
        Self {
            terrain,
            states,
            size,
        }
    }

    /// Number of rows and columns in the grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Terrain at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn terrain(&self, cell: CellCoord) -> Option<TerrainType> {
        cell_index(self.size, cell).and_then(|index| self.terrain.get(index).copied())
    }

    /// State at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn state(&self, cell: CellCoord) -> Option<CellState> {
        cell_index(self.size, cell).and_then(|index| self.states.get(index).copied())
    }

    /// Iterates every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, TerrainType, CellState)> + 'a {
        let size = self.size;
        self.terrain
            .iter()
            .zip(self.states.iter())
            .enumerate()
            .map(move |(index, (terrain, state))| {
                let index = index as u32;
                (CellCoord::new(index % size, index / size), *terrain, *state)
            })
    }
}

/// Row-major index of `cell` within a square grid of edge `size`.
#[must_use]
pub fn cell_index(size: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() < size && cell.row() < size {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(size).ok()?;
        Some(row * width + column)
    } else {
        None
    }
}
