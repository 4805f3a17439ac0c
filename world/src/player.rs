//! The player: position, facing and movement legality.

use prairie_burn_core::{CellCoord, Direction, MoveIntent, PlayerSnapshot, RandomSource};

use crate::grid::GridState;

/// Player avatar walking the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    cell: CellCoord,
    facing: Direction,
}

impl Player {
    /// Places a new player on `cell`, facing east.
    #[must_use]
    pub const fn new(cell: CellCoord) -> Self {
        Self {
            cell,
            facing: Direction::East,
        }
    }

    /// Cell currently occupied.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Direction currently faced.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Immutable copy used by queries.
    #[must_use]
    pub const fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: self.cell,
            facing: self.facing,
        }
    }

    /// Applies a move or turn request.
    ///
    /// The facing always changes. Returns `true` only when the player actually
    /// stepped; turns and steps into fire or off the grid return `false`.
    pub fn attempt_move(&mut self, intent: MoveIntent, grid: &GridState) -> bool {
        self.facing = intent.direction();

        let MoveIntent::Step(direction) = intent else {
            return false;
        };

        let Some(target) = self.cell.neighbor(direction) else {
            return false;
        };

        if !grid.is_cell_walkable(target) {
            return false;
        }

        self.cell = target;
        true
    }

    /// Cell in front of the player, or `None` past the grid edge.
    #[must_use]
    pub fn facing_cell(&self, grid: &GridState) -> Option<CellCoord> {
        self.cell
            .neighbor(self.facing)
            .filter(|cell| grid.terrain().contains(*cell))
    }

    /// Moves to a random walkable neighbour.
    ///
    /// Stays put when every neighbour is burning or off the grid. Returns
    /// `true` when the player moved.
    pub fn relocate_to_random_safe_neighbor(
        &mut self,
        grid: &GridState,
        random: &mut dyn RandomSource,
    ) -> bool {
        let safe: Vec<CellCoord> = grid
            .terrain()
            .neighbors(self.cell)
            .filter(|cell| grid.is_cell_walkable(*cell))
            .collect();
        if safe.is_empty() {
            return false;
        }

        let index = random.choose_index(safe.len());
        self.cell = safe[index.min(safe.len() - 1)];
        true
    }
}
