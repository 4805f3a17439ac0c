//! Static terrain layer of the level.

use prairie_burn_core::{cell_index, CellCoord, Direction, LevelLayout, TerrainType};

/// Per-cell terrain fixed when the level is loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainGrid {
    size: u32,
    cells: Vec<TerrainType>,
    prairie_count: usize,
}

impl TerrainGrid {
    /// Builds the terrain layer from a validated level layout.
    #[must_use]
    pub fn from_layout(layout: &LevelLayout) -> Self {
        Self::new(layout.size(), layout.terrain().to_vec())
    }

    /// Creates a terrain layer from a row-major buffer.
    ///
    /// # Panics
    ///
    /// Panics when `size` is zero or `cells` does not hold `size * size` entries.
    #[must_use]
    pub fn new(size: u32, cells: Vec<TerrainType>) -> Self {
        assert!(size > 0, "terrain grids must contain at least one cell");
        let expected = u64::from(size) * u64::from(size);
        assert_eq!(
            cells.len() as u64,
            expected,
            "terrain buffer must cover a {size}x{size} grid"
        );

        let prairie_count = cells
            .iter()
            .filter(|terrain| **terrain == TerrainType::Prairie)
            .count();
        Self {
            size,
            cells,
            prairie_count,
        }
    }

    /// Number of rows and columns.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Row-major terrain buffer.
    #[must_use]
    pub fn cells(&self) -> &[TerrainType] {
        &self.cells
    }

    /// Number of prairie cells.
    #[must_use]
    pub const fn prairie_count(&self) -> usize {
        self.prairie_count
    }

    /// Reports whether `cell` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.size && cell.row() < self.size
    }

    /// Terrain at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn terrain(&self, cell: CellCoord) -> Option<TerrainType> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// In-bounds cardinal neighbours of `cell`.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| cell.neighbor(direction))
            .filter(move |neighbor| self.contains(*neighbor))
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        cell_index(self.size, cell)
    }
}
