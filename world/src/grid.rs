//! Dynamic cell state machine: water decay and fire spread.

use std::collections::BTreeMap;

use prairie_burn_core::{CellCoord, CellState, GridView, RandomSource, Rejection, TerrainType};

use crate::terrain::TerrainGrid;

/// Fire moving from one cell to a neighbour during a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Spread {
    /// Cell that was burning when the step began.
    pub from: CellCoord,
    /// Neighbour that caught fire.
    pub to: CellCoord,
}

/// Everything that changed during one call to [`GridState::advance_time_step`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Wet cells that returned to dry.
    pub dried: Vec<CellCoord>,
    /// Cells that were burning and are now burned.
    pub burned_out: Vec<CellCoord>,
    /// Successful spreads, at most one per burned-out cell.
    pub spread: Vec<Spread>,
}

/// Mutable per-cell state layered over the static terrain.
#[derive(Clone, Debug)]
pub struct GridState {
    terrain: TerrainGrid,
    states: Vec<CellState>,
    wet_elapsed: BTreeMap<CellCoord, u32>,
    burning: Vec<CellCoord>,
    wet_duration: u32,
}

impl GridState {
    /// Creates an all-dry state grid over `terrain`.
    ///
    /// Wet cells dry out after `wet_duration` steps; zero is treated as one.
    #[must_use]
    pub fn new(terrain: TerrainGrid, wet_duration: u32) -> Self {
        let states = vec![CellState::Dry; terrain.cells().len()];
        Self {
            terrain,
            states,
            wet_elapsed: BTreeMap::new(),
            burning: Vec::new(),
            wet_duration: wet_duration.max(1),
        }
    }

    /// Static terrain layer.
    #[must_use]
    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    /// Number of rows and columns.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.terrain.size()
    }

    /// State at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn state(&self, cell: CellCoord) -> Option<CellState> {
        self.terrain
            .index(cell)
            .and_then(|index| self.states.get(index).copied())
    }

    /// Read-only view over both layers.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(self.terrain.cells(), &self.states, self.terrain.size())
    }

    /// Cells burning during the current step, in ignition order.
    #[must_use]
    pub fn burning_cells(&self) -> &[CellCoord] {
        &self.burning
    }

    /// Steps elapsed since `cell` was last watered, if it is tracked as wet.
    #[must_use]
    pub fn wet_elapsed(&self, cell: CellCoord) -> Option<u32> {
        self.wet_elapsed.get(&cell).copied()
    }

    /// Lights `cell`, returning `true` on success.
    pub fn ignite_cell(&mut self, cell: CellCoord) -> bool {
        self.try_ignite(cell).is_ok()
    }

    /// Lights `cell`, reporting why nothing happened on failure.
    ///
    /// Only dry prairie can be ignited. Spreading fire is not bound by terrain.
    pub fn try_ignite(&mut self, cell: CellCoord) -> Result<(), Rejection> {
        let index = self.terrain.index(cell).ok_or(Rejection::OutOfBounds)?;
        if self.terrain.cells()[index] != TerrainType::Prairie {
            return Err(Rejection::NotPrairie);
        }
        if self.states[index] != CellState::Dry {
            return Err(Rejection::NotDry);
        }

        self.states[index] = CellState::Burning;
        self.burning.push(cell);
        Ok(())
    }

    /// Soaks `cell`, returning `true` on success.
    pub fn wet_cell(&mut self, cell: CellCoord) -> bool {
        self.try_wet(cell).is_ok()
    }

    /// Soaks `cell`, reporting why nothing happened on failure.
    ///
    /// Re-watering a wet cell restarts its drying countdown.
    pub fn try_wet(&mut self, cell: CellCoord) -> Result<(), Rejection> {
        let index = self.terrain.index(cell).ok_or(Rejection::OutOfBounds)?;
        if self.states[index].is_consumed() {
            return Err(Rejection::Scorched);
        }

        self.states[index] = CellState::Wet;
        let _ = self.wet_elapsed.insert(cell, 0);
        Ok(())
    }

    /// Advances water decay and fire by one step.
    ///
    /// Every cell burning at the start of the step is burned at the end of it,
    /// and each of them lights at most one dry neighbour, picked by scanning
    /// the neighbours in the order produced by `random`.
    pub fn advance_time_step(&mut self, random: &mut dyn RandomSource) -> StepReport {
        let mut report = StepReport::default();

        let mut expired = Vec::new();
        for (cell, elapsed) in self.wet_elapsed.iter_mut() {
            *elapsed = elapsed.saturating_add(1);
            if *elapsed >= self.wet_duration {
                expired.push(*cell);
            }
        }
        for cell in expired {
            let _ = self.wet_elapsed.remove(&cell);
            if self.state(cell) == Some(CellState::Wet) {
                self.set_state(cell, CellState::Dry);
                report.dried.push(cell);
            }
        }

        let burning = std::mem::take(&mut self.burning);
        let mut ignited = Vec::with_capacity(burning.len());
        let mut candidates = Vec::with_capacity(4);
        for cell in burning {
            self.set_state(cell, CellState::Burned);
            report.burned_out.push(cell);

            candidates.clear();
            candidates.extend(self.terrain.neighbors(cell));
            random.shuffle(&mut candidates);

            let target = candidates
                .iter()
                .copied()
                .find(|neighbor| self.state(*neighbor) == Some(CellState::Dry));
            if let Some(target) = target {
                self.set_state(target, CellState::Burning);
                ignited.push(target);
                report.spread.push(Spread {
                    from: cell,
                    to: target,
                });
            }
        }
        self.burning = ignited;

        report
    }

    /// Reports whether the player may stand on `cell`.
    #[must_use]
    pub fn is_cell_walkable(&self, cell: CellCoord) -> bool {
        self.state(cell)
            .map_or(false, |state| state != CellState::Burning)
    }

    /// Reports whether any cardinal neighbour of `cell` is burning.
    #[must_use]
    pub fn is_fire_adjacent(&self, cell: CellCoord) -> bool {
        self.terrain
            .neighbors(cell)
            .any(|neighbor| self.state(neighbor) == Some(CellState::Burning))
    }

    /// Reports whether every prairie cell is burning or burned.
    #[must_use]
    pub fn is_all_prairie_burned(&self) -> bool {
        self.terrain
            .cells()
            .iter()
            .zip(&self.states)
            .filter(|(terrain, _)| **terrain == TerrainType::Prairie)
            .all(|(_, state)| state.is_consumed())
    }

    /// Reports whether any non-prairie plant is burning or burned.
    #[must_use]
    pub fn is_any_other_plant_burned(&self) -> bool {
        self.terrain
            .cells()
            .iter()
            .zip(&self.states)
            .any(|(terrain, state)| *terrain == TerrainType::OtherPlant && state.is_consumed())
    }

    fn set_state(&mut self, cell: CellCoord, state: CellState) {
        if let Some(index) = self.terrain.index(cell) {
            if let Some(slot) = self.states.get_mut(index) {
                *slot = state;
            }
        }
    }
}
