#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level generation system producing terrain grids and start positions.
//!
//! Levels one to three are hand-authored shapes. Every other level number is
//! generated procedurally: a radius-biased random seeding of prairie around
//! the centre, smoothed by three rounds of majority-rule cellular automata.

use prairie_burn_core::{
    cell_index, CellCoord, LayoutError, LevelLayout, TerrainType, MAX_LEVEL_SIZE,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Edge of the grid for level zero; each level adds one.
const BASE_SIZE: u32 = 10;
const SMOOTHING_ROUNDS: usize = 3;
/// Prairie cells with fewer prairie neighbours than this revert to other plants.
const SURVIVAL_THRESHOLD: usize = 3;
/// Other cells with more prairie neighbours than this become prairie.
const BIRTH_THRESHOLD: usize = 4;

const SQUARE_SIZE: u32 = 7;

const FLOWER_SIZE: u32 = 10;
const FLOWER: [&str; 7] = [
    "  PPP  ",
    " PPPPP ",
    "PPPPPPP",
    "PPPPPPP",
    "PPPPPPP",
    " PPPPP ",
    "  PPP  ",
];

const RING_SIZE: u32 = 15;
const RING: [&str; 13] = [
    "    PPPPP    ",
    "   PPPPPPP   ",
    "  PPPPPPPPP  ",
    " PPPPPPPPPPP ",
    "PPPPPPPPPPPPP",
    "PPPPP   PPPPP",
    "PPPP     PPPP",
    "PPPPP   PPPPP",
    "PPPPPPPPPPPPP",
    " PPPPPPPPPPP ",
    "  PPPPPPPPP  ",
    "   PPPPPPP   ",
    "    PPPPP    ",
];

/// Produces level layouts from level numbers.
#[derive(Debug)]
pub struct Levels {
    rng: ChaCha8Rng,
}

impl Levels {
    /// Creates a generator whose procedural levels derive from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Builds the layout for `number`.
    pub fn layout(&mut self, number: u32) -> Result<LevelLayout, LayoutError> {
        match authored(number) {
            Some(layout) => layout,
            None => procedural(number, &mut self.rng),
        }
    }
}

/// Hand-authored layout for levels one to three.
#[must_use]
pub fn authored(number: u32) -> Option<Result<LevelLayout, LayoutError>> {
    match number {
        1 => Some(square()),
        2 => Some(stamped(FLOWER_SIZE, &FLOWER, |row, column| {
            CellCoord::new(column + 3, row)
        })),
        3 => Some(stamped(RING_SIZE, &RING, |_, column| {
            CellCoord::new(column + 2, RING_SIZE / 2)
        })),
        _ => None,
    }
}

/// Small square of prairie in a sea of other plants.
fn square() -> Result<LevelLayout, LayoutError> {
    let mut terrain = filled(SQUARE_SIZE);
    for row in 2..5 {
        for column in 2..5 {
            set(&mut terrain, SQUARE_SIZE, CellCoord::new(column, row));
        }
    }
    LevelLayout::new(SQUARE_SIZE, terrain, CellCoord::new(2, 2))
}

/// Centres `pattern` in a grid of edge `size`.
///
/// `start` receives the pattern's top-left row and column offsets.
fn stamped<F>(size: u32, pattern: &[&str], start: F) -> Result<LevelLayout, LayoutError>
where
    F: Fn(u32, u32) -> CellCoord,
{
    let height = pattern.len() as u32;
    let width = pattern.first().map_or(0, |row| row.len()) as u32;
    let row_offset = size.saturating_sub(height) / 2;
    let column_offset = size.saturating_sub(width) / 2;

    let mut terrain = filled(size);
    for (row, line) in pattern.iter().enumerate() {
        for (column, glyph) in line.chars().enumerate() {
            if glyph == 'P' {
                let cell = CellCoord::new(column_offset + column as u32, row_offset + row as u32);
                set(&mut terrain, size, cell);
            }
        }
    }

    LevelLayout::new(size, terrain, start(row_offset, column_offset))
}

/// Generates a cellular-automata level for `number`.
///
/// The grid grows by one cell per level and the seeded prairie patch by one
/// cell every two levels. Numbers whose grid would exceed [`MAX_LEVEL_SIZE`]
/// are rejected before anything is allocated.
pub fn procedural<R>(number: u32, rng: &mut R) -> Result<LevelLayout, LayoutError>
where
    R: Rng + ?Sized,
{
    let size = number
        .checked_add(BASE_SIZE)
        .filter(|size| *size <= MAX_LEVEL_SIZE)
        .ok_or(LayoutError::TooLarge {
            size: u64::from(number) + u64::from(BASE_SIZE),
        })?;
    let prairie_size = 5 + number / 2;
    let center = size / 2;
    let radius = prairie_size / 2;

    let mut terrain = filled(size);
    seed_patch(&mut terrain, size, center, radius, rng);
    for _ in 0..SMOOTHING_ROUNDS {
        terrain = smooth(&terrain, size);
    }

    let prairie: Vec<CellCoord> = (0..size)
        .flat_map(|row| (0..size).map(move |column| CellCoord::new(column, row)))
        .filter(|cell| {
            cell_index(size, *cell).map(|index| terrain[index]) == Some(TerrainType::Prairie)
        })
        .collect();

    let start = if prairie.is_empty() {
        let fallback = CellCoord::new(center, center);
        log::debug!("level {number} grew no prairie; forcing {fallback}");
        set(&mut terrain, size, fallback);
        fallback
    } else {
        prairie[rng.gen_range(0..prairie.len())]
    };

    LevelLayout::new(size, terrain, start)
}

fn seed_patch<R>(terrain: &mut [TerrainType], size: u32, center: u32, radius: u32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    if radius == 0 {
        return;
    }

    let low = center.saturating_sub(radius);
    let high = center.saturating_add(radius).min(size - 1);
    for row in low..=high {
        for column in low..=high {
            let cell = CellCoord::new(column, row);
            let distance = cell.manhattan_distance(CellCoord::new(center, center));
            let chance = 0.9 - (f64::from(distance) / f64::from(2 * radius)) * 0.6;
            if rng.gen::<f64>() < chance {
                set(terrain, size, cell);
            }
        }
    }
}

fn smooth(terrain: &[TerrainType], size: u32) -> Vec<TerrainType> {
    let mut next = terrain.to_vec();
    for row in 0..size {
        for column in 0..size {
            let cell = CellCoord::new(column, row);
            let Some(index) = cell_index(size, cell) else {
                continue;
            };
            let neighbors = prairie_neighbors(terrain, size, cell);
            if terrain[index] == TerrainType::Prairie {
                if neighbors < SURVIVAL_THRESHOLD {
                    next[index] = TerrainType::OtherPlant;
                }
            } else if neighbors > BIRTH_THRESHOLD {
                next[index] = TerrainType::Prairie;
            }
        }
    }
    next
}

fn prairie_neighbors(terrain: &[TerrainType], size: u32, cell: CellCoord) -> usize {
    let mut count = 0;
    for row_delta in -1i64..=1 {
        for column_delta in -1i64..=1 {
            if row_delta == 0 && column_delta == 0 {
                continue;
            }
            let row = i64::from(cell.row()) + row_delta;
            let column = i64::from(cell.column()) + column_delta;
            let (Ok(row), Ok(column)) = (u32::try_from(row), u32::try_from(column)) else {
                continue;
            };
            let neighbor = CellCoord::new(column, row);
            if cell_index(size, neighbor).map(|index| terrain[index]) == Some(TerrainType::Prairie)
            {
                count += 1;
            }
        }
    }
    count
}

fn filled(size: u32) -> Vec<TerrainType> {
    vec![TerrainType::OtherPlant; (size as usize) * (size as usize)]
}

fn set(terrain: &mut [TerrainType], size: u32, cell: CellCoord) {
    if let Some(slot) = cell_index(size, cell).and_then(|index| terrain.get_mut(index)) {
        *slot = TerrainType::Prairie;
    }
}
