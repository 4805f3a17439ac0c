#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Prairie Burn adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use prairie_burn_core::{
    CellCoord, CellState, Direction, GamePhase, GridView, PlayerSnapshot, TerrainType,
};
use std::{error::Error, fmt};

/// Solid color used to clear each frame.
pub const CLEAR_COLOR: Color = Color::from_rgb_u8(0, 0, 0);
/// Color of the player's body.
pub const PLAYER_COLOR: Color = Color::from_rgb_u8(0, 0, 255);
/// Color of the dot showing which way the player faces.
pub const INDICATOR_COLOR: Color = Color::from_rgb_u8(255, 255, 0);
/// Color of the HUD status lines.
pub const TEXT_COLOR: Color = Color::from_rgb_u8(255, 255, 255);
/// Color of the win or lose banner.
pub const BANNER_COLOR: Color = Color::from_rgb_u8(255, 0, 0);
/// Color of the outline drawn around each cell.
pub const GRID_LINE_COLOR: Color = Color::from_rgb_u8(0, 0, 0);
/// Colors flickering over burning cells.
pub const FLAME_COLORS: [Color; 4] = [
    Color::from_rgb_u8(255, 0, 0),
    Color::from_rgb_u8(255, 69, 0),
    Color::from_rgb_u8(255, 140, 0),
    Color::from_rgb_u8(255, 165, 0),
];

const EMPTY_COLOR: Color = Color::from_rgb_u8(100, 100, 100);
const PRAIRIE_DRY: Color = Color::from_rgb_u8(210, 180, 140);
const PRAIRIE_WET: Color = Color::from_rgb_u8(150, 130, 100);
const PLANT_DRY: Color = Color::from_rgb_u8(0, 150, 0);
const PLANT_WET: Color = Color::from_rgb_u8(0, 100, 0);
const BURNING_COLOR: Color = Color::from_rgb_u8(255, 0, 0);
const BURNED_COLOR: Color = Color::from_rgb_u8(50, 50, 50);

/// Horizontal margin reserved around the grid, split between both sides.
const HORIZONTAL_MARGIN: f32 = 100.0;
/// Vertical margin reserved around the grid, most of it for the HUD.
const VERTICAL_MARGIN: f32 = 200.0;
/// Downward shift applied to the centred grid so the HUD fits above it.
const HUD_OFFSET: f32 = 50.0;

const PLAYER_SCALE: f32 = 0.8;
const INDICATOR_OFFSET: f32 = 0.3;
const INDICATOR_RADIUS: f32 = 0.2;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Converts the color channels back into bytes, ignoring alpha.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        [
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        ]
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Fill color for a cell with the given terrain and state.
#[must_use]
pub const fn cell_color(terrain: TerrainType, state: CellState) -> Color {
    match (terrain, state) {
        (TerrainType::Empty, _) => EMPTY_COLOR,
        (_, CellState::Burning) => BURNING_COLOR,
        (_, CellState::Burned) => BURNED_COLOR,
        (TerrainType::Prairie, CellState::Dry) => PRAIRIE_DRY,
        (TerrainType::Prairie, CellState::Wet) => PRAIRIE_WET,
        (TerrainType::OtherPlant, CellState::Dry) => PLANT_DRY,
        (TerrainType::OtherPlant, CellState::Wet) => PLANT_WET,
    }
}

/// Picks a flame color for `cell`, varying with `frame` so flames flicker.
#[must_use]
pub fn flame_color(cell: CellCoord, frame: u64) -> Color {
    let mix = u64::from(cell.column())
        .wrapping_mul(31)
        .wrapping_add(u64::from(cell.row()).wrapping_mul(17))
        .wrapping_add(frame);
    FLAME_COLORS[(mix % FLAME_COLORS.len() as u64) as usize]
}

/// Keys adapters can report to the update loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameKey {
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Water key.
    Water,
    /// Fire key.
    Fire,
    /// Start key.
    Start,
    /// Any other key; used to dismiss the end-of-level banner.
    Other,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Key pressed on this frame.
    pub key: Option<FrameKey>,
    /// Whether the turn-in-place modifier was held.
    pub turn_only: bool,
}

/// Square grid laid out in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of rows and columns.
    pub size: u32,
    /// Side length of one cell in screen units.
    pub cell_length: f32,
    /// Screen position of the top-left corner of the grid.
    pub origin: Vec2,
    /// Color used when outlining cells.
    pub line_color: Color,
}

impl GridPresentation {
    /// Fits a `size` by `size` grid into `viewport`, leaving room for the HUD.
    ///
    /// Cell lengths are whole screen units. Returns an error when the grid is
    /// empty or the viewport cannot hold a single unit per cell.
    pub fn fit(size: u32, viewport: Vec2) -> Result<Self, RenderingError> {
        if size == 0 {
            return Err(RenderingError::EmptyGrid);
        }

        let cells = size as f32;
        let cell_length = ((viewport.x - HORIZONTAL_MARGIN) / cells)
            .min((viewport.y - VERTICAL_MARGIN) / cells)
            .floor();
        if cell_length < 1.0 {
            return Err(RenderingError::ViewportTooSmall {
                width: viewport.x,
                height: viewport.y,
                size,
            });
        }

        let extent = cells * cell_length;
        let origin = Vec2::new(
            ((viewport.x - extent) / 2.0).floor(),
            ((viewport.y - extent) / 2.0).floor() + HUD_OFFSET,
        );

        Ok(Self {
            size,
            cell_length,
            origin,
            line_color: GRID_LINE_COLOR,
        })
    }

    /// Width and height of the grid in screen units.
    #[must_use]
    pub fn extent(&self) -> f32 {
        self.size as f32 * self.cell_length
    }

    /// Top-left corner of `cell`, or `None` outside the grid.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Option<Vec2> {
        if cell.column() >= self.size || cell.row() >= self.size {
            return None;
        }
        Some(
            self.origin
                + Vec2::new(cell.column() as f32, cell.row() as f32) * self.cell_length,
        )
    }

    /// Centre of `cell`, or `None` outside the grid.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Option<Vec2> {
        self.cell_origin(cell)
            .map(|origin| origin + Vec2::splat(self.cell_length / 2.0))
    }

    /// Cell under a screen `position`, or `None` when it lies off the grid.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        let local = position - self.origin;
        let extent = self.extent();
        if local.x < 0.0 || local.y < 0.0 || local.x >= extent || local.y >= extent {
            return None;
        }

        let column = (local.x / self.cell_length).floor() as u32;
        let row = (local.y / self.cell_length).floor() as u32;
        Some(CellCoord::new(
            column.min(self.size - 1),
            row.min(self.size - 1),
        ))
    }

    /// Side length of the square drawn for the player.
    #[must_use]
    pub fn player_length(&self) -> f32 {
        (self.cell_length * PLAYER_SCALE).floor()
    }

    /// Centre and radius of the facing indicator for a player on `cell`.
    #[must_use]
    pub fn facing_indicator(&self, cell: CellCoord, facing: Direction) -> Option<(Vec2, f32)> {
        let center = self.cell_center(cell)?;
        let length = self.player_length();
        let offset = match facing {
            Direction::North => Vec2::new(0.0, -1.0),
            Direction::East => Vec2::new(1.0, 0.0),
            Direction::South => Vec2::new(0.0, 1.0),
            Direction::West => Vec2::new(-1.0, 0.0),
        };
        Some((
            center + offset * length * INDICATOR_OFFSET,
            length * INDICATOR_RADIUS,
        ))
    }
}

/// One cell of the scene with its resolved fill color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneCell {
    /// Location of the cell.
    pub cell: CellCoord,
    /// Static terrain.
    pub terrain: TerrainType,
    /// Dynamic state.
    pub state: CellState,
    /// Fill color derived from terrain and state.
    pub color: Color,
}

impl SceneCell {
    /// Creates a scene cell, resolving its color from the palette.
    #[must_use]
    pub const fn new(cell: CellCoord, terrain: TerrainType, state: CellState) -> Self {
        Self {
            cell,
            terrain,
            state,
            color: cell_color(terrain, state),
        }
    }
}

/// Text overlay describing the current phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Status lines drawn from the top of the screen.
    pub lines: Vec<String>,
    /// Centred message shown once the level has ended.
    pub banner: Option<String>,
}

impl HudPresentation {
    /// Builds the overlay for `phase`.
    #[must_use]
    pub fn new(phase: GamePhase, water_remaining: u32, turn: u64) -> Self {
        let lines = match phase {
            GamePhase::Setup => vec![
                format!("Setup Phase: {water_remaining} wet squares remaining"),
                "Arrow keys to move, SHIFT+arrow to turn without moving".to_owned(),
                "W to add water in the direction you face, SPACE to start".to_owned(),
            ],
            GamePhase::Playing | GamePhase::Won | GamePhase::Lost => vec![
                format!("Time Step: {turn}"),
                "Arrow keys to move (advances time), SHIFT+arrow to turn only".to_owned(),
                "W=water, F=fire in the direction you face".to_owned(),
            ],
        };
        let banner = match phase {
            GamePhase::Won => Some("You Win! Press any key to restart".to_owned()),
            GamePhase::Lost => Some("Game Over! Press any key to restart".to_owned()),
            GamePhase::Setup | GamePhase::Playing => None,
        };

        Self { lines, banner }
    }
}

/// Scene description combining the grid, its cells, the player and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Screen layout of the grid.
    pub grid: GridPresentation,
    /// Every cell in row-major order.
    pub cells: Vec<SceneCell>,
    /// Player position and facing.
    pub player: PlayerSnapshot,
    /// Phase the scene was captured in.
    pub phase: GamePhase,
    /// Text overlay.
    pub hud: HudPresentation,
    /// Frames presented so far; drives flame flicker.
    pub frame: u64,
}

impl Scene {
    /// Captures a scene from a grid view and player snapshot.
    #[must_use]
    pub fn new(
        grid: GridPresentation,
        view: GridView<'_>,
        player: PlayerSnapshot,
        phase: GamePhase,
        hud: HudPresentation,
    ) -> Self {
        let cells = view
            .iter()
            .map(|(cell, terrain, state)| SceneCell::new(cell, terrain, state))
            .collect();
        Self {
            grid,
            cells,
            player,
            phase,
            hud,
            frame: 0,
        }
    }

    /// Cells currently on fire.
    pub fn burning(&self) -> impl Iterator<Item = &SceneCell> + '_ {
        self.cells
            .iter()
            .filter(|cell| cell.state == CellState::Burning)
    }

    /// Scene cell at `cell`, if it lies on the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<&SceneCell> {
        let size = self.grid.size;
        if cell.column() >= size || cell.row() >= size {
            return None;
        }
        self.cells
            .get(cell.row() as usize * size as usize + cell.column() as usize)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Prairie Burn scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the input captured for the
    /// frame and may replace the scene before it is presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Grids need at least one cell to be laid out.
    EmptyGrid,
    /// The viewport leaves less than one screen unit per cell.
    ViewportTooSmall {
        /// Viewport width that failed validation.
        width: f32,
        /// Viewport height that failed validation.
        height: f32,
        /// Grid edge length that had to fit.
        size: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must contain at least one cell"),
            Self::ViewportTooSmall {
                width,
                height,
                size,
            } => write!(
                f,
                "viewport {width}x{height} cannot fit a {size}x{size} grid"
            ),
        }
    }
}

impl Error for RenderingError {}
