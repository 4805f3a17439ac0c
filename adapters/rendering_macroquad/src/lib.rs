#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Prairie Burn.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the dependency is declared without its default `audio`
//! feature.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{get_last_key_pressed, is_key_down, is_key_pressed, KeyCode};
use prairie_burn_core::CellCoord;
use prairie_burn_rendering::{
    flame_color, Color, FrameInput, FrameKey, GridPresentation, Presentation, RenderingBackend,
    Scene, BANNER_COLOR, INDICATOR_COLOR, PLAYER_COLOR, TEXT_COLOR,
};

/// Window size the grid layout is fitted against.
pub const WINDOW_SIZE: Vec2 = Vec2::new(800.0, 600.0);

const FONT_SIZE: f32 = 36.0;
const HUD_LEFT: f32 = 20.0;
const HUD_TOP: f32 = 20.0;
const HUD_LINE_SPACING: f32 = 40.0;
const FLAME_SCALE: f32 = 0.4;
/// Fractional positions of the flame squares inside a burning cell.
const FLAME_OFFSETS: [Vec2; 5] = [
    Vec2::new(0.1, 0.2),
    Vec2::new(0.5, 0.1),
    Vec2::new(0.3, 0.55),
    Vec2::new(0.6, 0.5),
    Vec2::new(0.15, 0.45),
];

/// Keyboard state observed during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyObservation {
    quit_requested: bool,
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    water: bool,
    fire: bool,
    start: bool,
    shift_held: bool,
    any_key: bool,
}

impl KeyObservation {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            up: is_key_pressed(KeyCode::Up),
            down: is_key_pressed(KeyCode::Down),
            left: is_key_pressed(KeyCode::Left),
            right: is_key_pressed(KeyCode::Right),
            water: is_key_pressed(KeyCode::W),
            fire: is_key_pressed(KeyCode::F),
            start: is_key_pressed(KeyCode::Space),
            shift_held: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
            any_key: get_last_key_pressed().is_some(),
        }
    }

    /// Reduces the observation to one key; arrows win over actions.
    fn frame_input(self) -> FrameInput {
        let key = [
            (self.up, FrameKey::Up),
            (self.down, FrameKey::Down),
            (self.left, FrameKey::Left),
            (self.right, FrameKey::Right),
            (self.water, FrameKey::Water),
            (self.fire, FrameKey::Fire),
            (self.start, FrameKey::Start),
            (self.any_key, FrameKey::Other),
        ]
        .into_iter()
        .find_map(|(pressed, key)| pressed.then_some(key));

        FrameInput {
            key,
            turn_only: self.shift_held,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Overrides the swap interval requested from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: WINDOW_SIZE.x as i32,
            window_height: WINDOW_SIZE.y as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = self.swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut frame: u64 = 0;

            loop {
                let keyboard = KeyObservation::poll();
                if keyboard.quit_requested {
                    break;
                }

                update_scene(keyboard.frame_input(), &mut scene);
                scene.frame = frame;

                macroquad::window::clear_background(background);
                draw_cells(&scene);
                draw_flames(&scene);
                draw_player(&scene);
                draw_hud(&scene);

                frame = frame.wrapping_add(1);
                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_cells(scene: &Scene) {
    let grid = scene.grid;
    let line_color = to_macroquad_color(grid.line_color);
    for cell in &scene.cells {
        let Some(origin) = grid.cell_origin(cell.cell) else {
            continue;
        };
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            grid.cell_length,
            grid.cell_length,
            to_macroquad_color(cell.color),
        );
        macroquad::shapes::draw_rectangle_lines(
            origin.x,
            origin.y,
            grid.cell_length,
            grid.cell_length,
            1.0,
            line_color,
        );
    }
}

fn draw_flames(scene: &Scene) {
    for cell in scene.burning() {
        for (position, length, color) in flame_squares(&scene.grid, cell.cell, scene.frame) {
            macroquad::shapes::draw_rectangle(
                position.x,
                position.y,
                length,
                length,
                to_macroquad_color(color),
            );
        }
    }
}

/// Three small squares flickering inside a burning cell.
fn flame_squares(grid: &GridPresentation, cell: CellCoord, frame: u64) -> Vec<(Vec2, f32, Color)> {
    let Some(origin) = grid.cell_origin(cell) else {
        return Vec::new();
    };
    let length = (grid.cell_length * FLAME_SCALE).floor();
    (0..3u64)
        .map(|index| {
            let slot = (frame.wrapping_add(index * 2) % FLAME_OFFSETS.len() as u64) as usize;
            let position = origin + FLAME_OFFSETS[slot] * grid.cell_length;
            (position, length, flame_color(cell, frame.wrapping_add(index)))
        })
        .collect()
}

fn draw_player(scene: &Scene) {
    let grid = scene.grid;
    let Some(origin) = grid.cell_origin(scene.player.cell) else {
        return;
    };
    let length = grid.player_length();
    let inset = ((grid.cell_length - length) / 2.0).floor();
    macroquad::shapes::draw_rectangle(
        origin.x + inset,
        origin.y + inset,
        length,
        length,
        to_macroquad_color(PLAYER_COLOR),
    );

    if let Some((center, radius)) = grid.facing_indicator(scene.player.cell, scene.player.facing) {
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            radius,
            to_macroquad_color(INDICATOR_COLOR),
        );
    }
}

fn draw_hud(scene: &Scene) {
    let text_color = to_macroquad_color(TEXT_COLOR);
    for (index, line) in scene.hud.lines.iter().enumerate() {
        let baseline = HUD_TOP + FONT_SIZE * 0.75 + index as f32 * HUD_LINE_SPACING;
        macroquad::text::draw_text(line, HUD_LEFT, baseline, FONT_SIZE, text_color);
    }

    if let Some(banner) = &scene.hud.banner {
        let dimensions = macroquad::text::measure_text(banner, None, FONT_SIZE as u16, 1.0);
        let x = (macroquad::window::screen_width() - dimensions.width) / 2.0;
        let y = (macroquad::window::screen_height() + dimensions.height) / 2.0;
        macroquad::text::draw_text(banner, x, y, FONT_SIZE, to_macroquad_color(BANNER_COLOR));
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prairie_burn_rendering::FLAME_COLORS;

    #[test]
    fn arrows_take_priority_over_actions() {
        let observation = KeyObservation {
            left: true,
            water: true,
            any_key: true,
            ..KeyObservation::default()
        };

        assert_eq!(
            observation.frame_input(),
            FrameInput {
                key: Some(FrameKey::Left),
                turn_only: false,
            }
        );
    }

    #[test]
    fn shift_requests_turn_only() {
        let observation = KeyObservation {
            down: true,
            shift_held: true,
            any_key: true,
            ..KeyObservation::default()
        };

        let input = observation.frame_input();
        assert_eq!(input.key, Some(FrameKey::Down));
        assert!(input.turn_only);
    }

    #[test]
    fn unbound_keys_still_register() {
        let observation = KeyObservation {
            any_key: true,
            ..KeyObservation::default()
        };
        assert_eq!(observation.frame_input().key, Some(FrameKey::Other));
        assert_eq!(KeyObservation::default().frame_input(), FrameInput::default());
    }

    #[test]
    fn flames_stay_inside_their_cell() {
        let grid = GridPresentation::fit(7, WINDOW_SIZE).expect("grid fits");
        let cell = CellCoord::new(3, 4);
        let origin = grid.cell_origin(cell).expect("cell on grid");

        for frame in 0..10 {
            let squares = flame_squares(&grid, cell, frame);
            assert_eq!(squares.len(), 3);
            for (position, length, color) in squares {
                assert!(position.x >= origin.x && position.y >= origin.y);
                assert!(position.x + length <= origin.x + grid.cell_length);
                assert!(position.y + length <= origin.y + grid.cell_length);
                assert!(FLAME_COLORS.contains(&color));
            }
        }
    }

    #[test]
    fn flames_skip_cells_off_the_grid() {
        let grid = GridPresentation::fit(3, WINDOW_SIZE).expect("grid fits");
        assert!(flame_squares(&grid, CellCoord::new(5, 0), 0).is_empty());
    }
}
