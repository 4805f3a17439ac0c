//! Line-oriented terminal backend.
//!
//! Each input line is one key press. The scene is redrawn after every line,
//! either as plain ASCII or with 24-bit ANSI background colors.

use anyhow::{Context, Result};
use prairie_burn_core::{CellState, Direction, TerrainType};
use prairie_burn_rendering::{
    flame_color, Color, FrameInput, FrameKey, Presentation, RenderingBackend, Scene, SceneCell,
    INDICATOR_COLOR, PLAYER_COLOR,
};
use std::io::{BufRead, Write};

const HELP: &str = "\
keys: u/d/l/r step (prefix t to turn in place, e.g. tu), w water, f fire,
      go start the fire phase, enter continue, q quit, ? help";

/// What a single line of input asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineCommand {
    Press(FrameInput),
    Help,
    Quit,
    Unknown,
}

/// Backend rendering to a text stream and reading commands from a line reader.
#[derive(Debug)]
pub(crate) struct TerminalBackend<R, W> {
    input: R,
    output: W,
    colored: bool,
}

impl<R, W> TerminalBackend<R, W>
where
    R: BufRead,
    W: Write,
{
    pub(crate) fn new(input: R, output: W, colored: bool) -> Self {
        Self {
            input,
            output,
            colored,
        }
    }
}

impl<R, W> RenderingBackend for TerminalBackend<R, W>
where
    R: BufRead,
    W: Write,
{
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            scene,
            ..
        } = presentation;
        let mut scene = scene;
        let mut frame: u64 = 0;

        writeln!(self.output, "{window_title}\n{HELP}").context("failed to write to terminal")?;
        let mut line = String::new();
        loop {
            scene.frame = frame;
            self.output
                .write_all(render(&scene, self.colored).as_bytes())
                .context("failed to write to terminal")?;
            write!(self.output, "> ").context("failed to write to terminal")?;
            self.output.flush().context("failed to flush terminal")?;

            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read command")?;
            if read == 0 {
                break;
            }

            match parse_line(&line) {
                LineCommand::Press(input) => update_scene(input, &mut scene),
                LineCommand::Help => writeln!(self.output, "{HELP}")
                    .context("failed to write to terminal")?,
                LineCommand::Quit => break,
                LineCommand::Unknown => writeln!(self.output, "unknown command; ? for help")
                    .context("failed to write to terminal")?,
            }
            frame = frame.wrapping_add(1);
        }

        Ok(())
    }
}

fn parse_line(line: &str) -> LineCommand {
    let command = line.trim().to_ascii_lowercase();
    let (turn_only, key) = match command.as_str() {
        "" => (false, FrameKey::Other),
        "q" | "quit" | "exit" => return LineCommand::Quit,
        "?" | "h" | "help" => return LineCommand::Help,
        "w" | "water" => (false, FrameKey::Water),
        "f" | "fire" => (false, FrameKey::Fire),
        "go" | "start" | "space" => (false, FrameKey::Start),
        other => {
            let (turn_only, direction) = match other.strip_prefix('t') {
                Some(rest) if !rest.is_empty() => (true, rest.trim()),
                _ => (false, other),
            };
            let key = match direction {
                "u" | "up" => FrameKey::Up,
                "d" | "down" => FrameKey::Down,
                "l" | "left" => FrameKey::Left,
                "r" | "right" => FrameKey::Right,
                _ => return LineCommand::Unknown,
            };
            (turn_only, key)
        }
    };

    LineCommand::Press(FrameInput {
        key: Some(key),
        turn_only,
    })
}

/// Draws the HUD, the grid and the banner of `scene` as text.
fn render(scene: &Scene, colored: bool) -> String {
    let mut text = String::new();
    for line in &scene.hud.lines {
        text.push_str(line);
        text.push('\n');
    }

    let size = scene.grid.size as usize;
    for row in scene.cells.chunks(size.max(1)) {
        for cell in row {
            let is_player = cell.cell == scene.player.cell;
            let glyph = if is_player {
                facing_glyph(scene.player.facing)
            } else {
                cell_glyph(cell)
            };
            if colored {
                let (background, foreground) = if is_player {
                    (PLAYER_COLOR, INDICATOR_COLOR)
                } else if cell.state == CellState::Burning {
                    (cell.color, flame_color(cell.cell, scene.frame))
                } else {
                    (cell.color, cell.color.lighten(0.6))
                };
                push_colored(&mut text, glyph, background, foreground);
            } else {
                text.push(glyph);
                text.push(' ');
            }
        }
        text.push('\n');
    }

    if let Some(banner) = &scene.hud.banner {
        text.push_str(banner);
        text.push('\n');
    }
    text
}

fn push_colored(text: &mut String, glyph: char, background: Color, foreground: Color) {
    let [br, bg, bb] = background.to_rgb_u8();
    let [fr, fg, fb] = foreground.to_rgb_u8();
    text.push_str(&format!(
        "\x1b[48;2;{br};{bg};{bb}m\x1b[38;2;{fr};{fg};{fb}m{glyph} \x1b[0m"
    ));
}

fn cell_glyph(cell: &SceneCell) -> char {
    match (cell.terrain, cell.state) {
        (TerrainType::Empty, _) => ' ',
        (_, CellState::Burning) => '*',
        (_, CellState::Burned) => 'x',
        (_, CellState::Wet) => '~',
        (TerrainType::Prairie, CellState::Dry) => '.',
        (TerrainType::OtherPlant, CellState::Dry) => '#',
    }
}

fn facing_glyph(facing: Direction) -> char {
    match facing {
        Direction::North => '^',
        Direction::East => '>',
        Direction::South => 'v',
        Direction::West => '<',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use prairie_burn_core::{CellCoord, GamePhase, GridView, PlayerSnapshot};
    use prairie_burn_rendering::{GridPresentation, HudPresentation, CLEAR_COLOR};
    use std::io::Cursor;

    fn sample_scene(phase: GamePhase) -> Scene {
        let terrain = [
            TerrainType::Prairie,
            TerrainType::OtherPlant,
            TerrainType::Prairie,
            TerrainType::Empty,
        ];
        let states = [
            CellState::Dry,
            CellState::Wet,
            CellState::Burning,
            CellState::Dry,
        ];
        Scene::new(
            GridPresentation::fit(2, Vec2::new(800.0, 600.0)).expect("grid fits"),
            GridView::new(&terrain, &states, 2),
            PlayerSnapshot {
                cell: CellCoord::new(0, 0),
                facing: Direction::South,
            },
            phase,
            HudPresentation::new(phase, 2, 0),
        )
    }

    #[test]
    fn parses_steps_turns_and_actions() {
        assert_eq!(
            parse_line("u\n"),
            LineCommand::Press(FrameInput {
                key: Some(FrameKey::Up),
                turn_only: false,
            })
        );
        assert_eq!(
            parse_line("TL"),
            LineCommand::Press(FrameInput {
                key: Some(FrameKey::Left),
                turn_only: true,
            })
        );
        assert_eq!(
            parse_line("t right"),
            LineCommand::Press(FrameInput {
                key: Some(FrameKey::Right),
                turn_only: true,
            })
        );
        assert_eq!(
            parse_line("fire"),
            LineCommand::Press(FrameInput {
                key: Some(FrameKey::Fire),
                turn_only: false,
            })
        );
        assert_eq!(
            parse_line(""),
            LineCommand::Press(FrameInput {
                key: Some(FrameKey::Other),
                turn_only: false,
            })
        );
    }

    #[test]
    fn parses_meta_commands() {
        assert_eq!(parse_line("q"), LineCommand::Quit);
        assert_eq!(parse_line("?"), LineCommand::Help);
        assert_eq!(parse_line("dance"), LineCommand::Unknown);
        assert_eq!(parse_line("t"), LineCommand::Unknown);
    }

    #[test]
    fn plain_render_draws_glyphs_row_by_row() {
        let text = render(&sample_scene(GamePhase::Setup), false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Setup Phase: 2 wet squares remaining");
        assert_eq!(lines[3], "v ~ ");
        assert_eq!(lines[4], "*   ");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn colored_render_uses_truecolor_escapes() {
        let text = render(&sample_scene(GamePhase::Playing), true);
        assert!(text.contains("\x1b[48;2;0;0;255m"));
        assert!(text.contains("\x1b[0m"));
    }

    #[test]
    fn banner_follows_the_grid() {
        let text = render(&sample_scene(GamePhase::Won), false);
        assert!(text.ends_with("You Win! Press any key to restart\n"));
    }

    #[test]
    fn run_feeds_lines_until_quit() {
        let scene = sample_scene(GamePhase::Setup);
        let presentation = Presentation::new("Prairie Burn", CLEAR_COLOR, scene);
        let input = Cursor::new("u\nbogus\ntd\nq\nw\n");
        let mut output = Vec::new();
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let recorder = std::rc::Rc::clone(&seen);

        TerminalBackend::new(input, &mut output, false)
            .run(presentation, move |frame, _scene| {
                recorder.borrow_mut().push(frame.key);
            })
            .expect("terminal run succeeds");

        assert_eq!(
            *seen.borrow(),
            vec![Some(FrameKey::Up), Some(FrameKey::Down)]
        );
        let printed = String::from_utf8(output).expect("utf8 output");
        assert!(printed.contains("unknown command"));
    }
}
