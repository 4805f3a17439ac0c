#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Prairie Burn experience.

mod logger;
mod rules;
mod session;
mod terminal;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use prairie_burn_rendering::{FrameInput, Presentation, RenderingBackend, Scene, CLEAR_COLOR};
use prairie_burn_rendering_macroquad::{MacroquadBackend, WINDOW_SIZE};
use prairie_burn_world::{query, Config};
use std::{io, path::PathBuf};

use self::{session::Session, terminal::TerminalBackend};

const WINDOW_TITLE: &str = "Prairie Burn";

/// Frontend used to present the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Frontend {
    /// Graphical window.
    Window,
    /// Text rendering with line commands read from stdin.
    Terminal,
}

/// Burn the prairie without setting the rest of the land alight.
#[derive(Debug, Parser)]
#[command(name = "prairie-burn", version, about)]
struct Cli {
    /// Level to play; levels past three are generated.
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Seed for level generation and fire spread.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file overriding the game rules.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Frontend used to present the game.
    #[arg(long, value_enum, default_value_t = Frontend::Window)]
    frontend: Frontend,
    /// Disable ANSI colors in the terminal frontend.
    #[arg(long)]
    plain: bool,
    /// Increase log verbosity; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Entry point for the Prairie Burn command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => rules::load(path)?,
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let mut session = Session::new(cli.level, config, WINDOW_SIZE)?;
    println!("{}", query::welcome_banner(session.world()));
    log::info!("starting level {} with {config:?}", cli.level);

    let presentation = Presentation::new(WINDOW_TITLE, CLEAR_COLOR, session.scene());
    let update = move |input: FrameInput, scene: &mut Scene| {
        session.handle(input);
        *scene = session.scene();
    };

    match cli.frontend {
        Frontend::Window => MacroquadBackend::default().run(presentation, update),
        Frontend::Terminal => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            TerminalBackend::new(stdin.lock(), stdout.lock(), !cli.plain).run(presentation, update)
        }
    }
}
