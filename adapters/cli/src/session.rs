//! Game session wiring the world, the controls system and the scene.

use anyhow::{Context, Result};
use glam::Vec2;
use prairie_burn_core::{Event, LevelLayout};
use prairie_burn_rendering::{FrameInput, FrameKey, GridPresentation, HudPresentation, Scene};
use prairie_burn_system_controls::{ControlInput, ControlKey, Controls};
use prairie_burn_system_levels::Levels;
use prairie_burn_world::{self as world, query, Config, World};

/// Running level plus the state needed to restart it.
#[derive(Debug)]
pub(crate) struct Session {
    layout: LevelLayout,
    config: Config,
    grid: GridPresentation,
    world: World,
    controls: Controls,
    events: Vec<Event>,
}

impl Session {
    /// Builds level `number` and lays it out in a `viewport`-sized screen.
    pub(crate) fn new(number: u32, config: Config, viewport: Vec2) -> Result<Self> {
        let layout = Levels::new(config.rng_seed())
            .layout(number)
            .with_context(|| format!("failed to build level {number}"))?;
        Self::from_layout(layout, config, viewport)
    }

    /// Starts a session on an already built layout.
    pub(crate) fn from_layout(layout: LevelLayout, config: Config, viewport: Vec2) -> Result<Self> {
        let grid = GridPresentation::fit(layout.size(), viewport)
            .context("failed to lay out the level on screen")?;
        let world = World::new(&layout, config);

        Ok(Self {
            layout,
            config,
            grid,
            world,
            controls: Controls::new(),
            events: Vec::new(),
        })
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Feeds one frame of input through the controls system into the world.
    ///
    /// Any key restarts the level once it has been won or lost.
    pub(crate) fn handle(&mut self, input: FrameInput) {
        if query::phase(&self.world).is_terminal() {
            if input.key.is_some() {
                self.restart();
            }
            return;
        }

        let control = ControlInput::new(input.key.and_then(control_key), input.turn_only);
        let mut commands = Vec::new();
        self.controls.handle(&self.events, control, &mut commands);

        self.events.clear();
        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }
        for event in &self.events {
            log::debug!("{event:?}");
        }
    }

    /// Scene describing the current world state.
    pub(crate) fn scene(&self) -> Scene {
        let phase = query::phase(&self.world);
        Scene::new(
            self.grid,
            query::grid_view(&self.world),
            query::player(&self.world),
            phase,
            HudPresentation::new(
                phase,
                query::water_remaining(&self.world),
                query::turn(&self.world),
            ),
        )
    }

    fn restart(&mut self) {
        log::info!("restarting level");
        self.world = World::new(&self.layout, self.config);
        self.controls = Controls::new();
        self.events.clear();
    }
}

fn control_key(key: FrameKey) -> Option<ControlKey> {
    match key {
        FrameKey::Up => Some(ControlKey::Up),
        FrameKey::Down => Some(ControlKey::Down),
        FrameKey::Left => Some(ControlKey::Left),
        FrameKey::Right => Some(ControlKey::Right),
        FrameKey::Water => Some(ControlKey::Water),
        FrameKey::Fire => Some(ControlKey::Fire),
        FrameKey::Start => Some(ControlKey::Start),
        FrameKey::Other => None,
    }
}
