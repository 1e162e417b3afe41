//! Fixed-step driver connecting the render loop to the world.

use std::time::Duration;

use anyhow::{Context, Result};
use dynamo_core::{Command, Event, KeySet, PhaseKind};
use dynamo_rendering::{FrameControl, FrameInput, LevelScene, Scene};
use dynamo_system_controls::{Controls, TickInput};
use dynamo_world::{self as world, query, Config, World};
use log::{debug, trace};

/// Duration of one simulation tick.
pub(crate) const TICK: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Upper bound on ticks simulated for a single rendered frame.
pub(crate) const MAX_TICKS_PER_FRAME: u32 = 5;

/// Owns the world and turns frame deltas into discrete ticks.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    controls: Controls,
    accumulator: Duration,
    pending_presses: KeySet,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Session {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            world: World::new(config),
            controls: Controls,
            accumulator: Duration::ZERO,
            pending_presses: KeySet::EMPTY,
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Simulates every tick that fits into the time elapsed so far.
    ///
    /// Presses are held back until a tick runs, and only that first tick sees
    /// them. Time beyond [`MAX_TICKS_PER_FRAME`] ticks is dropped.
    pub(crate) fn advance(&mut self, frame_dt: Duration, input: FrameInput) -> Result<FrameControl> {
        self.accumulator += frame_dt;
        self.pending_presses = self.pending_presses.union(input.pressed);

        let mut ticks = 0;
        while self.accumulator >= TICK && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= TICK;
            ticks += 1;

            let presses = std::mem::replace(&mut self.pending_presses, KeySet::EMPTY);
            self.step(TickInput::new(input.held, presses))?;
            if query::quit_requested(&self.world) {
                return Ok(FrameControl::Exit);
            }
        }

        if ticks == MAX_TICKS_PER_FRAME && self.accumulator >= TICK {
            trace!("dropping {:?} of simulation backlog", self.accumulator);
            self.accumulator = Duration::ZERO;
        }

        Ok(FrameControl::Continue)
    }

    /// Reads the controls, then applies the tick followed by its commands.
    ///
    /// A quit request replaces the whole batch, so the world does not advance
    /// on the tick that ends the session.
    fn step(&mut self, input: TickInput) -> Result<()> {
        self.controls
            .handle(&input, query::phase(&self.world), &mut self.commands);
        if self.commands.contains(&Command::Quit) {
            self.commands.clear();
            self.commands.push(Command::Quit);
        } else {
            self.commands.insert(0, Command::Tick { dt: TICK });
        }

        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events)
                .with_context(|| format!("failed to apply {command:?}"))?;
        }

        for event in self.events.drain(..) {
            match event {
                Event::TimeAdvanced { .. } | Event::BlinkToggled { .. } => {}
                other => debug!("{other:?}"),
            }
        }
        Ok(())
    }

    /// Describes what the current world state looks like.
    pub(crate) fn scene(&self) -> Scene {
        match query::phase(&self.world) {
            PhaseKind::Title => Scene::Title {
                prompt_visible: query::blink_on(&self.world),
            },
            PhaseKind::TitleTransition => Scene::Transition {
                progress: query::transition_progress(&self.world).unwrap_or(1.0),
            },
            PhaseKind::Level => {
                match (query::maze_layout(&self.world), query::player(&self.world)) {
                    (Some(layout), Some(player)) => Scene::Level(LevelScene {
                        bitmap: layout.bitmap().clone(),
                        offset: layout.offset(),
                        exit: layout.exit(),
                        player: player.position(),
                        torch_on: player.torch_on(),
                        blink_on: query::blink_on(&self.world),
                    }),
                    _ => Scene::Transition { progress: 1.0 },
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn world(&self) -> &World {
        &self.world
    }
}
