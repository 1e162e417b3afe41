#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Dynamo.
//!
//! The [`World`] owns the active phase, the maze being played, the player and
//! the random stream every maze is drawn from. It only changes through
//! [`apply`], which executes a single [`Command`] and reports what happened as
//! [`Event`] values. Read access goes through the [`query`] module.

mod player;

use std::time::Duration;

use dynamo_core::{CanvasSize, Command, Event, Level, PhaseKind, CANVAS};
use dynamo_system_maze::{MazeError, MazeLayout};
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use self::player::{MoveOutcome, Player, HOLD_COOLDOWN, SPAWN_POINT, TAP_COOLDOWN};

/// Interval at which the blink flag flips.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Length of the title transition when no other value is configured.
pub const DEFAULT_TRANSITION_TICKS: u32 = 30;

/// Errors that abort the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// A maze could not be constructed for the next level.
    #[error("failed to build maze")]
    Maze(#[from] MazeError),
}

/// Configuration parameters required to construct the world.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    seed: u64,
    transition_ticks: u32,
}

impl Config {
    /// Creates a configuration from a random seed and the title transition
    /// length in ticks. A length of zero skips the transition.
    #[must_use]
    pub const fn new(seed: u64, transition_ticks: u32) -> Self {
        Self {
            seed,
            transition_ticks,
        }
    }

    /// Seed of the random stream shared by every maze in the session.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of ticks the title transition lasts.
    #[must_use]
    pub const fn transition_ticks(&self) -> u32 {
        self.transition_ticks
    }
}

/// Represents the authoritative Dynamo game state.
#[derive(Debug)]
pub struct World {
    canvas: CanvasSize,
    rng: ChaCha8Rng,
    level: Level,
    phase: Phase,
    blink: BlinkClock,
    transition_ticks: u32,
    quit_requested: bool,
}

impl World {
    /// Creates a world sitting on the title screen.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            canvas: CANVAS,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            level: Level::Beginner,
            phase: Phase::Title,
            blink: BlinkClock::new(BLINK_INTERVAL),
            transition_ticks: config.transition_ticks,
            quit_requested: false,
        }
    }

    fn enter_level(&mut self, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
        let layout = MazeLayout::build(&mut self.rng, self.level, self.canvas)?;
        info!(
            "starting {:?} maze ({}x{} cells)",
            self.level,
            layout.maze().size().columns(),
            layout.maze().size().rows()
        );
        self.phase = Phase::Level(LevelState::new(layout));
        out_events.push(Event::PhaseChanged {
            phase: PhaseKind::Level,
        });
        out_events.push(Event::LevelStarted { level: self.level });
        Ok(())
    }

    fn next_level(&mut self, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
        self.level = self.level.next();
        let layout = MazeLayout::build(&mut self.rng, self.level, self.canvas)?;
        info!("advancing to {:?}", self.level);
        self.phase = Phase::Level(LevelState::new(layout));
        out_events.push(Event::LevelStarted { level: self.level });
        Ok(())
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
        match &mut self.phase {
            Phase::Title => Ok(()),
            Phase::TitleTransition { remaining } => {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    self.enter_level(out_events)
                } else {
                    Ok(())
                }
            }
            Phase::Level(state) => {
                if !state.win && state.player.position() == state.layout.exit() {
                    state.win = true;
                    debug!("exit reached on {:?}", self.level);
                    out_events.push(Event::ExitReached { level: self.level });
                }

                if !state.win {
                    state.player.cool_down();
                    return Ok(());
                }

                state.player.walk_off();
                if state.player.position().y() > self.canvas.height() as i32 {
                    self.next_level(out_events)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// A [`Command::Quit`] is reported as [`Event::QuitRequested`]; every command
/// after it is ignored. Errors only arise when a maze cannot be built.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    if world.quit_requested {
        return Ok(());
    }

    match command {
        Command::Quit => {
            world.quit_requested = true;
            info!("quit requested");
            out_events.push(Event::QuitRequested);
            Ok(())
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            for on in world.blink.advance(dt) {
                out_events.push(Event::BlinkToggled { on });
            }
            world.tick(out_events)
        }
        Command::Confirm => {
            if !matches!(world.phase, Phase::Title) {
                return Ok(());
            }
            if world.transition_ticks == 0 {
                return world.enter_level(out_events);
            }
            debug!("title confirmed");
            world.phase = Phase::TitleTransition {
                remaining: world.transition_ticks,
            };
            out_events.push(Event::PhaseChanged {
                phase: PhaseKind::TitleTransition,
            });
            Ok(())
        }
        Command::MovePlayer { direction, tapped } => {
            let Some(state) = world.phase.playing_mut() else {
                return Ok(());
            };
            let torch_was_on = state.player.torch_on();
            let outcome = state
                .player
                .attempt_move(state.layout.bitmap(), direction, tapped);
            match outcome {
                MoveOutcome::Ignored => {}
                MoveOutcome::Blocked => out_events.push(Event::PlayerBlocked {
                    at: state.player.position(),
                    direction,
                }),
                MoveOutcome::Moved { from, to } => {
                    out_events.push(Event::PlayerMoved { from, to });
                }
            }
            if torch_was_on && !state.player.torch_on() {
                out_events.push(Event::TorchToggled { on: false });
            }
            Ok(())
        }
        Command::ToggleTorch => {
            if let Some(state) = world.phase.playing_mut() {
                let on = state.player.toggle_torch();
                out_events.push(Event::TorchToggled { on });
            }
            Ok(())
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Phase, Player, World};
    use dynamo_core::{Level, PhaseKind};
    use dynamo_system_maze::MazeLayout;

    /// Phase the world is currently in.
    #[must_use]
    pub fn phase(world: &World) -> PhaseKind {
        match world.phase {
            Phase::Title => PhaseKind::Title,
            Phase::TitleTransition { .. } => PhaseKind::TitleTransition,
            Phase::Level(_) => PhaseKind::Level,
        }
    }

    /// Current difficulty tier.
    #[must_use]
    pub fn level(world: &World) -> Level {
        world.level
    }

    /// Periodic flag used to blink the player while the torch is lit.
    #[must_use]
    pub fn blink_on(world: &World) -> bool {
        world.blink.on
    }

    /// Time accumulated towards the next blink flip.
    #[must_use]
    pub fn blink_elapsed(world: &World) -> Duration {
        world.blink.elapsed
    }

    /// Player of the running level, if a level is being played.
    #[must_use]
    pub fn player(world: &World) -> Option<&Player> {
        match &world.phase {
            Phase::Level(state) => Some(&state.player),
            _ => None,
        }
    }

    /// Maze of the running level, if a level is being played.
    #[must_use]
    pub fn maze_layout(world: &World) -> Option<&MazeLayout> {
        match &world.phase {
            Phase::Level(state) => Some(&state.layout),
            _ => None,
        }
    }

    /// Whether the player reached the exit and is walking off the screen.
    #[must_use]
    pub fn is_winning(world: &World) -> bool {
        matches!(&world.phase, Phase::Level(state) if state.win)
    }

    /// Fraction of the title transition already played, between 0 and 1.
    #[must_use]
    pub fn transition_progress(world: &World) -> Option<f32> {
        match world.phase {
            Phase::TitleTransition { remaining } => {
                let total = world.transition_ticks.max(1) as f32;
                Some(1.0 - remaining as f32 / total)
            }
            _ => None,
        }
    }

    /// Whether the session was asked to stop.
    #[must_use]
    pub fn quit_requested(world: &World) -> bool {
        world.quit_requested
    }
}

#[derive(Debug)]
enum Phase {
    Title,
    TitleTransition { remaining: u32 },
    Level(LevelState),
}

impl Phase {
    /// Level state that still accepts player input.
    fn playing_mut(&mut self) -> Option<&mut LevelState> {
        match self {
            Self::Level(state) if !state.win => Some(state),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct LevelState {
    layout: MazeLayout,
    player: Player,
    win: bool,
}

impl LevelState {
    fn new(layout: MazeLayout) -> Self {
        Self {
            layout,
            player: Player::new(),
            win: false,
        }
    }
}

#[derive(Debug)]
struct BlinkClock {
    interval: Duration,
    elapsed: Duration,
    on: bool,
}

impl BlinkClock {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            on: true,
        }
    }

    /// Accumulates `dt` and returns the flag value after every flip it caused.
    fn advance(&mut self, dt: Duration) -> Vec<bool> {
        let mut flips = Vec::new();
        if self.interval.is_zero() {
            return flips;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.on = !self.on;
            flips.push(self.on);
        }
        flips
    }
}
