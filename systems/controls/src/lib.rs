#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure controls system translating keyboard state into world commands.

use dynamo_core::{Command, Direction, Key, KeySet, PhaseKind};

/// Movement keys in the order they are polled each tick.
const MOVEMENT_KEYS: [(Key, Direction); 4] = [
    (Key::S, Direction::South),
    (Key::W, Direction::North),
    (Key::A, Direction::West),
    (Key::D, Direction::East),
];

/// Keyboard state observed for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Keys currently held down.
    pub held: KeySet,
    /// Keys that went down since the previous tick.
    pub pressed: KeySet,
}

impl TickInput {
    /// Creates a new snapshot.
    #[must_use]
    pub const fn new(held: KeySet, pressed: KeySet) -> Self {
        Self { held, pressed }
    }

    /// Same snapshot with edge-triggered presses removed, used for catch-up
    /// ticks so a single press is never seen twice.
    #[must_use]
    pub const fn without_presses(self) -> Self {
        Self {
            held: self.held,
            pressed: KeySet::EMPTY,
        }
    }

    fn is_down(&self, key: Key) -> bool {
        self.held.contains(key) || self.pressed.contains(key)
    }
}

/// Pure system that maps keys to commands for the active phase.
#[derive(Debug, Default)]
pub struct Controls;

impl Controls {
    /// Emits the commands requested by `input` while the world is in `phase`.
    ///
    /// Quitting always comes first so it wins over anything else in the batch.
    pub fn handle(&self, input: &TickInput, phase: PhaseKind, out: &mut Vec<Command>) {
        if input.is_down(Key::Escape) || input.is_down(Key::Q) {
            out.push(Command::Quit);
        }

        match phase {
            PhaseKind::Title => {
                if input.pressed.contains(Key::E) {
                    out.push(Command::Confirm);
                }
            }
            PhaseKind::TitleTransition => {}
            PhaseKind::Level => {
                for (key, direction) in MOVEMENT_KEYS {
                    if input.is_down(key) {
                        out.push(Command::MovePlayer {
                            direction,
                            tapped: input.pressed.contains(key),
                        });
                    }
                }

                if input.pressed.contains(Key::E) {
                    out.push(Command::ToggleTorch);
                }
            }
        }
    }
}
