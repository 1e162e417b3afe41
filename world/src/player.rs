//! Player controller: position, torch and the movement cooldown.

use dynamo_core::{Direction, OccupancyBitmap, Point};

/// Cooldown applied after a step committed from a fresh key press.
pub const TAP_COOLDOWN: u32 = 15;

/// Cooldown applied after a step committed from a held key.
pub const HOLD_COOLDOWN: u32 = 2;

/// Pixel every player starts on; `(0, 0)` is always a wall.
pub const SPAWN_POINT: Point = Point::new(1, 1);

/// Result of a single movement attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The request was throttled by the cooldown or the arming latch.
    Ignored,
    /// The target pixel is a wall; the player stayed put.
    Blocked,
    /// The player stepped between two pixels.
    Moved {
        /// Position before the step.
        from: Point,
        /// Position after the step.
        to: Point,
    },
}

/// The single pixel the player steers through the maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    position: Point,
    torch_on: bool,
    step: u32,
    moved: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Creates a player at the spawn point with the torch lit so the maze is
    /// visible before the first move.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position: SPAWN_POINT,
            torch_on: true,
            step: 0,
            moved: false,
        }
    }

    /// Current position in bitmap coordinates.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Whether the maze is currently drawn.
    #[must_use]
    pub const fn torch_on(&self) -> bool {
        self.torch_on
    }

    /// Ticks left before a held key may move the player again.
    #[must_use]
    pub const fn step(&self) -> u32 {
        self.step
    }

    /// Whether a fresh press has armed movement for this level.
    #[must_use]
    pub const fn moved(&self) -> bool {
        self.moved
    }

    /// Tries to step one pixel in `direction`.
    ///
    /// Held keys wait for the cooldown to expire while a fresh tap always goes
    /// through. The first move of a level needs a tap, so a key still held
    /// from the previous level does nothing until it is pressed again. Every
    /// attempt that gets past those gates puts the torch out, legal or not.
    pub fn attempt_move(
        &mut self,
        bitmap: &OccupancyBitmap,
        direction: Direction,
        tapped: bool,
    ) -> MoveOutcome {
        if self.step > 0 && !tapped {
            return MoveOutcome::Ignored;
        }

        if !self.moved {
            if !tapped {
                return MoveOutcome::Ignored;
            }
            self.moved = true;
        }

        self.torch_on = false;

        let target = self.position.step(direction);
        if !bitmap.is_open(target) {
            return MoveOutcome::Blocked;
        }

        let from = self.position;
        self.position = target;
        self.step = if tapped { TAP_COOLDOWN } else { HOLD_COOLDOWN };
        MoveOutcome::Moved { from, to: target }
    }

    /// Counts the movement cooldown down by one tick.
    pub fn cool_down(&mut self) {
        self.step = self.step.saturating_sub(1);
    }

    /// Flips the torch and returns its new state.
    pub fn toggle_torch(&mut self) -> bool {
        self.torch_on = !self.torch_on;
        self.torch_on
    }

    #[cfg(test)]
    pub(crate) fn set_step(&mut self, step: u32) {
        self.step = step;
    }

    /// Scripted exit animation: one pixel down, walls ignored.
    pub(crate) fn walk_off(&mut self) {
        self.position = self.position.step(Direction::South);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynamo_core::Tile;

    /// Open corridor along row 1 from x = 1 to x = 3, walls elsewhere.
    fn corridor() -> OccupancyBitmap {
        let mut bitmap = OccupancyBitmap::walled(5, 3);
        for x in 1..=3 {
            bitmap.set(Point::new(x, 1), Tile::Open);
        }
        bitmap
    }

    fn armed() -> Player {
        let mut player = Player::new();
        player.moved = true;
        player
    }

    #[test]
    fn held_key_does_not_arm_movement() {
        let bitmap = corridor();
        let mut player = Player::new();

        assert_eq!(
            player.attempt_move(&bitmap, Direction::East, false),
            MoveOutcome::Ignored
        );
        assert!(!player.moved());
        assert!(player.torch_on());
        assert_eq!(player.position(), SPAWN_POINT);

        assert_eq!(
            player.attempt_move(&bitmap, Direction::East, true),
            MoveOutcome::Moved {
                from: Point::new(1, 1),
                to: Point::new(2, 1),
            }
        );
        assert!(player.moved());
        assert_eq!(player.step(), TAP_COOLDOWN);
    }

    #[test]
    fn wall_blocks_but_still_puts_out_torch() {
        let bitmap = corridor();
        let mut player = Player::new();

        assert_eq!(
            player.attempt_move(&bitmap, Direction::North, true),
            MoveOutcome::Blocked
        );
        assert_eq!(player.position(), SPAWN_POINT);
        assert!(!player.torch_on());
        assert_eq!(player.step(), 0);
    }

    #[test]
    fn blocked_move_keeps_running_cooldown() {
        let bitmap = corridor();
        let mut player = armed();
        assert!(matches!(
            player.attempt_move(&bitmap, Direction::East, true),
            MoveOutcome::Moved { .. }
        ));
        player.cool_down();

        assert_eq!(
            player.attempt_move(&bitmap, Direction::South, true),
            MoveOutcome::Blocked
        );
        assert_eq!(player.step(), TAP_COOLDOWN - 1);
    }

    #[test]
    fn held_move_uses_short_cooldown() {
        let bitmap = corridor();
        let mut player = armed();

        assert!(matches!(
            player.attempt_move(&bitmap, Direction::East, false),
            MoveOutcome::Moved { .. }
        ));
        assert_eq!(player.step(), HOLD_COOLDOWN);
    }

    #[test]
    fn held_key_waits_out_cooldown_while_tap_bypasses_it() {
        let bitmap = corridor();
        let mut player = armed();
        let _ = player.attempt_move(&bitmap, Direction::East, false);

        player.cool_down();
        assert_eq!(
            player.attempt_move(&bitmap, Direction::East, false),
            MoveOutcome::Ignored
        );
        assert_eq!(
            player.attempt_move(&bitmap, Direction::East, true),
            MoveOutcome::Moved {
                from: Point::new(2, 1),
                to: Point::new(3, 1),
            }
        );
    }

    #[test]
    fn cooldown_stops_at_zero() {
        let mut player = armed();
        player.step = 2;
        player.cool_down();
        player.cool_down();
        player.cool_down();
        assert_eq!(player.step(), 0);
    }

    #[test]
    fn torch_toggle_flips_unconditionally() {
        let mut player = Player::new();
        assert!(!player.toggle_torch());
        assert!(player.toggle_torch());
    }
}
