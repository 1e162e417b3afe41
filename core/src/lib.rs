#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dynamo engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters capture keyboard state, the
//! controls system converts it into [`Command`] values, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values describing what changed. Maze data shared between the generator and
//! the world ([`Maze`], [`OccupancyBitmap`]) lives here so neither side owns
//! the other's representation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Width of the logical display canvas in pixels.
pub const CANVAS_WIDTH: u32 = 84;

/// Height of the logical display canvas in pixels.
pub const CANVAS_HEIGHT: u32 = 48;

/// Logical display canvas every coordinate in the game is expressed against.
pub const CANVAS: CanvasSize = CanvasSize::new(CANVAS_WIDTH, CANVAS_HEIGHT);

/// Grid-size divisors indexed by difficulty level, easiest first.
pub const SCALE_TABLE: [u32; 5] = [10, 6, 4, 3, 2];

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by a single discrete tick.
    Tick {
        /// Wall-clock time represented by the tick.
        dt: Duration,
    },
    /// Confirms the title screen prompt.
    Confirm,
    /// Requests that the player step one pixel in the given direction.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
        /// Whether the key was freshly pressed this tick rather than held.
        tapped: bool,
    },
    /// Flips the player's torch.
    ToggleTorch,
    /// Requests that the session ends.
    Quit,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the game entered a new high-level phase.
    PhaseChanged {
        /// Phase that became active.
        phase: PhaseKind,
    },
    /// Announces that a freshly generated maze is ready to play.
    LevelStarted {
        /// Difficulty of the new maze.
        level: Level,
    },
    /// Confirms that the player moved between two pixels.
    PlayerMoved {
        /// Position before the step.
        from: Point,
        /// Position after the step.
        to: Point,
    },
    /// Reports that a step was attempted into a wall.
    PlayerBlocked {
        /// Position the player kept.
        at: Point,
        /// Direction of the rejected step.
        direction: Direction,
    },
    /// Reports the torch state after it changed.
    TorchToggled {
        /// Whether the torch is lit.
        on: bool,
    },
    /// Reports that the player stood on the exit and the walk-off began.
    ExitReached {
        /// Difficulty of the maze that was solved.
        level: Level,
    },
    /// Reports that the blink flag flipped.
    BlinkToggled {
        /// Current value of the blink flag.
        on: bool,
    },
    /// The player asked to stop the session. Not an error.
    QuitRequested,
}

/// High-level phase of the game without any phase-specific payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Title screen waiting for confirmation.
    Title,
    /// One-shot animation between the title and the first level.
    TitleTransition,
    /// A maze is being played.
    Level,
}

/// Difficulty tiers, each mapped to an entry of [`SCALE_TABLE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    /// Largest corridors, fewest cells.
    Beginner,
    /// Second tier.
    Easy,
    /// Third tier.
    Medium,
    /// Fourth tier.
    Hard,
    /// Single-pixel corridors filling the whole canvas.
    Extreme,
}

impl Level {
    /// All levels in ascending difficulty.
    pub const ALL: [Level; 5] = [
        Level::Beginner,
        Level::Easy,
        Level::Medium,
        Level::Hard,
        Level::Extreme,
    ];

    /// Zero-based position of the level within [`SCALE_TABLE`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Beginner => 0,
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
            Self::Extreme => 4,
        }
    }

    /// Resolves a level from a table index, clamping to the hardest tier.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Beginner,
            1 => Self::Easy,
            2 => Self::Medium,
            3 => Self::Hard,
            _ => Self::Extreme,
        }
    }

    /// Divisor applied to the canvas to derive the maze grid.
    #[must_use]
    pub const fn scale(self) -> u32 {
        SCALE_TABLE[self.index()]
    }

    /// Next tier, saturating at [`Level::Extreme`].
    #[must_use]
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Grid dimensions produced by dividing `canvas` by this level's scale.
    ///
    /// Each axis is reduced by one so the rasterized maze, which grows to
    /// `2n + 1` pixels, fits inside the canvas. Axes that would drop below one
    /// are reported as zero and rejected by the generator.
    #[must_use]
    pub const fn grid_size(self, canvas: CanvasSize) -> GridSize {
        let scale = self.scale();
        GridSize::new(
            (canvas.width() / scale).saturating_sub(1),
            (canvas.height() / scale).saturating_sub(1),
        )
    }
}

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Unit vector of the direction in screen space, `y` growing downward.
    #[must_use]
    pub const fn delta(self) -> Point {
        match self {
            Self::North => Point::new(0, -1),
            Self::East => Point::new(1, 0),
            Self::South => Point::new(0, 1),
            Self::West => Point::new(-1, 0),
        }
    }
}

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// Origin of the coordinate space.
    pub const ZERO: Point = Point::new(0, 0);

    /// Creates a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component, growing downward.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Component-wise sum of two points.
    #[must_use]
    pub const fn add(self, other: Point) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Neighbouring point one step in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        self.add(direction.delta())
    }
}

/// Dimensions of the logical display canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanvasSize {
    width: u32,
    height: u32,
}

impl CanvasSize {
    /// Creates a canvas descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Number of maze cells along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Row-major index of `cell`, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Location of a single maze cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Neighbouring cell in `direction` if it does not underflow.
    ///
    /// The result may still lie beyond the far edges of a grid; callers check
    /// bounds against their [`GridSize`].
    #[must_use]
    pub fn neighbour(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => Some(Self::new(self.column, self.row.checked_sub(1)?)),
            Direction::East => Some(Self::new(self.column.checked_add(1)?, self.row)),
            Direction::South => Some(Self::new(self.column, self.row.checked_add(1)?)),
            Direction::West => Some(Self::new(self.column.checked_sub(1)?, self.row)),
        }
    }
}

/// Abstract perfect maze: which neighbouring cells are joined by a passage.
///
/// Only east and south links are stored; west and north are answered through
/// the neighbouring cell so a passage can never be half-open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    size: GridSize,
    east: Vec<bool>,
    south: Vec<bool>,
}

impl Maze {
    /// Creates a maze of the given size with every wall standing.
    #[must_use]
    pub fn walled(size: GridSize) -> Self {
        let cells = size.cell_count();
        Self {
            size,
            east: vec![false; cells],
            south: vec![false; cells],
        }
    }

    /// Dimensions of the maze grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Removes the wall between `cell` and its neighbour in `direction`.
    ///
    /// Returns `false` when either cell lies outside the grid, leaving the
    /// maze untouched.
    pub fn carve(&mut self, cell: CellCoord, direction: Direction) -> bool {
        let Some((anchor, link)) = self.link_slot(cell, direction) else {
            return false;
        };
        match link {
            Link::East => self.east[anchor] = true,
            Link::South => self.south[anchor] = true,
        }
        true
    }

    /// Reports whether a passage joins `cell` with its neighbour in `direction`.
    #[must_use]
    pub fn connects(&self, cell: CellCoord, direction: Direction) -> bool {
        match self.link_slot(cell, direction) {
            Some((anchor, Link::East)) => self.east[anchor],
            Some((anchor, Link::South)) => self.south[anchor],
            None => false,
        }
    }

    /// Number of carved passages.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.east.iter().filter(|open| **open).count()
            + self.south.iter().filter(|open| **open).count()
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let GridSize { columns, rows } = self.size;
        (0..rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }

    fn link_slot(&self, cell: CellCoord, direction: Direction) -> Option<(usize, Link)> {
        let neighbour = cell.neighbour(direction)?;
        let _ = self.size.index(neighbour)?;
        let (anchor, link) = match direction {
            Direction::East => (cell, Link::East),
            Direction::South => (cell, Link::South),
            Direction::West => (neighbour, Link::East),
            Direction::North => (neighbour, Link::South),
        };
        Some((self.size.index(anchor)?, link))
    }
}

#[derive(Clone, Copy, Debug)]
enum Link {
    East,
    South,
}

/// Content of a single occupancy bitmap pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Impassable pixel.
    Wall,
    /// Walkable pixel.
    Open,
}

/// Dense wall/open grid the player collides against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyBitmap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl OccupancyBitmap {
    /// Creates a bitmap of the given size filled with walls.
    #[must_use]
    pub fn walled(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; capacity],
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Tile at `point`; everything outside the bitmap reads as a wall.
    #[must_use]
    pub fn tile(&self, point: Point) -> Tile {
        self.index(point)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(Tile::Wall)
    }

    /// Reports whether `point` can be walked on.
    #[must_use]
    pub fn is_open(&self, point: Point) -> bool {
        self.tile(point) == Tile::Open
    }

    /// Overwrites the tile at `point`. Points outside the bitmap are ignored.
    pub fn set(&mut self, point: Point, tile: Tile) {
        if let Some(index) = self.index(point) {
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = tile;
            }
        }
    }

    /// Reports whether `point` lies on the outermost ring of pixels.
    #[must_use]
    pub fn is_border(&self, point: Point) -> bool {
        self.index(point).is_some()
            && (point.x() == 0
                || point.y() == 0
                || point.x() + 1 == self.width as i32
                || point.y() + 1 == self.height as i32)
    }

    /// Iterator over every pixel coordinate paired with its tile, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Tile)> + '_ {
        let width = self.width.max(1) as usize;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let x = (index % width) as i32;
            let y = (index / width) as i32;
            (Point::new(x, y), *tile)
        })
    }

    fn index(&self, point: Point) -> Option<usize> {
        let x = u32::try_from(point.x()).ok()?;
        let y = u32::try_from(point.y()).ok()?;
        if x < self.width && y < self.height {
            let width = usize::try_from(self.width).ok()?;
            Some(usize::try_from(y).ok()? * width + usize::try_from(x).ok()?)
        } else {
            None
        }
    }
}

/// Keyboard keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Moves north.
    W,
    /// Moves west.
    A,
    /// Moves south.
    S,
    /// Moves east.
    D,
    /// Confirms the title prompt and toggles the torch.
    E,
    /// Quits.
    Q,
    /// Quits.
    Escape,
}

impl Key {
    /// Every key the game polls.
    pub const ALL: [Key; 7] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::E,
        Key::Q,
        Key::Escape,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::W => 1 << 0,
            Self::A => 1 << 1,
            Self::S => 1 << 2,
            Self::D => 1 << 3,
            Self::E => 1 << 4,
            Self::Q => 1 << 5,
            Self::Escape => 1 << 6,
        }
    }
}

/// Compact set of [`Key`] values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeySet(u8);

impl KeySet {
    /// Set without any key.
    pub const EMPTY: KeySet = KeySet(0);

    /// Builds a set from the provided keys.
    #[must_use]
    pub fn of(keys: &[Key]) -> Self {
        keys.iter().fold(Self::EMPTY, |set, key| set.with(*key))
    }

    /// Returns a copy of the set that also contains `key`.
    #[must_use]
    pub const fn with(self, key: Key) -> Self {
        Self(self.0 | key.bit())
    }

    /// Adds `key` to the set.
    pub fn insert(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    /// Returns the keys present in either set.
    #[must_use]
    pub const fn union(self, other: KeySet) -> Self {
        Self(self.0 | other.0)
    }

    /// Reports whether `key` is part of the set.
    #[must_use]
    pub const fn contains(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }
}
