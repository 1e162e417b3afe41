#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure maze system: generates perfect mazes and rasterizes them into the
//! occupancy bitmap the world collides against.
//!
//! Nothing here owns a random source. Callers thread a single stream through
//! every call so consecutive mazes are successive draws from that stream.

mod generator;
mod raster;

use dynamo_core::{CanvasSize, Level, Maze, OccupancyBitmap, Point};
use rand::Rng;
use thiserror::Error;

pub use self::generator::generate;
pub use self::raster::{centre_offset, rasterize, Rasterized};

/// Failures raised while constructing a maze.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// The grid must contain at least one cell along each axis.
    #[error("maze grid must be at least 1x1 (received {columns}x{rows})")]
    InvalidDimensions {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
    /// The rasterized maze has no open pixel above its bottom border.
    #[error("no exit could be carved into the bottom border")]
    NoExit,
}

/// Everything the world needs to play a single maze.
#[derive(Clone, Debug)]
pub struct MazeLayout {
    level: Level,
    maze: Maze,
    bitmap: OccupancyBitmap,
    exit: Point,
    offset: Point,
}

impl MazeLayout {
    /// Generates, rasterizes and centres a maze for `level` on `canvas`.
    pub fn build<R>(rng: &mut R, level: Level, canvas: CanvasSize) -> Result<Self, MazeError>
    where
        R: Rng + ?Sized,
    {
        let maze = generate(rng, level.grid_size(canvas))?;
        let Rasterized { bitmap, exit } = rasterize(&maze)?;
        let offset = centre_offset(&bitmap, canvas);
        Ok(Self {
            level,
            maze,
            bitmap,
            exit,
            offset,
        })
    }

    /// Difficulty the maze was generated for.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Abstract cell graph the bitmap was derived from.
    #[must_use]
    pub const fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Wall/open grid used for collision and drawing.
    #[must_use]
    pub const fn bitmap(&self) -> &OccupancyBitmap {
        &self.bitmap
    }

    /// Gap in the bottom border the player must reach.
    #[must_use]
    pub const fn exit(&self) -> Point {
        self.exit
    }

    /// Translation that centres the bitmap on the canvas.
    #[must_use]
    pub const fn offset(&self) -> Point {
        self.offset
    }
}
