use dynamo_core::{CanvasSize, Direction, Maze, OccupancyBitmap, Point, Tile};

use crate::MazeError;

/// Occupancy bitmap together with the exit carved into its bottom border.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rasterized {
    /// Wall/open pixels, `2n + 1` wide and tall per grid axis.
    pub bitmap: OccupancyBitmap,
    /// Opened gap in the bottom border.
    pub exit: Point,
}

/// Converts the cell graph into a wall/open bitmap and carves the exit.
///
/// Cell `(c, r)` becomes pixel `(2c + 1, 2r + 1)`. A passage east opens the
/// pixel to its right and a passage south the pixel below it; everything else,
/// including the outer border, stays a wall. The exit sits in the bottom
/// border under the rightmost open pixel of the row just above it.
pub fn rasterize(maze: &Maze) -> Result<Rasterized, MazeError> {
    let size = maze.size();
    let (Some(width), Some(height)) = (span(size.columns()), span(size.rows())) else {
        return Err(MazeError::InvalidDimensions {
            columns: size.columns(),
            rows: size.rows(),
        });
    };

    let mut bitmap = OccupancyBitmap::walled(width, height);
    for cell in maze.cells() {
        let pixel = Point::new(cell.column() as i32 * 2 + 1, cell.row() as i32 * 2 + 1);
        bitmap.set(pixel, Tile::Open);
        if maze.connects(cell, Direction::East) {
            bitmap.set(pixel.step(Direction::East), Tile::Open);
        }
        if maze.connects(cell, Direction::South) {
            bitmap.set(pixel.step(Direction::South), Tile::Open);
        }
    }

    let exit = carve_exit(&mut bitmap).ok_or(MazeError::NoExit)?;
    Ok(Rasterized { bitmap, exit })
}

/// Translation that centres `bitmap` on `canvas`, halving the slack per axis.
#[must_use]
pub fn centre_offset(bitmap: &OccupancyBitmap, canvas: CanvasSize) -> Point {
    let slack_x = canvas.width() as i32 - bitmap.width() as i32;
    let slack_y = canvas.height() as i32 - bitmap.height() as i32;
    Point::new(slack_x / 2, slack_y / 2)
}

fn span(cells: u32) -> Option<u32> {
    if cells == 0 {
        return None;
    }
    let pixels = cells.checked_mul(2)?.checked_add(1)?;
    i32::try_from(pixels).ok().map(|_| pixels)
}

fn carve_exit(bitmap: &mut OccupancyBitmap) -> Option<Point> {
    let border = bitmap.height().checked_sub(1)? as i32;
    let interior = border.checked_sub(1).filter(|row| *row > 0)?;
    let last_column = bitmap.width().checked_sub(1)? as i32;

    let column = (1..last_column)
        .rev()
        .find(|column| bitmap.is_open(Point::new(*column, interior)))?;

    let exit = Point::new(column, border);
    bitmap.set(exit, Tile::Open);
    Some(exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynamo_core::{CellCoord, GridSize};

    #[test]
    fn single_cell_maze_opens_centre_and_exit() {
        let maze = Maze::walled(GridSize::new(1, 1));
        let Rasterized { bitmap, exit } = rasterize(&maze).expect("rasterize");

        assert_eq!((bitmap.width(), bitmap.height()), (3, 3));
        assert!(bitmap.is_open(Point::new(1, 1)));
        assert_eq!(exit, Point::new(1, 2));
        assert!(bitmap.is_open(exit));
    }

    #[test]
    fn passages_open_the_pixel_between_cells() {
        let mut maze = Maze::walled(GridSize::new(2, 2));
        assert!(maze.carve(CellCoord::new(0, 0), Direction::East));
        assert!(maze.carve(CellCoord::new(0, 0), Direction::South));
        assert!(maze.carve(CellCoord::new(1, 0), Direction::South));

        let Rasterized { bitmap, .. } = rasterize(&maze).expect("rasterize");

        assert!(bitmap.is_open(Point::new(2, 1)));
        assert!(bitmap.is_open(Point::new(1, 2)));
        assert!(bitmap.is_open(Point::new(3, 2)));
        assert!(!bitmap.is_open(Point::new(2, 3)));
        assert!(!bitmap.is_open(Point::new(2, 2)));
    }

    #[test]
    fn empty_maze_is_rejected() {
        let maze = Maze::walled(GridSize::new(0, 4));
        assert_eq!(
            rasterize(&maze),
            Err(MazeError::InvalidDimensions {
                columns: 0,
                rows: 4
            })
        );
    }

    #[test]
    fn bitmap_without_interior_has_no_exit() {
        let mut bitmap = OccupancyBitmap::walled(5, 5);
        assert_eq!(carve_exit(&mut bitmap), None);
        assert_eq!(carve_exit(&mut OccupancyBitmap::walled(3, 1)), None);
    }

    #[test]
    fn offset_centres_with_truncating_division() {
        let bitmap = OccupancyBitmap::walled(15, 7);
        assert_eq!(
            centre_offset(&bitmap, CanvasSize::new(84, 48)),
            Point::new(34, 20)
        );
        let full = OccupancyBitmap::walled(83, 47);
        assert_eq!(centre_offset(&full, CanvasSize::new(84, 48)), Point::ZERO);
    }
}
