use dynamo_core::{Level, Point, Tile, CANVAS};
use dynamo_system_maze::{generate, rasterize, MazeLayout, Rasterized};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn exit_is_the_only_gap_in_the_border() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xfeed);
    for level in Level::ALL {
        let maze = generate(&mut rng, level.grid_size(CANVAS)).expect("generate");
        let Rasterized { bitmap, exit } = rasterize(&maze).expect("rasterize");

        assert_eq!(exit.y(), bitmap.height() as i32 - 1, "exit not on bottom edge");
        assert!(bitmap.is_open(exit));

        let open_border: Vec<Point> = bitmap
            .iter()
            .filter(|(point, tile)| *tile == Tile::Open && bitmap.is_border(*point))
            .map(|(point, _)| point)
            .collect();
        assert_eq!(open_border, vec![exit], "border leaks at {level:?}");
    }
}

#[test]
fn exit_sits_under_rightmost_open_pixel() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let maze = generate(&mut rng, Level::Easy.grid_size(CANVAS)).expect("generate");
    let Rasterized { bitmap, exit } = rasterize(&maze).expect("rasterize");

    let interior = bitmap.height() as i32 - 2;
    let rightmost = (1..bitmap.width() as i32 - 1)
        .rev()
        .find(|x| bitmap.is_open(Point::new(*x, interior)))
        .expect("open interior pixel");
    assert_eq!(exit, Point::new(rightmost, interior + 1));
}

#[test]
fn every_cell_pixel_is_open_and_lattice_points_are_walls() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let maze = generate(&mut rng, Level::Medium.grid_size(CANVAS)).expect("generate");
    let Rasterized { bitmap, .. } = rasterize(&maze).expect("rasterize");

    for cell in maze.cells() {
        let pixel = Point::new(cell.column() as i32 * 2 + 1, cell.row() as i32 * 2 + 1);
        assert!(bitmap.is_open(pixel));
        assert_eq!(
            bitmap.tile(Point::new(pixel.x() + 1, pixel.y() + 1)),
            Tile::Wall,
            "corner pixels never open"
        );
    }
}

#[test]
fn layout_centres_maze_on_canvas() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let beginner = MazeLayout::build(&mut rng, Level::Beginner, CANVAS).expect("layout");
    assert_eq!(beginner.level(), Level::Beginner);
    assert_eq!(
        (beginner.bitmap().width(), beginner.bitmap().height()),
        (15, 7)
    );
    assert_eq!(beginner.offset(), Point::new(34, 20));

    let extreme = MazeLayout::build(&mut rng, Level::Extreme, CANVAS).expect("layout");
    assert_eq!(
        (extreme.bitmap().width(), extreme.bitmap().height()),
        (83, 47)
    );
    assert_eq!(extreme.offset(), Point::ZERO);
    assert_eq!(extreme.exit().y(), 46);
}
