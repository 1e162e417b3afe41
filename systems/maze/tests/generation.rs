use std::collections::VecDeque;

use dynamo_core::{CellCoord, Direction, GridSize, Maze};
use dynamo_system_maze::{generate, MazeError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

#[test]
fn carves_exactly_one_passage_less_than_cells() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    for columns in 1..=9 {
        for rows in 1..=7 {
            let size = GridSize::new(columns, rows);
            let maze = generate(&mut rng, size).expect("valid dimensions");
            assert_eq!(
                maze.passage_count(),
                size.cell_count() - 1,
                "unexpected passage count for {columns}x{rows}"
            );
        }
    }
}

#[test]
fn every_cell_is_reached_exactly_once() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for size in [
        GridSize::new(1, 1),
        GridSize::new(1, 12),
        GridSize::new(12, 1),
        GridSize::new(7, 3),
        GridSize::new(41, 23),
    ] {
        let maze = generate(&mut rng, size).expect("valid dimensions");
        let visits = count_tree_visits(&maze, CellCoord::new(0, 0));
        assert!(
            visits.iter().all(|count| *count == 1),
            "maze of {size:?} is not a spanning tree"
        );
    }
}

#[test]
fn same_seed_reproduces_same_maze() {
    let size = GridSize::new(5, 5);
    let first = generate(&mut ChaCha8Rng::seed_from_u64(0xd1a_u64), size).expect("generate");
    let second = generate(&mut ChaCha8Rng::seed_from_u64(0xd1a_u64), size).expect("generate");
    assert_eq!(first, second);
    assert_eq!(passages(&first), passages(&second));
}

#[test]
fn seeded_five_by_five_maze_has_fixed_passages() {
    use Direction::{East as E, South as S};

    let maze = generate(&mut ChaCha8Rng::seed_from_u64(0xd1a_u64), GridSize::new(5, 5))
        .expect("generate");

    let expected: Vec<(CellCoord, Direction)> = [
        (0, 0, E),
        (0, 0, S),
        (1, 0, E),
        (2, 0, S),
        (3, 0, E),
        (4, 0, S),
        (1, 1, E),
        (1, 1, S),
        (2, 1, E),
        (3, 1, E),
        (0, 2, E),
        (0, 2, S),
        (2, 2, S),
        (3, 2, E),
        (3, 2, S),
        (4, 2, S),
        (0, 3, S),
        (1, 3, S),
        (2, 3, E),
        (2, 3, S),
        (0, 4, E),
        (1, 4, E),
        (2, 4, E),
        (3, 4, E),
    ]
    .into_iter()
    .map(|(column, row, direction)| (CellCoord::new(column, row), direction))
    .collect();

    assert_eq!(passages(&maze), expected);
}

#[test]
fn continuing_stream_draws_fresh_mazes() {
    let size = GridSize::new(13, 7);
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let first = generate(&mut rng, size).expect("generate");
    let second = generate(&mut rng, size).expect("generate");
    assert_ne!(first, second, "second draw should consume new randomness");

    let mut replay = ChaCha8Rng::seed_from_u64(99);
    assert_eq!(generate(&mut replay, size).expect("generate"), first);
    assert_eq!(generate(&mut replay, size).expect("generate"), second);
}

#[test]
fn rejects_empty_dimensions() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        generate(&mut rng, GridSize::new(0, 3)),
        Err(MazeError::InvalidDimensions {
            columns: 0,
            rows: 3
        })
    );
    assert!(generate(&mut rng, GridSize::new(4, 0)).is_err());
}

fn passages(maze: &Maze) -> Vec<(CellCoord, Direction)> {
    maze.cells()
        .flat_map(|cell| {
            [Direction::East, Direction::South]
                .into_iter()
                .filter(move |direction| maze.connects(cell, *direction))
                .map(move |direction| (cell, direction))
        })
        .collect()
}

/// Walks the maze breadth-first without excluding visited cells other than the
/// parent, so any cycle shows up as a cell counted twice.
fn count_tree_visits(maze: &Maze, start: CellCoord) -> Vec<u32> {
    let size = maze.size();
    let mut visits = vec![0_u32; size.cell_count()];
    let mut queue = VecDeque::from([(start, None::<CellCoord>)]);

    while let Some((cell, parent)) = queue.pop_front() {
        let index = size.index(cell).expect("cell inside grid");
        visits[index] += 1;
        if visits[index] > 1 {
            continue;
        }

        for direction in DIRECTIONS {
            if !maze.connects(cell, direction) {
                continue;
            }
            let neighbour = cell.neighbour(direction).expect("connected neighbour");
            if Some(neighbour) != parent {
                queue.push_back((neighbour, Some(cell)));
            }
        }
    }

    visits
}
