use dynamo_core::{CellCoord, Direction, GridSize, Maze};
use rand::{seq::SliceRandom, Rng};

use crate::MazeError;

/// Generates a perfect maze with randomized Kruskal.
///
/// Every pair of 4-adjacent cells is a candidate passage. The candidates are
/// shuffled with `rng` and carved in order whenever they join two cells that
/// are not yet connected, so the result is a spanning tree: every cell is
/// reachable and exactly one simple path links any two cells.
///
/// The same source state always yields the same maze.
pub fn generate<R>(rng: &mut R, size: GridSize) -> Result<Maze, MazeError>
where
    R: Rng + ?Sized,
{
    if size.columns() == 0 || size.rows() == 0 {
        return Err(MazeError::InvalidDimensions {
            columns: size.columns(),
            rows: size.rows(),
        });
    }

    let mut maze = Maze::walled(size);
    let mut partitions = DisjointSet::new(size.cell_count());
    let mut candidates = candidate_passages(size);
    candidates.shuffle(rng);

    let required = size.cell_count() - 1;
    let mut carved = 0;
    for Passage { cell, direction } in candidates {
        if carved == required {
            break;
        }

        let Some(neighbour) = cell.neighbour(direction) else {
            continue;
        };
        let (Some(from), Some(to)) = (size.index(cell), size.index(neighbour)) else {
            continue;
        };

        if partitions.union(from, to) && maze.carve(cell, direction) {
            carved += 1;
        }
    }

    debug_assert_eq!(carved, required, "spanning tree left cells disconnected");
    Ok(maze)
}

#[derive(Clone, Copy, Debug)]
struct Passage {
    cell: CellCoord,
    direction: Direction,
}

fn candidate_passages(size: GridSize) -> Vec<Passage> {
    let columns = size.columns();
    let rows = size.rows();
    let mut passages = Vec::with_capacity(size.cell_count().saturating_mul(2));

    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            if column + 1 < columns {
                passages.push(Passage {
                    cell,
                    direction: Direction::East,
                });
            }
            if row + 1 < rows {
                passages.push(Passage {
                    cell,
                    direction: Direction::South,
                });
            }
        }
    }

    passages
}

/// Union-find over dense indices with path halving and union by rank.
#[derive(Debug)]
struct DisjointSet {
    parents: Vec<usize>,
    ranks: Vec<u8>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parents: (0..len).collect(),
            ranks: vec![0; len],
        }
    }

    fn find(&mut self, mut index: usize) -> usize {
        while self.parents[index] != index {
            let grandparent = self.parents[self.parents[index]];
            self.parents[index] = grandparent;
            index = grandparent;
        }
        index
    }

    /// Merges the partitions holding `a` and `b`.
    ///
    /// Returns `false` when both already share a partition.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        match self.ranks[root_a].cmp(&self.ranks[root_b]) {
            std::cmp::Ordering::Less => self.parents[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parents[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parents[root_b] = root_a;
                self.ranks[root_a] = self.ranks[root_a].saturating_add(1);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_reports_whether_partitions_merged() {
        let mut sets = DisjointSet::new(4);
        assert!(sets.union(0, 1));
        assert!(sets.union(2, 3));
        assert!(!sets.union(1, 0));
        assert!(sets.union(1, 3));
        assert!(!sets.union(0, 2));
        assert_eq!(sets.find(0), sets.find(3));
    }

    #[test]
    fn candidate_passages_cover_every_adjacent_pair() {
        let passages = candidate_passages(GridSize::new(3, 2));
        // 2 horizontal pairs per row and 3 vertical pairs between the rows.
        assert_eq!(passages.len(), 2 * 2 + 3);
        assert!(candidate_passages(GridSize::new(1, 1)).is_empty());
    }
}
