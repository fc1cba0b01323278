use log::debug;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::cells::{Direction, GridCoordinate};
use crate::grid::{CarveError, Grid};

/// An owned random source, reproducible from `seed`.
pub fn seeded_rng(seed: u64) -> XorShiftRng {
    XorShiftRng::seed_from_u64(seed)
}

/// A fresh seed from the thread local generator, for mazes nobody asked to reproduce.
pub fn random_seed() -> u64 {
    rand::thread_rng().gen()
}

/// One pending cell of the backtracker: the cell, the order to try its directions in and how
/// many of them have been tried.
#[derive(Debug)]
struct Frame {
    coord: GridCoordinate,
    directions: [Direction; 4],
    tried: usize,
}

impl Frame {
    fn new<R: Rng>(coord: GridCoordinate, rng: &mut R) -> Frame {
        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        Frame {
            coord,
            directions,
            tried: 0,
        }
    }
}

/// Apply the recursive backtracker maze generation algorithm to a grid, starting at `start`.
///
/// From the current cell the four directions are tried in a freshly shuffled order. The first
/// direction leading to an unvisited (zero valued) cell gets a passage carved through it and
/// the algorithm carries on from that new cell. When every direction of a cell has been tried
/// it backtracks to the cell it came from and tries that cell's remaining directions.
///
/// Every carve enters a cell that has never been visited so the result is a perfect maze over
/// every cell reachable from `start`, which on a walled off grid is every cell.
///
/// The "recursion" is an explicit stack of frames so a long winding maze cannot exhaust the
/// call stack.
pub fn recursive_backtracker<R: Rng>(grid: &mut Grid,
                                     start: GridCoordinate,
                                     rng: &mut R)
                                     -> Result<(), CarveError> {
    if !grid.is_valid_coordinate(start) {
        return Err(CarveError::InvalidGridCoordinate);
    }

    let mut stack = vec![Frame::new(start, rng)];
    while let Some(frame) = stack.last_mut() {
        if frame.tried == frame.directions.len() {
            stack.pop();
            continue;
        }
        let direction = frame.directions[frame.tried];
        frame.tried += 1;
        let coord = frame.coord;

        let unvisited_neighbour = grid.neighbour_at_direction(coord, direction)
            .filter(|&neighbour| grid.is_unvisited(neighbour));
        if unvisited_neighbour.is_some() {
            let next = grid.carve(coord, direction)?;
            stack.push(Frame::new(next, rng));
        }
    }

    debug!("carved {} passages from {}", grid.passages_count().0, start);
    Ok(())
}
