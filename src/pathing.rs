use std::collections::VecDeque;

use bit_set::BitSet;
use itertools::Itertools;
use log::debug;
use smallvec::SmallVec;

use crate::cells::{Direction, GridCoordinate};
use crate::grid::Grid;

/// Pick the end cell of a maze: the last cell taken off the queue of a breadth first walk from
/// `start`.
///
/// In a perfect maze this is a dead end a long way from the start, though not necessarily the
/// furthest one. Branches of equal depth interleave in the queue and the winner depends on the
/// fixed Up, Down, Left, Right order neighbours are queued in. Use `Distances` when the true
/// furthest cells are wanted.
///
/// Returns None if `start` is not on the grid.
pub fn find_end_cell(grid: &Grid, start: GridCoordinate) -> Option<GridCoordinate> {
    let start_index = grid.grid_coordinate_to_index(start)?;

    let mut visited = BitSet::with_capacity(grid.size());
    let mut to_check = VecDeque::with_capacity(grid.size());
    to_check.push_back((start, start_index));
    let mut last = start;

    while let Some((current, current_index)) = to_check.pop_front() {
        visited.insert(current_index);
        last = current;

        for &dir in &Direction::ALL {
            if !grid.has_passage(current, dir) {
                continue;
            }
            let neighbour = grid.neighbour_at_direction(current, dir);
            let neighbour_index = neighbour.and_then(|n| grid.grid_coordinate_to_index(n));
            if let (Some(n), Some(index)) = (neighbour, neighbour_index) {
                if !visited.contains(index) {
                    to_check.push_back((n, index));
                }
            }
        }
    }

    debug!("end cell {} chosen for start {}", last, start);
    Some(last)
}

/// Number of steps from a start cell to every cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    distances: Vec<Option<u32>>,
    side_length: usize,
    max_distance: u32,
}

impl Distances {
    /// Flood fill outwards from `start_coordinate` through the grid's passages.
    /// Returns None if the start is not on the grid.
    pub fn new(grid: &Grid, start_coordinate: GridCoordinate) -> Option<Distances> {
        let start_index = grid.grid_coordinate_to_index(start_coordinate)?;

        let mut distances = vec![None; grid.size()];
        distances[start_index] = Some(0);
        let mut max = 0;

        // Every step costs one, so the first time a cell is reached is by a shortest route and
        // the distances vec doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        let mut distance = 0;
        while !frontier.is_empty() {
            distance += 1;
            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                let links = grid.links(*cell_coord).unwrap_or_default();
                for link_coordinate in &*links {
                    if let Some(index) = grid.grid_coordinate_to_index(*link_coordinate) {
                        if distances[index].is_none() {
                            distances[index] = Some(distance);
                            max = distance;
                            new_frontier.push(*link_coordinate);
                        }
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            side_length: grid.side_length().0,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// None for unreachable or off grid cells.
    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<u32> {
        if coord.row < self.side_length && coord.col < self.side_length {
            self.distances[coord.row * self.side_length + coord.col]
        } else {
            None
        }
    }

    /// Every cell at the maximum distance from the start, in row major order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[GridCoordinate; 8]> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .enumerate()
            .filter(|&(_, distance)| *distance == Some(furthest_distance))
            .map(|(index, _)| {
                GridCoordinate::new(index / self.side_length, index % self.side_length)
            })
            .collect()
    }
}

/// The cells on the route from the distances' start to `end_point`, both ends included.
///
/// Walks back from the end, always stepping to the linked neighbour closest to the start.
/// Returns None if the end is unreachable.
pub fn shortest_path(grid: &Grid,
                     distances_from_start: &Distances,
                     end_point: GridCoordinate)
                     -> Option<Vec<GridCoordinate>> {
    distances_from_start.distance_from_start_to(end_point)?;

    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_coord = end_point;

    while current_coord != start {
        let current_distance = distances_from_start.distance_from_start_to(current_coord)?;

        let closest_to_start = grid.links(current_coord)?
            .iter()
            .filter_map(|&coord| {
                distances_from_start.distance_from_start_to(coord).map(|d| (coord, d))
            })
            .min_by_key(|&(_, d)| d);

        match closest_to_start {
            Some((closer_coord, closer_distance)) if closer_distance < current_distance => {
                current_coord = closer_coord;
                path.push(current_coord);
            }
            // No linked neighbour gets any closer, so there is no way through.
            _ => return None,
        }
    }

    path.reverse();
    Some(path)
}

/// The single cell moves that walk along `path`.
/// Returns None if two consecutive cells are not adjacent.
pub fn path_directions(path: &[GridCoordinate]) -> Option<Vec<Direction>> {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| a.direction_to(*b))
        .collect()
}
