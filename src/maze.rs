use std::convert::TryFrom;
use std::fmt;

use log::{debug, info};

use crate::cells::{Direction, GridCoordinate};
use crate::errors::*;
use crate::generators;
use crate::grid::Grid;
use crate::grid_displays::{render_grid, BlankDisplay};
use crate::grid_traits::GridDisplay;
use crate::pathing;
use crate::traversal::{self, MoveBlock, MoveError};
use crate::units::SideLength;

pub const DEFAULT_SIDE_LENGTH: usize = 5;

/// A generated perfect maze with a start cell and the end cell a player has to reach.
///
/// Read only once built; make a new one with `MazeBuilder` for a different maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    grid: Grid,
    start: GridCoordinate,
    end: GridCoordinate,
    seed: u64,
}

/// Options for building a `Maze`.
#[derive(Debug, Copy, Clone)]
pub struct MazeBuilder {
    side_length: usize,
    start: GridCoordinate,
    seed: Option<u64>,
}

impl Default for MazeBuilder {
    fn default() -> MazeBuilder {
        MazeBuilder::new(DEFAULT_SIDE_LENGTH)
    }
}

impl MazeBuilder {
    /// A `side_length` by `side_length` maze starting in the top left cell, with a random seed.
    pub fn new(side_length: usize) -> MazeBuilder {
        MazeBuilder {
            side_length,
            start: GridCoordinate::new(0, 0),
            seed: None,
        }
    }

    pub fn start(mut self, row: usize, col: usize) -> Self {
        self.start = GridCoordinate::new(row, col);
        self
    }

    /// Make the maze reproducible: the same side length, start and seed always carve the same
    /// maze.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Maze> {
        let side_length = SideLength(self.side_length);
        if self.side_length < 1 || side_length.checked_cells().is_none() {
            let reported = i64::try_from(self.side_length).unwrap_or(i64::MAX);
            return Err(ErrorKind::InvalidDimension(reported).into());
        }
        let invalid_start = || {
            ErrorKind::InvalidStart(self.start.row as i64, self.start.col as i64, self.side_length)
        };

        let mut grid = Grid::new(side_length);
        if !grid.is_valid_coordinate(self.start) {
            return Err(invalid_start().into());
        }

        let seed = self.seed.unwrap_or_else(generators::random_seed);
        let mut rng = generators::seeded_rng(seed);
        generators::recursive_backtracker(&mut grid, self.start, &mut rng)
            .map_err(|_| invalid_start())?;
        let end = pathing::find_end_cell(&grid, self.start).ok_or_else(invalid_start)?;

        let maze = Maze {
            grid,
            start: self.start,
            end,
            seed,
        };
        maze.debug_check_invariants();
        debug!("built {0}x{0} maze from seed {1}, start {2} end {3}",
               self.side_length,
               seed,
               maze.start,
               maze.end);
        Ok(maze)
    }
}

impl Maze {
    /// A randomly seeded maze starting in the top left cell.
    pub fn new(side_length: usize) -> Result<Maze> {
        MazeBuilder::new(side_length).build()
    }

    /// The cell bitmasks, row major.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn start(&self) -> GridCoordinate {
        self.start
    }

    #[inline]
    pub fn end(&self) -> GridCoordinate {
        self.end
    }

    #[inline]
    pub fn side_length(&self) -> SideLength {
        self.grid.side_length()
    }

    /// The seed the maze was carved with, to rebuild it later.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The walls of the maze as ASCII text.
    pub fn render(&self) -> String {
        render_grid(&self.grid, &BlankDisplay)
    }

    /// The walls of the maze as ASCII text, with cell bodies drawn by `displayer`.
    pub fn render_with(&self, displayer: &dyn GridDisplay) -> String {
        render_grid(&self.grid, displayer)
    }

    /// Follow single cell moves from the start, returning where they finish.
    pub fn traverse<I, S>(&self, moves: I) -> ::std::result::Result<GridCoordinate, MoveError>
        where I: IntoIterator<Item = S>,
              S: AsRef<str>
    {
        traversal::traverse(&self.grid, self.start, moves)
    }

    /// Follow `(count, direction)` blocks of moves from the start, returning where they finish.
    pub fn traverse_blocks<I, S>(&self, blocks: I) -> ::std::result::Result<GridCoordinate, MoveError>
        where I: IntoIterator<Item = (i64, S)>,
              S: AsRef<str> + Clone
    {
        traversal::traverse_blocks(&self.grid, self.start, blocks)
    }

    /// Do the single cell `moves` (`u`, `d`, `l`, `r`) lead from the start to the end.
    ///
    /// Moves that are not directions or that hit a wall make the attempt fail, the reason is
    /// logged. Running out of moves early, or walking on past the end, is simply not solved.
    pub fn solve<I, S>(&self, moves: I) -> bool
        where I: IntoIterator<Item = S>,
              S: AsRef<str>
    {
        self.reached_end(self.traverse(moves))
    }

    /// As `solve`, with moves given as run length `(count, direction)` blocks.
    pub fn solve_blocks<I, S>(&self, blocks: I) -> bool
        where I: IntoIterator<Item = (i64, S)>,
              S: AsRef<str> + Clone
    {
        self.reached_end(self.traverse_blocks(blocks))
    }

    /// The shortest single cell moves from the start to the end.
    /// In a perfect maze this is the only route that does not double back.
    pub fn solution(&self) -> Option<Vec<Direction>> {
        let distances = pathing::Distances::new(&self.grid, self.start)?;
        let path = pathing::shortest_path(&self.grid, &distances, self.end)?;
        pathing::path_directions(&path)
    }

    /// `solution` as run length blocks.
    pub fn solution_blocks(&self) -> Option<Vec<MoveBlock>> {
        self.solution().map(|moves| traversal::compress_moves(&moves))
    }

    fn reached_end(&self, outcome: ::std::result::Result<GridCoordinate, MoveError>) -> bool {
        match outcome {
            Ok(finish) => finish == self.end,
            Err(e) => {
                info!("{}", e);
                false
            }
        }
    }

    /// Generator or end cell finder defects, not anything a caller can cause.
    fn debug_check_invariants(&self) {
        let side_length = self.side_length();
        if side_length.0 > 1 {
            debug_assert!(self.grid.iter().all(|coord| !self.grid.is_unvisited(coord)),
                          "maze has unvisited cells");
            debug_assert_ne!(self.start, self.end, "maze ends where it starts");
        } else {
            debug_assert_eq!(self.start, self.end);
        }
        debug_assert_eq!(self.grid.passages_count(), side_length.spanning_tree_passages());
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {

    use petgraph::algo::{connected_components, is_cyclic_undirected};
    use petgraph::graph::UnGraph;
    use quickcheck::quickcheck;

    use super::*;
    use crate::grid_displays::StartEndPointsDisplay;

    fn seeded(side: usize, seed: u64) -> Maze {
        MazeBuilder::new(side).seed(seed).build().expect("maze build failed")
    }

    fn tokens(moves: &[Direction]) -> Vec<String> {
        moves.iter().map(|d| d.to_string()).collect()
    }

    fn passage_graph(maze: &Maze) -> UnGraph<(), ()> {
        let grid = maze.grid();
        let mut graph = UnGraph::with_capacity(grid.size(), grid.size());
        let nodes = (0..grid.size()).map(|_| graph.add_node(())).collect::<Vec<_>>();
        for (a, b) in grid.iter_passages() {
            let a_index = grid.grid_coordinate_to_index(a).unwrap();
            let b_index = grid.grid_coordinate_to_index(b).unwrap();
            graph.add_edge(nodes[a_index], nodes[b_index], ());
        }
        graph
    }

    #[test]
    fn default_start_is_top_left() {
        let maze = Maze::new(DEFAULT_SIDE_LENGTH).unwrap();
        assert_eq!(maze.start(), GridCoordinate::new(0, 0));
        assert_eq!(maze.side_length(), SideLength(5));
        let built = MazeBuilder::default().build().unwrap();
        assert_eq!(built.side_length(), SideLength(DEFAULT_SIDE_LENGTH));
    }

    #[test]
    fn zero_side_length_rejected() {
        let err = MazeBuilder::new(0).seed(1).build().unwrap_err();
        match *err.kind() {
            ErrorKind::InvalidDimension(0) => {}
            ref other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn side_length_with_too_many_cells_rejected() {
        let err = MazeBuilder::new(usize::MAX).seed(1).build().unwrap_err();
        match *err.kind() {
            ErrorKind::InvalidDimension(_) => {}
            ref other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn start_off_the_grid_rejected() {
        for &(row, col) in &[(4, 0), (0, 4), (9, 9)] {
            let err = MazeBuilder::new(4).start(row, col).build().unwrap_err();
            match *err.kind() {
                ErrorKind::InvalidStart(r, c, 4) => assert_eq!((r, c), (row as i64, col as i64)),
                ref other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn single_cell_maze() {
        let maze = seeded(1, 99);
        assert_eq!(maze.grid().to_rows(), vec![vec![0]]);
        assert_eq!(maze.start(), GridCoordinate::new(0, 0));
        assert_eq!(maze.end(), GridCoordinate::new(0, 0));
        assert!(maze.solve(Vec::<&str>::new()));
        assert!(!maze.solve(vec!["u"]));
        assert_eq!(maze.render(), "+---+\n|   |\n+---+\n");
    }

    #[test]
    fn same_seed_same_render() {
        let a = MazeBuilder::new(12).start(3, 7).seed(2024).build().unwrap();
        let b = MazeBuilder::new(12).start(3, 7).seed(2024).build().unwrap();
        assert_eq!(a.render(), b.render());
        assert_eq!(a, b);
        assert_eq!(a.seed(), 2024);
    }

    #[test]
    fn render_is_idempotent() {
        let maze = seeded(8, 5);
        assert_eq!(maze.render(), maze.render());
        assert_eq!(maze.to_string(), maze.render());
    }

    #[test]
    fn render_dimensions() {
        let maze = seeded(6, 17);
        let rendered = maze.render();
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2 * 6 + 1);
        assert!(lines.iter().all(|line| line.len() == 4 * 6 + 1));
        assert_eq!(lines[0], "+---+---+---+---+---+---+");
        assert_eq!(*lines.last().unwrap(), "+---+---+---+---+---+---+");
    }

    #[test]
    fn replaying_the_solution_solves() {
        for seed in 0..25 {
            let maze = seeded(2 + seed as usize % 9, seed);
            let solution = maze.solution().expect("no route from start to end");
            assert!(maze.solve(tokens(&solution)));

            let blocks = maze.solution_blocks().unwrap();
            assert!(maze.solve_blocks(blocks.iter().map(|b| b.to_pair())));
        }
    }

    #[test]
    fn too_short_or_too_long_is_not_solved() {
        let maze = seeded(7, 3);
        let solution = maze.solution().unwrap();

        let short = tokens(&solution[..solution.len() - 1]);
        assert_eq!(maze.traverse(&short).map(|_| ()), Ok(()));
        assert!(!maze.solve(&short));

        let mut long = tokens(&solution);
        let last = *solution.last().unwrap();
        long.push(last.opposite().to_string());
        assert!(!maze.solve(&long));
    }

    #[test]
    fn blocked_first_move_fails() {
        for seed in 0..10 {
            let maze = seeded(5, seed);
            let start_mask = maze.grid().cell(maze.start()).unwrap();
            let blocked = Direction::ALL
                .iter()
                .find(|d| start_mask & d.bits() == 0)
                .expect("corner start cannot be open on every side");
            assert!(!maze.solve(vec![blocked.to_string()]));
            match maze.traverse(vec![blocked.to_string()]) {
                Err(MoveError::BlockedMove { position: 0, coord, direction }) => {
                    assert_eq!(coord, maze.start());
                    assert_eq!(direction, *blocked);
                }
                other => panic!("expected a blocked first move, got {:?}", other),
            }
        }
    }

    #[test]
    fn invalid_token_fails() {
        let maze = seeded(4, 8);
        let first = maze.solution().unwrap()[0];
        assert!(!maze.solve(vec![first.to_string(), String::from("x")]));
        assert_eq!(maze.traverse(vec![first.to_string(), String::from("x")]),
                   Err(MoveError::InvalidToken {
                       position: 1,
                       token: String::from("x"),
                   }));
    }

    #[test]
    fn zero_and_negative_blocks_add_nothing() {
        let maze = seeded(6, 12);
        let mut blocks = vec![(0, String::from("x")), (-2, String::from("u"))];
        blocks.extend(maze.solution_blocks().unwrap().iter().map(|b| b.to_pair()));
        assert!(maze.solve_blocks(blocks));
    }

    #[test]
    fn invalid_token_in_a_block_fails() {
        let maze = seeded(5, 4);
        let blocks = vec![(2, String::from("x"))];
        assert!(!maze.solve_blocks(blocks.clone()));
        match maze.traverse_blocks(blocks) {
            Err(MoveError::InvalidToken { position: 0, ref token }) => assert_eq!(token, "x"),
            other => panic!("expected an invalid first token, got {:?}", other),
        }
    }

    #[test]
    fn padded_token_is_not_a_move() {
        let maze = seeded(5, 4);
        let first = maze.solution().unwrap()[0];
        let padded = format!(" {} ", first);
        assert!(!maze.solve(vec![padded.clone()]));
        assert_eq!(maze.traverse(vec![padded.clone()]),
                   Err(MoveError::InvalidToken { position: 0, token: padded }));
    }

    #[test]
    fn marks_start_and_end() {
        let maze = seeded(5, 21);
        let rendered = maze.render_with(&StartEndPointsDisplay::new(maze.start(), maze.end()));
        assert_eq!(rendered.matches(" S ").count(), 1);
        assert_eq!(rendered.matches(" E ").count(), 1);
        assert_eq!(rendered.len(), maze.render().len());
    }

    #[test]
    fn mazes_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Maze>();
    }

    #[test]
    fn every_cell_visited_property() {
        fn prop(side: u8, row: u8, col: u8, seed: u64) -> bool {
            let side = side as usize % 20 + 1;
            let maze = MazeBuilder::new(side)
                .start(row as usize % side, col as usize % side)
                .seed(seed)
                .build()
                .unwrap();
            let grid = maze.grid();
            side == 1 || grid.iter().all(|coord| grid.cell(coord) != Some(0))
        }
        quickcheck(prop as fn(u8, u8, u8, u64) -> bool);
    }

    #[test]
    fn spanning_tree_property() {
        fn prop(side: u8, seed: u64) -> bool {
            let side = side as usize % 16 + 1;
            let maze = seeded(side, seed);
            let graph = passage_graph(&maze);
            graph.edge_count() == side * side - 1 &&
            connected_components(&graph) == 1 &&
            !is_cyclic_undirected(&graph)
        }
        quickcheck(prop as fn(u8, u64) -> bool);
    }

    #[test]
    fn start_end_distinct_property() {
        fn prop(side: u8, row: u8, col: u8, seed: u64) -> bool {
            let side = side as usize % 20 + 1;
            let maze = MazeBuilder::new(side)
                .start(row as usize % side, col as usize % side)
                .seed(seed)
                .build()
                .unwrap();
            (side == 1) == (maze.start() == maze.end())
        }
        quickcheck(prop as fn(u8, u8, u8, u64) -> bool);
    }

    #[test]
    fn solution_solves_property() {
        fn prop(side: u8, seed: u64) -> bool {
            let maze = seeded(side as usize % 20 + 1, seed);
            maze.solution().map_or(false, |moves| maze.solve(tokens(&moves)))
        }
        quickcheck(prop as fn(u8, u64) -> bool);
    }
}
