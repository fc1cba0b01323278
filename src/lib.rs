//! **bitmask_mazes** generates perfect square mazes stored as a grid of direction bitmasks,
//! checks a player's moves through them and draws them as text.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_traits;
pub mod maze;
pub mod pathing;
pub mod traversal;
pub mod units;

pub use crate::cells::{Direction, GridCoordinate};
pub use crate::maze::{Maze, MazeBuilder};
pub use crate::traversal::{MoveBlock, MoveError};
