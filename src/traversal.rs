use std::convert::TryFrom;
use std::error::Error;
use std::fmt;
use std::iter;

use itertools::Itertools;

use crate::cells::{Direction, GridCoordinate};
use crate::grid::Grid;

/// Why a sequence of player moves could not be followed.
#[derive(Eq, PartialEq, Clone, Debug)]
pub enum MoveError {
    /// The move at `position` is not one of `u`, `d`, `l` or `r`.
    InvalidToken { position: usize, token: String },
    /// The move at `position` walks into a wall of cell `coord`.
    BlockedMove {
        position: usize,
        coord: GridCoordinate,
        direction: Direction,
    },
}

impl MoveError {
    /// Index of the offending move in the (expanded) move sequence.
    pub fn position(&self) -> usize {
        match *self {
            MoveError::InvalidToken { position, .. } |
            MoveError::BlockedMove { position, .. } => position,
        }
    }
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MoveError::InvalidToken { position, ref token } => {
                write!(f,
                       "move {}: \"{}\" is not a direction, expected one of {}",
                       position,
                       token,
                       Direction::ALL.iter().map(|d| format!("\"{}\"", d)).join(", "))
            }
            MoveError::BlockedMove { position, coord, direction } => {
                write!(f, "move {}: wrong turn at {}, direction {}", position, coord, direction)
            }
        }
    }
}

impl Error for MoveError {}

/// A straight run of `count` moves in one direction.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct MoveBlock {
    pub count: usize,
    pub direction: Direction,
}

impl MoveBlock {
    pub fn new(count: usize, direction: Direction) -> MoveBlock {
        MoveBlock { count, direction }
    }

    /// The block as a `(count, token)` pair accepted by `traverse_blocks`.
    pub fn to_pair(&self) -> (i64, String) {
        (self.count as i64, self.direction.token().to_string())
    }
}

impl fmt::Display for MoveBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.count, self.direction)
    }
}

/// Follow `tokens` one cell at a time from `start`.
///
/// Stops at the first token that is not a direction or that would walk through a wall.
/// Returns the cell the moves finish on.
pub fn traverse<I, S>(grid: &Grid, start: GridCoordinate, tokens: I) -> Result<GridCoordinate, MoveError>
    where I: IntoIterator<Item = S>,
          S: AsRef<str>
{
    let mut current = start;
    for (position, token) in tokens.into_iter().enumerate() {
        let token = token.as_ref();
        let direction = Direction::from_token(token).ok_or_else(|| {
            MoveError::InvalidToken {
                position,
                token: token.to_string(),
            }
        })?;

        let blocked = move || MoveError::BlockedMove {
            position,
            coord: current,
            direction,
        };
        if !grid.has_passage(current, direction) {
            return Err(blocked());
        }
        current = grid.neighbour_at_direction(current, direction).ok_or_else(blocked)?;
    }
    Ok(current)
}

/// Expand `(count, token)` blocks into single moves, in block order.
/// A block with a count of zero or less adds no moves and its token is never looked at.
pub fn expand_blocks<I, S>(blocks: I) -> impl Iterator<Item = S>
    where I: IntoIterator<Item = (i64, S)>,
          S: Clone
{
    blocks.into_iter()
        .flat_map(|(count, token)| {
            let count = usize::try_from(count.max(0)).unwrap_or(usize::MAX);
            iter::repeat(token).take(count)
        })
}

/// Follow run length encoded moves from `start`, see `traverse`.
pub fn traverse_blocks<I, S>(grid: &Grid,
                             start: GridCoordinate,
                             blocks: I)
                             -> Result<GridCoordinate, MoveError>
    where I: IntoIterator<Item = (i64, S)>,
          S: AsRef<str> + Clone
{
    traverse(grid, start, expand_blocks(blocks))
}

/// Run length encode single cell moves, the inverse of `expand_blocks`.
pub fn compress_moves(moves: &[Direction]) -> Vec<MoveBlock> {
    moves.iter()
        .group_by(|&&dir| dir)
        .into_iter()
        .map(|(direction, run)| MoveBlock::new(run.count(), direction))
        .collect()
}
