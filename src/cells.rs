use smallvec::SmallVec;
use std::convert::From;
use std::fmt;

use crate::units::SideLength;

pub type DirectionSmallVec = SmallVec<[Direction; 4]>;
pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

/// One of the four passage directions out of a square cell.
///
/// Each direction is a distinct bit so a cell stores every open passage as the bitwise OR
/// of its directions.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 1,
    Down = 2,
    Left = 4,
    Right = 8,
}

// Lookup tables indexed by `Direction::index`, i.e. the bit position of the direction.
const OPPOSITES: [Direction; 4] = [Direction::Down, Direction::Up, Direction::Right, Direction::Left];
const ROW_DELTAS: [isize; 4] = [-1, 1, 0, 0];
const COLUMN_DELTAS: [isize; 4] = [0, 0, -1, 1];
const TOKENS: [char; 4] = ['u', 'd', 'l', 'r'];

impl Direction {
    /// Every direction in the fixed order used wherever iteration order must not depend on
    /// randomness: Up, Down, Left, Right.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    #[inline]
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Bit position of the direction, 0..4.
    #[inline]
    pub fn index(self) -> usize {
        self.bits().trailing_zeros() as usize
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        OPPOSITES[self.index()]
    }

    #[inline]
    pub fn row_delta(self) -> isize {
        ROW_DELTAS[self.index()]
    }

    #[inline]
    pub fn column_delta(self) -> isize {
        COLUMN_DELTAS[self.index()]
    }

    /// The single letter a player types for this direction.
    #[inline]
    pub fn token(self) -> char {
        TOKENS[self.index()]
    }

    /// Decode a player move token: `u`, `d`, `l` or `r`, ignoring case. Anything else,
    /// padded tokens included, is not a move.
    pub fn from_token(token: &str) -> Option<Direction> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                let lower = c.to_ascii_lowercase();
                TOKENS.iter().position(|&t| t == lower).map(|i| Direction::ALL[i])
            }
            _ => None,
        }
    }

    /// The directions set in a cell's bitmask, in `Direction::ALL` order.
    pub fn from_mask(mask: u8) -> DirectionSmallVec {
        Direction::ALL
            .iter()
            .cloned()
            .filter(|dir| mask & dir.bits() != 0)
            .collect()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub row: usize,
    pub col: usize,
}

impl GridCoordinate {
    pub fn new(row: usize, col: usize) -> GridCoordinate {
        GridCoordinate { row, col }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, side_length: SideLength) -> GridCoordinate {
        let SideLength(width) = side_length;
        GridCoordinate::new(index / width, index % width)
    }

    /// Offset by one cell in `dir`.
    /// Returns None if the result would have a negative row or column; the upper grid bound is
    /// not checked here.
    pub fn offset(&self, dir: Direction) -> Option<GridCoordinate> {
        let row = self.row as isize + dir.row_delta();
        let col = self.col as isize + dir.column_delta();
        if row >= 0 && col >= 0 {
            Some(GridCoordinate::new(row as usize, col as usize))
        } else {
            None
        }
    }

    /// The direction of a single step from `self` to an adjacent `other`, if they are adjacent.
    pub fn direction_to(&self, other: GridCoordinate) -> Option<Direction> {
        Direction::ALL
            .iter()
            .cloned()
            .find(|&dir| self.offset(dir) == Some(other))
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}
