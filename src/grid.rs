use std::fmt;
use std::slice;

use crate::cells::{CoordinateSmallVec, Direction, DirectionSmallVec, GridCoordinate};
use crate::units::{CellsCount, PassagesCount, RowIndex, SideLength};

/// Square grid of cells where each cell is the bitmask of the directions it has a passage in.
///
/// A value of 0 means the cell has no passages at all, which during generation means the cell
/// has not been visited yet.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    side_length: SideLength,
    cells: Vec<u8>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CarveError {
    /// The cell carved from is not on the grid.
    InvalidGridCoordinate,
    /// The passage would lead off the edge of the grid.
    OutOfBounds,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Grid :: side_length: {:?}, passages: {:?}, cells: {:?}",
               self.side_length,
               self.passages_count(),
               self.to_rows())
    }
}

impl Grid {
    /// A grid with every cell walled off.
    pub fn new(side_length: SideLength) -> Grid {
        let CellsCount(cells_count) = side_length.cells();
        Grid {
            side_length,
            cells: vec![0; cells_count],
        }
    }

    #[inline]
    pub fn side_length(&self) -> SideLength {
        self.side_length
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Is the signed row/column pair on the grid.
    #[inline]
    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        let side = self.side_length.0 as isize;
        0 <= row && row < side && 0 <= col && col < side
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        coord.row < self.side_length.0 && coord.col < self.side_length.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row * self.side_length.0 + coord.col)
        } else {
            None
        }
    }

    /// The passage bitmask of a cell.
    #[inline]
    pub fn cell(&self, coord: GridCoordinate) -> Option<u8> {
        self.grid_coordinate_to_index(coord).map(|index| self.cells[index])
    }

    #[inline]
    pub fn is_unvisited(&self, coord: GridCoordinate) -> bool {
        self.cell(coord) == Some(0)
    }

    /// Does the cell have a passage leading out in `direction`.
    /// Off grid coordinates have no passages.
    #[inline]
    pub fn has_passage(&self, coord: GridCoordinate, direction: Direction) -> bool {
        self.cell(coord).map_or(false, |mask| mask & direction.bits() != 0)
    }

    pub fn passage_directions(&self, coord: GridCoordinate) -> DirectionSmallVec {
        self.cell(coord).map(Direction::from_mask).unwrap_or_default()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: Direction)
                                  -> Option<GridCoordinate> {
        coord.offset(direction).filter(|&neighbour| self.is_valid_coordinate(neighbour))
    }

    /// Cells that are above, below, left or right of a particular cell, but not necessarily
    /// connected by a passage.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.neighbour_at_direction(coord, dir))
            .collect()
    }

    /// Cells reachable from a particular cell through one passage.
    /// Returns None if the coordinate is not on the grid.
    pub fn links(&self, coord: GridCoordinate) -> Option<CoordinateSmallVec> {
        self.cell(coord).map(|mask| {
            Direction::from_mask(mask)
                .iter()
                .filter_map(|&dir| self.neighbour_at_direction(coord, dir))
                .collect()
        })
    }

    /// Carve a two way passage from `coord` to its neighbour in `direction`, returning the
    /// neighbour.
    pub fn carve(&mut self,
                 coord: GridCoordinate,
                 direction: Direction)
                 -> Result<GridCoordinate, CarveError> {
        let index = self.grid_coordinate_to_index(coord)
            .ok_or(CarveError::InvalidGridCoordinate)?;
        let neighbour = self.neighbour_at_direction(coord, direction)
            .ok_or(CarveError::OutOfBounds)?;
        let neighbour_index = self.grid_coordinate_to_index(neighbour)
            .ok_or(CarveError::OutOfBounds)?;

        self.cells[index] |= direction.bits();
        self.cells[neighbour_index] |= direction.opposite().bits();
        Ok(neighbour)
    }

    #[inline]
    pub fn row(&self, row_index: RowIndex) -> Option<&[u8]> {
        let RowIndex(row) = row_index;
        let width = self.side_length.0;
        if row < width {
            Some(&self.cells[row * width..(row + 1) * width])
        } else {
            None
        }
    }

    /// Rows of cell bitmasks from top to bottom.
    #[inline]
    pub fn iter_rows(&self) -> slice::Chunks<u8> {
        // `chunks` panics on 0, an empty grid has no cells to chunk anyway.
        self.cells.chunks(self.side_length.0.max(1))
    }

    /// An owned copy of the grid as rows of cell bitmasks.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.iter_rows().map(|row| row.to_vec()).collect()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter {
            side_length: self.side_length,
            current_cell_number: 0,
            cells_count: self.size(),
        }
    }

    /// Every passage once, as the (upper or left cell, lower or right cell) pair it joins.
    pub fn iter_passages(&self) -> PassagesIter {
        PassagesIter {
            grid: self,
            cells: self.iter(),
            pending_down: None,
        }
    }

    pub fn passages_count(&self) -> PassagesCount {
        PassagesCount(self.iter_passages().count())
    }
}

#[derive(Clone, Debug)]
pub struct CellIter {
    side_length: SideLength,
    current_cell_number: usize,
    cells_count: usize,
}

impl Iterator for CellIter {
    type Item = GridCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = GridCoordinate::from_row_major_index(self.current_cell_number,
                                                             self.side_length);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

pub struct PassagesIter<'a> {
    grid: &'a Grid,
    cells: CellIter,
    pending_down: Option<(GridCoordinate, GridCoordinate)>,
}

impl<'a> Iterator for PassagesIter<'a> {
    type Item = (GridCoordinate, GridCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(passage) = self.pending_down.take() {
            return Some(passage);
        }

        let grid = self.grid;
        // Only Right and Down passages are reported so each two way passage appears once.
        while let Some(coord) = self.cells.next() {
            let passage_to = |dir| {
                if grid.has_passage(coord, dir) {
                    grid.neighbour_at_direction(coord, dir).map(|n| (coord, n))
                } else {
                    None
                }
            };
            let right = passage_to(Direction::Right);
            let down = passage_to(Direction::Down);

            match (right, down) {
                (Some(r), d) => {
                    self.pending_down = d;
                    return Some(r);
                }
                (None, Some(d)) => return Some(d),
                (None, None) => continue,
            }
        }
        None
    }
}

impl<'a> fmt::Debug for PassagesIter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PassagesIter :: cells iter : {:?}", self.cells)
    }
}
