use std::collections::HashSet;
use std::fmt;

use crate::cells::{Direction, GridCoordinate};
use crate::grid::Grid;
use crate::grid_traits::GridDisplay;
use crate::pathing::Distances;

const CORNER: &str = "+";
const WALL_UD: &str = "|";
const WALL_LR_3: &str = "---";
const OPEN_UD: &str = " ";
const OPEN_LR_3: &str = "   ";

/// Every cell body left blank.
#[derive(Debug, Copy, Clone, Default)]
pub struct BlankDisplay;
impl GridDisplay for BlankDisplay {}

impl GridDisplay for Distances {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if let Some(d) = self.distance_from_start_to(coord) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: HashSet<GridCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[GridCoordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start: GridCoordinate,
    end: GridCoordinate,
}
impl StartEndPointsDisplay {
    pub fn new(start: GridCoordinate, end: GridCoordinate) -> StartEndPointsDisplay {
        StartEndPointsDisplay { start, end }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if coord == self.start {
            String::from(" S ")
        } else if coord == self.end {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

/// Draw the walls of a grid as ASCII text.
///
/// ```text
/// +---+---+
/// |       |
/// +   +---+
/// |       |
/// +---+---+
/// ```
///
/// The outer boundary is always solid. Each row is a line of cell bodies with the wall to the
/// right of each cell, then a line with the wall below each cell. A wall is left out where the
/// cells on either side of it share a passage; checking both sides gives the same answer for a
/// carved grid as passages are always carved in matched pairs.
pub fn render_grid(grid: &Grid, displayer: &dyn GridDisplay) -> String {
    let side = grid.side_length().0;
    // Two lines per row plus the top boundary, each 4 glyphs per cell and a leading corner/wall.
    let mut output = String::with_capacity((2 * side + 1) * (4 * side + 2));

    output.push_str(CORNER);
    for _ in 0..side {
        output.push_str(WALL_LR_3);
        output.push_str(CORNER);
    }
    output.push('\n');

    let is_open = |coord: GridCoordinate, direction: Direction| {
        grid.has_passage(coord, direction) ||
        grid.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour| grid.has_passage(neighbour, direction.opposite()))
    };

    for row in 0..side {
        let mut row_middle_section_render = String::from(WALL_UD);
        let mut row_bottom_section_render = String::from(CORNER);

        for col in 0..side {
            let cell_coord = GridCoordinate::new(row, col);

            row_middle_section_render.push_str(&displayer.render_cell_body(cell_coord));
            row_middle_section_render.push_str(if is_open(cell_coord, Direction::Right) {
                OPEN_UD
            } else {
                WALL_UD
            });

            row_bottom_section_render.push_str(if is_open(cell_coord, Direction::Down) {
                OPEN_LR_3
            } else {
                WALL_LR_3
            });
            row_bottom_section_render.push_str(CORNER);
        }

        output.push_str(&row_middle_section_render);
        output.push('\n');
        output.push_str(&row_bottom_section_render);
        output.push('\n');
    }

    output
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", render_grid(self, &BlankDisplay))
    }
}
