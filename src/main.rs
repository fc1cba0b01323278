use bitmask_mazes::{
    errors::{Error as MazeError, ErrorKind as MazeErrorKind},
    grid_displays::{BlankDisplay, PathDisplay, StartEndPointsDisplay},
    grid_traits::GridDisplay,
    pathing,
    Maze,
    MazeBuilder,
};
use docopt::Docopt;
use log::info;
use serde_derive::Deserialize;
use std::{fs::File, io, io::prelude::*};

const USAGE: &str = "Maze driver

Usage:
    maze_driver -h | --help
    maze_driver [options]
    maze_driver solve [options] [--] <move>...
    maze_driver solve-blocks [options] [--] <block>...

Moves are single letters u, d, l or r. Blocks are a count then a move, e.g. 3r.
Pass the same --seed (and --size, --start-row, --start-col) used to draw a maze to solve it.

Options:
    -h --help              Show this screen.
    --size=<n>             The maze is n * n cells [default: 5].
    --start-row=<r>        Row of the start cell [default: 0].
    --start-col=<c>        Column of the start cell [default: 0].
    --seed=<s>             Seed for a reproducible maze. Random if not given.
    --mark-start-end       Draw an 'S' (start) and 'E' (end) in the start and end cells.
    --show-path            Mark the route from the start to the end with dots.
    --show-distances       Show the distance from the start to every cell, in hexadecimal.
    --text-out=<path>      Output file path for the text rendering of the maze.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based row major vertex indices.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_size: i64,
    flag_start_row: i64,
    flag_start_col: i64,
    flag_seed: Option<u64>,
    flag_mark_start_end: bool,
    flag_show_path: bool,
    flag_show_distances: bool,
    flag_text_out: String,
    flag_save_edges: String,
    cmd_solve: bool,
    cmd_solve_blocks: bool,
    arg_move: Vec<String>,
    arg_block: Vec<String>,
}

mod errors {
    use error_chain::*;
    error_chain! {
        links {
            Maze(::bitmask_mazes::errors::Error, ::bitmask_mazes::errors::ErrorKind);
        }

        foreign_links {
            Io(::std::io::Error);
        }

        errors {
            InvalidBlock(block: String) {
                description("invalid move block")
                display("invalid move block \"{}\", expected a count then a move such as 3r", block)
            }
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let maze = maze_from_args(&args)?;
    info!("maze seed {}", maze.seed());

    if args.cmd_solve {
        report_outcome(&maze, maze.traverse(&args.arg_move));
        return Ok(());
    }
    if args.cmd_solve_blocks {
        let blocks = args.arg_block
            .iter()
            .map(|block| parse_block(block))
            .collect::<Result<Vec<_>>>()?;
        report_outcome(&maze, maze.traverse_blocks(blocks));
        return Ok(());
    }

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze, &args.flag_save_edges)?;
    }

    let rendered = render_from_args(&maze, &args);
    if args.flag_text_out.is_empty() {
        print!("{}", rendered);
    } else {
        write_text_to_file(&rendered, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

/// Negative sizes and coordinates get through docopt, the maze library never sees them.
fn maze_from_args(args: &MazeArgs) -> Result<Maze> {
    if args.flag_size < 1 {
        return Err(MazeError::from(MazeErrorKind::InvalidDimension(args.flag_size)).into());
    }
    let side_length = args.flag_size as usize;
    if args.flag_start_row < 0 || args.flag_start_col < 0 {
        let kind = MazeErrorKind::InvalidStart(args.flag_start_row, args.flag_start_col, side_length);
        return Err(MazeError::from(kind).into());
    }

    let mut builder = MazeBuilder::new(side_length)
        .start(args.flag_start_row as usize, args.flag_start_col as usize);
    if let Some(seed) = args.flag_seed {
        builder = builder.seed(seed);
    }
    Ok(builder.build()?)
}

/// Pick how cell bodies are drawn. Distances win over the path, the path over start/end marks.
fn render_from_args(maze: &Maze, maze_args: &MazeArgs) -> String {
    let distances = pathing::Distances::new(maze.grid(), maze.start());

    let path_display = if maze_args.flag_show_path {
        distances.as_ref()
            .and_then(|d| pathing::shortest_path(maze.grid(), d, maze.end()))
            .map(|path| PathDisplay::new(&path))
    } else {
        None
    };
    let start_end_display = StartEndPointsDisplay::new(maze.start(), maze.end());

    let displayer: &dyn GridDisplay = match (maze_args.flag_show_distances, &distances, &path_display) {
        (true, Some(d), _) => d,
        (_, _, Some(p)) => p,
        _ if maze_args.flag_mark_start_end => &start_end_display,
        _ => &BlankDisplay,
    };
    maze.render_with(displayer)
}

fn report_outcome(maze: &Maze, outcome: ::std::result::Result<bitmask_mazes::GridCoordinate, bitmask_mazes::MoveError>) {
    match outcome {
        Ok(finish) if finish == maze.end() => println!("solved"),
        Ok(finish) => println!("not solved, stopped at {} but the end is {}", finish, maze.end()),
        Err(e) => println!("not solved, {}", e),
    }
}

/// Split a `<count><move>` block such as `3r` or `-1u`.
fn parse_block(block: &str) -> Result<(i64, String)> {
    let invalid = || ErrorKind::InvalidBlock(block.to_string());
    let split = block.find(|c: char| !(c.is_ascii_digit() || c == '-'))
        .ok_or_else(invalid)?;
    let (count, token) = block.split_at(split);
    let count = count.parse::<i64>().chain_err(invalid)?;
    Ok((count, token.to_string()))
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze: &Maze, file_path: &str) -> Result<()> {
    let grid = maze.grid();
    let mut graph_data = String::new();
    graph_data.push_str(&format!("{} {}\n", grid.size(), grid.passages_count().0));

    for (src, dst) in grid.iter_passages() {
        let indices = (grid.grid_coordinate_to_index(src), grid.grid_coordinate_to_index(dst));
        if let (Some(index_a), Some(index_b)) = indices {
            graph_data.push_str(&format!("{} {}\n", index_a + 1, index_b + 1));
        }
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
