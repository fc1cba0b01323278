// Create the Error, ErrorKind, ResultExt, and Result types.
// Only maze construction can fail this way; a bad move while solving is an ordinary
// `traversal::MoveError` value, not an error chain.
use error_chain::*;

error_chain! {
    errors {
        InvalidDimension(side_length: i64) {
            description("invalid maze side length")
            display("invalid maze side length {}, it must be at least 1 and its cell count must fit in memory", side_length)
        }
        InvalidStart(row: i64, col: i64, side_length: usize) {
            description("maze start is not on the grid")
            display("start [{}, {}] is outside a maze of side length {}", row, col, side_length)
        }
    }
}
