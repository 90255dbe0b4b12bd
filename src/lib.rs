// vim: set ai et ts=4 sts=4 sw=4:
//! Nonogram solver based on line constraint propagation.
//!
//! Every row and column keeps, for each of its runs, the range of squares the run may still
//! occupy. A fixed set of line rules narrows those ranges and marks squares as filled in or
//! crossed out until a full pass over all rows and columns changes nothing. There is no
//! search: puzzles that need guessing end as a partial solution with unknown squares left.
pub mod util;
pub mod grid;
pub mod row;
pub mod puzzle;
pub mod observer;
pub mod format;

pub use self::grid::{Grid, Square, SquareStatus, Error};
pub use self::puzzle::{Puzzle, derive_clues};
pub use self::puzzle::solver::{Solver, SolverState, Outcome};
pub use self::observer::{SolveObserver, LogObserver, Silent};

/// Solves a puzzle given its row and column clues, returning the final grid and whether
/// propagation resolved every square.
pub fn solve(row_run_lengths: &[Vec<usize>], col_run_lengths: &[Vec<usize>])
    -> Result<(Grid, Outcome), Error>
{
    let puzzle = Puzzle::new(row_run_lengths, col_run_lengths)?;
    let mut solver = Solver::new(puzzle)?;
    let outcome = solver.solve()?;
    Ok((solver.into_puzzle().grid, outcome))
}
