// vim: set ai et ts=4 sw=4 sts=4:
pub mod solver;
mod display;

use super::grid::{Grid, Square, SquareStatus, Error};
use super::util::Direction::*;
use super::row::Row;

pub use self::display::Style;

#[derive(Debug, Clone)]
pub struct Puzzle {
    pub rows: Vec<Row>,
    pub cols: Vec<Row>,
    pub grid: Grid,
}

impl Puzzle {
    /// Allocates the grid and the row and column views over it. Fails when a clue
    /// cannot fit in its line; lines without runs are crossed out right away.
    pub fn new(row_run_lengths: &[Vec<usize>],
               col_run_lengths: &[Vec<usize>]) -> Result<Self, Error>
    {
        let width = col_run_lengths.len();
        let height = row_run_lengths.len();

        let rows = row_run_lengths.iter()
                                  .enumerate()
                                  .map(|(y, runs)| Row::new(Horizontal, y, width, runs))
                                  .collect::<Result<Vec<_>, _>>()?;
        let cols = col_run_lengths.iter()
                                  .enumerate()
                                  .map(|(x, runs)| Row::new(Vertical, x, height, runs))
                                  .collect::<Result<Vec<_>, _>>()?;
        let mut puzzle = Puzzle {
            rows,
            cols,
            grid: Grid::new(width, height),
        };
        for row in puzzle.rows.iter_mut().chain(puzzle.cols.iter_mut()) {
            row.clear_if_empty(&mut puzzle.grid)?;
        }
        Ok(puzzle)
    }
    pub fn width(&self) -> usize { self.grid.width() }
    pub fn height(&self) -> usize { self.grid.height() }
    pub fn get_square(&self, x: usize, y: usize) -> &Square {
        self.grid.get_square(x, y)
    }
    pub fn status(&self, row: usize, col: usize) -> SquareStatus {
        self.grid.status(row, col)
    }

    /// All lines in solving order: rows first, then columns.
    pub fn lines(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().chain(self.cols.iter())
    }
    pub fn line_count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }
    pub fn line(&self, index: usize) -> &Row {
        match index < self.rows.len() {
            true  => &self.rows[index],
            false => &self.cols[index - self.rows.len()],
        }
    }
    /// The line at the given solving-order index, together with the grid it works on.
    pub fn line_mut(&mut self, index: usize) -> (&mut Row, &mut Grid) {
        let Puzzle { rows, cols, grid } = self;
        let row = match index < rows.len() {
            true  => &mut rows[index],
            false => &mut cols[index - rows.len()],
        };
        (row, grid)
    }

    /// Number of known squares that differ from the expected solution. Unknown squares
    /// are not counted; compare `grid.count_unknown()` for those.
    pub fn count_mismatches(&self, expected: &[Vec<bool>]) -> usize {
        self.grid.squares()
                 .filter(|sq| {
                     let filled = expected.get(sq.get_row())
                                          .and_then(|row| row.get(sq.get_col()))
                                          .cloned()
                                          .unwrap_or(false);
                     match sq.get_status() {
                         SquareStatus::FilledIn   => !filled,
                         SquareStatus::CrossedOut => filled,
                         SquareStatus::Unknown    => false,
                     }
                 })
                 .count()
    }
}

/// Run-length encodes a solved grid (rows of filled flags) into its row and column clues.
pub fn derive_clues(solution: &[Vec<bool>]) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
    let width = solution.iter().map(|row| row.len()).max().unwrap_or(0);
    let rows = solution.iter()
                       .map(|row| run_lengths(row.iter().cloned()))
                       .collect();
    let cols = (0..width).map(|x| run_lengths(solution.iter()
                                                      .map(|row| row.get(x).cloned().unwrap_or(false))))
                         .collect();
    (rows, cols)
}

fn run_lengths<I>(squares: I) -> Vec<usize>
    where I: Iterator<Item = bool>
{
    let mut result = Vec::<usize>::new();
    let mut current: usize = 0;
    for filled in squares {
        if filled {
            current += 1;
        } else if current > 0 {
            result.push(current);
            current = 0;
        }
    }
    if current > 0 {
        result.push(current);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::SquareStatus::*;

    #[test]
    fn rows_and_columns_share_squares() {
        let mut puzzle = Puzzle::new(&[vec![1], vec![]], &[vec![], vec![1], vec![]]).unwrap();
        assert_eq!((puzzle.width(), puzzle.height()), (3, 2));
        // the empty second row and the empty outer columns are crossed out at construction
        assert_eq!(puzzle.grid.row_statuses(1), vec![CrossedOut; 3]);
        assert_eq!(puzzle.status(0, 0), CrossedOut);
        assert_eq!(puzzle.status(0, 1), Unknown);

        let (col, grid) = puzzle.line_mut(3);
        assert_eq!(col.direction, Vertical);
        assert_eq!(col.index, 1);
        grid.get_square_mut(1, 0).set_status(FilledIn).unwrap();
        assert_eq!(puzzle.line(0).to_string(), "row 0");
        assert_eq!(puzzle.status(0, 1), FilledIn);
    }

    #[test]
    fn oversized_clue_is_rejected_before_solving() {
        let err = Puzzle::new(&[vec![5]], &[vec![1], vec![1], vec![1], vec![1]]).unwrap_err();
        assert_eq!(err, Error::InvalidClues { direction: Horizontal, row_index: 0, required: 5, available: 4 });
    }

    #[test]
    fn clues_are_run_length_encoded() {
        let solution = vec![
            vec![true,  true,  false, true ],
            vec![false, false, false, false],
            vec![true,  false, true,  true ],
        ];
        let (rows, cols) = derive_clues(&solution);
        assert_eq!(rows, vec![vec![2, 1], vec![], vec![1, 2]]);
        assert_eq!(cols, vec![vec![1, 1], vec![1], vec![1], vec![1, 1]]);
    }

    #[test]
    fn mismatches_ignore_unknown_squares() {
        let mut puzzle = Puzzle::new(&[vec![1]], &[vec![1], vec![]]).unwrap();
        assert_eq!(puzzle.count_mismatches(&[vec![true, false]]), 0);
        puzzle.grid.get_square_mut(0, 0).set_status(CrossedOut).unwrap();
        assert_eq!(puzzle.count_mismatches(&[vec![true, false]]), 1);
    }
}
