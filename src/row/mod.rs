// vim: set ai et ts=4 sw=4 sts=4:
pub mod solver;

use std::fmt;
use std::ops::Range;
use ansi_term::{Colour, Style, ANSIString};

use super::util::{Direction, Direction::*};
use super::grid::{Grid, Square, SquareStatus::{CrossedOut, FilledIn}, Domain, DomainChange,
                  Change, Changes, Contradiction, ContradictionKind, Error};

pub use self::solver::Rule;

pub trait DirectionalSequence
{
    fn get_row_index(&self) -> usize;
    fn get_direction(&self) -> Direction;

    fn square_index(&self, at: usize) -> (usize, usize) {
        match self.get_direction() {
            Horizontal => (at, self.get_row_index()),
            Vertical   => (self.get_row_index(), at),
        }
    }
    fn get_square<'a>(&self, grid: &'a Grid, index: usize) -> &'a Square {
        let (x,y) = self.square_index(index);
        grid.get_square(x, y)
    }
    fn get_square_mut<'a>(&self, grid: &'a mut Grid, index: usize) -> &'a mut Square {
        let (x,y) = self.square_index(index);
        grid.get_square_mut(x, y)
    }
}

/// A single row or column of the puzzle: its clue runs and their domains.
/// The squares themselves live in the `Grid`; a `Row` only knows where to find them.
#[derive(Debug, Clone)]
pub struct Row {
    pub direction:  Direction,
    pub index:      usize,
    pub length:     usize,
    pub runs:       Vec<Run>,
    pub dirty:      bool,
}

impl Row {
    /// Builds the line and computes the initial domain of each run by sliding all runs
    /// to the left edge (earliest starts) and to the right edge (latest ends).
    /// Zero-length runs are dropped, so `[0]` describes an empty line.
    pub fn new(direction: Direction,
               row_index: usize,
               row_length: usize,
               run_lengths: &[usize]) -> Result<Self, Error>
    {
        let lengths = run_lengths.iter()
                                 .cloned()
                                 .filter(|&len| len > 0)
                                 .collect::<Vec<_>>();

        let required = Self::required_length(&lengths);
        if required > row_length {
            return Err(Error::InvalidClues {
                direction,
                row_index,
                required,
                available: row_length,
            });
        }

        let mut space_before: usize = 0;
        let mut space_after: usize = required + 1; // +1 for the trailing gap subtracted by the first run
        let mut runs = Vec::<Run>::with_capacity(lengths.len());
        for (i, &len) in lengths.iter().enumerate() {
            space_after -= len + 1;
            let domain = Domain::new(space_before, row_length - space_after - 1);
            runs.push(Run::new(direction, i, row_index, len, domain));
            space_before += len + 1;
        }

        Ok(Row {
            direction,
            index:  row_index,
            length: row_length,
            runs,
            dirty:  false,
        })
    }

    /// Number of squares the given runs occupy when packed with single gaps.
    pub fn required_length(run_lengths: &[usize]) -> usize {
        if run_lengths.is_empty() {
            return 0;
        }
        run_lengths.iter().sum::<usize>() + run_lengths.len() - 1
    }

    pub fn is_trivially_empty(&self) -> bool {
        self.runs.is_empty()
    }
    pub fn is_completed(&self, grid: &Grid) -> bool {
        (0..self.length).all(|x| self.get_square(grid, x).get_status().is_known())
    }

    /// Crosses out every square of a line that has no runs at all.
    pub fn clear_if_empty(&mut self, grid: &mut Grid) -> Result<Changes, Error> {
        let mut changes = Vec::<Change>::new();
        if !self.is_trivially_empty() {
            return Ok(changes);
        }
        for x in 0..self.length {
            let result = self.get_square_mut(grid, x).set_status(CrossedOut);
            if let Some(change) = result.map_err(|e| self.contradiction(None, e))? {
                changes.push(Change::from(change));
            }
        }
        Ok(changes)
    }

    pub fn domains(&self) -> Vec<Domain> {
        self.runs.iter().map(|run| run.domain).collect()
    }

    /// Indices of the runs whose domain covers the given position.
    pub fn active_runs(&self, position: usize) -> Vec<usize> {
        self.runs.iter()
                 .filter(|run| run.domain.contains(position))
                 .map(|run| run.index)
                 .collect()
    }

    pub fn filled_ranges(&self, grid: &Grid) -> Vec<Range<usize>> {
        self.ranges_of_squares(grid, |sq| sq.get_status() == FilledIn)
    }

    fn ranges_of_squares<P>(&self, grid: &Grid, pred: P) -> Vec<Range<usize>>
        where P: Fn(&Square) -> bool
    {
        // given a predicate on a square, returns a set of mutually exclusive ranges within this row
        // for which the predicate holds for all squares in that range.
        let mut result = Vec::<Range<usize>>::new();
        let mut x: usize = 0;
        while x < self.length {
            // skip past squares for which the predicate does not hold
            while x < self.length && !pred(self.get_square(grid, x)) {
                x += 1;
            }
            if x >= self.length { break; }

            // skip past squares for which the predicate does hold
            let range_start = x;
            x += 1; // we already tested the predicate on x at the end of the previous loop
            while x < self.length && pred(self.get_square(grid, x)) {
                x += 1;
            }
            result.push(range_start..x);

            x += 1;
        }
        result
    }

    /// Intersects a run's domain with `[start, end]`. Bounds may fall outside of the row;
    /// a result too small to hold the run is a contradiction.
    pub fn narrow_domain(&mut self, run_index: usize, start: isize, end: isize)
        -> Result<Option<Change>, Error>
    {
        let run = &self.runs[run_index];
        let old = run.domain;
        let new_start = start.max(old.start as isize);
        let new_end = end.min(old.end as isize);
        if new_end - new_start + 1 < run.length as isize {
            // bounds are clamped to the row so the message never shows negative squares
            let last = self.length as isize - 1;
            let kind = ContradictionKind::DomainTooSmall {
                start:  new_start.max(0).min(last) as usize,
                end:    new_end.max(0).min(last) as usize,
                length: run.length,
            };
            return Err(self.contradiction(Some(run_index), kind));
        }

        let new = Domain::new(new_start as usize, new_end as usize);
        if new == old {
            return Ok(None);
        }
        self.runs[run_index].domain = new;
        Ok(Some(Change::from(DomainChange {
            direction: self.direction,
            row_index: self.index,
            run_index,
            old,
            new,
        })))
    }

    /// Keeps successive domains weakly ordered after some of them were narrowed on their own:
    /// no run starts before its predecessor does, and none ends after its successor does.
    pub fn order_domains(&mut self) -> Result<Changes, Error> {
        let mut changes = Vec::<Change>::new();
        for i in 1..self.runs.len() {
            let bound = self.runs[i-1].domain.start as isize;
            if let Some(change) = self.narrow_domain(i, bound, isize::MAX)? {
                changes.push(change);
            }
        }
        for i in (0..self.runs.len().saturating_sub(1)).rev() {
            let bound = self.runs[i+1].domain.end as isize;
            if let Some(change) = self.narrow_domain(i, isize::MIN, bound)? {
                changes.push(change);
            }
        }
        Ok(changes)
    }

    pub fn contradiction<K>(&self, run_index: Option<usize>, kind: K) -> Error
        where K: Into<ContradictionKind>
    {
        Error::from(Contradiction {
            direction: self.direction,
            row_index: self.index,
            run_index,
            kind: kind.into(),
        })
    }
}
impl DirectionalSequence for Row {
    fn get_row_index(&self) -> usize { self.index }
    fn get_direction(&self) -> Direction { self.direction }
}
impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.direction.line_name(), self.index)
    }
}

// -------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Run {
    pub direction: Direction,
    pub length: usize,
    pub index: usize,
    pub row_index: usize,
    pub domain: Domain,
}

impl Run {
    pub fn new(direction: Direction,
               index: usize,
               row_index: usize,
               length: usize,
               domain: Domain) -> Self
    {
        Run {
            direction,
            length,
            index,
            row_index,
            domain,
        }
    }
    /// A run is completed once its domain has shrunk to exactly its own length.
    pub fn is_completed(&self) -> bool {
        self.domain.len() == self.length
    }
    pub fn to_colored_string(&self) -> ANSIString<'static> {
        let style = match self.is_completed() {
            true  => Style::new().fg(Colour::Fixed(241)),
            false => Style::default(),
        };
        style.paint(self.to_string())
    }
}
impl DirectionalSequence for Run {
    fn get_row_index(&self) -> usize { self.row_index }
    fn get_direction(&self) -> Direction { self.direction }
}
impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(row: &Row) -> Vec<(usize, usize)> {
        row.domains().iter().map(|d| (d.start, d.end)).collect()
    }

    #[test]
    fn initial_domains_come_from_left_and_right_packing() {
        let row = Row::new(Horizontal, 0, 10, &[3, 1, 2]).unwrap();
        // leftmost packing: 0..3, 4, 6..8; rightmost packing: 2..5, 6, 8..10
        assert_eq!(domains(&row), vec![(0, 4), (4, 6), (6, 9)]);
    }

    #[test]
    fn exact_fit_gives_exact_domains() {
        let row = Row::new(Vertical, 2, 5, &[1, 1, 1]).unwrap();
        assert_eq!(domains(&row), vec![(0, 0), (2, 2), (4, 4)]);
        assert!(row.runs.iter().all(|r| r.is_completed()));
    }

    #[test]
    fn zero_runs_are_dropped() {
        let row = Row::new(Horizontal, 0, 4, &[0]).unwrap();
        assert!(row.is_trivially_empty());
        let row = Row::new(Horizontal, 0, 4, &[]).unwrap();
        assert!(row.is_trivially_empty());
    }

    #[test]
    fn oversized_clue_is_invalid() {
        let err = Row::new(Horizontal, 0, 4, &[5]).unwrap_err();
        assert_eq!(err, Error::InvalidClues { direction: Horizontal, row_index: 0, required: 5, available: 4 });
        assert!(Row::new(Vertical, 1, 4, &[2, 2]).is_err());
        assert!(Row::new(Vertical, 1, 5, &[2, 2]).is_ok());
    }

    #[test]
    fn empty_line_is_crossed_out() {
        let mut grid = Grid::new(3, 2);
        let mut row = Row::new(Horizontal, 1, 3, &[]).unwrap();
        let changes = row.clear_if_empty(&mut grid).unwrap();
        assert_eq!(changes.len(), 3);
        assert!(row.is_completed(&grid));
        assert_eq!(grid.row_statuses(1), vec![CrossedOut; 3]);
        assert_eq!(grid.row_statuses(0), vec![crate::grid::SquareStatus::Unknown; 3]);
    }

    #[test]
    fn narrowing_below_run_length_is_a_contradiction() {
        let mut row = Row::new(Horizontal, 3, 6, &[3]).unwrap();
        assert!(row.narrow_domain(0, 1, 10).unwrap().is_some());
        assert_eq!(row.narrow_domain(0, 0, 10).unwrap(), None);
        match row.narrow_domain(0, 3, 4) {
            Err(Error::Contradiction(c)) => {
                assert_eq!(c.row_index, 3);
                assert_eq!(c.run_index, Some(0));
            }
            other => panic!("expected contradiction, got {:?}", other),
        }
        // a failed narrowing leaves the domain untouched
        assert_eq!(domains(&row), vec![(1, 5)]);
    }

    #[test]
    fn contradictory_bounds_are_reported_within_the_row() {
        let mut row = Row::new(Horizontal, 0, 6, &[2]).unwrap();
        match row.narrow_domain(0, -5, -1) {
            Err(Error::Contradiction(c)) => {
                assert_eq!(c.kind, ContradictionKind::DomainTooSmall { start: 0, end: 0, length: 2 });
                assert!(!c.to_string().contains('-'));
            }
            other => panic!("expected contradiction, got {:?}", other),
        }
        match row.narrow_domain(0, 9, isize::MAX) {
            Err(Error::Contradiction(c)) =>
                assert_eq!(c.kind, ContradictionKind::DomainTooSmall { start: 5, end: 5, length: 2 }),
            other => panic!("expected contradiction, got {:?}", other),
        }
    }

    #[test]
    fn ordering_pulls_neighbouring_domains_in_line() {
        let mut row = Row::new(Horizontal, 0, 12, &[2, 2, 2]).unwrap();
        // domains: [0, 5], [3, 8] and [6, 11]
        row.narrow_domain(1, 7, 8).unwrap();
        row.narrow_domain(0, 0, 1).unwrap();
        let changes = row.order_domains().unwrap();
        // run 2 may not start before run 1; run 0 already ends before run 1
        assert_eq!(domains(&row), vec![(0, 1), (7, 8), (7, 11)]);
        assert_eq!(changes.len(), 1);
        assert!(row.order_domains().unwrap().is_empty());
    }

    #[test]
    fn active_runs_follow_domains() {
        let row = Row::new(Horizontal, 0, 7, &[2, 2]).unwrap();
        // domains: [0, 3] and [3, 6]
        assert_eq!(row.active_runs(0), vec![0]);
        assert_eq!(row.active_runs(3), vec![0, 1]);
        assert_eq!(row.active_runs(6), vec![1]);
    }
}
