// vim: set ai et ts=4 sts=4 sw=4:
use std::fmt;
use std::ops::Range;
use super::{Row, DirectionalSequence};
use super::super::grid::{Grid, SquareStatus::{CrossedOut, FilledIn, Unknown},
                         Change, Changes, ContradictionKind, Error};

/// The line inference rules. Each one looks at a single row or column and only ever
/// narrows run domains or turns unknown squares into known ones.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Rule {
    FillDomainCenters,
    IdentifyOwners,
    AnchorDomains,
    FillGaps,
    ShrinkWithinEmpties,
    ShrinkByNeighbors,
}
impl Rule {
    /// Order in which the rules are applied to a line during each pass.
    pub const PASS_ORDER: [Rule; 6] = [
        Rule::IdentifyOwners,
        Rule::AnchorDomains,
        Rule::FillGaps,
        Rule::ShrinkWithinEmpties,
        Rule::ShrinkByNeighbors,
        Rule::FillDomainCenters,
    ];
}
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Rule::FillDomainCenters   => "fill domain centers",
            Rule::IdentifyOwners      => "identify owners",
            Rule::AnchorDomains       => "anchor domains",
            Rule::FillGaps            => "fill gaps",
            Rule::ShrinkWithinEmpties => "shrink within empties",
            Rule::ShrinkByNeighbors   => "shrink by neighbors",
        })
    }
}

impl Row {
    pub fn apply_rule(&mut self, rule: Rule, grid: &mut Grid) -> Result<Changes, Error> {
        match rule {
            Rule::FillDomainCenters   => self.fill_domain_centers(grid),
            Rule::IdentifyOwners      => self.identify_owners(grid),
            Rule::AnchorDomains       => self.anchor_domains(grid),
            Rule::FillGaps            => self.fill_gaps(grid),
            Rule::ShrinkWithinEmpties => self.shrink_within_empties(grid),
            Rule::ShrinkByNeighbors   => self.shrink_by_neighbors(grid),
        }
    }

    fn record(&mut self, changes: Changes) -> Result<Changes, Error> {
        if !changes.is_empty() {
            self.dirty = true;
        }
        Ok(changes)
    }

    pub fn fill_domain_centers(&mut self, grid: &mut Grid) -> Result<Changes, Error>
    {
        let mut changes = Vec::<Change>::new();
        for run in &self.runs
        {
            let domain = run.domain;
            if domain.len() >= 2 * run.length {
                continue;
            }
            // wherever the run ends up within its domain, it covers this stretch
            let overlap_start = domain.end + 1 - run.length;
            let overlap_end   = domain.start + run.length - 1;
            for x in overlap_start..=overlap_end {
                let square = run.get_square_mut(grid, x);
                let status_change = square.set_status(FilledIn);
                let run_change = square.set_run_index(self.direction, run.index);

                if let Some(change) = status_change.map_err(|e| self.contradiction(Some(run.index), e))? {
                    changes.push(Change::from(change));
                }
                if let Some(change) = run_change.map_err(|e| self.contradiction(Some(run.index), e))? {
                    changes.push(Change::from(change));
                }
            }
        }
        self.record(changes)
    }

    pub fn identify_owners(&mut self, grid: &mut Grid) -> Result<Changes, Error>
    {
        // contiguous ("attached") sequences of filled in squares always belong to a single run.
        // if the sequence already has an owner, spread it over the whole sequence; otherwise look
        // for the runs whose domain could hold the entire sequence.
        let mut changes = Vec::<Change>::new();
        for range in self.filled_ranges(grid)
        {
            let mut owners = range.clone()
                                  .filter_map(|x| self.get_square(grid, x).get_run_index(self.direction))
                                  .collect::<Vec<_>>();
            owners.sort();
            owners.dedup();

            let owner = match owners.len() {
                0 => self.sequence_owner(&range)?,
                1 => Some(owners[0]),
                _ => {
                    let kind = ContradictionKind::MixedRuns { start: range.start, end: range.end-1 };
                    return Err(self.contradiction(None, kind));
                }
            };
            if let Some(run_index) = owner {
                for x in range {
                    let result = self.get_square_mut(grid, x).set_run_index(self.direction, run_index);
                    if let Some(change) = result.map_err(|e| self.contradiction(Some(run_index), e))? {
                        changes.push(Change::from(change));
                    }
                }
            }
        }
        self.record(changes)
    }

    fn sequence_owner(&self, seq: &Range<usize>) -> Result<Option<usize>, Error>
    {
        // runs that could contain the whole sequence: long enough, and with a domain that covers
        // both its first and last square
        let candidates = self.runs.iter()
                                  .filter(|run| run.length >= seq.len()
                                                && run.domain.contains(seq.start)
                                                && run.domain.contains(seq.end-1))
                                  .collect::<Vec<_>>();
        match candidates.len() {
            0 => Err(self.contradiction(None, ContradictionKind::Unclaimed { position: seq.start })),
            1 => Ok(Some(candidates[0].index)),
            _ => {
                // several candidates; only resolve when they unanimously put the sequence on the
                // same edge of their domains. every candidate domain starting right at the sequence
                // leaves no room for the later runs to reach back to it, and vice versa.
                if candidates.iter().all(|run| run.domain.start == seq.start) {
                    Ok(candidates.first().map(|run| run.index))
                } else if candidates.iter().all(|run| run.domain.end == seq.end-1) {
                    Ok(candidates.last().map(|run| run.index))
                } else {
                    Ok(None)
                }
            }
        }
    }

    pub fn anchor_domains(&mut self, grid: &mut Grid) -> Result<Changes, Error>
    {
        // a run of length L covering position p starts no earlier than p-L+1 and ends no later than p+L-1
        let mut changes = Vec::<Change>::new();
        for x in 0..self.length
        {
            let square = self.get_square(grid, x);
            if square.get_status() != FilledIn {
                continue;
            }
            if let Some(run_index) = square.get_run_index(self.direction) {
                let reach = self.runs[run_index].length as isize - 1;
                let at = x as isize;
                if let Some(change) = self.narrow_domain(run_index, at - reach, at + reach)? {
                    changes.push(change);
                }
            }
        }
        changes.extend(self.order_domains()?);
        self.record(changes)
    }

    pub fn fill_gaps(&mut self, grid: &mut Grid) -> Result<Changes, Error>
    {
        let mut changes = Vec::<Change>::new();
        for x in 0..self.length
        {
            if self.get_square(grid, x).get_status() != Unknown {
                continue;
            }
            if self.active_runs(x).is_empty() {
                let result = self.get_square_mut(grid, x).set_status(CrossedOut);
                if let Some(change) = result.map_err(|e| self.contradiction(None, e))? {
                    changes.push(Change::from(change));
                }
            }
        }
        self.record(changes)
    }

    /// Whether the given run could be placed starting at `start` given what is known
    /// about the squares of this row.
    pub fn run_fits_at(&self, grid: &Grid, run_index: usize, start: usize) -> bool
    {
        let length = self.runs[run_index].length;
        if start + length > self.length {
            return false;
        }
        let foreign = (start..start+length).any(|x| {
            let square = self.get_square(grid, x);
            match square.get_status() {
                CrossedOut => true,
                FilledIn   => square.get_run_index(self.direction)
                                    .map_or(false, |owner| owner != run_index),
                Unknown    => false,
            }
        });
        if foreign {
            return false;
        }
        // the run would merge with a filled in square right next to it
        let filled_before = start > 0 && self.get_square(grid, start-1).get_status() == FilledIn;
        let filled_after = start+length < self.length && self.get_square(grid, start+length).get_status() == FilledIn;
        !filled_before && !filled_after
    }

    pub fn shrink_within_empties(&mut self, grid: &mut Grid) -> Result<Changes, Error>
    {
        let mut changes = Vec::<Change>::new();
        for run_index in 0..self.runs.len()
        {
            let run = &self.runs[run_index];
            let (domain, length) = (run.domain, run.length);
            let placements = domain.start..=(domain.end + 1 - length);

            let first = placements.clone().find(|&start| self.run_fits_at(grid, run_index, start));
            let last = placements.rev().find(|&start| self.run_fits_at(grid, run_index, start));
            match (first, last) {
                (Some(first), Some(last)) => {
                    let end = last + length - 1;
                    if let Some(change) = self.narrow_domain(run_index, first as isize, end as isize)? {
                        changes.push(change);
                    }
                }
                _ => {
                    let kind = ContradictionKind::NoPlacement { start: domain.start, end: domain.end, length };
                    return Err(self.contradiction(Some(run_index), kind));
                }
            }
        }
        changes.extend(self.order_domains()?);
        self.record(changes)
    }

    pub fn shrink_by_neighbors(&mut self, _grid: &mut Grid) -> Result<Changes, Error>
    {
        let mut changes = Vec::<Change>::new();
        let count = self.runs.len();

        // L -> R: each run starts at least one gap after the earliest end of its predecessor
        for i in 1..count {
            let prev = &self.runs[i-1];
            let bound = (prev.domain.start + prev.length + 1) as isize;
            if let Some(change) = self.narrow_domain(i, bound, isize::MAX)? {
                changes.push(change);
            }
        }
        // R -> L: each run ends at least one gap before the latest start of its successor
        for i in (0..count.saturating_sub(1)).rev() {
            let next = &self.runs[i+1];
            let bound = next.domain.end as isize - next.length as isize - 1;
            if let Some(change) = self.narrow_domain(i, isize::MIN, bound)? {
                changes.push(change);
            }
        }
        self.record(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Domain, SquareStatus};
    use crate::util::Direction::*;

    fn line(length: usize, runs: &[usize]) -> (Row, Grid) {
        (Row::new(Horizontal, 0, length, runs).unwrap(), Grid::new(length, 1))
    }
    fn set(grid: &mut Grid, x: usize, status: SquareStatus) {
        grid.get_square_mut(x, 0).set_status(status).unwrap();
    }
    fn own(grid: &mut Grid, x: usize, run: usize) {
        set(grid, x, FilledIn);
        grid.get_square_mut(x, 0).set_run_index(Horizontal, run).unwrap();
    }
    fn statuses(grid: &Grid) -> String {
        grid.row_statuses(0).iter().map(|s| s.to_plain()).collect()
    }

    #[test]
    fn centers_of_long_runs_are_filled_and_owned() {
        let (mut row, mut grid) = line(10, &[8]);
        let changes = row.fill_domain_centers(&mut grid).unwrap();
        assert_eq!(statuses(&grid), "??######??");
        assert!((2..8).all(|x| grid.get_square(x, 0).get_run_index(Horizontal) == Some(0)));
        assert_eq!(changes.len(), 12);
        assert!(row.dirty);
    }

    #[test]
    fn short_runs_leave_centers_alone() {
        let (mut row, mut grid) = line(10, &[5]);
        assert!(row.fill_domain_centers(&mut grid).unwrap().is_empty());
        assert!(!row.dirty);
    }

    #[test]
    fn crossed_out_center_is_a_contradiction() {
        let (mut row, mut grid) = line(5, &[4]);
        set(&mut grid, 2, CrossedOut);
        match row.fill_domain_centers(&mut grid) {
            Err(Error::Contradiction(c)) => assert_eq!(c.run_index, Some(0)),
            other => panic!("expected contradiction, got {:?}", other),
        }
    }

    #[test]
    fn single_active_run_becomes_owner() {
        let (mut row, mut grid) = line(10, &[1, 3]);
        // domains: [0, 5] and [2, 9]
        set(&mut grid, 8, FilledIn);
        set(&mut grid, 3, FilledIn);
        row.identify_owners(&mut grid).unwrap();
        assert_eq!(grid.get_square(8, 0).get_run_index(Horizontal), Some(1));
        assert_eq!(grid.get_square(3, 0).get_run_index(Horizontal), None);
    }

    #[test]
    fn long_sequence_excludes_short_runs() {
        let (mut row, mut grid) = line(10, &[1, 3]);
        set(&mut grid, 3, FilledIn);
        set(&mut grid, 4, FilledIn);
        row.identify_owners(&mut grid).unwrap();
        assert_eq!(grid.get_square(3, 0).get_run_index(Horizontal), Some(1));
        assert_eq!(grid.get_square(4, 0).get_run_index(Horizontal), Some(1));
    }

    #[test]
    fn owner_spreads_over_attached_squares() {
        let (mut row, mut grid) = line(10, &[1, 3]);
        own(&mut grid, 4, 1);
        set(&mut grid, 3, FilledIn);
        let changes = row.identify_owners(&mut grid).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(grid.get_square(3, 0).get_run_index(Horizontal), Some(1));
    }

    #[test]
    fn ambiguous_owner_is_left_unresolved() {
        let (mut row, mut grid) = line(5, &[1, 1]);
        // domains: [0, 2] and [2, 4]; square 2 ends the first and starts the second
        set(&mut grid, 2, FilledIn);
        assert!(row.identify_owners(&mut grid).unwrap().is_empty());
        assert_eq!(grid.get_square(2, 0).get_run_index(Horizontal), None);
    }

    #[test]
    fn unanimous_start_edge_picks_leftmost_run() {
        let (mut row, mut grid) = line(5, &[1, 1]);
        row.narrow_domain(0, 2, 2).unwrap();
        set(&mut grid, 2, FilledIn);
        row.identify_owners(&mut grid).unwrap();
        assert_eq!(grid.get_square(2, 0).get_run_index(Horizontal), Some(0));
    }

    #[test]
    fn unanimous_end_edge_picks_rightmost_run() {
        let (mut row, mut grid) = line(5, &[1, 1]);
        row.narrow_domain(1, 2, 2).unwrap();
        set(&mut grid, 2, FilledIn);
        row.identify_owners(&mut grid).unwrap();
        assert_eq!(grid.get_square(2, 0).get_run_index(Horizontal), Some(1));
    }

    #[test]
    fn differently_owned_attached_squares_are_a_contradiction() {
        let (mut row, mut grid) = line(5, &[1, 1]);
        own(&mut grid, 1, 0);
        own(&mut grid, 2, 1);
        assert!(matches!(row.identify_owners(&mut grid), Err(Error::Contradiction(_))));
    }

    #[test]
    fn filled_square_outside_every_domain_is_a_contradiction() {
        let (mut row, mut grid) = line(6, &[2]);
        row.narrow_domain(0, 0, 2).unwrap();
        set(&mut grid, 5, FilledIn);
        match row.identify_owners(&mut grid) {
            Err(Error::Contradiction(c)) => assert_eq!(c.kind, ContradictionKind::Unclaimed { position: 5 }),
            other => panic!("expected contradiction, got {:?}", other),
        }
    }

    #[test]
    fn owned_square_anchors_its_run() {
        let (mut row, mut grid) = line(10, &[3]);
        own(&mut grid, 5, 0);
        row.anchor_domains(&mut grid).unwrap();
        assert_eq!(row.runs[0].domain, Domain::new(3, 7));
    }

    #[test]
    fn anchoring_one_run_keeps_its_neighbours_in_order() {
        let (mut row, mut grid) = line(10, &[2, 2]);
        // domains: [0, 6] and [3, 9]
        own(&mut grid, 3, 1);
        let changes = row.anchor_domains(&mut grid).unwrap();
        assert_eq!(row.runs[1].domain, Domain::new(3, 4));
        assert_eq!(row.runs[0].domain, Domain::new(0, 4));
        assert_eq!(changes.len(), 2);

        let (mut row, mut grid) = line(10, &[2, 2]);
        own(&mut grid, 6, 0);
        row.anchor_domains(&mut grid).unwrap();
        assert_eq!(row.runs[0].domain, Domain::new(5, 6));
        assert_eq!(row.runs[1].domain, Domain::new(5, 9));
    }

    #[test]
    fn uncovered_squares_are_crossed_out() {
        let (mut row, mut grid) = line(10, &[2]);
        row.narrow_domain(0, 3, 6).unwrap();
        row.fill_gaps(&mut grid).unwrap();
        assert_eq!(statuses(&grid), "...????...");
    }

    #[test]
    fn runs_do_not_fit_over_crossed_out_squares() {
        let (mut row, mut grid) = line(10, &[3]);
        set(&mut grid, 2, CrossedOut);
        set(&mut grid, 8, CrossedOut);
        row.shrink_within_empties(&mut grid).unwrap();
        assert_eq!(row.runs[0].domain, Domain::new(3, 7));
    }

    #[test]
    fn runs_do_not_touch_filled_neighbors() {
        let (mut row, mut grid) = line(3, &[1]);
        set(&mut grid, 1, FilledIn);
        row.shrink_within_empties(&mut grid).unwrap();
        assert_eq!(row.runs[0].domain, Domain::new(1, 1));
    }

    #[test]
    fn runs_do_not_fit_over_foreign_squares() {
        let (mut row, mut grid) = line(7, &[2, 2]);
        // domains: [0, 3] and [3, 6]
        own(&mut grid, 3, 1);
        row.shrink_within_empties(&mut grid).unwrap();
        assert_eq!(row.runs[0].domain, Domain::new(0, 1));
    }

    #[test]
    fn run_without_placement_is_a_contradiction() {
        let (mut row, mut grid) = line(5, &[3]);
        set(&mut grid, 1, CrossedOut);
        set(&mut grid, 3, CrossedOut);
        match row.shrink_within_empties(&mut grid) {
            Err(Error::Contradiction(c)) => assert_eq!(c.run_index, Some(0)),
            other => panic!("expected contradiction, got {:?}", other),
        }
    }

    #[test]
    fn neighbors_push_each_other_apart() {
        let (mut row, mut grid) = line(10, &[2, 2]);
        // domains: [0, 6] and [3, 9]
        row.narrow_domain(0, 2, 6).unwrap();
        row.narrow_domain(1, 3, 7).unwrap();
        row.shrink_by_neighbors(&mut grid).unwrap();
        assert_eq!(row.runs[0].domain, Domain::new(2, 4));
        assert_eq!(row.runs[1].domain, Domain::new(5, 7));
    }

    #[test]
    fn pass_order_ends_with_center_filling() {
        assert_eq!(Rule::PASS_ORDER.len(), 6);
        assert_eq!(Rule::PASS_ORDER[0], Rule::IdentifyOwners);
        assert_eq!(Rule::PASS_ORDER[5], Rule::FillDomainCenters);
        assert_eq!(Rule::AnchorDomains.to_string(), "anchor domains");
    }
}
