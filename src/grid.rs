// vim: set ai et ts=4 sts=4:
use std::fmt;
use std::error;
use std::convert::From;
use super::util::{Direction, Direction::*};

pub trait HasGridLocation {
    fn get_row(&self) -> usize;
    fn get_col(&self) -> usize;
    fn fmt_location(&self) -> String {
        format!("(col={:-2}, row={:-2})", self.get_col(), self.get_row())
    }
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum SquareStatus {
    FilledIn,
    CrossedOut,
    Unknown,
}
impl SquareStatus {
    pub fn is_known(&self) -> bool {
        *self != SquareStatus::Unknown
    }
    pub fn to_emoji(&self) -> &'static str {
        match *self {
            SquareStatus::FilledIn   => "\u{2B1B}",    // black large square
            SquareStatus::CrossedOut => "\u{2B1C}",    // white large square
            SquareStatus::Unknown    => "\u{1F7E7}",   // orange square
        }
    }
    pub fn to_plain(&self) -> char {
        match *self {
            SquareStatus::FilledIn   => '#',
            SquareStatus::CrossedOut => '.',
            SquareStatus::Unknown    => '?',
        }
    }
}
impl fmt::Display for SquareStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match *self {
            SquareStatus::FilledIn   => "FilledIn",
            SquareStatus::CrossedOut => "CrossedOut",
            SquareStatus::Unknown    => "Unknown",
        })
    }
}

// ------------------------------------------------

#[derive(PartialEq, Debug, Clone)]
pub struct StatusChange {
    pub row: usize,
    pub col: usize,
    pub old: SquareStatus,
    pub new: SquareStatus,
}
impl StatusChange {
    pub fn new(row: usize, col: usize, old: SquareStatus, new: SquareStatus) -> Self {
        Self { row, col, old, new }
    }
}
impl HasGridLocation for StatusChange {
    fn get_row(&self) -> usize { self.row }
    fn get_col(&self) -> usize { self.col }
}
impl fmt::Display for StatusChange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Change: in square {}, status was changed from {} to {}",
            self.fmt_location(),
            self.old,
            self.new)
    }
}

// ------------------------------------------------

#[derive(PartialEq, Debug, Clone)]
pub struct RunChange {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub old: Option<usize>,
    pub new: usize,
}
impl RunChange {
    pub fn new(row: usize, col: usize, direction: Direction, old: Option<usize>, new: usize) -> Self {
        Self { row, col, direction, old, new }
    }
}
impl HasGridLocation for RunChange {
    fn get_row(&self) -> usize { self.row }
    fn get_col(&self) -> usize { self.col }
}
impl fmt::Display for RunChange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Change: in square {}, {} run index was changed from {} to {}",
            self.fmt_location(),
            self.direction,
            fmt_run_index(self.old),
            self.new)
    }
}

// ------------------------------------------------

/// Inclusive range of positions within a line that a run may still occupy.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Domain {
    pub start: usize,
    pub end: usize,
}
impl Domain {
    pub fn new(start: usize, end: usize) -> Self {
        Domain { start, end }
    }
    pub fn len(&self) -> usize {
        if self.end < self.start { 0 } else { self.end - self.start + 1 }
    }
    pub fn contains(&self, at: usize) -> bool {
        self.start <= at && at <= self.end
    }
    /// Whether this domain lies entirely within `other`.
    pub fn is_within(&self, other: &Domain) -> bool {
        other.start <= self.start && self.end <= other.end
    }
}
impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct DomainChange {
    pub direction: Direction,
    pub row_index: usize,
    pub run_index: usize,
    pub old: Domain,
    pub new: Domain,
}
impl fmt::Display for DomainChange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Change: in {} {}, domain of run #{} was narrowed from {} to {}",
            self.direction.line_name(),
            self.row_index,
            self.run_index,
            self.old,
            self.new)
    }
}

// ------------------------------------------------

#[derive(PartialEq, Debug, Clone)]
pub enum Change {
    Status(StatusChange),
    Run(RunChange),
    Domain(DomainChange),
}
impl From<StatusChange> for Change {
    fn from(other: StatusChange) -> Self {
        Change::Status(other)
    }
}
impl From<RunChange> for Change {
    fn from(other: RunChange) -> Self {
        Change::Run(other)
    }
}
impl From<DomainChange> for Change {
    fn from(other: DomainChange) -> Self {
        Change::Domain(other)
    }
}
impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Change::Status(x) => write!(f, "{}", x),
            Change::Run(x)    => write!(f, "{}", x),
            Change::Domain(x) => write!(f, "{}", x),
        }
    }
}
pub type Changes = Vec<Change>;

// ------------------------------------------------

#[derive(PartialEq, Debug, Clone)]
pub enum StatusError {
    ChangeRejected(StatusChange, String),  // new status conflicts with existing (non-unknown) status
}
impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StatusError::ChangeRejected(change, msg) =>
                write!(f, "StatusError: In {}, attempt to change status from {} to {} was rejected: {}",
                    change.fmt_location(), change.old, change.new, msg),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum RunError {
    ChangeRejected(RunChange, String), // new run assignment conflicts with existing one
    NotFilledIn(RunChange),            // can't assign a run to a square that's not filled in
}
impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunError::ChangeRejected(change, msg) =>
                write!(f, "RunError: In {}, attempt to change {} run index from {} to {} was rejected: {}",
                    change.fmt_location(), change.direction, fmt_run_index(change.old), change.new, msg),
            RunError::NotFilledIn(change) =>
                write!(f, "RunError: In {}, cannot set {} run index to {}: square is not filled in",
                    change.fmt_location(), change.direction, change.new),
        }
    }
}

pub type StatusResult = Result<Option<StatusChange>, StatusError>; // if it worked: the change, if any; if it didn't, the change that was rejected
pub type RunResult    = Result<Option<RunChange>, RunError>; // ditto

/// What went wrong when a line turned out to be unsatisfiable.
#[derive(PartialEq, Debug, Clone)]
pub enum ContradictionKind {
    Status(StatusError),
    Run(RunError),
    DomainTooSmall { start: usize, end: usize, length: usize },
    NoPlacement { start: usize, end: usize, length: usize },
    Unclaimed { position: usize },
    MixedRuns { start: usize, end: usize },
}
impl From<StatusError> for ContradictionKind {
    fn from(other: StatusError) -> Self {
        ContradictionKind::Status(other)
    }
}
impl From<RunError> for ContradictionKind {
    fn from(other: RunError) -> Self {
        ContradictionKind::Run(other)
    }
}
impl fmt::Display for ContradictionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContradictionKind::Status(x) => write!(f, "{}", x),
            ContradictionKind::Run(x)    => write!(f, "{}", x),
            ContradictionKind::DomainTooSmall { start, end, length } =>
                write!(f, "domain [{}, {}] cannot hold a run of length {}", start, end, length),
            ContradictionKind::NoPlacement { start, end, length } =>
                write!(f, "no placement of a run of length {} within [{}, {}] avoids crossed out and foreign squares", length, start, end),
            ContradictionKind::Unclaimed { position } =>
                write!(f, "filled in square at position {} is not covered by any run", position),
            ContradictionKind::MixedRuns { start, end } =>
                write!(f, "contiguous filled in squares {}..={} are owned by different runs", start, end),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Contradiction {
    pub direction: Direction,
    pub row_index: usize,
    pub run_index: Option<usize>,
    pub kind: ContradictionKind,
}
impl fmt::Display for Contradiction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Contradiction in {} {}", self.direction.line_name(), self.row_index)?;
        if let Some(run) = self.run_index {
            write!(f, ", run #{}", run)?;
        }
        write!(f, ": {}", self.kind)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum Error {
    InvalidClues { direction: Direction, row_index: usize, required: usize, available: usize },
    Contradiction(Contradiction),
    Format(String),
}
impl From<Contradiction> for Error {
    fn from(other: Contradiction) -> Self {
        Error::Contradiction(other)
    }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidClues { direction, row_index, required, available } =>
                write!(f, "Invalid clues for {} {}: runs need {} squares but only {} are available",
                    direction.line_name(), row_index, required, available),
            Error::Contradiction(x) => write!(f, "{}", x),
            Error::Format(s)        => write!(f, "Format error: {}", s),
        }
    }
}
impl error::Error for Error {}

fn fmt_run_index(index: Option<usize>) -> String {
    match index {
        Some(x) => x.to_string(),
        None    => "None".to_string(),
    }
}

// ------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Square {
    row: usize,
    col: usize,
    status: SquareStatus,
    hrun_index: Option<usize>, // index of run in horizontal row that this square belongs to
    vrun_index: Option<usize>, // ...             vertical   ...
}
impl Square {
    pub fn new(x: usize, y: usize) -> Square {
        Square {
            row: y,
            col: x,
            status: SquareStatus::Unknown,
            hrun_index: None,
            vrun_index: None,
        }
    }

    pub fn get_row(&self) -> usize { self.row }
    pub fn get_col(&self) -> usize { self.col }
    pub fn get_status(&self) -> SquareStatus { self.status }

    pub fn set_status(&mut self, new_status: SquareStatus) -> StatusResult {
        let cand_change = StatusChange::new(self.row, self.col, self.status, new_status);
        self.apply_status_change(cand_change)
    }

    pub fn get_run_index(&self, direction: Direction) -> Option<usize> {
        match direction {
            Horizontal => self.hrun_index,
            Vertical   => self.vrun_index,
        }
    }
    pub fn set_run_index(&mut self, direction: Direction, new_index: usize)
        -> RunResult
    {
        let cand_change = RunChange::new(self.row, self.col, direction, self.get_run_index(direction), new_index);
        self.apply_run_change(cand_change)
    }
    pub fn apply_status_change(&mut self, cand_change: StatusChange)
        -> StatusResult
    {
        // once known, a square's status can only be confirmed, never changed or reverted
        if self.status != SquareStatus::Unknown && self.status != cand_change.new {
            let msg = match cand_change.new {
                SquareStatus::Unknown => "known status cannot revert to unknown",
                _                     => "conflicting information",
            };
            return Err(StatusError::ChangeRejected(cand_change, msg.to_string()));
        }
        if self.status != cand_change.new {
            self.status = cand_change.new;
            return Ok(Some(cand_change));
        }
        Ok(None)
    }
    pub fn apply_run_change(&mut self, cand_change: RunChange)
        -> RunResult
    {
        if self.status != SquareStatus::FilledIn {
            return Err(RunError::NotFilledIn(cand_change))
        }
        let field = match cand_change.direction {
            Horizontal => &mut self.hrun_index,
            Vertical   => &mut self.vrun_index,
        };
        match *field {
            Some(x) if x == cand_change.new => Ok(None),
            Some(_) => Err(RunError::ChangeRejected(cand_change, "conflicting information".to_string())),
            None    => {
                *field = Some(cand_change.new);
                Ok(Some(cand_change))
            }
        }
    }

    pub fn fmt_visual(&self) -> &str {
        match self.status {
            SquareStatus::CrossedOut => " ",
            SquareStatus::FilledIn   => "\u{25A0}",
            SquareStatus::Unknown    => ".",
        }
    }
}
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.fmt_visual())
    }
}
impl HasGridLocation for Square {
    fn get_row(&self) -> usize { self.row }
    fn get_col(&self) -> usize { self.col }
}

// ------------------------------------------------

/// Flat store of all squares in the puzzle, addressed by (x = column, y = row).
#[derive(Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    squares: Vec<Square>,
}
impl Grid {
    pub fn new(width: usize, height: usize)
        -> Self
    {
        Grid {
            width,
            height,
            squares: (0..height).flat_map(|y| (0..width).map(move |x| Square::new(x, y)))
                                .collect(),
        }
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn get_square(&self, x: usize, y: usize) -> &Square {
        &self.squares[y * self.width + x]
    }
    pub fn get_square_mut(&mut self, x: usize, y: usize) -> &mut Square {
        &mut self.squares[y * self.width + x]
    }
    pub fn status(&self, row: usize, col: usize) -> SquareStatus {
        self.get_square(col, row).get_status()
    }
    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter()
    }
    pub fn row_statuses(&self, y: usize) -> Vec<SquareStatus> {
        (0..self.width).map(|x| self.status(y, x)).collect()
    }
    pub fn statuses(&self) -> Vec<Vec<SquareStatus>> {
        (0..self.height).map(|y| self.row_statuses(y)).collect()
    }
    pub fn count_unknown(&self) -> usize {
        self.squares.iter().filter(|sq| !sq.get_status().is_known()).count()
    }
    pub fn is_solved(&self) -> bool {
        self.count_unknown() == 0
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid(w={}, h={})", self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::SquareStatus::*;

    #[test]
    fn status_can_be_set_once_and_confirmed() {
        let mut sq = Square::new(2, 1);
        let change = sq.set_status(FilledIn).unwrap();
        assert_eq!(change, Some(StatusChange::new(1, 2, Unknown, FilledIn)));
        assert_eq!(sq.set_status(FilledIn), Ok(None));
        assert_eq!(sq.get_status(), FilledIn);
    }

    #[test]
    fn conflicting_status_is_rejected() {
        let mut sq = Square::new(0, 0);
        sq.set_status(CrossedOut).unwrap();
        assert!(matches!(sq.set_status(FilledIn), Err(StatusError::ChangeRejected(_, _))));
        assert!(matches!(sq.set_status(Unknown), Err(StatusError::ChangeRejected(_, _))));
        assert_eq!(sq.get_status(), CrossedOut);
    }

    #[test]
    fn run_index_requires_filled_in_square() {
        let mut sq = Square::new(0, 0);
        assert!(matches!(sq.set_run_index(Horizontal, 0), Err(RunError::NotFilledIn(_))));
        sq.set_status(FilledIn).unwrap();
        assert!(sq.set_run_index(Horizontal, 1).unwrap().is_some());
        assert_eq!(sq.set_run_index(Horizontal, 1), Ok(None));
        assert!(matches!(sq.set_run_index(Horizontal, 2), Err(RunError::ChangeRejected(_, _))));
        // the other axis is tracked separately
        assert!(sq.set_run_index(Vertical, 2).unwrap().is_some());
        assert_eq!(sq.get_run_index(Horizontal), Some(1));
        assert_eq!(sq.get_run_index(Vertical), Some(2));
    }

    #[test]
    fn grid_is_addressed_by_column_then_row() {
        let mut grid = Grid::new(3, 2);
        grid.get_square_mut(2, 1).set_status(FilledIn).unwrap();
        assert_eq!(grid.status(1, 2), FilledIn);
        assert_eq!(grid.get_square(2, 1).get_row(), 1);
        assert_eq!(grid.get_square(2, 1).get_col(), 2);
        assert_eq!(grid.count_unknown(), 5);
        assert_eq!(grid.statuses()[1], vec![Unknown, Unknown, FilledIn]);
    }

    #[test]
    fn empty_grid_has_no_squares() {
        let grid = Grid::new(0, 0);
        assert!(grid.is_solved());
        assert!(grid.statuses().is_empty());
    }

    #[test]
    fn domain_length_and_containment() {
        let d = Domain::new(2, 5);
        assert_eq!(d.len(), 4);
        assert!(d.contains(2) && d.contains(5));
        assert!(!d.contains(1) && !d.contains(6));
        assert!(Domain::new(3, 4).is_within(&d));
        assert!(!Domain::new(1, 4).is_within(&d));
    }
}
