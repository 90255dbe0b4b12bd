// vim: set ai et ts=4 sts=4 sw=4:
use std::fmt;
use super::Puzzle;
use super::super::row::Rule;
use super::super::util::Direction;
use super::super::grid::{Changes, Error};
use super::super::observer::{SolveObserver, Silent};

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum SolverState {
    Running,
    Converged,
    Aborted,   // a contradiction was found; nothing more will be inferred
}

/// Result of a run that reached its fixed point.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Outcome {
    Solved,
    Partial { unknown: usize },
}
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Solved             => write!(f, "solved"),
            Outcome::Partial { unknown } => write!(f, "partial solution, {} square(s) left unknown", unknown),
        }
    }
}

/// Everything one line changed while it had its turn.
#[derive(Debug, Clone)]
pub struct LineStep {
    pub direction: Direction,
    pub index: usize,
    pub changes: Changes,
}

/// Fixed-point driver: applies the line rules to every row, then every column, and
/// repeats until a whole pass changes nothing. Iterating over the solver single-steps
/// it one line at a time.
pub struct Solver {
    pub puzzle: Puzzle,
    pub iterations: usize,
    state: SolverState,
    cursor: usize,
    error: Option<Error>,
    observer: Box<dyn SolveObserver>,
}

impl Solver {
    pub fn new(puzzle: Puzzle) -> Result<Self, Error> {
        Self::with_observer(puzzle, Box::new(Silent))
    }

    /// Sets up the solver and fills the overlapping centers of every run once.
    pub fn with_observer(puzzle: Puzzle, observer: Box<dyn SolveObserver>) -> Result<Self, Error> {
        let mut solver = Solver {
            puzzle,
            iterations: 0,
            state: SolverState::Running,
            cursor: 0,
            error: None,
            observer,
        };
        for line in 0..solver.puzzle.line_count() {
            solver.apply(line, &[Rule::FillDomainCenters])?;
        }
        if solver.puzzle.line_count() == 0 {
            solver.state = SolverState::Converged;
        }
        Ok(solver)
    }

    pub fn state(&self) -> SolverState { self.state }
    pub fn error(&self) -> Option<&Error> { self.error.as_ref() }
    pub fn into_puzzle(self) -> Puzzle { self.puzzle }

    pub fn outcome(&self) -> Outcome {
        match self.puzzle.grid.count_unknown() {
            0       => Outcome::Solved,
            unknown => Outcome::Partial { unknown },
        }
    }

    /// Runs to the fixed point. Unknown squares left at that point are reported as a
    /// partial solution; a contradiction aborts the run.
    pub fn solve(&mut self) -> Result<Outcome, Error> {
        while let Some(step) = self.next() {
            step?;
        }
        match &self.error {
            Some(e) => Err(e.clone()),
            None    => Ok(self.outcome()),
        }
    }

    /// Runs the remainder of the current pass, or one full pass when the solver is
    /// idle or already converged, and returns what it changed.
    pub fn pass(&mut self) -> Result<Changes, Error> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        if self.puzzle.line_count() == 0 {
            return Ok(Vec::new());
        }
        let pass = self.iterations;
        let mut changes = Vec::new();
        while self.iterations == pass {
            changes.extend(self.step()?.changes);
        }
        Ok(changes)
    }

    fn step(&mut self) -> Result<LineStep, Error> {
        if self.cursor == 0 {
            self.observer.pass_started(self.iterations + 1);
            for row in self.puzzle.rows.iter_mut().chain(self.puzzle.cols.iter_mut()) {
                row.dirty = false;
            }
        }

        let line = self.cursor;
        let changes = self.apply(line, &Rule::PASS_ORDER)?;
        let (direction, index) = {
            let row = self.puzzle.line(line);
            (row.direction, row.index)
        };

        self.cursor += 1;
        if self.cursor == self.puzzle.line_count() {
            self.cursor = 0;
            self.iterations += 1;
            if self.puzzle.lines().any(|row| row.dirty) {
                self.state = SolverState::Running;
            } else {
                self.state = SolverState::Converged;
                let outcome = self.outcome();
                self.observer.converged(self.iterations, &outcome);
            }
        }
        Ok(LineStep { direction, index, changes })
    }

    fn apply(&mut self, line: usize, rules: &[Rule]) -> Result<Changes, Error> {
        let (row, grid) = self.puzzle.line_mut(line);
        let mut changes = Vec::new();
        for &rule in rules {
            match row.apply_rule(rule, grid) {
                Ok(rule_changes) => {
                    self.observer.rule_applied(rule, row, &rule_changes);
                    changes.extend(rule_changes);
                }
                Err(e) => {
                    self.observer.contradiction(&e);
                    self.state = SolverState::Aborted;
                    self.error = Some(e.clone());
                    return Err(e);
                }
            }
        }
        Ok(changes)
    }
}

impl Iterator for Solver {
    type Item = Result<LineStep, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            SolverState::Running => Some(self.step()),
            _                    => None,
        }
    }
}

impl fmt::Debug for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Solver(state={:?}, iterations={}, {:?})", self.state, self.iterations, self.puzzle.grid)
    }
}
