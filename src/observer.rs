// vim: set ai et ts=4 sts=4 sw=4:
use log::{debug, info, trace, warn};

use super::grid::{Change, Error};
use super::row::{Row, Rule};
use super::puzzle::solver::Outcome;

/// Hooks the solver calls while it propagates. Every hook defaults to doing nothing.
pub trait SolveObserver {
    fn pass_started(&mut self, _pass: usize) {}
    fn rule_applied(&mut self, _rule: Rule, _row: &Row, _changes: &[Change]) {}
    fn contradiction(&mut self, _error: &Error) {}
    fn converged(&mut self, _passes: usize, _outcome: &Outcome) {}
}

/// Observer that reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;
impl SolveObserver for Silent {}

/// Forwards solver events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;
impl SolveObserver for LogObserver {
    fn pass_started(&mut self, pass: usize) {
        debug!("starting pass {}", pass);
    }
    fn rule_applied(&mut self, rule: Rule, row: &Row, changes: &[Change]) {
        if changes.is_empty() {
            return;
        }
        debug!("{}: {} made {} change(s)", row, rule, changes.len());
        for change in changes {
            trace!("  {}", change);
        }
    }
    fn contradiction(&mut self, error: &Error) {
        warn!("{}", error);
    }
    fn converged(&mut self, passes: usize, outcome: &Outcome) {
        info!("converged after {} pass(es): {}", passes, outcome);
    }
}
