//! This module provides checks that flag suspicious but legal configurations in a loaded
//! [`Program`]: a start state the first step cannot leave, a halt state nothing leads to,
//! entries that can never be used, and initial tape symbols no entry reads.
//!
//! None of these prevent execution. A machine can legitimately be written to fail or to
//! run forever, so diagnostics are reported to the caller rather than rejected.

use crate::types::{Program, ReadSymbol, State};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// A finding produced by [`analyze`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Diagnostic {
    /// The start state has no entries, so the first step always fails.
    StartStateUndefined(State),
    /// Entries are registered for the halt state, which never consults the table.
    HaltStateHasTransitions(State),
    /// No entry leads to the halt state, so the machine can never halt.
    HaltStateUnreachable(State),
    /// States with entries that cannot be reached from the start state.
    UnreachableStates(Vec<State>),
    /// Initial tape symbols that no exact entry reads, with no wildcard entry anywhere.
    UnhandledTapeSymbols(Vec<char>),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartStateUndefined(state) => {
                write!(f, "Start state {state} has no transitions")
            }
            Self::HaltStateHasTransitions(state) => {
                write!(f, "Halt state {state} has transitions that are never used")
            }
            Self::HaltStateUnreachable(state) => {
                write!(f, "No transition leads to halt state {state}")
            }
            Self::UnreachableStates(states) => {
                write!(f, "Unreachable states detected: {states:?}")
            }
            Self::UnhandledTapeSymbols(symbols) => write!(
                f,
                "Initial tape contains symbols not handled by any transition: {symbols:?}"
            ),
        }
    }
}

/// Analyzes a [`Program`] and returns every diagnostic found, in a fixed order.
///
/// A program that halts immediately (start state equals halt state) never consults its
/// table, so only the halt-state check applies to it.
pub fn analyze(program: &Program) -> Vec<Diagnostic> {
    if program.start_state == program.halt_state {
        return check_halt_state_entries(program).into_iter().collect();
    }

    [
        check_start_state,
        check_halt_state_entries,
        check_halt_state_reachable,
        check_unreachable_states,
        check_tape_symbols,
    ]
    .iter()
    .filter_map(|check| check(program))
    .collect()
}

fn check_start_state(program: &Program) -> Option<Diagnostic> {
    (!program.table.contains_state(program.start_state))
        .then_some(Diagnostic::StartStateUndefined(program.start_state))
}

fn check_halt_state_entries(program: &Program) -> Option<Diagnostic> {
    program
        .table
        .contains_state(program.halt_state)
        .then_some(Diagnostic::HaltStateHasTransitions(program.halt_state))
}

fn check_halt_state_reachable(program: &Program) -> Option<Diagnostic> {
    let reachable = reachable_states(program);
    (!reachable.contains(&program.halt_state))
        .then_some(Diagnostic::HaltStateUnreachable(program.halt_state))
}

/// Any state with entries that a traversal from the start state never visits.
fn check_unreachable_states(program: &Program) -> Option<Diagnostic> {
    let reachable = reachable_states(program);
    let unreachable: Vec<State> = program
        .table
        .states()
        .filter(|state| !reachable.contains(state))
        .collect();

    (!unreachable.is_empty()).then_some(Diagnostic::UnreachableStates(unreachable))
}

/// Every initial tape symbol should be read by some exact entry, unless a wildcard entry
/// exists somewhere in the table.
fn check_tape_symbols(program: &Program) -> Option<Diagnostic> {
    let mut handled = HashSet::new();
    for transition in program.table.transitions() {
        match transition.read {
            ReadSymbol::Exact(symbol) => {
                handled.insert(symbol);
            }
            ReadSymbol::Wildcard => return None,
        }
    }

    let unhandled: BTreeSet<char> = program
        .tape
        .iter()
        .copied()
        .filter(|symbol| !handled.contains(symbol))
        .collect();

    (!unhandled.is_empty())
        .then(|| Diagnostic::UnhandledTapeSymbols(unhandled.into_iter().collect()))
}

/// Collects the states reachable from the start state by following next-state links,
/// halting the traversal at the halt state.
fn reachable_states(program: &Program) -> HashSet<State> {
    let mut visited = HashSet::new();
    let mut queue = vec![program.start_state];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) || state == program.halt_state {
            continue;
        }

        for (_, action) in program.table.entries(state) {
            if !visited.contains(&action.next_state) {
                queue.push(action.next_state);
            }
        }
    }

    visited
}
