//! This module defines the core data structures and types shared by the simulator: symbols,
//! states, actions, transitions, the execution trace, and the error types produced while
//! loading and executing a machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::table::TransitionTable;
use crate::Rule;

/// The blank symbol that fills every tape position not yet explicitly written.
pub const BLANK_SYMBOL: char = '-';
/// The read-side symbol that matches any symbol without an exact entry.
pub const WILDCARD_SYMBOL: char = '*';
/// The write-side symbol meaning "leave the symbol under the head unchanged".
pub const NO_WRITE_SYMBOL: char = '*';
/// The minimum number of header lines in a program description.
pub const HEADER_LINES: usize = 4;
/// The number of whitespace-separated fields in a transition line.
pub const TRANSITION_FIELDS: usize = 5;
/// How far past either end of the initial tape a loaded head offset may point. Every cell
/// between the tape and the head is materialized up front.
pub const MAX_HEAD_PADDING: u64 = 1 << 16;

/// A machine state label. States are non-negative integers.
pub type State = u64;

/// The key side of a transition table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReadSymbol {
    /// Matches exactly this symbol.
    Exact(char),
    /// Matches any symbol that has no exact entry for the same state.
    Wildcard,
}

impl ReadSymbol {
    /// Interprets a raw character from a transition line.
    pub fn from_char(c: char) -> Self {
        if c == WILDCARD_SYMBOL {
            Self::Wildcard
        } else {
            Self::Exact(c)
        }
    }

    /// Returns the character used to spell this key in a program description.
    pub fn as_char(&self) -> char {
        match self {
            Self::Exact(c) => *c,
            Self::Wildcard => WILDCARD_SYMBOL,
        }
    }
}

/// What an action does to the symbol under the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WriteSymbol {
    /// Overwrite the cell with this symbol.
    Symbol(char),
    /// Leave the cell unchanged.
    NoWrite,
}

impl WriteSymbol {
    /// Interprets a raw character from a transition line.
    pub fn from_char(c: char) -> Self {
        if c == NO_WRITE_SYMBOL {
            Self::NoWrite
        } else {
            Self::Symbol(c)
        }
    }

    /// Returns the character used to spell this write in a program description.
    pub fn as_char(&self) -> char {
        match self {
            Self::Symbol(c) => *c,
            Self::NoWrite => NO_WRITE_SYMBOL,
        }
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Keep the head in the same position.
    Stay,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    /// Returns the signed offset this direction applies to the head.
    pub fn delta(&self) -> i64 {
        match self {
            Self::Left => -1,
            Self::Stay => 0,
            Self::Right => 1,
        }
    }

    /// Converts a signed offset from a program description into a direction.
    ///
    /// Returns `None` unless `delta` is one of `-1`, `0` or `1`.
    pub fn from_delta(delta: i64) -> Option<Self> {
        match delta {
            -1 => Some(Self::Left),
            0 => Some(Self::Stay),
            1 => Some(Self::Right),
            _ => None,
        }
    }
}

/// The write/move/next-state triple stored in the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub write: WriteSymbol,
    pub direction: Direction,
    pub next_state: State,
}

/// A single transition line as supplied by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state this entry belongs to.
    pub state: State,
    /// The symbol (or wildcard) this entry reacts to.
    pub read: ReadSymbol,
    /// The action taken when the entry matches.
    pub action: Action,
}

/// A fully loaded machine description: the initial configuration plus its transition table.
///
/// A program is immutable once built and can be shared read-only by any number of machines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// The initial tape contents, in tape order.
    pub tape: Vec<char>,
    /// The initial head offset into `tape`. May fall outside it; the tape grows to cover it.
    /// Every cell in between is allocated, so [`crate::parse`] bounds the distance by
    /// [`MAX_HEAD_PADDING`].
    pub head: i64,
    /// The state the machine starts in.
    pub start_state: State,
    /// The state that ends execution successfully.
    pub halt_state: State,
    /// The transition table.
    pub table: TransitionTable,
}

impl Program {
    /// Builds a program from the loader's output, registering transitions in order.
    pub fn new(
        tape: impl IntoIterator<Item = char>,
        head: i64,
        start_state: State,
        halt_state: State,
        transitions: impl IntoIterator<Item = Transition>,
    ) -> Self {
        Self {
            tape: tape.into_iter().collect(),
            head,
            start_state,
            halt_state,
            table: TransitionTable::from_transitions(transitions),
        }
    }

    /// Returns the initial tape contents as a string.
    pub fn initial_tape(&self) -> String {
        self.tape.iter().collect()
    }
}

/// The execution phase of a machine, distinct from its current domain [`State`].
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// The machine has not yet reached the halt state.
    Running,
    /// The machine reached the halt state.
    Halted,
    /// The machine stopped because no transition matched.
    Errored(ExecutionError),
}

/// The ordered list of tape snapshots produced by a run, starting with the initial tape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionTrace(Vec<String>);

impl ExecutionTrace {
    /// Starts a trace with the snapshot taken before any step.
    pub fn new(initial: String) -> Self {
        Self(vec![initial])
    }

    /// Appends the snapshot returned by a step. Hosts that drive
    /// [`crate::Machine::step`] themselves record their partial runs this way.
    pub fn push(&mut self, snapshot: String) {
        self.0.push(snapshot);
    }

    /// Returns the number of snapshots, which is the number of steps plus one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of transitions applied to produce this trace.
    pub fn steps(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Returns the last recorded snapshot.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    /// Serializes the trace as a JSON array of snapshot strings.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for ExecutionTrace {
    /// Writes one snapshot per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, snapshot) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(snapshot)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ExecutionTrace {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Errors produced while turning a program description into a [`crate::Program`].
///
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Fewer than the four mandatory header lines were supplied.
    #[error("Malformed header: expected at least 4 lines, found {found}")]
    MalformedHeader { found: usize },
    /// A transition line does not have exactly five fields.
    #[error("Malformed transition on line {line}: expected 5 fields, found {found}")]
    MalformedTransitionLine { line: usize, found: usize },
    /// A field is present but its value is not acceptable.
    #[error("Invalid {field} on line {line}: {reason}")]
    InvalidField {
        line: usize,
        field: &'static str,
        reason: String,
    },
    /// The tokenizer rejected the input.
    #[error("Program syntax error: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
    /// The program file could not be read.
    #[error("File error: {0}")]
    File(String),
}

/// Errors produced by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Neither an exact nor a wildcard entry exists for the current state and symbol.
    #[error("No transition for state {state} reading '{symbol}' at step {step} (tape: {tape})")]
    NoTransitionFound {
        state: State,
        symbol: char,
        /// Number of steps applied before the failing lookup.
        step: usize,
        /// Tape contents at the failure point.
        tape: String,
    },
}
