//! This crate provides the core logic for a single-tape Turing machine simulator.
//! It includes modules for loading machine descriptions, looking up transitions, executing
//! machines step by step while recording every tape snapshot, and linting loaded programs.

pub mod analyzer;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `Diagnostic` enum from the analyzer module.
pub use analyzer::{analyze, Diagnostic};
/// Re-exports the encoding function from the encoder module.
pub use encoder::encode;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `Machine` struct and the `apply` step function from the machine module.
pub use machine::{apply, Machine};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `TransitionTable` struct from the table module.
pub use table::TransitionTable;
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the shared types used to describe and execute machines.
pub use types::{
    Action, Direction, ExecutionError, ExecutionTrace, LoadError, Phase, Program, ReadSymbol,
    State, Transition, WriteSymbol, BLANK_SYMBOL, MAX_HEAD_PADDING, NO_WRITE_SYMBOL,
    WILDCARD_SYMBOL,
};
