//! This module provides the parser for program descriptions, utilizing the `pest` crate.
//!
//! The format is line oriented:
//!
//! ```text
//! 101          <- initial tape, one symbol per character ('-' is blank)
//! 0            <- head offset
//! 0            <- start state
//! 1            <- halt state
//! 0 1 0 1 0    <- <state> <read> <write> <direction> <next state>
//! 0 0 * 1 1
//! ```
//!
//! A `*` in the read column matches any symbol without an exact entry; a `*` in the write
//! column leaves the cell unchanged. The grammar only splits lines and fields; every field
//! is converted and checked here so that failures carry their line number.

use crate::{
    analyzer::analyze,
    types::{
        Action, Direction, LoadError, Program, ReadSymbol, State, Transition, WriteSymbol,
        HEADER_LINES, MAX_HEAD_PADDING, WILDCARD_SYMBOL,
    },
};
use pest::Parser as PestParser;
use pest_derive::Parser as PestParser;
use std::str::FromStr;
use tracing::{debug, warn};

/// Derives a `PestParser` for the grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct ProgramParser;

/// Parses the given input string into a [`Program`].
///
/// A single trailing line terminator is ignored, as are whitespace-only lines after the
/// header. Repeated entries for the same state and read symbol are not an error: the last
/// one wins. The parsed program is analyzed and any diagnostics are logged as warnings.
///
/// # Returns
///
/// * `Ok(Program)` if every line is well formed.
/// * `Err(LoadError::MalformedHeader)` if fewer than four lines are present.
/// * `Err(LoadError::MalformedTransitionLine)` if a transition line does not have five fields.
/// * `Err(LoadError::InvalidField)` if a field cannot be converted.
pub fn parse(input: &str) -> Result<Program, LoadError> {
    let lines = split_lines(strip_line_terminator(input))?;

    if lines.len() < HEADER_LINES {
        return Err(LoadError::MalformedHeader { found: lines.len() });
    }

    let tape = parse_tape(lines[0])?;
    let head = parse_head(lines[1], tape.len())?;
    let start_state = parse_state(lines[2], 3, "start state")?;
    let halt_state = parse_state(lines[3], 4, "halt state")?;

    let transitions = lines
        .iter()
        .enumerate()
        .skip(HEADER_LINES)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_transition(line, index + 1))
        .collect::<Result<Vec<_>, _>>()?;

    let program = Program::new(tape, head, start_state, halt_state, transitions);
    debug!(
        start_state,
        halt_state,
        head,
        states = program.table.states().count(),
        entries = program.table.len(),
        "parsed program"
    );

    for diagnostic in analyze(&program) {
        warn!(%diagnostic, "program diagnostic");
    }

    Ok(program)
}

/// Removes one trailing `\n` or `\r\n`, so that a terminated last line is not followed by
/// an empty one.
fn strip_line_terminator(input: &str) -> &str {
    match input.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => input,
    }
}

/// Splits the input into its lines.
fn split_lines(input: &str) -> Result<Vec<&str>, LoadError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let document = ProgramParser::parse(Rule::document, input).map_err(syntax_error)?;

    Ok(document
        .flat_map(|pair| pair.into_inner())
        .filter(|pair| pair.as_rule() == Rule::line)
        .map(|pair| pair.as_str())
        .collect())
}

/// Splits a single line into its whitespace-separated fields.
fn split_fields(line: &str) -> Result<Vec<&str>, LoadError> {
    let fields = ProgramParser::parse(Rule::fields, line).map_err(syntax_error)?;

    Ok(fields
        .flat_map(|pair| pair.into_inner())
        .filter(|pair| pair.as_rule() == Rule::field)
        .map(|pair| pair.as_str())
        .collect())
}

/// Parses the literal tape line. The wildcard is a lookup key only and may not appear on
/// the tape.
fn parse_tape(line: &str) -> Result<Vec<char>, LoadError> {
    if let Some(position) = line.chars().position(|c| c == WILDCARD_SYMBOL) {
        return Err(LoadError::InvalidField {
            line: 1,
            field: "tape",
            reason: format!(
                "wildcard '{WILDCARD_SYMBOL}' cannot appear on the tape (column {})",
                position + 1
            ),
        });
    }

    Ok(line.chars().collect())
}

/// Parses the head offset, which may point past either end of the tape by at most
/// [`MAX_HEAD_PADDING`] cells.
fn parse_head(line: &str, tape_len: usize) -> Result<i64, LoadError> {
    let head = parse_number::<i64>(line, 2, "head offset", "an integer")?;

    let padding = if head < 0 {
        head.unsigned_abs()
    } else {
        (head.unsigned_abs() + 1).saturating_sub(tape_len as u64)
    };

    if padding > MAX_HEAD_PADDING {
        return Err(LoadError::InvalidField {
            line: 2,
            field: "head offset",
            reason: format!(
                "{head} is more than {MAX_HEAD_PADDING} cells outside a tape of length {tape_len}"
            ),
        });
    }

    Ok(head)
}

/// Parses a transition line: `<state> <read> <write> <direction> <next state>`.
fn parse_transition(line: &str, line_number: usize) -> Result<Transition, LoadError> {
    let fields = split_fields(line)?;

    let [state, read, write, direction, next_state] = fields.as_slice() else {
        return Err(LoadError::MalformedTransitionLine {
            line: line_number,
            found: fields.len(),
        });
    };

    let state = parse_state(state, line_number, "state")?;
    let read = parse_symbol(read, line_number, "read symbol")?;
    let write = parse_symbol(write, line_number, "write symbol")?;
    let direction = parse_direction(direction, line_number)?;
    let next_state = parse_state(next_state, line_number, "next state")?;

    Ok(Transition {
        state,
        read: ReadSymbol::from_char(read),
        action: Action {
            write: WriteSymbol::from_char(write),
            direction,
            next_state,
        },
    })
}

/// Parses a field that must be exactly one character.
fn parse_symbol(text: &str, line: usize, field: &'static str) -> Result<char, LoadError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(LoadError::InvalidField {
            line,
            field,
            reason: format!("expected a single character, found '{text}'"),
        }),
    }
}

/// Parses a head movement, which must be `-1`, `0` or `1`.
fn parse_direction(text: &str, line: usize) -> Result<Direction, LoadError> {
    let delta = parse_number::<i64>(text, line, "direction", "-1, 0 or 1")?;

    Direction::from_delta(delta).ok_or_else(|| LoadError::InvalidField {
        line,
        field: "direction",
        reason: format!("expected -1, 0 or 1, found {delta}"),
    })
}

fn parse_state(text: &str, line: usize, field: &'static str) -> Result<State, LoadError> {
    parse_number::<State>(text, line, field, "a non-negative integer")
}

/// Parses a (possibly padded) integer field.
fn parse_number<T: FromStr>(
    text: &str,
    line: usize,
    field: &'static str,
    expected: &str,
) -> Result<T, LoadError> {
    let text = text.trim();
    text.parse::<T>().map_err(|_| LoadError::InvalidField {
        line,
        field,
        reason: format!("expected {expected}, found '{text}'"),
    })
}

fn syntax_error(error: pest::error::Error<Rule>) -> LoadError {
    LoadError::Syntax(Box::new(error))
}
