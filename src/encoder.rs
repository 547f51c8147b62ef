//! This module renders a [`Program`] back into the line-oriented text format accepted by
//! [`crate::parser::parse`].

use crate::types::{Program, Transition};

/// Encodes a program as text.
///
/// Format:
/// - line 1: the initial tape
/// - lines 2-4: head offset, start state, halt state
/// - one line per table entry: `state read write direction next_state`, states in
///   ascending order, exact symbols before the wildcard.
///
/// For a program produced by [`crate::parser::parse`], parsing the output yields an equal
/// program: overwritten entries are already gone from the table. A hand-built program whose
/// symbols the format cannot spell (whitespace, or `*` on the tape) does not load back.
pub fn encode(program: &Program) -> String {
    let mut lines = vec![
        program.initial_tape(),
        program.head.to_string(),
        program.start_state.to_string(),
        program.halt_state.to_string(),
    ];

    lines.extend(program.table.transitions().map(|t| encode_transition(&t)));

    let mut encoded = lines.join("\n");
    encoded.push('\n');
    encoded
}

/// Encodes a single entry as a transition line.
pub fn encode_transition(transition: &Transition) -> String {
    format!(
        "{} {} {} {} {}",
        transition.state,
        transition.read.as_char(),
        transition.action.write.as_char(),
        transition.action.direction.delta(),
        transition.action.next_state
    )
}
