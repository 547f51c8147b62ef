//! This module defines the `Machine` struct, which executes a single-tape Turing machine
//! described by a [`Program`]. It owns the tape and current state, borrows the program's
//! transition table read-only, and records the tape after every step.

use crate::tape::Tape;
use crate::types::{
    Action, ExecutionError, ExecutionTrace, Phase, Program, State, WriteSymbol,
};
use tracing::{debug, trace};

/// Applies `action` to `tape` and returns the state the machine moves to.
///
/// The write (unless it is [`WriteSymbol::NoWrite`]) happens at the current head position,
/// before the head moves.
pub fn apply(action: &Action, tape: &mut Tape) -> State {
    if let WriteSymbol::Symbol(symbol) = action.write {
        tape.write(symbol);
    }
    tape.move_head(action.direction);
    action.next_state
}

/// A running instance of a [`Program`].
///
/// Several machines may borrow the same program at once, including from different threads;
/// each one owns its own tape.
#[derive(Debug, Clone)]
pub struct Machine<'p> {
    program: &'p Program,
    tape: Tape,
    state: State,
    phase: Phase,
    step_count: usize,
}

impl<'p> Machine<'p> {
    /// Creates a machine in the program's initial configuration.
    ///
    /// A program whose start state is its halt state starts out [`Phase::Halted`].
    pub fn new(program: &'p Program) -> Self {
        let state = program.start_state;
        Self {
            program,
            tape: Tape::new(program.tape.iter().copied(), program.head),
            state,
            phase: Self::initial_phase(program),
            step_count: 0,
        }
    }

    fn initial_phase(program: &Program) -> Phase {
        if program.start_state == program.halt_state {
            Phase::Halted
        } else {
            Phase::Running
        }
    }

    /// Executes a single transition and returns the resulting tape snapshot.
    ///
    /// If no exact or wildcard entry matches the current state and symbol, the machine
    /// moves to [`Phase::Errored`] without touching the tape or state, and the error is
    /// returned. Stepping a halted machine does nothing and returns the current snapshot;
    /// stepping an errored machine returns the same error again.
    pub fn step(&mut self) -> Result<String, ExecutionError> {
        match &self.phase {
            Phase::Running => {}
            Phase::Halted => return Ok(self.tape.snapshot()),
            Phase::Errored(error) => return Err(error.clone()),
        }

        let program = self.program;
        let symbol = self.tape.read();

        let Some(action) = program.table.lookup(self.state, symbol) else {
            let error = ExecutionError::NoTransitionFound {
                state: self.state,
                symbol,
                step: self.step_count,
                tape: self.tape.snapshot(),
            };
            debug!(state = self.state, %symbol, step = self.step_count, "no transition found");
            self.phase = Phase::Errored(error.clone());
            return Err(error);
        };

        let next_state = apply(action, &mut self.tape);
        trace!(
            state = self.state,
            %symbol,
            next_state,
            head = self.tape.head(),
            "applied transition"
        );

        self.state = next_state;
        self.step_count += 1;

        if self.state == program.halt_state {
            debug!(state = self.state, steps = self.step_count, "machine halted");
            self.phase = Phase::Halted;
        }

        Ok(self.tape.snapshot())
    }

    /// Runs the machine until it halts, returning every tape snapshot from the current one
    /// onwards.
    ///
    /// The first failed lookup aborts the run and its error is returned in place of the
    /// trace. There is no step limit: a machine that never reaches its halt state never
    /// returns. Hosts that need a budget drive [`Machine::step`] themselves.
    pub fn run(&mut self) -> Result<ExecutionTrace, ExecutionError> {
        let mut trace = ExecutionTrace::new(self.tape.snapshot());

        while self.phase == Phase::Running {
            trace.push(self.step()?);
        }

        if let Phase::Errored(error) = &self.phase {
            return Err(error.clone());
        }

        Ok(trace)
    }

    /// Restores the program's initial tape, head, state and phase.
    pub fn reset(&mut self) {
        *self = Self::new(self.program);
    }

    /// Returns the current domain state.
    pub fn state(&self) -> State {
        self.state
    }

    pub fn halt_state(&self) -> State {
        self.program.halt_state
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_halted(&self) -> bool {
        self.phase == Phase::Halted
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn head(&self) -> usize {
        self.tape.head()
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> char {
        self.tape.read()
    }

    pub fn snapshot(&self) -> String {
        self.tape.snapshot()
    }

    /// Returns the number of transitions applied since creation or the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }
}
