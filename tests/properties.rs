//! Property-based tests for the execution engine.
//!
//! Machines are generated at random, so most of them never halt; every property drives
//! `step()` under a fixed budget instead of calling `run()`.

use proptest::prelude::*;
use tmtrace::{
    Action, Direction, ExecutionError, Machine, Program, ReadSymbol, State, Tape, Transition,
    TransitionTable, WriteSymbol,
};

const ALPHABET: &[char] = &['0', '1', 'a', '-'];
const STATES: State = 4;
const HALT: State = STATES;
const BUDGET: usize = 64;

fn arbitrary_symbol() -> impl Strategy<Value = char> {
    prop::sample::select(ALPHABET)
}

fn arbitrary_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Left),
        Just(Direction::Stay),
        Just(Direction::Right)
    ]
}

prop_compose! {
    fn arbitrary_action()(
        write in prop::option::of(arbitrary_symbol()),
        direction in arbitrary_direction(),
        next_state in 0..=HALT,
    ) -> Action {
        Action {
            write: write.map_or(WriteSymbol::NoWrite, WriteSymbol::Symbol),
            direction,
            next_state,
        }
    }
}

prop_compose! {
    fn arbitrary_transition()(
        state in 0..STATES,
        read in prop::option::of(arbitrary_symbol()),
        action in arbitrary_action(),
    ) -> Transition {
        Transition {
            state,
            read: read.map_or(ReadSymbol::Wildcard, ReadSymbol::Exact),
            action,
        }
    }
}

prop_compose! {
    fn arbitrary_program()(
        tape in prop::collection::vec(arbitrary_symbol(), 0..8),
        head in -3i64..10,
        start_state in 0..=HALT,
        transitions in prop::collection::vec(arbitrary_transition(), 0..16),
    ) -> Program {
        Program::new(tape, head, start_state, HALT, transitions)
    }
}

/// Steps the machine up to the budget, recording each step's result.
fn drive(program: &Program) -> Vec<Result<String, ExecutionError>> {
    let mut machine = Machine::new(program);
    let mut results = Vec::new();

    for _ in 0..BUDGET {
        if machine.is_halted() {
            break;
        }
        let result = machine.step();
        let failed = result.is_err();
        results.push(result);
        if failed {
            break;
        }
    }

    results
}

proptest! {
    #[test]
    fn execution_is_deterministic(program in arbitrary_program()) {
        prop_assert_eq!(drive(&program), drive(&program));
    }

    #[test]
    fn head_stays_in_bounds_and_tape_never_shrinks(program in arbitrary_program()) {
        let mut machine = Machine::new(&program);
        prop_assert!(machine.head() < machine.tape().len());

        let mut previous_len = machine.tape().len();
        for _ in 0..BUDGET {
            if machine.is_halted() || machine.step().is_err() {
                break;
            }
            let len = machine.tape().len();
            prop_assert!(machine.head() < len);
            prop_assert!(len >= previous_len);
            prop_assert_eq!(machine.snapshot().chars().count(), len);
            previous_len = len;
        }
    }

    #[test]
    fn failed_step_leaves_configuration_untouched(program in arbitrary_program()) {
        let mut machine = Machine::new(&program);

        for _ in 0..BUDGET {
            if machine.is_halted() {
                break;
            }
            let before = (machine.snapshot(), machine.head(), machine.state());
            if machine.step().is_err() {
                prop_assert_eq!((machine.snapshot(), machine.head(), machine.state()), before);
                break;
            }
        }
    }

    #[test]
    fn exact_entry_always_beats_wildcard(
        state in 0..STATES,
        symbol in arbitrary_symbol(),
        exact in arbitrary_action(),
        wildcard in arbitrary_action(),
        wildcard_first in any::<bool>(),
    ) {
        let mut table = TransitionTable::new();
        if wildcard_first {
            table.register(state, ReadSymbol::Wildcard, wildcard);
            table.register(state, ReadSymbol::Exact(symbol), exact);
        } else {
            table.register(state, ReadSymbol::Exact(symbol), exact);
            table.register(state, ReadSymbol::Wildcard, wildcard);
        }

        prop_assert_eq!(table.lookup(state, symbol), Some(&exact));
    }

    #[test]
    fn no_write_preserves_the_cell_under_the_head(
        cells in prop::collection::vec(arbitrary_symbol(), 1..8),
        head in 0usize..8,
        direction in arbitrary_direction(),
    ) {
        let head = head % cells.len();
        let mut tape = Tape::new(cells.iter().copied(), head as i64);
        let action = Action {
            write: WriteSymbol::NoWrite,
            direction,
            next_state: 1,
        };

        let next_state = tmtrace::apply(&action, &mut tape);

        // A left move off the start shifts every cell one index to the right.
        let shift = usize::from(head == 0 && direction == Direction::Left);
        prop_assert_eq!(next_state, 1);
        prop_assert_eq!(tape.cells()[head + shift], cells[head]);
        prop_assert_eq!(&tape.cells()[shift..shift + cells.len()], cells.as_slice());
    }
}
