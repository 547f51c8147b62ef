//! Demo programs bundled with the crate, parsed once on first use.

use crate::types::{Program, State};
use tracing::warn;

// Embedded demo programs, by name
const PROGRAM_TEXTS: [(&str, &str); 5] = [
    ("binary-increment", include_str!("../demos/binary-increment.tm")),
    ("unary-addition", include_str!("../demos/unary-addition.tm")),
    ("bit-inversion", include_str!("../demos/bit-inversion.tm")),
    ("wildcard-eraser", include_str!("../demos/wildcard-eraser.tm")),
    ("left-walker", include_str!("../demos/left-walker.tm")),
];

/// A bundled program together with its name and source text.
#[derive(Debug, Clone)]
pub struct DemoProgram {
    pub name: &'static str,
    pub text: &'static str,
    pub program: Program,
}

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<DemoProgram> = PROGRAM_TEXTS
        .iter()
        .filter_map(|&(name, text)| match crate::parser::parse(text) {
            Ok(program) => Some(DemoProgram { name, text, program }),
            Err(error) => {
                warn!(name, %error, "failed to parse bundled program");
                None
            }
        })
        .collect();
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Option<&'static Program> {
        PROGRAMS.get(index).map(|demo| &demo.program)
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Option<&'static Program> {
        Self::find(name).map(|demo| &demo.program)
    }

    /// Get the source text of a program by its name
    pub fn get_program_text_by_name(name: &str) -> Option<&'static str> {
        Self::find(name).map(|demo| demo.text)
    }

    /// List all program names
    pub fn list_program_names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|demo| demo.name).collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Option<ProgramInfo> {
        let demo = PROGRAMS.get(index)?;
        let program = &demo.program;

        Some(ProgramInfo {
            index,
            name: demo.name,
            initial_tape: program.initial_tape(),
            start_state: program.start_state,
            halt_state: program.halt_state,
            state_count: program.table.states().count(),
            transition_count: program.table.len(),
        })
    }

    fn find(name: &str) -> Option<&'static DemoProgram> {
        PROGRAMS.iter().find(|demo| demo.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: &'static str,
    pub initial_tape: String,
    pub start_state: State,
    pub halt_state: State,
    pub state_count: usize,
    pub transition_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::machine::Machine;

    fn run_demo(name: &str) -> Vec<String> {
        let program = ProgramManager::get_program_by_name(name).unwrap();
        Machine::new(program).run().unwrap().into_inner()
    }

    #[test]
    fn test_all_bundled_programs_parse() {
        assert_eq!(ProgramManager::get_program_count(), PROGRAM_TEXTS.len());
        assert_eq!(
            ProgramManager::list_program_names(),
            vec![
                "binary-increment",
                "unary-addition",
                "bit-inversion",
                "wildcard-eraser",
                "left-walker"
            ]
        );
    }

    #[test]
    fn test_bundled_programs_are_clean() {
        for demo in PROGRAMS.iter() {
            assert_eq!(analyze(&demo.program), Vec::new(), "{}", demo.name);
        }
    }

    #[test]
    fn test_binary_increment() {
        let trace = run_demo("binary-increment");
        assert_eq!(trace, vec!["1011", "1010", "1000", "1100"]);
    }

    #[test]
    fn test_unary_addition() {
        let trace = run_demo("unary-addition");
        assert_eq!(trace.last().unwrap(), "11111--");
        assert_eq!(trace.len(), 9);
    }

    #[test]
    fn test_bit_inversion() {
        let trace = run_demo("bit-inversion");
        assert_eq!(trace.last().unwrap(), "011001-");
    }

    #[test]
    fn test_wildcard_eraser() {
        let trace = run_demo("wildcard-eraser");
        assert_eq!(trace.last().unwrap(), "------");
        assert_eq!(trace.len(), 7);
    }

    #[test]
    fn test_left_walker() {
        let trace = run_demo("left-walker");
        assert_eq!(trace, vec!["abc", "abc", "abc", "-abc", "#abc"]);
    }

    #[test]
    fn test_program_info_and_text() {
        let info = ProgramManager::get_program_info(0).unwrap();
        assert_eq!(info.name, "binary-increment");
        assert_eq!(info.initial_tape, "1011");
        assert_eq!(info.state_count, 1);
        assert_eq!(info.transition_count, 3);

        let text = ProgramManager::get_program_text_by_name("left-walker").unwrap();
        assert!(text.starts_with("abc\n2\n"));

        assert!(ProgramManager::get_program_info(99).is_none());
        assert!(ProgramManager::get_program_by_name("missing").is_none());
    }
}
