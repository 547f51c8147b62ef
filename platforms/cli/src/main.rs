mod logging;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tmtrace::{
    analyze, ExecutionError, ExecutionTrace, Machine, Program, ProgramLoader, ProgramManager,
};
use tracing::{info, warn};

/// Runs a single-tape Turing machine and prints the tape after every step.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tmtrace machine.tm
  tmtrace --demo binary-increment --format json
  cat machine.tm | tmtrace --max-steps 1000")]
struct Cli {
    /// The program file to execute. Read from stdin when omitted and input is piped.
    program: Option<PathBuf>,

    /// Run a bundled demo program instead of a file
    #[clap(short, long, conflicts_with = "program")]
    demo: Option<String>,

    /// List the bundled demo programs
    #[clap(short, long)]
    list: bool,

    /// Stop after this many steps if the machine has not halted
    #[clap(short, long)]
    max_steps: Option<usize>,

    /// Output format for the trace
    #[clap(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the program's diagnostics instead of running it
    #[clap(long)]
    lint: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// One snapshot per line
    Text,
    /// A JSON array of snapshots
    Json,
}

const EXIT_EXECUTION_ERROR: u8 = 1;
const EXIT_LOAD_ERROR: u8 = 2;
const EXIT_BUDGET_EXHAUSTED: u8 = 3;
const EXIT_LINT_FINDINGS: u8 = 4;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(error_exit_code(&e))
        }
    }
}

/// Execution failures exit with 1; everything that stops a program from loading exits with 2.
fn error_exit_code(error: &anyhow::Error) -> u8 {
    if error.downcast_ref::<ExecutionError>().is_some() {
        EXIT_EXECUTION_ERROR
    } else {
        EXIT_LOAD_ERROR
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    if cli.list {
        list_demos();
        return Ok(ExitCode::SUCCESS);
    }

    let program = load_program(cli)?;

    if cli.lint {
        return Ok(ExitCode::from(lint(&program)));
    }

    let mut machine = Machine::new(&program);
    let (trace, halted) = match cli.max_steps {
        None => (machine.run()?, true),
        Some(budget) => run_with_budget(&mut machine, budget)?,
    };

    print_trace(&trace, cli.format)?;

    if halted {
        info!(steps = machine.step_count(), state = machine.state(), "machine halted");
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(budget = machine.step_count(), "step budget exhausted before the machine halted");
        Ok(ExitCode::from(EXIT_BUDGET_EXHAUSTED))
    }
}

/// Prints the program's diagnostics and returns the exit code: 0 when clean.
fn lint(program: &Program) -> u8 {
    let diagnostics = analyze(program);
    for diagnostic in &diagnostics {
        println!("{}", diagnostic);
    }

    if diagnostics.is_empty() {
        0
    } else {
        EXIT_LINT_FINDINGS
    }
}

/// Loads the program from a demo name, a file, or piped stdin, in that order.
fn load_program(cli: &Cli) -> anyhow::Result<Program> {
    if let Some(name) = &cli.demo {
        return ProgramManager::get_program_by_name(name)
            .cloned()
            .with_context(|| format!("Unknown demo program '{}' (see --list)", name));
    }

    if let Some(path) = &cli.program {
        return Ok(ProgramLoader::load_program(path)?);
    }

    if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        return Ok(ProgramLoader::load_program_from_string(&buffer)?);
    }

    bail!("No program given: pass a file, use --demo NAME, or pipe a program on stdin")
}

/// Steps the machine until it halts or `budget` steps have been applied.
///
/// Returns the snapshots recorded so far and whether the machine halted.
fn run_with_budget(
    machine: &mut Machine<'_>,
    budget: usize,
) -> Result<(ExecutionTrace, bool), ExecutionError> {
    let mut trace = ExecutionTrace::new(machine.snapshot());

    while !machine.is_halted() {
        if machine.step_count() >= budget {
            return Ok((trace, false));
        }
        trace.push(machine.step()?);
    }

    Ok((trace, true))
}

fn print_trace(trace: &ExecutionTrace, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Text => println!("{}", trace),
        Format::Json => println!("{}", trace.to_json()?),
    }
    Ok(())
}

fn list_demos() {
    for index in 0..ProgramManager::get_program_count() {
        if let Some(info) = ProgramManager::get_program_info(index) {
            println!(
                "{:<18} tape: {:<10} start: {} halt: {} ({} states, {} transitions)",
                info.name,
                info.initial_tape,
                info.start_state,
                info.halt_state,
                info.state_count,
                info.transition_count
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(text: &str) -> Program {
        ProgramLoader::load_program_from_string(text).unwrap()
    }

    #[test]
    fn test_budget_stops_a_non_halting_machine() {
        // Walks right forever.
        let program = program("-\n0\n0\n1\n0 * * 1 0\n");
        let mut machine = Machine::new(&program);

        let (trace, halted) = run_with_budget(&mut machine, 5).unwrap();

        assert!(!halted);
        assert_eq!(trace.steps(), 5);
        assert_eq!(trace.len(), 6);
        assert_eq!(machine.step_count(), 5);
        assert_eq!(trace.last(), Some("------"));
    }

    #[test]
    fn test_zero_budget_with_immediate_halt() {
        let program = program("abc\n0\n2\n2\n");
        let mut machine = Machine::new(&program);

        let (trace, halted) = run_with_budget(&mut machine, 0).unwrap();

        assert!(halted);
        assert_eq!(trace.as_slice(), ["abc"]);
    }

    #[test]
    fn test_budget_larger_than_run_matches_run() {
        let program = ProgramManager::get_program_by_name("binary-increment").unwrap();

        let (trace, halted) = run_with_budget(&mut Machine::new(program), 100).unwrap();

        assert!(halted);
        assert_eq!(trace, Machine::new(program).run().unwrap());
    }

    #[test]
    fn test_budget_propagates_execution_error() {
        let program = program("ab\n0\n0\n9\n0 a A 1 1\n");
        let mut machine = Machine::new(&program);

        let error = run_with_budget(&mut machine, 10).unwrap_err();

        assert_eq!(
            error,
            ExecutionError::NoTransitionFound {
                state: 1,
                symbol: 'b',
                step: 1,
                tape: "Ab".to_string(),
            }
        );
    }

    #[test]
    fn test_lint_exit_codes() {
        let clean = ProgramManager::get_program_by_name("bit-inversion").unwrap();
        assert_eq!(lint(clean), 0);

        // Start state has no entries and nothing leads to the halt state.
        let suspicious = program("a\n0\n0\n1\n");
        assert_eq!(lint(&suspicious), EXIT_LINT_FINDINGS);
        assert_ne!(EXIT_LINT_FINDINGS, EXIT_EXECUTION_ERROR);
    }

    #[test]
    fn test_error_exit_codes() {
        let program = program("0\n0\n0\n9\n");
        let execution = Machine::new(&program).run().unwrap_err();
        assert_eq!(error_exit_code(&execution.into()), EXIT_EXECUTION_ERROR);

        let load = ProgramLoader::load_program_from_string("0\n0").unwrap_err();
        assert_eq!(error_exit_code(&load.into()), EXIT_LOAD_ERROR);

        let missing = anyhow::anyhow!("Unknown demo program 'nope' (see --list)");
        assert_eq!(error_exit_code(&missing), EXIT_LOAD_ERROR);
    }
}
