//! This module provides the `ProgramLoader` struct, responsible for loading programs from
//! files and strings.

use crate::parser::parse;
use crate::types::{LoadError, Program};
use std::fs;
use std::path::Path;
use tracing::debug;

/// `ProgramLoader` is a utility struct for loading programs from files or from string
/// content.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single program from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read and parsed.
    /// * `Err(LoadError::File)` if the file cannot be read.
    /// * Any other `LoadError` if the content is not a valid program.
    pub fn load_program(path: &Path) -> Result<Program, LoadError> {
        debug!(path = %path.display(), "loading program");

        let content = fs::read_to_string(path).map_err(|e| {
            LoadError::File(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        parse(&content)
    }

    /// Loads a single program from the provided string content, e.g. from standard input.
    pub fn load_program_from_string(content: &str) -> Result<Program, LoadError> {
        parse(content)
    }
}
