//! The machine's storage medium: a conceptually infinite tape of which only the visited
//! region is materialized. Every position outside that region holds [`BLANK_SYMBOL`].

use crate::types::{Direction, BLANK_SYMBOL};

/// A growth-only tape with a head cursor.
///
/// The head always points at a materialized cell: `0 <= head < len` holds after every
/// operation. Moving off either end materializes one blank cell on that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<char>,
    head: usize,
}

impl Tape {
    /// Creates a tape from its initial contents and a signed head offset.
    ///
    /// Blanks are materialized so the head lands on a tracked cell: a negative offset
    /// prepends blanks and puts the head on the first cell, an offset past the end
    /// appends blanks up to it, and an empty tape becomes a single blank.
    pub fn new(symbols: impl IntoIterator<Item = char>, head: i64) -> Self {
        let mut cells: Vec<char> = symbols.into_iter().collect();

        let head = if head < 0 {
            let mut padded = vec![BLANK_SYMBOL; head.unsigned_abs() as usize];
            padded.append(&mut cells);
            cells = padded;
            0
        } else {
            head as usize
        };

        if head >= cells.len() {
            cells.resize(head + 1, BLANK_SYMBOL);
        }

        Self { cells, head }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> char {
        self.cells[self.head]
    }

    /// Overwrites the symbol under the head.
    pub fn write(&mut self, symbol: char) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell (or not at all), materializing a blank when it steps off
    /// either end of the tracked region.
    pub fn move_head(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.head == 0 {
                    // Every tracked cell shifts one index to the right.
                    self.cells.insert(0, BLANK_SYMBOL);
                } else {
                    self.head -= 1;
                }
            }
            Direction::Right => {
                self.head += 1;
                if self.head >= self.cells.len() {
                    self.cells.push(BLANK_SYMBOL);
                }
            }
            Direction::Stay => {}
        }
    }

    /// Returns the tracked contents in tape order, independent of the head.
    pub fn snapshot(&self) -> String {
        self.cells.iter().collect()
    }

    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the number of materialized cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a tape tracks at least the cell under the head.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }
}
