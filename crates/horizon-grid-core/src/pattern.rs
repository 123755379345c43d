//! Declarative text patterns mapped onto cell indices.
//!
//! A pattern is a list of text rows. Every character becomes one cell,
//! addressed as `row * row_length + column`:
//!
//! ```
//! use horizon_grid_core::Pattern;
//!
//! let pattern = Pattern::new([
//!     "#########",
//!     "#.......#",
//!     "###<#>###",
//! ]);
//!
//! assert_eq!(pattern.index_of('<').unwrap(), 21);
//! assert_eq!(pattern.indices_of('.').len(), 7);
//! ```
//!
//! # Row lengths
//!
//! Each row uses its own length as the row width. Rows are expected to have
//! equal length; ragged input is accepted but yields a non-rectangular
//! mapping in which later rows may overwrite the characters of earlier ones.

use std::collections::HashMap;

use crate::error::{LayoutError, LayoutResult};

/// An ordered mapping from cell index to pattern character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    rows: Vec<String>,
    /// Cells in insertion (row-major) order.
    cells: Vec<(usize, char)>,
    /// Position of each index inside `cells`.
    positions: HashMap<usize, usize>,
}

impl Pattern {
    /// Parse a pattern from its rows.
    pub fn new<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<String> = rows.into_iter().map(Into::into).collect();
        let mut cells = Vec::new();
        let mut positions = HashMap::new();

        for (row, text) in rows.iter().enumerate() {
            let row_length = text.chars().count();
            for (column, character) in text.chars().enumerate() {
                let index = row * row_length + column;
                match positions.get(&index) {
                    Some(&position) => cells[position] = (index, character),
                    None => {
                        positions.insert(index, cells.len());
                        cells.push((index, character));
                    }
                }
            }
        }

        Self {
            rows,
            cells,
            positions,
        }
    }

    /// The source rows.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Number of mapped cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All mapped indices in row-major order.
    pub fn indices(&self) -> Vec<usize> {
        self.cells.iter().map(|&(index, _)| index).collect()
    }

    /// The character stored at an index.
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.positions.get(&index).map(|&position| self.cells[position].1)
    }

    /// Whether the pattern contains a character anywhere.
    pub fn contains(&self, character: char) -> bool {
        self.cells.iter().any(|&(_, c)| c == character)
    }

    /// All indices holding `character`, in row-major order.
    pub fn indices_of(&self, character: char) -> Vec<usize> {
        self.cells
            .iter()
            .filter(|&&(_, c)| c == character)
            .map(|&(index, _)| index)
            .collect()
    }

    /// The first index holding `character`.
    pub fn index_of(&self, character: char) -> LayoutResult<usize> {
        self.cells
            .iter()
            .find(|&&(_, c)| c == character)
            .map(|&(index, _)| index)
            .ok_or(LayoutError::CharacterNotFound(character))
    }

    /// One index list per character, in the order the characters are given.
    pub fn grouped(&self, characters: &[char]) -> Vec<Vec<usize>> {
        characters.iter().map(|&c| self.indices_of(c)).collect()
    }

    /// The indices of several characters merged into one flat list.
    pub fn merged(&self, characters: &[char]) -> Vec<usize> {
        characters.iter().flat_map(|&c| self.indices_of(c)).collect()
    }

    /// Shift every stored index by `amount`.
    ///
    /// Used to re-target a pattern authored for one region onto another,
    /// e.g. moving a 9-wide pattern down by a row with `offset(9)`.
    pub fn offset(&mut self, amount: usize) {
        for (index, _) in &mut self.cells {
            *index += amount;
        }
        self.positions = self
            .cells
            .iter()
            .enumerate()
            .map(|(position, &(index, _))| (index, position))
            .collect();
    }
}
