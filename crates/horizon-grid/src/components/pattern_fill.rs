use horizon_grid_core::{Cell, LayoutError, LayoutResult, Pattern, Region};

use crate::component::{Component, ViewContext};
use crate::element::Item;

/// Fills every cell of a pattern character with an item.
///
/// ```
/// use horizon_grid::{CellContent, PatternFill};
/// use horizon_grid_core::Pattern;
///
/// let pattern = Pattern::new(["#########", "#.......#", "#########"]);
/// let fill = PatternFill::new(pattern)
///     .fill('#', CellContent::new("glass_pane"))
///     .unwrap();
/// assert!(fill.fill('?', CellContent::new("stone")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PatternFill {
    pattern: Pattern,
    region: Region,
    fills: Vec<(char, Item)>,
}

impl PatternFill {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            region: Region::Primary,
            fills: Vec::new(),
        }
    }

    /// Render into `region` instead of the primary grid. Secondary indices
    /// are unified indices.
    pub fn in_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Fill every cell marked `character`. Fails with
    /// [`LayoutError::CharacterNotFound`] if the pattern has no such cell.
    pub fn fill(mut self, character: char, item: impl Into<Item>) -> LayoutResult<Self> {
        if !self.pattern.contains(character) {
            return Err(LayoutError::CharacterNotFound(character));
        }
        self.fills.push((character, item.into()));
        Ok(self)
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

impl Component for PatternFill {
    fn on_open(&mut self, cx: &mut ViewContext<'_>) {
        for (character, item) in &self.fills {
            for index in self.pattern.indices_of(*character) {
                let cell = Cell {
                    region: self.region,
                    index,
                };
                cx.set_item(cell, item.clone());
            }
        }
    }
}
