//! The display collaborator.
//!
//! A [`Display`] creates one [`Surface`] per opened session. The surface is
//! the host's grid window: Horizon Grid only reads and writes cell content
//! through it.

use horizon_grid_core::{Cell, GridType, Region, SECONDARY_SIZE};

use crate::content::{CellContent, RichText};
use crate::event::ViewerId;

/// A live grid shown to one viewer.
pub trait Surface: Send {
    /// The grid shape this surface was created with.
    fn grid(&self) -> GridType;

    /// Read a cell's content.
    fn cell(&self, cell: Cell) -> Option<CellContent>;

    /// Write (or with `None`, clear) a cell's content.
    fn set_cell(&mut self, cell: Cell, content: Option<CellContent>);

    /// Replace the title.
    fn set_title(&mut self, title: RichText);

    /// Show the current text input line. Only called for text-capturing grids.
    fn set_input_text(&mut self, _text: &str) {}

    /// Take the surface off screen.
    fn close(&mut self) {}
}

/// Creates surfaces for viewers.
pub trait Display: Send + Sync {
    fn create(&self, viewer: ViewerId, grid: GridType, title: &RichText) -> Box<dyn Surface>;
}

/// An in-memory surface, used headless and in tests.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    grid: GridType,
    title: RichText,
    primary: Vec<Option<CellContent>>,
    secondary: Vec<Option<CellContent>>,
    input_text: String,
    closed: bool,
}

impl MemorySurface {
    pub fn new(grid: GridType, title: RichText) -> Self {
        Self {
            grid,
            title,
            primary: vec![None; grid.size()],
            secondary: vec![None; SECONDARY_SIZE],
            input_text: String::new(),
            closed: false,
        }
    }

    pub fn title(&self) -> &RichText {
        &self.title
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn slot_mut(&mut self, cell: Cell) -> Option<&mut Option<CellContent>> {
        match cell.region {
            Region::Primary => self.primary.get_mut(cell.index),
            Region::Secondary => self.secondary.get_mut(cell.index),
        }
    }
}

impl Surface for MemorySurface {
    fn grid(&self) -> GridType {
        self.grid
    }

    fn cell(&self, cell: Cell) -> Option<CellContent> {
        let slots = match cell.region {
            Region::Primary => &self.primary,
            Region::Secondary => &self.secondary,
        };
        slots.get(cell.index).cloned().flatten()
    }

    fn set_cell(&mut self, cell: Cell, content: Option<CellContent>) {
        match self.slot_mut(cell) {
            Some(slot) => *slot = content,
            None => {
                tracing::warn!(target: "horizon_grid::session", %cell, "write outside surface ignored")
            }
        }
    }

    fn set_title(&mut self, title: RichText) {
        self.title = title;
    }

    fn set_input_text(&mut self, text: &str) {
        self.input_text = text.to_string();
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// A display that hands out [`MemorySurface`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryDisplay;

impl Display for MemoryDisplay {
    fn create(&self, _viewer: ViewerId, grid: GridType, title: &RichText) -> Box<dyn Surface> {
        Box::new(MemorySurface::new(grid, title.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_surface_cells() {
        let mut surface = MemorySurface::new(GridType::HOPPER, RichText::new("Hopper"));
        surface.set_cell(Cell::primary(4), Some(CellContent::new("stone")));
        surface.set_cell(Cell::secondary(0), Some(CellContent::new("dirt")));
        surface.set_cell(Cell::primary(5), Some(CellContent::new("ignored")));

        assert_eq!(surface.cell(Cell::primary(4)).unwrap().icon, "stone");
        assert_eq!(surface.cell(Cell::secondary(0)).unwrap().icon, "dirt");
        assert!(surface.cell(Cell::primary(5)).is_none());
        assert!(surface.cell(Cell::primary(0)).is_none());
    }
}
