//! Stock components.
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`Pane`] | Groups children; the usual tree root |
//! | [`CellProducers`] | A table of per-cell producer functions |
//! | [`PatternFill`] | Fills every cell of a pattern character |
//! | [`PageButtons`] | Previous/next controls for a [`Paginated`](crate::Paginated) |
//! | [`TextField`] | Captures text typed into an anvil grid |

mod page_buttons;
mod pane;
mod pattern_fill;
mod producers;
mod text_field;

pub use page_buttons::PageButtons;
pub use pane::Pane;
pub use pattern_fill::PatternFill;
pub use producers::{CellProducers, Producer};
pub use text_field::{TextChanged, TextField};
