//! Horizon Grid - composable components for grid-based interfaces.
//!
//! A grid interface is a fixed-size cell grid shown to one viewer at a
//! time. Horizon Grid builds those interfaces out of a tree of
//! [`Component`]s and decides which cell shows what and which handler a
//! click reaches. Drawing is left to a host-supplied [`Display`].
//!
//! - **Views**: a [`ViewDefinition`] (grid type, title, cooldowns, flags and
//!   a component tree) is the template every session is opened from.
//! - **Sessions**: a [`Session`] is one open grid for one viewer, with its
//!   own copy of the component tree.
//! - **Routing**: the [`SessionRegistry`] routes clicks, drags and text
//!   input to the viewer's active session, applying flags and cooldowns.
//! - **Pagination**: [`Paginated`] renders large item lists across fixed
//!   cell sets, page by page.
//!
//! This crate re-exports everything from `horizon-grid-core`.
//!
//! # Example
//!
//! ```
//! use horizon_grid::{
//!     CellContent, ClickEvent, ClickOutcome, InteractionType, Item, CellProducers,
//!     SessionRegistry, ViewDefinition, ViewerId,
//! };
//! use horizon_grid_core::GridType;
//!
//! let mut builder = ViewDefinition::builder();
//! builder.grid(GridType::HOPPER).title("Menu");
//! builder.root(CellProducers::new().produce(2, |_| {
//!     Item::new(CellContent::new("barrier").with_label("Close")).on_click(|cx| cx.close())
//! }));
//! let menu = builder.build();
//!
//! let registry = SessionRegistry::default();
//! let viewer = ViewerId::random();
//! registry.open(viewer, &menu).unwrap();
//!
//! let mut click = ClickEvent::at(viewer, 2, InteractionType::Pickup);
//! assert_eq!(registry.handle_click(&mut click), ClickOutcome::Handled);
//! assert!(registry.active(viewer).is_none());
//! ```

mod component;
pub mod components;
mod config;
mod content;
mod definition;
mod element;
mod error;
mod event;
pub mod pagination;
mod registry;
mod routing;
mod session;
mod surface;

pub use horizon_grid_core::*;

pub use component::{AsAny, CloneComponent, Component, Tree, ViewContext};
pub use components::{CellProducers, PageButtons, Pane, PatternFill, Producer, TextChanged, TextField};
pub use config::{GridSpec, ViewConfig};
pub use content::{CellContent, MarkupParser, PlainMarkup, RichText, Title};
pub use definition::{ViewBuilder, ViewDefinition, ViewSettings};
pub use element::{handler, CellElement, ClickHandler, Element, Item};
pub use error::{Error, Result};
pub use event::{ClickEvent, DragEvent, InteractionType, RawSlot, TextInputEvent, ViewerId};
pub use pagination::{Comparator, Paginated, Renderer};
pub use registry::{OpenOptions, SessionRegistry};
pub use routing::{ClickContext, ClickOutcome};
pub use session::{Navigation, Session, SessionId, SessionState, SharedSession};
pub use surface::{Display, MemoryDisplay, MemorySurface, Surface};
