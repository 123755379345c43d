//! Core systems for Horizon Grid.
//!
//! This crate provides the stateless foundations of the Horizon Grid
//! framework for building interactive grid-based views:
//!
//! - **Grid types**: Fixed primary grids and the viewer-owned secondary region
//! - **Cell addressing**: Row/column ↔ index conversion, ranges, borders
//! - **Patterns**: Text rows mapped onto cell indices
//! - **Slot sets**: Include lists or ranges minus a blacklist
//! - **Flags**: Interned, validated behaviour switches
//! - **Component tree**: Ordered hierarchy with identity and cycle validation
//!
//! # Pattern Example
//!
//! ```
//! use horizon_grid_core::{address, Pattern};
//!
//! let pattern = Pattern::new(["#########", "#.......#", "#########"]);
//! let inner = pattern.indices_of('.');
//! assert_eq!(inner.first(), Some(&10));
//! assert_eq!(address::to_position(10, 9), (1, 1));
//! ```
//!
//! # Tree Example
//!
//! ```
//! use std::any::Any;
//! use horizon_grid_core::{ComponentTree, TreeNode};
//!
//! struct Node(&'static str);
//!
//! impl TreeNode for Node {
//!     fn as_any(&self) -> &dyn Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//!     fn type_name(&self) -> &'static str { "Node" }
//! }
//!
//! let mut tree = ComponentTree::new();
//! let root = tree.insert(Node("root"));
//! let child = tree.insert(Node("child"));
//! tree.add_child(root, child).unwrap();
//! assert!(tree.add_child(root, child).is_err());
//! ```

pub mod address;
mod error;
mod flag;
mod grid;
pub mod logging;
mod pattern;
mod slots;
pub mod tree;

pub use error::{FlagError, LayoutError, LayoutResult, TreeError, TreeResult};
pub use flag::{Flag, FlagSet};
pub use grid::{
    Cell, GridKind, GridType, Region, HOTBAR_RAW_START, SECONDARY_COLUMNS, SECONDARY_ROWS,
    SECONDARY_SIZE,
};
pub use logging::{PerfSpan, TreeDebug, TreeFormatOptions, TreeStyle};
pub use pattern::Pattern;
pub use slots::{SlotSet, SlotsBuilder};
pub use tree::{ComponentId, ComponentTree, Priority, TreeNode};
