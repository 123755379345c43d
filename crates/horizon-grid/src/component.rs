//! The component contract.
//!
//! Every node of a view's tree is a boxed [`Component`]. The lifecycle
//! callbacks are fanned across the whole tree in pre-order by the owning
//! [`Session`](crate::Session):
//!
//! | Callback | When |
//! |----------|------|
//! | [`modify_definition`](Component::modify_definition) | On a fresh copy of the definition, before the session exists |
//! | [`on_open`](Component::on_open) | After the session becomes the viewer's active session |
//! | [`on_update`](Component::on_update) | After open and on every rebuild |
//! | [`on_text_input`](Component::on_text_input) | Text typed into a text-capturing grid |
//! | [`on_cooldown`](Component::on_cooldown) | A click was suppressed by a cooldown |
//! | [`on_close`](Component::on_close) | The session is closed |
//!
//! # Example
//!
//! ```
//! use horizon_grid::{CellContent, Component, Item, ViewContext};
//! use horizon_grid_core::Cell;
//!
//! #[derive(Clone)]
//! struct Clock {
//!     ticks: u32,
//! }
//!
//! impl Component for Clock {
//!     fn on_update(&mut self, cx: &mut ViewContext<'_>) {
//!         self.ticks += 1;
//!         let label = format!("Updated {} times", self.ticks);
//!         cx.set_item(Cell::primary(4), Item::new(CellContent::new("clock").with_label(label)));
//!     }
//! }
//! ```

use std::any::Any;
use std::ops::{Deref, DerefMut};

use horizon_grid_core::{Cell, ComponentId, ComponentTree, Priority, TreeNode};

use crate::definition::ViewSettings;
use crate::session::SessionState;

/// The component tree type used by views and sessions.
pub type Tree = ComponentTree<Box<dyn Component>>;

/// Downcasting support, implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn component_type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn component_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Cloning support for boxed components, implemented for every `Clone`
/// component.
pub trait CloneComponent {
    fn clone_component(&self) -> Box<dyn Component>;
}

impl<T: Component + Clone> CloneComponent for T {
    fn clone_component(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }
}

/// A node in a view's component tree.
///
/// All callbacks default to no-ops. Components must be `Clone` because a
/// view definition's tree is deep-copied for every session.
pub trait Component: AsAny + CloneComponent + Send + Sync {
    /// Static priority among siblings. Can be overridden per node with
    /// [`ComponentTree::set_priority`].
    fn priority(&self) -> Priority {
        Priority::Medium
    }

    /// Adjust the settings of a per-session copy of the definition.
    fn modify_definition(&mut self, _settings: &mut ViewSettings) {}

    fn on_open(&mut self, _cx: &mut ViewContext<'_>) {}

    fn on_close(&mut self, _cx: &mut ViewContext<'_>) {}

    /// Rebuild state and re-render.
    fn on_update(&mut self, _cx: &mut ViewContext<'_>) {}

    /// Text was typed into a text-capturing grid.
    fn on_text_input(&mut self, _text: &str, _cx: &mut ViewContext<'_>) {}

    /// A click on `cell` was suppressed because a cooldown is active.
    fn on_cooldown(&mut self, _cell: Cell, _cx: &mut ViewContext<'_>) {}
}

impl Clone for Box<dyn Component> {
    fn clone(&self) -> Self {
        (**self).clone_component()
    }
}

impl TreeNode for Box<dyn Component> {
    fn priority(&self) -> Priority {
        (**self).priority()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        (**self).as_any_mut()
    }

    fn type_name(&self) -> &'static str {
        (**self).component_type_name()
    }
}

/// Context passed to component callbacks.
///
/// Dereferences to the session's [`SessionState`] for cell, handler and
/// flag access, and gives read access to the rest of the tree. The
/// component receiving the callback is temporarily absent from the tree.
pub struct ViewContext<'a> {
    id: ComponentId,
    tree: &'a Tree,
    state: &'a mut SessionState,
}

impl<'a> ViewContext<'a> {
    pub(crate) fn new(id: ComponentId, tree: &'a Tree, state: &'a mut SessionState) -> Self {
        Self { id, tree, state }
    }

    /// The ID of the component receiving the callback.
    pub fn component_id(&self) -> ComponentId {
        self.id
    }

    pub fn tree(&self) -> &Tree {
        self.tree
    }

    /// Borrow another component as its concrete type.
    pub fn component<T: 'static>(&self, id: ComponentId) -> Option<&T> {
        self.tree.downcast::<T>(id)
    }

    /// The first component of type `T` in this tree.
    pub fn find<T: 'static>(&self) -> Option<ComponentId> {
        self.tree.find_first::<T>(self.id).ok().flatten()
    }
}

impl Deref for ViewContext<'_> {
    type Target = SessionState;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for ViewContext<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}
