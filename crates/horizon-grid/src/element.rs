//! Addressable visual elements.
//!
//! An [`Element`] is either a detached [`Item`] template or a
//! [`CellElement`] bound to a live cell of an open session. Both expose the
//! same capabilities, so rendering code can be written once against
//! [`Element`].

use std::fmt;
use std::sync::Arc;

use horizon_grid_core::Cell;

use crate::content::{CellContent, RichText};
use crate::routing::ClickContext;
use crate::session::SessionState;

/// A click handler attached to a cell.
pub type ClickHandler = Arc<dyn Fn(&mut ClickContext<'_>) + Send + Sync>;

/// Wrap a closure as a [`ClickHandler`].
pub fn handler<F>(f: F) -> ClickHandler
where
    F: Fn(&mut ClickContext<'_>) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A template element: content plus an optional click handler.
#[derive(Clone, Default)]
pub struct Item {
    content: Option<CellContent>,
    handler: Option<ClickHandler>,
}

impl Item {
    pub fn new(content: CellContent) -> Self {
        Self {
            content: Some(content),
            handler: None,
        }
    }

    /// An item that renders nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn on_click<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut ClickContext<'_>) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(f));
        self
    }

    pub fn content(&self) -> Option<&CellContent> {
        self.content.as_ref()
    }

    pub fn handler(&self) -> Option<&ClickHandler> {
        self.handler.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Option<CellContent>, Option<ClickHandler>) {
        (self.content, self.handler)
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("content", &self.content)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl From<CellContent> for Item {
    fn from(content: CellContent) -> Self {
        Self::new(content)
    }
}

/// A live cell of an open session.
pub struct CellElement<'a> {
    state: &'a mut SessionState,
    cell: Cell,
}

impl<'a> CellElement<'a> {
    pub(crate) fn new(state: &'a mut SessionState, cell: Cell) -> Self {
        Self { state, cell }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }
}

/// Either a template or a live cell.
pub enum Element<'a> {
    Template(Item),
    Cell(CellElement<'a>),
}

impl Element<'_> {
    pub fn content(&self) -> Option<CellContent> {
        match self {
            Self::Template(item) => item.content.clone(),
            Self::Cell(element) => element.state.content(element.cell),
        }
    }

    pub fn set_content(&mut self, content: Option<CellContent>) {
        match self {
            Self::Template(item) => item.content = content,
            Self::Cell(element) => element.state.set_content(element.cell, content),
        }
    }

    pub fn handler(&self) -> Option<ClickHandler> {
        match self {
            Self::Template(item) => item.handler.clone(),
            Self::Cell(element) => element.state.handler(element.cell),
        }
    }

    pub fn set_handler(&mut self, handler: Option<ClickHandler>) {
        match self {
            Self::Template(item) => item.handler = handler,
            Self::Cell(element) => match handler {
                Some(handler) => element.state.set_handler(element.cell, handler),
                None => element.state.remove_handler(element.cell),
            },
        }
    }

    /// Modify the current content in place. Does nothing when the element
    /// has no content.
    pub fn edit_content<F>(&mut self, f: F)
    where
        F: FnOnce(&mut CellContent),
    {
        if let Some(mut content) = self.content() {
            f(&mut content);
            self.set_content(Some(content));
        }
    }

    pub fn set_label(&mut self, label: impl Into<RichText>) {
        let label = label.into();
        self.edit_content(|content| content.label = Some(label));
    }

    pub fn set_lore<I, T>(&mut self, lore: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<RichText>,
    {
        let lore: Vec<RichText> = lore.into_iter().map(Into::into).collect();
        self.edit_content(|content| content.lore = lore);
    }

    pub fn set_amount(&mut self, amount: u8) {
        self.edit_content(|content| content.amount = amount);
    }

    /// The template item, if this is a template element.
    pub fn into_item(self) -> Option<Item> {
        match self {
            Self::Template(item) => Some(item),
            Self::Cell(_) => None,
        }
    }
}

impl From<Item> for Element<'_> {
    fn from(item: Item) -> Self {
        Self::Template(item)
    }
}
