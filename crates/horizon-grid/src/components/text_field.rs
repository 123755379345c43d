use std::fmt;
use std::sync::Arc;

use horizon_grid_core::Cell;

use crate::component::{Component, ViewContext};
use crate::content::CellContent;
use crate::element::Item;

/// Called with the new text whenever the field changes.
pub type TextChanged = Arc<dyn Fn(&str, &mut ViewContext<'_>) + Send + Sync>;

/// Captures text typed into a text-capturing grid.
///
/// The field shows an optional placeholder in the input cell (cell 0) when
/// the session opens and keeps the latest text.
#[derive(Clone, Default)]
pub struct TextField {
    text: String,
    placeholder: Option<CellContent>,
    on_change: Option<TextChanged>,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(mut self, placeholder: CellContent) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &mut ViewContext<'_>) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
        self
    }

    /// The latest text typed into the field.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Component for TextField {
    fn on_open(&mut self, cx: &mut ViewContext<'_>) {
        if let Some(placeholder) = &self.placeholder {
            cx.set_item(Cell::primary(0), Item::new(placeholder.clone()));
        }
    }

    fn on_text_input(&mut self, text: &str, cx: &mut ViewContext<'_>) {
        if self.text == text {
            return;
        }
        self.text = text.to_string();
        if let Some(on_change) = &self.on_change {
            on_change(text, cx);
        }
    }
}

impl fmt::Debug for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextField")
            .field("text", &self.text)
            .field("placeholder", &self.placeholder)
            .finish()
    }
}
